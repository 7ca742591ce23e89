//! rv32i_sim: RV32I 单线程指令集仿真库
//!
//! 16 KiB 字寻址内存，代码段从 0 开始，数据段从 0x2000 开始；
//! 通过 ECALL 提供整数/字符串打印与退出。
//!
//! # 模块结构
//!
//! - `isa`: 字段提取、立即数符号扩展与表驱动解码
//! - `cpu`: CPU 核心、执行单元与系统调用
//! - `memory`: 字槽内存与越界策略
//! - `sim_env`: 仿真环境（配置、镜像/ELF 加载、转储）

pub mod cpu;
pub mod isa;
pub mod memory;
pub mod sim_env;
