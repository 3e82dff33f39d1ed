//! # lsb_stealth 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：[`channel`] 逐 bit 读写像素字节的最低位，
//! [`codec`] 负责消息的打包、结束标记和容量检查。其余模块是围绕核心的命令行外壳。

pub mod carrier;
pub mod channel;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod handler;
pub mod logging;

pub use codec::{ScanMode, decode, decode_with, encode};
pub use error::StegoError;
