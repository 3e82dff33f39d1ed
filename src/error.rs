//! # 核心错误类型
//!
//! 隐写核心只会产生三种错误，全部在调用处同步返回。

/// 编码或解码像素缓冲区时可能出现的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StegoError {
    /// 请求隐藏一条空消息。
    #[error("message cannot be empty")]
    EmptyMessage,

    /// 消息加结束标记所需的 bit 数超过了缓冲区的字节数。
    #[error("not enough capacity: {required} bits required, {available} available")]
    CapacityExceeded { required: usize, available: usize },

    /// 缓冲区已读完，仍未找到结束标记。
    #[error("unexpected end of data at byte {position}: message terminator not found")]
    UnexpectedEndOfData { position: usize },
}

pub type Result<T> = std::result::Result<T, StegoError>;
