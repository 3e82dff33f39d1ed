//! # 消息编解码模块
//!
//! 在 [`BitChannel`] 之上按字节、按消息进行打包与解包。
//!
//! 载荷格式 (逐字节，每个字节低位在前，一个像素字节承载一个 bit)：
//!
//! ```text
//! [byte_0 bit0..bit7][byte_1 bit0..bit7]...[byte_(n-1)]["||EOF||" 的 7 个字节]
//! ```
//!
//! 总共消耗 `(n + 7) * 8` 个像素字节。

use crate::channel::BitChannel;
use crate::constants::{BITS_PER_BYTE, MIN_SPARE_BITS, TERMINATOR};
use crate::error::{Result, StegoError};
use tracing::{debug, trace};

/// 解码时如何在多个结束标记之间取舍。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// 扫描全部容量，以最后一次出现的结束标记为准。
    #[default]
    LastMatch,
    /// 遇到第一个结束标记即停止。
    FirstMatch,
}

/// 将一个字节拆成 8 个 bit，最低位在前。
pub fn byte_to_bits(byte: u8) -> [bool; BITS_PER_BYTE] {
    std::array::from_fn(|i| (byte >> i) & 1 == 1)
}

/// [`byte_to_bits`] 的逆操作。
pub fn bits_to_byte(bits: [bool; BITS_PER_BYTE]) -> u8 {
    bits.iter()
        .enumerate()
        .fold(0, |byte, (i, &bit)| byte | ((bit as u8) << i))
}

/// 隐藏 `message_len` 字节的明文 (含结束标记) 需要的像素字节数。
pub fn required_bits(message_len: usize) -> usize {
    message_len
        .saturating_add(TERMINATOR.len())
        .saturating_mul(BITS_PER_BYTE)
}

/// 长度为 `buffer_len` 的缓冲区最多能隐藏的明文字节数。
pub fn capacity(buffer_len: usize) -> usize {
    (buffer_len / BITS_PER_BYTE).saturating_sub(TERMINATOR.len())
}

/// 从 `cursor` 开始是否还剩至少 16 bit 的空间。
pub fn can_hide_more(buffer: &[u8], cursor: usize) -> bool {
    buffer.len().saturating_sub(cursor) >= MIN_SPARE_BITS
}

/// 把 `message` 连同结束标记写入 `buffer` 的最低位。
///
/// 容量在写入前检查，失败时缓冲区保持原样。成功时返回消耗的像素字节数。
///
/// # Errors
///
/// * [`StegoError::EmptyMessage`] - `message` 为空。
/// * [`StegoError::CapacityExceeded`] - `buffer` 放不下 `(message.len() + 7) * 8` 个 bit。
pub fn encode(buffer: &mut [u8], message: &[u8]) -> Result<usize> {
    if message.is_empty() {
        return Err(StegoError::EmptyMessage);
    }

    let required = required_bits(message.len());
    if required > buffer.len() {
        return Err(StegoError::CapacityExceeded {
            required,
            available: buffer.len(),
        });
    }

    let mut channel = BitChannel::new(buffer);
    for &byte in message.iter().chain(TERMINATOR) {
        write_byte(&mut channel, byte)?;
    }

    debug!(
        message_len = message.len(),
        consumed = channel.position(),
        available = channel.len(),
        "message embedded"
    );
    Ok(channel.position())
}

/// 按默认的 [`ScanMode::LastMatch`] 从 `buffer` 中恢复消息。
pub fn decode(buffer: &[u8]) -> Result<Vec<u8>> {
    decode_with(buffer, ScanMode::default())
}

/// 从 `buffer` 中恢复消息，去掉结束标记后返回明文。
///
/// 每读出一个字节就检查累积结果是否以结束标记结尾 (且标记前至少有一个字节)。
/// 读取次数不超过 `buffer.len() / 8`。
///
/// # Errors
///
/// 读完全部容量仍未找到结束标记时返回 [`StegoError::UnexpectedEndOfData`]，不会返回部分结果。
pub fn decode_with(buffer: &[u8], mode: ScanMode) -> Result<Vec<u8>> {
    let max_bytes = buffer.len() / BITS_PER_BYTE;
    let mut channel = BitChannel::new(buffer);
    let mut accumulator = Vec::new();
    let mut message_end = None;

    for _ in 0..max_bytes {
        accumulator.push(read_byte(&mut channel)?);

        if accumulator.len() > TERMINATOR.len() && accumulator.ends_with(TERMINATOR) {
            let end = accumulator.len() - TERMINATOR.len();
            trace!(end, "terminator found");
            message_end = Some(end);

            if mode == ScanMode::FirstMatch {
                break;
            }
        }
    }

    let Some(end) = message_end else {
        debug!(scanned = channel.position(), "no terminator in buffer");
        return Err(StegoError::UnexpectedEndOfData {
            position: channel.position(),
        });
    };

    accumulator.truncate(end);
    debug!(message_len = end, ?mode, "message recovered");
    Ok(accumulator)
}

fn write_byte<B: AsRef<[u8]> + AsMut<[u8]>>(channel: &mut BitChannel<B>, byte: u8) -> Result<()> {
    byte_to_bits(byte)
        .into_iter()
        .try_for_each(|bit| channel.write_bit(bit))
}

fn read_byte<B: AsRef<[u8]>>(channel: &mut BitChannel<B>) -> Result<u8> {
    let mut bits = [false; BITS_PER_BYTE];
    for bit in bits.iter_mut() {
        *bit = channel.read_bit()?;
    }
    Ok(bits_to_byte(bits))
}
