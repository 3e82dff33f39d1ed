//! # 位通道模块
//!
//! 以像素字节的最低有效位为载体，逐 bit 地读写数据。
//! 游标随每个 bit 前进一格，永远不会越过缓冲区末尾。

use crate::error::{Result, StegoError};

/// 将字节的最低位调整为 `bit`。
///
/// 最低位不符时对字节做 ±1 修正，因此结果与原值最多相差 1，高 7 位保持不变。
pub fn set_lsb(byte: u8, bit: bool) -> u8 {
    match (byte & 1 == 1, bit) {
        (false, true) => byte + 1,
        (true, false) => byte - 1,
        _ => byte,
    }
}

/// 用掩码方式写入最低位：`(byte & !1) | bit`。结果与 [`set_lsb`] 完全一致。
pub fn set_lsb_masked(byte: u8, bit: bool) -> u8 {
    (byte & !1) | bit as u8
}

/// 指向像素缓冲区的位置游标，满足 `0 <= index <= len`。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor {
    index: usize,
}

impl BitCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    fn advance(&mut self) {
        self.index += 1;
    }
}

/// 持有借用的缓冲区和一个专属游标。
///
/// 每次编码/解码调用都会创建新的通道，调用结束即丢弃，不存在跨调用的共享状态。
/// 只读缓冲区 (`&[u8]`) 只能读取，可变缓冲区 (`&mut [u8]`) 还可以写入。
#[derive(Debug)]
pub struct BitChannel<B> {
    buf: B,
    cursor: BitCursor,
}

impl<B: AsRef<[u8]>> BitChannel<B> {
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            cursor: BitCursor::default(),
        }
    }

    /// 当前游标位置，即已消耗的像素字节数。
    pub fn position(&self) -> usize {
        self.cursor.index()
    }

    /// 缓冲区总长度，也就是以 bit 计的总容量。
    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.position()
    }

    /// 读取当前字节的最低位并前进一格。
    ///
    /// # Errors
    ///
    /// 游标已到达缓冲区末尾时返回 [`StegoError::UnexpectedEndOfData`]。
    pub fn read_bit(&mut self) -> Result<bool> {
        let position = self.position();
        let byte = *self
            .buf
            .as_ref()
            .get(position)
            .ok_or(StegoError::UnexpectedEndOfData { position })?;

        self.cursor.advance();
        Ok(byte % 2 == 1)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BitChannel<B> {
    /// 把 `bit` 写入当前字节的最低位并前进一格。
    ///
    /// # Errors
    ///
    /// 游标已到达缓冲区末尾时返回 [`StegoError::CapacityExceeded`]，缓冲区不会被修改。
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        let position = self.position();
        let available = self.len();
        let byte = self
            .buf
            .as_mut()
            .get_mut(position)
            .ok_or(StegoError::CapacityExceeded {
                required: position + 1,
                available,
            })?;

        *byte = set_lsb(*byte, bit);
        self.cursor.advance();
        Ok(())
    }
}
