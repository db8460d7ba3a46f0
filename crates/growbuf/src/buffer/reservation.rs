//! 预先校验过容量或可读量的快速读写令牌。
//!
//! # 角色定位（Why）
//! - 位级编码器写入一条已知长度的记录时，只需在开头预留一次容量，
//!   之后每个字段的写入都不必再走扩容判断与故障记录；
//! - 解码器确认整帧已到齐后，同样可以一次性校验，再逐字段读取。
//!
//! # 契约说明（What）
//! - 令牌独占借用缓冲，持有期间无法经由其它路径修改游标；
//! - 令牌的额度在创建时确定，超额读写是调用方缺陷，会 panic 而不是越界访问；
//! - 令牌被丢弃时，已提交的写入与已消费的读取保持生效。

use alloc::{string::String, vec, vec::Vec};

use super::{GrowingBuffer, access};
use crate::{error::BufferError, value::WireValue};

impl GrowingBuffer {
    /// 预留 `len` 字节写入额度，必要时按 [`reserve`](Self::reserve) 的规则扩容。
    ///
    /// 扩容失败时记录故障并返回 [`BufferError::CapacityExceeded`]。
    pub fn reserve_write(&mut self, len: usize) -> Result<WriteReservation<'_>, BufferError> {
        let end = self.write_end(len)?;
        if end > self.capacity {
            self.reserve(end)?;
        }
        Ok(WriteReservation {
            buffer: self,
            remaining: len,
        })
    }

    /// 校验至少有 `len` 字节可读，并返回对应额度的读取令牌。
    pub fn reserve_read(&mut self, len: usize) -> Result<ReadReservation<'_>, BufferError> {
        self.ensure_readable(len)?;
        Ok(ReadReservation {
            buffer: self,
            remaining: len,
        })
    }
}

/// 写入令牌，由 [`GrowingBuffer::reserve_write`] 创建。
///
/// # 教案式说明
/// - **意图 (Why)**：把“容量已证明充足”编码进类型，替代直接操作裸偏移的免校验写入；
/// - **执行 (How)**：每次写入从 `remaining` 中扣除额度，随后直接拷贝到写游标处；
/// - **契约 (What)**：额度不足时 panic；[`spare_mut`](Self::spare_mut) 额外暴露安全区，
///   写入其中的字节只有经过 [`commit`](Self::commit) 才计入缓冲；
/// - **风险 (Trade-offs)**：只用于自身已保证长度的编码路径，不要把它暴露给不可信输入。
#[derive(Debug)]
pub struct WriteReservation<'a> {
    buffer: &'a mut GrowingBuffer,
    remaining: usize,
}

impl WriteReservation<'_> {
    /// 剩余写入额度。
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn claim(&mut self, len: usize) -> usize {
        assert!(
            len <= self.remaining,
            "write reservation exceeded: requested {len} bytes, {} remaining",
            self.remaining
        );
        self.remaining -= len;
        let start = self.buffer.write_cursor;
        self.buffer.write_cursor += len;
        start
    }

    /// 追加字节。
    pub fn put_bytes(&mut self, data: &[u8]) {
        let start = self.claim(data.len());
        self.buffer.storage[start..start + data.len()].copy_from_slice(data);
    }

    /// 追加字符串及终止符，共占用 `text.len() + 1` 字节额度。
    ///
    /// 不检查内嵌终止符，调用方需自行保证。
    pub fn put_string(&mut self, text: &str) {
        debug_assert!(!text.as_bytes().contains(&access::TERMINATOR));
        let start = self.claim(text.len() + 1);
        let end = start + text.len();
        self.buffer.storage[start..end].copy_from_slice(text.as_bytes());
        self.buffer.storage[end] = access::TERMINATOR;
    }

    /// 以小端序追加一个定长标量。
    pub fn put_value<T: WireValue>(&mut self, value: T) {
        let start = self.claim(T::SIZE);
        value.write_le(&mut self.buffer.storage[start..start + T::SIZE]);
    }

    /// 写游标之后直至安全区末尾的可写窗口。
    ///
    /// 窗口长度为 `writable_size() + safe_area`，写入后用 [`commit`](Self::commit) 宣告有效字节数。
    pub fn spare_mut(&mut self) -> &mut [u8] {
        let start = self.buffer.write_cursor;
        &mut self.buffer.storage[start..]
    }

    /// 宣告经由 [`spare_mut`](Self::spare_mut) 写入的 `len` 字节有效。
    ///
    /// 超出剩余额度时返回 [`BufferError::ReservationExceeded`]，游标不动。
    pub fn commit(&mut self, len: usize) -> Result<(), BufferError> {
        if len > self.remaining {
            return Err(BufferError::ReservationExceeded {
                requested: len,
                remaining: self.remaining,
            });
        }
        self.remaining -= len;
        self.buffer.write_cursor += len;
        Ok(())
    }
}

/// 读取令牌，由 [`GrowingBuffer::reserve_read`] 创建。
///
/// 额度内的读取不再检查可读量；超额读取会 panic。
#[derive(Debug)]
pub struct ReadReservation<'a> {
    buffer: &'a mut GrowingBuffer,
    remaining: usize,
}

impl ReadReservation<'_> {
    /// 剩余读取额度。
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn claim(&mut self, len: usize) -> usize {
        assert!(
            len <= self.remaining,
            "read reservation exceeded: requested {len} bytes, {} remaining",
            self.remaining
        );
        self.remaining -= len;
        let start = self.buffer.read_cursor;
        self.buffer.read_cursor += len;
        start
    }

    /// 额度内尚未读取的字节视图。
    pub fn peek(&self) -> &[u8] {
        let start = self.buffer.read_cursor;
        &self.buffer.storage[start..start + self.remaining]
    }

    /// 取出 `len` 字节。
    pub fn get_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut out = vec![0; len];
        self.get_into(&mut out);
        out
    }

    /// 取出恰好 `dst.len()` 字节。
    pub fn get_into(&mut self, dst: &mut [u8]) {
        let start = self.claim(dst.len());
        dst.copy_from_slice(&self.buffer.storage[start..start + dst.len()]);
    }

    /// 以小端序读取一个定长标量。
    pub fn get_value<T: WireValue>(&mut self) -> T {
        let start = self.claim(T::SIZE);
        T::read_le(&self.buffer.storage[start..start + T::SIZE])
    }

    /// 在额度内读取一个以终止符结尾的字符串。
    ///
    /// 额度只证明了长度，内容仍需检查：找不到终止符或不是 UTF-8 时返回错误且不消费额度。
    pub fn get_string(&mut self) -> Result<String, BufferError> {
        let (text, consumed) = access::decode_terminated(self.peek())?;
        self.claim(consumed);
        Ok(text)
    }
}
