//! 与 `bytes` 生态的对接：把已分帧的区域交给编解码层。

use bytes::{Buf, Bytes};

use super::GrowingBuffer;
use crate::error::BufferError;

impl GrowingBuffer {
    /// 拷贝出 `len` 字节的帧并推进读游标。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：解码器确认帧边界后，把帧体作为独立的 `Bytes` 交给位级解码层，
    ///   随后即可 `pop_front` 回收空间，帧体的生命周期与缓冲解耦；
    /// - **契约 (What)**：可读量不足时返回 [`BufferError::Underrun`] 并记录故障，游标不动。
    pub fn take_frame(&mut self, len: usize) -> Result<Bytes, BufferError> {
        self.ensure_readable(len)?;
        let end = self.read_cursor + len;
        let frame = Bytes::copy_from_slice(&self.storage[self.read_cursor..end]);
        self.read_cursor = end;
        Ok(frame)
    }

    /// 拷贝全部可读字节，不消费。
    pub fn freeze_readable(&self) -> Bytes {
        Bytes::copy_from_slice(self.readable())
    }
}

/// 以可读区域 `[read_cursor, write_cursor)` 实现 `Buf`，让编解码层直接按 `bytes` 习惯读取。
impl Buf for GrowingBuffer {
    fn remaining(&self) -> usize {
        self.readable_size()
    }

    fn chunk(&self) -> &[u8] {
        self.readable()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.readable_size(),
            "cannot advance past the readable region: {cnt} > {}",
            self.readable_size()
        );
        self.read_cursor += cnt;
    }
}
