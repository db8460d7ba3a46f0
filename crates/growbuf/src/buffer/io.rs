//! `std::io` 桥接，供传输层直接把 socket 数据读进缓冲。

use std::io::{self, Read, Write};

use super::GrowingBuffer;
use crate::error::BufferError;

/// 容量超限映射为 `OutOfMemory`，原始错误保留在 `io::Error` 内部。
fn into_io_error(err: BufferError) -> io::Error {
    io::Error::new(io::ErrorKind::OutOfMemory, err)
}

impl GrowingBuffer {
    /// 从 `reader` 读取至多 `max_len` 字节，直接落在写游标之后。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：传输层读取 socket 时省掉“先读进临时数组再 `put_bytes`”的一次拷贝；
    /// - **执行 (How)**：
    ///   1. 把 `max_len` 截断到上限内剩余的空间；一个字节都放不下时记录
    ///      [`BufferError::CapacityExceeded`] 并返回 `ErrorKind::OutOfMemory`，
    ///      调用方应施加背压或断开对端，而不是无限重试；
    ///   2. 按 `reserve` 的规则扩容后，把写游标之后的窗口交给 `reader.read`；
    ///   3. 按实际读取量推进写游标。
    /// - **契约 (What)**：返回 `Ok(0)` 表示对端已关闭（或 `max_len == 0`）；
    ///   `reader` 出错时游标不动，但扩容可能已经发生。
    pub fn read_from<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        max_len: usize,
    ) -> io::Result<usize> {
        if max_len == 0 {
            return Ok(0);
        }
        let room = self.max_capacity.saturating_sub(self.write_cursor);
        let len = max_len.min(room);
        if len == 0 {
            let err = self.fail(BufferError::CapacityExceeded {
                requested: self.write_cursor.saturating_add(max_len),
                max_capacity: self.max_capacity,
            });
            return Err(into_io_error(err));
        }
        let end = self.write_cursor + len;
        if end > self.capacity {
            self.reserve(end).map_err(into_io_error)?;
        }
        let start = self.write_cursor;
        let read = reader.read(&mut self.storage[start..end])?.min(len);
        self.write_cursor += read;
        Ok(read)
    }
}

/// 整块写入：要么全部写入，要么返回 `OutOfMemory` 且缓冲不变。
impl Write for GrowingBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.put_bytes(data).map_err(into_io_error)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 读取至多 `dst.len()` 个可读字节。
impl Read for GrowingBuffer {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let len = dst.len().min(self.readable_size());
        self.read_prevalidated(&mut dst[..len]);
        Ok(len)
    }
}
