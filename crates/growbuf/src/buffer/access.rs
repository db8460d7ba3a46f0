//! 校验读写接口：要么完整执行，要么对缓冲零影响并返回错误。

use alloc::{string::String, vec, vec::Vec};

use super::GrowingBuffer;
use crate::{error::BufferError, value::WireValue};

/// 字符串终止符。
pub(super) const TERMINATOR: u8 = 0;

impl GrowingBuffer {
    /// 在写游标处追加 `data`。
    ///
    /// # 契约说明（What）
    /// - 空间不足时先调用 [`reserve`](Self::reserve)，扩容失败则记录故障并返回，
    ///   存储与游标保持原状；
    /// - 成功后 `write_cursor` 前进 `data.len()`。
    pub fn put_bytes(&mut self, data: &[u8]) -> Result<(), BufferError> {
        let end = self.write_end(data.len())?;
        if end > self.capacity {
            self.reserve(end)?;
        }
        self.write_prevalidated(data);
        Ok(())
    }

    /// 追加字符串及其终止符。
    ///
    /// 字符串内部含有终止符时返回 [`BufferError::InteriorNul`]，否则读回时会被截断。
    pub fn put_string(&mut self, text: &str) -> Result<(), BufferError> {
        if let Some(position) = text.bytes().position(|byte| byte == TERMINATOR) {
            return Err(self.fail(BufferError::InteriorNul { position }));
        }
        let end = self.write_end(text.len())?;
        let end = match end.checked_add(1) {
            Some(end) => end,
            None => {
                return Err(self.fail(BufferError::CapacityExceeded {
                    requested: usize::MAX,
                    max_capacity: self.max_capacity,
                }));
            }
        };
        if end > self.capacity {
            self.reserve(end)?;
        }
        self.write_prevalidated(text.as_bytes());
        self.write_prevalidated(&[TERMINATOR]);
        Ok(())
    }

    /// 以小端序追加一个定长标量。
    pub fn put_value<T: WireValue>(&mut self, value: T) -> Result<(), BufferError> {
        let end = self.write_end(T::SIZE)?;
        if end > self.capacity {
            self.reserve(end)?;
        }
        value.write_le(&mut self.storage[self.write_cursor..end]);
        self.write_cursor = end;
        Ok(())
    }

    /// 取出 `len` 字节。
    ///
    /// `len > readable_size()` 时返回 [`BufferError::Underrun`]，游标不动。
    pub fn get_bytes(&mut self, len: usize) -> Result<Vec<u8>, BufferError> {
        self.ensure_readable(len)?;
        let mut out = vec![0; len];
        self.read_prevalidated(&mut out);
        Ok(out)
    }

    /// 取出恰好 `dst.len()` 字节写入调用方缓冲。
    pub fn get_into(&mut self, dst: &mut [u8]) -> Result<(), BufferError> {
        self.ensure_readable(dst.len())?;
        self.read_prevalidated(dst);
        Ok(())
    }

    /// 读取一个以终止符结尾的字符串，终止符一并消费但不包含在返回值中。
    ///
    /// # 契约说明（What）
    /// - 没有可读字节，或可读区域内找不到终止符时返回 [`BufferError::MissingTerminator`]；
    /// - 终止符之前的字节不是 UTF-8 时返回 [`BufferError::InvalidUtf8`]；
    /// - 单独的终止符是合法的空串：消费 1 字节并返回 `""`，与 `put_string("")` 对称；
    /// - 任一失败都不移动读游标。
    pub fn get_string(&mut self) -> Result<String, BufferError> {
        let decoded = decode_terminated(self.readable());
        match decoded {
            Ok((text, consumed)) => {
                self.read_cursor += consumed;
                Ok(text)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// 以小端序读取一个定长标量。
    pub fn get_value<T: WireValue>(&mut self) -> Result<T, BufferError> {
        self.ensure_readable(T::SIZE)?;
        let end = self.read_cursor + T::SIZE;
        let value = T::read_le(&self.storage[self.read_cursor..end]);
        self.read_cursor = end;
        Ok(value)
    }

    /// 跳过 `len` 字节而不拷贝。
    pub fn skip(&mut self, len: usize) -> Result<(), BufferError> {
        self.ensure_readable(len)?;
        self.read_cursor += len;
        Ok(())
    }
}

/// 在 `window` 中定位终止符并解码之前的字节，返回字符串与含终止符的消费长度。
pub(super) fn decode_terminated(window: &[u8]) -> Result<(String, usize), BufferError> {
    let available = window.len();
    let Some(len) = window.iter().position(|byte| *byte == TERMINATOR) else {
        return Err(BufferError::MissingTerminator { available });
    };
    match core::str::from_utf8(&window[..len]) {
        Ok(text) => Ok((String::from(text), len + 1)),
        Err(_) => Err(BufferError::InvalidUtf8 { len }),
    }
}
