use alloc::vec::Vec;

use tracing::{debug, warn};

use super::{GrowingBuffer, storage_len};
use crate::error::BufferError;

/// 扩容目标：`2 * target + 1`，截断到上限。
pub(super) fn growth_target(target: usize, max_capacity: usize) -> usize {
    target
        .saturating_mul(2)
        .saturating_add(1)
        .min(max_capacity)
}

impl GrowingBuffer {
    /// 确保逻辑容量不小于 `target_size`。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：写入路径与编码器的批量预留共用同一个扩容决策点，
    ///   让几何增长与上限截断只在一处实现；
    /// - **执行 (How)**：
    ///   1. `target_size > max_capacity` 时记录故障并返回 [`BufferError::CapacityExceeded`]；
    ///   2. `target_size == 0` 视为释放请求，转交 [`release`](Self::release)；
    ///   3. 容量已足够时直接成功，从不隐式缩容；
    ///   4. 否则按 `min(max_capacity, 2 * target_size + 1)` 重新分配，保留已写入字节，其余区域清零。
    /// - **契约 (What)**：失败时存储与游标不变；成功后 `capacity() >= target_size`（释放请求除外）。
    pub fn reserve(&mut self, target_size: usize) -> Result<(), BufferError> {
        if target_size > self.max_capacity {
            warn!(
                target: "growbuf::buffer",
                requested = target_size,
                max_capacity = self.max_capacity,
                "buffer growth refused by capacity ceiling"
            );
            return Err(self.fail(BufferError::CapacityExceeded {
                requested: target_size,
                max_capacity: self.max_capacity,
            }));
        }
        if target_size == 0 {
            self.release();
            return Ok(());
        }
        if target_size <= self.capacity {
            return Ok(());
        }
        self.reallocate(growth_target(target_size, self.max_capacity));
        Ok(())
    }

    /// 释放全部存储，容量与两个游标归零。
    ///
    /// 仍有未读字节时会一并丢弃并打出 `warn` 日志；这是显式的重置动作，不记录故障。
    pub fn release(&mut self) {
        let discarded = self.readable_size();
        if discarded > 0 {
            warn!(
                target: "growbuf::buffer",
                discarded,
                "releasing buffer storage discards unread bytes"
            );
        }
        debug!(
            target: "growbuf::buffer",
            old_capacity = self.capacity,
            "releasing buffer storage"
        );
        self.storage = Vec::new();
        self.capacity = 0;
        self.write_cursor = 0;
        self.read_cursor = 0;
    }

    /// 把逻辑容量调整为 `new_capacity`（不小于当前写游标）。
    ///
    /// 已写入区间原样保留，`write_cursor` 之后直至安全区末尾全部清零，
    /// 包括此前通过 `spare_mut` 写入但未提交的残留字节。
    pub(super) fn reallocate(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.write_cursor);
        let old_capacity = self.capacity;
        let new_len = storage_len(new_capacity, self.safe_area);
        self.storage.truncate(self.write_cursor);
        self.storage
            .reserve_exact(new_len.saturating_sub(self.storage.len()));
        self.storage.resize(new_len, 0);
        self.capacity = new_capacity;
        debug!(
            target: "growbuf::buffer",
            old_capacity,
            new_capacity,
            safe_area = self.safe_area,
            "grew buffer storage"
        );
    }
}
