use tracing::trace;

use super::GrowingBuffer;

impl GrowingBuffer {
    /// 丢弃缓冲前部的 `count` 字节，把其后的已写入字节前移到偏移 0。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：解码器分发完一个完整帧后调用本方法回收其空间，无需重新分配存储；
    /// - **执行 (How)**：
    ///   1. `count` 超过逻辑容量时两个游标直接归零（粗粒度的兜底，不关心实际写入量）；
    ///   2. `write_cursor >= count` 时把 `[count, write_cursor)` 搬到 `[0, write_cursor - count)`，
    ///      写游标减去 `count`，读游标减去 `count` 并在 0 处截断，腾出的尾部清零；
    ///   3. 否则同样视为“全部丢弃”，两个游标归零。
    /// - **契约 (What)**：从不改变容量；分支 3 与“把 `count` 截断到 `write_cursor`”的结果一致。
    pub fn pop_front(&mut self, count: usize) {
        if count > self.capacity || count > self.write_cursor {
            self.write_cursor = 0;
            self.read_cursor = 0;
            trace!(
                target: "growbuf::buffer",
                count,
                capacity = self.capacity,
                "pop_front dropped all buffered bytes"
            );
            return;
        }
        let old_write = self.write_cursor;
        self.storage.copy_within(count..old_write, 0);
        self.write_cursor = old_write - count;
        self.storage[self.write_cursor..old_write].fill(0);
        self.read_cursor = self.read_cursor.saturating_sub(count);
        trace!(
            target: "growbuf::buffer",
            count,
            write_cursor = self.write_cursor,
            read_cursor = self.read_cursor,
            "compacted buffer"
        );
    }
}
