//! `GrowingBuffer` 的存储、游标与生命周期。
//!
//! 子模块按职责拆分：`growth` 负责扩容与释放，`access` 提供校验读写，`compaction`
//! 负责前移未消费字节，`reservation` 承载免校验快速路径，`handoff` 与 `io`
//! 分别对接编解码层与传输层。

use alloc::{vec, vec::Vec};
use core::fmt;

use crate::{config::BufferConfig, error::BufferError};

mod access;
mod compaction;
mod growth;
mod handoff;
#[cfg(feature = "std")]
mod io;
pub(crate) mod reservation;

/// 接管外部字节区域时采用的默认容量上限（64 KiB）。
pub const DEFAULT_MAX_CAPACITY: usize = 0x1_0000;

/// 预分配容量的对齐粒度。
const PREALLOCATE_ALIGN: usize = 8;

/// `Vec<u8>` 可容纳的最大长度；`capacity + safe_area` 必须落在其内。
const MAX_STORAGE_LEN: usize = isize::MAX as usize;

/// `GrowingBuffer` 是单连接独占的可增长双游标字节缓冲。
///
/// # 设计动机（Why）
/// - 传输层不断追加 socket 字节，协议解码器顺序消费完整帧后再压缩缓冲，
///   两者共享同一块连续内存，避免逐帧分配；
/// - 容量按“请求量两倍加一”几何增长以摊薄小块追加的成本，并被 `max_capacity`
///   硬性截断，单连接的最坏内存占用因此有界。
///
/// # 架构关系（How）
/// - `storage` 的长度恒为 `capacity + safe_area`（容量为 0 时不持有任何分配）；
/// - `write_cursor` 之前的字节均已写入，之后直到存储末尾的字节在扩容后被清零；
/// - 校验操作失败时写入 `last_fault`，直到调用方显式清除。
///
/// # 契约说明（What）
/// - **不变量**：`0 <= read_cursor <= write_cursor <= capacity <= max_capacity`；
/// - **失败语义**：任何返回 `Err` 的校验操作都不修改存储与游标；
/// - **线程模型**：实例只归属一个连接任务，内部不做同步，跨任务共享需外部互斥。
///
/// # 风险与取舍（Trade-offs）
/// - 线性缓冲不回绕，只有 `pop_front` 能回收前部空间，解码器必须在消费完帧后及时调用；
/// - `safe_area` 只能经由 [`WriteReservation::spare_mut`](crate::prevalidated::WriteReservation::spare_mut)
///   访问，留给需要越过逻辑边界整字写入的位级编码器。
pub struct GrowingBuffer {
    storage: Vec<u8>,
    capacity: usize,
    safe_area: usize,
    max_capacity: usize,
    write_cursor: usize,
    read_cursor: usize,
    last_fault: Option<BufferError>,
}

impl GrowingBuffer {
    /// 分配新的缓冲。
    ///
    /// # 参数
    /// - `max_capacity`：容量硬上限；
    /// - `safe_area`：逻辑容量之后额外分配的填充字节数（至多 255）；
    /// - `preallocate`：预分配容量，按 8 字节向上取整后截断到 `max_capacity`，为 0 时不分配。
    ///
    /// # 后置条件
    /// - 游标均为 0，预分配区域（含安全区）全部清零；
    /// - `max_capacity` 被截断到 `isize::MAX - safe_area`，存储长度的加法因此永不溢出。
    pub fn new(max_capacity: usize, safe_area: u8, preallocate: usize) -> Self {
        let safe_area = usize::from(safe_area);
        let max_capacity = max_capacity.min(MAX_STORAGE_LEN - safe_area);
        let capacity = preallocate
            .checked_next_multiple_of(PREALLOCATE_ALIGN)
            .unwrap_or(usize::MAX)
            .min(max_capacity);
        let storage = if capacity == 0 {
            Vec::new()
        } else {
            vec![0; storage_len(capacity, safe_area)]
        };
        Self {
            storage,
            capacity,
            safe_area,
            max_capacity,
            write_cursor: 0,
            read_cursor: 0,
            last_fault: None,
        }
    }

    /// 按配置构造缓冲；配置应事先通过 [`BufferConfig::validate`]。
    pub fn with_config(config: &BufferConfig) -> Self {
        Self::new(config.max_capacity, config.safe_area, config.preallocate)
    }

    /// 接管一块字节区域作为存储，不发生拷贝。
    ///
    /// # 契约说明（What）
    /// - 容量等于区域长度，接管后立即重置：`write_cursor = read_cursor = 0`，
    ///   后续写入从偏移 0 开始覆盖原有内容；
    /// - 上限取 `max(len, DEFAULT_MAX_CAPACITY)`，安全区为 0。
    ///
    /// 典型用法是把上一轮编码用过的暂存区交还给缓冲复用。
    /// 需要直接读取区域内容时改用 [`from_written_vec`](Self::from_written_vec)。
    pub fn from_vec(region: Vec<u8>) -> Self {
        let mut buffer = Self::from_written_vec(region);
        buffer.reset();
        buffer
    }

    /// 接管一块已经写满的字节区域，整个区域视为已写入：`write_cursor = len`、`read_cursor = 0`。
    ///
    /// 典型用法是把传输层收到的完整报文直接交给解码器。
    pub fn from_written_vec(region: Vec<u8>) -> Self {
        let len = region.len();
        let storage = if len == 0 { Vec::new() } else { region };
        Self {
            storage,
            capacity: len,
            safe_area: 0,
            max_capacity: len.max(DEFAULT_MAX_CAPACITY),
            write_cursor: len,
            read_cursor: 0,
            last_fault: None,
        }
    }

    /// 复制外部字节区域，走与 `put_bytes` 相同的扩容路径。
    ///
    /// 上限取 `max(len, DEFAULT_MAX_CAPACITY)`，因此复制本身不会失败。
    pub fn from_slice(data: &[u8]) -> Self {
        let mut buffer = Self::new(data.len().max(DEFAULT_MAX_CAPACITY), 0, 0);
        if !data.is_empty() {
            buffer.reallocate(growth::growth_target(data.len(), buffer.max_capacity));
            buffer.write_prevalidated(data);
        }
        buffer
    }

    /// 当前逻辑容量。
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 容量硬上限。
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// 逻辑容量之后的填充字节数。
    pub fn safe_area(&self) -> usize {
        self.safe_area
    }

    /// 下一个写入字节的偏移。
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// 下一个读取字节的偏移。
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// 可读字节数：`write_cursor - read_cursor`。
    pub fn readable_size(&self) -> usize {
        self.write_cursor - self.read_cursor
    }

    /// 无需扩容即可写入的字节数。
    pub fn writable_size(&self) -> usize {
        self.capacity - self.write_cursor
    }

    /// 没有可读字节时返回 `true`。
    pub fn is_empty(&self) -> bool {
        self.readable_size() == 0
    }

    /// 尚未消费的字节视图 `storage[read_cursor, write_cursor)`。
    pub fn readable(&self) -> &[u8] {
        &self.storage[self.read_cursor..self.write_cursor]
    }

    /// 已写入的全部字节视图 `storage[0, write_cursor)`。
    pub fn written(&self) -> &[u8] {
        &self.storage[..self.write_cursor]
    }

    /// 两个游标归零，保留存储。
    pub fn reset(&mut self) {
        self.write_cursor = 0;
        self.read_cursor = 0;
    }

    /// 最近一次失败的校验操作留下的故障。
    pub fn last_fault(&self) -> Option<&BufferError> {
        self.last_fault.as_ref()
    }

    /// 是否存在尚未清除的故障。
    pub fn has_fault(&self) -> bool {
        self.last_fault.is_some()
    }

    /// 清除粘滞故障并返回被清除的值。
    pub fn clear_fault(&mut self) -> Option<BufferError> {
        self.last_fault.take()
    }

    /// [`clear_fault`](Self::clear_fault) 的别名，保留给按“重置错误”习惯调用的编码器。
    pub fn reset_error(&mut self) {
        self.last_fault = None;
    }

    /// 记录故障并原样返回，供 `return Err(self.fail(err))` 使用。
    fn fail(&mut self, err: BufferError) -> BufferError {
        self.last_fault = Some(err.clone());
        err
    }

    /// 计算追加 `len` 字节后的写游标，溢出按容量超限处理。
    fn write_end(&mut self, len: usize) -> Result<usize, BufferError> {
        match self.write_cursor.checked_add(len) {
            Some(end) => Ok(end),
            None => Err(self.fail(BufferError::CapacityExceeded {
                requested: usize::MAX,
                max_capacity: self.max_capacity,
            })),
        }
    }

    /// 确保至少有 `len` 字节可读。
    fn ensure_readable(&mut self, len: usize) -> Result<(), BufferError> {
        let available = self.readable_size();
        if len > available {
            return Err(self.fail(BufferError::Underrun {
                requested: len,
                available,
            }));
        }
        Ok(())
    }

    /// 在调用方已保证容量的前提下追加字节。
    fn write_prevalidated(&mut self, data: &[u8]) {
        let end = self.write_cursor + data.len();
        self.storage[self.write_cursor..end].copy_from_slice(data);
        self.write_cursor = end;
    }

    /// 在调用方已保证可读量的前提下取出 `dst.len()` 字节。
    fn read_prevalidated(&mut self, dst: &mut [u8]) {
        let end = self.read_cursor + dst.len();
        dst.copy_from_slice(&self.storage[self.read_cursor..end]);
        self.read_cursor = end;
    }
}

/// 存储长度：逻辑容量加安全区。
///
/// 构造时的上限截断保证 `capacity <= MAX_STORAGE_LEN - safe_area`，溢出只会来自破坏不变量的调用。
pub(super) fn storage_len(capacity: usize, safe_area: usize) -> usize {
    match capacity.checked_add(safe_area) {
        Some(len) if len <= MAX_STORAGE_LEN => len,
        _ => MAX_STORAGE_LEN,
    }
}

impl Default for GrowingBuffer {
    fn default() -> Self {
        Self::with_config(&BufferConfig::default())
    }
}

impl Clone for GrowingBuffer {
    /// 复制出独立存储：只拷贝 `write_cursor` 之前的字节，其余区域清零，故障不随之复制。
    fn clone(&self) -> Self {
        let storage = if self.capacity == 0 {
            Vec::new()
        } else {
            let mut storage = vec![0; storage_len(self.capacity, self.safe_area)];
            storage[..self.write_cursor].copy_from_slice(self.written());
            storage
        };
        Self {
            storage,
            capacity: self.capacity,
            safe_area: self.safe_area,
            max_capacity: self.max_capacity,
            write_cursor: self.write_cursor,
            read_cursor: self.read_cursor,
            last_fault: None,
        }
    }
}

impl fmt::Debug for GrowingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowingBuffer")
            .field("capacity", &self.capacity)
            .field("safe_area", &self.safe_area)
            .field("max_capacity", &self.max_capacity)
            .field("write_cursor", &self.write_cursor)
            .field("read_cursor", &self.read_cursor)
            .field("last_fault", &self.last_fault)
            .finish_non_exhaustive()
    }
}
