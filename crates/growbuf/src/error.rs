//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为缓冲的全部可失败操作提供唯一的错误域，替代“粘滞标志 + 布尔返回值”两套并存的信号；
//! - 区分容量超限、数据不足、接口误用三类故障，方便传输层决定背压、丢弃还是断开对端。
//!
//! ## 设计要求（What）
//! - 所有故障都是本地、可恢复的：失败的操作对缓冲状态零影响，不应升级为进程终止；
//! - 错误类型需 `Clone + Eq`，以便同一个值既返回给调用方，又保存为 `last_fault` 快照。

use thiserror::Error;

/// 缓冲操作统一使用的结果别名。
pub type Result<T, E = BufferError> = core::result::Result<T, E>;

/// 缓冲错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：每个变体都携带足够的数值上下文（请求量、可用量、上限），
///   让上层在日志里无需再次读取缓冲状态即可判断故障原因；
/// - **契约 (What)**：返回该错误的校验操作保证读写游标与已写入字节均未改变；
/// - **设计权衡 (Trade-offs)**：使用 `usize` 平铺字段而非嵌套结构，牺牲少量可扩展性换取零分配。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BufferError {
    /// 写入需要的容量超过 `max_capacity`。
    #[error("requested capacity of {requested} bytes exceeds the ceiling of {max_capacity} bytes")]
    CapacityExceeded {
        requested: usize,
        max_capacity: usize,
    },

    /// 读取长度超过当前可读字节数。
    #[error("read of {requested} bytes exceeds the {available} readable bytes")]
    Underrun { requested: usize, available: usize },

    /// 可读区域内找不到字符串终止符。
    #[error("no string terminator within the {available} readable bytes")]
    MissingTerminator { available: usize },

    /// 终止符之前的字节不是合法 UTF-8。
    #[error("string of {len} bytes is not valid UTF-8")]
    InvalidUtf8 { len: usize },

    /// 待写入的字符串内部含有终止符，读回时会被截断。
    #[error("string contains a terminator byte at offset {position}")]
    InteriorNul { position: usize },

    /// 预留令牌被要求提交超出授予额度的字节。
    #[error("reservation commit of {requested} bytes exceeds the {remaining} bytes granted")]
    ReservationExceeded { requested: usize, remaining: usize },
}

/// 故障类别，对应容量超限、数据不足、接口误用三种处理策略。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FaultKind {
    /// 对端写入过多，调用方通常应施加背压或断开连接。
    CapacityExceeded,
    /// 数据尚未到齐或帧格式错误，等待更多字节或丢弃该帧。
    Underrun,
    /// 调用方违反接口约定（内嵌终止符、预留额度越界）。
    Misuse,
}

impl BufferError {
    /// 返回错误所属的故障类别。
    pub fn kind(&self) -> FaultKind {
        match self {
            BufferError::CapacityExceeded { .. } => FaultKind::CapacityExceeded,
            BufferError::Underrun { .. }
            | BufferError::MissingTerminator { .. }
            | BufferError::InvalidUtf8 { .. } => FaultKind::Underrun,
            BufferError::InteriorNul { .. } | BufferError::ReservationExceeded { .. } => {
                FaultKind::Misuse
            }
        }
    }

    /// 缓冲故障均可由调用方就地恢复。
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
