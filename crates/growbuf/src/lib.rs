#![cfg_attr(not(feature = "std"), no_std)]

//! `growbuf` 提供游戏服务器网络栈最底层的可增长字节缓冲。
//!
//! # 模块定位（Why）
//! - 传输层从 socket 读入的字节、协议编码器待发送的字节，都需要先落在一块可增长、
//!   带读写双游标的连续内存上，再交给位级协议编解码层与实体序列化层消费；
//! - 单个连接独占一块缓冲，容量受 `max_capacity` 硬上限约束，防止恶意对端耗尽内存。
//!
//! # 设计概要（How）
//! - [`GrowingBuffer`] 同时承担存储与扩容、游标模型、校验访问、压缩（`pop_front`）四项职责；
//! - 校验访问统一返回 [`Result`]，失败时缓冲状态保持不变，并记录一次“粘滞故障”，
//!   兼容轮询式的 `last_fault` 检查；
//! - 免校验快速路径被收敛到 [`prevalidated`] 模块：调用方必须先通过
//!   `reserve_write`/`reserve_read` 取得预留令牌，越界属于调用方缺陷并触发 panic，而非未定义行为；
//! - `bytes::Buf` 实现与 `take_frame` 负责把已分帧的区域交给编解码层。
//!
//! # 命名约定（Consistency）
//! - `write_cursor`/`read_cursor` 描述游标，`capacity` 为逻辑容量，`safe_area` 为逻辑容量之后的
//!   额外填充字节，仅在 [`prevalidated::WriteReservation::spare_mut`] 中可见。

extern crate alloc;

mod buffer;
pub mod config;
pub mod error;
mod value;

pub use buffer::{DEFAULT_MAX_CAPACITY, GrowingBuffer};
pub use config::{BufferConfig, ConfigError};
pub use error::{BufferError, FaultKind, Result};
pub use value::WireValue;

/// 免校验快速路径的受限入口。
///
/// - **意图 (Why)**：编码器在写入已知长度的记录前只预留一次容量，随后批量写入无需逐次检查；
/// - **契约 (What)**：令牌只能经由 [`GrowingBuffer::reserve_write`] 与
///   [`GrowingBuffer::reserve_read`] 获得，且独占借用缓冲，额度耗尽后继续写读会 panic；
/// - **风险 (Trade-offs)**：不要把令牌暴露给处理不可信输入的边界，那里应当使用校验接口。
pub mod prevalidated {
    pub use crate::buffer::reservation::{ReadReservation, WriteReservation};
}
