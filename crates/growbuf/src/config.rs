//! 缓冲构造参数与其 TOML 装载。
//!
//! # 角色定位（Why）
//! - 每条连接的缓冲上限、安全区大小、预分配量属于部署参数，需要随服务器配置文件调整，
//!   而不是散落在调用点的常量里；
//! - 统一在装载阶段校验参数，避免运行期才发现“上限为 0 的缓冲永远写不进数据”。
//!
//! # 契约说明（What）
//! - 字段缺省时回落到 [`BufferConfig::default`]；未知字段直接拒绝，防止拼写错误被静默忽略；
//! - [`BufferConfig::from_toml_str`] 仅在 `std` 特性下可用。

use alloc::string::String;

use serde::Deserialize;
use thiserror::Error;

use crate::buffer::DEFAULT_MAX_CAPACITY;

/// 构造 [`GrowingBuffer`](crate::GrowingBuffer) 所需的参数。
///
/// # 字段
/// - `max_capacity`：逻辑容量的硬上限，扩容请求超过该值时失败；
/// - `safe_area`：逻辑容量之后额外分配、校验接口不可见的填充字节，至多 255，
///   超出范围的取值在解析阶段即被拒绝；
/// - `preallocate`：构造时预分配的容量，按 8 字节向上取整并截断到 `max_capacity`。
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    pub max_capacity: usize,
    pub safe_area: u8,
    pub preallocate: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
            safe_area: 0,
            preallocate: 0,
        }
    }
}

/// 配置装载与校验错误。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// 上限为 0 的缓冲无法写入任何数据。
    #[error("max_capacity must be greater than zero")]
    ZeroCapacity,

    /// 预分配量超过上限。
    #[error("preallocate ({preallocate} bytes) exceeds max_capacity ({max_capacity} bytes)")]
    PreallocateExceedsMax {
        preallocate: usize,
        max_capacity: usize,
    },

    /// TOML 文本无法解析为配置结构。
    #[error("invalid buffer configuration: {0}")]
    Parse(String),
}

impl BufferConfig {
    /// 以给定上限构造配置，其余字段取默认值。
    pub fn with_max_capacity(max_capacity: usize) -> Self {
        Self {
            max_capacity,
            ..Self::default()
        }
    }

    /// 校验字段之间的约束。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.preallocate > self.max_capacity {
            return Err(ConfigError::PreallocateExceedsMax {
                preallocate: self.preallocate,
                max_capacity: self.max_capacity,
            });
        }
        Ok(())
    }

    /// 从 TOML 文本装载并校验配置。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：服务器的连接参数与其它部署配置共存于同一份 TOML 文件，
    ///   调用方截取缓冲对应的表后交给本函数即可；
    /// - **执行 (How)**：`toml::from_str` 映射为强类型结构，解析错误转为
    ///   [`ConfigError::Parse`]，随后执行 [`validate`](Self::validate)；
    /// - **契约 (What)**：返回的配置一定满足 `validate` 的全部约束。
    #[cfg(feature = "std")]
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        use alloc::string::ToString;

        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
