//! 定长标量的小端编解码。

mod sealed {
    pub trait Sealed {}
}

/// 可按固定宽度写入缓冲的标量类型。
///
/// # 契约说明（What）
/// - `SIZE` 为编码后的字节数，`write_le` 与 `read_le` 接收的切片长度恰好等于 `SIZE`；
/// - 统一使用小端序，与客户端协议的线上布局保持一致；
/// - trait 已封闭，外部类型需经由协议编码层转换为这里列出的标量。
pub trait WireValue: Copy + sealed::Sealed {
    /// 编码宽度（字节）。
    const SIZE: usize;

    /// 将值写入长度为 `SIZE` 的切片。
    fn write_le(self, dst: &mut [u8]);

    /// 从长度为 `SIZE` 的切片读出值。
    fn read_le(src: &[u8]) -> Self;
}

macro_rules! impl_wire_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl WireValue for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn write_le(self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_le_bytes());
                }

                fn read_le(src: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(src);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_wire_value!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl sealed::Sealed for bool {}

impl WireValue for bool {
    const SIZE: usize = 1;

    fn write_le(self, dst: &mut [u8]) {
        dst[0] = u8::from(self);
    }

    // 任何非零字节都视为 true。
    fn read_le(src: &[u8]) -> Self {
        src[0] != 0
    }
}
