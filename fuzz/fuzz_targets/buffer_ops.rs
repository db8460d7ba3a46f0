#![no_main]

use arbitrary::Arbitrary;
use growbuf::GrowingBuffer;
use libfuzzer_sys::fuzz_target;

/// Fuzz 指令：一次缓冲的构造参数与操作序列。
///
/// - **Why**：传输层收到的字节长度完全由对端决定，扩容、压缩与预留令牌的组合路径必须在任意输入下
///   保持游标偏序并且不越界；
/// - **How**：随机选择上限、安全区与预分配量，再顺序执行写入、读取、压缩、预留等操作；
/// - **What**：每一步之后断言 `read <= write <= capacity <= max_capacity`，并校验失败操作对游标零影响。
#[derive(Debug, Arbitrary)]
struct BufferCase {
    max_capacity: u16,
    safe_area: u8,
    preallocate: u16,
    ops: Vec<BufferOp>,
}

#[derive(Debug, Arbitrary)]
enum BufferOp {
    Put(Vec<u8>),
    PutString(String),
    PutValue(u32),
    Get(u16),
    GetString,
    GetValue,
    Pop(u16),
    Reserve(u16),
    ReserveWrite { len: u8, fill: Vec<u8> },
    ReserveRead(u8),
    Clone,
    Reset,
}

fuzz_target!(|case: BufferCase| {
    let mut buffer = GrowingBuffer::new(
        usize::from(case.max_capacity),
        case.safe_area,
        usize::from(case.preallocate),
    );

    for op in case.ops {
        let before = (buffer.read_cursor(), buffer.write_cursor());
        match op {
            BufferOp::Put(bytes) => {
                if buffer.put_bytes(&bytes).is_err() {
                    assert_eq!(before, (buffer.read_cursor(), buffer.write_cursor()));
                }
            }
            BufferOp::PutString(text) => {
                let _ = buffer.put_string(&text);
            }
            BufferOp::PutValue(value) => {
                let _ = buffer.put_value(value);
            }
            BufferOp::Get(len) => {
                if buffer.get_bytes(usize::from(len)).is_err() {
                    assert_eq!(before, (buffer.read_cursor(), buffer.write_cursor()));
                }
            }
            BufferOp::GetString => {
                if buffer.get_string().is_err() {
                    assert_eq!(before, (buffer.read_cursor(), buffer.write_cursor()));
                }
            }
            BufferOp::GetValue => {
                let _ = buffer.get_value::<u32>();
            }
            BufferOp::Pop(count) => buffer.pop_front(usize::from(count)),
            BufferOp::Reserve(target) => {
                let _ = buffer.reserve(usize::from(target));
            }
            BufferOp::ReserveWrite { len, fill } => {
                if let Ok(mut record) = buffer.reserve_write(usize::from(len)) {
                    let n = fill.len().min(record.remaining());
                    record.put_bytes(&fill[..n]);
                    let window = record.spare_mut();
                    let spill = window.len().min(4);
                    window[..spill].fill(0xEE);
                    let _ = record.commit(spill);
                }
            }
            BufferOp::ReserveRead(len) => {
                if let Ok(mut frame) = buffer.reserve_read(usize::from(len)) {
                    let _ = frame.get_string();
                    let rest = frame.remaining();
                    frame.get_bytes(rest);
                }
            }
            BufferOp::Clone => {
                let copy = buffer.clone();
                assert_eq!(copy.written(), buffer.written());
                buffer = copy;
            }
            BufferOp::Reset => buffer.reset(),
        }
        buffer.clear_fault();
        assert!(buffer.read_cursor() <= buffer.write_cursor());
        assert!(buffer.write_cursor() <= buffer.capacity());
        assert!(buffer.capacity() <= buffer.max_capacity());
    }
});
