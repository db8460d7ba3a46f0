//! `GrowingBuffer` 性质验证
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：以 Proptest 生成任意读写与压缩序列，验证游标偏序不变量
//!   `read <= write <= capacity <= max_capacity` 始终成立，且失败操作对缓冲零影响。
//! - **设计手法 (How)**：维护一个以 `Vec<u8>` 表示的影子模型（已写入字节 + 读偏移），
//!   每一步同时驱动真实缓冲与模型，逐步比对可观测状态。
//! - **合同与边界 (What)**：模型只描述字节内容与游标，不描述扩容后的具体容量；
//!   容量只通过不变量与“从不缩容”两条性质约束。

use growbuf::GrowingBuffer;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Put(Vec<u8>),
    Get(usize),
    Pop(usize),
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::Put),
        3 => (0usize..32).prop_map(Op::Get),
        2 => (0usize..80).prop_map(Op::Pop),
        1 => Just(Op::Reset),
    ]
}

/// 影子模型：已写入字节与读偏移。
#[derive(Default)]
struct Model {
    written: Vec<u8>,
    read: usize,
}

fn assert_invariants(buffer: &GrowingBuffer) {
    assert!(buffer.read_cursor() <= buffer.write_cursor());
    assert!(buffer.write_cursor() <= buffer.capacity());
    assert!(buffer.capacity() <= buffer.max_capacity());
}

proptest! {
    /// 任意成功写入总量 L、读取总量 K <= L 时，剩余可读量为 L - K 且字节保序。
    #[test]
    fn prop_put_then_get_round_trips(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..16),
        take in 0usize..512,
    ) {
        let mut buffer = GrowingBuffer::new(4096, 0, 0);
        let mut expected = Vec::new();
        for chunk in &chunks {
            buffer.put_bytes(chunk).expect("未超过上限");
            expected.extend_from_slice(chunk);
        }
        let take = take.min(expected.len());
        let got = buffer.get_bytes(take).expect("读取量不超过写入量");
        prop_assert_eq!(&got[..], &expected[..take]);
        prop_assert_eq!(buffer.readable_size(), expected.len() - take);
        prop_assert_eq!(buffer.readable(), &expected[take..]);
    }

    /// 超过上限的写入不改变游标与已写入字节。
    #[test]
    fn prop_rejected_put_leaves_state(
        max in 1usize..64,
        first in prop::collection::vec(any::<u8>(), 0..64),
        extra in 1usize..64,
    ) {
        let mut buffer = GrowingBuffer::new(max, 0, 0);
        let accepted = buffer.put_bytes(&first).is_ok();
        prop_assert_eq!(accepted, first.len() <= max);
        let before_write = buffer.write_cursor();
        let before_bytes = buffer.written().to_vec();
        let overflow = vec![0xAB; max - before_write + extra];
        prop_assert!(buffer.put_bytes(&overflow).is_err());
        prop_assert_eq!(buffer.write_cursor(), before_write);
        prop_assert_eq!(buffer.read_cursor(), 0);
        prop_assert_eq!(buffer.written(), &before_bytes[..]);
        prop_assert!(buffer.has_fault());
    }

    /// 超过可读量的读取不改变游标。
    #[test]
    fn prop_rejected_get_leaves_cursors(
        data in prop::collection::vec(any::<u8>(), 0..64),
        consumed in 0usize..64,
        excess in 1usize..16,
    ) {
        let mut buffer = GrowingBuffer::new(1024, 0, 0);
        buffer.put_bytes(&data).expect("写入");
        buffer.skip(consumed.min(data.len())).expect("跳过部分");
        let (read, write) = (buffer.read_cursor(), buffer.write_cursor());
        prop_assert!(buffer.get_bytes(buffer.readable_size() + excess).is_err());
        prop_assert_eq!(buffer.read_cursor(), read);
        prop_assert_eq!(buffer.write_cursor(), write);
    }

    /// `pop_front(n)`（`n <= write_cursor`）把 `[n, write)` 搬到 `[0, write - n)`。
    #[test]
    fn prop_pop_front_shifts_written_bytes(
        data in prop::collection::vec(any::<u8>(), 0..64),
        pop in 0usize..64,
        read in 0usize..64,
    ) {
        let mut buffer = GrowingBuffer::new(1024, 0, 0);
        buffer.put_bytes(&data).expect("写入");
        let pop = pop.min(data.len());
        let read = read.min(data.len());
        buffer.skip(read).expect("推进读游标");
        buffer.pop_front(pop);
        prop_assert_eq!(buffer.write_cursor(), data.len() - pop);
        prop_assert_eq!(buffer.written(), &data[pop..]);
        prop_assert_eq!(buffer.read_cursor(), read.saturating_sub(pop));
    }

    /// `pop_front(n)`（`n > capacity`）无论内容如何都归零游标。
    #[test]
    fn prop_pop_beyond_capacity_resets(
        data in prop::collection::vec(any::<u8>(), 0..64),
        beyond in 1usize..1024,
    ) {
        let mut buffer = GrowingBuffer::new(1024, 0, 0);
        buffer.put_bytes(&data).expect("写入");
        let capacity = buffer.capacity();
        buffer.pop_front(capacity + beyond);
        prop_assert_eq!(buffer.write_cursor(), 0);
        prop_assert_eq!(buffer.read_cursor(), 0);
        prop_assert_eq!(buffer.capacity(), capacity);
    }

    /// 副本在复制时刻字节一致，之后的写入互不影响。
    #[test]
    fn prop_clone_is_independent(
        data in prop::collection::vec(any::<u8>(), 0..64),
        tail_a in prop::collection::vec(any::<u8>(), 1..16),
        tail_b in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        let mut original = GrowingBuffer::new(1024, 3, 0);
        original.put_bytes(&data).expect("写入");
        let mut copy = original.clone();
        prop_assert_eq!(copy.written(), original.written());
        original.put_bytes(&tail_a).expect("写入原件");
        copy.put_bytes(&tail_b).expect("写入副本");
        prop_assert_eq!(&original.written()[data.len()..], &tail_a[..]);
        prop_assert_eq!(&copy.written()[data.len()..], &tail_b[..]);
    }

    /// 任意操作序列下不变量成立，且与影子模型保持一致；容量从不缩小。
    #[test]
    fn prop_random_sequences_match_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut buffer = GrowingBuffer::new(64, 2, 0);
        let mut model = Model::default();
        let mut last_capacity = 0;
        for op in ops {
            match op {
                Op::Put(bytes) => {
                    let fits = model.written.len() + bytes.len() <= buffer.max_capacity();
                    prop_assert_eq!(buffer.put_bytes(&bytes).is_ok(), fits);
                    if fits {
                        model.written.extend_from_slice(&bytes);
                    }
                }
                Op::Get(len) => {
                    let available = model.written.len() - model.read;
                    match buffer.get_bytes(len) {
                        Ok(got) => {
                            prop_assert!(len <= available);
                            prop_assert_eq!(&got[..], &model.written[model.read..model.read + len]);
                            model.read += len;
                        }
                        Err(_) => prop_assert!(len > available),
                    }
                }
                Op::Pop(count) => {
                    if count > buffer.capacity() || count > model.written.len() {
                        model.written.clear();
                        model.read = 0;
                    } else {
                        model.written.drain(..count);
                        model.read = model.read.saturating_sub(count);
                    }
                    buffer.pop_front(count);
                }
                Op::Reset => {
                    buffer.reset();
                    model.written.clear();
                    model.read = 0;
                }
            }
            assert_invariants(&buffer);
            prop_assert!(buffer.capacity() >= last_capacity);
            last_capacity = buffer.capacity();
            prop_assert_eq!(buffer.written(), &model.written[..]);
            prop_assert_eq!(buffer.read_cursor(), model.read);
        }
    }
}
