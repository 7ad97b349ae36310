//! Batch transfer and wrap-around tests
//!
//! 批量传输与环绕测试

use crate::{Global, PushError, QueueConfig, Spsc};
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// SEGMENT 1: Batch Push/Pop
// 第1段：批量推送/弹出
// ============================================================================

#[test]
fn test_emplace_multiple_all_fit() {
    let mut queue: Spsc<i32> = Spsc::with_capacity(10);
    let (mut producer, mut consumer) = queue.split();

    let input = [1, 2, 3, 4, 5];
    assert!(producer.emplace_multiple(&input).is_empty());
    assert_eq!(producer.len(), 5);

    for expected in input {
        assert_eq!(consumer.pop(), Ok(expected));
    }
}

#[test]
fn test_emplace_multiple_partial() {
    let mut queue: Spsc<i32> = Spsc::with_capacity(3);
    let (mut producer, mut consumer) = queue.split();

    let rest = producer.emplace_multiple(&[1, 2, 3, 4, 5]);
    assert_eq!(rest, &[4, 5]);
    assert_eq!(producer.len(), 3);
    assert!(producer.is_full());

    // A full queue hands everything back
    // 满队列原样返回全部值
    assert_eq!(producer.emplace_multiple(rest), &[4, 5]);
    assert_eq!(consumer.drain().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_emplace_multiple_empty_input() {
    let mut queue: Spsc<i32> = Spsc::with_capacity(2);
    let (mut producer, _) = queue.split();

    assert!(producer.emplace_multiple(&[]).is_empty());
    assert!(producer.is_empty());
}

#[test]
fn test_emplace_multiple_from_moves_prefix() {
    let mut queue: Spsc<String> = Spsc::with_capacity(3);
    let (mut producer, mut consumer) = queue.split();

    let mut values: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
    assert_eq!(producer.emplace_multiple_from(&mut values), 3);
    assert_eq!(values, vec!["d".to_string(), "e".to_string()]);

    assert_eq!(consumer.pop().unwrap(), "a");
    assert_eq!(producer.emplace_multiple_from(&mut values), 1);
    assert_eq!(values, vec!["e".to_string()]);

    let drained: Vec<String> = consumer.drain().collect();
    assert_eq!(drained, vec!["b", "c", "d"]);
}

#[test]
fn test_pop_multiple_into_spare_capacity() {
    let mut queue: Spsc<i32> = Spsc::with_capacity(10);
    let (mut producer, mut consumer) = queue.split();

    for i in 0..5 {
        producer.emplace(i).unwrap();
    }

    let mut out = Vec::with_capacity(5);
    assert_eq!(consumer.pop_multiple(&mut out), 5);
    assert_eq!(out, vec![0, 1, 2, 3, 4]);
    assert!(consumer.is_empty());
}

#[test]
fn test_pop_multiple_limited_by_vector() {
    let mut queue: Spsc<i32> = Spsc::with_capacity(8);
    let (mut producer, mut consumer) = queue.split();
    assert!(producer.emplace_multiple(&[1, 2, 3, 4, 5, 6]).is_empty());

    let mut out = vec![0];
    out.reserve_exact(2);
    let spare = out.capacity() - out.len();

    assert_eq!(consumer.pop_multiple(&mut out), spare);
    assert_eq!(out.len(), 1 + spare);
    assert_eq!(out[1..], [1, 2, 3, 4, 5, 6][..spare]);
    assert_eq!(consumer.len(), 6 - spare);
}

#[test]
fn test_pop_multiple_without_room() {
    let mut queue: Spsc<i32> = Spsc::with_capacity(4);
    let (mut producer, mut consumer) = queue.split();
    producer.emplace(1).unwrap();

    // No spare capacity: nothing moves
    // 没有剩余容量：不移动任何元素
    let mut out: Vec<i32> = Vec::new();
    assert_eq!(consumer.pop_multiple(&mut out), 0);
    assert!(out.is_empty());
    assert_eq!(consumer.len(), 1);

    // Empty queue: the vector is untouched
    // 空队列：向量保持不变
    consumer.clear();
    let mut out = Vec::with_capacity(4);
    out.push(9);
    assert_eq!(consumer.pop_multiple(&mut out), 0);
    assert_eq!(out, vec![9]);
}

#[test]
fn test_batch_across_storage_end() {
    let mut queue: Spsc<u32> = Spsc::with_capacity(4);
    let (mut producer, mut consumer) = queue.split();

    // Move both indices to slot 3
    // 将两个索引都移动到槽位 3
    assert!(producer.emplace_multiple(&[0, 0, 0]).is_empty());
    let mut sink = Vec::with_capacity(3);
    consumer.pop_multiple(&mut sink);

    // One element before the end of storage, three after the start
    // 存储末尾前一个元素，开头之后三个元素
    assert!(producer.emplace_multiple(&[10, 11, 12, 13]).is_empty());
    let mut out = Vec::with_capacity(4);
    assert_eq!(consumer.pop_multiple(&mut out), 4);
    assert_eq!(out, vec![10, 11, 12, 13]);
}

#[test]
fn test_batch_drop_accounting() {
    let live = Arc::new(AtomicUsize::new(0));

    struct Tracked(Arc<AtomicUsize>);

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            self.0.fetch_add(1, Ordering::SeqCst);
            Tracked(self.0.clone())
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    live.fetch_add(3, Ordering::SeqCst);
    let originals = vec![Tracked(live.clone()), Tracked(live.clone()), Tracked(live.clone())];
    {
        let mut queue: Spsc<Tracked> = Spsc::with_capacity(2);
        let (mut producer, mut consumer) = queue.split();

        assert_eq!(producer.emplace_multiple(&originals).len(), 1);
        assert_eq!(live.load(Ordering::SeqCst), 5);

        assert!(consumer.pop().is_ok());
        assert_eq!(live.load(Ordering::SeqCst), 4);
    }
    // The clone left in the queue went with it
    // 留在队列中的克隆随队列一同释放
    assert_eq!(live.load(Ordering::SeqCst), 3);
    drop(originals);
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[test]
fn test_emplace_multiple_clone_panic_publishes_nothing() {
    #[derive(Debug)]
    struct Brittle(u32);

    impl Clone for Brittle {
        fn clone(&self) -> Self {
            assert_ne!(self.0, 13, "unlucky clone");
            Brittle(self.0)
        }
    }

    let mut queue: Spsc<Brittle> = Spsc::with_capacity(4);
    let (mut producer, mut consumer) = queue.split();

    let values = [Brittle(1), Brittle(2), Brittle(13)];
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        producer.emplace_multiple(&values);
    }));
    assert!(result.is_err());
    assert!(producer.is_empty());
    assert!(consumer.pop().is_err());

    // The queue keeps working afterwards
    // 之后队列仍可正常工作
    assert!(producer.emplace_multiple(&values[..2]).is_empty());
    assert_eq!(consumer.pop().unwrap().0, 1);
    assert_eq!(consumer.pop().unwrap().0, 2);
}

// ============================================================================
// SEGMENT 2: Index Space Wrap-Around
// 第2段：索引空间环绕
// ============================================================================

#[test]
fn test_index_space_wraps_transparently() {
    // index_end = 6, so the unwrapped indices reset every two laps
    // index_end = 6，未环绕索引每两圈归零一次
    let mut queue: Spsc<u32> = Spsc::new();
    queue.allocate_with(Global, QueueConfig::new(3).with_index_limit(7));

    {
        let (mut producer, mut consumer) = queue.split();
        let mut next = 0u32;
        let mut expected = 0u32;

        for round in 0..100 {
            let burst = (round % 3) + 1;
            for _ in 0..burst {
                producer.emplace(next).unwrap();
                next += 1;
            }
            assert_eq!(producer.len(), burst as usize);
            for _ in 0..burst {
                assert_eq!(consumer.pop(), Ok(expected));
                expected += 1;
            }
        }
        assert!(consumer.is_empty());
    }

    unsafe { queue.free(Global) };
}

#[test]
fn test_index_space_wraps_with_batches() {
    let mut queue: Spsc<u32> = Spsc::new();
    queue.allocate_with(Global, QueueConfig::new(4).with_index_limit(8));

    {
        let (mut producer, mut consumer) = queue.split();
        let mut out = Vec::with_capacity(4);

        for round in 0..50u32 {
            let base = round * 10;
            let input = [base, base + 1, base + 2, base + 3, base + 4];
            let rest = producer.emplace_multiple(&input);
            assert_eq!(rest, &[base + 4]);
            assert_eq!(producer.emplace(base + 4), Err(PushError::Full(base + 4)));

            out.clear();
            assert_eq!(consumer.pop_multiple(&mut out), 4);
            assert_eq!(out[0], base);
            consumer.clear();
        }
    }

    unsafe { queue.free(Global) };
}

#[test]
fn test_minimum_index_limit() {
    let mut queue: Spsc<u8> = Spsc::new();
    queue.allocate_with(Global, QueueConfig::new(1).with_index_limit(2));

    {
        let (mut producer, mut consumer) = queue.split();
        for i in 0..20 {
            producer.emplace(i).unwrap();
            assert!(producer.is_full());
            assert_eq!(consumer.pop(), Ok(i));
        }
    }

    unsafe { queue.free(Global) };
}

// ============================================================================
// SEGMENT 3: Model-Based Property Test
// 第3段：基于模型的属性测试
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    Pop,
    PushMany(Vec<u32>),
    PushManyFrom(Vec<u32>),
    PopMany(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::Push),
        Just(Op::Pop),
        prop::collection::vec(any::<u32>(), 0..8).prop_map(Op::PushMany),
        prop::collection::vec(any::<u32>(), 0..8).prop_map(Op::PushManyFrom),
        (0usize..8).prop_map(Op::PopMany),
    ]
}

proptest! {
    #[test]
    fn test_matches_vecdeque_model(
        capacity in 1usize..6,
        laps in 2usize..4,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mut queue: Spsc<u32> = Spsc::new();
        queue.allocate_with(Global, QueueConfig::new(capacity).with_index_limit(capacity * laps));
        let mut model: VecDeque<u32> = VecDeque::new();

        {
            let (mut producer, mut consumer) = queue.split();

            for op in ops {
                let room = capacity - model.len();
                match op {
                    Op::Push(value) => {
                        let result = producer.emplace(value);
                        if room > 0 {
                            prop_assert!(result.is_ok());
                            model.push_back(value);
                        } else {
                            prop_assert_eq!(result, Err(PushError::Full(value)));
                        }
                    }
                    Op::Pop => {
                        prop_assert_eq!(consumer.pop().ok(), model.pop_front());
                    }
                    Op::PushMany(values) => {
                        let fit = room.min(values.len());
                        let rest = producer.emplace_multiple(&values);
                        prop_assert_eq!(rest, &values[fit..]);
                        model.extend(&values[..fit]);
                    }
                    Op::PushManyFrom(mut values) => {
                        let fit = room.min(values.len());
                        let pushed = values[..fit].to_vec();
                        let rest = values[fit..].to_vec();
                        prop_assert_eq!(producer.emplace_multiple_from(&mut values), fit);
                        prop_assert_eq!(&values, &rest);
                        model.extend(pushed);
                    }
                    Op::PopMany(spare) => {
                        let mut out = Vec::with_capacity(spare);
                        let room_out = out.capacity();
                        let expected: Vec<u32> =
                            model.drain(..room_out.min(model.len())).collect();
                        prop_assert_eq!(consumer.pop_multiple(&mut out), expected.len());
                        prop_assert_eq!(out, expected);
                    }
                }

                prop_assert_eq!(producer.len(), model.len());
                prop_assert_eq!(consumer.is_empty(), model.is_empty());
                prop_assert_eq!(producer.is_full(), model.len() == capacity);
            }

            consumer.clear();
        }

        unsafe { queue.free(Global) };
    }
}
