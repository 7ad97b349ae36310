//! # Lock-Free SPSC Queue over Caller-Supplied Storage
//!
//! 基于调用方提供存储的无锁 SPSC 队列
//!
//! `waitring` is a bounded single-producer/single-consumer queue. Storage comes from an
//! allocator the caller passes in, transfers never take a lock, and an optional wait
//! policy lets either side park instead of spinning on a full or empty queue.
//!
//! `waitring` 是一个有界的单生产者/单消费者队列。存储来自调用方传入的分配器，
//! 数据传输从不加锁；可选的等待策略允许任一端在队列满或空时挂起而不是自旋。
//!
//! ## Features
//!
//! 特性
//!
//! - **Lock-Free transfers** - One acquire load and one release store per operation
//! - **Caller-owned memory** - Any [`RawAllocator`], one block per binding
//! - **Batch operations** - Multi-element pushes and pops split into at most two runs
//! - **Compile-time wait policies** - Blocking methods exist only where the policy allows
//! - **Shutdown signal** - [`Spsc::end_pop_waiting`] releases a parked consumer
//!
//! - **无锁传输** - 每次操作一次 acquire 加载和一次 release 存储
//! - **调用方拥有内存** - 任意 [`RawAllocator`]，每次绑定一块内存
//! - **批量操作** - 多元素推送与弹出最多拆分为两段连续区间
//! - **编译期等待策略** - 阻塞方法仅在策略允许时存在
//! - **关闭信号** - [`Spsc::end_pop_waiting`] 唤醒挂起的消费者
//!
//! ## Quick Start
//!
//! 快速开始
//!
//! ```rust
//! use waitring::{Global, Spsc};
//!
//! let mut queue: Spsc<i32> = Spsc::new();
//! queue.allocate(Global, 4);
//!
//! {
//!     let (mut producer, mut consumer) = queue.split();
//!
//!     // Producer pushes data
//!     // 生产者推送数据
//!     for i in 0..4 {
//!         producer.emplace(i).unwrap();
//!     }
//!     assert!(producer.emplace(4).is_err());
//!
//!     // Consumer pops data
//!     // 消费者获取数据
//!     assert_eq!(consumer.pop(), Ok(0));
//!     assert_eq!(consumer.len(), 3);
//!     consumer.clear();
//! }
//!
//! // The queue must be empty before the storage goes back
//! // 归还存储前队列必须为空
//! unsafe { queue.free(Global) };
//! ```
//!
//! ## Batch Operations
//!
//! 批量操作
//!
//! ```rust
//! use waitring::Spsc;
//!
//! let mut queue: Spsc<u32> = Spsc::with_capacity(3);
//! let (mut producer, mut consumer) = queue.split();
//!
//! // Whatever does not fit is handed back
//! // 放不下的部分被原样返回
//! let rest = producer.emplace_multiple(&[1, 2, 3, 4, 5]);
//! assert_eq!(rest, &[4, 5]);
//!
//! // Pops fill the spare capacity of the vector, never more
//! // 弹出只填充向量的剩余容量
//! let mut out = Vec::with_capacity(2);
//! assert_eq!(consumer.pop_multiple(&mut out), 2);
//! assert_eq!(out, vec![1, 2]);
//! ```
//!
//! ## Blocking and Shutdown
//!
//! 阻塞与关闭
//!
//! ```rust
//! use std::thread;
//! use waitring::{BothAwait, Spsc};
//!
//! let queue: Spsc<String, BothAwait> = Spsc::with_capacity(4);
//! let (mut producer, mut consumer) = queue.into_split();
//!
//! let producer_handle = thread::spawn(move || {
//!     for i in 0..100 {
//!         producer.emplace_await(format!("Message {i}"));
//!     }
//!     // No more data: the consumer returns once it has drained the queue
//!     // 没有更多数据：消费者清空队列后返回
//!     producer.end_pop_waiting();
//! });
//!
//! let mut received = Vec::new();
//! while let Some(msg) = consumer.pop_await() {
//!     received.push(msg);
//! }
//!
//! producer_handle.join().unwrap();
//! assert_eq!(received.len(), 100);
//! assert_eq!(received[99], "Message 99");
//! ```
//!
//! ## Notes
//!
//! 注意事项
//!
//! - Storage bound with [`Spsc::allocate`] must be released with [`Spsc::free`] and the
//!   same allocator; a queue dropped while still bound drops its elements and leaks the
//!   block. [`Spsc::with_capacity`] and [`Spsc::scoped`] release automatically.
//! - Misuse (double allocation, freeing a non-empty queue, zero capacity) is reported as a
//!   [`Fault`]: logged, then a panic.
//! - Enable the `tracing` feature and call [`init_tracing`] to see queue events.
//!
//! - 通过 [`Spsc::allocate`] 绑定的存储必须用同一分配器调用 [`Spsc::free`] 释放；
//!   仍处于绑定状态时被 drop 的队列会 drop 其元素并泄漏内存块。
//!   [`Spsc::with_capacity`] 和 [`Spsc::scoped`] 会自动释放。
//! - 误用（重复分配、释放非空队列、零容量）以 [`Fault`] 报告：先记录日志，再 panic。
//! - 启用 `tracing` 特性并调用 [`init_tracing`] 以查看队列事件。

pub mod allocator;
pub mod config;
mod core;
pub mod error;
mod park;
pub mod policy;
mod shim;
pub mod spsc;
mod trace;

pub use allocator::{CACHE_LINE, Global, RawAllocator};
pub use config::{DEFAULT_INDEX_LIMIT, QueueConfig};
pub use error::{Fault, PopError, PushError};
pub use policy::{AwaitPop, AwaitPush, BothAwait, NoWaits, PopAwait, PushAwait, WaitPolicy};
pub use spsc::{Consumer, Drain, Producer, Spsc};
pub use trace::init_tracing;
