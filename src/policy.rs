//! Wait policies
//!
//! 等待策略
//!
//! A queue is parameterized by a zero-sized policy type that decides, at compile time,
//! which side may park instead of returning on full/empty. The blocking methods are
//! only implemented when the policy carries the matching capability trait:
//!
//! 队列由零大小的策略类型参数化，在编译期决定哪一端可以在满/空时挂起。
//! 只有策略实现了对应的能力 trait 时，阻塞方法才可用：
//!
//! | Policy | `emplace_await` | `pop_await` / `end_pop_waiting` |
//! |---|---|---|
//! | [`NoWaits`] | - | - |
//! | [`PushAwait`] | yes | - |
//! | [`PopAwait`] | - | yes |
//! | [`BothAwait`] | yes | yes |

mod sealed {
    pub trait Sealed {}
}

/// Compile-time wait policy
///
/// 编译期等待策略
pub trait WaitPolicy: sealed::Sealed + Send + Sync + 'static {
    /// Producers may park while the queue is full
    ///
    /// 队列满时生产者可以挂起
    const PUSH_AWAIT: bool;

    /// Consumers may park while the queue is empty
    ///
    /// 队列空时消费者可以挂起
    const POP_AWAIT: bool;
}

/// Capability: blocking push operations
///
/// 能力：阻塞式推送
pub trait AwaitPush: WaitPolicy {}

/// Capability: blocking pop operations and the shutdown signal
///
/// 能力：阻塞式弹出及关闭信号
pub trait AwaitPop: WaitPolicy {}

/// Never park
///
/// 从不挂起
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoWaits;

/// Producer parks while full
///
/// 满时生产者挂起
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushAwait;

/// Consumer parks while empty
///
/// 空时消费者挂起
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopAwait;

/// Both sides may park
///
/// 两端均可挂起
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BothAwait;

macro_rules! wait_policy {
    ($policy:ty, push: $push:literal, pop: $pop:literal) => {
        impl sealed::Sealed for $policy {}

        impl WaitPolicy for $policy {
            const PUSH_AWAIT: bool = $push;
            const POP_AWAIT: bool = $pop;
        }
    };
}

wait_policy!(NoWaits, push: false, pop: false);
wait_policy!(PushAwait, push: true, pop: false);
wait_policy!(PopAwait, push: false, pop: true);
wait_policy!(BothAwait, push: true, pop: true);

impl AwaitPush for PushAwait {}
impl AwaitPush for BothAwait {}
impl AwaitPop for PopAwait {}
impl AwaitPop for BothAwait {}
