//! Error types
//!
//! 错误类型
//!
//! Two classes of outcome exist:
//! - Misuse faults ([`Fault`]) describe a broken caller invariant. The queue reports them
//!   through [`fault`], which logs and panics (abort with `panic = "abort"`).
//! - Operational outcomes ([`PushError`], [`PopError`]) are ordinary control flow.
//!
//! 存在两类结果：
//! - 误用故障（[`Fault`]）表示调用方破坏了不变量，通过 [`fault`] 记录并 panic。
//! - 运行结果（[`PushError`]、[`PopError`]）属于正常控制流。

use crate::trace::error;

/// Programmer-misuse fault
///
/// 编程误用故障
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// Storage is already bound to the queue
    ///
    /// 队列已绑定存储
    #[error("can't allocate while still owning memory")]
    AlreadyAllocated,

    /// No storage is bound to the queue
    ///
    /// 队列未绑定存储
    #[error("no storage is bound to the queue")]
    Unallocated,

    /// Capacity must be positive
    ///
    /// 容量必须为正数
    #[error("invalid capacity {0}")]
    InvalidCapacity(usize),

    /// The index space can't hold two full wrap-arounds
    ///
    /// 索引空间无法容纳两次完整环绕
    #[error("not enough wrap-arounds: capacity {capacity} with index limit {index_limit}")]
    NotEnoughWrapArounds { capacity: usize, index_limit: usize },

    /// Byte size of the storage overflows
    ///
    /// 存储字节数溢出
    #[error("storage for {capacity} elements overflows the address space")]
    CapacityOverflow { capacity: usize },

    /// The allocator returned no memory
    ///
    /// 分配器未返回内存
    #[error("memory allocation failed: {size} bytes aligned to {align}")]
    AllocationFailed { size: usize, align: usize },

    /// Storage can only be released once the queue is drained
    ///
    /// 只有在队列清空后才能释放存储
    #[error("can't free until empty: {len} elements left")]
    NotEmpty { len: usize },
}

/// Report a misuse fault and stop
///
/// 报告误用故障并终止
#[cold]
#[track_caller]
pub(crate) fn fault(fault: Fault) -> ! {
    error!(%fault, "queue misuse");
    panic!("{fault}");
}

/// Error for push operations
///
/// push 操作的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError<T> {
    /// Queue is full, the value is handed back untouched
    ///
    /// 队列已满，原值被原样返回
    Full(T),
}

impl<T> PushError<T> {
    /// Recover the value that could not be pushed
    ///
    /// 取回未能推送的值
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            PushError::Full(value) => value,
        }
    }
}

/// Error for pop operations
///
/// pop 操作的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopError {
    /// Queue is empty
    ///
    /// 队列为空
    Empty,
}
