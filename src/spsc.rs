/// Lock-free SPSC bounded queue over caller-supplied storage
///
/// 基于调用方提供存储的无锁 SPSC 有界队列
///
/// The queue itself is a passive block of shared state: three cache-padded cells (push
/// index, pop index, size) plus the bound storage. Transfers go through the two role
/// handles returned by [`Spsc::split`] / [`Spsc::into_split`], so exactly one thread
/// can push and exactly one thread can pop.
///
/// 队列本身是被动的共享状态：三个缓存行填充的单元（推送索引、弹出索引、大小）加上
/// 已绑定的存储。数据传输通过 [`Spsc::split`] / [`Spsc::into_split`] 返回的两个角色句柄
/// 完成，因此只有一个线程能推送、一个线程能弹出。
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr;

use crossbeam_utils::CachePadded;

use crate::allocator::{Global, RawAllocator, storage_layout};
use crate::config::QueueConfig;
use crate::core::{RingCore, index_end};
use crate::error::{Fault, PopError, PushError, fault};
use crate::park::Parker;
use crate::policy::{AwaitPop, AwaitPush, NoWaits, WaitPolicy};
use crate::shim::atomic::{AtomicUsize, Ordering};
use crate::shim::sync::Arc;
use crate::trace::{debug, trace, warn};

/// Top bit of the size cell: no more data will arrive for blocked consumers
///
/// 大小单元的最高位：阻塞的消费者将不会再收到数据
const ENDING: usize = 1 << (usize::BITS - 1);

/// Bits of the size cell holding the live count
const COUNT_MASK: usize = !ENDING;

type PhantomUnsync = PhantomData<Cell<&'static ()>>;

/// Who releases the storage when a still-bound queue is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    /// Bound through `allocate`, only the caller can free it
    Caller,
    /// Bound through `with_capacity`, released to [`Global`] on drop
    Global,
    /// Bound by `scoped`, released to the scope's allocator when the scope ends
    Scope,
}

struct Binding<T> {
    core: RingCore<T>,
    owner: Owner,
}

/// Single-producer/single-consumer bounded queue
///
/// 单生产者/单消费者有界队列
///
/// # Type Parameters
/// - `T`: Element type
/// - `W`: Wait policy, see [`crate::policy`]
///
/// # 类型参数
/// - `T`: 元素类型
/// - `W`: 等待策略，参见 [`crate::policy`]
///
/// # Examples
///
/// ```
/// use waitring::{Global, Spsc};
///
/// let mut queue: Spsc<u32> = Spsc::new();
/// queue.allocate(Global, 4);
///
/// {
///     let (mut producer, mut consumer) = queue.split();
///     producer.emplace(7).unwrap();
///     assert_eq!(consumer.pop(), Ok(7));
/// }
///
/// unsafe { queue.free(Global) };
/// ```
pub struct Spsc<T, W = NoWaits> {
    /// Next slot to write, owned by the producer
    ///
    /// 下一个写入位置，由生产者拥有
    push_index: CachePadded<AtomicUsize>,

    /// Next slot to read, owned by the consumer
    ///
    /// 下一个读取位置，由消费者拥有
    pop_index: CachePadded<AtomicUsize>,

    /// Live count plus the `ENDING` flag
    ///
    /// 存活元素数量加上 `ENDING` 标志
    size: CachePadded<AtomicUsize>,

    binding: Option<Binding<T>>,
    parker: Parker,
    _policy: PhantomData<fn() -> W>,
}

// SAFETY: values move between threads through the queue, and each slot is touched by one
// side at a time as handed over by the index cells.
unsafe impl<T: Send, W> Send for Spsc<T, W> {}
unsafe impl<T: Send, W> Sync for Spsc<T, W> {}

impl<T, W> Spsc<T, W> {
    /// Create an unallocated queue
    ///
    /// 创建未分配的队列
    pub fn new() -> Self {
        Self {
            push_index: CachePadded::new(AtomicUsize::new(0)),
            pop_index: CachePadded::new(AtomicUsize::new(0)),
            size: CachePadded::new(AtomicUsize::new(0)),
            binding: None,
            parker: Parker::new(),
            _policy: PhantomData,
        }
    }

    /// Create a queue bound to the global heap, released on drop
    ///
    /// 创建绑定到全局堆的队列，drop 时释放
    ///
    /// # Panics
    /// On the same faults as [`allocate`](Spsc::allocate).
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(QueueConfig::new(capacity))
    }

    /// [`with_capacity`](Spsc::with_capacity) with an explicit configuration
    ///
    /// 使用显式配置的 [`with_capacity`](Spsc::with_capacity)
    #[track_caller]
    pub fn with_config(config: QueueConfig) -> Self {
        let mut queue = Self::new();
        if let Err(err) = queue.bind(Global, config, Owner::Global) {
            fault(err);
        }
        queue
    }

    /// Bind storage from `allocator`
    ///
    /// 从 `allocator` 绑定存储
    ///
    /// # Errors
    /// - [`Fault::AlreadyAllocated`] if storage is already bound
    /// - [`Fault::InvalidCapacity`] if the capacity is zero
    /// - [`Fault::NotEnoughWrapArounds`] if the index limit is below two capacities
    /// - [`Fault::CapacityOverflow`] if the byte size overflows
    /// - [`Fault::AllocationFailed`] if the allocator returns nothing
    pub fn try_allocate<A: RawAllocator>(
        &mut self,
        allocator: A,
        config: QueueConfig,
    ) -> Result<(), Fault> {
        self.bind(allocator, config, Owner::Caller)
    }

    /// Bind `capacity` slots from `allocator`
    ///
    /// 从 `allocator` 绑定 `capacity` 个槽位
    ///
    /// The same allocator must later be passed to [`free`](Spsc::free).
    ///
    /// 之后必须将同一个分配器传给 [`free`](Spsc::free)。
    ///
    /// # Panics
    /// On any fault listed for [`try_allocate`](Spsc::try_allocate).
    #[track_caller]
    pub fn allocate<A: RawAllocator>(&mut self, allocator: A, capacity: usize) {
        self.allocate_with(allocator, QueueConfig::new(capacity));
    }

    /// [`allocate`](Spsc::allocate) with an explicit configuration
    ///
    /// 使用显式配置的 [`allocate`](Spsc::allocate)
    #[track_caller]
    pub fn allocate_with<A: RawAllocator>(&mut self, allocator: A, config: QueueConfig) {
        if let Err(err) = self.try_allocate(allocator, config) {
            fault(err);
        }
    }

    fn bind<A: RawAllocator>(
        &mut self,
        allocator: A,
        config: QueueConfig,
        owner: Owner,
    ) -> Result<(), Fault> {
        if self.binding.is_some() {
            return Err(Fault::AlreadyAllocated);
        }

        let QueueConfig { capacity, index_limit } = config;
        // Two wrap-arounds also keep the count clear of ENDING
        let index_end = index_end(capacity, index_limit)?;
        let layout = storage_layout::<T>(capacity)?;
        let ptr = allocator.allocate(layout).ok_or(Fault::AllocationFailed {
            size: layout.size(),
            align: layout.align(),
        })?;

        // SAFETY: the block fits `capacity` elements per `storage_layout`
        let core = unsafe { RingCore::new(ptr, layout, capacity, index_end) };
        self.binding = Some(Binding { core, owner });

        debug!(capacity, index_end, align = layout.align(), "storage bound");
        Ok(())
    }

    /// Whether storage is bound
    ///
    /// 是否已绑定存储
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.binding.is_some()
    }

    #[inline]
    fn owner(&self) -> Option<Owner> {
        self.binding.as_ref().map(|binding| binding.owner)
    }

    /// Release the bound storage to `allocator`
    ///
    /// 将已绑定的存储归还给 `allocator`
    ///
    /// Indices and the size cell are reset, so the queue can be allocated again.
    ///
    /// 索引和大小单元会被重置，因此队列可以再次分配。
    ///
    /// # Panics
    /// If no storage is bound or the queue still holds elements.
    ///
    /// # Safety
    /// `allocator` must be the one the storage was allocated from.
    ///
    /// # 安全性
    /// `allocator` 必须是分配该存储时使用的分配器。
    #[track_caller]
    pub unsafe fn free<A: RawAllocator>(&mut self, allocator: A) {
        if self.binding.is_none() {
            fault(Fault::Unallocated);
        }
        let len = self.len();
        if len != 0 {
            fault(Fault::NotEmpty { len });
        }

        if let Some(binding) = self.unbind() {
            debug!(capacity = binding.core.capacity(), "storage released");
            // SAFETY: the caller vouches for the allocator
            unsafe { allocator.free(binding.core.as_raw(), binding.core.layout()) }
        }
    }

    /// Run `f` on a queue bound to `allocator`, releasing the storage on every exit path
    ///
    /// 在绑定到 `allocator` 的队列上运行 `f`，在任何退出路径上释放存储
    ///
    /// Elements still queued when `f` returns or unwinds are dropped.
    ///
    /// `f` 返回或展开时仍在队列中的元素会被 drop。
    ///
    /// Only the block bound here goes back to `allocator`. Storage the closure binds
    /// itself after a [`free`](Spsc::free) is handled like any caller-bound storage.
    ///
    /// 只有此处绑定的存储块会归还给 `allocator`。闭包在 [`free`](Spsc::free)
    /// 之后自行绑定的存储按普通调用方绑定的存储处理。
    ///
    /// # Panics
    /// On any fault listed for [`try_allocate`](Spsc::try_allocate).
    #[track_caller]
    pub fn scoped<A, R>(allocator: A, capacity: usize, f: impl FnOnce(&mut Self) -> R) -> R
    where
        A: RawAllocator,
    {
        struct Scope<T, W, A: RawAllocator> {
            queue: Spsc<T, W>,
            allocator: A,
        }

        impl<T, W, A: RawAllocator> Drop for Scope<T, W, A> {
            fn drop(&mut self) {
                // Storage rebound inside `f` is left to the queue's own drop
                if self.queue.owner() != Some(Owner::Scope) {
                    return;
                }
                if let Some(binding) = self.queue.unbind() {
                    // SAFETY: a `Scope` binding only comes from this allocator below
                    unsafe { self.allocator.free(binding.core.as_raw(), binding.core.layout()) }
                }
            }
        }

        let mut scope = Scope { queue: Self::new(), allocator };
        let config = QueueConfig::new(capacity);
        if let Err(err) = scope.queue.bind(&scope.allocator, config, Owner::Scope) {
            fault(err);
        }
        f(&mut scope.queue)
    }

    /// Borrow the producer and consumer handles
    ///
    /// 借出生产者和消费者句柄
    ///
    /// # Panics
    /// If no storage is bound.
    #[track_caller]
    pub fn split(&mut self) -> (Producer<&Self>, Consumer<&Self>) {
        self.core();
        let queue = &*self;
        (Producer::new(queue), Consumer::new(queue))
    }

    /// Move the queue behind a shared pointer and hand out owning handles
    ///
    /// 将队列移入共享指针并返回拥有所有权的句柄
    ///
    /// The storage is dropped with the last handle; see the type-level notes on drop.
    ///
    /// # Panics
    /// If no storage is bound.
    #[track_caller]
    pub fn into_split(self) -> (Producer<Arc<Self>>, Consumer<Arc<Self>>) {
        self.core();
        let queue = Arc::new(self);
        (Producer::new(queue.clone()), Consumer::new(queue))
    }

    /// Number of slots, zero while unallocated
    ///
    /// 槽位数量，未分配时为零
    #[inline]
    pub fn capacity(&self) -> usize {
        self.binding.as_ref().map_or(0, |binding| binding.core.capacity())
    }

    /// Number of queued elements
    ///
    /// 队列中的元素数量
    ///
    /// Lags the indices briefly while a transfer is being published.
    ///
    /// 在传输发布期间可能短暂滞后于索引。
    #[inline]
    pub fn len(&self) -> usize {
        (self.size.load(Ordering::Relaxed) & COUNT_MASK).min(self.capacity())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[track_caller]
    fn core(&self) -> &RingCore<T> {
        match &self.binding {
            Some(binding) => &binding.core,
            None => fault(Fault::Unallocated),
        }
    }

    /// Producer view: own push index and the number of free slots
    #[inline]
    fn push_window(&self, core: &RingCore<T>) -> (usize, usize) {
        let push = self.push_index.load(Ordering::Relaxed);
        let pop = self.pop_index.load(Ordering::Acquire);
        (push, core.capacity() - core.distance(pop, push))
    }

    /// Consumer view: own pop index and the number of readable slots
    #[inline]
    fn pop_window(&self, core: &RingCore<T>) -> (usize, usize) {
        let push = self.push_index.load(Ordering::Acquire);
        let pop = self.pop_index.load(Ordering::Relaxed);
        (pop, core.distance(pop, push))
    }

    /// Drop what is left, reset the cells and detach the storage
    fn unbind(&mut self) -> Option<Binding<T>> {
        let binding = self.binding.take()?;
        let core = &binding.core;

        let push = self.push_index.load(Ordering::Acquire);
        let pop = self.pop_index.load(Ordering::Acquire);
        let left = core.distance(pop, push);
        if left > 0 {
            trace!(left, "dropping queued elements");
            // SAFETY: exclusive access, [pop, push) holds values
            unsafe { core.drop_range(pop, left) };
        }

        self.push_index.store(0, Ordering::Relaxed);
        self.pop_index.store(0, Ordering::Relaxed);
        self.size.store(0, Ordering::Relaxed);
        Some(binding)
    }
}

impl<T, W: WaitPolicy> Spsc<T, W> {
    /// Publish `count` new elements
    #[inline]
    fn increase_size(&self, count: usize) {
        // SeqCst pairs with the parker's sleeper count and publishes the indices
        let order = if W::POP_AWAIT { Ordering::SeqCst } else { Ordering::Relaxed };
        let prior = self.size.fetch_add(count, order);

        // With ENDING set nobody parks, so only a plain zero needs waking
        if W::POP_AWAIT && prior == 0 {
            self.parker.wake_all();
        }
    }

    /// Retire `count` elements
    #[inline]
    fn decrease_size(&self, count: usize, capacity: usize) {
        let order = if W::PUSH_AWAIT { Ordering::SeqCst } else { Ordering::Relaxed };
        let prior = self.size.fetch_sub(count, order);

        if W::PUSH_AWAIT && prior & COUNT_MASK == capacity {
            self.parker.wake_all();
        }
    }
}

impl<T, W: AwaitPush> Spsc<T, W> {
    fn wait_while_full(&self, capacity: usize) {
        self.parker.wait_while(&self.size, |size| size & COUNT_MASK == capacity);
    }
}

impl<T, W: AwaitPop> Spsc<T, W> {
    /// Tell blocked consumers that no more data will arrive
    ///
    /// 通知阻塞的消费者不会再有数据到达
    ///
    /// Consumers keep popping what is still queued; once empty, [`Consumer::pop_await`]
    /// returns `None` and [`Consumer::pop_multiple_await`] returns `0`.
    ///
    /// 消费者会继续弹出仍在队列中的元素；队列为空后，[`Consumer::pop_await`] 返回 `None`，
    /// [`Consumer::pop_multiple_await`] 返回 `0`。
    pub fn end_pop_waiting(&self) {
        let prior = self.size.fetch_or(ENDING, Ordering::SeqCst);
        trace!(len = prior & COUNT_MASK, "pop waiting ended");

        // A non-empty queue has no parked consumer
        if prior == 0 {
            self.parker.wake_all();
        }
    }

    /// Restore normal blocking after [`end_pop_waiting`](Spsc::end_pop_waiting)
    ///
    /// 在 [`end_pop_waiting`](Spsc::end_pop_waiting) 之后恢复正常阻塞
    pub fn reset_pop_waiting(&self) {
        self.size.fetch_and(COUNT_MASK, Ordering::Relaxed);
        trace!("pop waiting reset");
    }

    fn wait_while_empty(&self) {
        self.parker.wait_while(&self.size, |size| size == 0);
    }

    #[inline]
    fn is_ending(&self) -> bool {
        self.size.load(Ordering::Relaxed) == ENDING
    }
}

impl<T, W> Default for Spsc<T, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, W> fmt::Debug for Spsc<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spsc")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}

impl<T, W> Drop for Spsc<T, W> {
    fn drop(&mut self) {
        let Some(binding) = self.unbind() else {
            return;
        };

        match binding.owner {
            // SAFETY: bound from Global in `with_capacity`
            Owner::Global => unsafe { Global.free(binding.core.as_raw(), binding.core.layout()) },
            Owner::Caller | Owner::Scope => {
                warn!(
                    capacity = binding.core.capacity(),
                    "queue dropped while still bound, storage leaked"
                );
            }
        }
    }
}

/// Producer half of the queue
///
/// 队列的生产者端
///
/// `Q` is `&Spsc` from [`Spsc::split`] or `Arc<Spsc>` from [`Spsc::into_split`].
#[derive(Debug)]
pub struct Producer<Q> {
    queue: Q,
    _unsync: PhantomUnsync,
}

/// Consumer half of the queue
///
/// 队列的消费者端
#[derive(Debug)]
pub struct Consumer<Q> {
    queue: Q,
    _unsync: PhantomUnsync,
}

/// Draining iterator, pops until the queue is empty
///
/// 消费迭代器，持续弹出直到队列为空
pub struct Drain<'a, Q> {
    consumer: &'a mut Consumer<Q>,
}

impl<T, W, Q> Iterator for Drain<'_, Q>
where
    W: WaitPolicy,
    Q: Deref<Target = Spsc<T, W>>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.consumer.pop().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // The producer may keep adding
        (self.consumer.readable(), None)
    }
}

impl<Q> Producer<Q> {
    fn new(queue: Q) -> Self {
        Self { queue, _unsync: PhantomData }
    }
}

impl<T, W, Q> Producer<Q>
where
    W: WaitPolicy,
    Q: Deref<Target = Spsc<T, W>>,
{
    /// The shared queue
    ///
    /// 共享队列
    #[inline]
    pub fn queue(&self) -> &Spsc<T, W> {
        &self.queue
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of slots a push can fill right now
    ///
    /// 当前可推送的空闲槽位数量
    #[inline]
    pub fn free_slots(&self) -> usize {
        let queue = &*self.queue;
        queue.push_window(queue.core()).1
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    /// Push a value
    ///
    /// 推送一个值
    ///
    /// # Errors
    /// Returns [`PushError::Full`] with the value if every slot is taken
    ///
    /// # 错误
    /// 如果所有槽位都已占用，则返回携带原值的 [`PushError::Full`]
    #[inline]
    pub fn emplace(&mut self, value: T) -> Result<(), PushError<T>> {
        let queue = &*self.queue;
        let core = queue.core();
        let (push, free) = queue.push_window(core);
        if free == 0 {
            return Err(PushError::Full(value));
        }

        // SAFETY: the slot at `push` is free and only the producer writes it
        unsafe { core.write_at(push, value) };
        queue.push_index.store(core.bump(push), Ordering::Release);
        queue.increase_size(1);
        Ok(())
    }

    /// Push the value built by `f`, which only runs if a slot is free
    ///
    /// 推送由 `f` 构造的值，`f` 仅在有空闲槽位时执行
    ///
    /// # Returns
    /// `false` if the queue was full and `f` was not called
    #[inline]
    pub fn emplace_with(&mut self, f: impl FnOnce() -> T) -> bool {
        let queue = &*self.queue;
        let core = queue.core();
        let (push, free) = queue.push_window(core);
        if free == 0 {
            return false;
        }

        // SAFETY: as in `emplace`; a panicking `f` leaves the slot vacant
        unsafe { core.write_at(push, f()) };
        queue.push_index.store(core.bump(push), Ordering::Release);
        queue.increase_size(1);
        true
    }

    /// Move as many leading values of `values` as fit into the queue
    ///
    /// 将 `values` 开头能放下的值尽可能多地移入队列
    ///
    /// The values that did not fit stay in `values`, in order.
    ///
    /// # Returns
    /// Number of values moved
    ///
    /// # 返回值
    /// 移入的值数量
    pub fn emplace_multiple_from(&mut self, values: &mut Vec<T>) -> usize {
        let queue = &*self.queue;
        let core = queue.core();
        let (push, free) = queue.push_window(core);
        let count = free.min(values.len());
        if count == 0 {
            return 0;
        }

        let len = values.len();
        // SAFETY: `count` free slots from `push`; the moved prefix is forgotten by the
        // vector before its tail is shifted down
        unsafe {
            values.set_len(0);
            core.move_in(push, values.as_ptr(), count);
            ptr::copy(values.as_ptr().add(count), values.as_mut_ptr(), len - count);
            values.set_len(len - count);
        }

        queue.push_index.store(core.increase(push, count), Ordering::Release);
        queue.increase_size(count);
        count
    }
}

impl<T, W, Q> Producer<Q>
where
    T: Clone,
    W: WaitPolicy,
    Q: Deref<Target = Spsc<T, W>>,
{
    /// Push clones of as many leading values as fit
    ///
    /// 推送能放下的开头若干值的克隆
    ///
    /// The write is split into at most two contiguous runs and published at once.
    ///
    /// # Returns
    /// The values that did not fit, empty if all were pushed
    ///
    /// # 返回值
    /// 未能放下的值，全部推送时为空
    pub fn emplace_multiple<'v>(&mut self, values: &'v [T]) -> &'v [T] {
        let queue = &*self.queue;
        let core = queue.core();
        let (push, free) = queue.push_window(core);
        let count = free.min(values.len());
        if count == 0 {
            return values;
        }

        // SAFETY: `count` free slots from `push`
        unsafe { core.clone_in(push, &values[..count]) };
        queue.push_index.store(core.increase(push, count), Ordering::Release);
        queue.increase_size(count);
        &values[count..]
    }
}

impl<T, W, Q> Producer<Q>
where
    W: AwaitPush,
    Q: Deref<Target = Spsc<T, W>>,
{
    /// Push a value, parking while the queue is full
    ///
    /// 推送一个值，队列满时挂起
    ///
    /// Blocks indefinitely if the consumer never pops.
    ///
    /// 如果消费者永不弹出，将无限期阻塞。
    pub fn emplace_await(&mut self, mut value: T) {
        loop {
            match self.emplace(value) {
                Ok(()) => return,
                Err(PushError::Full(back)) => value = back,
            }
            self.park_while_full();
        }
    }

    /// Move every value of `values` into the queue, parking whenever it is full
    ///
    /// 将 `values` 中的所有值移入队列，队列满时挂起
    pub fn emplace_multiple_from_await(&mut self, values: &mut Vec<T>) {
        loop {
            self.emplace_multiple_from(values);
            if values.is_empty() {
                return;
            }
            self.park_while_full();
        }
    }

    fn park_while_full(&self) {
        let queue = &*self.queue;
        queue.wait_while_full(queue.core().capacity());
    }
}

impl<T, W, Q> Producer<Q>
where
    T: Clone,
    W: AwaitPush,
    Q: Deref<Target = Spsc<T, W>>,
{
    /// Push clones of every value, parking whenever the queue is full
    ///
    /// 推送所有值的克隆，队列满时挂起
    pub fn emplace_multiple_await(&mut self, values: &[T]) {
        let mut values = values;
        loop {
            values = self.emplace_multiple(values);
            if values.is_empty() {
                return;
            }
            self.park_while_full();
        }
    }
}

impl<T, W, Q> Producer<Q>
where
    W: AwaitPop,
    Q: Deref<Target = Spsc<T, W>>,
{
    /// See [`Spsc::end_pop_waiting`]
    #[inline]
    pub fn end_pop_waiting(&self) {
        self.queue.end_pop_waiting();
    }

    /// See [`Spsc::reset_pop_waiting`]
    #[inline]
    pub fn reset_pop_waiting(&self) {
        self.queue.reset_pop_waiting();
    }
}

impl<Q> Consumer<Q> {
    fn new(queue: Q) -> Self {
        Self { queue, _unsync: PhantomData }
    }
}

impl<T, W, Q> Consumer<Q>
where
    W: WaitPolicy,
    Q: Deref<Target = Spsc<T, W>>,
{
    /// The shared queue
    ///
    /// 共享队列
    #[inline]
    pub fn queue(&self) -> &Spsc<T, W> {
        &self.queue
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Elements published to this side, read from the indices
    #[inline]
    fn readable(&self) -> usize {
        let queue = &*self.queue;
        queue.pop_window(queue.core()).1
    }

    /// Pop a value
    ///
    /// 弹出一个值
    ///
    /// # Errors
    /// Returns [`PopError::Empty`] if nothing is queued
    ///
    /// # 错误
    /// 如果队列为空则返回 [`PopError::Empty`]
    #[inline]
    pub fn pop(&mut self) -> Result<T, PopError> {
        let queue = &*self.queue;
        let core = queue.core();
        let (pop, available) = queue.pop_window(core);
        if available == 0 {
            return Err(PopError::Empty);
        }

        // SAFETY: the slot at `pop` was published by the producer's release store
        let value = unsafe { core.read_at(pop) };
        queue.pop_index.store(core.bump(pop), Ordering::Release);
        queue.decrease_size(1, core.capacity());
        Ok(value)
    }

    /// Pop into the spare capacity of `dst`, in order
    ///
    /// 按顺序弹出到 `dst` 的剩余容量中
    ///
    /// Pops `min(queued, dst.capacity() - dst.len())` elements; `dst` never reallocates.
    ///
    /// # Returns
    /// Number of elements appended
    ///
    /// # 返回值
    /// 追加的元素数量
    pub fn pop_multiple(&mut self, dst: &mut Vec<T>) -> usize {
        let queue = &*self.queue;
        let core = queue.core();
        let (pop, available) = queue.pop_window(core);
        let count = available.min(dst.capacity() - dst.len());
        if count == 0 {
            return 0;
        }

        let len = dst.len();
        // SAFETY: `count` published slots from `pop`, and `dst` has room for them
        unsafe {
            core.move_out(pop, dst.as_mut_ptr().add(len), count);
            dst.set_len(len + count);
        }

        queue.pop_index.store(core.increase(pop, count), Ordering::Release);
        queue.decrease_size(count, core.capacity());
        count
    }

    /// Look at the next value without removing it
    ///
    /// 查看下一个值但不移除它
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        let queue = &*self.queue;
        let core = queue.core();
        let (pop, available) = queue.pop_window(core);
        if available == 0 {
            return None;
        }
        // SAFETY: only this handle pops, and popping needs `&mut self`
        Some(unsafe { core.peek_at(pop) })
    }

    /// Pop and drop everything currently queued
    ///
    /// 弹出并 drop 当前队列中的所有元素
    pub fn clear(&mut self) {
        while self.pop().is_ok() {}
    }

    /// Iterator that pops until the queue is empty
    ///
    /// 持续弹出直到队列为空的迭代器
    ///
    /// # Examples
    ///
    /// ```
    /// use waitring::Spsc;
    ///
    /// let mut queue: Spsc<i32> = Spsc::with_capacity(8);
    /// let (mut producer, mut consumer) = queue.split();
    /// for i in 1..=3 {
    ///     producer.emplace(i).unwrap();
    /// }
    ///
    /// let items: Vec<i32> = consumer.drain().collect();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// assert!(consumer.is_empty());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, Q> {
        Drain { consumer: self }
    }
}

impl<T, W, Q> Consumer<Q>
where
    W: AwaitPop,
    Q: Deref<Target = Spsc<T, W>>,
{
    /// Pop a value, parking while the queue is empty
    ///
    /// 弹出一个值，队列为空时挂起
    ///
    /// # Returns
    /// `None` once the queue is empty and [`Spsc::end_pop_waiting`] has been called
    ///
    /// # 返回值
    /// 队列为空且已调用 [`Spsc::end_pop_waiting`] 时返回 `None`
    pub fn pop_await(&mut self) -> Option<T> {
        loop {
            if let Ok(value) = self.pop() {
                return Some(value);
            }
            if !self.park_while_empty() {
                return None;
            }
        }
    }

    /// Pop into the spare capacity of `dst`, parking while the queue is empty
    ///
    /// 弹出到 `dst` 的剩余容量中，队列为空时挂起
    ///
    /// # Returns
    /// Number of elements appended; `0` if `dst` has no spare capacity or once the queue
    /// is empty after [`Spsc::end_pop_waiting`]
    ///
    /// # 返回值
    /// 追加的元素数量；`dst` 没有剩余容量，或在 [`Spsc::end_pop_waiting`] 之后队列为空时
    /// 返回 `0`
    pub fn pop_multiple_await(&mut self, dst: &mut Vec<T>) -> usize {
        if dst.len() == dst.capacity() {
            return 0;
        }
        loop {
            let count = self.pop_multiple(dst);
            if count > 0 {
                return count;
            }
            if !self.park_while_empty() {
                return 0;
            }
        }
    }

    /// Park until something is queued; `false` if waiting has ended instead
    fn park_while_empty(&self) -> bool {
        self.queue.wait_while_empty();
        !self.queue.is_ending()
    }
}
