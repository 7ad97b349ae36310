//! Core ring storage - index arithmetic and raw slot access
//!
//! 核心环形存储 - 索引运算与原始槽位访问
//!
//! This module holds everything that does not depend on the thread protocol:
//! - The bound storage block and its capacity
//! - Unwrapped index arithmetic (bump, increase, distance) below `index_end`
//! - Batch helpers that split a transfer into at most two contiguous runs
//!
//! 此模块包含与线程协议无关的部分：
//! - 已绑定的存储块及其容量
//! - 低于 `index_end` 的未环绕索引运算（递增、增加、距离）
//! - 将批量传输拆分为最多两段连续区间的辅助函数

use std::alloc::Layout;
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::Fault;

/// Raw storage of a bound queue
///
/// 已绑定队列的原始存储
///
/// Indices passed to the slot accessors are *unwrapped*: any value in
/// `[0, index_end)`. The slot offset is `index % capacity`.
///
/// 传给槽位访问函数的索引是*未环绕*的：取值范围为 `[0, index_end)`，
/// 槽位偏移为 `index % capacity`。
pub(crate) struct RingCore<T> {
    /// First slot of the storage block
    ///
    /// 存储块的第一个槽位
    ptr: NonNull<T>,

    /// Number of slots
    ///
    /// 槽位数量
    capacity: usize,

    /// Unwrapped indices reset to zero here (a multiple of `capacity`)
    ///
    /// 未环绕索引在此处归零（`capacity` 的倍数）
    index_end: usize,

    /// Layout the block was allocated with
    ///
    /// 分配该内存块时使用的布局
    layout: Layout,
}

/// A contiguous stretch of slots: `(offset, len)`
pub(crate) type Run = (usize, usize);

impl<T> RingCore<T> {
    /// Wrap a freshly allocated block
    ///
    /// 包装新分配的内存块
    ///
    /// # Safety
    /// `ptr` must be valid for `capacity` elements of `T` as described by `layout`,
    /// and `index_end` must come from [`index_end`].
    pub unsafe fn new(ptr: NonNull<u8>, layout: Layout, capacity: usize, index_end: usize) -> Self {
        debug_assert!(capacity > 0);
        debug_assert_eq!(index_end % capacity, 0);
        Self {
            ptr: ptr.cast(),
            capacity,
            index_end,
            layout,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn index_end(&self) -> usize {
        self.index_end
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Start of the block, as handed out by the allocator
    #[inline]
    pub fn as_raw(&self) -> NonNull<u8> {
        self.ptr.cast()
    }

    /// Advance an unwrapped index by one
    ///
    /// 未环绕索引加一
    #[inline]
    pub fn bump(&self, index: usize) -> usize {
        let next = index + 1;
        if next < self.index_end { next } else { 0 }
    }

    /// Advance an unwrapped index by `count` (`count ≤ capacity`)
    ///
    /// 未环绕索引增加 `count`（`count ≤ capacity`）
    #[inline]
    pub fn increase(&self, index: usize, count: usize) -> usize {
        debug_assert!(count <= self.capacity);
        // index + count can exceed usize::MAX when index_end sits near it
        let to_end = self.index_end - index;
        if count >= to_end { count - to_end } else { index + count }
    }

    /// Number of elements between the pop and push indices
    ///
    /// 弹出索引与推送索引之间的元素数量
    #[inline]
    pub fn distance(&self, pop: usize, push: usize) -> usize {
        if push >= pop {
            push - pop
        } else {
            self.index_end - pop + push
        }
    }

    /// Slot offset of an unwrapped index
    #[inline]
    pub fn wrap(&self, index: usize) -> usize {
        index % self.capacity
    }

    /// Split `count` slots starting at `start` into the run up to the end of the
    /// storage and the run continuing from its beginning
    ///
    /// 将从 `start` 开始的 `count` 个槽位拆分为到存储末尾的一段和从开头继续的一段
    #[inline]
    pub fn runs(&self, start: usize, count: usize) -> [Run; 2] {
        debug_assert!(count <= self.capacity);
        let offset = self.wrap(start);
        let first = count.min(self.capacity - offset);
        [(offset, first), (0, count - first)]
    }

    #[inline]
    fn slot(&self, offset: usize) -> *mut T {
        debug_assert!(offset < self.capacity);
        // SAFETY: offset < capacity keeps us inside the block
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Construct a value in the slot of `index`
    ///
    /// 在 `index` 对应槽位中构造值
    ///
    /// # Safety
    /// The slot must be vacant and owned by the caller.
    #[inline]
    pub unsafe fn write_at(&self, index: usize, value: T) {
        unsafe { self.slot(self.wrap(index)).write(value) }
    }

    /// Move the value out of the slot of `index`, leaving it vacant
    ///
    /// 将 `index` 槽位中的值移出，使其变为空闲
    ///
    /// # Safety
    /// The slot must hold a value and be owned by the caller.
    #[inline]
    pub unsafe fn read_at(&self, index: usize) -> T {
        unsafe { self.slot(self.wrap(index)).read() }
    }

    /// Borrow the value in the slot of `index`
    ///
    /// # Safety
    /// The slot must hold a value that stays in place for the returned lifetime.
    #[inline]
    pub unsafe fn peek_at(&self, index: usize) -> &T {
        unsafe { &*self.slot(self.wrap(index)) }
    }

    /// Move `count` values from `src` into the slots starting at `start`
    ///
    /// 将 `src` 中的 `count` 个值移入从 `start` 开始的槽位
    ///
    /// # Safety
    /// - The target slots must be vacant and owned by the caller
    /// - `src` must hold `count` initialized values, which are logically moved out
    pub unsafe fn move_in(&self, start: usize, src: *const T, count: usize) {
        let mut moved = 0;
        for (offset, len) in self.runs(start, count) {
            unsafe { ptr::copy_nonoverlapping(src.add(moved), self.slot_base(offset), len) };
            moved += len;
        }
    }

    /// Move `count` values out of the slots starting at `start` into `dst`
    ///
    /// 将从 `start` 开始的 `count` 个槽位中的值移出到 `dst`
    ///
    /// # Safety
    /// - The source slots must hold values and be owned by the caller; they are vacant
    ///   afterwards
    /// - `dst` must be valid for `count` writes
    pub unsafe fn move_out(&self, start: usize, dst: *mut T, count: usize) {
        let mut moved = 0;
        for (offset, len) in self.runs(start, count) {
            unsafe { ptr::copy_nonoverlapping(self.slot_base(offset), dst.add(moved), len) };
            moved += len;
        }
    }

    /// Drop the values in `count` slots starting at `start`
    ///
    /// # Safety
    /// The slots must hold values and be owned by the caller.
    pub unsafe fn drop_range(&self, start: usize, count: usize) {
        for (offset, len) in self.runs(start, count) {
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.slot_base(offset), len));
            }
        }
    }

    /// Pointer to a run's first slot; `offset == capacity` is allowed for empty runs
    #[inline]
    fn slot_base(&self, offset: usize) -> *mut T {
        debug_assert!(offset <= self.capacity);
        // SAFETY: at most one past the end of the block
        unsafe { self.ptr.as_ptr().add(offset) }
    }
}

impl<T: Clone> RingCore<T> {
    /// Clone every value of `values` into the slots starting at `start`
    ///
    /// 将 `values` 中的每个值克隆到从 `start` 开始的槽位
    ///
    /// If a `clone` panics, the clones written so far are dropped before unwinding
    /// continues, so no slot stays half-published.
    ///
    /// 若 `clone` 发生 panic，已写入的克隆会在继续展开前被 drop，不会留下半发布的槽位。
    ///
    /// # Safety
    /// - `values.len() <= capacity`
    /// - The target slots must be vacant and owned by the caller
    pub unsafe fn clone_in(&self, start: usize, values: &[T]) {
        struct Written<'a, T> {
            core: &'a RingCore<T>,
            start: usize,
            count: usize,
        }

        impl<T> Drop for Written<'_, T> {
            fn drop(&mut self) {
                unsafe { self.core.drop_range(self.start, self.count) }
            }
        }

        let mut written = Written { core: self, start, count: 0 };
        for (offset, len) in self.runs(start, values.len()) {
            let base = self.slot_base(offset);
            for (i, value) in values[written.count..written.count + len].iter().enumerate() {
                unsafe { base.add(i).write(value.clone()) };
                written.count += 1;
            }
        }
        mem::forget(written);
    }
}

/// Where unwrapped indices wrap back to zero
///
/// 未环绕索引回到零的位置
///
/// # Returns
/// The largest multiple of `capacity` not exceeding `index_limit`, provided it spans at
/// least two full wrap-arounds
///
/// # 返回值
/// 不超过 `index_limit` 的 `capacity` 最大倍数，且至少跨越两次完整环绕
pub(crate) fn index_end(capacity: usize, index_limit: usize) -> Result<usize, Fault> {
    if capacity == 0 {
        return Err(Fault::InvalidCapacity(capacity));
    }
    let wraps = index_limit / capacity;
    if wraps < 2 {
        return Err(Fault::NotEnoughWrapArounds { capacity, index_limit });
    }
    Ok(capacity * wraps)
}
