//! Storage allocator boundary
//!
//! 存储分配器边界
//!
//! The queue never owns its memory source. A caller passes a [`RawAllocator`] to
//! `allocate` and the same allocator to `free`; the queue requests exactly one block per
//! binding, sized `capacity × size_of::<T>()` and aligned to at least a cache line.
//!
//! 队列从不拥有其内存来源。调用方在 `allocate` 和 `free` 时传入同一个 [`RawAllocator`]；
//! 每次绑定队列只申请一块内存，大小为 `capacity × size_of::<T>()`，至少按缓存行对齐。

use std::alloc::Layout;
use std::ptr::{self, NonNull};

use crossbeam_utils::CachePadded;

use crate::error::Fault;

/// Alignment used to keep storage and index cells off each other's cache lines
///
/// 用于避免存储与索引单元共享缓存行的对齐值
pub const CACHE_LINE: usize = align_of::<CachePadded<u8>>();

/// Memory source for queue storage
///
/// 队列存储的内存来源
///
/// # Safety
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and not handed out again until
/// passed back to [`free`](RawAllocator::free).
///
/// # 安全性
/// 实现者返回的内存块必须可读写 `layout.size()` 字节、按 `layout.align()` 对齐，
/// 并且在通过 [`free`](RawAllocator::free) 归还前不得再次分配。
pub unsafe trait RawAllocator {
    /// Allocate a block for `layout`, `None` when exhausted
    ///
    /// 为 `layout` 分配内存块，耗尽时返回 `None`
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Return a block to the allocator
    ///
    /// 将内存块归还给分配器
    ///
    /// # Safety
    /// `ptr` must come from [`allocate`](RawAllocator::allocate) on this allocator with
    /// the same `layout`, and must not be used afterwards.
    ///
    /// # 安全性
    /// `ptr` 必须来自本分配器以相同 `layout` 调用 [`allocate`](RawAllocator::allocate)
    /// 的结果，且之后不得再使用。
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).free(ptr, layout) }
    }
}

/// The global heap
///
/// 全局堆
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

unsafe impl RawAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return Some(dangling(layout));
        }
        // SAFETY: layout has a non-zero size
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    #[inline]
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

/// Aligned non-null address for zero-sized storage
#[inline]
fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: alignments are non-zero powers of two
    unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(layout.align())) }
}

/// Layout of the storage block for `capacity` elements of `T`
///
/// `capacity` 个 `T` 元素的存储块布局
pub(crate) fn storage_layout<T>(capacity: usize) -> Result<Layout, Fault> {
    Layout::array::<T>(capacity)
        .and_then(|layout| layout.align_to(CACHE_LINE.max(align_of::<T>())))
        .map_err(|_| Fault::CapacityOverflow { capacity })
}
