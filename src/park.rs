//! Parking for the blocking operations
//!
//! 阻塞操作的挂起机制
//!
//! Threads park on the value of an atomic cell they do not own. A parking thread
//! registers in `sleepers` before its last look at the cell, and a waker reads
//! `sleepers` after changing the cell, both `SeqCst`. At least one of them sees the
//! other: either the sleeper sees the new value, or the waker sees the sleeper and takes
//! the lock to notify it. With no sleepers the waker touches neither lock nor condvar.
//!
//! 线程依据一个不属于自己的原子单元的值挂起。挂起方在最后一次检查该单元之前登记到
//! `sleepers`，唤醒方在修改该单元之后读取 `sleepers`，两者均为 `SeqCst`。二者至少有一方
//! 能看到对方：要么挂起方看到新值，要么唤醒方看到挂起方并获取锁进行通知。
//! 没有挂起方时，唤醒方既不加锁也不通知条件变量。

use crate::shim::atomic::{AtomicUsize, Ordering};
use crate::shim::sync::{Condvar, Mutex, MutexGuard};
use crate::trace::trace;

/// Mutex and condition variable pair keyed on an atomic cell
///
/// 以原子单元为键的互斥锁与条件变量组合
pub(crate) struct Parker {
    /// Threads between registering and leaving `wait_while`
    sleepers: AtomicUsize,
    lock: Mutex<()>,
    cvar: Condvar,
}

impl Parker {
    pub fn new() -> Self {
        Self {
            sleepers: AtomicUsize::new(0),
            lock: Mutex::new(()),
            cvar: Condvar::new(),
        }
    }

    /// Block while `blocked` holds for the value of `cell`
    ///
    /// 当 `cell` 的值满足 `blocked` 时阻塞
    ///
    /// Wakers must update `cell` with `SeqCst` before calling [`wake_all`](Parker::wake_all).
    /// The cell may have changed again by the time this returns.
    ///
    /// 唤醒方必须先以 `SeqCst` 更新 `cell`，再调用 [`wake_all`](Parker::wake_all)。
    pub fn wait_while(&self, cell: &AtomicUsize, mut blocked: impl FnMut(usize) -> bool) {
        if !blocked(cell.load(Ordering::Acquire)) {
            return;
        }

        let mut guard = lock(&self.lock);
        self.sleepers.fetch_add(1, Ordering::SeqCst);
        while blocked(cell.load(Ordering::SeqCst)) {
            trace!("parking");
            guard = wait(&self.cvar, guard);
        }
        self.sleepers.fetch_sub(1, Ordering::Relaxed);
        trace!("unparked");
    }

    /// Wake every parked thread
    ///
    /// 唤醒所有挂起的线程
    ///
    /// Call after the cell has been updated. Returns at once when nobody is parked.
    ///
    /// 在单元更新之后调用。没有挂起的线程时立即返回。
    pub fn wake_all(&self) {
        if self.sleepers.load(Ordering::SeqCst) == 0 {
            return;
        }
        drop(lock(&self.lock));
        self.cvar.notify_all();
    }

    /// Hold the parking lock, as a parking thread would between its checks
    #[cfg(all(test, not(feature = "loom")))]
    pub fn hold(&self) -> MutexGuard<'_, ()> {
        lock(&self.lock)
    }
}

#[cfg(not(feature = "loom"))]
#[inline]
fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock()
}

#[cfg(not(feature = "loom"))]
#[inline]
fn wait<'a>(cvar: &Condvar, mut guard: MutexGuard<'a, ()>) -> MutexGuard<'a, ()> {
    cvar.wait(&mut guard);
    guard
}

// The guarded data is `()`, so a poisoned lock carries nothing to recover.
#[cfg(feature = "loom")]
#[inline]
fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(feature = "loom")]
#[inline]
fn wait<'a>(cvar: &Condvar, guard: MutexGuard<'a, ()>) -> MutexGuard<'a, ()> {
    cvar.wait(guard).unwrap_or_else(std::sync::PoisonError::into_inner)
}
