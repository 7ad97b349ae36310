//! Queue event logging
//!
//! 队列事件日志
//!
//! Storage binding and release are `debug` events. Parking, unparking and the
//! ending flag changes are `trace` events. A queue dropped with caller storage still
//! bound logs a `warn`, and every fault logs an `error` before it panics.
//! The transfer operations themselves log nothing.
//!
//! 存储的绑定与释放为 `debug` 事件；挂起、唤醒以及结束标志的变化为 `trace` 事件。
//! 仍绑定调用方存储时被 drop 的队列记录一条 `warn`，每个故障在 panic 之前记录一条 `error`。
//!
//! Without the `tracing` feature the macros expand to nothing.

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `waitring=trace`
///
/// 安装按 `RUST_LOG` 过滤的 `fmt` 订阅器，默认 `waitring=trace`
///
/// A no-op without the `tracing` feature.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("waitring=trace"));

    // A second call (e.g. from another test) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(false)
                .with_line_number(false)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, error, trace, warn};

// Swallows the arguments, fields included
#[cfg(not(feature = "tracing"))]
macro_rules! noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use noop as error;
#[cfg(not(feature = "tracing"))]
pub(crate) use noop as trace;
#[cfg(not(feature = "tracing"))]
pub(crate) use noop as warn;
