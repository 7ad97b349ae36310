//! Queue binding configuration
//!
//! 队列绑定配置

/// Default upper bound for unwrapped indices
///
/// 未环绕索引的默认上限
pub const DEFAULT_INDEX_LIMIT: usize = usize::MAX;

/// Parameters used when binding storage to a queue
///
/// 绑定存储时使用的参数
///
/// # Fields
/// - `capacity`: Number of slots, must be positive
/// - `index_limit`: Unwrapped indices stay below the largest multiple of `capacity`
///   not exceeding this value; it must leave room for at least two wrap-arounds
///
/// # 字段
/// - `capacity`: 槽位数量，必须为正数
/// - `index_limit`: 未环绕索引始终小于不超过该值的 `capacity` 最大倍数；
///   必须至少容纳两次环绕
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    pub capacity: usize,
    pub index_limit: usize,
}

impl QueueConfig {
    /// Configuration with the default index limit
    ///
    /// 使用默认索引上限的配置
    #[inline]
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index_limit: DEFAULT_INDEX_LIMIT,
        }
    }

    /// Lower the index limit, mostly useful to exercise wrap-around quickly
    ///
    /// 降低索引上限，主要用于快速触发环绕
    #[inline]
    pub const fn with_index_limit(mut self, index_limit: usize) -> Self {
        self.index_limit = index_limit;
        self
    }
}

impl From<usize> for QueueConfig {
    fn from(capacity: usize) -> Self {
        Self::new(capacity)
    }
}
