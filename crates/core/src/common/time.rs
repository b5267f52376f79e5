use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// # Summary
/// 时间供给器接口，隔离物理系统时钟。
/// 告警的创建时间与过期判定都经由此接口取时。
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// 当前时间的 Unix 毫秒值
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// 系统时钟。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 由调用方拨动的虚拟时钟，测试中用来确定性地驱动告警过期。
///
/// # Invariants
/// - 内部以 Unix 毫秒保存，读写均为原子操作，可跨线程共享。
pub struct FakeClockProvider {
    millis: AtomicI64,
}

impl FakeClockProvider {
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self::at_millis(initial_time.timestamp_millis())
    }

    pub fn at_millis(ms: i64) -> Self {
        Self {
            millis: AtomicI64::new(ms),
        }
    }

    /// 把时钟拨到指定时间
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        self.millis
            .store(new_time.timestamp_millis(), Ordering::SeqCst);
    }

    /// 向前拨动指定毫秒数
    pub fn advance_ms(&self, ms: i64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms()).unwrap_or_default()
    }

    fn now_ms(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
