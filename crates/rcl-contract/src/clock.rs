use rcl_types::LedgerTime;

/// Source of signing timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> LedgerTime;
}

/// Local wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LedgerTime {
        LedgerTime::now()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub LedgerTime);

impl Clock for FixedClock {
    fn now(&self) -> LedgerTime {
        self.0
    }
}
