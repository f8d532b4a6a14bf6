use chrono::{DateTime, FixedOffset, Local, Utc};

/// Clock abstracts access to the current instant so services remain
/// deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current instant in the viewer's offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Real-time clock backed by the system time source.
///
/// Uses the machine's local offset unless one is pinned.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the clock to a fixed offset given in minutes east of UTC.
    /// Out-of-range values fall back to the local offset.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        Self {
            offset: FixedOffset::east_opt(minutes.saturating_mul(60)),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
