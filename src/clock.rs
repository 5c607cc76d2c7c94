//! Time source and id allocation for new songs.

use chrono::Utc;

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hands out timestamp-like ids that never repeat: two creations in the same
/// millisecond, or a clock stepping backwards, still yield increasing ids.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    last: Option<i64>,
}

impl IdAllocator {
    /// Start above every id already in use.
    pub fn seeded<I: IntoIterator<Item = i64>>(existing: I) -> Self {
        Self {
            last: existing.into_iter().max(),
        }
    }

    /// Next id, or `None` once the largest stored id leaves no room above it.
    pub fn next(&mut self, now_millis: i64) -> Option<i64> {
        let id = match self.last {
            Some(last) if now_millis <= last => last.checked_add(1)?,
            _ => now_millis,
        };
        self.last = Some(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_the_clock_when_it_moves_forward() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next(100), Some(100));
        assert_eq!(ids.next(250), Some(250));
    }

    #[test]
    fn bumps_past_repeated_or_stale_stamps() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next(100), Some(100));
        assert_eq!(ids.next(100), Some(101));
        assert_eq!(ids.next(50), Some(102));
    }

    #[test]
    fn seeding_skips_existing_ids() {
        let mut ids = IdAllocator::seeded([10, 900, 40]);
        assert_eq!(ids.next(500), Some(901));
    }

    #[test]
    fn runs_out_instead_of_wrapping_at_the_top() {
        let mut ids = IdAllocator::seeded([i64::MAX]);
        assert_eq!(ids.next(1_700_000_000_000), None);
        assert_eq!(ids.next(i64::MAX), None);
    }
}
