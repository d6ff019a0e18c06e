use chatledger_core::Clock;
use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Wall clock. "Today" is taken in the configured zone, or host local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: Option<Tz>,
}

impl SystemClock {
    pub fn new(zone: Option<Tz>) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        let now = self.now();
        match self.zone {
            Some(zone) => now.with_timezone(&zone).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoned_today_tracks_the_zone_offset() {
        let clock = SystemClock::new(Some(chrono_tz::Pacific::Kiritimati));
        let utc_today = Utc::now().date_naive();
        let today = clock.today();
        assert!(today == utc_today || today == utc_today.succ_opt().unwrap_or(utc_today));
    }
}
