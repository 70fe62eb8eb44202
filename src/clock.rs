use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use std::time::{Duration, Instant};

/// Footer clock refresh interval
pub const TICK: Duration = Duration::from_millis(1000);

/// Fires once per `TICK`, driven by the frame loop
#[derive(Clone, Copy, Debug)]
pub struct Ticker {
    last: Instant,
    interval: Duration,
}

impl Ticker {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, TICK)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self { last: now, interval }
    }

    /// True when at least one interval has passed since the last fire.
    /// A stalled loop fires once, not once per missed interval.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// `YYYY/MM/DD HH:MM:SS`
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%Y/%m/%d %H:%M:%S").to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Fractional hours since UTC midnight
pub fn utc_hours(time: &DateTime<Utc>) -> f32 {
    time.hour() as f32 + time.minute() as f32 / 60.0 + time.second() as f32 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::new(start);
        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(999)));
        assert!(ticker.poll(start + Duration::from_millis(1000)));
        assert!(!ticker.poll(start + Duration::from_millis(1500)));
        assert!(ticker.poll(start + Duration::from_millis(2001)));
    }

    #[test]
    fn stall_fires_only_once() {
        let start = Instant::now();
        let mut ticker = Ticker::new(start);
        assert!(ticker.poll(start + Duration::from_secs(10)));
        assert!(!ticker.poll(start + Duration::from_secs(10)));
    }

    #[test]
    fn timestamp_format_is_zero_padded() {
        let t = Utc.with_ymd_and_hms(2021, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_timestamp(&t), "2021/03/07 09:05:02");
    }

    #[test]
    fn utc_hours_is_fractional() {
        let t = Utc.with_ymd_and_hms(2021, 10, 8, 18, 30, 0).unwrap();
        assert!((utc_hours(&t) - 18.5).abs() < 1e-5);
    }
}
