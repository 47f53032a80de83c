use std::time::Duration;
use std::thread;
use rand::Rng;
use log::{debug, info};

/// Upper bound on a single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(300);

/// Random politeness delay taken before every request to a scraped site.
pub fn random_pacing_delay(min: Duration, max: Duration) {
    let delay = pick_pacing(min, max);
    if delay.is_zero() {
        return;
    }
    debug!("Waiting for {:.2} seconds (Pacing)...", delay.as_secs_f64());
    thread::sleep(delay);
}

/// Sleeps `unit * base^attempt` between failed attempts.
pub fn backoff_delay(base: f64, attempt: u32, unit: Duration) {
    let delay = backoff_duration(base, attempt, unit);
    if delay.is_zero() {
        return;
    }
    info!("Waiting for {:.2} seconds (Backoff #{})...", delay.as_secs_f64(), attempt + 1);
    thread::sleep(delay);
}

pub(crate) fn pick_pacing(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let mut rng = rand::thread_rng();
    Duration::from_secs_f64(rng.gen_range(min.as_secs_f64()..=max.as_secs_f64()))
}

pub(crate) fn backoff_duration(base: f64, attempt: u32, unit: Duration) -> Duration {
    if unit.is_zero() {
        return Duration::ZERO;
    }
    let factor = base.powi(attempt as i32);
    if factor.is_nan() || factor <= 0.0 {
        return unit.min(MAX_BACKOFF);
    }
    Duration::try_from_secs_f64(unit.as_secs_f64() * factor)
        .map_or(MAX_BACKOFF, |d| d.min(MAX_BACKOFF))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_exponentially() {
        let unit = Duration::from_secs(1);
        assert_eq!(backoff_duration(1.5, 0, unit), Duration::from_secs(1));
        assert_eq!(backoff_duration(1.5, 1, unit), Duration::from_secs_f64(1.5));
        assert_eq!(backoff_duration(1.5, 2, unit), Duration::from_secs_f64(2.25));
        assert!(backoff_duration(1.5, 3, Duration::ZERO).is_zero());
    }

    #[test]
    fn test_huge_backoff_is_capped() {
        let unit = Duration::from_secs(1);
        assert_eq!(backoff_duration(1e10, 2, unit), MAX_BACKOFF);
        assert_eq!(backoff_duration(f64::MAX, 3, unit), MAX_BACKOFF);
        assert_eq!(backoff_duration(2.0, 20, unit), MAX_BACKOFF);
        assert_eq!(backoff_duration(f64::NAN, 1, unit), unit);
    }

    #[test]
    fn test_pacing_stays_in_range() {
        let min = Duration::from_secs(1);
        let max = Duration::from_secs(3);
        for _ in 0..100 {
            let d = pick_pacing(min, max);
            assert!(d >= min && d <= max, "{:?} out of range", d);
        }
        assert_eq!(pick_pacing(Duration::ZERO, Duration::ZERO), Duration::ZERO);
    }
}
