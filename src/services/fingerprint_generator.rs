//! Sliding-window fingerprint generation
//!
//! For a window of `d` minutes the generator slides a frame of `d` consecutive
//! candles over the series one candle at a time, so a series of `n >= d`
//! candles yields `n - d + 1` fingerprints for that window and a shorter
//! series yields none. Output order is (requested window, end position).

use tracing::debug;

use crate::models::{fingerprint_id, Candle, Fingerprint, WindowLabel};

/// Fingerprint generator over one chronologically sorted candle series
pub struct FingerprintGenerator {
    candles: Vec<Candle>,
}

impl FingerprintGenerator {
    /// Copy and sort the series by timestamp
    pub fn new(candles: &[Candle]) -> Self {
        let mut candles = candles.to_vec();
        candles.sort_by_key(|c| c.timestamp);
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Fingerprint every window position for each requested label.
    ///
    /// Labels longer than the series are skipped without error.
    pub fn generate<I>(&self, windows: I) -> Vec<Fingerprint>
    where
        I: IntoIterator<Item = WindowLabel>,
    {
        let mut fingerprints = Vec::new();

        for window in windows {
            let size = window.minutes();
            if self.candles.len() < size {
                debug!(
                    "Skipping window {}: {} candles available, {} required",
                    window,
                    self.candles.len(),
                    size
                );
                continue;
            }

            fingerprints.extend(
                self.candles
                    .windows(size)
                    .map(|frame| summarize(window, frame)),
            );
        }

        fingerprints
    }

    /// Fingerprint of the most recent full window, if the series is long enough
    pub fn latest(&self, window: WindowLabel) -> Option<Fingerprint> {
        let size = window.minutes();
        if size == 0 || self.candles.len() < size {
            return None;
        }
        let frame = &self.candles[self.candles.len() - size..];
        Some(summarize(window, frame))
    }
}

/// Summarize one non-empty frame of candles
fn summarize(window: WindowLabel, frame: &[Candle]) -> Fingerprint {
    let first = &frame[0];
    let last = &frame[frame.len() - 1];

    let start_close = first.close;
    let end_close = last.close;
    let absolute_change = end_close - start_close;
    let pct_change = calculate_pct_change(start_close, end_close);

    let closes: Vec<f64> = frame.iter().map(|c| c.close).collect();
    let volatility = population_std_dev(&closes);
    let average_volume = mean(frame.iter().map(|c| c.volume));

    Fingerprint {
        window_label: window,
        start_timestamp: first.timestamp,
        end_timestamp: last.timestamp,
        duration_minutes: window.minutes(),
        start_close,
        end_close,
        absolute_change,
        pct_change,
        volatility,
        average_volume,
        fingerprint_id: fingerprint_id(
            window,
            &first.timestamp,
            &last.timestamp,
            start_close,
            end_close,
            volatility,
        ),
    }
}

/// Percentage move from `start` to `end`; `0.0` when `start` is zero
pub fn calculate_pct_change(start: f64, end: f64) -> f64 {
    if start == 0.0 {
        0.0
    } else {
        ((end - start) / start) * 100.0
    }
}

/// Standard deviation with divisor N (two-pass).
///
/// Sums left to right; numpy's pairwise summation can differ in the last ulp for 8+ values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values.iter().copied());
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(closes: &[f64]) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Candle::new(base + Duration::minutes(i as i64), close, close, close, close, 1.0)
            })
            .collect()
    }

    const SCENARIO: [f64; 10] = [100.0, 101.0, 99.0, 102.0, 102.0, 103.0, 101.0, 100.0, 99.0, 98.0];

    #[test]
    fn test_five_minute_scenario() {
        let generator = FingerprintGenerator::new(&series(&SCENARIO));
        let fingerprints = generator.generate([WindowLabel::Minute5]);

        assert_eq!(fingerprints.len(), 6);

        let first = &fingerprints[0];
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(first.window_label, WindowLabel::Minute5);
        assert_eq!(first.start_timestamp, base);
        assert_eq!(first.end_timestamp, base + Duration::minutes(4));
        assert_eq!(first.duration_minutes, 5);
        assert_eq!(first.start_close, 100.0);
        assert_eq!(first.end_close, 102.0);
        assert_eq!(first.absolute_change, 2.0);
        assert!((first.pct_change - 2.0).abs() < 1e-12);
        assert_eq!(first.average_volume, 1.0);
        // closes 100, 101, 99, 102, 102: mean 100.8, variance 6.8 / 5
        assert!((first.volatility - 1.36_f64.sqrt()).abs() < 1e-12);

        let last = &fingerprints[5];
        assert_eq!(last.start_close, 103.0);
        assert_eq!(last.end_close, 98.0);
        assert_eq!(last.end_timestamp, base + Duration::minutes(9));
    }

    #[test]
    fn test_fingerprint_count_per_window() {
        let candles = series(&[1.0; 90]);
        let generator = FingerprintGenerator::new(&candles);

        for window in WindowLabel::all() {
            let count = generator.generate([window]).len();
            let expected = if window.minutes() <= 90 {
                90 - window.minutes() + 1
            } else {
                0
            };
            assert_eq!(count, expected, "window {}", window);
        }
    }

    #[test]
    fn test_generate_keeps_request_order() {
        let generator = FingerprintGenerator::new(&series(&SCENARIO));
        let fingerprints = generator.generate([WindowLabel::Minute10, WindowLabel::Minute1, WindowLabel::Hour1]);

        assert_eq!(fingerprints.len(), 1 + 10);
        assert_eq!(fingerprints[0].window_label, WindowLabel::Minute10);
        assert!(fingerprints[1..].iter().all(|fp| fp.window_label == WindowLabel::Minute1));
    }

    #[test]
    fn test_single_candle_window_has_zero_volatility() {
        let generator = FingerprintGenerator::new(&series(&SCENARIO));
        for fp in generator.generate([WindowLabel::Minute1]) {
            assert_eq!(fp.volatility, 0.0);
            assert_eq!(fp.absolute_change, 0.0);
            assert_eq!(fp.start_timestamp, fp.end_timestamp);
        }
    }

    #[test]
    fn test_zero_start_close_has_zero_pct_change() {
        let generator = FingerprintGenerator::new(&series(&[0.0, 5.0, 7.0, 1.0, 3.0]));
        let fingerprints = generator.generate([WindowLabel::Minute5]);
        assert_eq!(fingerprints.len(), 1);
        assert_eq!(fingerprints[0].pct_change, 0.0);
        assert_eq!(fingerprints[0].absolute_change, 3.0);
    }

    #[test]
    fn test_ids_are_deterministic() {
        let candles = series(&SCENARIO);
        let first: Vec<String> = FingerprintGenerator::new(&candles)
            .generate(WindowLabel::all())
            .into_iter()
            .map(|fp| fp.fingerprint_id)
            .collect();
        let second: Vec<String> = FingerprintGenerator::new(&candles)
            .generate(WindowLabel::all())
            .into_iter()
            .map(|fp| fp.fingerprint_id)
            .collect();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let mut candles = series(&SCENARIO);
        candles.reverse();
        let shuffled = FingerprintGenerator::new(&candles).generate([WindowLabel::Minute5]);
        let ordered = FingerprintGenerator::new(&series(&SCENARIO)).generate([WindowLabel::Minute5]);
        assert_eq!(shuffled, ordered);
    }

    #[test]
    fn test_latest_matches_last_generated() {
        let generator = FingerprintGenerator::new(&series(&SCENARIO));
        let all = generator.generate([WindowLabel::Minute5]);
        assert_eq!(generator.latest(WindowLabel::Minute5).as_ref(), all.last());
        assert!(generator.latest(WindowLabel::Minute30).is_none());
    }

    #[test]
    fn test_empty_series_generates_nothing() {
        let generator = FingerprintGenerator::new(&[]);
        assert!(generator.is_empty());
        assert!(generator.generate(WindowLabel::all()).is_empty());
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[42.0]), 0.0);
        assert!((population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
    }
}
