//! The 30-minute reporting delay transform.
//!
//! Consumers must never see bars recent enough to reveal the live market,
//! so the transform drops enough trailing bars to cover a 30-minute lag
//! (plus the still-forming bar) and shifts every surviving timestamp
//! forward by 30 minutes, matching the "close time + 30 min" convention
//! the chart client renders against.
//!
//! The returned iterator yields **newest-first**, which is what the
//! "current bar" consumers (the price oracle) want. Chart callers that
//! need oldest-first must reverse again via [`DelayedCandles::rev`]; this
//! asymmetry is the documented convention of the transform, not a bug.

use crate::interval::interval_minutes;
use coinhub_core::Candle;

/// How far reported timestamps lag behind real bar times.
pub const REPORTING_LAG_SECS: i64 = 30 * 60;

/// Delay-transform a chronologically ordered slice of raw candles.
///
/// At most `limit` bars are yielded. `limit` is assumed to be clamped by
/// the caller (the API edge clamps to 1–1000); it is not validated here.
/// When fewer bars exist than the delay window requires, the result is
/// empty: a valid state for thin feeds, not an error.
pub fn delayed<'a>(candles: &'a [Candle], interval: &str, limit: usize) -> DelayedCandles<'a> {
    // Trailing bars that are too recent to disclose. The +1 drops the
    // still-forming bar; the division term covers the 30-minute lag at
    // any granularity (coarser-than-30m intervals only lose the forming bar).
    let to_remove = (30 / interval_minutes(interval) + 1) as usize;
    let disclosed_end = candles.len().saturating_sub(to_remove);
    let start = disclosed_end.saturating_sub(limit);

    DelayedCandles {
        inner: candles[start..disclosed_end].iter().rev(),
    }
}

/// Lazy, restartable (`Clone`) iterator over delay-shifted candles,
/// newest-first. Produced by [`delayed`].
#[derive(Debug, Clone)]
pub struct DelayedCandles<'a> {
    inner: std::iter::Rev<std::slice::Iter<'a, Candle>>,
}

impl Iterator for DelayedCandles<'_> {
    type Item = Candle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|c| c.shifted(REPORTING_LAG_SECS))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for DelayedCandles<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|c| c.shifted(REPORTING_LAG_SECS))
    }
}

impl ExactSizeIterator for DelayedCandles<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    /// `n` one-minute bars starting at `start` (unix seconds), close = index.
    fn minute_bars(n: usize, start: i64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle {
                time: start + (i as i64) * 60,
                open: Decimal::from(i as i64),
                high: Decimal::from(i as i64 + 1),
                low: Decimal::from(i as i64),
                close: Decimal::from(i as i64),
                volume: Decimal::ONE,
            })
            .collect()
    }

    #[test]
    fn test_one_minute_feed_loses_thirty_one_bars() {
        // N 1m bars with limit 200 must yield min(200, N - 31) bars.
        for n in [32usize, 100, 231, 500] {
            let bars = minute_bars(n, 1_700_000_000);
            let out: Vec<_> = delayed(&bars, "1m", 200).collect();
            assert_eq!(out.len(), (n - 31).min(200), "n = {n}");
        }
    }

    #[test]
    fn test_short_feed_yields_empty() {
        let bars = minute_bars(31, 1_700_000_000);
        assert_eq!(delayed(&bars, "1m", 200).count(), 0);

        let bars = minute_bars(0, 1_700_000_000);
        assert_eq!(delayed(&bars, "1m", 200).count(), 0);
    }

    #[test]
    fn test_timestamps_shift_thirty_minutes() {
        let bars = minute_bars(100, 1_700_000_000);
        for (shifted, raw) in delayed(&bars, "1m", 200).zip(bars.iter().rev().skip(31)) {
            assert_eq!(shifted.time, raw.time + 1800);
            assert_eq!(shifted.close, raw.close);
        }
    }

    #[test]
    fn test_newest_first_order() {
        let bars = minute_bars(100, 1_700_000_000);
        let out: Vec<_> = delayed(&bars, "1m", 200).collect();

        // Newest surviving bar is index 68 (100 - 31 - 1), close = 68.
        assert_eq!(out[0].close, Decimal::from(68));
        assert!(out.windows(2).all(|w| w[0].time > w[1].time));
    }

    #[test]
    fn test_rev_restores_chronological_order() {
        let bars = minute_bars(100, 1_700_000_000);
        let out: Vec<_> = delayed(&bars, "1m", 200).rev().collect();
        assert!(out.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_hourly_interval_drops_only_forming_bar() {
        // 1h: 30 / 60 = 0, so only the still-forming bar is removed.
        let bars: Vec<_> = (0..10)
            .map(|i| Candle {
                time: 1_700_000_000 + i * 3600,
                open: Decimal::from(i),
                high: Decimal::from(i),
                low: Decimal::from(i),
                close: Decimal::from(i),
                volume: Decimal::ONE,
            })
            .collect();

        let out: Vec<_> = delayed(&bars, "1h", 200).collect();
        assert_eq!(out.len(), 9);
        assert_eq!(out[0].close, Decimal::from(8));
    }

    #[test]
    fn test_limit_takes_most_recent_of_survivors() {
        let bars = minute_bars(100, 1_700_000_000);
        let out: Vec<_> = delayed(&bars, "1m", 5).collect();

        assert_eq!(out.len(), 5);
        // Still the newest survivors: closes 68, 67, 66, 65, 64.
        assert_eq!(out[0].close, Decimal::from(68));
        assert_eq!(out[4].close, Decimal::from(64));
    }

    #[test]
    fn test_unknown_interval_uses_hourly_window() {
        let bars = minute_bars(10, 1_700_000_000);
        // Unknown code -> 60 minutes -> remove 1 bar.
        let out: Vec<_> = delayed(&bars, "??", 200).collect();
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let bars = minute_bars(50, 1_700_000_000);
        let iter = delayed(&bars, "1m", 10);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }
}
