//! Rest-window partitioning.
//!
//! Turns a team's candidate match dates into the family of maximal date
//! windows whose span is at most `window_days`. Constraining each window to
//! hold at most one match forbids every pair of matches that are
//! `window_days` or fewer days apart:
//!
//! - For two dates at most `window_days` apart, the window anchored at the
//!   earlier date contains both, and that window is either kept or contained
//!   in a kept window.
//! - A window that is a subset of another adds nothing, so only maximal
//!   windows are returned.
//!
//! # Algorithm
//!
//! Sort the dates. The window anchored at `dates[i]` is `dates[i..end(i)]`,
//! where `end(i)` is the first index more than `window_days` after the
//! anchor. `end` is non-decreasing in `i`, so it is found with a single
//! forward pointer, and window `i` is contained in window `i - 1` exactly
//! when `end(i) == end(i - 1)`. No later window can contain an earlier one
//! (it misses the earlier anchor). The kept windows are therefore the
//! anchors where `end` advances.
//!
//! # Complexity
//! O(k log k) for k dates (sorting dominates).

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::error::ScheduleError;
use crate::validation::{ValidationError, ValidationErrorKind};

/// A set of dates spanning at most the window length.
pub type DateWindow = BTreeSet<NaiveDate>;

/// Computes the maximal forward-anchored windows over `dates`.
///
/// Every input date appears in at least one window, every window spans at
/// most `window_days` days (latest minus earliest), and no window is a
/// subset of another. Windows are returned in order of their earliest date.
/// Duplicate input dates are ignored.
///
/// # Errors
/// [`ScheduleError::Configuration`] if `window_days` is negative.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use fixture_schedule::windows::date_windows;
///
/// let jan = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
/// let windows = date_windows([jan(1), jan(3), jan(8)], 5).unwrap();
///
/// assert_eq!(windows.len(), 2);
/// assert!(windows[0].iter().eq([jan(1), jan(3)].iter()));
/// assert!(windows[1].iter().eq([jan(3), jan(8)].iter()));
/// ```
pub fn date_windows<I>(dates: I, window_days: i64) -> Result<Vec<DateWindow>, ScheduleError>
where
    I: IntoIterator<Item = NaiveDate>,
{
    if window_days < 0 {
        return Err(ScheduleError::configuration(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("window_days must be non-negative, got {window_days}"),
        )));
    }

    let mut sorted: Vec<NaiveDate> = dates.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut windows = Vec::new();
    let mut end = 0;
    let mut prev_end = 0;

    for (start, &anchor) in sorted.iter().enumerate() {
        end = end.max(start + 1);
        while end < sorted.len() && (sorted[end] - anchor).num_days() <= window_days {
            end += 1;
        }

        if end > prev_end {
            windows.push(sorted[start..end].iter().copied().collect());
            prev_end = end;
        }
    }

    Ok(windows)
}

/// Number of days between the earliest and latest date of a window.
///
/// Zero for empty and single-date windows.
pub fn window_span_days(window: &DateWindow) -> i64 {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => (*last - *first).num_days(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn set(dates: &[NaiveDate]) -> DateWindow {
        dates.iter().copied().collect()
    }

    #[test]
    fn test_basic_windows() {
        let result = date_windows([jan(1), jan(3), jan(8)], 5).unwrap();
        // {8} alone is contained in {3, 8}
        assert_eq!(result, vec![set(&[jan(1), jan(3)]), set(&[jan(3), jan(8)])]);
    }

    #[test]
    fn test_unsorted_input() {
        let result = date_windows([jan(8), jan(1), jan(3)], 5).unwrap();
        assert_eq!(result, vec![set(&[jan(1), jan(3)]), set(&[jan(3), jan(8)])]);
    }

    #[test]
    fn test_single_date() {
        let result = date_windows([jan(1)], 7).unwrap();
        assert_eq!(result, vec![set(&[jan(1)])]);
    }

    #[test]
    fn test_all_dates_in_window() {
        let dates = [jan(1), jan(2), jan(3), jan(4)];
        let result = date_windows(dates, 10).unwrap();
        assert_eq!(result, vec![set(&dates)]);
    }

    #[test]
    fn test_no_overlapping_windows() {
        let result = date_windows([jan(1), jan(10), jan(20)], 3).unwrap();
        assert_eq!(
            result,
            vec![set(&[jan(1)]), set(&[jan(10)]), set(&[jan(20)])]
        );
    }

    #[test]
    fn test_window_size_zero() {
        let result = date_windows([jan(2), jan(1)], 0).unwrap();
        assert_eq!(result, vec![set(&[jan(1)]), set(&[jan(2)])]);
    }

    #[test]
    fn test_span_boundary_is_inclusive() {
        // Exactly window_days apart: same window
        let result = date_windows([jan(1), jan(8)], 7).unwrap();
        assert_eq!(result, vec![set(&[jan(1), jan(8)])]);

        let result = date_windows([jan(1), jan(9)], 7).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        let result = date_windows([jan(1), jan(1), jan(3)], 0).unwrap();
        assert_eq!(result, vec![set(&[jan(1)]), set(&[jan(3)])]);
    }

    #[test]
    fn test_empty_input() {
        let result = date_windows(Vec::new(), 7).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_negative_window_rejected() {
        let err = date_windows([jan(1)], -1).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_window_span_days() {
        assert_eq!(window_span_days(&set(&[])), 0);
        assert_eq!(window_span_days(&set(&[jan(5)])), 0);
        assert_eq!(window_span_days(&set(&[jan(5), jan(2), jan(9)])), 7);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Anchored windows filtered by descending size against kept windows.
        fn reference_windows(dates: &[NaiveDate], window_days: i64) -> Vec<DateWindow> {
            let mut sorted = dates.to_vec();
            sorted.sort();
            sorted.dedup();

            let mut all: Vec<DateWindow> = sorted
                .iter()
                .map(|&anchor| {
                    sorted
                        .iter()
                        .copied()
                        .filter(|&d| d >= anchor && (d - anchor).num_days() <= window_days)
                        .collect()
                })
                .collect();
            all.sort_by_key(|w| std::cmp::Reverse(w.len()));

            let mut kept: Vec<DateWindow> = Vec::new();
            for w in all {
                if !kept.iter().any(|k| w.is_subset(k)) {
                    kept.push(w);
                }
            }
            kept
        }

        fn dates_strategy() -> impl Strategy<Value = Vec<NaiveDate>> {
            prop::collection::vec(0i64..400, 0..20).prop_map(|offsets| {
                offsets
                    .into_iter()
                    .map(|o| jan(1) + chrono::Duration::days(o))
                    .collect()
            })
        }

        proptest! {
            /// Property: output is subset-free, covers every date, respects the span
            #[test]
            fn prop_windows_are_maximal_cover(dates in dates_strategy(), window_days in 0i64..30) {
                let result = date_windows(dates.clone(), window_days).unwrap();

                for d in &dates {
                    prop_assert!(result.iter().any(|w| w.contains(d)));
                }
                for w in &result {
                    prop_assert!(!w.is_empty());
                    prop_assert!(window_span_days(w) <= window_days);
                    prop_assert!(w.iter().all(|d| dates.contains(d)));
                }
                for (i, a) in result.iter().enumerate() {
                    for (j, b) in result.iter().enumerate() {
                        if i != j {
                            prop_assert!(!a.is_subset(b));
                        }
                    }
                }
            }

            /// Property: same family as the quadratic anchored-window filter
            #[test]
            fn prop_matches_reference(dates in dates_strategy(), window_days in 0i64..30) {
                let mut result = date_windows(dates.clone(), window_days).unwrap();
                let mut expected = reference_windows(&dates, window_days);
                result.sort();
                expected.sort();
                prop_assert_eq!(result, expected);
            }

            /// Property: every close pair shares a window
            #[test]
            fn prop_close_pairs_share_a_window(dates in dates_strategy(), window_days in 0i64..30) {
                let result = date_windows(dates.clone(), window_days).unwrap();
                for a in &dates {
                    for b in &dates {
                        if (*b - *a).num_days().abs() <= window_days {
                            prop_assert!(result.iter().any(|w| w.contains(a) && w.contains(b)));
                        }
                    }
                }
            }

            /// Property: zero-length windows are exactly the singletons
            #[test]
            fn prop_zero_window_singletons(dates in dates_strategy()) {
                let result = date_windows(dates.clone(), 0).unwrap();
                let distinct: BTreeSet<NaiveDate> = dates.iter().copied().collect();
                prop_assert_eq!(result.len(), distinct.len());
                prop_assert!(result.iter().all(|w| w.len() == 1));
            }
        }
    }
}
