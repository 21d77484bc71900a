//! Digit frequency analysis.
//!
//! Counts each digit over a window snapshot and ranks the ten rows by count
//! (descending), breaking ties by the lower digit. Pure and deterministic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::digit::Digit;

/// Number of distinct digits, and therefore of rows in every snapshot.
pub const DIGIT_COUNT: usize = 10;

/// Frequency a digit would have under a uniform stream.
const UNIFORM_PCT: Decimal = dec!(10);

/// Count and share of one digit in the analyzed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    pub digit: Digit,
    pub count: usize,
    /// Share of the window in percent, 0..=100
    pub frequency_pct: Decimal,
}

/// Display status of a row in the probability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStatus {
    MostFrequent,
    StrongSignal,
    Normal,
}

impl RowStatus {
    pub fn label(self) -> &'static str {
        match self {
            RowStatus::MostFrequent => "Most Frequent",
            RowStatus::StrongSignal => "Strong Signal",
            RowStatus::Normal => "Normal",
        }
    }
}

/// Position of a digit's frequency relative to the uniform 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bias {
    Above,
    Below,
    Uniform,
}

impl FrequencyRow {
    pub fn bias(&self) -> Bias {
        match self.frequency_pct.cmp(&UNIFORM_PCT) {
            std::cmp::Ordering::Greater => Bias::Above,
            std::cmp::Ordering::Less => Bias::Below,
            std::cmp::Ordering::Equal => Bias::Uniform,
        }
    }
}

/// Ranked frequency table for one window snapshot.
///
/// Always holds exactly ten rows, so `top` and `runner_up` always exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSnapshot {
    rows: [FrequencyRow; DIGIT_COUNT],
    sample_size: usize,
}

impl AnalysisSnapshot {
    /// Rows ranked by count descending, digit ascending on ties.
    pub fn rows(&self) -> &[FrequencyRow; DIGIT_COUNT] {
        &self.rows
    }

    /// Rank 0.
    pub fn top(&self) -> FrequencyRow {
        self.rows[0]
    }

    /// Rank 1.
    pub fn runner_up(&self) -> FrequencyRow {
        self.rows[1]
    }

    /// Number of digits that were analyzed.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn is_empty(&self) -> bool {
        self.sample_size == 0
    }

    /// Row for a specific digit, regardless of rank.
    pub fn row(&self, digit: Digit) -> FrequencyRow {
        self.rows
            .iter()
            .copied()
            .find(|row| row.digit == digit)
            .unwrap_or(FrequencyRow {
                digit,
                count: 0,
                frequency_pct: Decimal::ZERO,
            })
    }

    /// Whether the runner-up has reached the signal threshold. An empty
    /// window never qualifies.
    pub fn meets_threshold(&self, threshold_pct: Decimal) -> bool {
        !self.is_empty() && self.runner_up().frequency_pct >= threshold_pct
    }

    /// Classify a row for the probability table.
    pub fn status(&self, row: &FrequencyRow, threshold_pct: Decimal) -> RowStatus {
        if row.digit == self.top().digit {
            RowStatus::MostFrequent
        } else if row.frequency_pct >= threshold_pct {
            RowStatus::StrongSignal
        } else {
            RowStatus::Normal
        }
    }
}

/// Analyze a window snapshot.
///
/// An empty input yields ten zero rows (0% each) ranked 0..=9.
pub fn analyze(ticks: &[Digit]) -> AnalysisSnapshot {
    let mut counts = [0usize; DIGIT_COUNT];
    for digit in ticks {
        counts[digit.index()] += 1;
    }

    let denominator = Decimal::from(ticks.len().max(1) as u64);
    let mut rows: [FrequencyRow; DIGIT_COUNT] = std::array::from_fn(|i| FrequencyRow {
        digit: Digit::from_index(i),
        count: counts[i],
        frequency_pct: Decimal::from(counts[i] as u64) * dec!(100) / denominator,
    });

    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.digit.cmp(&b.digit)));

    AnalysisSnapshot {
        rows,
        sample_size: ticks.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(values: &[i64]) -> Vec<Digit> {
        values.iter().map(|v| Digit::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_empty_window() {
        let snapshot = analyze(&[]);

        assert_eq!(snapshot.rows().len(), DIGIT_COUNT);
        for row in snapshot.rows() {
            assert_eq!(row.count, 0);
            assert_eq!(row.frequency_pct, Decimal::ZERO);
        }
        assert_eq!(snapshot.top().digit.value(), 0);
        assert_eq!(snapshot.runner_up().digit.value(), 1);
        assert_eq!(snapshot.runner_up().frequency_pct, Decimal::ZERO);
        assert!(snapshot.is_empty());
        assert!(!snapshot.meets_threshold(Decimal::ZERO));
    }

    #[test]
    fn test_frequencies_sum_to_hundred() {
        let samples: [&[i64]; 4] = [
            &[4],
            &[1, 2, 3],
            &[0, 9, 9, 5, 5, 5, 7],
            &[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9],
        ];
        for sample in samples {
            let snapshot = analyze(&digits(sample));
            let total: Decimal = snapshot.rows().iter().map(|r| r.frequency_pct).sum();
            assert!(
                (total - dec!(100)).abs() <= dec!(0.01),
                "sum {} for {:?}",
                total,
                sample
            );
        }
    }

    #[test]
    fn test_tie_break_prefers_lower_digit() {
        let snapshot = analyze(&digits(&[5, 3, 5, 3, 5, 3]));

        assert_eq!(snapshot.top().digit.value(), 3);
        assert_eq!(snapshot.runner_up().digit.value(), 5);
        assert_eq!(snapshot.top().count, 3);
        assert_eq!(snapshot.runner_up().count, 3);

        // Zero-count digits follow in ascending order
        let rest: Vec<u8> = snapshot.rows()[2..].iter().map(|r| r.digit.value()).collect();
        assert_eq!(rest, vec![0, 1, 2, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_ranking_and_percentages() {
        let snapshot = analyze(&digits(&[1, 1, 1, 1, 1, 1, 1, 2]));

        assert_eq!(snapshot.top().digit.value(), 1);
        assert_eq!(snapshot.top().frequency_pct, dec!(87.5));
        assert_eq!(snapshot.runner_up().digit.value(), 2);
        assert_eq!(snapshot.runner_up().frequency_pct, dec!(12.5));
        assert!(snapshot.meets_threshold(dec!(12.5)));
        assert!(!snapshot.meets_threshold(dec!(12.6)));
        assert_eq!(snapshot.sample_size(), 8);
    }

    #[test]
    fn test_all_equal_counts_rank_by_digit() {
        let all: Vec<i64> = (0..10).collect();
        let snapshot = analyze(&digits(&all));

        assert_eq!(snapshot.top().digit.value(), 0);
        assert_eq!(snapshot.runner_up().digit.value(), 1);
        assert_eq!(snapshot.runner_up().frequency_pct, dec!(10));
    }

    #[test]
    fn test_row_status_and_bias() {
        // 0 x4, 7 x2, 8 x1, 9 x1 over 8 ticks
        let snapshot = analyze(&digits(&[0, 0, 0, 0, 7, 7, 8, 9]));
        let threshold = dec!(12.5);

        let top = snapshot.row(Digit::new(0).unwrap());
        assert_eq!(snapshot.status(&top, threshold), RowStatus::MostFrequent);
        assert_eq!(top.bias(), Bias::Above);

        let seven = snapshot.row(Digit::new(7).unwrap());
        assert_eq!(seven.frequency_pct, dec!(25));
        assert_eq!(snapshot.status(&seven, threshold), RowStatus::StrongSignal);

        let eight = snapshot.row(Digit::new(8).unwrap());
        assert_eq!(snapshot.status(&eight, threshold), RowStatus::StrongSignal);

        let three = snapshot.row(Digit::new(3).unwrap());
        assert_eq!(snapshot.status(&three, threshold), RowStatus::Normal);
        assert_eq!(three.bias(), Bias::Below);

        let uniform = analyze(&digits(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]));
        assert_eq!(uniform.rows()[4].bias(), Bias::Uniform);
    }
}
