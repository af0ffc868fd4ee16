//! Interval result log
//!
//! Every box the solver disposes of is recorded under the mechanism that
//! disposed of it. The log is diagnostic only; the algorithm never reads it.
//! Each recursive call builds its own log and the parent folds the
//! children's logs into its own, so no shared state crosses threads.

use std::collections::BTreeMap;
use std::fmt;

use crate::subdivision::interval::Interval;

/// How a box left the solver
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Disposition {
    /// Eliminated by a box-level check
    IntervalCheck(&'static str),
    /// Eliminated by a subinterval check before recursion
    SubintervalCheck(&'static str),
    /// Solved by the elimination solver
    Division,
    /// Solved directly as a linear system
    BaseCase,
    /// Abandoned at the recursion depth limit
    DepthLimit,
    /// Abandoned after the solve exhausted its box budget
    BoxLimit,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Disposition::IntervalCheck(name) | Disposition::SubintervalCheck(name) => name,
            Disposition::Division => "division",
            Disposition::BaseCase => "base case",
            Disposition::DepthLimit => "depth limit",
            Disposition::BoxLimit => "box limit",
        };
        f.pad(name)
    }
}

/// Boxes grouped by disposition
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntervalLog {
    entries: BTreeMap<Disposition, Vec<Interval>>,
}

impl IntervalLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one box
    pub fn record(&mut self, disposition: Disposition, interval: Interval) {
        self.entries.entry(disposition).or_default().push(interval);
    }

    /// Append every entry of `other`, preserving order
    pub fn merge(&mut self, other: IntervalLog) {
        for (disposition, mut boxes) in other.entries {
            self.entries.entry(disposition).or_default().append(&mut boxes);
        }
    }

    /// Boxes recorded under `disposition`
    pub fn get(&self, disposition: &Disposition) -> &[Interval] {
        self.entries.get(disposition).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of boxes recorded under `disposition`
    pub fn count(&self, disposition: &Disposition) -> usize {
        self.get(disposition).len()
    }

    /// Total number of recorded boxes
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over dispositions and their boxes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&Disposition, &[Interval])> {
        self.entries.iter().map(|(d, v)| (d, v.as_slice()))
    }

    /// Per-disposition counts and shares
    pub fn summary(&self) -> IntervalStats {
        let total = self.total();
        let rows = self
            .entries
            .iter()
            .map(|(&disposition, boxes)| {
                let share = if total == 0 {
                    0.0
                } else {
                    100.0 * boxes.len() as f64 / total as f64
                };
                StatsRow {
                    disposition,
                    count: boxes.len(),
                    percent: share,
                }
            })
            .collect();
        IntervalStats { total, rows }
    }
}

/// One line of an [`IntervalStats`] table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsRow {
    /// Mechanism
    pub disposition: Disposition,
    /// Boxes it disposed of
    pub count: usize,
    /// Share of all recorded boxes, in percent
    pub percent: f64,
}

/// Summary of an [`IntervalLog`]
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalStats {
    /// Total recorded boxes
    pub total: usize,
    /// One row per disposition present in the log
    pub rows: Vec<StatsRow>,
}

impl fmt::Display for IntervalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total intervals checked was {}", self.total)?;
        for row in &self.rows {
            writeln!(f, "{:<24} {:>8} {:>7.2}%", row.disposition, row.count, row.percent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut parent = IntervalLog::new();
        parent.record(Disposition::BaseCase, Interval::unit(1));

        let mut child = IntervalLog::new();
        child.record(Disposition::IntervalCheck("constant_term_check"), Interval::unit(1));
        child.record(Disposition::BaseCase, Interval::unit(2));
        parent.merge(child);

        assert_eq!(parent.total(), 3);
        assert_eq!(parent.count(&Disposition::BaseCase), 2);
        assert_eq!(parent.get(&Disposition::BaseCase)[1].dim(), 2);
        assert_eq!(parent.count(&Disposition::Division), 0);
    }

    #[test]
    fn test_summary_percentages() {
        let mut log = IntervalLog::new();
        for _ in 0..3 {
            log.record(Disposition::IntervalCheck("quadratic_check"), Interval::unit(2));
        }
        log.record(Disposition::Division, Interval::unit(2));

        let stats = log.summary();
        assert_eq!(stats.total, 4);
        let pct: f64 = stats.rows.iter().map(|r| r.percent).sum();
        assert!((pct - 100.0).abs() < 1e-12);
        let check = stats
            .rows
            .iter()
            .find(|r| r.disposition == Disposition::IntervalCheck("quadratic_check"))
            .unwrap();
        assert_eq!(check.count, 3);
        assert!((check.percent - 75.0).abs() < 1e-12);

        let text = stats.to_string();
        assert!(text.contains("Total intervals checked was 4"));
        assert!(text.contains("quadratic_check"));
        assert!(text.contains("division"));
    }

    #[test]
    fn test_summary_columns_aligned() {
        let mut log = IntervalLog::new();
        log.record(Disposition::IntervalCheck("constant_term_check"), Interval::unit(2));
        log.record(Disposition::Division, Interval::unit(2));

        assert_eq!(format!("{:<12}|", Disposition::Division), "division    |");
        let text = log.summary().to_string();
        let widths: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|line| line.find(|c: char| c.is_ascii_digit()).unwrap())
            .collect();
        assert_eq!(widths.len(), 2);
        assert_eq!(widths[0], widths[1]);
    }

    #[test]
    fn test_empty_summary() {
        let stats = IntervalLog::new().summary();
        assert_eq!(stats.total, 0);
        assert!(stats.rows.is_empty());
    }
}
