use std::fmt::Display;

use crate::types::SimTime;

/// One histogram cell: how many times the tracked value entered it, and how
/// long the value dwelled there before moving on.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bucket {
    count: u64,
    total: SimTime,
    min: Option<SimTime>,
    max: SimTime,
}

impl Bucket {
    /// Fold one completed dwell into this cell.
    pub fn record(&mut self, dwell: SimTime) {
        self.count += 1;
        self.total += dwell;
        self.min = Some(match self.min {
            None => dwell,
            Some(min) => min.min(dwell),
        });
        self.max = self.max.max(dwell);
    }

    /// How many times the value entered this cell.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all completed dwells.
    pub fn total_time(&self) -> SimTime {
        self.total
    }

    /// Shortest completed dwell, if any was recorded.
    pub fn min_time(&self) -> Option<SimTime> {
        self.min
    }

    /// Longest completed dwell.
    pub fn max_time(&self) -> SimTime {
        self.max
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // count;min;max;total - an unvisited cell renders its min as 0
        write!(
            f,
            "{};{};{};{}",
            self.count,
            self.min.unwrap_or_default(),
            self.max,
            self.total
        )
    }
}

#[cfg(test)]
mod test {
    use crate::types::SimTime;

    use super::Bucket;

    #[test_log::test]
    fn first_record_pins_min_and_max() {
        let mut bucket = Bucket::default();
        bucket.record(SimTime::from_ticks(7));
        assert_eq!(1, bucket.count());
        assert_eq!(Some(SimTime::from_ticks(7)), bucket.min_time());
        assert_eq!(SimTime::from_ticks(7), bucket.max_time());
        assert_eq!(SimTime::from_ticks(7), bucket.total_time());
    }

    #[test_log::test]
    fn accumulation_keeps_dwell_ordering() {
        let mut bucket = Bucket::default();
        for dwell in [9, 2, 5] {
            bucket.record(SimTime::from_ticks(dwell));
        }
        assert_eq!(3, bucket.count());
        assert_eq!(Some(SimTime::from_ticks(2)), bucket.min_time());
        assert_eq!(SimTime::from_ticks(9), bucket.max_time());
        assert_eq!(SimTime::from_ticks(16), bucket.total_time());
        assert!(bucket.min_time().expect("recorded") <= bucket.max_time());
        assert!(bucket.total_time() >= bucket.max_time());
    }

    #[test_log::test]
    fn text_form() {
        let mut bucket = Bucket::default();
        assert_eq!("0;0;0;0", bucket.to_string());
        bucket.record(SimTime::from_ticks(4));
        bucket.record(SimTime::from_ticks(6));
        assert_eq!("2;4;6;10", bucket.to_string());
    }

    #[test_log::test]
    fn zero_dwell_still_counts() {
        let mut bucket = Bucket::default();
        bucket.record(SimTime::ZERO);
        assert_eq!(1, bucket.count());
        assert_eq!(Some(SimTime::ZERO), bucket.min_time());
        assert_eq!("1;0;0;0", bucket.to_string());
    }
}
