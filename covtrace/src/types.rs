use std::{
    cell::Cell,
    fmt::Display,
    ops::{Add, AddAssign, Sub},
    rc::Rc,
    sync::Arc,
};

/// An identifier for coverage series.
#[derive(Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Clone)]
pub enum Name {
    /// A static string Name.
    Str(&'static str),
    /// A String name. Avoid these when you can, because clones can add up.
    String(String),
    /// If you have a rarely-changing identifier you could consider using shared memory
    /// instead of cloning repeatedly.
    Shared(Arc<String>),
}

impl Name {
    /// an &str view of the name
    pub fn as_str(&self) -> &str {
        match self {
            Name::Str(s) => s,
            Name::String(s) => s,
            Name::Shared(s) => s,
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Name::Str(s) => f.write_str(s),
            Name::String(s) => f.write_str(s),
            Name::Shared(s) => f.write_str(s),
        }
    }
}

impl From<&'static str> for Name {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Str(s)
    }
}

impl From<String> for Name {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Arc<String>> for Name {
    #[inline]
    fn from(s: Arc<String>) -> Self {
        Self::Shared(s)
    }
}

/// A point in, or span of, simulated time, counted in the host scheduler's
/// default time unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(u64);

impl SimTime {
    /// Time zero, where every simulation starts.
    pub const ZERO: SimTime = SimTime(0);

    /// A time stamp or duration of `ticks` default time units.
    pub const fn from_ticks(ticks: u64) -> Self {
        SimTime(ticks)
    }

    /// The raw tick count.
    pub const fn ticks(self) -> u64 {
        self.0
    }
}

impl Sub for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(
            self.0
                .checked_sub(rhs.0)
                .expect("simulated time must not run backwards"),
        )
    }
}

impl Add for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl AddAssign for SimTime {
    fn add_assign(&mut self, rhs: SimTime) {
        self.0 += rhs.0;
    }
}

impl Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SimTime {
    #[inline]
    fn from(ticks: u64) -> Self {
        SimTime(ticks)
    }
}

/// Where the registry reads the current simulation time from.
pub enum TimeSource {
    /// A tick counter shared with the scheduler. The scheduler advances it;
    /// the registry only reads it.
    Shared(Rc<Cell<u64>>),
    /// Custom time lookup, primarily for tests.
    Dynamic(Box<dyn Fn() -> SimTime>),
}

impl TimeSource {
    pub(crate) fn now(&self) -> SimTime {
        match self {
            TimeSource::Shared(ticks) => SimTime::from_ticks(ticks.get()),
            TimeSource::Dynamic(now) => now(),
        }
    }
}

impl std::fmt::Debug for TimeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shared(ticks) => f.debug_tuple("Shared").field(&ticks.get()).finish(),
            Self::Dynamic { .. } => f.debug_tuple("Dynamic").finish(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::{cell::Cell, rc::Rc};

    use super::{Name, SimTime, TimeSource};

    #[test_log::test]
    fn name_views() {
        assert_eq!("clk", Name::from("clk").as_str());
        assert_eq!("clk", Name::from("clk".to_string()).to_string());
    }

    #[test_log::test]
    fn time_arithmetic() {
        let early = SimTime::from_ticks(5);
        let late = SimTime::from_ticks(12);
        assert_eq!(SimTime::from_ticks(7), late - early);
        assert_eq!(late, early + SimTime::from_ticks(7));
        assert!(early < late);
        assert_eq!("12", late.to_string());
    }

    #[test_log::test]
    #[should_panic(expected = "run backwards")]
    fn time_must_be_monotone() {
        let _ = SimTime::from_ticks(5) - SimTime::from_ticks(12);
    }

    #[test_log::test]
    fn time_sources() {
        let ticks = Rc::new(Cell::new(3_u64));
        let shared = TimeSource::Shared(ticks.clone());
        assert_eq!(SimTime::from_ticks(3), shared.now());
        ticks.set(9);
        assert_eq!(SimTime::from_ticks(9), shared.now());

        let dynamic = TimeSource::Dynamic(Box::new(|| SimTime::from_ticks(42)));
        assert_eq!(SimTime::from_ticks(42), dynamic.now());
    }
}
