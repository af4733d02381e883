use std::{
    collections::HashSet,
    io::{self, Write},
    rc::Rc,
};

use crate::{
    coverage::CoverSeries,
    types::{Name, TimeSource},
    value::{ValueKind, ValueSource},
};

/// Owns every coverage series and drives them from the scheduler's
/// per-cycle callbacks.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use covtrace::registry::CoverageRegistry;
/// use covtrace::types::TimeSource;
/// use covtrace::value::IntSignal;
///
/// let ticks = Rc::new(Cell::new(0_u64));
/// let mut registry = CoverageRegistry::new(TimeSource::Shared(ticks.clone()));
///
/// let opcode = IntSignal::unsigned(2);
/// registry.register("opcode", opcode.clone());
///
/// registry.cycle(false); // the first cycle only establishes baselines
///
/// ticks.set(5);
/// opcode.set(1);
/// registry.cycle(false);
///
/// let mut report = Vec::new();
/// registry.finish(&mut report).expect("writing to memory cannot fail");
/// assert!(String::from_utf8(report).unwrap().starts_with("opcode,1,"));
/// ```
pub struct CoverageRegistry {
    series: Vec<CoverSeries>,
    names: HashSet<Name>,
    time: TimeSource,
    trace_delta_cycles: bool,
    initialized: bool,
}

impl CoverageRegistry {
    /// A registry reading "now" from the given time source. Delta-cycle
    /// sampling starts out disabled.
    pub fn new(time: TimeSource) -> Self {
        CoverageRegistry {
            series: Vec::new(),
            names: HashSet::new(),
            time,
            trace_delta_cycles: false,
            initialized: false,
        }
    }

    /// Sample on delta cycles too, not only on time-advancing cycles.
    pub fn set_trace_delta_cycles(&mut self, enabled: bool) {
        self.trace_delta_cycles = enabled;
    }

    /// Registers a value for coverage under a unique name.
    ///
    /// Unsupported kinds (floating-point, fixed-point, enumerations) and
    /// duplicate names are warned on the log channel and skipped; the
    /// registry stays fully valid either way, and an earlier registration
    /// under the same name is kept untouched.
    pub fn register(&mut self, name: impl Into<Name>, source: Rc<dyn ValueSource>) {
        self.add(name.into(), source, false);
    }

    /// Like [`CoverageRegistry::register`], but asks for one bucket per
    /// representable value. Only valid for signals up to 10 bits wide;
    /// wider signals make initialization panic.
    pub fn register_per_value(&mut self, name: impl Into<Name>, source: Rc<dyn ValueSource>) {
        self.add(name.into(), source, true);
    }

    fn add(&mut self, name: Name, source: Rc<dyn ValueSource>, per_value: bool) {
        if let ValueKind::Unsupported { type_name } = source.kind() {
            log::warn!("no coverage support for {type_name} values: {name}");
            return;
        }
        if !self.names.insert(name.clone()) {
            log::warn!("coverage object {name} already registered; keeping the first one");
            return;
        }
        self.series.push(CoverSeries::new(name, source, per_value));
    }

    /// Fixes every series' bucket geometry and baseline, in registration
    /// order. Runs at most once; later calls do nothing. [`CoverageRegistry::cycle`]
    /// triggers this lazily on its first effective invocation.
    pub fn initialize_all(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        for series in &mut self.series {
            series.initialize();
        }
        log::debug!("initialized {} coverage series", self.series.len());
    }

    /// The scheduler's per-evaluation-step callback.
    ///
    /// Delta cycles are skipped unless delta tracing is enabled. The first
    /// effective cycle initializes every series and returns without
    /// sampling: it only establishes baselines.
    pub fn cycle(&mut self, delta_cycle: bool) {
        if !self.trace_delta_cycles && delta_cycle {
            return;
        }
        if !self.initialized {
            self.initialize_all();
            return;
        }
        let now = self.time.now();
        for series in &mut self.series {
            series.update(now);
        }
    }

    /// Writes one report row per series, in registration order, and tears
    /// the registry down.
    pub fn finish(self, out: &mut dyn Write) -> io::Result<()> {
        for series in &self.series {
            writeln!(out, "{}", series.report())?;
        }
        Ok(())
    }

    /// Series in registration order.
    pub fn series(&self) -> impl Iterator<Item = &CoverSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
