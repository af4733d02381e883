//! Time-weighted functional coverage for discrete-event simulation.
//!
//! `covtrace` watches scalar and bit-vector values while a simulation runs,
//! groups each value's observations into buckets - one bucket per value for
//! narrow signals, a bounded number of top-bit bands otherwise - and
//! records per bucket how often the value entered it and how long it
//! dwelled there before changing again. At the end of the run every
//! histogram serializes as one text row:
//! `name,transitions,count;min;max;total,…`.
//!
//! The simulation scheduler drives a [`registry::CoverageRegistry`] once
//! per evaluation cycle. Values are bound through the
//! [`value::ValueSource`] trait; ready-made bindings for integers, wide bit
//! vectors, single-bit flags, and tri-state logic live in [`value`].
//!
//! # Examples
//!
//! See the example on [`registry::CoverageRegistry`].

pub mod coverage;
pub mod registry;
pub mod types;
pub mod value;
