//! Opaque bindings to the simulation's value types.
//!
//! Coverage never inspects a concrete signal type. Everything it needs is
//! behind [`ValueSource`]: a registration-time [`ValueKind`] tag and an
//! equality-comparable [`Sample`] of the current bits. Ready-made bindings
//! for common signal shapes live in this module.

mod signal;

pub use signal::{
    BitSignal, EnumSignal, FixedSignal, FloatSignal, IntSignal, Logic, LogicSignal, VectorSignal,
};

/// How a registered value participates in coverage, decided from its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Ordinary integer or bit-vector value; banding applies.
    Integral {
        /// Declared bit width.
        width: u32,
        /// Two's-complement interpretation.
        signed: bool,
    },
    /// Inherently enumerated kind (single bit, tri-state logic): one bucket
    /// per representable state, never banded.
    State {
        /// Number of representable states.
        states: u8,
    },
    /// Accepted at registration but excluded from coverage.
    Unsupported {
        /// Human-readable type family for the warning.
        type_name: &'static str,
    },
}

/// A snapshot of a value source at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sample {
    /// Raw two's-complement bits of an integral value, width at most 64.
    Bits(u64),
    /// A wide bit vector, least-significant 64-bit word first.
    Vector(Vec<u64>),
    /// The state index of an enumerated kind.
    State(u8),
}

impl Sample {
    /// NOR reduction: true when every bit is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Sample::Bits(bits) => *bits == 0,
            Sample::Vector(words) => words.iter().all(|word| *word == 0),
            Sample::State(state) => *state == 0,
        }
    }

    /// Reads the inclusive bit range `hi..=lo` as an unsigned integer.
    /// The range must span at most 64 bits; bits past the stored width read
    /// as zero.
    pub fn extract(&self, hi: u32, lo: u32) -> u64 {
        debug_assert!(hi >= lo && hi - lo < 64, "invalid bit range {hi}..={lo}");
        match self {
            Sample::Bits(bits) => {
                let shifted = if lo < 64 { bits >> lo } else { 0 };
                mask(shifted, hi - lo + 1)
            }
            Sample::Vector(words) => {
                let mut out = 0_u64;
                for bit in (lo..=hi).rev() {
                    let word = (bit / 64) as usize;
                    let set = words
                        .get(word)
                        .is_some_and(|word| (word >> (bit % 64)) & 1 == 1);
                    out = (out << 1) | set as u64;
                }
                out
            }
            Sample::State(state) => {
                let shifted = if lo < 8 { (*state as u64) >> lo } else { 0 };
                mask(shifted, hi - lo + 1)
            }
        }
    }
}

fn mask(value: u64, bits: u32) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1 << bits) - 1)
    }
}

/// One tracked value, as the simulation exposes it to coverage.
///
/// Implementations hold the live value; coverage keeps a shared non-owning
/// handle and samples it at cycle boundaries.
pub trait ValueSource {
    /// The coverage kind of this value's type. Must not change over the
    /// life of the binding.
    fn kind(&self) -> ValueKind;

    /// The value's bits right now.
    fn sample(&self) -> Sample;
}

#[cfg(test)]
mod test {
    use super::Sample;

    #[test_log::test]
    fn zero_reduction() {
        assert!(Sample::Bits(0).is_zero());
        assert!(!Sample::Bits(0x80).is_zero());
        assert!(Sample::Vector(vec![0, 0, 0]).is_zero());
        assert!(!Sample::Vector(vec![0, 1]).is_zero());
        assert!(Sample::State(0).is_zero());
        assert!(!Sample::State(3).is_zero());
    }

    #[test_log::test]
    fn bit_extraction() {
        let bits = Sample::Bits(0b1101_0110);
        assert_eq!(0b1101_0110, bits.extract(7, 0));
        assert_eq!(0b1101, bits.extract(7, 4));
        assert_eq!(0b0110, bits.extract(3, 0));
        assert_eq!(1, bits.extract(63, 63) ^ 1);
    }

    #[test_log::test]
    fn vector_extraction_spans_words() {
        // bit 63 of word 0 and bit 0 of word 1 set
        let vector = Sample::Vector(vec![1 << 63, 1]);
        assert_eq!(0b11, vector.extract(64, 63));
        assert_eq!(0b110, vector.extract(64, 62));
        // bits past the stored words read as zero
        assert_eq!(0, vector.extract(200, 190));
    }
}
