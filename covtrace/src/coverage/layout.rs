use crate::value::{Sample, ValueKind};

/// Most buckets a banded series will ever use, not counting the zero bucket.
pub const MAX_BANDS: usize = 16;

const LOG_MAX_BANDS: u32 = MAX_BANDS.ilog2();

/// Widest signal allowed to request one bucket per value.
const MAX_PER_VALUE_WIDTH: u32 = 10;

/// How raw values map onto bucket indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketMode {
    /// One bucket per representable value. Only for narrow signals.
    PerValue,
    /// One bucket per inherent state of the type (bit, tri-state logic).
    PerState,
    /// The top bits of the value select among a bounded number of bands.
    Banded,
}

/// A series' fixed bucket geometry, resolved once at initialization.
///
/// Banding bounds memory: no matter how wide a signal is, a banded series
/// carries at most [`MAX_BANDS`] bands plus the zero bucket. The zero bucket
/// keeps the very common idle/reset value from washing out the band that
/// would otherwise absorb it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketLayout {
    mode: BucketMode,
    width: u32,
    signed: bool,
    num_buckets: usize,
    band_bits: u32,
    zero_bucket: bool,
}

impl BucketLayout {
    /// Decides the bucket geometry for a supported value kind.
    ///
    /// Narrow integral signals get exact per-value buckets, either because
    /// the caller asked for them or because the whole value fits in fewer
    /// bits than a band selector anyway. Everything else is banded by its
    /// top bits, with a dedicated zero bucket.
    ///
    /// Panics when per-value bucketing was explicitly requested for a
    /// signal wider than 10 bits. That is a configuration contract
    /// violation; silently collecting lossy coverage instead would be worse
    /// than stopping.
    pub fn resolve(kind: ValueKind, per_value_requested: bool) -> BucketLayout {
        match kind {
            ValueKind::State { states } => {
                let bits = ceil_log2(states as usize);
                BucketLayout {
                    mode: BucketMode::PerState,
                    width: bits,
                    signed: false,
                    num_buckets: states as usize,
                    band_bits: bits,
                    zero_bucket: false,
                }
            }
            ValueKind::Integral { width, signed } => {
                assert!(width > 0, "zero-width signal");
                if per_value_requested && width > MAX_PER_VALUE_WIDTH {
                    panic!(
                        "per-value bucketing is not supported for signals wider than \
                         {MAX_PER_VALUE_WIDTH} bits (got {width})"
                    );
                }
                let per_value = per_value_requested || width <= LOG_MAX_BANDS;
                let zero_bucket = !per_value;
                let num_buckets = if per_value {
                    1_usize << width
                } else {
                    MAX_BANDS + 1
                };
                BucketLayout {
                    mode: if per_value {
                        BucketMode::PerValue
                    } else {
                        BucketMode::Banded
                    },
                    width,
                    signed,
                    num_buckets,
                    band_bits: ceil_log2(num_buckets - zero_bucket as usize),
                    zero_bucket,
                }
            }
            ValueKind::Unsupported { type_name } => {
                unreachable!("{type_name} kinds must be rejected at registration")
            }
        }
    }

    pub fn mode(&self) -> BucketMode {
        self.mode
    }

    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    /// How many top bits of the value select a band (the full width in
    /// per-value mode).
    pub fn band_bits(&self) -> u32 {
        self.band_bits
    }

    pub fn has_zero_bucket(&self) -> bool {
        self.zero_bucket
    }

    /// Maps a sample to its bucket index.
    ///
    /// Total and bounded: every sample of the declared width lands strictly
    /// inside the bucket array. Signed values order from most negative to
    /// most positive, with the zero bucket in the middle, so sign and
    /// magnitude are both visible in the bucket ordering.
    pub fn index_of(&self, sample: &Sample) -> usize {
        let index = match self.mode {
            BucketMode::PerState => sample.extract(self.band_bits - 1, 0) as usize,
            BucketMode::PerValue => {
                let raw = sample.extract(self.width - 1, 0);
                if self.signed {
                    // offset binary: flip the sign bit so the most negative
                    // value lands at index 0
                    (raw ^ (1 << (self.width - 1))) as usize
                } else {
                    raw as usize
                }
            }
            BucketMode::Banded => {
                if self.zero_bucket && sample.is_zero() {
                    if self.signed {
                        self.num_buckets / 2
                    } else {
                        0
                    }
                } else {
                    let band = sample.extract(self.width - 1, self.width - self.band_bits);
                    let zero_offset = self.zero_bucket as usize;
                    if self.signed {
                        let half = 1_u64 << (self.band_bits - 1);
                        if band >= half {
                            // sign bit set: most negative band first
                            (band - half) as usize
                        } else {
                            band as usize + self.num_buckets / 2 + zero_offset
                        }
                    } else {
                        band as usize + zero_offset
                    }
                }
            }
        };
        assert!(
            index < self.num_buckets,
            "bucket index {index} out of range for {} buckets",
            self.num_buckets
        );
        index
    }
}

fn ceil_log2(value: usize) -> u32 {
    if value <= 1 {
        0
    } else {
        (value - 1).ilog2() + 1
    }
}

#[cfg(test)]
mod test {
    use crate::value::{Sample, ValueKind};

    use super::{ceil_log2, BucketLayout, BucketMode, MAX_BANDS};

    fn integral(width: u32, signed: bool) -> ValueKind {
        ValueKind::Integral { width, signed }
    }

    #[test_log::test]
    fn test_ceil_log2() {
        assert_eq!(0, ceil_log2(0));
        assert_eq!(0, ceil_log2(1));
        assert_eq!(1, ceil_log2(2));
        assert_eq!(2, ceil_log2(3));
        assert_eq!(2, ceil_log2(4));
        assert_eq!(4, ceil_log2(16));
        assert_eq!(5, ceil_log2(17));
    }

    #[test_log::test]
    fn narrow_widths_get_per_value_buckets_automatically() {
        let layout = BucketLayout::resolve(integral(4, false), false);
        assert_eq!(BucketMode::PerValue, layout.mode());
        assert_eq!(16, layout.num_buckets());
        assert_eq!(4, layout.band_bits());
        assert!(!layout.has_zero_bucket());

        // every 4-bit value maps 1:1 to its own bucket
        for value in 0..16_u64 {
            assert_eq!(value as usize, layout.index_of(&Sample::Bits(value)));
        }
    }

    #[test_log::test]
    fn per_value_signed_orders_most_negative_first() {
        let layout = BucketLayout::resolve(integral(3, true), false);
        assert_eq!(8, layout.num_buckets());
        for (value, expected) in [(-4_i64, 0), (-1, 3), (0, 4), (3, 7)] {
            let bits = value as u64 & 0b111;
            assert_eq!(expected, layout.index_of(&Sample::Bits(bits)), "value {value}");
        }
    }

    #[test_log::test]
    fn explicit_per_value_request() {
        let layout = BucketLayout::resolve(integral(10, false), true);
        assert_eq!(BucketMode::PerValue, layout.mode());
        assert_eq!(1024, layout.num_buckets());
        assert_eq!(1023, layout.index_of(&Sample::Bits(0x3ff)));
    }

    #[test_log::test]
    #[should_panic(expected = "wider than 10 bits")]
    fn explicit_per_value_request_too_wide() {
        BucketLayout::resolve(integral(11, false), true);
    }

    #[test_log::test]
    fn wide_unsigned_values_band_with_a_zero_bucket() {
        let layout = BucketLayout::resolve(integral(8, false), false);
        assert_eq!(BucketMode::Banded, layout.mode());
        assert_eq!(MAX_BANDS + 1, layout.num_buckets());
        assert_eq!(4, layout.band_bits());
        assert!(layout.has_zero_bucket());

        assert_eq!(0, layout.index_of(&Sample::Bits(0)));
        // nonzero values in the bottom band do not share the zero bucket
        assert_eq!(1, layout.index_of(&Sample::Bits(1)));
        assert_eq!(1, layout.index_of(&Sample::Bits(0x0f)));
        assert_eq!(2, layout.index_of(&Sample::Bits(0x10)));
        assert_eq!(16, layout.index_of(&Sample::Bits(0xff)));
    }

    #[test_log::test]
    fn banded_signed_placement() {
        let layout = BucketLayout::resolve(integral(32, true), false);
        assert_eq!(17, layout.num_buckets());
        assert_eq!(4, layout.band_bits());
        assert!(layout.has_zero_bucket());

        let bits = |value: i64| Sample::Bits(value as u64 & 0xffff_ffff);

        // zero owns the middle bucket
        assert_eq!(8, layout.index_of(&bits(0)));
        // most negative band (top bits 1000) comes first
        assert_eq!(0, layout.index_of(&bits(i32::MIN as i64)));
        // top bits 1111, sign set: last band below the zero bucket
        assert_eq!(7, layout.index_of(&bits(-1)));
        // small positive values sit just above the zero bucket
        assert_eq!(9, layout.index_of(&bits(1)));
        // most positive band (top bits 0111) comes last
        assert_eq!(16, layout.index_of(&bits(i32::MAX as i64)));
    }

    #[test_log::test]
    fn every_signed_band_is_in_range() {
        let layout = BucketLayout::resolve(integral(32, true), false);
        let mut seen = vec![false; layout.num_buckets()];
        for band in 0..16_u64 {
            let index = layout.index_of(&Sample::Bits(band << 28 | 1));
            seen[index] = true;
        }
        seen[layout.index_of(&Sample::Bits(0))] = true;
        assert!(seen.iter().all(|hit| *hit), "all 17 buckets reachable");
    }

    #[test_log::test]
    fn wide_vectors_band_by_their_top_bits() {
        let layout = BucketLayout::resolve(integral(96, false), false);
        assert_eq!(17, layout.num_buckets());

        assert_eq!(0, layout.index_of(&Sample::Vector(vec![0, 0])));
        assert_eq!(1, layout.index_of(&Sample::Vector(vec![1, 0])));
        // top band: bits 95..=92 all set
        let top = Sample::Vector(vec![0, 0xf << 28]);
        assert_eq!(16, layout.index_of(&top));
    }

    #[test_log::test]
    fn state_kinds_get_one_bucket_per_state() {
        let bit = BucketLayout::resolve(ValueKind::State { states: 2 }, false);
        assert_eq!(BucketMode::PerState, bit.mode());
        assert_eq!(2, bit.num_buckets());
        assert!(!bit.has_zero_bucket());
        assert_eq!(0, bit.index_of(&Sample::State(0)));
        assert_eq!(1, bit.index_of(&Sample::State(1)));

        let logic = BucketLayout::resolve(ValueKind::State { states: 4 }, false);
        assert_eq!(4, logic.num_buckets());
        assert_eq!(3, logic.index_of(&Sample::State(3)));
    }
}
