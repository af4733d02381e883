use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use super::{Sample, ValueKind, ValueSource};

/// A shared integer signal up to 64 bits wide. The scheduler writes it;
/// coverage samples it. Stores raw two's-complement bits masked to the
/// declared width.
pub struct IntSignal {
    bits: Cell<u64>,
    width: u32,
    signed: bool,
}

impl IntSignal {
    /// A zero-initialized signal of the given declared width.
    pub fn new(width: u32, signed: bool) -> Rc<Self> {
        assert!(
            0 < width && width <= 64,
            "IntSignal width must be between 1 and 64, got {width}"
        );
        Rc::new(IntSignal {
            bits: Cell::new(0),
            width,
            signed,
        })
    }

    /// A zero-initialized unsigned signal.
    pub fn unsigned(width: u32) -> Rc<Self> {
        Self::new(width, false)
    }

    /// A zero-initialized signed signal.
    pub fn signed(width: u32) -> Rc<Self> {
        Self::new(width, true)
    }

    /// Drives the signal, truncating the value to the declared width.
    pub fn set(&self, value: u64) {
        self.bits.set(mask_width(value, self.width));
    }

    /// Drives a signed signal; the value's two's-complement bits are
    /// truncated to the declared width.
    pub fn set_signed(&self, value: i64) {
        self.set(value as u64);
    }

    /// The current raw bits.
    pub fn get(&self) -> u64 {
        self.bits.get()
    }
}

impl ValueSource for IntSignal {
    fn kind(&self) -> ValueKind {
        ValueKind::Integral {
            width: self.width,
            signed: self.signed,
        }
    }

    fn sample(&self) -> Sample {
        Sample::Bits(self.bits.get())
    }
}

/// A wide bit-vector signal, stored as least-significant-first 64-bit words.
pub struct VectorSignal {
    words: RefCell<Vec<u64>>,
    width: u32,
    signed: bool,
}

impl VectorSignal {
    /// An all-zero vector of the given width.
    pub fn new(width: u32, signed: bool) -> Rc<Self> {
        assert!(width > 0, "zero-width vector");
        let words = (width as usize + 63) / 64;
        Rc::new(VectorSignal {
            words: RefCell::new(vec![0; words]),
            width,
            signed,
        })
    }

    /// Replaces the whole vector. Missing high words zero-fill; bits past
    /// the declared width are truncated.
    pub fn assign(&self, value: &[u64]) {
        let mut words = self.words.borrow_mut();
        for (index, word) in words.iter_mut().enumerate() {
            *word = value.get(index).copied().unwrap_or(0);
        }
        let top_bits = self.width % 64;
        if top_bits != 0 {
            let last = words.len() - 1;
            words[last] &= (1 << top_bits) - 1;
        }
    }

    /// Drives a single bit.
    pub fn set_bit(&self, bit: u32, value: bool) {
        assert!(bit < self.width, "bit {bit} out of range for width {}", self.width);
        let mut words = self.words.borrow_mut();
        let word = &mut words[(bit / 64) as usize];
        if value {
            *word |= 1 << (bit % 64);
        } else {
            *word &= !(1 << (bit % 64));
        }
    }
}

impl ValueSource for VectorSignal {
    fn kind(&self) -> ValueKind {
        ValueKind::Integral {
            width: self.width,
            signed: self.signed,
        }
    }

    fn sample(&self) -> Sample {
        Sample::Vector(self.words.borrow().clone())
    }
}

/// A single-bit flag with exactly two states.
pub struct BitSignal {
    value: Cell<bool>,
}

impl BitSignal {
    /// A flag starting out false.
    pub fn new() -> Rc<Self> {
        Rc::new(BitSignal {
            value: Cell::new(false),
        })
    }

    pub fn set(&self, value: bool) {
        self.value.set(value);
    }

    pub fn get(&self) -> bool {
        self.value.get()
    }
}

impl ValueSource for BitSignal {
    fn kind(&self) -> ValueKind {
        ValueKind::State { states: 2 }
    }

    fn sample(&self) -> Sample {
        Sample::State(self.value.get() as u8)
    }
}

/// Tri-state logic values, in bucket-index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Logic {
    /// Driven low.
    Zero = 0,
    /// Driven high.
    One = 1,
    /// High impedance.
    HighZ = 2,
    /// Undriven or conflicting.
    Unknown = 3,
}

/// A tri-state logic signal. Starts out [`Logic::Unknown`], like an
/// undriven wire.
pub struct LogicSignal {
    value: Cell<Logic>,
}

impl LogicSignal {
    pub fn new() -> Rc<Self> {
        Rc::new(LogicSignal {
            value: Cell::new(Logic::Unknown),
        })
    }

    pub fn set(&self, value: Logic) {
        self.value.set(value);
    }

    pub fn get(&self) -> Logic {
        self.value.get()
    }
}

impl ValueSource for LogicSignal {
    fn kind(&self) -> ValueKind {
        ValueKind::State { states: 4 }
    }

    fn sample(&self) -> Sample {
        Sample::State(self.value.get() as u8)
    }
}

/// A floating-point signal. Registration is accepted with a warning and the
/// value never appears in coverage.
pub struct FloatSignal {
    value: Cell<f64>,
}

impl FloatSignal {
    pub fn new() -> Rc<Self> {
        Rc::new(FloatSignal {
            value: Cell::new(0.0),
        })
    }

    pub fn set(&self, value: f64) {
        self.value.set(value);
    }

    pub fn get(&self) -> f64 {
        self.value.get()
    }
}

impl ValueSource for FloatSignal {
    fn kind(&self) -> ValueKind {
        ValueKind::Unsupported {
            type_name: "floating-point",
        }
    }

    fn sample(&self) -> Sample {
        Sample::Bits(self.value.get().to_bits())
    }
}

/// A fixed-point signal. Excluded from coverage, like floating point.
pub struct FixedSignal {
    raw: Cell<i64>,
    fractional_bits: u32,
}

impl FixedSignal {
    pub fn new(fractional_bits: u32) -> Rc<Self> {
        Rc::new(FixedSignal {
            raw: Cell::new(0),
            fractional_bits,
        })
    }

    pub fn set_raw(&self, raw: i64) {
        self.raw.set(raw);
    }

    pub fn to_f64(&self) -> f64 {
        self.raw.get() as f64 / (1_u64 << self.fractional_bits) as f64
    }
}

impl ValueSource for FixedSignal {
    fn kind(&self) -> ValueKind {
        ValueKind::Unsupported {
            type_name: "fixed-point",
        }
    }

    fn sample(&self) -> Sample {
        Sample::Bits(self.raw.get() as u64)
    }
}

/// An enumerated signal carrying its literal table. Excluded from coverage.
pub struct EnumSignal {
    value: Cell<u32>,
    literals: &'static [&'static str],
}

impl EnumSignal {
    pub fn new(literals: &'static [&'static str]) -> Rc<Self> {
        Rc::new(EnumSignal {
            value: Cell::new(0),
            literals,
        })
    }

    pub fn set(&self, value: u32) {
        self.value.set(value);
    }

    /// The literal for the current value, if it is in range.
    pub fn literal(&self) -> Option<&'static str> {
        self.literals.get(self.value.get() as usize).copied()
    }
}

impl ValueSource for EnumSignal {
    fn kind(&self) -> ValueKind {
        ValueKind::Unsupported {
            type_name: "enumeration",
        }
    }

    fn sample(&self) -> Sample {
        Sample::Bits(self.value.get() as u64)
    }
}

fn mask_width(value: u64, width: u32) -> u64 {
    if width >= 64 {
        value
    } else {
        value & ((1 << width) - 1)
    }
}
