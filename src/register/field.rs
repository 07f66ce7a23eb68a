//! Register addresses, field definitions, and register definitions
//!
//! A [`RegisterDef`] is a named, fixed-width bit container with an ordered
//! list of [`FieldDef`]s. Several fields may cover the same bits; they are
//! aliases and always agree because every one of them is resolved against
//! the same register word.

use crate::constants::{EXTENDED_BANK_BIT, MAX_REG_INDEX, REG_INDEX_MASK, REGISTER_WIDTH};
use crate::error::{ConfigError, ConfigResult, FieldError, FieldResult};

use super::view::FieldView;

// =============================================================================
// Register Address
// =============================================================================

/// Register address: 5-bit Clause-22 index plus the extended-bank bit
///
/// `0x05` (base bank) and `0x25` (extended bank, index 5) are distinct
/// addresses; only [`index`](Self::index) is ever placed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegAddr(u8);

impl RegAddr {
    /// Base-bank register at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index > 31`. In a `const` table this is a compile error.
    pub const fn base(index: u8) -> Self {
        assert!(index <= MAX_REG_INDEX, "register index must be 0-31");
        Self(index)
    }

    /// Extended-bank register at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index > 31`. In a `const` table this is a compile error.
    pub const fn extended(index: u8) -> Self {
        assert!(index <= MAX_REG_INDEX, "register index must be 0-31");
        Self(index | EXTENDED_BANK_BIT)
    }

    /// Build an address from its raw 6-bit encoding
    pub const fn from_raw(raw: u8) -> ConfigResult<Self> {
        if raw & !(REG_INDEX_MASK | EXTENDED_BANK_BIT) != 0 {
            return Err(ConfigError::InvalidRegisterAddress);
        }
        Ok(Self(raw))
    }

    /// Raw encoding, including the bank bit
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// On-wire register index (bank bit masked off)
    pub const fn index(self) -> u8 {
        self.0 & REG_INDEX_MASK
    }

    /// Whether this address lives in the extended bank
    pub const fn is_extended(self) -> bool {
        self.0 & EXTENDED_BANK_BIT != 0
    }
}

impl core::fmt::Display for RegAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_extended() {
            write!(f, "ext:0x{:02x}", self.index())
        } else {
            write!(f, "0x{:02x}", self.index())
        }
    }
}

// =============================================================================
// Field Definition
// =============================================================================

/// A named bit range inside a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldDef {
    name: &'static str,
    offset: u8,
    width: u8,
}

impl FieldDef {
    /// Placeholder used to fill fixed-size storage
    pub(crate) const EMPTY: Self = Self::new("", 0, 0);

    /// Create a field covering `width` bits starting at bit `offset`
    pub const fn new(name: &'static str, offset: u8, width: u8) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// Single-bit field at `bit`
    pub const fn bit(name: &'static str, bit: u8) -> Self {
        Self::new(name, bit, 1)
    }

    /// Field name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Lowest bit position
    pub const fn offset(&self) -> u8 {
        self.offset
    }

    /// Number of bits
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Unshifted value mask, e.g. `0b111` for a 3-bit field
    pub const fn value_mask(&self) -> u16 {
        (low_mask(self.width) & 0xFFFF) as u16
    }

    /// Mask of the bits this field occupies in the register word
    pub const fn word_mask(&self) -> u16 {
        if self.offset >= REGISTER_WIDTH {
            return 0;
        }
        ((low_mask(self.width) << self.offset) & 0xFFFF) as u16
    }

    /// Whether `value` can be stored without truncation
    pub const fn fits(&self, value: u16) -> bool {
        value & !self.value_mask() == 0
    }

    /// Extract this field from a register word
    pub const fn extract(&self, word: u16) -> u16 {
        if self.offset >= REGISTER_WIDTH {
            return 0;
        }
        (word >> self.offset) & self.value_mask()
    }

    /// Replace this field's bits in `word` with `value`
    ///
    /// `value` is masked to the field width; use [`fits`](Self::fits) first
    /// when truncation must be rejected.
    pub const fn insert(&self, word: u16, value: u16) -> u16 {
        if self.offset >= REGISTER_WIDTH {
            return word;
        }
        let shifted = (((value & self.value_mask()) as u32) << self.offset) as u16;
        (word & !self.word_mask()) | shifted
    }

    /// Whether both fields cover exactly the same bits
    pub const fn aliases(&self, other: &FieldDef) -> bool {
        self.offset == other.offset && self.width == other.width
    }

    /// Whether the fields share at least one bit
    pub const fn overlaps(&self, other: &FieldDef) -> bool {
        self.word_mask() & other.word_mask() != 0
    }

    pub(crate) const fn check(&self, register_width: u8) -> ConfigResult<()> {
        if self.width == 0 || self.offset as u16 + self.width as u16 > register_width as u16 {
            return Err(ConfigError::FieldOutOfRange);
        }
        Ok(())
    }
}

const fn low_mask(width: u8) -> u32 {
    if width >= 32 { u32::MAX } else { (1u32 << width) - 1 }
}

// =============================================================================
// Register Definition
// =============================================================================

/// A named register with its canonical address and field layout
///
/// Static register tables are written as `const` values of this type and
/// loaded into a [`RegisterMap`](super::RegisterMap) via
/// [`define_table`](super::RegisterMapBuilder::define_table); the map hands
/// back borrowed definitions for its own registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDef<'a> {
    name: &'static str,
    address: RegAddr,
    width: u8,
    fields: &'a [FieldDef],
}

impl<'a> RegisterDef<'a> {
    /// 16-bit register definition
    pub const fn new(name: &'static str, address: RegAddr, fields: &'a [FieldDef]) -> Self {
        Self {
            name,
            address,
            width: REGISTER_WIDTH,
            fields,
        }
    }

    /// Override the register width (1..=16 bits)
    #[must_use]
    pub const fn with_width(mut self, width: u8) -> Self {
        self.width = width;
        self
    }

    /// Register name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Canonical address
    pub const fn address(&self) -> RegAddr {
        self.address
    }

    /// Width in bits
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Fields in declaration order
    pub const fn fields(&self) -> &'a [FieldDef] {
        self.fields
    }

    /// Mask of the bits a value of this register may use
    pub const fn word_mask(&self) -> u16 {
        (low_mask(self.width) & 0xFFFF) as u16
    }

    /// Look up a field (or alias) by name
    pub fn field(&self, name: &str) -> FieldResult<FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .copied()
            .ok_or(FieldError::UnknownField)
    }

    /// Check the width, every field's range, and field-name uniqueness
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.width > REGISTER_WIDTH {
            return Err(ConfigError::InvalidWidth);
        }
        for (i, field) in self.fields.iter().enumerate() {
            field.check(self.width)?;
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ConfigError::DuplicateField);
            }
        }
        Ok(())
    }

    /// Merge named field values into `base`
    ///
    /// Assignments are applied in order; bits not named keep their value
    /// from `base`, which makes read-modify-write a matter of passing the
    /// word that was just read.
    pub fn pack(&self, base: u16, values: &[(&str, u16)]) -> FieldResult<u16> {
        if base & !self.word_mask() != 0 {
            return Err(FieldError::ValueOutOfRange);
        }
        let mut word = base;
        for &(name, value) in values {
            let field = self.field(name)?;
            if !field.fits(value) {
                return Err(FieldError::ValueOutOfRange);
            }
            word = field.insert(word, value);
        }
        Ok(word)
    }

    /// Structured view of `word`
    pub fn unpack(&self, word: u16) -> FieldResult<FieldView<'a>> {
        if word & !self.word_mask() != 0 {
            return Err(FieldError::ValueOutOfRange);
        }
        Ok(FieldView::new(*self, word))
    }
}
