//! Register address space
//!
//! [`RegisterMapBuilder`] collects register and field definitions through
//! explicit registration calls (or a static table), then
//! [`build`](RegisterMapBuilder::build) freezes them into a [`RegisterMap`].
//! The frozen map has no mutating methods and is shared by reference.
//!
//! Storage is fixed-capacity (`REGS` registers, `FIELDS` fields in total).
//! Each register's fields are kept contiguous so a register definition can
//! be handed out as a plain borrowed slice.

use crate::constants::REGISTER_WIDTH;
use crate::error::{ConfigError, ConfigResult, Result};

use super::field::{FieldDef, RegAddr, RegisterDef};
use super::view::FieldView;

/// Map sized for both full banks
pub type DefaultRegisterMap = RegisterMap<64, 256>;

/// Builder sized for both full banks
pub type DefaultRegisterMapBuilder = RegisterMapBuilder<64, 256>;

/// Smaller map for a single vendor register set
pub type SmallRegisterMap = RegisterMap<16, 128>;

/// Builder for [`SmallRegisterMap`]
pub type SmallRegisterMapBuilder = RegisterMapBuilder<16, 128>;

// =============================================================================
// Handle
// =============================================================================

/// Reference to a register defined in a [`RegisterMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterHandle {
    slot: u8,
    address: RegAddr,
}

impl RegisterHandle {
    /// Canonical address of the register
    pub const fn address(&self) -> RegAddr {
        self.address
    }
}

#[derive(Debug, Clone, Copy)]
struct RegisterSlot {
    name: &'static str,
    address: RegAddr,
    width: u8,
    first_field: usize,
    field_count: usize,
}

impl RegisterSlot {
    const EMPTY: Self = Self {
        name: "",
        address: RegAddr::base(0),
        width: 0,
        first_field: 0,
        field_count: 0,
    };
}

// =============================================================================
// Frozen Map
// =============================================================================

/// Immutable address → register definition mapping
#[derive(Debug, Clone)]
pub struct RegisterMap<const REGS: usize, const FIELDS: usize> {
    registers: [RegisterSlot; REGS],
    register_count: usize,
    fields: [FieldDef; FIELDS],
    field_count: usize,
}

impl<const REGS: usize, const FIELDS: usize> RegisterMap<REGS, FIELDS> {
    const fn empty() -> Self {
        Self {
            registers: [RegisterSlot::EMPTY; REGS],
            register_count: 0,
            fields: [FieldDef::EMPTY; FIELDS],
            field_count: 0,
        }
    }

    /// Number of registers defined
    pub const fn len(&self) -> usize {
        self.register_count
    }

    /// Whether no registers are defined
    pub const fn is_empty(&self) -> bool {
        self.register_count == 0
    }

    /// Find the register at `address`
    ///
    /// The lookup compares the full address including the bank bit, so a
    /// base-bank register never answers for an extended one.
    pub fn register(&self, address: RegAddr) -> Option<RegisterHandle> {
        self.slots()
            .iter()
            .position(|r| r.address == address)
            .map(|slot| RegisterHandle {
                slot: slot as u8,
                address,
            })
    }

    /// Find a register by name
    pub fn register_by_name(&self, name: &str) -> Option<RegisterHandle> {
        self.slots()
            .iter()
            .position(|r| r.name == name)
            .map(|slot| RegisterHandle {
                slot: slot as u8,
                address: self.registers[slot].address,
            })
    }

    /// Registers in definition order
    pub fn registers(&self) -> impl Iterator<Item = RegisterHandle> + '_ {
        self.slots()
            .iter()
            .enumerate()
            .map(|(slot, r)| RegisterHandle {
                slot: slot as u8,
                address: r.address,
            })
    }

    /// Registers in ascending address order (base bank first)
    pub fn registers_by_address(&self) -> impl Iterator<Item = RegisterHandle> + '_ {
        (0u8..0x40).filter_map(|raw| RegAddr::from_raw(raw).ok().and_then(|a| self.register(a)))
    }

    /// Borrowed definition of a register
    pub fn definition(&self, handle: RegisterHandle) -> ConfigResult<RegisterDef<'_>> {
        let slot = self.slot(handle)?;
        let entry = &self.registers[slot];
        let fields = &self.fields[entry.first_field..entry.first_field + entry.field_count];
        Ok(RegisterDef::new(entry.name, entry.address, fields).with_width(entry.width))
    }

    /// Fields of a register in declaration order
    pub fn fields(&self, handle: RegisterHandle) -> ConfigResult<&[FieldDef]> {
        Ok(self.definition(handle)?.fields())
    }

    /// Look up one field (or alias) of a register
    pub fn field(&self, handle: RegisterHandle, name: &str) -> Result<FieldDef> {
        Ok(self.definition(handle)?.field(name)?)
    }

    /// Merge named field values into `base`
    ///
    /// Pass `0` to build a word from scratch, or a word just read from the
    /// PHY to keep every unnamed field at its current value.
    pub fn pack(&self, handle: RegisterHandle, base: u16, values: &[(&str, u16)]) -> Result<u16> {
        Ok(self.definition(handle)?.pack(base, values)?)
    }

    /// Structured view of a register word
    pub fn unpack(&self, handle: RegisterHandle, word: u16) -> Result<FieldView<'_>> {
        Ok(self.definition(handle)?.unpack(word)?)
    }

    fn slots(&self) -> &[RegisterSlot] {
        &self.registers[..self.register_count]
    }

    fn slot(&self, handle: RegisterHandle) -> ConfigResult<usize> {
        let slot = handle.slot as usize;
        match self.slots().get(slot) {
            Some(entry) if entry.address == handle.address => Ok(slot),
            _ => Err(ConfigError::UnknownRegister),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects register definitions before the map is frozen
#[derive(Debug, Clone)]
pub struct RegisterMapBuilder<const REGS: usize, const FIELDS: usize> {
    map: RegisterMap<REGS, FIELDS>,
}

impl<const REGS: usize, const FIELDS: usize> RegisterMapBuilder<REGS, FIELDS> {
    /// Create an empty builder
    pub const fn new() -> Self {
        Self {
            map: RegisterMap::empty(),
        }
    }

    /// Define a 16-bit register at `address`
    pub fn define_register(
        &mut self,
        name: &'static str,
        address: RegAddr,
    ) -> ConfigResult<RegisterHandle> {
        self.define_register_with_width(name, address, REGISTER_WIDTH)
    }

    /// Define a register of `width` bits (1..=16) at `address`
    pub fn define_register_with_width(
        &mut self,
        name: &'static str,
        address: RegAddr,
        width: u8,
    ) -> ConfigResult<RegisterHandle> {
        if width == 0 || width > REGISTER_WIDTH {
            return Err(ConfigError::InvalidWidth);
        }
        if self.map.register(address).is_some() {
            return Err(ConfigError::DuplicateAddress);
        }
        let slot = self.map.register_count;
        if slot == REGS || slot > u8::MAX as usize {
            return Err(ConfigError::CapacityExceeded);
        }

        self.map.registers[slot] = RegisterSlot {
            name,
            address,
            width,
            first_field: self.map.field_count,
            field_count: 0,
        };
        self.map.register_count += 1;

        Ok(RegisterHandle {
            slot: slot as u8,
            address,
        })
    }

    /// Define a field (or alias) on a register
    pub fn define_field(
        &mut self,
        handle: RegisterHandle,
        name: &'static str,
        bit_offset: u8,
        bit_width: u8,
    ) -> ConfigResult<()> {
        self.push_field(handle, FieldDef::new(name, bit_offset, bit_width))
    }

    /// Define a register and all of its fields from a table entry
    pub fn define(&mut self, def: &RegisterDef<'_>) -> ConfigResult<RegisterHandle> {
        let handle = self.define_register_with_width(def.name(), def.address(), def.width())?;
        for field in def.fields() {
            self.push_field(handle, *field)?;
        }
        Ok(handle)
    }

    /// Define every register of a static table
    pub fn define_table(&mut self, table: &[RegisterDef<'_>]) -> ConfigResult<()> {
        for def in table {
            self.define(def)?;
        }
        Ok(())
    }

    /// Freeze the definitions
    pub fn build(self) -> RegisterMap<REGS, FIELDS> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "register map built: {} registers, {} fields",
            self.map.register_count,
            self.map.field_count
        );

        self.map
    }

    fn push_field(&mut self, handle: RegisterHandle, field: FieldDef) -> ConfigResult<()> {
        let slot = self.map.slot(handle)?;
        let entry = self.map.registers[slot];

        field.check(entry.width)?;

        let own = &self.map.fields[entry.first_field..entry.first_field + entry.field_count];
        if own.iter().any(|f| f.name() == field.name()) {
            return Err(ConfigError::DuplicateField);
        }
        if self.map.field_count == FIELDS {
            return Err(ConfigError::CapacityExceeded);
        }

        // Keep each register's fields contiguous: open a gap at the end of
        // this register's run and shift every later run up by one.
        let pos = entry.first_field + entry.field_count;
        let count = self.map.field_count;
        self.map.fields.copy_within(pos..count, pos + 1);
        self.map.fields[pos] = field;
        self.map.field_count += 1;

        let register_count = self.map.register_count;
        for (i, other) in self.map.registers[..register_count].iter_mut().enumerate() {
            if i == slot {
                other.field_count += 1;
            } else if other.first_field >= pos {
                other.first_field += 1;
            }
        }
        Ok(())
    }
}

impl<const REGS: usize, const FIELDS: usize> Default for RegisterMapBuilder<REGS, FIELDS> {
    fn default() -> Self {
        Self::new()
    }
}
