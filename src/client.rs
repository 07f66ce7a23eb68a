//! Typed register client
//!
//! [`MdioClient`] combines a frozen [`RegisterMap`] with an [`MdioBus`] so
//! registers are read and written by name instead of by raw word.
//!
//! # Example
//!
//! ```ignore
//! use bitbang_mdio::phy::marvell;
//! use bitbang_mdio::{FrameEngine, MdioClient, MdioConfig};
//!
//! let map = marvell::register_map()?;
//! let config = MdioConfig::new();
//! let engine = FrameEngine::new(pins, delay, &config);
//! let mut client = MdioClient::new(&map, engine, config)?;
//!
//! client.reset(0)?;
//! let status = client.read_register_by_name(0, "STATUS_COPPER")?;
//! if status.is_set("copper_link_status")? {
//!     // ...
//! }
//! ```

use crate::config::MdioConfig;
use crate::constants::MAX_PHY_ADDR;
use crate::error::{ConfigError, Result};
use crate::hal::mdio::MdioBus;
use crate::register::{FieldView, RegAddr, RegisterHandle, RegisterMap};

/// Page written to the page select register for extended-bank access
pub const EXTENDED_PAGE: u16 = 1;

/// Page restored after an extended-bank access
pub const BASE_PAGE: u16 = 0;

/// Register-level MDIO client
#[derive(Debug)]
pub struct MdioClient<'m, M, const REGS: usize, const FIELDS: usize> {
    map: &'m RegisterMap<REGS, FIELDS>,
    bus: M,
    config: MdioConfig,
}

impl<'m, M: MdioBus, const REGS: usize, const FIELDS: usize> MdioClient<'m, M, REGS, FIELDS> {
    /// Create a client over `bus` using the registers defined in `map`
    pub fn new(map: &'m RegisterMap<REGS, FIELDS>, bus: M, config: MdioConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { map, bus, config })
    }

    /// Register map in use
    pub fn map(&self) -> &'m RegisterMap<REGS, FIELDS> {
        self.map
    }

    /// Active configuration
    pub fn config(&self) -> &MdioConfig {
        &self.config
    }

    /// Underlying bus
    pub fn bus(&self) -> &M {
        &self.bus
    }

    /// Mutable access to the underlying bus
    pub fn bus_mut(&mut self) -> &mut M {
        &mut self.bus
    }

    /// Consume the client and return the bus
    pub fn release(self) -> M {
        self.bus
    }

    // =========================================================================
    // Register Access
    // =========================================================================

    /// Read a register and decode it
    ///
    /// Bits above a narrow register's width are discarded.
    pub fn read_register(&mut self, phy_addr: u8, handle: RegisterHandle) -> Result<FieldView<'m>> {
        let def = self.map.definition(handle)?;
        let word = self.read_raw(phy_addr, def.address())? & def.word_mask();
        Ok(def.unpack(word)?)
    }

    /// Read a register looked up by name
    pub fn read_register_by_name(&mut self, phy_addr: u8, name: &str) -> Result<FieldView<'m>> {
        let handle = self
            .map
            .register_by_name(name)
            .ok_or(ConfigError::UnknownRegister)?;
        self.read_register(phy_addr, handle)
    }

    /// Write a register built from named field values over zero
    pub fn write_register(
        &mut self,
        phy_addr: u8,
        handle: RegisterHandle,
        values: &[(&str, u16)],
    ) -> Result<()> {
        let def = self.map.definition(handle)?;
        let word = def.pack(0, values)?;
        self.write_raw(phy_addr, def.address(), word)
    }

    /// Write an already packed view back to its register
    pub fn write_view(&mut self, phy_addr: u8, view: &FieldView<'_>) -> Result<()> {
        self.write_raw(phy_addr, view.address(), view.word())
    }

    /// Read a register, replace the named fields, and write it back
    ///
    /// Returns the view that was written.
    pub fn modify_register(
        &mut self,
        phy_addr: u8,
        handle: RegisterHandle,
        values: &[(&str, u16)],
    ) -> Result<FieldView<'m>> {
        let current = self.read_register(phy_addr, handle)?;
        let updated = current.with_fields(values)?;
        self.write_view(phy_addr, &updated)?;
        Ok(updated)
    }

    /// Soft-reset the PHY
    ///
    /// Sets the configured reset field in the configured control register
    /// with a read-modify-write. The bit self-clears in hardware; this does
    /// not wait for it.
    pub fn reset(&mut self, phy_addr: u8) -> Result<()> {
        let handle = self
            .map
            .register(self.config.reset_register)
            .ok_or(ConfigError::UnknownRegister)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("mdio: soft reset phy {}", phy_addr);

        self.modify_register(phy_addr, handle, &[(self.config.reset_field, 1)])?;
        Ok(())
    }

    /// Read every register in the map in address order
    ///
    /// Stops at the first failed read.
    pub fn dump<F>(&mut self, phy_addr: u8, mut f: F) -> Result<()>
    where
        F: FnMut(FieldView<'m>),
    {
        let map = self.map;
        for handle in map.registers_by_address() {
            f(self.read_register(phy_addr, handle)?);
        }
        Ok(())
    }

    // =========================================================================
    // Raw Access
    // =========================================================================

    /// Read the raw word at `address`, switching pages for the extended bank
    pub fn read_raw(&mut self, phy_addr: u8, address: RegAddr) -> Result<u16> {
        self.with_bank(phy_addr, address, |bus, index| bus.read(phy_addr, index))
    }

    /// Write a raw word at `address`, switching pages for the extended bank
    pub fn write_raw(&mut self, phy_addr: u8, address: RegAddr, value: u16) -> Result<()> {
        self.with_bank(phy_addr, address, |bus, index| {
            bus.write(phy_addr, index, value)
        })
    }

    fn with_bank<T, F>(&mut self, phy_addr: u8, address: RegAddr, op: F) -> Result<T>
    where
        F: FnOnce(&mut M, u8) -> Result<T>,
    {
        if phy_addr > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        if !address.is_extended() {
            return op(&mut self.bus, address.index());
        }
        let Some(page_select) = self.config.page_select else {
            return Err(ConfigError::InvalidRegisterAddress.into());
        };

        self.bus.write(phy_addr, page_select, EXTENDED_PAGE)?;
        let result = op(&mut self.bus, address.index());
        // Restore even when the access failed; the access error wins
        let restored = self.bus.write(phy_addr, page_select, BASE_PAGE);
        let value = result?;
        restored?;
        Ok(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
