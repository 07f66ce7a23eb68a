//! Configuration types for the MDIO client and frame engine

use crate::constants::{DEFAULT_HALF_PERIOD_NS, MAX_REG_INDEX};
use crate::error::{ConfigError, ConfigResult};
use crate::register::RegAddr;

/// Handling of the turnaround bits of a read frame
///
/// A responding PHY pulls MDIO low during the second turnaround cycle; an
/// absent one leaves the line pulled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TurnaroundCheck {
    /// Clock the turnaround without sampling (absent PHY reads `0xFFFF`)
    #[default]
    Ignore,
    /// Sample the second turnaround cycle and fail with
    /// [`IoError::NoResponse`](crate::error::IoError::NoResponse) on a `1`
    Verify,
}

/// MDIO bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MdioConfig {
    /// Settle time after each clock edge, in nanoseconds
    pub half_period_ns: u32,
    /// Read turnaround handling
    pub turnaround_check: TurnaroundCheck,
    /// Base-bank register index used to switch to the extended bank
    pub page_select: Option<u8>,
    /// Register holding the reset bit
    pub reset_register: RegAddr,
    /// Name of the self-clearing reset field in `reset_register`
    pub reset_field: &'static str,
}

impl Default for MdioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MdioConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            half_period_ns: DEFAULT_HALF_PERIOD_NS,
            turnaround_check: TurnaroundCheck::Ignore,
            page_select: None,
            reset_register: RegAddr::base(0x00),
            reset_field: "reset",
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the clock half period
    #[must_use]
    pub const fn with_half_period_ns(mut self, half_period_ns: u32) -> Self {
        self.half_period_ns = half_period_ns;
        self
    }

    /// Set the turnaround handling
    #[must_use]
    pub const fn with_turnaround_check(mut self, check: TurnaroundCheck) -> Self {
        self.turnaround_check = check;
        self
    }

    /// Enable extended-bank access through the page select register at `index`
    #[must_use]
    pub const fn with_page_select(mut self, index: u8) -> Self {
        self.page_select = Some(index);
        self
    }

    /// Set the register and field used by
    /// [`MdioClient::reset`](crate::client::MdioClient::reset)
    #[must_use]
    pub const fn with_reset_field(mut self, register: RegAddr, field: &'static str) -> Self {
        self.reset_register = register;
        self.reset_field = field;
        self
    }

    /// Check the configuration for values that can never address a register
    pub const fn validate(&self) -> ConfigResult<()> {
        if let Some(index) = self.page_select {
            if index > MAX_REG_INDEX {
                return Err(ConfigError::InvalidRegisterAddress);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
