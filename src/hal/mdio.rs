//! MDIO (Management Data Input/Output) Frame Engine
//!
//! Frames IEEE 802.3 Clause 22 transactions on top of the bit-bang
//! primitive:
//!
//! ```text
//! write: <preamble 32x1> 01 01 PPPPP RRRRR 10 D[15..0] <idle, idle>
//! read:  <preamble 32x1> 01 10 PPPPP RRRRR zz D[15..0] <zz>
//! ```
//!
//! The engine tracks the frame phase. A new transaction is refused with
//! [`IoError::BusBusy`] while a frame is in flight or after a transport
//! failure abandoned one; [`FrameEngine::recover`] resynchronises the bus.

use embedded_hal::delay::DelayNs;

use crate::config::{MdioConfig, TurnaroundCheck};
use crate::constants::{
    ADDR_FIELD_BITS, DATA_BITS, MDIO_OE, OP_READ, OP_WRITE, PREAMBLE, PREAMBLE_BITS,
    SHORT_FIELD_BITS, START, TURNAROUND, TURNAROUND_CYCLES,
};
use crate::error::{ConfigError, ConfigResult, IoError, IoResult, Result};
use crate::hal::bitbang::{BitBang, MdioPins};

pub use crate::constants::{MAX_PHY_ADDR, MAX_REG_INDEX as MAX_REG_ADDR};

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// Register addresses are on-wire Clause-22 indices (0-31). This is the
/// seam between [`MdioClient`](crate::client::MdioClient) and whatever
/// moves the frames.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

impl<T: MdioBus + ?Sized> MdioBus for &mut T {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        T::read(self, phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        T::write(self, phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        T::is_busy(self)
    }
}

/// Check PHY and register addresses before any bus activity
pub const fn validate_address(phy_addr: u8, reg_addr: u8) -> ConfigResult<()> {
    if phy_addr > MAX_PHY_ADDR {
        return Err(ConfigError::InvalidPhyAddress);
    }
    if reg_addr > MAX_REG_ADDR {
        return Err(ConfigError::InvalidRegisterAddress);
    }
    Ok(())
}

// =============================================================================
// Frame State
// =============================================================================

/// Position within the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No frame in flight
    #[default]
    Idle,
    /// 32 ones
    Preamble,
    /// Start of frame
    Start,
    /// Read/write opcode
    Opcode,
    /// PHY address
    PhyAddress,
    /// Register address
    RegAddress,
    /// Turnaround (driven for writes, released for reads)
    Turnaround,
    /// Data driven by the station
    DataOut,
    /// Data driven by the PHY
    DataIn,
    /// Released cycles handing the line back
    TrailingTurnaround,
}

/// Transaction counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Completed reads
    pub reads: u32,
    /// Completed writes
    pub writes: u32,
    /// Successful recoveries
    pub recoveries: u32,
    /// Reads rejected by the turnaround check
    pub no_response: u32,
}

// =============================================================================
// Frame Engine
// =============================================================================

/// Bit-banged Clause-22 bus master
#[derive(Debug)]
pub struct FrameEngine<P, D> {
    bus: BitBang<P, D>,
    phase: Phase,
    turnaround_check: TurnaroundCheck,
    stats: FrameStats,
}

impl<P: MdioPins, D: DelayNs> FrameEngine<P, D> {
    /// Create an engine over `pins` using the timing and turnaround
    /// handling from `config`
    pub fn new(pins: P, delay: D, config: &MdioConfig) -> Self {
        Self::from_bitbang(
            BitBang::new(pins, delay, config.half_period_ns),
            config.turnaround_check,
        )
    }

    /// Create an engine over an existing bit-bang primitive
    pub fn from_bitbang(bus: BitBang<P, D>, turnaround_check: TurnaroundCheck) -> Self {
        Self {
            bus,
            phase: Phase::Idle,
            turnaround_check,
            stats: FrameStats::default(),
        }
    }

    /// Current frame phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Transaction counters
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Read turnaround handling
    pub fn turnaround_check(&self) -> TurnaroundCheck {
        self.turnaround_check
    }

    /// Underlying line transport
    pub fn pins(&self) -> &P {
        self.bus.pins()
    }

    /// Mutable access to the line transport
    pub fn pins_mut(&mut self) -> &mut P {
        self.bus.pins_mut()
    }

    /// Consume the engine and return the transport and delay
    pub fn release(self) -> (P, D) {
        self.bus.release()
    }

    /// Run one read frame
    pub fn read_frame(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        validate_address(phy_addr, reg_addr)?;
        self.begin()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("mdio read phy={} reg={}", phy_addr, reg_addr);

        self.header(OP_READ, phy_addr, reg_addr)?;

        self.phase = Phase::Turnaround;
        let floating = match self.turnaround_check {
            TurnaroundCheck::Ignore => {
                self.bus.release_cycles(TURNAROUND_CYCLES)?;
                false
            }
            TurnaroundCheck::Verify => self.bus.release_cycles_sampled(TURNAROUND_CYCLES)?,
        };

        self.phase = Phase::DataIn;
        let data = self.bus.read_bits(DATA_BITS)? as u16;

        self.phase = Phase::TrailingTurnaround;
        self.bus.release_cycles(TURNAROUND_CYCLES)?;
        self.phase = Phase::Idle;

        if floating {
            self.stats.no_response = self.stats.no_response.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("mdio: no response from phy {} reg {}", phy_addr, reg_addr);
            return Err(IoError::NoResponse.into());
        }

        self.stats.reads = self.stats.reads.wrapping_add(1);
        Ok(data)
    }

    /// Run one write frame
    pub fn write_frame(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        validate_address(phy_addr, reg_addr)?;
        self.begin()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("mdio write phy={} reg={} value={=u16:#x}", phy_addr, reg_addr, value);

        self.header(OP_WRITE, phy_addr, reg_addr)?;

        self.phase = Phase::Turnaround;
        self.bus.write_bits(TURNAROUND, SHORT_FIELD_BITS)?;

        self.phase = Phase::DataOut;
        self.bus.write_bits(u32::from(value), DATA_BITS)?;

        self.phase = Phase::TrailingTurnaround;
        self.bus.release_cycles(TURNAROUND_CYCLES)?;
        self.phase = Phase::Idle;

        self.stats.writes = self.stats.writes.wrapping_add(1);
        Ok(())
    }

    /// Resynchronise the bus after an abandoned frame
    ///
    /// Clocks a full preamble, which every PHY treats as the start of a new
    /// frame regardless of where it was, then returns the engine to idle.
    /// Safe to call when already idle.
    pub fn recover(&mut self) -> IoResult<()> {
        #[cfg(feature = "defmt")]
        defmt::warn!("mdio: recovering from {}", self.phase);

        self.phase = Phase::Preamble;
        self.bus.drive(MDIO_OE)?;
        self.bus.write_bits(PREAMBLE, PREAMBLE_BITS)?;
        self.bus.release_cycles(TURNAROUND_CYCLES)?;
        self.phase = Phase::Idle;

        self.stats.recoveries = self.stats.recoveries.wrapping_add(1);
        Ok(())
    }

    fn begin(&mut self) -> IoResult<()> {
        if self.phase != Phase::Idle {
            #[cfg(feature = "defmt")]
            defmt::debug!("mdio: busy in {}", self.phase);
            return Err(IoError::BusBusy);
        }
        Ok(())
    }

    fn header(&mut self, opcode: u32, phy_addr: u8, reg_addr: u8) -> IoResult<()> {
        self.phase = Phase::Preamble;
        self.bus.drive(MDIO_OE)?;
        self.bus.write_bits(PREAMBLE, PREAMBLE_BITS)?;

        self.phase = Phase::Start;
        self.bus.write_bits(START, SHORT_FIELD_BITS)?;

        self.phase = Phase::Opcode;
        self.bus.write_bits(opcode, SHORT_FIELD_BITS)?;

        self.phase = Phase::PhyAddress;
        self.bus.write_bits(u32::from(phy_addr), ADDR_FIELD_BITS)?;

        self.phase = Phase::RegAddress;
        self.bus.write_bits(u32::from(reg_addr), ADDR_FIELD_BITS)
    }
}

impl<P: MdioPins, D: DelayNs> MdioBus for FrameEngine<P, D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        self.read_frame(phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.write_frame(phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
