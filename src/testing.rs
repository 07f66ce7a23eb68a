//! Testing utilities and mock implementations
//!
//! Host-side doubles for the line transport, the bus, and the delay.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::HashMap;
use std::vec::Vec;

use crate::constants::{MDC, MDIO_DI, MDIO_DO, MDIO_OE, PREAMBLE_BITS};
use crate::error::{IoError, IoResult, Result};
use crate::hal::bitbang::MdioPins;
use crate::hal::mdio::MdioBus;

// =============================================================================
// Simulated PHY
// =============================================================================

/// Completed transaction as seen by the simulated PHY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhyEvent {
    Read { phy: u8, reg: u8, value: u16 },
    Write { phy: u8, reg: u8, value: u16 },
}

#[derive(Debug, Clone, Copy)]
enum Decoder {
    /// Counting consecutive driven ones
    Hunt { ones: u32 },
    /// Start, opcode, and addresses (14 bits, first start bit included)
    Header { bits: u16, count: u8 },
    /// Answering a read; `edges` counts released rising edges
    Read {
        phy: u8,
        reg: u8,
        value: Option<u16>,
        edges: u8,
    },
    /// Collecting turnaround and data of a write
    Write { phy: u8, reg: u8, bits: u32, count: u8 },
}

const HEADER_BITS: u8 = 14;
const WRITE_TAIL_BITS: u8 = 18;
const READ_DATA_DONE: u8 = 18;
const READ_FRAME_DONE: u8 = 20;

/// Clause-22 slave model implementing [`MdioPins`]
///
/// Decodes the station's rising clock edges, answers reads by driving the
/// data line, and stores writes. The data line is modelled as open-drain
/// with a pull-up, so an absent PHY (or one at another address) reads as
/// all ones.
///
/// # Example
///
/// ```ignore
/// let mut phy = SimulatedPhy::new(0);
/// phy.set_register(0x00, 0x1140);
///
/// let mut mdio = FrameEngine::new(phy, MockDelay::new(), &MdioConfig::new());
/// assert_eq!(mdio.read(0, 0x00), Ok(0x1140));
/// ```
#[derive(Debug)]
pub struct SimulatedPhy {
    address: u8,
    present: bool,
    page_select: Option<u8>,
    page: u8,
    /// Register values: (page, reg) -> value
    registers: HashMap<(u8, u8), u16>,
    lines: u8,
    decoder: Decoder,
    drives: Vec<u8>,
    samples: usize,
    driven_bits: Vec<bool>,
    released_edges: usize,
    events: Vec<PhyEvent>,
    fail_at: Option<usize>,
}

impl SimulatedPhy {
    /// PHY answering at `address`
    pub fn new(address: u8) -> Self {
        Self {
            address,
            present: true,
            page_select: None,
            page: 0,
            registers: HashMap::new(),
            lines: 0,
            decoder: Decoder::Hunt { ones: 0 },
            drives: Vec::new(),
            samples: 0,
            driven_bits: Vec::new(),
            released_edges: 0,
            events: Vec::new(),
            fail_at: None,
        }
    }

    /// Nothing on the bus; the pull-up wins every sample
    pub fn absent() -> Self {
        Self {
            present: false,
            ..Self::new(0)
        }
    }

    /// Switch register pages on writes to `index`
    pub fn with_page_select(mut self, index: u8) -> Self {
        self.page_select = Some(index);
        self
    }

    /// Set a base-page register
    pub fn set_register(&mut self, reg: u8, value: u16) {
        self.set_paged_register(0, reg, value);
    }

    /// Set a register on a specific page
    pub fn set_paged_register(&mut self, page: u8, reg: u8, value: u16) {
        self.registers.insert((page, reg), value);
    }

    /// Base-page register value (0 if never written)
    pub fn register(&self, reg: u8) -> u16 {
        self.paged_register(0, reg)
    }

    /// Register value on a specific page (0 if never written)
    pub fn paged_register(&self, page: u8, reg: u8) -> u16 {
        self.registers.get(&(page, reg)).copied().unwrap_or(0)
    }

    /// Currently selected page
    pub fn page(&self) -> u8 {
        self.page
    }

    /// Fail every pin operation once `n` more have succeeded
    pub fn fail_after(&mut self, n: usize) {
        self.fail_at = Some(self.pin_ops() + n);
    }

    /// Stop injecting failures
    pub fn heal(&mut self) {
        self.fail_at = None;
    }

    /// Every drive word in order
    pub fn drives(&self) -> &[u8] {
        &self.drives
    }

    /// Bits the station drove at rising clock edges
    pub fn driven_bits(&self) -> Vec<bool> {
        self.driven_bits.clone()
    }

    /// Rising clock edges with the output released
    pub fn released_edges(&self) -> usize {
        self.released_edges
    }

    /// Number of samples taken
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Successful drives plus samples
    pub fn pin_ops(&self) -> usize {
        self.drives.len() + self.samples
    }

    /// Completed transactions addressed to this PHY
    pub fn events(&self) -> &[PhyEvent] {
        &self.events
    }

    /// Clear the pin and event logs (register contents are kept)
    pub fn clear_log(&mut self) {
        self.drives.clear();
        self.samples = 0;
        self.driven_bits.clear();
        self.released_edges = 0;
        self.events.clear();
    }

    fn check(&self) -> IoResult<()> {
        match self.fail_at {
            Some(limit) if self.pin_ops() >= limit => Err(IoError::Transport),
            _ => Ok(()),
        }
    }

    fn responds(&self, phy: u8) -> bool {
        self.present && phy == self.address
    }

    fn load(&self, reg: u8) -> u16 {
        if self.page_select == Some(reg) {
            self.paged_register(0, reg)
        } else {
            self.paged_register(self.page, reg)
        }
    }

    fn store(&mut self, reg: u8, value: u16) {
        if self.page_select == Some(reg) {
            self.page = value as u8;
            self.registers.insert((0, reg), value);
        } else {
            self.registers.insert((self.page, reg), value);
        }
    }

    /// Level the PHY puts on the data line
    fn phy_level(&self) -> bool {
        match self.decoder {
            Decoder::Read {
                value: Some(value),
                edges,
                ..
            } => match edges {
                1 => false,
                2..=17 => (value >> (17 - edges)) & 1 != 0,
                _ => true,
            },
            _ => true,
        }
    }

    fn on_driven(&mut self, bit: bool) {
        self.decoder = match self.decoder {
            Decoder::Hunt { ones } if bit => Decoder::Hunt {
                ones: ones.saturating_add(1),
            },
            Decoder::Hunt { ones } if ones >= u32::from(PREAMBLE_BITS) => {
                Decoder::Header { bits: 0, count: 1 }
            }
            Decoder::Hunt { .. } => Decoder::Hunt { ones: 0 },
            Decoder::Header { bits, count } => {
                let bits = (bits << 1) | u16::from(bit);
                if count + 1 == HEADER_BITS {
                    self.decode_header(bits)
                } else {
                    Decoder::Header {
                        bits,
                        count: count + 1,
                    }
                }
            }
            Decoder::Read { .. } => {
                // Station took the line back mid-read
                self.decoder = Decoder::Hunt { ones: 0 };
                self.on_driven(bit);
                return;
            }
            Decoder::Write {
                phy,
                reg,
                bits,
                count,
            } => {
                let bits = (bits << 1) | u32::from(bit);
                if count + 1 == WRITE_TAIL_BITS {
                    self.finish_write(phy, reg, bits);
                    Decoder::Hunt { ones: 0 }
                } else {
                    Decoder::Write {
                        phy,
                        reg,
                        bits,
                        count: count + 1,
                    }
                }
            }
        };
    }

    fn on_released(&mut self) {
        self.decoder = match self.decoder {
            Decoder::Read {
                phy,
                reg,
                value,
                edges,
            } => {
                let edges = edges + 1;
                if edges == READ_DATA_DONE {
                    if let Some(value) = value {
                        self.events.push(PhyEvent::Read { phy, reg, value });
                    }
                }
                if edges >= READ_FRAME_DONE {
                    Decoder::Hunt { ones: 0 }
                } else {
                    Decoder::Read {
                        phy,
                        reg,
                        value,
                        edges,
                    }
                }
            }
            _ => Decoder::Hunt { ones: 0 },
        };
    }

    fn decode_header(&self, bits: u16) -> Decoder {
        let start = (bits >> 12) & 0b11;
        let opcode = (bits >> 10) & 0b11;
        let phy = ((bits >> 5) & 0x1F) as u8;
        let reg = (bits & 0x1F) as u8;

        match (start, opcode) {
            (0b01, 0b10) => Decoder::Read {
                phy,
                reg,
                value: self.responds(phy).then(|| self.load(reg)),
                edges: 0,
            },
            (0b01, 0b01) => Decoder::Write {
                phy,
                reg,
                bits: 0,
                count: 0,
            },
            _ => Decoder::Hunt { ones: 0 },
        }
    }

    fn finish_write(&mut self, phy: u8, reg: u8, bits: u32) {
        let turnaround = (bits >> 16) & 0b11;
        let value = (bits & 0xFFFF) as u16;
        if turnaround == 0b10 && self.responds(phy) {
            self.store(reg, value);
            self.events.push(PhyEvent::Write { phy, reg, value });
        }
    }
}

impl MdioPins for SimulatedPhy {
    fn drive(&mut self, lines: u8) -> IoResult<()> {
        self.check()?;

        let rising = self.lines & MDC == 0 && lines & MDC != 0;
        self.lines = lines;
        self.drives.push(lines);

        if rising {
            if lines & MDIO_OE != 0 {
                let bit = lines & MDIO_DO != 0;
                self.driven_bits.push(bit);
                self.on_driven(bit);
            } else {
                self.released_edges += 1;
                self.on_released();
            }
        }
        Ok(())
    }

    fn sample(&mut self) -> IoResult<u8> {
        self.check()?;
        self.samples += 1;

        let station_high = self.lines & MDIO_OE == 0 || self.lines & MDIO_DO != 0;
        Ok(if station_high && self.phy_level() {
            MDIO_DI
        } else {
            0
        })
    }
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

/// Transaction recorded by [`MockMdioBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdioOp {
    Read(u8, u8),
    Write(u8, u8, u16),
}

/// Mock MDIO bus for testing clients without a frame engine
///
/// This allows setting up register values and verifying writes.
///
/// # Example
///
/// ```ignore
/// let mut mdio = MockMdioBus::new();
/// mdio.set_register(0, 0x00, 0x1140);
///
/// let mut client = MdioClient::new(&map, &mut mdio, MdioConfig::new())?;
/// client.reset(0)?;
/// assert_reg_written!(mdio, 0, 0x00, 0x9140);
/// ```
#[derive(Debug, Default)]
pub struct MockMdioBus {
    /// Register values: (phy_addr, reg_addr) -> value
    registers: RefCell<HashMap<(u8, u8), u16>>,
    /// Record of writes: (phy_addr, reg_addr, value)
    write_log: RefCell<Vec<(u8, u8, u16)>>,
    /// Every transaction in order
    op_log: RefCell<Vec<MdioOp>>,
    /// Whether the bus should report as busy
    busy: RefCell<bool>,
}

impl MockMdioBus {
    /// Create a new mock MDIO bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register value
    pub fn set_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);
    }

    /// Get the current value of a register (for test verification)
    pub fn get_register(&self, phy_addr: u8, reg_addr: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy_addr, reg_addr)).copied()
    }

    /// Get all writes that have been made
    pub fn get_writes(&self) -> Vec<(u8, u8, u16)> {
        self.write_log.borrow().clone()
    }

    /// Get every read and write in order
    pub fn get_ops(&self) -> Vec<MdioOp> {
        self.op_log.borrow().clone()
    }

    /// Clear the logs
    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
        self.op_log.borrow_mut().clear();
    }

    /// Set the busy flag; a busy bus refuses every transaction
    pub fn set_busy(&self, busy: bool) {
        *self.busy.borrow_mut() = busy;
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        if self.is_busy() {
            return Err(IoError::BusBusy.into());
        }
        self.op_log.borrow_mut().push(MdioOp::Read(phy_addr, reg_addr));

        // Return from register map (default 0 if not set)
        Ok(self
            .registers
            .borrow()
            .get(&(phy_addr, reg_addr))
            .copied()
            .unwrap_or(0))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        if self.is_busy() {
            return Err(IoError::BusBusy.into());
        }
        self.op_log
            .borrow_mut()
            .push(MdioOp::Write(phy_addr, reg_addr, value));
        self.write_log
            .borrow_mut()
            .push((phy_addr, reg_addr, value));

        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);

        Ok(())
    }

    fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
    calls: usize,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    /// Number of delay calls
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Reset the counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}

// =============================================================================
// Test Assertions
// =============================================================================

/// Assert that a register was written with a specific value
#[macro_export]
macro_rules! assert_reg_written {
    ($mdio:expr, $phy:expr, $reg:expr, $value:expr) => {
        let writes = $mdio.get_writes();
        assert!(
            writes
                .iter()
                .any(|w| w.0 == $phy && w.1 == $reg && w.2 == $value),
            "Expected write to PHY {} reg {} with value 0x{:04X}, but got: {:?}",
            $phy,
            $reg,
            $value,
            writes
        );
    };
}

/// Assert that a register was never written
#[macro_export]
macro_rules! assert_reg_not_written {
    ($mdio:expr, $phy:expr, $reg:expr) => {
        let writes = $mdio.get_writes();
        assert!(
            !writes.iter().any(|w| w.0 == $phy && w.1 == $reg),
            "Expected no write to PHY {} reg {}, but got: {:?}",
            $phy,
            $reg,
            writes
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MdioConfig;
    use crate::hal::mdio::FrameEngine;

    #[test]
    fn simulated_phy_idle_line_is_high() {
        let mut phy = SimulatedPhy::new(0);
        assert_eq!(phy.sample(), Ok(MDIO_DI));
        phy.drive(MDIO_OE).unwrap();
        assert_eq!(phy.sample(), Ok(0));
    }

    #[test]
    fn simulated_phy_needs_full_preamble() {
        let mut phy = SimulatedPhy::new(0);
        phy.set_register(0, 0x1234);

        // 31 ones, then a read header: no frame starts
        for bit in core::iter::repeat_n(true, 31).chain([false, true, true, false]) {
            let data = MDIO_OE | if bit { MDIO_DO } else { 0 };
            phy.drive(data).unwrap();
            phy.drive(data | MDC).unwrap();
        }
        assert!(matches!(phy.decoder, Decoder::Hunt { .. }));
    }

    #[test]
    fn simulated_phy_page_select() {
        let phy = SimulatedPhy::new(0).with_page_select(22);
        let mut mdio = FrameEngine::new(phy, MockDelay::new(), &MdioConfig::new());

        mdio.write(0, 22, 1).unwrap();
        mdio.write(0, 0, 0x0140).unwrap();
        mdio.write(0, 22, 0).unwrap();

        let phy = mdio.pins();
        assert_eq!(phy.page(), 0);
        assert_eq!(phy.paged_register(1, 0), 0x0140);
        assert_eq!(phy.register(0), 0);
    }

    #[test]
    fn mock_bus_busy_refuses() {
        let mut mdio = MockMdioBus::new();
        mdio.set_busy(true);
        assert_eq!(mdio.read(0, 0), Err(IoError::BusBusy.into()));
        assert!(mdio.get_ops().is_empty());
    }

    #[test]
    fn mock_delay_accumulates() {
        use embedded_hal::delay::DelayNs;

        let mut delay = MockDelay::new();
        delay.delay_ns(500);
        delay.delay_us(2);
        assert_eq!(delay.total_ns(), 2_500);
        delay.reset();
        assert_eq!(delay.total_ns(), 0);
    }
}
