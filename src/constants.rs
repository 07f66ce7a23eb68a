//! Centralized Constants
//!
//! Wire encodings, line masks, and timing defaults for the bit-banged
//! Clause-22 MDIO bus.
//!
//! # Organization
//!
//! - **Line masks**: bit positions in the transport's drive/sample words
//! - **Frame encoding**: IEEE 802.3 Clause 22 field values and widths
//! - **Addressing**: PHY/register address limits and the extended bank bit
//! - **Timing**: default bit-clock half period

// =============================================================================
// Line Masks
// =============================================================================

/// Management data clock (drive word)
pub const MDC: u8 = 0x01;

/// MDIO output enable (drive word)
pub const MDIO_OE: u8 = 0x02;

/// MDIO data out (drive word)
pub const MDIO_DO: u8 = 0x04;

/// MDIO data in (sample word)
pub const MDIO_DI: u8 = 0x01;

// =============================================================================
// Frame Encoding
// =============================================================================

/// Preamble pattern: 32 consecutive ones
pub const PREAMBLE: u32 = 0xFFFF_FFFF;

/// Preamble length in bits
pub const PREAMBLE_BITS: u8 = 32;

/// Start of frame (`01`)
pub const START: u32 = 0b01;

/// Read opcode (`10`)
pub const OP_READ: u32 = 0b10;

/// Write opcode (`01`)
pub const OP_WRITE: u32 = 0b01;

/// Driven write turnaround (`10`)
pub const TURNAROUND: u32 = 0b10;

/// Width of start, opcode, and turnaround fields
pub const SHORT_FIELD_BITS: u8 = 2;

/// Width of PHY and register address fields
pub const ADDR_FIELD_BITS: u8 = 5;

/// Width of the data field
pub const DATA_BITS: u8 = 16;

/// Released clock cycles in a turnaround (or trailing idle)
pub const TURNAROUND_CYCLES: u8 = 2;

// =============================================================================
// Addressing
// =============================================================================

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Maximum valid register index (5-bit field)
pub const MAX_REG_INDEX: u8 = 31;

/// Mask selecting the on-wire register index
pub const REG_INDEX_MASK: u8 = 0x1F;

/// Reserved high address bit selecting the extended bank
pub const EXTENDED_BANK_BIT: u8 = 0x20;

/// Width of every register carried by a Clause-22 frame
pub const REGISTER_WIDTH: u8 = 16;

// =============================================================================
// Timing
// =============================================================================

/// Default settle time after each clock edge, in nanoseconds (MDC ~500 kHz)
pub const DEFAULT_HALF_PERIOD_NS: u32 = 1_000;
