//! Bit-banged MDIO
//!
//! A `no_std`, `no_alloc` Clause-22 MDIO client that drives the management
//! bus of an Ethernet PHY from two general-purpose lines.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **Register Layer** ([`register`]): Declarative register and field
//!    tables, packing and unpacking of 16-bit words
//! 2. **Bus Layer** ([`hal`]): Bit-level line control and the frame engine
//!    that clocks preamble, header, turnaround and data
//! 3. **Client Layer** ([`client`]): Register access by name, read-modify-write
//!    and PHY reset on top of any [`MdioBus`]
//!
//! ## Standard Compliance
//!
//! - **IEEE 802.3 Clause 22**: Frame format, turnaround, 32 PHY x 32 register
//!   address space
//! - **Marvell 88E1111**: Paged copper/fiber register bank via register 22
//!
//! # Supported PHY Chips
//!
//! - [`phy::marvell`]: Marvell 88E1111 register table
//!
//! Other PHYs only need a register table; see [`RegisterMapBuilder`].
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and frame-level logging
//! - `critical-section`: Enable ISR-safe [`SharedMdio`](sync::SharedMdio) wrapper
//!
//! # Example
//!
//! ```ignore
//! use bitbang_mdio::{FrameEngine, GpioPins, MdioClient, MdioConfig};
//! use bitbang_mdio::phy::marvell;
//!
//! let map = marvell::register_map()?;
//! let config = MdioConfig::new()
//!     .with_half_period_ns(500)
//!     .with_page_select(marvell::PAGE_ADDRESS);
//!
//! let engine = FrameEngine::new(GpioPins::new(mdc, mdio), delay, &config);
//! let mut client = MdioClient::new(&map, engine, config)?;
//!
//! client.reset(0)?;
//!
//! let status = client.read_register_by_name(0, "PHY_SPECIFIC_STATUS_COPPER")?;
//! if status.is_set("link_real_time")? {
//!     let speed = status.get("speed")?;
//! }
//! ```
//!
//! # Memory Requirements
//!
//! Register maps are fixed-capacity tables sized by const generics; nothing
//! is allocated. A [`SmallRegisterMap`] holds 16 registers and 128 fields.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod hal;
pub mod phy;
pub mod register;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::MdioClient;
pub use config::{MdioConfig, TurnaroundCheck};
pub use error::{
    ConfigError, ConfigResult, Error, FieldError, FieldResult, IoError, IoResult, Result,
};
pub use hal::{BitBang, FrameEngine, FrameStats, GpioPins, MdioBus, MdioPins, Phase};
pub use register::{
    DefaultRegisterMap, FieldDef, FieldView, RegAddr, RegisterDef, RegisterHandle, RegisterMap,
    RegisterMapBuilder, SmallRegisterMap,
};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedMdio};
