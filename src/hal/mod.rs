//! Hardware Abstraction Layer
//!
//! This module turns two GPIO lines and a delay into an MDIO bus.
//!
//! # Modules
//!
//! - [`bitbang`]: Line-level clocking of single bits and bit runs
//! - [`mdio`]: Clause-22 frame engine and the [`MdioBus`] trait
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL (e.g., `esp_hal::delay::Delay`).

pub mod bitbang;
pub mod mdio;

// Re-export commonly used types
pub use bitbang::{BitBang, GpioPins, MdioPins, reverse_bits};
pub use mdio::{FrameEngine, FrameStats, MdioBus, Phase};
