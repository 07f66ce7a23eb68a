//! Synchronization and Concurrency Support
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`], ISR-safe
//!   interior mutability
//! - **Shared Wrappers** (`shared`): [`SharedMdio`], a bus that serialises
//!   whole transactions and reports re-entry as
//!   [`IoError::BusBusy`](crate::error::IoError::BusBusy)
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use bitbang_mdio::sync::SharedMdio;
//!
//! let mdio = SharedMdio::new(FrameEngine::new(pins, delay, &config));
//!
//! // Thread context
//! let status = mdio.read(0, 0x01)?;
//!
//! // Interrupt context: never interleaves with a frame in flight
//! match mdio.read(0, 0x13) {
//!     Err(Error::Io(IoError::BusBusy)) => { /* retry later */ }
//!     other => { /* ... */ }
//! }
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedMdio;
