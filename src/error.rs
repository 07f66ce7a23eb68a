//! Error types for the MDIO client
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Register map definition and address validation failures
//! - [`FieldError`]: Packing/unpacking failures against a register definition
//! - [`IoError`]: Bus-level failures while a frame is on the wire
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most client methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Register map and addressing errors
///
/// Definition-time variants (`DuplicateAddress`, `FieldOutOfRange`, ...)
/// mean the static register table is wrong and must be fixed at the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A register is already defined at this address
    DuplicateAddress,
    /// A field with this name already exists on the register
    DuplicateField,
    /// Field does not fit inside the register width
    FieldOutOfRange,
    /// Register width must be 1..=16 bits
    InvalidWidth,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// Invalid or unreachable register address
    InvalidRegisterAddress,
    /// Register handle does not belong to this map
    UnknownRegister,
    /// Fixed register/field storage is full
    CapacityExceeded,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::DuplicateAddress => "register address already defined",
            ConfigError::DuplicateField => "field name already defined",
            ConfigError::FieldOutOfRange => "field exceeds register width",
            ConfigError::InvalidWidth => "invalid register width",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidRegisterAddress => "invalid register address",
            ConfigError::UnknownRegister => "unknown register",
            ConfigError::CapacityExceeded => "register map capacity exceeded",
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Field access errors
///
/// Raised when packing or unpacking a register value by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// No field with this name on the register
    UnknownField,
    /// Value does not fit in the field (or word does not fit the register)
    ValueOutOfRange,
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FieldError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldError::UnknownField => "unknown field",
            FieldError::ValueOutOfRange => "value out of range for field",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Bus transaction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Another transaction has not returned the bus to idle
    BusBusy,
    /// The pin transport failed to drive or sample the lines
    Transport,
    /// PHY did not pull the line low during read turnaround
    NoResponse,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::BusBusy => "MDIO bus busy",
            IoError::Transport => "pin transport failure",
            IoError::NoResponse => "no PHY response during turnaround",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidPhyAddress)) => { /* ... */ }
///     Err(Error::Field(FieldError::UnknownField)) => { /* ... */ }
///     Err(Error::Io(IoError::BusBusy)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Field error
    Field(FieldError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Field(e) => write!(f, "field: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl core::error::Error for Error {}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<FieldError> for Error {
    fn from(e: FieldError) -> Self {
        Error::Field(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for MDIO operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for field operations
pub type FieldResult<T> = core::result::Result<T, FieldError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
