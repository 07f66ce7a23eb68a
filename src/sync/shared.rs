//! ISR-safe MDIO bus wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::error::{IoError, Result};
use crate::hal::mdio::MdioBus;

/// ISR-safe MDIO bus shared between contexts.
///
/// Each transaction runs inside `critical_section::with()`, so a frame is
/// never interleaved with another. A transaction started while the bus is
/// already held (for example from an interrupt that preempted a
/// [`with`](Self::with) closure) fails with [`IoError::BusBusy`] without
/// touching the lines.
///
/// `&SharedMdio` implements [`MdioBus`], so a client can borrow it directly.
///
/// # Example
///
/// ```ignore
/// let shared = SharedMdio::new(FrameEngine::new(pins, delay, &config));
///
/// let mut client = MdioClient::new(&map, &shared, config)?;
/// client.reset(0)?;
///
/// shared.with(|engine| engine.recover())?;
/// ```
pub struct SharedMdio<M> {
    inner: CriticalSectionCell<M>,
}

impl<M> SharedMdio<M> {
    /// Wrap a bus (const, suitable for static initialization).
    pub const fn new(bus: M) -> Self {
        Self {
            inner: CriticalSectionCell::new(bus),
        }
    }

    /// Execute a closure with exclusive access to the bus.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut M) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if the bus is held.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut M) -> R,
    {
        self.inner.try_with(f)
    }

    /// Consume the wrapper and return the bus.
    pub fn into_inner(self) -> M {
        self.inner.into_inner()
    }
}

impl<M: MdioBus> SharedMdio<M> {
    /// Read a PHY register as one uninterrupted transaction.
    pub fn read(&self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        self.inner
            .try_with(|bus| bus.read(phy_addr, reg_addr))
            .unwrap_or_else(|| Err(IoError::BusBusy.into()))
    }

    /// Write a PHY register as one uninterrupted transaction.
    pub fn write(&self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.inner
            .try_with(|bus| bus.write(phy_addr, reg_addr, value))
            .unwrap_or_else(|| Err(IoError::BusBusy.into()))
    }

    /// Whether the bus is held or mid-frame.
    pub fn is_busy(&self) -> bool {
        self.inner.try_with(|bus| bus.is_busy()).unwrap_or(true)
    }
}

impl<M: MdioBus> MdioBus for &SharedMdio<M> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        SharedMdio::read(self, phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        SharedMdio::write(self, phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        SharedMdio::is_busy(self)
    }
}
