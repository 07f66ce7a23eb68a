//! Bit-Bang Transport Primitive
//!
//! Clocks individual MDIO bits over a pair of lines exposed through
//! [`MdioPins`]. Line state is a small mask:
//!
//! | Bit | Drive word | Sample word |
//! |-----|------------|-------------|
//! | 0   | `MDC`      | `MDIO_DI`   |
//! | 1   | `MDIO_OE`  |             |
//! | 2   | `MDIO_DO`  |             |
//!
//! Every edge is followed by a settle delay of `half_period_ns` taken from
//! an injected [`DelayNs`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::constants::{MDC, MDIO_DI, MDIO_DO, MDIO_OE};
use crate::error::{IoError, IoResult};

// =============================================================================
// Line Transport
// =============================================================================

/// Output/input line pair driving the management bus
///
/// Implementations map transport failures to [`IoError::Transport`].
pub trait MdioPins {
    /// Set the output lines (`MDC | MDIO_OE | MDIO_DO` mask)
    fn drive(&mut self, lines: u8) -> IoResult<()>;

    /// Read the input lines (`MDIO_DI` mask)
    fn sample(&mut self) -> IoResult<u8>;
}

impl<T: MdioPins + ?Sized> MdioPins for &mut T {
    fn drive(&mut self, lines: u8) -> IoResult<()> {
        T::drive(self, lines)
    }

    fn sample(&mut self) -> IoResult<u8> {
        T::sample(self)
    }
}

/// [`MdioPins`] over two `embedded-hal` GPIOs
///
/// The data pin must be open-drain with an external pull-up: releasing the
/// line drives it high and lets the PHY pull it low.
#[derive(Debug)]
pub struct GpioPins<CLK, DIO> {
    mdc: CLK,
    mdio: DIO,
}

impl<CLK: OutputPin, DIO: OutputPin + InputPin> GpioPins<CLK, DIO> {
    /// Wrap the clock and data pins
    pub fn new(mdc: CLK, mdio: DIO) -> Self {
        Self { mdc, mdio }
    }

    /// Consume the adapter and return the pins
    pub fn into_pins(self) -> (CLK, DIO) {
        (self.mdc, self.mdio)
    }
}

impl<CLK: OutputPin, DIO: OutputPin + InputPin> MdioPins for GpioPins<CLK, DIO> {
    fn drive(&mut self, lines: u8) -> IoResult<()> {
        let data_high = lines & MDIO_OE == 0 || lines & MDIO_DO != 0;
        let data = if data_high {
            self.mdio.set_high()
        } else {
            self.mdio.set_low()
        };
        data.map_err(|_| IoError::Transport)?;

        let clock = if lines & MDC != 0 {
            self.mdc.set_high()
        } else {
            self.mdc.set_low()
        };
        clock.map_err(|_| IoError::Transport)
    }

    fn sample(&mut self) -> IoResult<u8> {
        let high = self.mdio.is_high().map_err(|_| IoError::Transport)?;
        Ok(if high { MDIO_DI } else { 0 })
    }
}

// =============================================================================
// Bit Order
// =============================================================================

/// Reverse the low `n` bits of `word` (bits above `n` are dropped)
///
/// Self-inverse for every `n` up to 32.
pub const fn reverse_bits(word: u32, n: u8) -> u32 {
    let mut out = 0u32;
    let mut i = 0;
    while i < n && i < 32 {
        out = (out << 1) | ((word >> i) & 1);
        i += 1;
    }
    out
}

// =============================================================================
// Bit-Bang Primitive
// =============================================================================

/// Clocked bit-level access to the management lines
#[derive(Debug)]
pub struct BitBang<P, D> {
    pins: P,
    delay: D,
    half_period_ns: u32,
}

impl<P: MdioPins, D: DelayNs> BitBang<P, D> {
    /// Create a primitive settling `half_period_ns` after each edge
    pub fn new(pins: P, delay: D, half_period_ns: u32) -> Self {
        Self {
            pins,
            delay,
            half_period_ns,
        }
    }

    /// Settle time after each edge
    pub fn half_period_ns(&self) -> u32 {
        self.half_period_ns
    }

    /// Underlying line transport
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Mutable access to the line transport
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    /// Consume the primitive and return the transport and delay
    pub fn release(self) -> (P, D) {
        (self.pins, self.delay)
    }

    /// Wait one half period
    #[inline]
    pub fn delay(&mut self) {
        self.delay.delay_ns(self.half_period_ns);
    }

    /// Set the output lines
    #[inline]
    pub fn drive(&mut self, lines: u8) -> IoResult<()> {
        self.pins.drive(lines)
    }

    /// Shift one bit out: data, data with a rising clock, data
    pub fn write_bit(&mut self, value: bool, output_enabled: bool) -> IoResult<()> {
        let mut data = 0;
        if output_enabled {
            data |= MDIO_OE;
        }
        if value {
            data |= MDIO_DO;
        }

        self.drive(data)?;
        self.delay();
        self.drive(data | MDC)?;
        self.delay();
        self.drive(data)
    }

    /// Sample one bit, then clock with the output released
    pub fn read_bit(&mut self) -> IoResult<bool> {
        let bit = self.pins.sample()? & MDIO_DI != 0;
        self.drive(MDC)?;
        self.delay();
        self.drive(0)?;
        self.delay();
        Ok(bit)
    }

    /// Shift the low `count` bits of `word` out, most significant first
    ///
    /// `count` is capped at 32.
    pub fn write_bits(&mut self, word: u32, count: u8) -> IoResult<()> {
        let count = count.min(u32::BITS as u8);
        let reversed = reverse_bits(word, count);
        for i in 0..count {
            self.write_bit((reversed >> i) & 1 != 0, true)?;
        }
        Ok(())
    }

    /// Shift `count` bits in, most significant first
    ///
    /// `count` is capped at 32.
    pub fn read_bits(&mut self, count: u8) -> IoResult<u32> {
        let count = count.min(u32::BITS as u8);
        let mut word = 0u32;
        for _ in 0..count {
            word = (word << 1) | u32::from(self.read_bit()?);
        }
        Ok(word)
    }

    /// Clock `cycles` released cycles (turnaround or idle)
    pub fn release_cycles(&mut self, cycles: u8) -> IoResult<()> {
        for _ in 0..cycles {
            self.release_cycle()?;
        }
        Ok(())
    }

    /// Clock `cycles` released cycles, sampling the line just before the
    /// last one
    ///
    /// For a two-cycle read turnaround this is the slot in which a present
    /// PHY holds MDIO low. Returns `true` if the line was high; zero
    /// cycles sample nothing and return `false`.
    pub fn release_cycles_sampled(&mut self, cycles: u8) -> IoResult<bool> {
        let mut high = false;
        for i in 0..cycles {
            if i + 1 == cycles {
                high = self.pins.sample()? & MDIO_DI != 0;
            }
            self.release_cycle()?;
        }
        Ok(high)
    }

    fn release_cycle(&mut self) -> IoResult<()> {
        self.delay();
        self.drive(MDC)?;
        self.delay();
        self.drive(0)
    }
}
