//! Reset line and supply rail control
//!
//! Both pins are optional. A board without a reset line or a switchable
//! supply uses [`NoPin`] in their place, which is what [`Power::new`] starts
//! from.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sh1106::Power;
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! let mut power = Power::new().with_reset(MockPin).with_supply(MockPin);
//! power.reset(&mut MockDelay);
//! let _ = power.enable_supply();
//! ```

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

/// Minimum time the reset line is held asserted, and the settle time after
/// releasing it, in microseconds
pub const RESET_PULSE_US: u32 = 4;

/// Placeholder for a pin the board does not have
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Optional reset line (active low) and supply enable (active high)
#[derive(Debug)]
pub struct Power<RST = NoPin, VBAT = NoPin> {
    /// Reset line
    reset: Option<RST>,
    /// Supply rail enable
    supply: Option<VBAT>,
    /// Whether the supply is currently enabled by us
    supply_enabled: bool,
}

impl Default for Power {
    fn default() -> Self {
        Self::new()
    }
}

impl Power {
    /// Create a power controller without reset line or supply switch
    pub fn new() -> Self {
        Self {
            reset: None,
            supply: None,
            supply_enabled: false,
        }
    }
}

impl<RST, VBAT> Power<RST, VBAT>
where
    RST: OutputPin,
    VBAT: OutputPin,
{
    /// Attach a reset line
    pub fn with_reset<R: OutputPin>(self, reset: R) -> Power<R, VBAT> {
        Power {
            reset: Some(reset),
            supply: self.supply,
            supply_enabled: self.supply_enabled,
        }
    }

    /// Attach a supply rail enable pin
    pub fn with_supply<V: OutputPin>(self, supply: V) -> Power<RST, V> {
        Power {
            reset: self.reset,
            supply: Some(supply),
            supply_enabled: self.supply_enabled,
        }
    }

    /// Whether a reset line is present
    pub fn has_reset(&self) -> bool {
        self.reset.is_some()
    }

    /// Whether the supply rail is enabled
    pub fn supply_enabled(&self) -> bool {
        self.supply_enabled
    }

    /// Pulse the reset line
    ///
    /// Asserts reset (low), waits [`RESET_PULSE_US`], releases it and waits
    /// again. Does nothing without a reset line. Pin errors are logged and
    /// otherwise ignored, a controller that missed the pulse will still
    /// accept the initialization program.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        if let Some(reset) = self.reset.as_mut() {
            if let Err(e) = reset.set_low() {
                log::warn!("reset assert failed: {e:?}");
            }
            delay.delay_us(RESET_PULSE_US);
            if let Err(e) = reset.set_high() {
                log::warn!("reset release failed: {e:?}");
            }
            delay.delay_us(RESET_PULSE_US);
        }
    }

    /// Enable the supply rail
    ///
    /// Does nothing without a supply pin.
    ///
    /// # Errors
    ///
    /// Returns the pin error if the rail could not be switched on.
    pub fn enable_supply(&mut self) -> Result<(), VBAT::Error> {
        if let Some(supply) = self.supply.as_mut() {
            supply.set_high()?;
            self.supply_enabled = true;
        }
        Ok(())
    }

    /// Disable the supply rail if we enabled it
    pub fn disable_supply(&mut self) {
        if !self.supply_enabled {
            return;
        }
        if let Some(supply) = self.supply.as_mut() {
            if let Err(e) = supply.set_low() {
                log::warn!("failed to disable supply: {e:?}");
            }
        }
        self.supply_enabled = false;
    }

    /// Consume the controller and return the pins
    pub fn release(self) -> (Option<RST>, Option<VBAT>) {
        (self.reset, self.supply)
    }
}
