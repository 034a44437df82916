//! Attach and detach lifecycle
//!
//! [`Sh1106`] is the bound device: a [`GraphicDisplay`] together with the
//! [`Power`] pins that brought it up. [`Sh1106::attach`] runs the bring-up in
//! order (reset pulse, supply, initialization program) and unwinds the supply
//! if initialization fails. [`Sh1106::try_attach`] does the same but hands the
//! parts back in an [`AttachError`] so the caller can retry. [`Sh1106::detach`] blanks the panel and hands
//! every resource back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sh1106::{Builder, Color, Display, FrameBuffer, I2cInterface, Power, Sh1106};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # fn run() -> Result<(), sh1106::Error<I2cInterface<MockI2c>>> {
//! let config = Builder::new().build()?;
//! let frame = FrameBuffer::new([0u8; 192], config.geometry)?;
//! let display = Display::new(I2cInterface::new(MockI2c), config);
//! let power = Power::new().with_reset(MockPin).with_supply(MockPin);
//!
//! let mut device = Sh1106::attach(display, frame, power, &mut MockDelay)?;
//! device.fill_rect(sh1106::Region::new(0, 0, 8, 8), Color::On)?;
//! device.display_mut().set_brightness(200)?;
//!
//! let (_interface, _power, _buffer) = device.detach();
//! # Ok(())
//! # }
//! ```

use core::ops::{Deref, DerefMut};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::display::Display;
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::graphics::GraphicDisplay;
use crate::interface::DisplayInterface;
use crate::power::{NoPin, Power};

type DeviceResult<I, T> = core::result::Result<T, Error<I>>;

/// Failed attach with every part handed back
pub struct AttachError<I, B, RST, VBAT>
where
    I: DisplayInterface,
{
    /// Why the attach failed
    pub error: Error<I>,
    /// Display, not initialized
    pub display: Display<I>,
    /// Frame buffer, unchanged
    pub frame: FrameBuffer<B>,
    /// Power pins, supply disabled
    pub power: Power<RST, VBAT>,
}

impl<I, B, RST, VBAT> core::fmt::Debug for AttachError<I, B, RST, VBAT>
where
    I: DisplayInterface,
    Error<I>: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AttachError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Attached SH1106 panel
///
/// Dereferences to [`GraphicDisplay`] for drawing, refresh and contrast.
pub struct Sh1106<I, B, RST = NoPin, VBAT = NoPin>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Display and frame buffer
    graphic: GraphicDisplay<I, B>,
    /// Reset and supply pins
    power: Power<RST, VBAT>,
}

impl<I, B, RST, VBAT> Sh1106<I, B, RST, VBAT>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
    RST: OutputPin,
    VBAT: OutputPin,
{
    /// Bring up the panel
    ///
    /// Pulses reset, enables the supply and runs the initialization
    /// program. The frame buffer is not pushed; call
    /// [`refresh`](GraphicDisplay::refresh) to show its contents.
    ///
    /// # Errors
    ///
    /// - `Error::GeometryMismatch` if `frame` does not match the configuration
    /// - `Error::Supply` if the supply rail could not be enabled
    /// - the initialization error, after disabling the supply again
    ///
    /// The parts are dropped on failure; use [`try_attach`](Self::try_attach)
    /// to keep them.
    pub fn attach<D: DelayNs>(
        display: Display<I>,
        frame: FrameBuffer<B>,
        power: Power<RST, VBAT>,
        delay: &mut D,
    ) -> DeviceResult<I, Self> {
        Self::try_attach(display, frame, power, delay).map_err(|failed| failed.error)
    }

    /// Bring up the panel, returning the parts on failure
    ///
    /// # Errors
    ///
    /// As [`attach`](Self::attach), wrapped in an [`AttachError`] that owns
    /// the display, frame buffer and power pins.
    pub fn try_attach<D: DelayNs>(
        mut display: Display<I>,
        frame: FrameBuffer<B>,
        mut power: Power<RST, VBAT>,
        delay: &mut D,
    ) -> Result<Self, AttachError<I, B, RST, VBAT>> {
        if let Err(error) = display.check_geometry(frame.geometry()) {
            return Err(AttachError {
                error,
                display,
                frame,
                power,
            });
        }

        power.reset(delay);
        if let Err(e) = power.enable_supply() {
            log::error!("failed to enable supply: {e:?}");
            return Err(AttachError {
                error: Error::Supply,
                display,
                frame,
                power,
            });
        }

        if let Err(error) = display.init() {
            log::error!("initialization failed: {error}");
            power.disable_supply();
            return Err(AttachError {
                error,
                display,
                frame,
                power,
            });
        }

        let geometry = display.geometry();
        log::info!(
            "sh1106 {}x{} attached, {} bytes of video memory",
            geometry.width,
            geometry.height,
            geometry.buffer_size()
        );
        Ok(Self {
            graphic: GraphicDisplay::new(display, frame),
            power,
        })
    }

    /// Blank the panel and release all resources
    ///
    /// Any pending deferred refresh is dropped. A failure to blank the panel
    /// is logged and does not stop the release.
    pub fn detach(self) -> (I, Power<RST, VBAT>, B) {
        let Self {
            mut graphic,
            mut power,
        } = self;
        graphic.cancel_pending();
        if let Err(e) = graphic.display_mut().set_display_on(false) {
            log::warn!("failed to blank panel on detach: {e}");
        }
        power.disable_supply();

        let (display, frame) = graphic.release();
        (display.release(), power, frame.release())
    }

    /// Get the power pins
    pub fn power(&self) -> &Power<RST, VBAT> {
        &self.power
    }
}

#[cfg(feature = "alloc")]
impl<I, RST, VBAT> Sh1106<I, alloc::vec::Vec<u8>, RST, VBAT>
where
    I: DisplayInterface,
    RST: OutputPin,
    VBAT: OutputPin,
{
    /// Allocate zero-filled video memory and [`attach`](Self::attach)
    ///
    /// # Errors
    ///
    /// Returns `Error::Buffer` if the allocation fails, otherwise as
    /// [`attach`](Self::attach).
    pub fn attach_zeroed<D: DelayNs>(
        display: Display<I>,
        power: Power<RST, VBAT>,
        delay: &mut D,
    ) -> DeviceResult<I, Self> {
        let frame = FrameBuffer::zeroed(display.geometry())?;
        Self::attach(display, frame, power, delay)
    }
}

impl<I, B, RST, VBAT> Deref for Sh1106<I, B, RST, VBAT>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Target = GraphicDisplay<I, B>;

    fn deref(&self) -> &Self::Target {
        &self.graphic
    }
}

impl<I, B, RST, VBAT> DerefMut for Sh1106<I, B, RST, VBAT>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.graphic
    }
}
