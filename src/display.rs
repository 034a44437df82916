//! Core display operations
//!
//! [`Display`] owns the interface and the configuration. It runs the
//! initialization program, streams a [`FrameBuffer`] to display RAM one page
//! at a time, and drives contrast and blanking.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sh1106::{Builder, Display, FrameBuffer, I2cInterface};
//! # use core::convert::Infallible;
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
//! # fn run() -> Result<(), sh1106::Error<I2cInterface<MockI2c>>> {
//! let config = Builder::new().build()?;
//! let frame = FrameBuffer::new([0u8; 192], config.geometry)?;
//!
//! let mut display = Display::new(I2cInterface::new(MockI2c), config);
//! display.init()?;
//! display.refresh(&frame)?;
//! display.set_contrast(0xCF)?;
//! # Ok(())
//! # }
//! ```

use crate::command::{
    ADDRESS_MODE_PAGE, CHARGE_PUMP, DISPLAY_FOLLOW_RAM, DISPLAY_OFF, DISPLAY_ON, NORMAL_DISPLAY,
    SET_ADDRESS_MODE, SET_CLOCK_DIVIDE, SET_COM_PINS, SET_CONTRAST, SET_DISPLAY_OFFSET,
    SET_HIGH_COLUMN, SET_LOW_COLUMN, SET_MULTIPLEX_RATIO, SET_PAGE_ADDRESS, SET_PRECHARGE,
    SET_START_LINE, SET_VCOMH,
};
use crate::config::{Config, Geometry, MAX_COLUMNS};
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Largest value accepted by [`Display::set_brightness`]
pub const MAX_BRIGHTNESS: u32 = 255;

/// Number of command bytes in the initialization program
pub(crate) const INIT_PROGRAM_LEN: usize = 25;

/// Build the initialization program for `config`
///
/// Each byte is sent as its own command transfer. With the default
/// configuration this yields
/// `AE D5 80 A8 3F D3 00 40 8D 14 20 02 A1 C8 DA 12 81 7F D9 F1 DB 30 A4 A6 AF`.
pub(crate) fn init_program(config: &Config) -> [u8; INIT_PROGRAM_LEN] {
    [
        DISPLAY_OFF,
        SET_CLOCK_DIVIDE,
        config.clock_divide_byte(),
        SET_MULTIPLEX_RATIO,
        config.multiplex_ratio,
        SET_DISPLAY_OFFSET,
        config.com_offset,
        SET_START_LINE,
        CHARGE_PUMP,
        config.charge_pump_byte(),
        SET_ADDRESS_MODE,
        ADDRESS_MODE_PAGE,
        config.segment_remap_command(),
        config.com_scan_command(),
        SET_COM_PINS,
        config.com_pins_byte(),
        SET_CONTRAST,
        config.contrast,
        SET_PRECHARGE,
        config.precharge_byte(),
        SET_VCOMH,
        config.vcomh,
        DISPLAY_FOLLOW_RAM,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ]
}

/// Core display driver for SH1106
///
/// This struct provides the controller-level operations. For frame buffer
/// ownership and drawing, use [`GraphicDisplay`](crate::GraphicDisplay).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Last contrast accepted by the controller
    contrast: u8,
    /// Whether the initialization program completed
    initialized: bool,
    /// Whether the panel is showing RAM contents
    is_display_on: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No bus traffic happens until [`init`](Self::init).
    pub fn new(interface: I, config: Config) -> Self {
        let contrast = config.contrast;
        Self {
            interface,
            config,
            contrast,
            initialized: false,
            is_display_on: false,
        }
    }

    /// Run the initialization program
    ///
    /// The controller ends up in page addressing mode with the panel on.
    ///
    /// # Errors
    ///
    /// - `Error::AlreadyInitialized` on a second call
    /// - `Error::Config` if the configuration was edited into an invalid
    ///   state after [`Builder::build`](crate::Builder::build); nothing is sent
    /// - `Error::Interface` on the first failed transfer, which aborts the
    ///   rest of the program
    pub fn init(&mut self) -> DisplayResult<I> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        if let Err(e) = self.config.validate() {
            log::error!("refusing to init with invalid config: {e}");
            return Err(Error::Config(e));
        }
        let program = init_program(&self.config);
        log::debug!("sending {} byte init program", program.len());
        for (step, &byte) in program.iter().enumerate() {
            if let Err(e) = self.interface.send_command(byte) {
                log::error!("init aborted at byte {step} ({byte:#04x}): {e:?}");
                return Err(Error::Interface(e));
            }
        }
        self.contrast = self.config.contrast;
        self.initialized = true;
        self.is_display_on = true;
        Ok(())
    }

    /// Whether the initialization program has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Push the whole frame buffer to display RAM
    ///
    /// Pages are sent in ascending order. Each page is addressed with three
    /// command transfers (page, high column, low column) followed by one data
    /// transfer of `width` bytes.
    ///
    /// # Errors
    ///
    /// - `Error::NotInitialized` before [`init`](Self::init)
    /// - `Error::GeometryMismatch` if `frame` was built for another panel
    /// - `Error::Interface` on the first failed transfer, after which no
    ///   further page is sent
    pub fn refresh<B>(&mut self, frame: &FrameBuffer<B>) -> DisplayResult<I>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        self.check_geometry(frame.geometry())?;

        let pages = self.config.geometry.page_count();
        log::debug!("refreshing {pages} pages");
        let mut scratch = [0u8; MAX_COLUMNS as usize];
        for page in 0..pages {
            if let Err(e) = self.send_page(frame, page, &mut scratch) {
                log::error!("refresh aborted at page {page}: {e}");
                return Err(e);
            }
        }
        Ok(())
    }

    fn send_page<B>(
        &mut self,
        frame: &FrameBuffer<B>,
        page: u16,
        scratch: &mut [u8; MAX_COLUMNS as usize],
    ) -> DisplayResult<I>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let column = self.config.column_offset;
        self.send_command(SET_PAGE_ADDRESS + self.config.page_offset + page as u8)?;
        self.send_command(SET_HIGH_COLUMN | (column >> 4))?;
        self.send_command(SET_LOW_COLUMN | (column & 0x0F))?;

        let payload = match frame.transcode_page(page, scratch) {
            Some(payload) => payload,
            None => {
                let geometry = frame.geometry();
                return Err(Error::GeometryMismatch {
                    expected: self.dimensions(),
                    provided: (geometry.width, geometry.height),
                });
            }
        };
        self.interface.send_data(payload).map_err(Error::Interface)
    }

    pub(crate) fn check_geometry(&self, geometry: Geometry) -> DisplayResult<I> {
        if geometry != self.config.geometry {
            return Err(Error::GeometryMismatch {
                expected: self.dimensions(),
                provided: (geometry.width, geometry.height),
            });
        }
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.config.geometry.width, self.config.geometry.height)
    }

    /// Set the panel contrast
    ///
    /// Sends `0x81` followed by `value` as two command transfers. The stored
    /// contrast only changes if both transfers succeed.
    ///
    /// # Errors
    ///
    /// Returns the first failed transfer.
    pub fn set_contrast(&mut self, value: u8) -> DisplayResult<I> {
        self.send_command(SET_CONTRAST)?;
        self.send_command(value)?;
        self.contrast = value;
        Ok(())
    }

    /// Get the current contrast
    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    /// Set brightness in `0..=MAX_BRIGHTNESS`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBrightness` without any bus traffic if `value`
    /// is above [`MAX_BRIGHTNESS`], otherwise as
    /// [`set_contrast`](Self::set_contrast).
    pub fn set_brightness(&mut self, value: u32) -> DisplayResult<I> {
        let contrast = u8::try_from(value).map_err(|_| Error::InvalidBrightness {
            value,
            max: MAX_BRIGHTNESS,
        })?;
        self.set_contrast(contrast)
    }

    /// Get the current brightness
    pub fn brightness(&self) -> u32 {
        u32::from(self.contrast)
    }

    /// Blank or unblank the panel
    ///
    /// Display RAM is kept while blanked.
    pub fn set_display_on(&mut self, on: bool) -> DisplayResult<I> {
        self.send_command(if on { DISPLAY_ON } else { DISPLAY_OFF })?;
        self.is_display_on = on;
        Ok(())
    }

    /// Whether the panel is showing RAM contents
    pub fn is_display_on(&self) -> bool {
        self.is_display_on
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the panel geometry
    pub fn geometry(&self) -> Geometry {
        self.config.geometry
    }

    /// Get a reference to the interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Get a mutable reference to the interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Consume the display and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn send_command(&mut self, command: u8) -> DisplayResult<I> {
        self.interface
            .send_command(command)
            .map_err(Error::Interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::error::BuilderError;
    use crate::mock::{MockError, MockInterface, Transfer};
    use alloc::vec;
    use alloc::vec::Vec;

    const DEFAULT_PROGRAM: [u8; INIT_PROGRAM_LEN] = [
        0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x02, 0xA1, 0xC8, 0xDA,
        0x12, 0x81, 0x7F, 0xD9, 0xF1, 0xDB, 0x30, 0xA4, 0xA6, 0xAF,
    ];

    fn config(width: u16, height: u16) -> Config {
        Builder::new()
            .geometry(Geometry::new(width, height).unwrap())
            .build()
            .unwrap()
    }

    fn frame(config: &Config, fill: u8) -> FrameBuffer<Vec<u8>> {
        FrameBuffer::new(vec![fill; config.geometry.buffer_size()], config.geometry).unwrap()
    }

    /// Display that has already been initialized, with an empty transfer log
    fn ready_display(config: Config, fail_at: Option<usize>) -> Display<MockInterface> {
        let mut display = Display::new(MockInterface::new(), config);
        display.init().unwrap();
        let interface = display.interface_mut();
        interface.log.clear();
        interface.fail_at = fail_at.map(|n| n + INIT_PROGRAM_LEN);
        display
    }

    #[test]
    fn test_init_sends_default_program() {
        let mut display = Display::new(MockInterface::new(), config(96, 16));
        display.init().unwrap();
        assert!(display.is_initialized());
        assert!(display.is_display_on());
        assert_eq!(display.release().commands(), DEFAULT_PROGRAM.to_vec());
    }

    #[test]
    fn test_init_program_follows_config() {
        let config = Builder::new()
            .dclk_div(2)
            .dclk_frq(0xF)
            .contrast(0x10)
            .com_offset(4)
            .charge_pump(false)
            .com_invdir(true)
            .build()
            .unwrap();
        let program = init_program(&config);
        assert_eq!(program[2], 0xF1);
        assert_eq!(program[6], 0x04);
        assert_eq!(program[9], 0x10);
        assert_eq!(program[13], 0xC0);
        assert_eq!(program[17], 0x10);
    }

    #[test]
    fn test_init_aborts_on_first_failure() {
        let mut display = Display::new(MockInterface::failing_at(3), config(96, 16));
        let result = display.init();
        assert!(matches!(result, Err(Error::Interface(MockError))));
        assert!(!display.is_initialized());
        assert_eq!(display.release().commands(), vec![0xAE, 0xD5, 0x80]);
    }

    #[test]
    fn test_init_runs_once() {
        let mut display = Display::new(MockInterface::new(), config(96, 16));
        display.init().unwrap();
        assert!(matches!(display.init(), Err(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_init_rejects_edited_config_without_bus_traffic() {
        let mut config = config(96, 16);
        config.page_offset = 0x4F;
        let frame = frame(&config, 0);
        let mut display = Display::new(MockInterface::new(), config);

        assert!(matches!(
            display.init(),
            Err(Error::Config(BuilderError::InvalidPageOffset(0x4F)))
        ));
        assert!(!display.is_initialized());
        assert!(matches!(display.refresh(&frame), Err(Error::NotInitialized)));
        assert!(display.release().log.is_empty());
    }

    #[test]
    fn test_refresh_before_init_fails() {
        let config = config(96, 16);
        let frame = frame(&config, 0);
        let mut display = Display::new(MockInterface::new(), config);
        assert!(matches!(display.refresh(&frame), Err(Error::NotInitialized)));
        assert!(display.release().log.is_empty());
    }

    #[test]
    fn test_refresh_96x16_wire_sequence() {
        let config = config(96, 16);
        let frame = frame(&config, 0);
        let mut display = ready_display(config, None);
        display.refresh(&frame).unwrap();

        let zero_page = vec![0u8; 96];
        assert_eq!(
            display.release().log,
            vec![
                Transfer::Command(0xB0),
                Transfer::Command(0x10),
                Transfer::Command(0x02),
                Transfer::Data(zero_page.clone()),
                Transfer::Command(0xB1),
                Transfer::Command(0x10),
                Transfer::Command(0x02),
                Transfer::Data(zero_page),
            ]
        );
    }

    #[test]
    fn test_refresh_all_ones_partial_page() {
        let config = config(8, 10);
        let frame = frame(&config, 0xFF);
        let mut display = ready_display(config, None);
        display.refresh(&frame).unwrap();
        assert_eq!(
            display.release().data(),
            vec![vec![0xFF; 8], vec![0x03; 8]]
        );
    }

    #[test]
    fn test_refresh_pages_in_ascending_order() {
        let config = config(128, 64);
        let frame = frame(&config, 0);
        let mut display = ready_display(config, None);
        display.refresh(&frame).unwrap();

        let interface = display.release();
        let pages: Vec<u8> = interface
            .commands()
            .into_iter()
            .filter(|c| *c >= 0xB0)
            .collect();
        assert_eq!(pages, (0xB0..=0xB7).collect::<Vec<u8>>());
        assert_eq!(interface.data().len(), 8);
        assert!(interface.data().iter().all(|d| d.len() == 128));
    }

    #[test]
    fn test_refresh_applies_offsets() {
        let config = Builder::new()
            .page_offset(2)
            .column_offset(0x12)
            .build()
            .unwrap();
        let frame = frame(&config, 0);
        let mut display = ready_display(config, None);
        display.refresh(&frame).unwrap();
        assert_eq!(
            &display.release().commands()[..3],
            &[0xB2, 0x11, 0x02]
        );
    }

    #[test]
    fn test_refresh_data_failure_stops_later_pages() {
        // 24 rows: three pages. Transfer 7 is page 1's data.
        let config = config(16, 24);
        let frame = frame(&config, 0);
        let mut display = ready_display(config, Some(7));
        let result = display.refresh(&frame);
        assert!(matches!(result, Err(Error::Interface(MockError))));

        let interface = display.release();
        assert_eq!(interface.commands(), vec![0xB0, 0x10, 0x02, 0xB1, 0x10, 0x02]);
        assert_eq!(interface.data().len(), 1);
    }

    #[test]
    fn test_refresh_rejects_foreign_geometry() {
        let config_a = config(96, 16);
        let other = frame(&config(128, 64), 0);
        let mut display = ready_display(config_a, None);
        assert!(matches!(
            display.refresh(&other),
            Err(Error::GeometryMismatch {
                expected: (96, 16),
                provided: (128, 64)
            })
        ));
        assert!(display.release().log.is_empty());
    }

    #[test]
    fn test_set_contrast_sends_two_commands() {
        let mut display = ready_display(config(96, 16), None);
        display.set_contrast(0xCF).unwrap();
        assert_eq!(display.contrast(), 0xCF);
        assert_eq!(display.brightness(), 0xCF);
        assert_eq!(display.release().commands(), vec![0x81, 0xCF]);
    }

    #[test]
    fn test_contrast_kept_when_transfer_fails() {
        let mut display = ready_display(config(96, 16), Some(1));
        assert!(display.set_contrast(0x20).is_err());
        assert_eq!(display.contrast(), 127);
    }

    #[test]
    fn test_brightness_above_max_is_rejected_without_traffic() {
        let mut display = ready_display(config(96, 16), None);
        let result = display.set_brightness(256);
        assert!(matches!(
            result,
            Err(Error::InvalidBrightness {
                value: 256,
                max: 255
            })
        ));
        assert_eq!(display.brightness(), 127);
        assert!(display.release().log.is_empty());
    }

    #[test]
    fn test_brightness_at_max_is_accepted() {
        let mut display = ready_display(config(96, 16), None);
        display.set_brightness(255).unwrap();
        assert_eq!(display.brightness(), 255);
    }

    #[test]
    fn test_blanking() {
        let mut display = ready_display(config(96, 16), None);
        display.set_display_on(false).unwrap();
        assert!(!display.is_display_on());
        display.set_display_on(true).unwrap();
        assert!(display.is_display_on());
        assert_eq!(display.release().commands(), vec![0xAE, 0xAF]);
    }
}
