//! SH1106 command definitions
//!
//! This module defines the command bytes used to control the SH1106 OLED
//! controller. Over I2C every transfer starts with a control byte that tells
//! the controller whether the following bytes go to the command register or
//! to display RAM (see [`CONTROL_COMMAND`] and [`CONTROL_DATA`]).
//!
//! Several commands carry their argument in the low bits of the opcode
//! itself (page address, column address, display start line). Two-byte
//! commands send the opcode and the argument as two separate command bytes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sh1106::{command, DisplayInterface, I2cInterface};
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
//! # let mut interface = I2cInterface::new(MockI2c);
//! // Select page 3, column 0
//! let _ = interface.send_commands(&[
//!     command::SET_PAGE_ADDRESS | 3,
//!     command::SET_HIGH_COLUMN,
//!     command::SET_LOW_COLUMN,
//! ]);
//!
//! // Write one page worth of column bytes
//! let _ = interface.send_data(&[0xFF, 0x81, 0x81, 0xFF]);
//! ```

// Transfer control bytes

/// Control byte prefixing a command transfer (0x00)
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte prefixing a display RAM transfer (0x40)
pub const CONTROL_DATA: u8 = 0x40;

// Fundamental commands

/// Display off (sleep) command (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on command (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

/// Set contrast control command (0x81)
///
/// Followed by one command byte with the contrast value (0-255).
pub const SET_CONTRAST: u8 = 0x81;

/// Entire display follows RAM contents (0xA4)
pub const DISPLAY_FOLLOW_RAM: u8 = 0xA4;

/// Entire display forced on, ignoring RAM (0xA5)
pub const DISPLAY_ALL_ON: u8 = 0xA5;

/// Normal display, a set RAM bit lights the pixel (0xA6)
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Inverted display, a cleared RAM bit lights the pixel (0xA7)
pub const INVERT_DISPLAY: u8 = 0xA7;

// Addressing commands

/// Set lower nibble of the column address (0x00-0x0F)
///
/// OR the low four bits of the column into the opcode.
pub const SET_LOW_COLUMN: u8 = 0x00;

/// Set upper nibble of the column address (0x10-0x1F)
///
/// OR the high four bits of the column into the opcode.
pub const SET_HIGH_COLUMN: u8 = 0x10;

/// Set memory addressing mode command (0x20)
///
/// Followed by one of [`ADDRESS_MODE_HORIZONTAL`], [`ADDRESS_MODE_VERTICAL`]
/// or [`ADDRESS_MODE_PAGE`].
pub const SET_ADDRESS_MODE: u8 = 0x20;

/// Horizontal addressing mode argument
pub const ADDRESS_MODE_HORIZONTAL: u8 = 0x00;

/// Vertical addressing mode argument
pub const ADDRESS_MODE_VERTICAL: u8 = 0x01;

/// Page addressing mode argument
///
/// The only mode this driver uses: the column pointer wraps within the
/// current page and the page must be selected explicitly.
pub const ADDRESS_MODE_PAGE: u8 = 0x02;

/// Set display start line (0x40-0x7F)
///
/// OR the start line (0-63) into the opcode.
pub const SET_START_LINE: u8 = 0x40;

/// Set page address (0xB0-0xB7)
///
/// OR the page index (0-7) into the opcode.
pub const SET_PAGE_ADDRESS: u8 = 0xB0;

// Hardware configuration commands

/// Segment remap off, column 0 maps to SEG0 (0xA0)
pub const SEGMENT_REMAP_OFF: u8 = 0xA0;

/// Segment remap on, column 0 maps to SEG131 (0xA1)
pub const SEGMENT_REMAP_ON: u8 = 0xA1;

/// Set multiplex ratio command (0xA8)
///
/// Followed by the number of active rows minus one.
pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;

/// COM output scan direction normal, COM0 to COM[N-1] (0xC0)
pub const COM_SCAN_NORMAL: u8 = 0xC0;

/// COM output scan direction remapped, COM[N-1] to COM0 (0xC8)
pub const COM_SCAN_REMAPPED: u8 = 0xC8;

/// Set display offset command (0xD3)
///
/// Followed by the vertical shift in rows.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set COM pins hardware configuration command (0xDA)
///
/// Followed by the pin configuration byte:
/// - Bit 1: always set
/// - Bit 4: 0 = sequential, 1 = alternative pin configuration
/// - Bit 5: left/right remap
pub const SET_COM_PINS: u8 = 0xDA;

// Timing and driving commands

/// Set display clock divide ratio / oscillator frequency command (0xD5)
///
/// Followed by one byte: high nibble = oscillator frequency,
/// low nibble = divide ratio minus one.
pub const SET_CLOCK_DIVIDE: u8 = 0xD5;

/// Set pre-charge period command (0xD9)
///
/// Followed by one byte: high nibble = discharge (phase 2),
/// low nibble = pre-charge (phase 1), both in DCLK periods.
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set VCOMH deselect level command (0xDB)
pub const SET_VCOMH: u8 = 0xDB;

/// Charge pump setting command (0x8D)
///
/// Followed by [`CHARGE_PUMP_ENABLE`] or [`CHARGE_PUMP_DISABLE`].
pub const CHARGE_PUMP: u8 = 0x8D;

/// Charge pump enable argument
pub const CHARGE_PUMP_ENABLE: u8 = 0x14;

/// Charge pump disable argument
pub const CHARGE_PUMP_DISABLE: u8 = 0x10;
