//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`I2cInterface`]
//! struct for communicating with the SH1106 controller over I2C.
//!
//! ## Wire Format
//!
//! Every I2C write starts with a control byte:
//! - `0x00` ([`CONTROL_COMMAND`]): the following byte is a command
//! - `0x40` ([`CONTROL_DATA`]): the following bytes go to display RAM
//!
//! Commands are sent one per transfer. A data block is sent as a single
//! transfer and never split, so a failing bus can only stop the driver
//! between blocks.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sh1106::{DisplayInterface, I2cInterface};
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
//! // Create interface at the default address (0x3C)
//! let mut interface = I2cInterface::new(MockI2c);
//!
//! // Send command
//! let _ = interface.send_command(0xAF); // Display on
//!
//! // Send data
//! let _ = interface.send_data(&[0xFF, 0x00, 0xFF]);
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::I2c;

use crate::command::{CONTROL_COMMAND, CONTROL_DATA};
use crate::config::MAX_COLUMNS;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the command channel to the SH1106 controller
///
/// This trait abstracts over different transports, allowing the
/// [`Display`](crate::display::Display) to work with anything that can
/// deliver tagged command and data transfers in order.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send one command byte to the controller
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails or is cut short.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send a block of bytes to display RAM as one transfer
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails or is cut short.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Send several command bytes, one transfer each, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the error of the first failed transfer.
    fn send_commands(&mut self, commands: &[u8]) -> InterfaceResult<(), Self::Error> {
        for &command in commands {
            self.send_command(command)?;
        }
        Ok(())
    }
}

/// Which controller register a transfer targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TransferKind {
    /// Command register
    Command = CONTROL_COMMAND,
    /// Display RAM
    Data = CONTROL_DATA,
}

impl TransferKind {
    /// Control byte that prefixes a transfer of this kind
    pub fn control_byte(self) -> u8 {
        self as u8
    }
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<E> {
    /// I2C bus error
    I2c(E),
    /// Data block larger than one page of display RAM
    PayloadTooLarge {
        /// Provided length in bytes
        len: usize,
        /// Largest accepted length in bytes
        max: usize,
    },
}

impl<E: Debug> core::fmt::Display for InterfaceError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
            Self::PayloadTooLarge { len, max } => {
                write!(f, "Payload of {len} bytes exceeds {max} byte page")
            }
        }
    }
}

impl<E: Debug> core::error::Error for InterfaceError<E> {}

/// Default 7-bit I2C address of SH1106 modules
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Largest data block sent in one transfer (one full page of display RAM)
pub const MAX_PAYLOAD: usize = MAX_COLUMNS as usize;

/// I2C interface implementation for SH1106
///
/// Implements [`DisplayInterface`] for an embedded-hal v1.0 [`I2c`] bus.
///
/// ## Example
///
/// ```rust,no_run
/// use sh1106::{Builder, Display, I2cInterface};
/// # use core::convert::Infallible;
/// # use embedded_hal::i2c::{ErrorType, I2c, Operation};
/// # struct MockI2c;
/// # impl ErrorType for MockI2c { type Error = Infallible; }
/// # impl I2c for MockI2c {
/// #     fn transaction(
/// #         &mut self,
/// #         _address: u8,
/// #         _operations: &mut [Operation<'_>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// let interface = I2cInterface::with_address(MockI2c, 0x3D);
/// # let config = match Builder::new().build() {
/// #     Ok(config) => config,
/// #     Err(_) => return,
/// # };
/// let _display = Display::new(interface, config);
/// ```
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    /// I2C bus
    i2c: I2C,
    /// 7-bit device address
    address: u8,
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c,
{
    /// Create a new interface at [`DEFAULT_ADDRESS`]
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a new interface at a custom 7-bit address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Get the device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_tagged(
        &mut self,
        kind: TransferKind,
        bytes: &[u8],
    ) -> InterfaceResult<(), InterfaceError<I2C::Error>> {
        if bytes.len() > MAX_PAYLOAD {
            return Err(InterfaceError::PayloadTooLarge {
                len: bytes.len(),
                max: MAX_PAYLOAD,
            });
        }
        let mut frame = [0u8; MAX_PAYLOAD + 1];
        frame[0] = kind.control_byte();
        frame[1..=bytes.len()].copy_from_slice(bytes);
        self.i2c
            .write(self.address, &frame[..=bytes.len()])
            .map_err(InterfaceError::I2c)
    }
}

impl<I2C> DisplayInterface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = InterfaceError<I2C::Error>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.write_tagged(TransferKind::Command, &[command])
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.write_tagged(TransferKind::Data, data)
    }
}
