//! SH1106 OLED Frame Buffer Driver
//!
//! A driver for the SH1106 monochrome OLED controller on I2C, exposing the
//! panel as a row-major frame buffer that is pushed to the controller one
//! page at a time.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Panels up to 132x64 pixels, any width
//! - Refresh on write, or deferred and coalesced refresh
//! - Contrast, brightness and blanking control
//! - Optional reset line and supply rail
//! - Heap-allocated frame buffers (with `alloc` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! use sh1106::{Builder, Color, Display, FrameBuffer, Geometry, I2cInterface, Power, Sh1106};
//!
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let i2c = MockI2c;
//! # let mut delay = MockDelay;
//! let geometry = match Geometry::new(128, 64) {
//!     Ok(geometry) => geometry,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().geometry(geometry).contrast(0xCF).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let frame = match FrameBuffer::new([0u8; 1024], geometry) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//!
//! let display = Display::new(I2cInterface::new(i2c), config);
//! let mut device = match Sh1106::attach(display, frame, Power::new(), &mut delay) {
//!     Ok(device) => device,
//!     Err(_) => return,
//! };
//! let _ = device.set_pixel(10, 10, Color::On);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Pixel color for monochrome panels
pub mod color;
/// SH1106 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Attach and detach lifecycle
pub mod device;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Row-major monochrome frame buffer
pub mod framebuffer;
/// Frame buffer device with refresh-on-write
pub mod graphics;
/// Hardware interface abstraction
pub mod interface;
/// Reset line and supply rail control
pub mod power;
/// Deferred refresh scheduling
pub mod scheduler;
/// Row-major bitmap to page format conversion
pub mod transcode;

#[cfg(test)]
mod mock;

pub use color::Color;
pub use config::{
    Builder, Config, ControllerProfile, Geometry, MAX_COLUMNS, MAX_ROWS, PAGE_HEIGHT,
    ProfileDefaults,
};
pub use device::{AttachError, Sh1106};
pub use display::{Display, MAX_BRIGHTNESS};
pub use error::{BufferError, BuilderError, Error};
pub use framebuffer::{FrameBuffer, Image, Region};
pub use graphics::GraphicDisplay;
pub use interface::InterfaceError;
pub use interface::{DEFAULT_ADDRESS, DisplayInterface, I2cInterface};
pub use power::{NoPin, Power};
pub use scheduler::RefreshScheduler;
pub use transcode::transcode_page;
