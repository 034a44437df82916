//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! frame buffer handling ([`BufferError`]) and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Invalid or missing configuration at attach time
//! - [`BufferError`] - Frame buffer allocation and access errors
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level bus errors
//!
//! None of these are retried by the driver. A failed transfer aborts the
//! operation in progress, which is safe to repeat from the top.
//!
//! ## Example
//!
//! ```
//! use sh1106::{BuilderError, Geometry};
//!
//! // Wider than the controller's 132 column RAM
//! let result = Geometry::new(140, 64);
//! assert!(matches!(result, Err(BuilderError::InvalidGeometry { .. })));
//! ```

use crate::config::{MAX_COLUMNS, MAX_ROWS};
use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Bus transfer failed
    ///
    /// Wraps the underlying error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Frame buffer error
    Buffer(BufferError),
    /// Invalid configuration
    Config(BuilderError),
    /// Frame buffer geometry differs from the configured panel geometry
    GeometryMismatch {
        /// Configured width and height
        expected: (u16, u16),
        /// Frame buffer width and height
        provided: (u16, u16),
    },
    /// The controller has not been initialized yet
    NotInitialized,
    /// The initialization program already ran for this display
    AlreadyInitialized,
    /// Brightness value outside `0..=MAX_BRIGHTNESS`
    InvalidBrightness {
        /// Requested brightness
        value: u32,
        /// Largest accepted brightness
        max: u32,
    },
    /// The supply rail could not be enabled
    Supply,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::Buffer(e) => write!(f, "Frame buffer error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::GeometryMismatch { expected, provided } => write!(
                f,
                "Geometry mismatch: panel is {}x{}, frame buffer is {}x{}",
                expected.0, expected.1, provided.0, provided.1
            ),
            Self::NotInitialized => write!(f, "Display not initialized"),
            Self::AlreadyInitialized => write!(f, "Display already initialized"),
            Self::InvalidBrightness { value, max } => {
                write!(f, "Invalid brightness {value} (max {max})")
            }
            Self::Supply => write!(f, "Failed to enable supply rail"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<BufferError> for Error<I> {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}

impl<I: DisplayInterface> From<BuilderError> for Error<I> {
    fn from(e: BuilderError) -> Self {
        Self::Config(e)
    }
}

/// Errors that can occur when building configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// Invalid geometry
    ///
    /// Width must be in `1..=MAX_COLUMNS`, height in `1..=MAX_ROWS`.
    InvalidGeometry {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
    /// Clock divide ratio outside `1..=16`
    InvalidClockDivider(u8),
    /// Oscillator frequency setting outside `0..=15`
    InvalidClockFrequency(u8),
    /// Multiplex ratio above `0x3F` (64 rows)
    InvalidMultiplexRatio(u8),
    /// Pre-charge periods outside `1..=15`
    InvalidPrecharge {
        /// Phase 1 period
        phase1: u8,
        /// Phase 2 period
        phase2: u8,
    },
    /// Page offset pushes the last page past page 7
    InvalidPageOffset(u8),
    /// Column offset pushes the last column past column 131
    InvalidColumnOffset(u8),
    /// Refresh rate of zero
    InvalidRefreshRate,
    /// No controller profile matches the compatible string
    UnknownCompatible,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidGeometry { width, height } => write!(
                f,
                "Invalid geometry {width}x{height} (max {MAX_COLUMNS}x{MAX_ROWS})"
            ),
            Self::InvalidClockDivider(div) => write!(f, "Invalid clock divider {div}"),
            Self::InvalidClockFrequency(frq) => write!(f, "Invalid clock frequency {frq}"),
            Self::InvalidMultiplexRatio(ratio) => write!(f, "Invalid multiplex ratio {ratio:#04x}"),
            Self::InvalidPrecharge { phase1, phase2 } => {
                write!(f, "Invalid pre-charge periods {phase1}/{phase2}")
            }
            Self::InvalidPageOffset(offset) => write!(f, "Invalid page offset {offset}"),
            Self::InvalidColumnOffset(offset) => write!(f, "Invalid column offset {offset}"),
            Self::InvalidRefreshRate => write!(f, "Refresh rate must be non-zero"),
            Self::UnknownCompatible => write!(f, "Unknown compatible string"),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors raised by frame buffer allocation and access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Buffer is too small for the geometry
    TooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Zero-filled video memory could not be allocated
    Allocation {
        /// Requested size in bytes
        requested: usize,
    },
    /// Write offset past the end of the buffer
    OffsetOutOfRange {
        /// Requested offset
        offset: usize,
        /// Buffer length
        len: usize,
    },
    /// Write that would transfer no bytes
    EmptyWrite,
}

impl core::fmt::Display for BufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
            Self::Allocation { requested } => {
                write!(f, "Couldn't allocate {requested} bytes of video memory")
            }
            Self::OffsetOutOfRange { offset, len } => {
                write!(f, "Offset {offset} out of range for {len} byte buffer")
            }
            Self::EmptyWrite => write!(f, "Empty write"),
        }
    }
}

impl core::error::Error for BufferError {}
