//! Frame buffer device with refresh-on-write
//!
//! [`GraphicDisplay`] pairs a [`Display`] with the [`FrameBuffer`] it shows.
//! Every mutation goes through it and is followed by a refresh, except
//! [`modify`](GraphicDisplay::modify), which schedules a deferred refresh that
//! [`tick`](GraphicDisplay::tick) runs once due.
//!
//! With the `graphics` feature it also implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//! };
//! use sh1106::{Color, GraphicDisplay};
//! # use core::convert::Infallible;
//! # use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! # use sh1106::{Builder, Display, FrameBuffer, Geometry, I2cInterface};
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
//! # let geometry = match Geometry::new(128, 64) {
//! #     Ok(geometry) => geometry,
//! #     Err(_) => return,
//! # };
//! # let config = match Builder::new().geometry(geometry).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! # let mut driver = Display::new(I2cInterface::new(MockI2c), config);
//! # let _ = driver.init();
//! # let frame = match FrameBuffer::new([0u8; 1024], geometry) {
//! #     Ok(frame) => frame,
//! #     Err(_) => return,
//! # };
//! let mut display = GraphicDisplay::new(driver, frame);
//!
//! // Each draw call refreshes the panel
//! let _ = Rectangle::new(Point::new(4, 4), Size::new(40, 20))
//!     .into_styled(PrimitiveStyle::with_fill(Color::On))
//!     .draw(&mut display);
//!
//! // Batch several changes into one deferred refresh
//! let now_ms = 0;
//! display.modify(now_ms, |frame| frame.set_pixel(100, 10, Color::On));
//! let _ = Circle::new(Point::new(80, 20), 30)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::On, 1))
//!     .draw(&mut display);
//! let _ = display.tick(now_ms + 1000);
//! ```

#[cfg(feature = "graphics")]
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    prelude::Pixel,
    primitives::Rectangle,
};

use crate::color::Color;
use crate::display::Display;
use crate::error::Error;
use crate::framebuffer::{FrameBuffer, Image, Region};
use crate::interface::DisplayInterface;
use crate::scheduler::RefreshScheduler;

type GraphicsResult<I> = core::result::Result<(), Error<I>>;
type GraphicsNewResult<I, T> = core::result::Result<T, Error<I>>;

/// Display with its frame buffer
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B` - Frame buffer storage
pub struct GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// The underlying display driver
    display: Display<I>,
    /// Pixels shown on the panel
    frame: FrameBuffer<B>,
    /// Deferred refresh timer
    scheduler: RefreshScheduler,
}

impl<I, B> GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a new GraphicDisplay
    ///
    /// # Panics
    ///
    /// Panics if `frame` was built for a different geometry than the
    /// display's configuration.
    pub fn new(display: Display<I>, frame: FrameBuffer<B>) -> Self {
        let expected = display.geometry();
        let provided = frame.geometry();
        assert!(
            expected == provided,
            "frame geometry {}x{} does not match panel {}x{}",
            provided.width,
            provided.height,
            expected.width,
            expected.height
        );
        Self::assemble(display, frame)
    }

    /// Try to create a new GraphicDisplay
    ///
    /// This is the fallible version of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns `Error::GeometryMismatch` if `frame` was built for a
    /// different geometry than the display's configuration.
    pub fn try_new(display: Display<I>, frame: FrameBuffer<B>) -> GraphicsNewResult<I, Self> {
        display.check_geometry(frame.geometry())?;
        Ok(Self::assemble(display, frame))
    }

    fn assemble(display: Display<I>, frame: FrameBuffer<B>) -> Self {
        let scheduler = RefreshScheduler::from_config(display.config());
        Self {
            display,
            frame,
            scheduler,
        }
    }

    /// Push the frame buffer to the panel now
    ///
    /// A successful refresh also satisfies any pending deferred refresh.
    pub fn refresh(&mut self) -> GraphicsResult<I> {
        self.display.refresh(&self.frame)?;
        self.scheduler.cancel();
        Ok(())
    }

    /// Run the deferred refresh if it is due at `now_ms`
    ///
    /// Returns whether a refresh was sent.
    ///
    /// # Errors
    ///
    /// Returns the refresh error. The refresh stays pending and is retried
    /// one interval after `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> GraphicsNewResult<I, bool> {
        if !self.scheduler.poll(now_ms) {
            return Ok(false);
        }
        if let Err(e) = self.display.refresh(&self.frame) {
            self.scheduler.notify(now_ms);
            log::warn!("deferred refresh failed, retrying: {e}");
            return Err(e);
        }
        Ok(true)
    }

    /// Mutate the frame buffer directly and schedule a deferred refresh
    ///
    /// Mutations made while a refresh is pending share that refresh.
    pub fn modify<R, F>(&mut self, now_ms: u64, f: F) -> R
    where
        F: FnOnce(&mut FrameBuffer<B>) -> R,
    {
        let result = f(&mut self.frame);
        if self.scheduler.notify(now_ms) {
            log::debug!("deferred refresh due at {:?} ms", self.scheduler.deadline());
        }
        result
    }

    /// Copy raw bytes into the frame buffer at `offset`, then refresh
    ///
    /// Returns the number of bytes written, clipped at the end of the buffer.
    ///
    /// # Errors
    ///
    /// Returns `Error::Buffer` for an offset past the end or an empty write
    /// (nothing is refreshed), or the refresh error.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> GraphicsNewResult<I, usize> {
        let written = self.frame.write(offset, bytes)?;
        self.refresh()?;
        Ok(written)
    }

    /// Copy raw bytes out of the frame buffer
    pub fn read(&self, offset: usize, out: &mut [u8]) -> usize {
        self.frame.read(offset, out)
    }

    /// Read one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        self.frame.pixel(x, y)
    }

    /// Set one pixel, then refresh
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> GraphicsResult<I> {
        self.frame.set_pixel(x, y, color);
        self.refresh()
    }

    /// Set every pixel to `color`, then refresh
    pub fn clear(&mut self, color: Color) -> GraphicsResult<I> {
        self.frame.clear(color);
        self.refresh()
    }

    /// Fill a rectangle, then refresh
    pub fn fill_rect(&mut self, region: Region, color: Color) -> GraphicsResult<I> {
        self.frame.fill_rect(region, color);
        self.refresh()
    }

    /// Copy a rectangle to `(dx, dy)`, then refresh
    pub fn copy_area(&mut self, source: Region, dx: u16, dy: u16) -> GraphicsResult<I> {
        self.frame.copy_area(source, dx, dy);
        self.refresh()
    }

    /// Draw a monochrome image at `(x, y)`, then refresh
    pub fn blit(&mut self, x: u16, y: u16, image: &Image<'_>) -> GraphicsResult<I> {
        self.frame.blit(x, y, image);
        self.refresh()
    }

    /// Get a reference to the underlying display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Get a mutable reference to the underlying display
    ///
    /// Use this for contrast and blanking.
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Get a reference to the frame buffer
    pub fn frame(&self) -> &FrameBuffer<B> {
        &self.frame
    }

    /// Get the deferred refresh timer
    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Drop any pending deferred refresh
    pub fn cancel_pending(&mut self) {
        self.scheduler.cancel();
    }

    /// Consume and return the display and frame buffer
    pub fn release(self) -> (Display<I>, FrameBuffer<B>) {
        (self.display, self.frame)
    }
}

#[cfg(feature = "graphics")]
impl<I, B> DrawTarget for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Error<I>;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            self.frame.set_pixel(x, y, color);
        }
        self.refresh()
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }
        // Clipped to the panel, so both fit in u16
        let region = Region::new(
            area.top_left.x as u16,
            area.top_left.y as u16,
            area.size.width as u16,
            area.size.height as u16,
        );
        self.fill_rect(region, color)
    }
}

#[cfg(feature = "graphics")]
impl<I, B> OriginDimensions for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let geometry = self.frame.geometry();
        Size::new(u32::from(geometry.width), u32::from(geometry.height))
    }
}
