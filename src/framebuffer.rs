//! Row-major monochrome frame buffer
//!
//! [`FrameBuffer`] owns the bitmap and its [`Geometry`]. All stride math
//! lives here: pixel `(x, y)` is bit `x % 8` of byte
//! `y * line_length + x / 8`, leftmost pixel in the least significant bit.
//!
//! ## Example
//!
//! ```
//! use sh1106::{Color, FrameBuffer, Geometry, Region};
//!
//! let geometry = match Geometry::new(16, 8) {
//!     Ok(geometry) => geometry,
//!     Err(_) => return,
//! };
//! let mut frame = match FrameBuffer::new([0u8; 16], geometry) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//!
//! frame.fill_rect(Region::new(0, 0, 4, 2), Color::On);
//! assert_eq!(frame.pixel(3, 1), Some(Color::On));
//! assert_eq!(frame.as_bytes()[0], 0x0F);
//! ```

use crate::color::Color;
use crate::config::Geometry;
use crate::error::BufferError;
use crate::transcode;

/// Rectangular area of the frame buffer, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// X coordinate of the left edge
    pub x: u16,
    /// Y coordinate of the top edge
    pub y: u16,
    /// Width in pixels
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Region {
    /// Create a new region
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Intersect with a `width` x `height` area anchored at the origin
    fn clip(self, width: u16, height: u16) -> Option<Self> {
        if self.x >= width || self.y >= height || self.w == 0 || self.h == 0 {
            return None;
        }
        Some(Self {
            x: self.x,
            y: self.y,
            w: self.w.min(width - self.x),
            h: self.h.min(height - self.y),
        })
    }
}

/// Monochrome source image for [`FrameBuffer::blit`]
///
/// `data` uses the frame buffer's own packing: rows of `ceil(width / 8)`
/// bytes, leftmost pixel in bit 0. Set bits are drawn in `foreground`,
/// cleared bits in `background`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Image<'a> {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Packed pixel rows
    pub data: &'a [u8],
    /// Color of set bits
    pub foreground: Color,
    /// Color of cleared bits
    pub background: Color,
}

impl<'a> Image<'a> {
    /// Create an image drawing set bits lit and cleared bits dark
    pub fn new(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
            foreground: Color::On,
            background: Color::Off,
        }
    }

    /// Bytes per row of `data`
    pub fn line_length(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    fn bit(&self, x: u16, y: u16) -> Option<bool> {
        let byte = self
            .data
            .get(y as usize * self.line_length() + x as usize / 8)?;
        Some((byte >> (x % 8)) & 1 != 0)
    }
}

/// Frame buffer with geometry
///
/// Generic over the storage so it can live in a static array, a borrowed
/// slice or (with the `alloc` feature) a heap allocation.
#[derive(Debug)]
pub struct FrameBuffer<B> {
    /// Packed pixel storage
    buffer: B,
    /// Panel geometry
    geometry: Geometry,
}

impl<B> FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap `buffer` as a frame buffer for `geometry`
    ///
    /// Bytes past `geometry.buffer_size()` are never touched.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::TooSmall` if `buffer` is shorter than
    /// `geometry.buffer_size()`.
    pub fn new(buffer: B, geometry: Geometry) -> Result<Self, BufferError> {
        let required = geometry.buffer_size();
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(BufferError::TooSmall { required, provided });
        }
        Ok(Self { buffer, geometry })
    }

    /// Get the geometry
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The bitmap bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.geometry.buffer_size()]
    }

    /// The bitmap bytes, mutably
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let size = self.geometry.buffer_size();
        &mut self.buffer.as_mut()[..size]
    }

    /// Consume the frame buffer and return the storage
    pub fn release(self) -> B {
        self.buffer
    }

    fn locate(&self, x: u16, y: u16) -> Option<(usize, u8)> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        let index = y as usize * self.geometry.line_length() + x as usize / 8;
        Some((index, 1 << (x % 8)))
    }

    /// Read one pixel, `None` outside the panel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        let (index, mask) = self.locate(x, y)?;
        Some(Color::from(self.as_bytes()[index] & mask != 0))
    }

    /// Write one pixel, ignoring coordinates outside the panel
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        if let Some((index, mask)) = self.locate(x, y) {
            let byte = &mut self.as_bytes_mut()[index];
            match color {
                Color::On => *byte |= mask,
                Color::Off => *byte &= !mask,
            }
        }
    }

    /// Copy raw bytes into the bitmap at `offset`
    ///
    /// The write is clipped at the end of the buffer. Returns the number of
    /// bytes copied.
    ///
    /// # Errors
    ///
    /// - `BufferError::OffsetOutOfRange` if `offset` is past the end
    /// - `BufferError::EmptyWrite` if no byte would be copied
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<usize, BufferError> {
        let len = self.geometry.buffer_size();
        if offset > len {
            return Err(BufferError::OffsetOutOfRange { offset, len });
        }
        let count = bytes.len().min(len - offset);
        if count == 0 {
            return Err(BufferError::EmptyWrite);
        }
        self.as_bytes_mut()[offset..offset + count].copy_from_slice(&bytes[..count]);
        Ok(count)
    }

    /// Copy raw bytes out of the bitmap starting at `offset`
    ///
    /// Returns the number of bytes copied, 0 at or past the end.
    pub fn read(&self, offset: usize, out: &mut [u8]) -> usize {
        let bytes = self.as_bytes();
        if offset >= bytes.len() {
            return 0;
        }
        let count = out.len().min(bytes.len() - offset);
        out[..count].copy_from_slice(&bytes[offset..offset + count]);
        count
    }

    /// Set every pixel to `color`
    pub fn clear(&mut self, color: Color) {
        self.as_bytes_mut().fill(color.fill_byte());
    }

    /// Fill `region` with `color`, clipped to the panel
    pub fn fill_rect(&mut self, region: Region, color: Color) {
        let Some(region) = region.clip(self.geometry.width, self.geometry.height) else {
            return;
        };
        for y in region.y..region.y + region.h {
            for x in region.x..region.x + region.w {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Copy the pixels of `source` so its top-left corner lands on `(dx, dy)`
    ///
    /// Source and destination may overlap. Both are clipped to the panel.
    pub fn copy_area(&mut self, source: Region, dx: u16, dy: u16) {
        let Some(source) = source.clip(self.geometry.width, self.geometry.height) else {
            return;
        };
        let Some(dest) = Region::new(dx, dy, source.w, source.h)
            .clip(self.geometry.width, self.geometry.height)
        else {
            return;
        };

        // Walk backwards when the destination lies after the source so that
        // overlapping pixels are read before they are overwritten.
        let backwards = (dy, dx) > (source.y, source.x);
        for row in 0..dest.h {
            let row = if backwards { dest.h - 1 - row } else { row };
            for col in 0..dest.w {
                let col = if backwards { dest.w - 1 - col } else { col };
                if let Some(color) = self.pixel(source.x + col, source.y + row) {
                    self.set_pixel(dest.x + col, dest.y + row, color);
                }
            }
        }
    }

    /// Draw `image` with its top-left corner at `(x, y)`, clipped to the panel
    pub fn blit(&mut self, x: u16, y: u16, image: &Image<'_>) {
        let Some(dest) = Region::new(x, y, image.width, image.height)
            .clip(self.geometry.width, self.geometry.height)
        else {
            return;
        };
        for row in 0..dest.h {
            for col in 0..dest.w {
                let Some(bit) = image.bit(col, row) else {
                    return;
                };
                let color = if bit {
                    image.foreground
                } else {
                    image.background
                };
                self.set_pixel(dest.x + col, dest.y + row, color);
            }
        }
    }

    /// Transcode one page into controller format
    ///
    /// Returns the payload slice (`width` bytes of `out`), or `None` if
    /// `page` does not exist or `out` is shorter than the panel width.
    pub fn transcode_page<'o>(&self, page: u16, out: &'o mut [u8]) -> Option<&'o [u8]> {
        let width = self.geometry.width as usize;
        if page >= self.geometry.page_count() || out.len() < width {
            return None;
        }
        transcode::transcode_page(self.as_bytes(), self.geometry, page, out);
        Some(&out[..width])
    }
}

#[cfg(feature = "alloc")]
impl FrameBuffer<alloc::vec::Vec<u8>> {
    /// Allocate zero-filled video memory for `geometry`
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Allocation` if the allocation fails.
    pub fn zeroed(geometry: Geometry) -> Result<Self, BufferError> {
        let size = geometry.buffer_size();
        let mut buffer = alloc::vec::Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| BufferError::Allocation { requested: size })?;
        buffer.resize(size, 0);
        Ok(Self { buffer, geometry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn frame(width: u16, height: u16) -> FrameBuffer<Vec<u8>> {
        let geometry = Geometry::new(width, height).unwrap();
        FrameBuffer::new(vec![0u8; geometry.buffer_size()], geometry).unwrap()
    }

    /// Read pixel `(x, y)` back through the page transcoder
    fn transcoded_pixel(frame: &FrameBuffer<Vec<u8>>, x: u16, y: u16) -> bool {
        let mut out = [0u8; 132];
        let payload = frame.transcode_page(y / 8, &mut out).unwrap();
        payload[x as usize] & (1 << (y % 8)) != 0
    }

    #[test]
    fn test_new_rejects_small_buffer() {
        let geometry = Geometry::new(96, 16).unwrap();
        let result = FrameBuffer::new(vec![0u8; 191], geometry);
        assert_eq!(
            result.err(),
            Some(BufferError::TooSmall {
                required: 192,
                provided: 191
            })
        );
    }

    #[test]
    fn test_pixel_packing_is_lsb_first() {
        let mut frame = frame(16, 2);
        frame.set_pixel(0, 0, Color::On);
        frame.set_pixel(9, 1, Color::On);
        assert_eq!(frame.as_bytes(), &[0x01, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_ignored() {
        let mut frame = frame(8, 8);
        frame.set_pixel(8, 0, Color::On);
        frame.set_pixel(0, 8, Color::On);
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
        assert_eq!(frame.pixel(8, 0), None);
    }

    #[test]
    fn test_set_pixel_round_trips_through_transcoder() {
        let mut frame = frame(13, 11);
        let points = [(0, 0), (12, 10), (5, 7), (8, 8), (3, 9), (12, 0)];
        for &(x, y) in &points {
            frame.set_pixel(x, y, Color::On);
        }
        for y in 0..11 {
            for x in 0..13 {
                let expected = points.contains(&(x, y));
                assert_eq!(transcoded_pixel(&frame, x, y), expected, "({x}, {y})");
            }
        }

        frame.set_pixel(5, 7, Color::Off);
        assert!(!transcoded_pixel(&frame, 5, 7));
    }

    #[test]
    fn test_write_copies_and_clips() {
        let mut frame = frame(16, 2);
        assert_eq!(frame.write(1, &[0xAA, 0xBB]), Ok(2));
        assert_eq!(frame.as_bytes(), &[0x00, 0xAA, 0xBB, 0x00]);

        assert_eq!(frame.write(3, &[0x11, 0x22, 0x33]), Ok(1));
        assert_eq!(frame.as_bytes()[3], 0x11);
    }

    #[test]
    fn test_write_offset_past_end_is_rejected() {
        let mut frame = frame(16, 2);
        assert_eq!(
            frame.write(5, &[0xFF]),
            Err(BufferError::OffsetOutOfRange { offset: 5, len: 4 })
        );
    }

    #[test]
    fn test_write_at_end_is_empty() {
        let mut frame = frame(16, 2);
        assert_eq!(frame.write(4, &[0xFF]), Err(BufferError::EmptyWrite));
        assert_eq!(frame.write(0, &[]), Err(BufferError::EmptyWrite));
    }

    #[test]
    fn test_read_clips_at_end() {
        let mut frame = frame(16, 2);
        frame.write(0, &[1, 2, 3, 4]).unwrap();
        let mut out = [0u8; 3];
        assert_eq!(frame.read(2, &mut out), 2);
        assert_eq!(&out[..2], &[3, 4]);
        assert_eq!(frame.read(4, &mut out), 0);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut frame = frame(8, 8);
        frame.fill_rect(Region::new(6, 6, 10, 10), Color::On);
        for y in 0..8 {
            for x in 0..8 {
                let expected = x >= 6 && y >= 6;
                assert_eq!(frame.pixel(x, y), Some(Color::from(expected)));
            }
        }
    }

    #[test]
    fn test_clear_fills_every_byte() {
        let mut frame = frame(10, 3);
        frame.clear(Color::On);
        assert!(frame.as_bytes().iter().all(|b| *b == 0xFF));
        frame.clear(Color::Off);
        assert!(frame.as_bytes().iter().all(|b| *b == 0x00));
    }

    #[test]
    fn test_copy_area_overlapping_right_shift() {
        let mut frame = frame(8, 1);
        frame.set_pixel(0, 0, Color::On);
        frame.set_pixel(2, 0, Color::On);
        // Shift columns 0..4 right by one
        frame.copy_area(Region::new(0, 0, 4, 1), 1, 0);
        assert_eq!(frame.as_bytes(), &[0b0000_1011]);
    }

    #[test]
    fn test_copy_area_overlapping_left_shift() {
        let mut frame = frame(8, 1);
        frame.set_pixel(1, 0, Color::On);
        frame.set_pixel(3, 0, Color::On);
        frame.copy_area(Region::new(1, 0, 4, 1), 0, 0);
        assert_eq!(frame.as_bytes(), &[0b0000_0101]);
    }

    #[test]
    fn test_copy_area_between_pages() {
        let mut frame = frame(8, 16);
        frame.fill_rect(Region::new(0, 0, 2, 2), Color::On);
        frame.copy_area(Region::new(0, 0, 2, 2), 4, 12);
        assert!(transcoded_pixel(&frame, 5, 13));
        assert!(transcoded_pixel(&frame, 1, 1));
        assert!(!transcoded_pixel(&frame, 3, 12));
    }

    #[test]
    fn test_blit_uses_foreground_and_background() {
        let mut frame = frame(8, 2);
        frame.clear(Color::On);
        // 3x2 image: row 0 = 101, row 1 = 010
        let data = [0b101, 0b010];
        let image = Image {
            foreground: Color::On,
            background: Color::Off,
            ..Image::new(3, 2, &data)
        };
        frame.blit(2, 0, &image);
        assert_eq!(frame.as_bytes(), &[0b1111_0111, 0b1110_1011]);
    }

    #[test]
    fn test_blit_is_clipped_at_right_edge() {
        let mut frame = frame(8, 1);
        let data = [0xFF, 0xFF];
        frame.blit(6, 0, &Image::new(16, 1, &data));
        assert_eq!(frame.as_bytes(), &[0b1100_0000]);
    }

    #[test]
    fn test_transcode_page_rejects_bad_arguments() {
        let frame = frame(8, 10);
        let mut out = [0u8; 8];
        assert!(frame.transcode_page(2, &mut out).is_none());
        let mut short = [0u8; 7];
        assert!(frame.transcode_page(0, &mut short).is_none());
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_zeroed_allocates_exact_size() {
        let geometry = Geometry::new(96, 16).unwrap();
        let frame = FrameBuffer::zeroed(geometry).unwrap();
        assert_eq!(frame.as_bytes().len(), 192);
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
    }
}
