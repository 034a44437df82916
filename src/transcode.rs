//! Row-major bitmap to SH1106 page format
//!
//! The frame buffer stores one bit per pixel, row after row, with the
//! leftmost pixel of each byte in bit 0. The controller instead receives one
//! byte per column for a band of 8 stacked rows (a page), with the top row
//! in bit 0:
//!
//! ```text
//!  bitmap (5 px wide)        page payload (5 bytes)
//!  A0 A1 A2 A3 A4            byte 0: A0 B0 C0 D0 E0 F0 G0 H0
//!  B0 B1 B2 B3 B4            byte 1: A1 B1 C1 D1 E1 F1 G1 H1
//!  ...                       ...
//!  H0 H1 H2 H3 H4            byte 4: A4 B4 C4 D4 E4 F4 G4 H4
//! ```
//!
//! A partial last page only fills the low `height % 8` bits of each byte.

use crate::config::{Geometry, PAGE_HEIGHT};

/// Transcode one page of `bitmap` into `out`
///
/// Writes exactly `geometry.width` bytes. `bitmap` must hold at least
/// `geometry.buffer_size()` bytes, `out` at least `geometry.width` bytes and
/// `page` must be below `geometry.page_count()`;
/// [`FrameBuffer::transcode_page`](crate::FrameBuffer::transcode_page) is the
/// checked entry point.
pub fn transcode_page(bitmap: &[u8], geometry: Geometry, page: u16, out: &mut [u8]) {
    debug_assert!(page < geometry.page_count());
    debug_assert!(bitmap.len() >= geometry.buffer_size());

    let line_length = geometry.line_length();
    let rows = geometry.rows_in_page(page) as usize;
    let first_row = (page * PAGE_HEIGHT) as usize;

    for (col, byte) in out[..geometry.width as usize].iter_mut().enumerate() {
        let shift = col % 8;
        let mut column = 0u8;
        for k in 0..rows {
            let src = bitmap[(first_row + k) * line_length + col / 8];
            column |= ((src >> shift) & 1) << k;
        }
        *byte = column;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn geometry(width: u16, height: u16) -> Geometry {
        Geometry::new(width, height).unwrap()
    }

    #[test]
    fn test_all_zero_bitmap_yields_zero_payloads() {
        let geometry = geometry(96, 16);
        let bitmap = vec![0u8; geometry.buffer_size()];
        let mut out = vec![0xEEu8; 96];
        for page in 0..geometry.page_count() {
            transcode_page(&bitmap, geometry, page, &mut out);
            assert!(out.iter().all(|b| *b == 0));
        }
    }

    #[test]
    fn test_all_one_bitmap_full_pages() {
        let geometry = geometry(96, 16);
        let bitmap = vec![0xFFu8; geometry.buffer_size()];
        let mut out = vec![0u8; 96];
        for page in 0..geometry.page_count() {
            transcode_page(&bitmap, geometry, page, &mut out);
            assert!(out.iter().all(|b| *b == 0xFF));
        }
    }

    #[test]
    fn test_all_one_bitmap_partial_last_page() {
        let geometry = geometry(8, 10);
        let bitmap = vec![0xFFu8; geometry.buffer_size()];
        let mut out = [0u8; 8];

        transcode_page(&bitmap, geometry, 0, &mut out);
        assert_eq!(out, [0xFF; 8]);

        transcode_page(&bitmap, geometry, 1, &mut out);
        assert_eq!(out, [0x03; 8]);
    }

    #[test]
    fn test_partial_page_mask_for_every_remainder() {
        for height in 1..=63u16 {
            let remainder = height % 8;
            if remainder == 0 {
                continue;
            }
            let geometry = geometry(16, height);
            let bitmap = vec![0xFFu8; geometry.buffer_size()];
            let mut out = [0u8; 16];
            transcode_page(&bitmap, geometry, geometry.page_count() - 1, &mut out);
            let mask = (1u8 << remainder) - 1;
            assert!(out.iter().all(|b| *b == mask), "height {height}");
        }
    }

    #[test]
    fn test_columns_are_lsb_first_within_row_bytes() {
        // Row 0: only column 0 lit (bit 0). Row 1: only column 7 lit (bit 7).
        // Row 2: only column 8 lit (bit 0 of the second byte).
        let geometry = geometry(16, 8);
        let mut bitmap = vec![0u8; geometry.buffer_size()];
        bitmap[0] = 0x01;
        bitmap[2] = 0x80;
        bitmap[4 + 1] = 0x01;

        let mut out = [0u8; 16];
        transcode_page(&bitmap, geometry, 0, &mut out);

        assert_eq!(out[0], 0b0000_0001);
        assert_eq!(out[7], 0b0000_0010);
        assert_eq!(out[8], 0b0000_0100);
        assert_eq!(out.iter().filter(|b| **b != 0).count(), 3);
    }

    #[test]
    fn test_second_page_reads_rows_8_to_15() {
        let geometry = geometry(8, 16);
        let mut bitmap = vec![0u8; geometry.buffer_size()];
        // Column 3 lit on row 9 and row 15
        bitmap[9] = 1 << 3;
        bitmap[15] = 1 << 3;

        let mut out = [0u8; 8];
        transcode_page(&bitmap, geometry, 0, &mut out);
        assert_eq!(out, [0; 8]);

        transcode_page(&bitmap, geometry, 1, &mut out);
        assert_eq!(out[3], 0b1000_0010);
    }

    #[test]
    fn test_unaligned_width_writes_exactly_width_bytes() {
        let geometry = geometry(10, 8);
        let bitmap = vec![0xFFu8; geometry.buffer_size()];
        let mut out = [0xEEu8; 12];
        transcode_page(&bitmap, geometry, 0, &mut out);
        assert_eq!(&out[..10], &[0xFF; 10]);
        assert_eq!(&out[10..], &[0xEE, 0xEE]);
    }
}
