//! Block pixelation.

use crate::frame::Framebuffer;

/// Replace every `block x block` cell with its average color.
///
/// Cells are anchored at the top-left corner; cells on the right and bottom
/// edges may be partial and average only the pixels they cover. Alpha is
/// preserved per pixel. `block <= 1` leaves the frame unchanged.
///
/// # Example
///
/// ```
/// use retro_dither::{pixelate, Framebuffer};
///
/// let mut frame = Framebuffer::new(2, 1).unwrap();
/// frame.set_pixel(0, 0, [0, 0, 0, 255]);
/// frame.set_pixel(1, 0, [200, 100, 50, 128]);
///
/// pixelate(&mut frame, 2);
/// assert_eq!(frame.pixel(0, 0), [100, 50, 25, 255]);
/// assert_eq!(frame.pixel(1, 0), [100, 50, 25, 128]);
/// ```
pub fn pixelate(frame: &mut Framebuffer, block: usize) {
    if block <= 1 {
        return;
    }

    let width = frame.width();
    let height = frame.height();
    let data = frame.as_bytes_mut();

    for by in (0..height).step_by(block) {
        let y1 = (by + block).min(height);
        for bx in (0..width).step_by(block) {
            let x1 = (bx + block).min(width);

            let mut sum = [0u32; 3];
            for y in by..y1 {
                for x in bx..x1 {
                    let i = (y * width + x) * 4;
                    for c in 0..3 {
                        sum[c] += data[i + c] as u32;
                    }
                }
            }

            let count = ((x1 - bx) * (y1 - by)) as u32;
            let avg = [
                ((sum[0] + count / 2) / count) as u8,
                ((sum[1] + count / 2) / count) as u8,
                ((sum[2] + count / 2) / count) as u8,
            ];

            for y in by..y1 {
                for x in bx..x1 {
                    let i = (y * width + x) * 4;
                    data[i..i + 3].copy_from_slice(&avg);
                }
            }
        }
    }
}
