use std::collections::HashMap;

use tracing::trace;

use crate::canvas::Canvas;
use crate::canvas::Rect;
use crate::cell::ShapeHandle;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// A terminal canvas. Every character on screen is a 2x4 block of pixels.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the framebuffer
    w: usize,

    /// Height of the framebuffer
    h: usize,

    /// Shapes currently drawn, so they can be erased or redrawn
    shapes: HashMap<ShapeHandle, Rect>,

    next_handle: u64,
}

impl Camera {
    pub fn new(w: usize, h: usize) -> Self {
        let mut cam = Self {
            cb: Vec::new(),
            fb: String::new(),
            cp: Vec::new(),
            w: 0,
            h: 0,
            shapes: HashMap::new(),
            next_handle: 0,
        };

        cam.resize(w, h);

        cam
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Number of shapes currently drawn
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<Rect> {
        self.shapes.get(&handle).copied()
    }

    /// Whether pixel `(x, y)` is on. Pixels off screen are off.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h && self.cb[self.xy_from(x, y)]
    }

    /// Resize the pixel buffer, then redraw every shape still alive.
    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.cb = vec![false; w * h];

        // For each braille character, we need 3 bytes:
        //  - The leader byte:     0b11100010
        //  - Continuation byte 1: 0b101000xx
        //  - Continuation byte 2: 0b10xxxxxx
        // For each newline, we need one byte: 0b00001010
        //
        // Let `w` and `h` refer to width and height of the cell buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our framebuffer
        // (that is, not accounting for the trailing newlines expected at the end of each line).
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));
        self.cp = vec![BRAILLE_EMPTY; bw * bh];
        self.fb = String::with_capacity(3 * (bw * bh) + bh);

        let shapes: Vec<Rect> = self.shapes.values().copied().collect();
        for rect in shapes {
            self.fill(rect, true);
        }

        trace!(w, h, shapes = self.shapes.len(), "resized camera");
    }

    /// Fundamentally, we have a framebuffer of every pixel on our screen, and we ask ourselves "Is
    /// this pixel on or off?"
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = self.xy_to(n);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            // every codepoint lies in the braille block
            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    /// Turn the pixels of `rect` on or off, clipped to the screen
    fn fill(&mut self, rect: Rect, on: bool) {
        for y in rect.y0..rect.y1.min(self.h) {
            for x in rect.x0..rect.x1.min(self.w) {
                let i = self.xy_from(x, y);
                self.cb[i] = on;
            }
        }
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

impl Canvas for Camera {
    fn create_rect(&mut self, rect: Rect) -> ShapeHandle {
        let handle = ShapeHandle(self.next_handle);
        self.next_handle += 1;

        self.fill(rect, true);
        self.shapes.insert(handle, rect);

        handle
    }

    fn delete(&mut self, handle: ShapeHandle) {
        if let Some(rect) = self.shapes.remove(&handle) {
            self.fill(rect, false);
        }
    }
}

#[cfg(test)]
mod test {
    use super::Camera;
    use crate::canvas::Canvas;
    use crate::canvas::Rect;

    const SQUARE: Rect = Rect {
        x0: 0,
        y0: 0,
        x1: 2,
        y1: 2,
    };

    #[test]
    fn empty_frame() {
        let mut cam = Camera::new(4, 4);

        assert_eq!(cam.render(), "\u{2800}\u{2800}\n");
    }

    #[test]
    fn draw_and_delete() {
        let mut cam = Camera::new(4, 4);

        let handle = cam.create_rect(SQUARE);
        assert_eq!(cam.render(), "\u{281B}\u{2800}\n");
        assert_eq!(cam.shape(handle), Some(SQUARE));

        cam.delete(handle);
        assert_eq!(cam.render(), "\u{2800}\u{2800}\n");
        assert_eq!(cam.shape_count(), 0);

        // deleting twice is harmless
        cam.delete(handle);
    }

    #[test]
    fn handles_are_unique() {
        let mut cam = Camera::new(4, 4);

        let a = cam.create_rect(SQUARE);
        let b = cam.create_rect(SQUARE);

        assert_ne!(a, b);
        assert_eq!(cam.shape_count(), 2);
    }

    #[test]
    fn clips_off_screen() {
        let mut cam = Camera::new(2, 4);

        cam.create_rect(Rect {
            x0: 1,
            y0: 3,
            x1: 10,
            y1: 10,
        });

        assert!(cam.pixel(1, 3));
        assert!(!cam.pixel(5, 5));
        assert_eq!(cam.render(), "\u{2880}\n");
    }

    #[test]
    fn resize_redraws_shapes() {
        let mut cam = Camera::new(1, 1);
        cam.create_rect(SQUARE);

        cam.resize(4, 8);

        assert_eq!((cam.width(), cam.height()), (4, 8));
        assert_eq!(cam.render(), "\u{281B}\u{2800}\n\u{2800}\u{2800}\n");
    }
}
