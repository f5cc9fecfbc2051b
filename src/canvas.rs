use crate::cell::ShapeHandle;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

/// A retained drawing surface: shapes stay drawn until deleted through their handle.
pub trait Canvas {
    fn create_rect(&mut self, rect: Rect) -> ShapeHandle;

    /// Remove a shape. Unknown handles are ignored.
    fn delete(&mut self, handle: ShapeHandle);
}
