use crate::mapping::Mapping;

/// Opaque handle a renderer attaches to a [`Cell`] for the shape it drew there.
///
/// The engine never reads or writes it. Cells are mutated in place, so a handle stays attached to
/// the same grid position until the [`Mapping`] is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub u64);

/// A single grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Current state
    lived: bool,

    /// Staged state for the next generation. Only meaningful between the evaluate and commit
    /// phases of [`Mapping::generate_next`].
    next: bool,

    x: usize,
    y: usize,

    shape: Option<ShapeHandle>,
}

impl Cell {
    pub const fn new(lived: bool, x: usize, y: usize) -> Self {
        Self {
            lived,
            next: false,
            x,
            y,
            shape: None,
        }
    }

    pub fn lived(&self) -> bool {
        self.lived
    }

    pub fn next(&self) -> bool {
        self.next
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn shape(&self) -> Option<ShapeHandle> {
        self.shape
    }

    pub fn set_shape(&mut self, shape: ShapeHandle) {
        self.shape = Some(shape);
    }

    /// Detach the shape handle, if any
    pub fn take_shape(&mut self) -> Option<ShapeHandle> {
        self.shape.take()
    }

    /// Compute what this cell becomes in the next generation, reading only the current state of
    /// `map`. Neighbors outside the grid don't exist; they are neither alive nor dead.
    pub fn look_up(&self, map: &Mapping) -> bool {
        let n = map.live_neighbors(self.x, self.y);

        map.rule().next_state(self.lived, n)
    }

    pub(crate) fn revive(&mut self) {
        self.lived = true;
    }

    pub(crate) fn stage(&mut self, next: bool) {
        self.next = next;
    }

    pub(crate) fn commit(&mut self) {
        self.lived = self.next;
    }
}
