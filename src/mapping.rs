use std::fmt;

use tracing::debug;
use tracing::trace;

use crate::cell::Cell;
use crate::rule_set::RuleSet;

/// The bounded Life grid.
///
/// Cells are stored row-major in a single buffer: the cell at `(x, y)` lives at index
/// `y * width + x`, with `x` in `[0, width)` the column and `y` in `[0, height)` the row. Edges
/// are hard boundaries, there is no wraparound.
#[derive(Debug, Clone)]
pub struct Mapping {
    width: usize,
    height: usize,

    /// Extra logging. Never changes the outcome of a generation.
    pub debug: bool,

    rule: RuleSet,

    /// Number of generations since the grid was last built
    generation: u64,

    /// Live cells waiting for the next build of the grid. Applied once, then dropped.
    seed: Option<Vec<(usize, usize)>>,

    cells: Vec<Cell>,
}

impl Mapping {
    /// Create an all-dead `width` x `height` grid
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_seed(width, height, Vec::new())
    }

    /// Create a `width` x `height` grid where the coordinates in `seed` are alive
    pub fn with_seed(width: usize, height: usize, seed: Vec<(usize, usize)>) -> Self {
        let mut map = Self {
            width: 0,
            height: 0,
            debug: false,
            rule: RuleSet::default(),
            generation: 0,
            seed: Some(seed),
            cells: Vec::new(),
        };

        map.init_game_map(width, height);

        map
    }

    /// Replace the life rules. Takes effect on the next generation.
    pub fn with_rule(mut self, rule: RuleSet) -> Self {
        self.rule = rule;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rule(&self) -> RuleSet {
        self.rule
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rebuild the grid with new dimensions. Every previous cell is discarded and the new ones
    /// start dead. A seed still pending from construction is applied afterwards.
    pub fn init_game_map(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.generation = 0;

        self.cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(false, x, y)))
            .collect();

        debug!(width, height, "built game map");

        if let Some(seed) = self.seed.take() {
            self.init_cells(&seed);
        }
    }

    /// Bring every cell in `coords` to life. Coordinates outside the grid are skipped and cells
    /// not named are left alone.
    pub fn init_cells(&mut self, coords: &[(usize, usize)]) {
        for &(x, y) in coords {
            match self.index(x, y) {
                Some(i) => self.cells[i].revive(),
                None => trace!(x, y, "ignoring seed outside the grid"),
            }
        }
    }

    /// Advance exactly one generation.
    ///
    /// Every cell is evaluated against the current generation before any of them is committed.
    pub fn generate_next(&mut self) {
        self.evaluate();
        self.commit();

        self.generation += 1;

        if self.debug {
            debug!(
                generation = self.generation,
                population = self.population(),
                "generated"
            );
        }
    }

    /// Evaluate phase: stage the next state of every cell, without changing any current state.
    pub fn evaluate(&mut self) {
        let staged: Vec<bool> = self.cells.iter().map(|cell| cell.look_up(self)).collect();

        for (cell, next) in self.cells.iter_mut().zip(staged) {
            cell.stage(next);
        }
    }

    /// Commit phase: every cell takes its staged state. Only sound right after [`Self::evaluate`].
    pub(crate) fn commit(&mut self) {
        for cell in &mut self.cells {
            cell.commit();
        }
    }

    /// Number of live cells among the (up to) 8 in-bounds neighbors of `(x, y)`
    pub fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut n = 0;

        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };

                if self.cell(nx, ny).is_some_and(Cell::lived) {
                    n += 1;
                }
            }
        }

        n
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Rows of the grid, top to bottom. `game_map().nth(y)` holds the cells with that `y`.
    pub fn game_map(&self) -> impl Iterator<Item = &[Cell]> {
        // `chunks` rejects a size of 0, but a 0-wide grid has no cells anyway
        self.cells.chunks(self.width.max(1))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.lived()).count()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

/// One line per row, `O` for live cells and `.` for dead ones.
impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.game_map().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            for cell in row {
                let c = if cell.lived() { 'O' } else { '.' };
                write!(f, "{c}")?;
            }
        }

        Ok(())
    }
}
