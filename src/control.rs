use tracing::debug;
use tracing::info;

use crate::canvas::Canvas;
use crate::config::GameConfig;
use crate::mapping::Mapping;

/// Drives a [`Mapping`] and keeps a [`Canvas`] in sync with it.
///
/// Every live cell owns exactly one shape on the canvas, every dead cell owns none.
pub struct Control<C: Canvas> {
    config: GameConfig,
    mapping: Mapping,
    canvas: C,

    /// When unset, ticks repaint without advancing
    update_cells: bool,

    loop_nums: u64,
    paint_nums: u64,
}

impl<C: Canvas> Control<C> {
    pub fn new(config: GameConfig, canvas: C) -> Self {
        let mapping = Self::init_mapping(&config);

        let mut control = Self {
            config,
            mapping,
            canvas,
            update_cells: true,
            loop_nums: 0,
            paint_nums: 0,
        };

        control.paint();

        control
    }

    fn init_mapping(config: &GameConfig) -> Mapping {
        let seed = config.init_cells.clone().unwrap_or_default();

        info!(
            columns = config.column_nums,
            rows = config.row_nums,
            rule = %config.rule,
            seed = seed.len(),
            "initializing mapping"
        );

        let mut mapping =
            Mapping::with_seed(config.column_nums, config.row_nums, seed).with_rule(config.rule);
        mapping.debug = config.debug;

        mapping
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn update_cells(&self) -> bool {
        self.update_cells
    }

    /// Pause or resume evolution
    pub fn toggle_update_cells(&mut self) {
        self.update_cells = !self.update_cells;
        debug!(update_cells = self.update_cells, "toggled updates");
    }

    pub fn loop_nums(&self) -> u64 {
        self.loop_nums
    }

    pub fn paint_nums(&self) -> u64 {
        self.paint_nums
    }

    pub fn before_control(&mut self) {
        self.loop_nums += 1;
    }

    pub fn after_paint(&mut self) {
        self.paint_nums += 1;
    }

    /// Bring the canvas up to date: draw newly born cells, erase dead ones. Cells that stayed
    /// alive keep their shape.
    pub fn paint(&mut self) {
        let (mut drawn, mut erased) = (0, 0);

        for cell in self.mapping.cells_mut() {
            match (cell.lived(), cell.shape()) {
                (true, None) => {
                    let rect = self.config.cell_position(cell.x(), cell.y());
                    cell.set_shape(self.canvas.create_rect(rect));
                    drawn += 1;
                }
                (false, Some(_)) => {
                    if let Some(handle) = cell.take_shape() {
                        self.canvas.delete(handle);
                    }
                    erased += 1;
                }
                _ => {}
            }
        }

        debug!(drawn, erased, "painted");
    }

    /// One iteration of the main loop
    pub fn tick(&mut self) {
        self.before_control();

        if self.update_cells {
            self.mapping.generate_next();
        }

        self.paint();
        self.after_paint();

        debug!(
            loop_nums = self.loop_nums,
            generation = self.mapping.generation(),
            population = self.mapping.population(),
            "tick"
        );
    }

    /// Advance exactly one generation, even when paused
    pub fn step(&mut self) {
        self.mapping.generate_next();
        self.paint();
        self.after_paint();
    }

    /// Rebuild the grid at its current size. The configured cells come back to life.
    pub fn reset(&mut self) {
        let (columns, rows) = (self.mapping.width(), self.mapping.height());
        self.resize(columns, rows);
    }

    /// Rebuild the grid with new dimensions, then revive the configured cells that fit. Every
    /// shape of the old grid is erased first.
    pub fn resize(&mut self, columns: usize, rows: usize) {
        for cell in self.mapping.cells_mut() {
            if let Some(handle) = cell.take_shape() {
                self.canvas.delete(handle);
            }
        }

        self.config.column_nums = columns;
        self.config.row_nums = rows;
        self.mapping.init_game_map(columns, rows);
        if let Some(cells) = &self.config.init_cells {
            self.mapping.init_cells(cells);
        }

        info!(columns, rows, "rebuilt mapping");

        self.paint();
        self.after_paint();
    }
}
