pub mod camera;
pub mod canvas;
pub mod cell;
pub mod config;
pub mod control;
pub mod mapping;
pub mod rule_set;

mod parse_util;

pub use cell::Cell;
pub use cell::ShapeHandle;
pub use mapping::Mapping;
