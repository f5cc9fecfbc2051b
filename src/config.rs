use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::canvas::Rect;
use crate::parse_util;
use crate::rule_set::RuleSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config key \"{0}\" was never set")]
    MissingKey(String),

    #[error("Invalid value for \"{key}\": {reason}")]
    Invalid { key: String, reason: String },
}

/// Plain string key-value configuration.
///
/// Text form is one `KEY = value` per line. Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Result<&str, ConfigError> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Look up `key` and parse it as `T`
    pub fn parse<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)?.parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Like [`Config::parse`], but a key that was never set yields `None`
    pub fn parse_opt<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if self.contains(key) {
            self.parse(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Copy every environment variable named `{prefix}_{KEY}` into the config as `KEY`.
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(std::env::vars(), prefix)
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>, prefix: &str) -> Self {
        let prefix = format!("{prefix}_");
        let mut config = Config::new();

        for (key, value) in vars {
            if let Some(key) = key.strip_prefix(&prefix) {
                config.insert(key, value);
            }
        }

        config
    }

    /// Overlay `other` on top of `self`. Keys in `other` win.
    pub fn merge(&mut self, other: Config) {
        self.values.extend(other.values);
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = Config::new();

        for (n, line) in s.lines().enumerate() {
            let bytes = parse_util::trim_end_ws(parse_util::take_ws(line.as_bytes()));

            if bytes.is_empty() || parse_util::peek_1(bytes) == Some(b'#') {
                continue;
            }

            let invalid = |reason: &str| ConfigError::Invalid {
                key: format!("line {}", n + 1),
                reason: reason.to_string(),
            };

            let (Some(key), rest) = parse_util::take_until(b'=', bytes) else {
                return Err(invalid("missing key"));
            };
            let rest = parse_util::expect(b'=', rest).map_err(|e| invalid(&e.to_string()))?;

            let key = String::from_utf8_lossy(parse_util::trim_end_ws(key));
            let value = String::from_utf8_lossy(parse_util::take_ws(rest));

            if config.contains(&key) {
                warn!(%key, "config key already defined. Using latest");
            }

            config.insert(key, value);
        }

        Ok(config)
    }
}

/// Live cell coordinates, written as `x,y` pairs separated by whitespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellList(pub Vec<(usize, usize)>);

impl FromStr for CellList {
    type Err = parse_util::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_util::coordinates(s.as_bytes()).map(CellList)
    }
}

/// Typed settings of a game. Every field has a default, so every key is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub debug: bool,

    /// Grid height, in cells
    pub row_nums: usize,

    /// Grid width, in cells
    pub column_nums: usize,

    /// Side of a cell, in canvas pixels
    pub cell_size: usize,

    pub canvas_margin_top: usize,
    pub canvas_margin_left: usize,

    /// Time between two generations
    pub sleep_time: Duration,

    /// Initially live cells
    pub init_cells: Option<Vec<(usize, usize)>>,

    pub rule: RuleSet,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            debug: false,
            row_nums: 50,
            column_nums: 50,
            cell_size: 10,
            canvas_margin_top: 50,
            canvas_margin_left: 135,
            sleep_time: Duration::from_millis(500),
            init_cells: None,
            rule: RuleSet::default(),
        }
    }
}

impl GameConfig {
    pub const DEBUG: &'static str = "DEBUG";
    pub const ROW_NUMS: &'static str = "ROW_NUMS";
    pub const COLUMN_NUMS: &'static str = "COLUMN_NUMS";
    pub const CELL_SIZE: &'static str = "CELL_SIZE";
    pub const CANVAS_MARGIN_TOP: &'static str = "CANVAS_MARGIN_TOP";
    pub const CANVAS_MARGIN_LEFT: &'static str = "CANVAS_MARGIN_LEFT";
    pub const SLEEP_TIME: &'static str = "SLEEP_TIME";
    pub const INIT_CELLS: &'static str = "INIT_CELLS";
    pub const RULE: &'static str = "RULE";

    /// Defaults for drawing on a terminal, where one cell is one braille dot
    pub fn terminal() -> Self {
        Self {
            cell_size: 1,
            canvas_margin_top: 0,
            canvas_margin_left: 0,
            ..Self::default()
        }
    }

    /// Read every known key of `config`, falling back to `base` for the missing ones.
    pub fn from_config(config: &Config, base: GameConfig) -> Result<Self, ConfigError> {
        let sleep_time = config
            .parse_opt::<u64>(Self::SLEEP_TIME)?
            .map(Duration::from_millis);
        let init_cells = config
            .parse_opt::<CellList>(Self::INIT_CELLS)?
            .map(|CellList(cells)| cells);

        Ok(Self {
            debug: config.parse_opt(Self::DEBUG)?.unwrap_or(base.debug),
            row_nums: config.parse_opt(Self::ROW_NUMS)?.unwrap_or(base.row_nums),
            column_nums: config
                .parse_opt(Self::COLUMN_NUMS)?
                .unwrap_or(base.column_nums),
            cell_size: config.parse_opt(Self::CELL_SIZE)?.unwrap_or(base.cell_size),
            canvas_margin_top: config
                .parse_opt(Self::CANVAS_MARGIN_TOP)?
                .unwrap_or(base.canvas_margin_top),
            canvas_margin_left: config
                .parse_opt(Self::CANVAS_MARGIN_LEFT)?
                .unwrap_or(base.canvas_margin_left),
            sleep_time: sleep_time.unwrap_or(base.sleep_time),
            init_cells: init_cells.or(base.init_cells),
            rule: config.parse_opt(Self::RULE)?.unwrap_or(base.rule),
        })
    }

    /// Canvas rectangle covered by the cell at `(x, y)`. Saturates at `usize::MAX`.
    pub fn cell_position(&self, x: usize, y: usize) -> Rect {
        let cs = self.cell_size;
        let edge = |n: usize, margin: usize| n.saturating_mul(cs).saturating_add(margin);

        Rect {
            x0: edge(x, self.canvas_margin_left),
            y0: edge(y, self.canvas_margin_top),
            x1: edge(x.saturating_add(1), self.canvas_margin_left),
            y1: edge(y.saturating_add(1), self.canvas_margin_top),
        }
    }
}
