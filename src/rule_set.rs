use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// State of a cell in the next generation, given whether it is alive now and how many of
    /// its neighbors are.
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        // more than 8 neighbors can't happen on a square grid
        if neighbors > 8 {
            return false;
        }

        let mask = 1u16 << neighbors;

        if alive {
            self.survivals() & mask == mask
        } else {
            self.births() & mask == mask
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rule string")]
    Empty,

    #[error("Invalid character '{0}' in rule string")]
    InvalidChar(char),

    #[error("Neighbor count {0} is out of range (0-8)")]
    OutOfRange(u32),
}

/// # Format
///
/// `b[0-8]*/?s[0-8]*`, case insensitive. `B3/S23` and `b3s23` are the same rule.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum State {
            Birth,
            Survival,
        }

        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let mut state = State::Birth;
        let (mut b, mut s_bits) = (0u16, 0u16);

        for c in s.chars() {
            match c {
                'b' | 'B' => {
                    state = State::Birth;
                }
                's' | 'S' => {
                    state = State::Survival;
                }
                '/' => {}
                n => {
                    let n = n.to_digit(10).ok_or(RuleError::InvalidChar(n))?;

                    if n > 8 {
                        return Err(RuleError::OutOfRange(n));
                    }

                    match state {
                        State::Birth => b |= 1 << n,
                        State::Survival => s_bits |= 1 << n,
                    }
                }
            }
        }

        Ok(RuleSet::new(b, s_bits))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |bits: u16| -> String {
            (0..=8)
                .filter(|n| bits & (1 << n) != 0)
                .map(|n| char::from(b'0' + n as u8))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[cfg(test)]
mod test {
    use super::RuleError;
    use super::RuleSet;
    use super::B3S23;

    #[test]
    fn conway_transitions() {
        for n in 0..=8 {
            assert_eq!(B3S23.next_state(false, n), n == 3, "dead with {n} neighbors");
            assert_eq!(
                B3S23.next_state(true, n),
                n == 2 || n == 3,
                "alive with {n} neighbors"
            );
        }
    }

    #[test]
    fn parse_both_notations() {
        assert_eq!("B3/S23".parse::<RuleSet>().unwrap(), B3S23);
        assert_eq!("b3s23".parse::<RuleSet>().unwrap(), B3S23);
        assert_eq!("B36/S23".parse::<RuleSet>().unwrap(), RuleSet::new(0b100_1000, 0b1100));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<RuleSet>(), Err(RuleError::Empty));
        assert_eq!("B9/S23".parse::<RuleSet>(), Err(RuleError::OutOfRange(9)));
        assert_eq!("B3-S23".parse::<RuleSet>(), Err(RuleError::InvalidChar('-')));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let highlife = RuleSet::new(0b100_1000, 0b1100);
        assert_eq!(highlife.to_string(), "B36/S23");
        assert_eq!(B3S23.to_string(), "B3/S23");
        assert_eq!(RuleSet::default(), B3S23);
    }
}
