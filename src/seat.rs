//! Seats around the table and the identities bound to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed seats, in clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerPosition {
    Bottom,
    Left,
    Top,
    Right,
}

impl PlayerPosition {
    pub const ALL: [PlayerPosition; 4] =
        [PlayerPosition::Bottom, PlayerPosition::Left, PlayerPosition::Top, PlayerPosition::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 4]
    }

    /// The next seat clockwise.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Seats in turn order starting with `self`.
    pub fn rotation(self) -> [PlayerPosition; 4] {
        let start = self.index();
        [0, 1, 2, 3].map(|i| Self::from_index(start + i))
    }

    pub const fn label(self) -> &'static str {
        match self {
            PlayerPosition::Bottom => "Bottom",
            PlayerPosition::Left => "Left",
            PlayerPosition::Top => "Top",
            PlayerPosition::Right => "Right",
        }
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque identity handed out by the controller when a view subscribes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(u64);

impl PlayerId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_clockwise_and_wraps() {
        assert_eq!(PlayerPosition::Right.next(), PlayerPosition::Bottom);
        assert_eq!(
            PlayerPosition::Top.rotation(),
            [PlayerPosition::Top, PlayerPosition::Right, PlayerPosition::Bottom, PlayerPosition::Left]
        );
    }
}
