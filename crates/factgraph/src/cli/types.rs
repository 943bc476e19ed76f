//! CLI value enums and their library counterparts.

use clap::ValueEnum;

use crate::graph::Direction;

/// Traversal direction for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionArg {
    /// What does the start node use?
    #[default]
    Forward,
    /// What uses the start node?
    Reverse,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => Self::Forward,
            DirectionArg::Reverse => Self::Reverse,
        }
    }
}

impl std::fmt::Display for DirectionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}
