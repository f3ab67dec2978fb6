use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Where a freshly created region lands relative to the leaf it splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Before,
    After,
    Above,
    Below,
}

impl Placement {
    pub fn orientation(self) -> Orientation {
        match self {
            Placement::Before | Placement::After => Orientation::Horizontal,
            Placement::Above | Placement::Below => Orientation::Vertical,
        }
    }

    /// True when the new region takes the first child slot.
    pub fn new_region_first(self) -> bool { matches!(self, Placement::Before | Placement::Above) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    /// True when moving toward the first child of a matching split.
    pub fn toward_first(self) -> bool { matches!(self, Direction::Left | Direction::Up) }
}
