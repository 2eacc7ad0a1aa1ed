//! Directions and factor kinds used by the drill
//!
//! Axis convention: `Right` = +X, `Up` = +Y, `Out` = +Z (out of the screen,
//! towards the viewer). The physical factors are each confined to one axis,
//! expressed by the narrow `FieldDirection`, `CurrentDirection` and
//! `ForceDirection` types.

use std::fmt;

use glam::Vec3;

/// One of the six answerable spatial directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Into the screen
    In,
    /// Out of the screen
    Out,
}

impl Direction {
    /// Every direction, in answer-button order
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Out,
        Direction::In,
    ];

    /// Unit vector along this direction
    pub fn axis(self) -> Vec3 {
        match self {
            Direction::Up => Vec3::Y,
            Direction::Down => Vec3::NEG_Y,
            Direction::Left => Vec3::NEG_X,
            Direction::Right => Vec3::X,
            Direction::In => Vec3::NEG_Z,
            Direction::Out => Vec3::Z,
        }
    }

    /// Human readable label including a directional glyph
    pub fn display(self) -> &'static str {
        match self {
            Direction::Up => "Upward ↑",
            Direction::Down => "Downward ↓",
            Direction::Left => "Left ←",
            Direction::Right => "Right →",
            Direction::In => "Into Screen ⊗",
            Direction::Out => "Out of Screen ⊙",
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Which physical quantity a direction describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    Field,
    Current,
    Force,
}

impl FactorKind {
    /// Stable presentation order
    pub const ALL: [FactorKind; 3] = [FactorKind::Field, FactorKind::Current, FactorKind::Force];

    pub fn display_name(self) -> &'static str {
        match self {
            FactorKind::Force => "Magnetic Force (Thrust)",
            FactorKind::Field => "Magnetic Field",
            FactorKind::Current => "Current",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Magnetic field direction, along X (north pole to south pole)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldDirection {
    Left,
    Right,
}

impl FieldDirection {
    pub fn sign(self) -> i8 {
        match self {
            FieldDirection::Right => 1,
            FieldDirection::Left => -1,
        }
    }
}

/// Conventional current direction, along Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentDirection {
    In,
    Out,
}

impl CurrentDirection {
    pub fn sign(self) -> i8 {
        match self {
            CurrentDirection::Out => 1,
            CurrentDirection::In => -1,
        }
    }
}

/// Force on the conductor, along Y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceDirection {
    Up,
    Down,
}

impl ForceDirection {
    pub fn sign(self) -> i8 {
        match self {
            ForceDirection::Up => 1,
            ForceDirection::Down => -1,
        }
    }

    /// Positive signs map to `Up`, everything else to `Down`
    pub fn from_sign(sign: i8) -> Self {
        if sign > 0 {
            ForceDirection::Up
        } else {
            ForceDirection::Down
        }
    }
}

impl From<FieldDirection> for Direction {
    fn from(field: FieldDirection) -> Self {
        match field {
            FieldDirection::Left => Direction::Left,
            FieldDirection::Right => Direction::Right,
        }
    }
}

impl From<CurrentDirection> for Direction {
    fn from(current: CurrentDirection) -> Self {
        match current {
            CurrentDirection::In => Direction::In,
            CurrentDirection::Out => Direction::Out,
        }
    }
}

impl From<ForceDirection> for Direction {
    fn from(force: ForceDirection) -> Self {
        match force {
            ForceDirection::Up => Direction::Up,
            ForceDirection::Down => Direction::Down,
        }
    }
}
