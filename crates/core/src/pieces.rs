//! Pieces module - tetromino shape table and the active piece
//!
//! Every piece type has four rotation states, each an ordered list of four
//! block offsets from the piece anchor. There are no wall kicks: a rotation
//! either fits where it is or is rejected.

use crate::types::{PieceType, Rotation, SPAWN_X, SPAWN_Y};

/// Offset of a single block relative to piece anchor
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 block offsets from piece anchor
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (block offsets) for a piece type and rotation
pub fn shape_of(kind: PieceType, rotation: Rotation) -> PieceShape {
    match kind {
        PieceType::I => i_shape(rotation),
        PieceType::J => j_shape(rotation),
        PieceType::L => l_shape(rotation),
        PieceType::O => o_shape(rotation),
        PieceType::S => s_shape(rotation),
        PieceType::T => t_shape(rotation),
        PieceType::Z => z_shape(rotation),
    }
}

/// I piece shapes
///
/// The vertical states reach one row above the anchor.
fn i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (2, 0), (3, 0)],
        Rotation::East => [(1, -1), (1, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::West => [(2, -1), (2, 0), (2, 1), (2, 2)],
    }
}

/// J piece shapes
fn j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// L piece shapes
fn l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// O piece shapes (same for all rotations)
fn o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

/// S piece shapes
fn s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// T piece shapes
fn t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Z piece shapes
fn z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// Active falling piece
///
/// `Copy`, so tentative moves are built on a copy and only committed once
/// validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
}

impl Piece {
    /// Create a piece at the spawn anchor in its spawn rotation
    pub fn spawn(kind: PieceType) -> Self {
        Self {
            kind,
            x: SPAWN_X,
            y: SPAWN_Y,
            rotation: Rotation::North,
        }
    }

    /// Get the shape (block offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        shape_of(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four blocks
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn rotated_cw(self) -> Self {
        Self {
            rotation: self.rotation.rotate_cw(),
            ..self
        }
    }
}
