//! Core types module - shared data structures and constants
//!
//! Pure data types used by the game engine and by the WebSocket protocol.
//! No external dependencies, so both sides can share them freely.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn anchor**: (4, 0), rotation 0
//!
//! # Gravity
//!
//! The tick interval starts at `BASE_TICK_MS` on level 1 and shrinks by
//! `TICK_STEP_MS` per level, never going below `MIN_TICK_MS`:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 800ms |
//! | 2 | 750ms |
//! | 5 | 600ms |
//! | 10 | 350ms |
//! | 15+ | 100ms |
//!
//! # Examples
//!
//! ```
//! use ws_tetris_types::{Direction, PieceType, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceType::T;
//! assert_eq!(piece.cell_id(), 6);
//! assert_eq!(PieceType::from_index(5), Some(PieceType::T));
//!
//! assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
//! assert_eq!(Direction::from_str("rotate"), Some(Direction::Rotate));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Horizontal spawn anchor (centered: `BOARD_WIDTH / 2 - 1`)
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 1;

/// Vertical spawn anchor (top row)
pub const SPAWN_Y: i8 = 0;

/// Gravity interval on level 1
pub const BASE_TICK_MS: u64 = 800;

/// Interval reduction per level gained
pub const TICK_STEP_MS: u64 = 50;

/// Fastest gravity interval
pub const MIN_TICK_MS: u64 = 100;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table (classic Nintendo scoring)
///
/// Index is the number of lines cleared by one lock. Points are multiplied
/// by the current level (levels start at 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// A cell on the game board
///
/// `0` is empty, `1..=7` is the settled piece id (`PieceType::cell_id`).
pub type Cell = u8;

/// Empty cell marker
pub const EMPTY_CELL: Cell = 0;

/// The seven tetromino piece types
///
/// Declaration order is the wire order: the integer sent to clients is
/// `index()`, and the value stored in settled cells is `index() + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceType {
    /// Number of piece types
    pub const COUNT: usize = 7;

    /// All piece types in wire order
    pub const ALL: [PieceType; Self::COUNT] = [
        PieceType::I,
        PieceType::J,
        PieceType::L,
        PieceType::O,
        PieceType::S,
        PieceType::T,
        PieceType::Z,
    ];

    /// Zero-based index (wire representation)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Settled-cell identifier (`index + 1`, never 0)
    pub fn cell_id(self) -> Cell {
        self.index() + 1
    }

    /// Look up a piece type by its zero-based index
    ///
    /// ```
    /// use ws_tetris_types::PieceType;
    ///
    /// assert_eq!(PieceType::from_index(0), Some(PieceType::I));
    /// assert_eq!(PieceType::from_index(6), Some(PieceType::Z));
    /// assert_eq!(PieceType::from_index(7), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Rotation states, clockwise from spawn
///
/// The cycle goes: North → East → South → West → North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use ws_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::East.rotate_cw(), Rotation::South);
    /// assert_eq!(Rotation::South.rotate_cw(), Rotation::West);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Index in `0..4` (wire representation)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Build a rotation from any integer, taken modulo 4
    ///
    /// ```
    /// use ws_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_index(1), Rotation::East);
    /// assert_eq!(Rotation::from_index(4), Rotation::North);
    /// assert_eq!(Rotation::from_index(7), Rotation::West);
    /// ```
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Player movement commands
///
/// The integer discriminants are the canonical wire encoding of a `move`
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Shift one column left
    Left = 0,
    /// Shift one column right
    Right = 1,
    /// Drop one row; locks the piece when blocked
    Down = 2,
    /// Rotate 90° clockwise
    Rotate = 3,
}

impl Direction {
    pub fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Direction::Left),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Rotate),
            _ => None,
        }
    }

    /// Parse direction from its name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "down" => Some(Direction::Down),
            "rotate" => Some(Direction::Rotate),
            _ => None,
        }
    }
}
