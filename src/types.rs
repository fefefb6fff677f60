//! Board-boundary types shared across the session crate
//!
//! The rules engine is an external collaborator; the session layer only ever
//! sees boards as flat arrays of signed piece codes ("spins") plus a small
//! integer state array. This module defines those encodings and the handful
//! of enums that cross the engine boundary.
//!
//! # Spin codes
//!
//! A spin is a signed integer piece code: magnitude 1–6 is pawn, knight,
//! bishop, rook, queen, king; the sign is the colour (positive = white).
//! Zero is an empty square. FEN characters are the single-letter notation
//! used at the snapshot/engine boundary (`P`, `n`, `q`, ...).

use serde::{Deserialize, Serialize};

/// Square index on the 8x8 board, 0 = a1 .. 63 = h8 (rank-major)
pub type Square = u8;

/// Signed piece code (see module docs)
pub type Spin = i8;

/// Number of squares on the board
pub const BOARD_SQUARES: usize = 64;

/// Flat per-square spin encoding of a board position
pub type BoardArray = [Spin; BOARD_SQUARES];

/// Number of slots in the engine state array
pub const STATE_LEN: usize = 8;

/// Fixed-slot integer encoding of non-board game state
///
/// Slot meanings are defined by the [`state_slot`] constants. The session
/// layer treats the array as opaque except for the slots it needs for
/// indicators, clocks and repetition parity.
pub type StateArray = [i64; STATE_LEN];

/// Slot indexes into a [`StateArray`]
pub mod state_slot {
    /// Side to move: 0 = white, 1 = black
    pub const ACTIVE_COLOUR: usize = 0;
    /// Castling rights bitmask (engine-defined bits)
    pub const CASTLING: usize = 1;
    /// Halfmove clock for the fifty-move rule
    pub const HALF_MOVE: usize = 2;
    /// Fullmove number, starts at 1
    pub const FULL_MOVE: usize = 3;
    /// Game status, encoded via [`super::GameStatus::to_i64`]
    pub const STATUS: usize = 4;
    /// White's elapsed clock offset in seconds
    pub const WHITE_CLOCK: usize = 5;
    /// Black's elapsed clock offset in seconds
    pub const BLACK_CLOCK: usize = 6;
}

/// Spin magnitudes per piece kind
pub mod spin {
    use super::Spin;

    pub const EMPTY: Spin = 0;
    pub const PAWN: Spin = 1;
    pub const KNIGHT: Spin = 2;
    pub const BISHOP: Spin = 3;
    pub const ROOK: Spin = 4;
    pub const QUEEN: Spin = 5;
    pub const KING: Spin = 6;
}

/// Colour of a piece or player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    /// The opposing colour
    pub fn opponent(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Sign multiplier for spin codes of this colour
    pub fn spin_sign(self) -> Spin {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => -1,
        }
    }

    /// Colour owning a spin code, `None` for empty squares
    pub fn of_spin(s: Spin) -> Option<Self> {
        match s.signum() {
            1 => Some(PieceColor::White),
            -1 => Some(PieceColor::Black),
            _ => None,
        }
    }

    /// State-array encoding (0 = white, 1 = black)
    pub fn to_i64(self) -> i64 {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => 1,
        }
    }

    /// Decode from a state-array slot, treating anything non-zero as black
    pub fn from_i64(v: i64) -> Self {
        if v == 0 {
            PieceColor::White
        } else {
            PieceColor::Black
        }
    }
}

/// Game status as owned by the engine state array
///
/// `InProgress` is the only state in which moves, hints and computer
/// searches are accepted. All other states are terminal for the current
/// record; starting a new game is the only way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    CheckmateWhiteWins,
    CheckmateBlackWins,
    Stalemate,
    Draw,
    Resigned,
    TimeExpired,
}

impl GameStatus {
    /// Whether play can continue from this status
    pub fn is_in_progress(self) -> bool {
        matches!(self, GameStatus::InProgress)
    }

    /// State-array encoding
    pub fn to_i64(self) -> i64 {
        match self {
            GameStatus::InProgress => 0,
            GameStatus::CheckmateWhiteWins => 1,
            GameStatus::CheckmateBlackWins => 2,
            GameStatus::Stalemate => 3,
            GameStatus::Draw => 4,
            GameStatus::Resigned => 5,
            GameStatus::TimeExpired => 6,
        }
    }

    /// Decode from a state-array slot; unknown values fold to `Draw`
    pub fn from_i64(v: i64) -> Self {
        match v {
            0 => GameStatus::InProgress,
            1 => GameStatus::CheckmateWhiteWins,
            2 => GameStatus::CheckmateBlackWins,
            3 => GameStatus::Stalemate,
            5 => GameStatus::Resigned,
            6 => GameStatus::TimeExpired,
            _ => GameStatus::Draw,
        }
    }
}

/// Piece a pawn may promote to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    /// Spin magnitude of the promoted piece
    pub fn spin_magnitude(self) -> Spin {
        match self {
            PromotionPiece::Queen => spin::QUEEN,
            PromotionPiece::Rook => spin::ROOK,
            PromotionPiece::Bishop => spin::BISHOP,
            PromotionPiece::Knight => spin::KNIGHT,
        }
    }
}

/// How a pending move proposal should be highlighted by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    /// Highlight only the selected square
    #[default]
    Select,
    /// Highlight the selected square plus all legal destinations
    MovePath,
}

/// Convert a spin code to its FEN character, `None` for empty
pub fn spin_to_fen_char(s: Spin) -> Option<char> {
    let c = match s.abs() {
        spin::PAWN => 'p',
        spin::KNIGHT => 'n',
        spin::BISHOP => 'b',
        spin::ROOK => 'r',
        spin::QUEEN => 'q',
        spin::KING => 'k',
        _ => return None,
    };
    if s > 0 {
        Some(c.to_ascii_uppercase())
    } else {
        Some(c)
    }
}

/// Convert a FEN character to its spin code, `None` for non-piece characters
pub fn fen_char_to_spin(c: char) -> Option<Spin> {
    let magnitude = match c.to_ascii_lowercase() {
        'p' => spin::PAWN,
        'n' => spin::KNIGHT,
        'b' => spin::BISHOP,
        'r' => spin::ROOK,
        'q' => spin::QUEEN,
        'k' => spin::KING,
        _ => return None,
    };
    if c.is_ascii_uppercase() {
        Some(magnitude)
    } else {
        Some(-magnitude)
    }
}

/// Algebraic name of a square index ("e4")
pub fn square_name(sq: Square) -> String {
    let file = (b'a' + (sq % 8)) as char;
    let rank = (b'1' + (sq / 8)) as char;
    format!("{file}{rank}")
}
