//! Shared types module - plain data and constants used by every layer
//!
//! Everything here is a pure data structure with no external dependencies, so the
//! same definitions serve the simulation core, the session engine, the score store
//! and the terminal frontend.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! Pieces may hang above the board (negative rows) while they spawn.
//!
//! # Difficulty
//!
//! | Difficulty | Base interval | Decrease/level | Lines/level | Multiplier |
//! |------------|---------------|----------------|-------------|------------|
//! | `easy`     | 800ms         | 50ms           | 10          | 1          |
//! | `medium`   | 500ms         | 50ms           | 8           | 1.5        |
//! | `hard`     | 300ms         | 50ms           | 6           | 2          |
//!
//! The gravity interval never drops below [`DROP_INTERVAL_FLOOR_MS`].
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, Difficulty, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//!
//! let easy = Difficulty::Easy.config();
//! assert_eq!(easy.base_interval_ms, 800);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Lower bound for the gravity interval at any level.
pub const DROP_INTERVAL_FLOOR_MS: u32 = 50;

/// Line clear scoring table (classic curve).
///
/// Indexed by the number of rows cleared by a single placement (0-4).
/// The awarded score is `LINE_SCORES[n] * level * multiplier`.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Number of entries kept per difficulty in a best-score list.
pub const MAX_HIGH_SCORES: usize = 10;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in tag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("L"), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Compact cell tag used by snapshots (1-7, 0 is reserved for empty).
    pub fn tag(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1..=7 => Some(Self::ALL[(tag - 1) as usize]),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// - `None`: empty
/// - `Some(kind)`: permanently filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Difficulty selected at session creation. Immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Timing and scoring parameters for this difficulty.
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                base_interval_ms: 800,
                interval_decrease_per_level_ms: 50,
                lines_per_level: 10,
                multiplier_numerator: 1,
                multiplier_denominator: 1,
            },
            Difficulty::Medium => DifficultyConfig {
                base_interval_ms: 500,
                interval_decrease_per_level_ms: 50,
                lines_per_level: 8,
                multiplier_numerator: 3,
                multiplier_denominator: 2,
            },
            Difficulty::Hard => DifficultyConfig {
                base_interval_ms: 300,
                interval_decrease_per_level_ms: 50,
                lines_per_level: 6,
                multiplier_numerator: 2,
                multiplier_denominator: 1,
            },
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-difficulty parameters.
///
/// The score multiplier is kept as an integer ratio so awarded points can be
/// floored exactly without floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DifficultyConfig {
    /// Gravity interval at level 1.
    pub base_interval_ms: u32,
    /// How much faster gravity gets per level above 1.
    pub interval_decrease_per_level_ms: u32,
    /// Cleared lines required for each level-up.
    pub lines_per_level: u32,
    pub multiplier_numerator: u32,
    pub multiplier_denominator: u32,
}

impl DifficultyConfig {
    /// Score multiplier as a float, for display only.
    pub fn score_multiplier(&self) -> f64 {
        self.multiplier_numerator as f64 / self.multiplier_denominator as f64
    }
}

/// Discrete commands accepted by the engine.
///
/// These are issued by the presentation layer (keyboard) and, for `MoveDown`,
/// by the drop scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down, locking it in when it cannot move
    MoveDown,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Drop piece to the lowest legal row and lock it in
    HardDrop,
    Pause,
    Resume,
    /// Leave the ready state and start gravity
    Start,
    /// Discard the session and return to a fresh ready state
    Reset,
}

impl Command {
    /// Parse command from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("RESET"), Some(Command::Reset));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "movedown" => Some(Command::MoveDown),
            "rotate" => Some(Command::Rotate),
            "harddrop" => Some(Command::HardDrop),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "start" => Some(Command::Start),
            "reset" => Some(Command::Reset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::MoveDown => "moveDown",
            Command::Rotate => "rotate",
            Command::HardDrop => "hardDrop",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Start => "start",
            Command::Reset => "reset",
        }
    }
}

/// Lifecycle phase of a game.
///
/// `Ready` → `Running` ⇄ `Paused`, and `Running` → `GameOver` (terminal until reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Ready,
    Running,
    Paused,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::GameOver => "gameOver",
        }
    }
}
