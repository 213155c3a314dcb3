//! Game state algebra: pure types, zero effects.
//!
//! Screens carry only per-screen transient data (the round in play).
//! Long-lived numbers (score, games played, attempts) live in the
//! `GameState` store owned by the effects layer.

use std::fmt;

// ============================================================================
// STORE KEYS
// ============================================================================

/// Accumulated points.
pub const KEY_SCORE: &str = "score";
/// Rounds that ran to completion (won or out of attempts).
pub const KEY_GAMES_PLAYED: &str = "games_played";
/// Every guess made, across all rounds.
pub const KEY_TOTAL_ATTEMPTS: &str = "total_attempts";

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Difficulty level picked on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    /// 1-50, 10 attempts.
    Easy,
    /// 1-100, 7 attempts, double points.
    #[default]
    Medium,
    /// 1-200, 5 attempts, triple points.
    Hard,
}

impl Difficulty {
    /// Map a setup menu number (1-3) to a difficulty.
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn max_number(self) -> u32 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Medium => 100,
            Difficulty::Hard => 200,
        }
    }

    pub fn max_attempts(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 7,
            Difficulty::Hard => 5,
        }
    }

    pub fn multiplier(self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Points for winning after `attempts` guesses.
    pub fn points(self, attempts: u32) -> u64 {
        let remaining = self.max_attempts().saturating_sub(attempts) + 1;
        u64::from(remaining.max(1)) * 10 * self.multiplier()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ROUND
// ============================================================================

/// One secret number and the guesses spent on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub secret: u32,
    pub max_number: u32,
    pub max_attempts: u32,
    pub attempts: u32,
    /// None for the classic game, which does not score.
    pub difficulty: Option<Difficulty>,
}

/// How a single guess compares to the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooLow,
    TooHigh,
    Correct,
}

impl Round {
    /// A scored round using the bounds of `difficulty`.
    pub fn new(difficulty: Difficulty, secret: u32) -> Self {
        Round {
            secret,
            max_number: difficulty.max_number(),
            max_attempts: difficulty.max_attempts(),
            attempts: 0,
            difficulty: Some(difficulty),
        }
    }

    /// An unscored round with explicit bounds.
    pub fn unscored(secret: u32, max_number: u32, max_attempts: u32) -> Self {
        Round {
            secret,
            max_number,
            max_attempts,
            attempts: 0,
            difficulty: None,
        }
    }

    /// Spend one attempt on `guess`.
    pub fn guess(&mut self, guess: i64) -> GuessOutcome {
        self.attempts += 1;
        let secret = i64::from(self.secret);
        if guess == secret {
            GuessOutcome::Correct
        } else if guess < secret {
            GuessOutcome::TooLow
        } else {
            GuessOutcome::TooHigh
        }
    }

    /// True once every attempt has been used.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Points for a win at the current attempt count. Zero when unscored.
    pub fn points(&self) -> u64 {
        self.difficulty.map_or(0, |d| d.points(self.attempts))
    }
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current game screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    /// Numbered menu: play, stats, about, quit.
    #[default]
    MainMenu,
    /// Difficulty selection.
    Setup,
    /// A round in progress.
    Playing { round: Round },
    /// Player asked to leave mid-round.
    ConfirmQuit { round: Round },
    /// Round finished or abandoned; waiting for Enter.
    RoundOver,
    /// Statistics summary.
    Stats,
    /// About text.
    About,
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic player input, decoupled from how it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A menu choice, difficulty choice or guess.
    Number(i64),
    /// Escape typed at the guess prompt.
    Interrupt,
    Yes,
    No,
    /// Enter on an informational screen.
    Continue,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Show this screen next.
    Screen(Screen),
    /// Leave the game.
    Quit,
    /// Execute a side effect; the effects layer picks the next screen.
    Effect(Effect),
}

/// Side effect requested by a pure transition.
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Draw a secret, checkpoint the store, and begin a round.
    StartRound(Difficulty),
    /// Book a guess that has already been scored against the round.
    RecordGuess { round: Round, outcome: GuessOutcome },
    /// Throw away the round in play and roll the store back.
    AbandonRound,
}

// ============================================================================
// TESTS
// ============================================================================
