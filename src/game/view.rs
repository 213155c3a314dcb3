//! Pure rendering: screen data in, text out.
//!
//! Nothing here touches the terminal; the effects layer writes the
//! returned strings and adds color.

use crate::console::format_box;
use crate::state::GameState;

use super::state::{GuessOutcome, KEY_GAMES_PLAYED, KEY_SCORE, KEY_TOTAL_ATTEMPTS, Round};

/// Title shown on the main menu.
pub const GAME_TITLE: &str = "G2C Number Guessing Game";

/// Reply strings that abandon the round at the guess prompt.
pub const QUIT_REPLIES: [&str; 2] = ["q", "quit"];

const ABOUT_TEXT: &str = "\
G2C (Game to Console) is a lightweight framework for developing
console-based games and applications. It provides utilities for:

- Console management (clearing, sizing, formatting)
- Game state management with checkpoints
- User input handling with validation
- Text formatting and display helpers

This number guessing game demonstrates the basic capabilities of the
G2C framework. The framework is designed to make console game development
easier and more enjoyable.";

/// `=` header box at `width`.
pub fn header(title: &str, width: usize) -> String {
    format_box(title, "=", 2, width)
}

pub fn main_menu_lines() -> [&'static str; 4] {
    ["1. Play Game", "2. View Statistics", "3. About G2C", "4. Quit"]
}

pub fn setup_lines() -> [&'static str; 4] {
    [
        "Choose difficulty level:",
        "1. Easy (1-50, 10 attempts)",
        "2. Medium (1-100, 7 attempts)",
        "3. Hard (1-200, 5 attempts)",
    ]
}

/// Header title for a round.
pub fn round_title(round: &Round) -> String {
    match round.difficulty {
        Some(d) => format!("Number Guessing Game - {} Mode", d),
        None => "Number Guessing Game".to_string(),
    }
}

/// Two lines explaining the round.
pub fn round_intro(round: &Round) -> [String; 2] {
    [
        format!("I'm thinking of a number between 1 and {}.", round.max_number),
        format!("You have {} attempts to guess it!", round.max_attempts),
    ]
}

/// Guess prompt for the scored game.
pub fn guess_prompt(round: &Round) -> String {
    format!(
        "Attempt {}/{}: Enter your guess (1-{}, q to quit): ",
        round.attempts + 1,
        round.max_attempts,
        round.max_number
    )
}

/// Hint line after a guess. None for a correct guess.
pub fn hint_line(outcome: GuessOutcome) -> Option<&'static str> {
    match outcome {
        GuessOutcome::TooLow => Some("📈 Too low! Try a higher number."),
        GuessOutcome::TooHigh => Some("📉 Too high! Try a lower number."),
        GuessOutcome::Correct => None,
    }
}

pub fn win_line(round: &Round) -> String {
    format!(
        "🎉 Congratulations! You guessed it in {} attempts!",
        round.attempts
    )
}

pub fn points_line(points: u64) -> String {
    format!("💰 You earned {} points!", points)
}

pub fn game_over_line(round: &Round) -> String {
    format!("😞 Game over! The number was {}", round.secret)
}

/// Statistics lines derived from the store.
pub fn stats_lines(state: &GameState) -> Vec<String> {
    let games = state.get_u64(KEY_GAMES_PLAYED).unwrap_or(0);
    let score = state.get_u64(KEY_SCORE).unwrap_or(0);
    let attempts = state.get_u64(KEY_TOTAL_ATTEMPTS).unwrap_or(0);

    let mut lines = vec![
        format!("Games Played: {}", games),
        format!("Total Score: {}", score),
        format!("Total Attempts: {}", attempts),
    ];
    if games > 0 {
        lines.push(format!(
            "Average Attempts per Game: {:.1}",
            attempts as f64 / games as f64
        ));
    }
    lines
}

pub fn about_text() -> &'static str {
    ABOUT_TEXT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Difficulty;

    #[test]
    fn header_is_boxed_title() {
        let out = header("Stats", 20);
        assert!(out.starts_with(&"=".repeat(20)));
        assert!(out.contains("Stats"));
    }

    #[test]
    fn round_title_names_difficulty() {
        let round = Round::new(Difficulty::Hard, 1);
        assert_eq!(round_title(&round), "Number Guessing Game - Hard Mode");
    }

    #[test]
    fn guess_prompt_counts_from_one() {
        let mut round = Round::new(Difficulty::Easy, 1);
        assert!(guess_prompt(&round).starts_with("Attempt 1/10: Enter your guess (1-50"));
        round.guess(3);
        assert!(guess_prompt(&round).starts_with("Attempt 2/10"));
    }

    #[test]
    fn hint_only_for_wrong_guesses() {
        assert!(hint_line(GuessOutcome::TooLow).unwrap().contains("Too low"));
        assert!(hint_line(GuessOutcome::TooHigh).unwrap().contains("Too high"));
        assert_eq!(hint_line(GuessOutcome::Correct), None);
    }

    #[test]
    fn stats_without_games_omit_average() {
        let state = GameState::new();
        let lines = stats_lines(&state);
        assert_eq!(lines[0], "Games Played: 0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn stats_average_has_one_decimal() {
        let mut state = GameState::new();
        state.set(KEY_GAMES_PLAYED, 3);
        state.set(KEY_SCORE, 120);
        state.set(KEY_TOTAL_ATTEMPTS, 10);
        let lines = stats_lines(&state);
        assert_eq!(lines[1], "Total Score: 120");
        assert_eq!(lines[3], "Average Attempts per Game: 3.3");
    }
}
