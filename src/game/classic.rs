//! The classic guessing game: one round, 1-100, seven attempts, no score.
//!
//! Also home of [`ConsoleGame`], the banner-then-loop shape shared by
//! simple games that do not need the menu state machine.

use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::input::{InputError, Prompter};

use super::run::random_secret;
use super::state::{GuessOutcome, Round};
use super::theme;
use super::view;

pub const CLASSIC_TITLE: &str = "Number Guessing Game - G2C Example";
pub const CLASSIC_MAX_NUMBER: u32 = 100;
pub const CLASSIC_MAX_ATTEMPTS: u32 = 7;

/// Width of the `=` rules around a game banner.
const RULE_WIDTH: usize = 50;

// ============================================================================
// CONSOLE GAME
// ============================================================================

/// A console game: a titled banner followed by a main loop.
///
/// Only `game_loop` carries game logic; the other required methods are
/// plumbing for the provided ones.
pub trait ConsoleGame {
    fn title(&self) -> &str;

    /// Write one line of output.
    fn say(&mut self, line: &dyn Display) -> Result<(), InputError>;

    fn set_running(&mut self, running: bool);

    /// Play until the game ends or the player quits.
    fn game_loop(&mut self) -> Result<(), InputError>;

    /// Title between two `=` rules.
    fn display_header(&mut self) -> Result<(), InputError> {
        let rule = "=".repeat(RULE_WIDTH);
        let title = theme::important(format!(" {}", self.title()));
        self.say(&rule)?;
        self.say(&title)?;
        self.say(&rule)
    }

    /// Show the banner and run the loop.
    fn start(&mut self) -> Result<(), InputError> {
        self.set_running(true);
        self.display_header()?;
        self.game_loop()
    }

    fn quit_game(&mut self) -> Result<(), InputError> {
        self.set_running(false);
        self.say(&"\nThanks for playing!")
    }
}

// ============================================================================
// CLASSIC GAME
// ============================================================================

/// Single-round guessing game.
pub struct ClassicGame<R, W> {
    prompter: Prompter<R, W>,
    round: Round,
    running: bool,
}

impl<R: BufRead, W: Write> ClassicGame<R, W> {
    /// Game with a random secret.
    pub fn new(prompter: Prompter<R, W>) -> Self {
        Self::with_secret(prompter, random_secret(CLASSIC_MAX_NUMBER))
    }

    pub fn with_secret(prompter: Prompter<R, W>, secret: u32) -> Self {
        ClassicGame {
            prompter,
            round: Round::unscored(secret, CLASSIC_MAX_NUMBER, CLASSIC_MAX_ATTEMPTS),
            running: false,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn into_output(self) -> W {
        self.prompter.into_parts().1
    }
}

impl<R: BufRead, W: Write> ConsoleGame for ClassicGame<R, W> {
    fn title(&self) -> &str {
        CLASSIC_TITLE
    }

    fn say(&mut self, line: &dyn Display) -> Result<(), InputError> {
        self.prompter.say(line)
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn game_loop(&mut self) -> Result<(), InputError> {
        for line in view::round_intro(&self.round) {
            self.prompter.say(line)?;
        }
        self.prompter.say("")?;

        while self.running && !self.round.is_exhausted() {
            let prompt = format!(
                "Attempt {}/{}: Enter your guess: ",
                self.round.attempts + 1,
                self.round.max_attempts
            );
            let reply = match self.prompter.get_line(&prompt) {
                Ok(reply) => reply,
                Err(InputError::Eof) => return self.quit_game(),
                Err(e) => return Err(e),
            };
            let reply = reply.trim();

            if view::QUIT_REPLIES.iter().any(|q| q.eq_ignore_ascii_case(reply)) {
                return self.quit_game();
            }

            let guess: i64 = match reply.parse() {
                Ok(g) => g,
                Err(_) => {
                    self.prompter
                        .say(theme::danger("❌ Please enter a valid number!"))?;
                    continue;
                }
            };

            let outcome = self.round.guess(guess);
            match view::hint_line(outcome) {
                Some(hint) => self.prompter.say(theme::hint(hint))?,
                None => {
                    self.prompter.say(theme::success(view::win_line(&self.round)))?;
                    self.running = false;
                }
            }

            if outcome != GuessOutcome::Correct && self.round.is_exhausted() {
                self.prompter
                    .say(theme::danger(view::game_over_line(&self.round)))?;
                self.running = false;
            }
        }
        Ok(())
    }
}
