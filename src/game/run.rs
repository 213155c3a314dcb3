//! Game effects boundary: prompts, screen clearing, store bookkeeping.
//!
//! The only module in `game` with side effects. It renders the current
//! screen, reads one answer, turns it into an [`Action`], and feeds it
//! through the pure [`update`] function. Effects returned by `update`
//! are applied to the `GameState` store here.

use std::io::{BufRead, Write};

use rand::Rng;

use crate::console;
use crate::input::{InputError, Prompter};
use crate::state::GameState;

use super::state::{
    Action, Effect, GuessOutcome, KEY_GAMES_PLAYED, KEY_SCORE, KEY_TOTAL_ATTEMPTS, Round, Screen,
    Transition,
};
use super::theme;
use super::update::update;
use super::view;

/// Picks the secret for a round, given the largest allowed number.
pub type SecretSource = Box<dyn FnMut(u32) -> u32>;

/// Secret drawn uniformly from `1..=max`.
pub fn random_secret(max: u32) -> u32 {
    rand::thread_rng().gen_range(1..=max.max(1))
}

/// Menu-driven, scored number guessing game.
pub struct Game<R, W> {
    prompter: Prompter<R, W>,
    state: GameState,
    screen: Screen,
    secret_source: SecretSource,
    /// Pinned header width; None follows the terminal.
    width: Option<usize>,
    clear_between_screens: bool,
}

impl<R: BufRead, W: Write> Game<R, W> {
    /// New game on the main menu with zeroed counters.
    pub fn new(prompter: Prompter<R, W>) -> Self {
        let mut state = GameState::new();
        state.set(KEY_SCORE, 0);
        state.set(KEY_GAMES_PLAYED, 0);
        state.set(KEY_TOTAL_ATTEMPTS, 0);

        Game {
            prompter,
            state,
            screen: Screen::MainMenu,
            secret_source: Box::new(random_secret),
            width: None,
            clear_between_screens: true,
        }
    }

    /// Replace the random secret with a caller-supplied one.
    pub fn with_secret_source(mut self, source: impl FnMut(u32) -> u32 + 'static) -> Self {
        self.secret_source = Box::new(source);
        self
    }

    /// Fix the header width instead of asking the terminal.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Keep previous output on screen between menus.
    pub fn without_clearing(mut self) -> Self {
        self.clear_between_screens = false;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Give back the store and the output writer.
    pub fn into_parts(self) -> (GameState, W) {
        (self.state, self.prompter.into_parts().1)
    }

    /// Run until the player quits or input closes.
    pub fn run(&mut self) -> Result<(), InputError> {
        loop {
            let action = match self.read_action() {
                Ok(action) => action,
                Err(InputError::Eof) => {
                    tracing::info!("input closed, leaving game");
                    Action::Quit
                }
                Err(e) => return Err(e),
            };

            let screen = std::mem::take(&mut self.screen);
            match update(screen, &action) {
                Transition::Screen(next) => self.screen = next,
                Transition::Quit => break,
                Transition::Effect(effect) => self.handle_effect(effect)?,
            }
        }

        self.clear()?;
        self.prompter
            .say("Thanks for playing G2C Number Guessing Game!")?;
        Ok(())
    }

    // ========================================================================
    // RENDER + READ
    // ========================================================================

    /// Draw the current screen and read the player's answer.
    fn read_action(&mut self) -> Result<Action, InputError> {
        match self.screen.clone() {
            Screen::MainMenu => {
                self.clear()?;
                self.header(view::GAME_TITLE)?;
                for line in view::main_menu_lines() {
                    self.prompter.say(theme::interactive(line))?;
                }
                self.prompter.say("")?;
                let choice =
                    self.prompter
                        .get_choice("Enter your choice (1-4): ", &["1", "2", "3", "4"], false)?;
                Ok(choice.parse().map_or(Action::Continue, Action::Number))
            }
            Screen::Setup => {
                self.header("Game Setup")?;
                let [intro, options @ ..] = view::setup_lines();
                self.prompter.say(intro)?;
                for line in options {
                    self.prompter.say(theme::interactive(line))?;
                }
                let n = self
                    .prompter
                    .get_number("Enter choice (1-3): ", Some(1), Some(3))?;
                Ok(Action::Number(n))
            }
            Screen::Playing { round } => {
                let guess = self.prompter.get_number_or_escape(
                    &view::guess_prompt(&round),
                    Some(1),
                    Some(i64::from(round.max_number)),
                    &view::QUIT_REPLIES,
                )?;
                Ok(guess.map_or(Action::Interrupt, Action::Number))
            }
            Screen::ConfirmQuit { .. } => {
                self.prompter.say("")?;
                let yes = self.prompter.get_yes_no("Do you want to quit the game?")?;
                Ok(if yes { Action::Yes } else { Action::No })
            }
            Screen::RoundOver => {
                self.prompter.say("")?;
                self.prompter.pause("Press Enter to return to main menu...")?;
                Ok(Action::Continue)
            }
            Screen::Stats => {
                self.clear()?;
                self.header("Game Statistics")?;
                for line in view::stats_lines(&self.state) {
                    self.prompter.say(line)?;
                }
                self.prompter.say("")?;
                self.prompter.pause("Press Enter to continue...")?;
                Ok(Action::Continue)
            }
            Screen::About => {
                self.clear()?;
                self.header("About G2C Framework")?;
                self.prompter.say(view::about_text())?;
                self.prompter.say("")?;
                self.prompter.pause("Press Enter to continue...")?;
                Ok(Action::Continue)
            }
        }
    }

    // ========================================================================
    // EFFECT HANDLING
    // ========================================================================

    fn handle_effect(&mut self, effect: Effect) -> Result<(), InputError> {
        match effect {
            Effect::StartRound(difficulty) => {
                let max = difficulty.max_number();
                let secret = (self.secret_source)(max).clamp(1, max);
                self.state.save_checkpoint();

                let round = Round::new(difficulty, secret);
                tracing::info!(%difficulty, "round started");

                self.clear()?;
                self.header(&view::round_title(&round))?;
                for line in view::round_intro(&round) {
                    self.prompter.say(line)?;
                }
                self.prompter.say("")?;
                self.screen = Screen::Playing { round };
            }
            Effect::RecordGuess { round, outcome } => {
                self.state.increment(KEY_TOTAL_ATTEMPTS, 1);
                self.screen = self.record_guess(round, outcome)?;
            }
            Effect::AbandonRound => {
                self.state.restore_checkpoint();
                tracing::info!("round abandoned, store rolled back");
                self.prompter
                    .say(theme::hint("Round abandoned. Its attempts were not counted."))?;
                self.screen = Screen::RoundOver;
            }
        }
        Ok(())
    }

    /// Report a guess and book a finished round. Returns the next screen.
    fn record_guess(&mut self, round: Round, outcome: GuessOutcome) -> Result<Screen, InputError> {
        if let Some(hint) = view::hint_line(outcome) {
            self.prompter.say(theme::hint(hint))?;
            if !round.is_exhausted() {
                return Ok(Screen::Playing { round });
            }
            self.prompter.say(theme::danger(view::game_over_line(&round)))?;
            self.state.increment(KEY_GAMES_PLAYED, 1);
            tracing::info!(attempts = round.attempts, "round lost");
            return Ok(Screen::RoundOver);
        }

        let points = round.points();
        self.state.increment(KEY_SCORE, points as i64);
        self.state.increment(KEY_GAMES_PLAYED, 1);
        tracing::info!(attempts = round.attempts, points, "round won");

        self.prompter.say(theme::success(view::win_line(&round)))?;
        self.prompter.say(theme::success(view::points_line(points)))?;
        Ok(Screen::RoundOver)
    }

    fn clear(&mut self) -> Result<(), InputError> {
        if self.clear_between_screens {
            console::clear(self.prompter.writer())?;
        }
        Ok(())
    }

    /// Width for header boxes, asked of the terminal on every call
    /// unless pinned.
    fn header_width(&self) -> usize {
        self.width.unwrap_or_else(console::width)
    }

    fn header(&mut self, title: &str) -> Result<(), InputError> {
        let boxed = view::header(title, self.header_width());
        write!(self.prompter.writer(), "{}", theme::important(boxed))?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn game(input: &str, secret: u32) -> Game<Cursor<Vec<u8>>, Vec<u8>> {
        let prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        Game::new(prompter)
            .with_secret_source(move |_| secret)
            .with_width(40)
            .without_clearing()
    }

    fn finish(game: Game<Cursor<Vec<u8>>, Vec<u8>>) -> (GameState, String) {
        let (state, out) = game.into_parts();
        (state, String::from_utf8(out).unwrap())
    }

    #[test]
    fn fresh_game_has_zeroed_counters() {
        let g = game("", 1);
        assert_eq!(g.state().get_u64(KEY_SCORE), Some(0));
        assert_eq!(g.state().get_u64(KEY_GAMES_PLAYED), Some(0));
        assert_eq!(g.state().get_u64(KEY_TOTAL_ATTEMPTS), Some(0));
        assert_eq!(g.screen(), &Screen::MainMenu);
    }

    #[test]
    fn quit_from_menu() {
        let mut g = game("4\n", 1);
        g.run().unwrap();
        let (_, out) = finish(g);
        assert!(out.contains("1. Play Game"));
        assert!(out.contains("Thanks for playing"));
    }

    #[test]
    fn closed_input_leaves_cleanly() {
        let mut g = game("", 1);
        assert!(g.run().is_ok());
    }

    #[test]
    fn stats_screen_shows_counters() {
        let mut g = game("2\n\n4\n", 1);
        g.run().unwrap();
        let (_, out) = finish(g);
        assert!(out.contains("Game Statistics"));
        assert!(out.contains("Games Played: 0"));
        assert!(!out.contains("Average Attempts"));
    }

    #[test]
    fn about_screen_describes_framework() {
        let mut g = game("3\n\n4\n", 1);
        g.run().unwrap();
        let (_, out) = finish(g);
        assert!(out.contains("Game state management with checkpoints"));
    }

    #[test]
    fn winning_round_scores_points() {
        // Medium, secret 42: one miss then a hit on attempt 2.
        let mut g = game("1\n2\n10\n42\n\n4\n", 42);
        g.run().unwrap();
        let (state, out) = finish(g);

        assert!(out.contains("Medium Mode"));
        assert!(out.contains("Too low"));
        assert!(out.contains("You guessed it in 2 attempts"));
        assert!(out.contains("You earned 120 points"));
        assert_eq!(state.get_u64(KEY_SCORE), Some(120));
        assert_eq!(state.get_u64(KEY_GAMES_PLAYED), Some(1));
        assert_eq!(state.get_u64(KEY_TOTAL_ATTEMPTS), Some(2));
    }

    #[test]
    fn losing_round_counts_game_without_points() {
        let mut g = game("1\n3\n1\n2\n3\n4\n5\n\n4\n", 150);
        g.run().unwrap();
        let (state, out) = finish(g);

        assert!(out.contains("Game over! The number was 150"));
        assert_eq!(state.get_u64(KEY_SCORE), Some(0));
        assert_eq!(state.get_u64(KEY_GAMES_PLAYED), Some(1));
        assert_eq!(state.get_u64(KEY_TOTAL_ATTEMPTS), Some(5));
    }

    #[test]
    fn out_of_range_guess_is_reprompted_without_cost() {
        let mut g = game("1\n1\n99\n7\n\n4\n", 7);
        g.run().unwrap();
        let (state, out) = finish(g);

        assert!(out.contains("Value must be at most 50"));
        assert_eq!(state.get_u64(KEY_TOTAL_ATTEMPTS), Some(1));
        assert_eq!(state.get_u64(KEY_SCORE), Some(100));
    }

    #[test]
    fn abandoned_round_rolls_back_store() {
        let mut g = game("1\n1\n5\n6\nq\ny\n\n4\n", 30);
        g.run().unwrap();
        let (state, out) = finish(g);

        assert!(out.contains("Do you want to quit the game? (y/n): "));
        assert!(out.contains("Round abandoned"));
        assert_eq!(state.get_u64(KEY_TOTAL_ATTEMPTS), Some(0));
        assert_eq!(state.get_u64(KEY_GAMES_PLAYED), Some(0));
        assert_eq!(state.checkpoint_count(), 1);
    }

    #[test]
    fn declining_quit_resumes_round() {
        let mut g = game("1\n1\nquit\nn\n30\n\n4\n", 30);
        g.run().unwrap();
        let (state, _) = finish(g);

        assert_eq!(state.get_u64(KEY_SCORE), Some(100));
        assert_eq!(state.get_u64(KEY_TOTAL_ATTEMPTS), Some(1));
    }

    #[test]
    fn later_rounds_keep_earlier_progress_after_abandon() {
        // Win an Easy round first try, then abandon a second round.
        let mut g = game("1\n1\n30\n\n1\n1\n2\nq\ny\n\n4\n", 30);
        g.run().unwrap();
        let (state, _) = finish(g);

        assert_eq!(state.get_u64(KEY_SCORE), Some(100));
        assert_eq!(state.get_u64(KEY_GAMES_PLAYED), Some(1));
        assert_eq!(state.get_u64(KEY_TOTAL_ATTEMPTS), Some(1));
        assert_eq!(state.checkpoint_count(), 2);
    }

    #[test]
    fn secret_is_clamped_into_range() {
        let mut g = game("1\n1\n50\n\n4\n", 500);
        g.run().unwrap();
        let (state, _) = finish(g);
        assert_eq!(state.get_u64(KEY_SCORE), Some(100));
    }

    #[test]
    fn random_secret_stays_in_bounds() {
        for _ in 0..200 {
            let s = random_secret(5);
            assert!((1..=5).contains(&s));
        }
        assert_eq!(random_secret(0), 1);
    }

    #[test]
    fn header_width_follows_terminal_unless_pinned() {
        let prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        let unpinned = Game::new(prompter);
        assert_eq!(unpinned.width, None);
        assert_eq!(unpinned.header_width(), console::width());

        let pinned = game("", 1);
        assert_eq!(pinned.header_width(), 40);
    }

    #[test]
    fn pinned_width_sizes_every_header() {
        let mut g = game("2\n\n4\n", 1);
        g.run().unwrap();
        let (_, out) = finish(g);
        let rule = "=".repeat(40);
        assert!(out.contains(&format!("{}\n", rule)));
        assert!(!out.contains(&"=".repeat(41)));
    }
}
