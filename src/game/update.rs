//! Pure state transitions: (Screen, Action) → Transition.
//!
//! Fully testable without a terminal. Each screen defines which actions
//! it accepts; anything else leaves the screen unchanged.

use super::state::{Action, Difficulty, Effect, Round, Screen, Transition};

/// Pure state transition function.
pub fn update(screen: Screen, action: &Action) -> Transition {
    if *action == Action::Quit {
        return Transition::Quit;
    }

    match screen {
        Screen::MainMenu => update_main_menu(action),
        Screen::Setup => update_setup(action),
        Screen::Playing { round } => update_playing(round, action),
        Screen::ConfirmQuit { round } => update_confirm_quit(round, action),
        Screen::RoundOver | Screen::Stats | Screen::About => update_info(screen, action),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Main menu: 1 play, 2 stats, 3 about, 4 quit.
fn update_main_menu(action: &Action) -> Transition {
    match action {
        Action::Number(1) => Transition::Screen(Screen::Setup),
        Action::Number(2) => Transition::Screen(Screen::Stats),
        Action::Number(3) => Transition::Screen(Screen::About),
        Action::Number(4) => Transition::Quit,
        _ => Transition::Screen(Screen::MainMenu),
    }
}

/// Setup: a difficulty number starts the round.
fn update_setup(action: &Action) -> Transition {
    match action {
        Action::Number(n) => match Difficulty::from_choice(*n) {
            Some(difficulty) => Transition::Effect(Effect::StartRound(difficulty)),
            None => Transition::Screen(Screen::Setup),
        },
        _ => Transition::Screen(Screen::Setup),
    }
}

/// Playing: a guess is scored here; bookkeeping is left to the effects layer.
fn update_playing(mut round: Round, action: &Action) -> Transition {
    match action {
        Action::Number(guess) if !round.is_exhausted() => {
            let outcome = round.guess(*guess);
            Transition::Effect(Effect::RecordGuess { round, outcome })
        }
        Action::Interrupt => Transition::Screen(Screen::ConfirmQuit { round }),
        _ => Transition::Screen(Screen::Playing { round }),
    }
}

/// Confirm quit: yes abandons the round, no resumes it.
fn update_confirm_quit(round: Round, action: &Action) -> Transition {
    match action {
        Action::Yes => Transition::Effect(Effect::AbandonRound),
        Action::No => Transition::Screen(Screen::Playing { round }),
        _ => Transition::Screen(Screen::ConfirmQuit { round }),
    }
}

/// Informational screens return to the menu on Enter.
fn update_info(screen: Screen, action: &Action) -> Transition {
    match action {
        Action::Continue => Transition::Screen(Screen::MainMenu),
        _ => Transition::Screen(screen),
    }
}

// ============================================================================
// TESTS
// ============================================================================
