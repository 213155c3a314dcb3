//! Framework showcase: console helpers, state store, input prompts.

use std::io::{BufRead, Write};

use crate::console::{center_text, format_box};
use crate::error::Error;
use crate::input::{InputError, Prompter};
use crate::state::GameState;

/// Walk through each framework feature, writing to the prompter's output.
///
/// `width` sizes the boxes; `size` is the terminal size to report.
pub fn run<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    width: usize,
    size: (u16, u16),
) -> Result<(), Error> {
    write!(
        prompter.writer(),
        "{}",
        format_box("Welcome to G2C Framework Demo", "=", 2, width)
    )?;
    prompter.say("G2C (Game to Console) Framework Demonstration")?;
    prompter.say("=".repeat(50))?;
    prompter.say("")?;

    prompter.say("1. Console Utilities Demo:")?;
    prompter.say(format!("   • Console size: {} x {}", size.0, size.1))?;
    prompter.say(format!(
        "   • Centered text: {}",
        center_text("*** G2C ***", 30)
    ))?;
    prompter.say("")?;

    prompter.say("2. Game State Management Demo:")?;
    let mut state = GameState::new();
    state.set("demo_score", 1000);
    state.set("demo_level", 5);
    prompter.say(format!("   • Score stored: {}", state.get_or("demo_score", 0)))?;
    prompter.say(format!("   • Level stored: {}", state.get_or("demo_level", 0)))?;
    state.save_checkpoint();
    prompter.say("   • State checkpoint saved")?;
    state.set("demo_score", 2000);
    prompter.say(format!("   • Score changed to: {}", state.get_or("demo_score", 0)))?;
    state.restore_checkpoint();
    prompter.say(format!(
        "   • Checkpoint restored, score is back to: {}",
        state.get_or("demo_score", 0)
    ))?;
    prompter.say("")?;

    let try_input = match prompter.get_yes_no("3. Try input handling demo?") {
        Ok(yes) => yes,
        Err(InputError::Eof) => false,
        Err(e) => return Err(e.into()),
    };
    if try_input {
        input_demo(prompter)?;
    }

    prompter.say("")?;
    write!(
        prompter.writer(),
        "{}",
        format_box("G2C Framework Demo Complete!", "=", 2, width)
    )?;
    prompter.say("")?;
    prompter.say("Next steps:")?;
    prompter.say("• Run: g2c classic")?;
    prompter.say("• Run: g2c play")?;
    prompter.say("• Run: cargo run --example state_checkpoints")?;
    Ok(())
}

fn input_demo<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<(), Error> {
    prompter.say("\nInput Handling Demo:")?;

    let name = prompter.get_line("   • Enter your name: ")?;
    let color = prompter.get_choice(
        "   • Choose a color (red/blue/green): ",
        &["red", "blue", "green"],
        false,
    )?;
    let number = prompter.get_number("   • Enter a number (1-10): ", Some(1), Some(10))?;

    prompter.say(format!(
        "\n   Results: Hello {}! You chose {} and number {}",
        name, color, number
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_with(input: &str) -> Result<String, Error> {
        let mut p = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        run(&mut p, 40, (120, 40))?;
        Ok(String::from_utf8(p.into_parts().1).unwrap())
    }

    #[test]
    fn demo_shows_store_round_trip() {
        let out = run_with("n\n").unwrap();
        assert!(out.contains("Console size: 120 x 40"));
        assert!(out.contains("Score stored: 1000"));
        assert!(out.contains("Level stored: 5"));
        assert!(out.contains("Score changed to: 2000"));
        assert!(out.contains("score is back to: 1000"));
        assert!(out.contains("G2C Framework Demo Complete!"));
        assert!(!out.contains("Input Handling Demo"));
    }

    #[test]
    fn demo_input_section() {
        let out = run_with("yes\nAda\nBLUE\n11\n3\n").unwrap();
        assert!(out.contains("Value must be at most 10"));
        assert!(out.contains("Results: Hello Ada! You chose blue and number 3"));
    }

    #[test]
    fn closed_input_skips_input_section() {
        let out = run_with("").unwrap();
        assert!(out.contains("Demo Complete"));
    }

    #[test]
    fn closed_input_mid_section_errors() {
        assert!(matches!(
            run_with("y\nAda\n"),
            Err(Error::Input(InputError::Eof))
        ));
    }
}
