//! Color semantics for game output.
//!
//! - Green: win, points earned
//! - Yellow: hints (too low / too high)
//! - Red: loss, rejected input
//! - Cyan: prompts and menu keys
//! - Bold: titles and totals

use std::fmt::Display;

use crossterm::style::{Color, StyledContent, Stylize, style};

/// Win / points earned.
pub fn success<D: Display>(content: D) -> StyledContent<D> {
    style(content).with(Color::Green)
}

/// Hint after a wrong guess.
pub fn hint<D: Display>(content: D) -> StyledContent<D> {
    style(content).with(Color::Yellow)
}

/// Loss / game over.
pub fn danger<D: Display>(content: D) -> StyledContent<D> {
    style(content).with(Color::Red)
}

/// Menu keys and other interactive elements.
pub fn interactive<D: Display>(content: D) -> StyledContent<D> {
    style(content).with(Color::Cyan)
}

/// Titles and totals.
pub fn important<D: Display>(content: D) -> StyledContent<D> {
    style(content).bold()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Attribute;

    #[test]
    fn semantic_styles_have_expected_colors() {
        assert_eq!(success("x").style().foreground_color, Some(Color::Green));
        assert_eq!(hint("x").style().foreground_color, Some(Color::Yellow));
        assert_eq!(danger("x").style().foreground_color, Some(Color::Red));
        assert_eq!(interactive("x").style().foreground_color, Some(Color::Cyan));
    }

    #[test]
    fn important_style_is_bold() {
        assert!(important("x").style().attributes.has(Attribute::Bold));
    }

    #[test]
    fn styled_content_keeps_text() {
        assert_eq!(*success("won").content(), "won");
    }
}
