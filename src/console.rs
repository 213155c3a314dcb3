//! Terminal primitives and text layout.
//!
//! Structure:
//! - Pure functions: centering, box layout (text in, `String` out)
//! - Effect functions: size lookup, clearing, printing to stdout
//!
//! Widths are counted in `char`s, not bytes or display cells.

use std::io::{self, Write};

use crossterm::ExecutableCommand;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{self, Clear, ClearType};

/// Size reported when no terminal is attached (piped output, CI).
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Border glyph used by [`print_header`].
pub const HEADER_BORDER: &str = "=";

/// Horizontal padding used by [`print_header`].
pub const HEADER_PADDING: usize = 2;

// ============================================================================
// PURE LAYOUT
// ============================================================================

/// Center `text` in a field of `width` chars.
///
/// When the surplus is odd, the extra space goes left only if `width` is
/// odd too.
/// Text already wider than `width` is returned unchanged.
pub fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    let right = margin - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Left-justify `text` in a field of `width` chars. Never truncates.
pub fn ljust(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - len))
}

/// Lay `text` out inside a box drawn with `border`.
///
/// The box is `width` border glyphs wide. Each input line becomes one row
/// framed by a single glyph on each side. Lines that fit in the content
/// area (`width - 2 * padding - 2`) are centered across the inner width;
/// longer lines are word-wrapped and left-justified. Every row, including
/// the closing border, ends with a newline.
pub fn format_box(text: &str, border: &str, padding: usize, width: usize) -> String {
    let content_width = width.saturating_sub(2 * padding + 2);
    let inner_width = width.saturating_sub(2);
    let rule = border.repeat(width);

    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');

    for line in text.split('\n') {
        if line.chars().count() > content_width {
            for wrapped in wrap_words(line, content_width) {
                push_row(&mut out, border, &ljust(&wrapped, inner_width));
            }
        } else {
            push_row(&mut out, border, &center_text(line, inner_width));
        }
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// Greedy word wrap.
///
/// Each produced row keeps the trailing space after its last word, so
/// rows read as `"word word "`. A single word longer than `limit` gets a
/// row of its own.
pub fn wrap_words(line: &str, limit: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let candidate_len = current.chars().count() + word.chars().count();
        if candidate_len > limit && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        current.push_str(word);
        current.push(' ');
    }

    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

fn push_row(out: &mut String, border: &str, body: &str) {
    out.push_str(border);
    out.push_str(body);
    out.push_str(border);
    out.push('\n');
}

// ============================================================================
// TERMINAL EFFECTS
// ============================================================================

/// Terminal size as (columns, rows), or [`FALLBACK_SIZE`] when unknown.
pub fn size() -> (u16, u16) {
    match terminal::size() {
        Ok((0, _)) | Ok((_, 0)) | Err(_) => FALLBACK_SIZE,
        Ok(dims) => dims,
    }
}

/// Terminal width in columns.
pub fn width() -> usize {
    size().0 as usize
}

/// Clear the screen behind `out` and move the cursor home.
pub fn clear<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    out.execute(Clear(ClearType::All))?.execute(MoveTo(0, 0))?;
    Ok(())
}

/// Write `text` in a box spanning the terminal width.
pub fn write_box<W: Write + ?Sized>(
    out: &mut W,
    text: &str,
    border: &str,
    padding: usize,
) -> io::Result<()> {
    out.write_all(format_box(text, border, padding, width()).as_bytes())
}

/// Write a `=` box around `title`.
pub fn write_header<W: Write + ?Sized>(out: &mut W, title: &str) -> io::Result<()> {
    write_box(out, title, HEADER_BORDER, HEADER_PADDING)
}

// ============================================================================
// STDOUT CONVENIENCE
// ============================================================================

/// Clear the terminal.
pub fn clear_screen() -> io::Result<()> {
    clear(&mut io::stdout())
}

/// Print `text` in a box spanning the terminal width.
pub fn print_box(text: &str, border: &str, padding: usize) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_box(&mut stdout, text, border, padding)?;
    stdout.flush()
}

/// Print a formatted header box.
pub fn print_header(title: &str) -> io::Result<()> {
    print_box(title, HEADER_BORDER, HEADER_PADDING)
}

// ============================================================================
// TESTS
// ============================================================================
