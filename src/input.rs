//! Validated line-based prompts.
//!
//! `Prompter` owns a reader and a writer so every loop here can run
//! against in-memory buffers in tests and against stdin/stdout for real.
//! Each prompt re-asks until the reply is valid; only end of input or an
//! I/O failure breaks the loop.

use std::fmt;
use std::io::{self, BufRead, Read, Stdout, Write};

use thiserror::Error;

/// Replies accepted by [`Prompter::get_yes_no`].
pub const YES_NO_CHOICES: [&str; 4] = ["y", "yes", "n", "no"];

/// Why a prompt could not produce an answer.
#[derive(Debug, Error)]
pub enum InputError {
    /// The reader hit end of input before a valid reply arrived.
    #[error("input closed before a valid answer was given")]
    Eof,
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// LINE READER
// ============================================================================

/// Fills the buffer with one more line, returning the bytes read.
pub type LineSource = Box<dyn FnMut(&mut Vec<u8>) -> io::Result<usize>>;

/// Buffered reader that pulls exactly one line from its source at a time.
///
/// Nothing past the current line is buffered, so several readers over the
/// same source can take turns. For stdin the lock is held only while a
/// line is being read.
pub struct LineReader {
    source: LineSource,
    buf: Vec<u8>,
    pos: usize,
}

impl LineReader {
    pub fn new(source: impl FnMut(&mut Vec<u8>) -> io::Result<usize> + 'static) -> Self {
        LineReader {
            source: Box::new(source),
            buf: Vec::new(),
            pos: 0,
        }
    }

    /// Reader over the process's stdin.
    pub fn stdin() -> Self {
        LineReader::new(|buf| io::stdin().lock().read_until(b'\n', buf))
    }
}

impl fmt::Debug for LineReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineReader")
            .field("buffered", &(self.buf.len() - self.pos))
            .finish_non_exhaustive()
    }
}

impl Read for LineReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for LineReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.buf.len() {
            self.buf.clear();
            self.pos = 0;
            (self.source)(&mut self.buf)?;
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.buf.len());
    }
}

// ============================================================================
// PROMPTER
// ============================================================================

/// Prompt/answer loop over a reader and a writer.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl Prompter<LineReader, Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    ///
    /// Holds no lock between prompts, so other prompters (or the free
    /// [`get_yes_no`]) may run on the same thread while this one lives.
    pub fn stdio() -> Self {
        Prompter::new(LineReader::stdin(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Prompter { reader, writer }
    }

    /// Borrow the output side, for callers that interleave plain output.
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Give back the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Write `msg` followed by a newline.
    pub fn say(&mut self, msg: impl std::fmt::Display) -> Result<(), InputError> {
        writeln!(self.writer, "{}", msg)?;
        Ok(())
    }

    /// Show `prompt` and read one line, without its line terminator.
    pub fn get_line(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::Eof);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    /// Wait for the user to press Enter.
    pub fn pause(&mut self, prompt: &str) -> Result<(), InputError> {
        self.get_line(prompt).map(|_| ())
    }

    /// Ask until the reply is one of `choices`.
    ///
    /// In case-insensitive mode both the reply and the choices are
    /// lowercased, and the lowercased reply is returned.
    pub fn get_choice(
        &mut self,
        prompt: &str,
        choices: &[&str],
        case_sensitive: bool,
    ) -> Result<String, InputError> {
        let choices: Vec<String> = if case_sensitive {
            choices.iter().map(|c| c.to_string()).collect()
        } else {
            choices.iter().map(|c| c.to_lowercase()).collect()
        };

        loop {
            let mut reply = self.get_line(prompt)?;
            if !case_sensitive {
                reply = reply.to_lowercase();
            }

            if choices.contains(&reply) {
                return Ok(reply);
            }
            tracing::debug!(%reply, "rejected choice");
            self.say(format!(
                "Invalid choice. Please choose from: {}",
                choices.join(", ")
            ))?;
        }
    }

    /// Ask until the reply is an integer within the optional bounds.
    pub fn get_number(
        &mut self,
        prompt: &str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<i64, InputError> {
        loop {
            if let Some(value) = self.get_number_or_escape(prompt, min, max, &[])? {
                return Ok(value);
            }
        }
    }

    /// Like [`get_number`](Self::get_number), but a reply matching one of
    /// `escapes` (case-insensitive, surrounding whitespace ignored)
    /// returns `None` instead of re-prompting.
    pub fn get_number_or_escape(
        &mut self,
        prompt: &str,
        min: Option<i64>,
        max: Option<i64>,
        escapes: &[&str],
    ) -> Result<Option<i64>, InputError> {
        loop {
            let reply = self.get_line(prompt)?;
            let reply = reply.trim();

            if escapes.iter().any(|e| e.eq_ignore_ascii_case(reply)) {
                return Ok(None);
            }

            match validate_number(reply, min, max) {
                Ok(value) => return Ok(Some(value)),
                Err(msg) => self.say(msg)?,
            }
        }
    }

    /// Ask a yes/no question. Accepts y, yes, n, no in any case.
    pub fn get_yes_no(&mut self, prompt: &str) -> Result<bool, InputError> {
        let choice = self.get_choice(&format!("{} (y/n): ", prompt), &YES_NO_CHOICES, false)?;
        Ok(matches!(choice.as_str(), "y" | "yes"))
    }
}

/// Parse `reply` as an integer and check it against the bounds.
///
/// Returns the message to show the user on failure.
pub fn validate_number(reply: &str, min: Option<i64>, max: Option<i64>) -> Result<i64, String> {
    let value: i64 = reply
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid number.".to_string())?;

    if let Some(min) = min {
        if value < min {
            return Err(format!("Value must be at least {}", min));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(format!("Value must be at most {}", max));
        }
    }
    Ok(value)
}

/// Ask a yes/no question on stdin/stdout.
///
/// Safe to call while a [`Prompter::stdio`] is alive; neither keeps
/// stdin locked between lines.
pub fn get_yes_no(prompt: &str) -> Result<bool, InputError> {
    Prompter::stdio().get_yes_no(prompt)
}

// ============================================================================
// TESTS
// ============================================================================
