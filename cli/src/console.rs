//! Interactive prompt on the terminal.

use colored::*;
use indicatif::ProgressBar;
use std::io::{self, BufRead, Write};
use xlcompare::prompt::{Prompt, ABORT_TOKENS};

/// Asks questions on stdout and reads answers from stdin.
///
/// While a spinner is attached it is hidden for the duration of each
/// question. End of input answers as the abort token.
#[derive(Default)]
pub struct ConsolePrompt {
    spinner: Option<ProgressBar>,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach or detach the spinner to hide while asking.
    pub fn set_spinner(&mut self, spinner: Option<ProgressBar>) {
        self.spinner = spinner;
    }

    fn with_spinner_hidden<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.spinner {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

/// Print a question and read one line; `None` at end of input.
fn read_answer(message: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", message.black().on_yellow())?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Interpret a yes/no answer; `None` when it is neither.
fn parse_confirmation(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl Prompt for ConsolePrompt {
    fn ask(&mut self, message: &str) -> xlcompare::Result<String> {
        let answer = self.with_spinner_hidden(|| read_answer(message))?;
        Ok(answer.unwrap_or_else(|| ABORT_TOKENS[1].to_string()))
    }

    fn confirm(&mut self, message: &str, default: bool) -> xlcompare::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let question = format!("{} {}", message, hint);

        loop {
            let answer = self.with_spinner_hidden(|| read_answer(&question))?;
            let Some(answer) = answer else {
                return Ok(default);
            };
            if let Some(choice) = parse_confirmation(&answer, default) {
                return Ok(choice);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation("", false), Some(false));
        assert_eq!(parse_confirmation("  ", true), Some(true));
        assert_eq!(parse_confirmation("Y", false), Some(true));
        assert_eq!(parse_confirmation("yes", false), Some(true));
        assert_eq!(parse_confirmation("No", true), Some(false));
        assert_eq!(parse_confirmation("maybe", true), None);
    }
}
