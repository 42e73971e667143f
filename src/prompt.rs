//! Prompting for replacement values.
//!
//! Whenever a caller-supplied value fails validation the pipeline asks a
//! [`Prompt`] for a replacement until one validates or the user types an
//! abort token. The console implementation lives in the CLI; tests and
//! unattended runs use [`ScriptedPrompt`].

use crate::error::{Error, Result};
use std::collections::VecDeque;
use tracing::debug;

/// Answer that cancels the comparison (matched case-insensitively).
pub const ABORT_TOKENS: [&str; 2] = ["x", "exit"];

/// Source of answers to interactive questions.
pub trait Prompt {
    /// Ask for a line of text.
    fn ask(&mut self, message: &str) -> Result<String>;

    /// Ask a yes/no question, falling back to `default`.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn ask(&mut self, message: &str) -> Result<String> {
        (**self).ask(message)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        (**self).confirm(message, default)
    }
}

/// Whether an answer asks to cancel the comparison.
pub fn is_abort_token(text: &str) -> bool {
    let text = text.trim();
    ABORT_TOKENS.iter().any(|t| text.eq_ignore_ascii_case(t))
}

/// Outcome of checking one candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T, R> {
    /// The value is usable.
    Valid(T),
    /// The value was rejected for the given reason.
    Invalid(R),
    /// The user asked to cancel.
    Aborted,
}

impl<T, R> Validation<T, R> {
    /// Check if the value is usable.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }
}

/// Screen a typed answer: abort tokens first, then the validator.
pub fn screen_answer<T, R>(
    answer: &str,
    validate: impl FnOnce(&str) -> Validation<T, R>,
) -> Validation<T, R> {
    if is_abort_token(answer) {
        Validation::Aborted
    } else {
        validate(answer)
    }
}

/// Ask until an answer validates.
///
/// `message` receives the previous rejection reason (`None` on the first
/// question). An abort token ends the loop with [`Error::Aborted`].
pub fn prompt_until_valid<T, R: std::fmt::Debug>(
    prompt: &mut dyn Prompt,
    mut message: impl FnMut(Option<&R>) -> String,
    mut validate: impl FnMut(&str) -> Validation<T, R>,
) -> Result<T> {
    let mut rejection: Option<R> = None;

    loop {
        let answer = prompt.ask(&message(rejection.as_ref()))?;

        match screen_answer(&answer, &mut validate) {
            Validation::Valid(value) => return Ok(value),
            Validation::Invalid(reason) => {
                debug!(answer = %answer, reason = ?reason, "rejected prompt answer");
                rejection = Some(reason);
            }
            Validation::Aborted => return Err(Error::Aborted),
        }
    }
}

/// A prompt that replays pre-supplied answers.
///
/// Once the text answers run out it answers `exit`; once the confirmations
/// run out it returns the question's default.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt with the given text answers.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Queue answers for yes/no questions.
    pub fn with_confirmations(mut self, confirmations: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(confirmations);
        self
    }

    /// Every message asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Text answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        Ok(self
            .answers
            .pop_front()
            .unwrap_or_else(|| ABORT_TOKENS[1].to_string()))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        self.asked.push(message.to_string());
        Ok(self.confirmations.pop_front().unwrap_or(default))
    }
}
