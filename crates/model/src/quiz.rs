use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Maximum number of characters in a prompt or in any single choice.
pub const MAX_LENGTH: usize = 256;

/// Every question offers exactly this many choices.
pub const CHOICES: usize = 4;

/// A single multiple-choice question within a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    /// One-based position of the question within its session.
    pub id: u32,
    /// Text to be displayed in chat.
    pub prompt: String,
    /// Possible answers to select from.
    pub choices: [String; CHOICES],
    /// Index of the selection with the correct answer.
    pub answer: u8,
}

impl Question {
    pub fn correct(&self) -> &str {
        &self.choices[usize::from(self.answer)]
    }
}

/// Outcome of checking one question slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    /// Nothing was filled in. The slot is skipped.
    Blank,
    Valid,
    /// Some but not all of the fields were filled in.
    Incomplete,
    /// Every field is present but at least one exceeds [`MAX_LENGTH`].
    TooLong,
}

fn too_long(text: &str) -> bool {
    text.chars().count() > MAX_LENGTH
}

pub fn validate_question<S: AsRef<str>>(prompt: &str, choices: &[S; CHOICES]) -> Validity {
    let prompt = prompt.trim();
    let filled = choices.iter().filter(|choice| !choice.as_ref().trim().is_empty()).count();
    match (prompt.is_empty(), filled) {
        (true, 0) => return Validity::Blank,
        (false, CHOICES) => (),
        _ => return Validity::Incomplete,
    }

    if too_long(prompt) || choices.iter().any(|choice| too_long(choice.as_ref().trim())) {
        Validity::TooLong
    } else {
        Validity::Valid
    }
}

/// Parses a correct-choice selector such as `"2"`.
pub fn parse_answer(selector: &str) -> Option<u8> {
    let index = selector.trim().parse().ok()?;
    (usize::from(index) < CHOICES).then_some(index)
}
