//! Pre-authored question sets supplied as a JSON attachment instead of the setup form.
//!
//! The document is an array of entries shaped like
//! `{"question": "...", "answers": ["a", "b", "c", "d"], "answer": "0"}`. Missing fields are
//! tolerated at deserialization time so that [`validate`] can report them uniformly.

use crate::quiz::{self, Question, CHOICES, MAX_LENGTH};
use alloc::{string::String, vec::Vec};
use serde::Deserialize;

/// Index of the correct answer, written either as `"2"` or as `2`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Number(u64),
    Text(String),
}

impl AnswerKey {
    pub fn index(&self) -> Option<u8> {
        match self {
            Self::Number(num) => u8::try_from(*num).ok().filter(|&num| usize::from(num) < CHOICES),
            Self::Text(text) => quiz::parse_answer(text),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PremadeEntry {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub answer: Option<AnswerKey>,
}

impl PremadeEntry {
    fn is_valid(&self) -> bool {
        let question = self.question.trim();
        if question.is_empty() || question.chars().count() > MAX_LENGTH {
            return false;
        }

        if self.answers.len() != CHOICES {
            return false;
        }

        let mut answers = self.answers.iter().map(|answer| answer.trim());
        if answers.any(|answer| answer.is_empty() || answer.chars().count() > MAX_LENGTH) {
            return false;
        }

        self.answer.as_ref().and_then(AnswerKey::index).is_some()
    }
}

/// Checks the shape of a premade quiz. An absent document is never valid.
pub fn validate(doc: Option<&[PremadeEntry]>) -> bool {
    doc.is_some_and(|entries| entries.iter().all(PremadeEntry::is_valid))
}

/// Converts an already-validated document into questions. Returns `None` if any entry is malformed.
pub fn into_questions(doc: Vec<PremadeEntry>) -> Option<Vec<Question>> {
    doc.into_iter()
        .zip(1..)
        .map(|(entry, id)| {
            if !entry.is_valid() {
                return None;
            }
            let answer = entry.answer.as_ref()?.index()?;
            let mut answers = entry.answers.into_iter().map(|answer| String::from(answer.trim()));
            let choices = [answers.next()?, answers.next()?, answers.next()?, answers.next()?];
            Some(Question { id, prompt: String::from(entry.question.trim()), choices, answer })
        })
        .collect()
}
