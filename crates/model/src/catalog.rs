use crate::{
    form::Slot,
    quiz::{self, Question, Validity},
};
use alloc::{string::String, vec::Vec};

/// Reason a setup form could not be turned into a catalog. Carries the one-based slot number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotError {
    Incomplete(usize),
    TooLong(usize),
}

/// Builds the ordered question list from decoded setup slots. Blank slots are skipped and the
/// remaining questions are numbered consecutively. Any partially filled slot rejects the whole form.
pub fn from_slots(slots: &[Slot]) -> Result<Vec<Question>, SlotError> {
    let mut questions = Vec::new();
    for (number, Slot { prompt, choices, answer }) in (1..).zip(slots) {
        match quiz::validate_question(prompt, choices) {
            Validity::Blank => continue,
            Validity::Incomplete => return Err(SlotError::Incomplete(number)),
            Validity::TooLong => return Err(SlotError::TooLong(number)),
            Validity::Valid => (),
        }

        let answer = quiz::parse_answer(answer).ok_or(SlotError::Incomplete(number))?;
        let id = u32::try_from(questions.len() + 1).map_err(|_| SlotError::TooLong(number))?;
        questions.push(Question {
            id,
            prompt: String::from(prompt.trim()),
            choices: choices.clone().map(|choice| String::from(choice.trim())),
            answer,
        });
    }
    Ok(questions)
}
