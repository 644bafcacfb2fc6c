//! Form payloads exchanged with the messaging platform.
//!
//! Outgoing forms are built from [`Control`]s. Incoming submissions arrive as an ordered list of
//! [`Field`]s which are decoded against a fixed schema: a setup form is a `title` field followed by
//! question slots of exactly [`SLOT_FIELDS`] fields each, always in the same order.

use crate::{quiz::CHOICES, ConversationId};
use alloc::{format, string::String, vec::Vec};
use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

/// Number of fields making up one question slot of the setup form.
pub const SLOT_FIELDS: usize = 2 + CHOICES;

/// Name of the single field on an answerable question form.
pub const ANSWER_FIELD: &str = "answer";

/// Name of the leading field of the setup form.
pub const TITLE_FIELD: &str = "title";

const CHOICE_SUFFIXES: [char; CHOICES] = ['a', 'b', 'c', 'd'];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Identifies which flow a submitted form belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormKey {
    /// The setup prompt answered by the creator after the initial mention.
    Prompt(u64),
    /// The question setup form of the session running in the given conversation.
    Setup(ConversationId),
    /// An answerable question of the session running in the given conversation.
    Question(ConversationId, u32),
}

impl FormKey {
    pub fn parse(id: &str) -> Option<Self> {
        if let Some(nonce) = id.strip_prefix("prompt:") {
            return nonce.parse().ok().map(Self::Prompt);
        }

        if let Some(conversation) = id.strip_prefix("setup:") {
            return (!conversation.is_empty()).then(|| Self::Setup(conversation.into()));
        }

        let rest = id.strip_prefix("question:")?;
        let (conversation, question) = rest.rsplit_once(':')?;
        if conversation.is_empty() {
            return None;
        }
        let question = question.parse().ok()?;
        Some(Self::Question(conversation.into(), question))
    }
}

impl Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt(nonce) => write!(f, "prompt:{nonce}"),
            Self::Setup(conversation) => write!(f, "setup:{conversation}"),
            Self::Question(conversation, question) => write!(f, "question:{conversation}:{question}"),
        }
    }
}

/// Field names of the `n`th (one-based) slot in schema order.
pub fn slot_names(n: usize) -> [String; SLOT_FIELDS] {
    let [a, b, c, d] = CHOICE_SUFFIXES.map(|suffix| format!("choice{n}{suffix}"));
    [format!("question{n}"), a, b, c, d, format!("answer{n}")]
}

/// Raw contents of one question slot, exactly as the creator typed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot {
    pub prompt: String,
    pub choices: [String; CHOICES],
    /// Correct-choice selector, expected to be one of `"0"` to `"3"`.
    pub answer: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetupFields {
    pub title: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// The submission does not carry the number of fields the form was rendered with.
    Length { expected: usize, found: usize },
    /// The field at this position does not carry the expected name.
    Field { position: usize, expected: String },
}

fn expect_name(fields: &[Field], position: usize, expected: &str) -> Result<(), SchemaError> {
    if fields[position].name == expected {
        Ok(())
    } else {
        Err(SchemaError::Field { position, expected: expected.into() })
    }
}

impl SetupFields {
    /// Decodes a setup form that was rendered with `slots` question slots.
    pub fn decode(fields: &[Field], slots: usize) -> Result<Self, SchemaError> {
        let expected = 1 + slots * SLOT_FIELDS;
        if fields.len() != expected {
            return Err(SchemaError::Length { expected, found: fields.len() });
        }

        expect_name(fields, 0, TITLE_FIELD)?;
        let title = fields[0].value.clone();

        let mut decoded = Vec::with_capacity(slots);
        for (n, chunk) in (1..).zip(fields[1..].chunks_exact(SLOT_FIELDS)) {
            let offset = 1 + (n - 1) * SLOT_FIELDS;
            for (k, name) in slot_names(n).iter().enumerate() {
                expect_name(fields, offset + k, name)?;
            }
            let [prompt, a, b, c, d, answer] = chunk else {
                unreachable!("chunks are exactly one slot wide");
            };
            decoded.push(Slot {
                prompt: prompt.value.clone(),
                choices: [a.value.clone(), b.value.clone(), c.value.clone(), d.value.clone()],
                answer: answer.value.clone(),
            });
        }

        Ok(Self { title, slots: decoded })
    }
}

/// Fields of the setup prompt, looked up by name. Absent fields decode as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptFields {
    pub conversation: String,
    pub thread: String,
    pub questions: String,
    pub points: String,
}

impl PromptFields {
    pub const CONVERSATION: &'static str = "conversation";
    pub const THREAD: &'static str = "thread";
    pub const QUESTIONS: &'static str = "questions";
    pub const POINTS: &'static str = "points";

    pub fn decode(fields: &[Field]) -> Self {
        let mut decoded = Self::default();
        for Field { name, value } in fields {
            let target = match name.as_str() {
                Self::CONVERSATION => &mut decoded.conversation,
                Self::THREAD => &mut decoded.thread,
                Self::QUESTIONS => &mut decoded.questions,
                Self::POINTS => &mut decoded.points,
                _ => continue,
            };
            target.clone_from(value);
        }
        decoded
    }

    /// Requested number of question slots, clamped to `1..=max`.
    pub fn question_count(&self, default: usize, max: usize) -> usize {
        self.questions.trim().parse().map_or(default, |count: usize| count.clamp(1, max))
    }

    /// Whether scores and winners should be computed. Defaults to `true`.
    pub fn award_points(&self) -> bool {
        !matches!(self.points.trim().to_ascii_lowercase().as_str(), "false" | "no" | "off" | "0")
    }
}

/// An outgoing form widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Form {
    pub id: String,
    pub title: String,
    pub controls: Vec<Control>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Control {
    Label {
        text: String,
    },
    Input {
        name: String,
        text: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        value: String,
    },
    RadioGroup {
        name: String,
        text: String,
        options: Vec<Choice>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Button {
        options: Vec<Action>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub text: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Action {
    pub text: String,
    pub action: String,
    pub notification: String,
}
