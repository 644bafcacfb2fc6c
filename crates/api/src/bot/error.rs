use crate::gateway::RemoteError;
use core::fmt::{self, Display};
use model::quiz::MAX_LENGTH;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// One-based number of the offending question slot.
    Incomplete(usize),
    TooLong(usize),
    MalformedQuiz,
    NotEnoughQuestions,
    UnknownConversation,
    UnknownThread,
    NotMember,
    AlreadyRunning,
    Schema,
    Transient,
    Fatal,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete(n) => {
                write!(f, "Question {n} is incomplete. Fill in the question and all four answers, then pick the correct one.")
            }
            Self::TooLong(n) => {
                write!(f, "Question {n} is too long. Questions and answers are limited to {MAX_LENGTH} characters.")
            }
            Self::MalformedQuiz => f.write_str(
                "The attached quiz is malformed. Every entry needs a question, four answers and the index of the correct answer.",
            ),
            Self::NotEnoughQuestions => f.write_str("There aren't enough questions to make a quiz."),
            Self::UnknownConversation => f.write_str("Conversation not found."),
            Self::UnknownThread => f.write_str("Thread not found in the target conversation."),
            Self::NotMember => f.write_str("I am not a member of that conversation. Please add me and try again."),
            Self::AlreadyRunning => f.write_str("A trivia session is already running in that conversation."),
            Self::Schema => f.write_str("The platform provided an unexpected form schema."),
            Self::Transient => f.write_str("We could not reach the platform. Please try again later."),
            Self::Fatal => f.write_str("Oops! We encountered a logic error on our end. This is a bug."),
        }
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::PermissionDenied => Self::NotMember,
            RemoteError::NotFound => Self::UnknownConversation,
            RemoteError::Transient => Self::Transient,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
