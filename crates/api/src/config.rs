use core::time::Duration;
use model::ConversationId;

/// Delays that pace a running session.
#[derive(Clone, Debug)]
pub struct Timing {
    /// How long each question stays open for answers.
    pub answer_window: Duration,
    /// Pause between the introduction and the first question.
    pub intro_delay: Duration,
    /// Pause between the last reveal and the winners teaser.
    pub winner_delay: Duration,
    /// Pause between the winners teaser and the winners list.
    pub reveal_delay: Duration,
}

impl Timing {
    /// Uses the same delay for the answer window and the introduction.
    pub fn with_answer_window(answer_window: Duration) -> Self {
        Self { answer_window, intro_delay: answer_window, ..Default::default() }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            answer_window: Duration::from_secs(20),
            intro_delay: Duration::from_secs(20),
            winner_delay: Duration::from_secs(10),
            reveal_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Phrase that must appear in a mention for a new session to be set up. Matched case-insensitively.
    pub trigger: Box<str>,
    /// When set, only mentions within this conversation can set up sessions.
    pub moderator: Option<ConversationId>,
    /// Target conversation used when the creator leaves the conversation field blank.
    pub quiz: Option<ConversationId>,
    /// Slots rendered on the setup form when the creator does not ask for a number.
    pub default_slots: usize,
    pub max_slots: usize,
    /// Number of places on the winners list.
    pub places: usize,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger: "new session".into(),
            moderator: None,
            quiz: None,
            default_slots: 10,
            max_slots: 20,
            places: 3,
            timing: Timing::default(),
        }
    }
}
