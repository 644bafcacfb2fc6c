//! Registry of live sessions, keyed by the conversation they run in.

use dashmap::{mapref::entry::Entry, DashMap};
use model::{ConversationId, ItemId, UserId};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A participant's answer, routed to the task running the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub user: UserId,
    pub question: u32,
    pub choice: u8,
}

pub type AnswerSender = mpsc::UnboundedSender<Answer>;
pub type AnswerReceiver = mpsc::UnboundedReceiver<Answer>;

#[derive(Clone, Debug)]
pub enum State {
    /// Waiting for the creator to submit the question setup form.
    AwaitingSetup {
        /// The setup form currently open for submission.
        form: Option<ItemId>,
        /// Number of question slots the open form was rendered with.
        slots: usize,
    },
    /// Questions are being broadcast. Answers are forwarded through the channel.
    Running(AnswerSender),
    /// Results are being published. Answers are no longer accepted.
    Finished,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub creator: UserId,
    /// Conversation in which the session was set up.
    pub moderator: ConversationId,
    pub thread: Option<ItemId>,
    pub award_points: bool,
    pub state: State,
}

impl Session {
    pub fn awaiting_setup(&self) -> Option<(Option<&str>, usize)> {
        match &self.state {
            State::AwaitingSetup { form, slots } => Some((form.as_deref(), *slots)),
            _ => None,
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionTable(Arc<DashMap<ConversationId, Session>>);

impl SessionTable {
    /// Registers `session` unless the conversation already hosts one, in which case the existing
    /// session is left untouched and `None` is returned.
    pub fn create_if_absent(&self, key: &str, session: Session) -> Option<Lease> {
        match self.0.entry(key.into()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(session);
                Some(self.lease(key))
            }
        }
    }

    /// Takes responsibility for removing the session at `key` once the lease is dropped.
    pub fn lease(&self, key: &str) -> Lease {
        Lease { table: self.clone(), key: Some(key.into()) }
    }

    pub fn find(&self, key: &str) -> Option<Session> {
        self.0.get(key).map(|session| session.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn remove(&self, key: &str) -> Option<Session> {
        self.0.remove(key).map(|(_, session)| session)
    }

    /// Points the session at a freshly posted setup form. Fails if setup is already over.
    pub fn open_setup_form(&self, key: &str, item: ItemId, slots: usize) -> bool {
        let Some(mut session) = self.0.get_mut(key) else {
            return false;
        };
        let State::AwaitingSetup { form, slots: rendered } = &mut session.state else {
            return false;
        };
        *form = Some(item);
        *rendered = slots;
        true
    }

    /// Removes a session that is still waiting on `form`. Sessions that have moved on are left alone.
    pub fn abandon_setup(&self, key: &str, form: &str) -> bool {
        self.0
            .remove_if(key, |_, session| matches!(session.awaiting_setup(), Some((Some(open), _)) if open == form))
            .is_some()
    }

    /// Moves the session from setup to running, provided `form` is still the open setup form.
    /// Concurrent submissions race here and exactly one of them wins.
    pub fn start(&self, key: &str, form: Option<&str>) -> Option<AnswerReceiver> {
        let mut session = self.0.get_mut(key)?;
        let State::AwaitingSetup { form: open, .. } = &session.state else {
            return None;
        };
        if open.as_deref() != form {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        session.state = State::Running(tx);
        Some(rx)
    }

    /// Closes the answer channel of a running session.
    pub fn finish(&self, key: &str) {
        if let Some(mut session) = self.0.get_mut(key) {
            session.state = State::Finished;
        }
    }

    /// Forwards an answer to the session's task. Answers for sessions that are not running are dropped.
    pub fn route(&self, key: &str, answer: Answer) -> bool {
        let Some(session) = self.0.get(key) else {
            return false;
        };
        match &session.state {
            State::Running(tx) => tx.send(answer).is_ok(),
            _ => false,
        }
    }
}

/// Removes its session from the table when dropped, unless [kept](Lease::keep).
///
/// Every flow that may abandon a session holds one of these, so errors and panics alike release
/// the conversation for future sessions.
pub struct Lease {
    table: SessionTable,
    key: Option<ConversationId>,
}

impl Lease {
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    /// Leaves the session registered.
    pub fn keep(mut self) {
        self.key = None;
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        if self.table.remove(&key).is_some() {
            log::debug!("released session in conversation {key}");
        }
    }
}
