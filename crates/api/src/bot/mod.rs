pub mod error;

use crate::{
    config::Config,
    gateway::{Gateway, Post},
    session::{self, Quiz},
    setup::SetupPrompt,
    table::{Answer, AnswerReceiver, Lease, SessionTable},
};
use core::sync::atomic::AtomicU64;
use dashmap::DashMap;
use model::{
    event::{Event, FormSubmission},
    form::{FormKey, ANSWER_FIELD},
    quiz,
};
use std::sync::Arc;

pub(crate) struct Inner<G> {
    pub(crate) gateway: G,
    pub(crate) sessions: SessionTable,
    /// Setup prompts awaiting the creator's reply, keyed by nonce.
    pub(crate) prompts: DashMap<u64, SetupPrompt>,
    pub(crate) config: Config,
    pub(crate) nonce: AtomicU64,
}

/// Entry point for platform events. Cheap to clone.
pub struct Bot<G> {
    pub(crate) inner: Arc<Inner<G>>,
}

impl<G> Clone for Bot<G> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<G: Gateway> Bot<G> {
    pub fn new(gateway: G, config: Config) -> Self {
        let inner = Inner {
            gateway,
            sessions: SessionTable::default(),
            prompts: DashMap::new(),
            config,
            nonce: AtomicU64::new(0),
        };
        Self { inner: Arc::new(inner) }
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.inner.sessions
    }

    /// Handles one event to completion. Failures are reported back to the conversation the event
    /// came from.
    pub async fn on_event(&self, event: Event) {
        let (conversation, parent, result) = match event {
            Event::Mention(mention) => {
                let conversation = mention.conversation_id.clone();
                let parent = String::from(mention.thread());
                (conversation, parent, self.on_mention(mention).await)
            }
            Event::FormSubmission(submission) => {
                let conversation = submission.conversation_id.clone();
                let parent = submission.item_id.clone();
                (conversation, parent, self.on_submission(submission).await)
            }
        };

        let Err(err) = result else {
            return;
        };

        log::warn!("event in {conversation} failed: {err:?}");
        let reply = Post::text(err.to_string()).under(Some(&parent));
        if let Err(err) = self.inner.gateway.post(&conversation, reply).await {
            log::error!("could not report failure to {conversation}: {err}");
        }
    }

    async fn on_submission(&self, submission: FormSubmission) -> error::Result<()> {
        match FormKey::parse(&submission.form.id) {
            Some(FormKey::Prompt(nonce)) => self.on_prompt_reply(nonce, submission).await,
            Some(FormKey::Setup(key)) => self.on_setup_form(&key, submission).await,
            Some(FormKey::Question(key, question)) => {
                self.on_answer(&key, question, &submission);
                Ok(())
            }
            None => {
                log::debug!("ignoring submission of unknown form {}", submission.form.id);
                Ok(())
            }
        }
    }

    fn on_answer(&self, key: &str, question: u32, submission: &FormSubmission) {
        if key != submission.conversation_id {
            log::warn!("question form of {key} submitted from {}", submission.conversation_id);
            return;
        }

        let Some(choice) = submission.form.value(ANSWER_FIELD).and_then(quiz::parse_answer) else {
            log::debug!("ignoring empty answer from {}", submission.submitter_id);
            return;
        };

        let answer = Answer { user: submission.submitter_id.clone(), question, choice };
        if !self.inner.sessions.route(key, answer) {
            log::debug!("dropped answer to question {question} of {key}");
        }
    }

    /// Detaches the task that runs `quiz`. The lease releases the session once the task ends,
    /// whether it succeeds, fails, or panics.
    pub(crate) fn spawn(&self, lease: Lease, quiz: Quiz, answers: AnswerReceiver) {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let moderator = quiz.moderator.clone();
            let task = tokio::spawn({
                let inner = inner.clone();
                async move {
                    let Inner { gateway, sessions, config, .. } = &*inner;
                    session::run(gateway, sessions, config, quiz, answers).await
                }
            });

            let err = match task.await {
                Ok(Ok(())) => return,
                Ok(Err(err)) => err,
                Err(err) => {
                    log::error!("session task in {} panicked: {err}", lease.key());
                    error::Error::Fatal
                }
            };

            let key = lease.key();
            log::error!("session in {key} aborted: {err}");
            let text = format!("The trivia session in {key} was aborted. {err}");
            let gateway = &inner.gateway;
            if let Err(err) = gateway.post(&moderator, Post::text(text)).await {
                log::error!("could not notify {moderator} about the aborted session: {err}");
            }
        });
    }
}
