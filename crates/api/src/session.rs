//! Drives one running session from the introduction to the published results.

use crate::{
    bot::error::{Error, Result},
    config::{Config, Timing},
    gateway::{Attachment, Gateway, Post, User},
    render,
    table::{Answer, AnswerReceiver, SessionTable},
};
use core::time::Duration;
use model::{
    results::{self, ResultEntry, EXPORT_NAME},
    ConversationId, ItemId, Ledger, Question, UserId,
};
use std::collections::BTreeMap;
use tokio::time;

const DEFAULT_TITLE: &str = "Trivia session";

/// Everything a session needs once its questions are fixed.
#[derive(Clone, Debug)]
pub struct Quiz {
    /// Conversation the questions are broadcast to.
    pub key: ConversationId,
    pub creator: UserId,
    /// Conversation in which the session was set up.
    pub moderator: ConversationId,
    pub thread: Option<ItemId>,
    pub award_points: bool,
    pub title: String,
    pub catalog: Vec<Question>,
}

impl Quiz {
    fn title(&self) -> &str {
        if self.title.is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }
}

/// Runs the session to completion. The session entry is marked finished before the results are
/// published but is never removed here; the caller's lease takes care of that.
pub async fn run<G: Gateway>(
    gateway: &G,
    table: &SessionTable,
    config: &Config,
    quiz: Quiz,
    mut answers: AnswerReceiver,
) -> Result<()> {
    let Timing { answer_window, intro_delay, .. } = config.timing;
    gateway.post(&quiz.moderator, Post::text("Form submitted, will start session.")).await?;

    let intro = render::intro(quiz.catalog.len(), answer_window, quiz.award_points);
    let intro = Post::text(intro).subject(quiz.title()).under(quiz.thread.as_deref());
    let intro = gateway.post(&quiz.key, intro).await?;
    let anchor = quiz.thread.clone().unwrap_or(intro.id);
    log::info!("session in {} started with {} questions", quiz.key, quiz.catalog.len());

    time::sleep(intro_delay).await;

    let mut ledger = Ledger::new(quiz.creator.clone());
    for question in &quiz.catalog {
        let form = Post::form(render::question_form(&quiz.key, question)).under(Some(&anchor));
        let item = gateway.post(&quiz.key, form).await?;
        collect(&mut answers, &mut ledger, question, answer_window).await;
        gateway.update(&item.id, render::revealed_form(&quiz.key, question)).await?;
    }

    // Disable all communication channels
    table.finish(&quiz.key);
    drop(answers);

    publish(gateway, config, &quiz, &anchor, &ledger).await
}

/// Scores answers to `question` until the window closes. Answers to any other question are ignored.
pub async fn collect(answers: &mut AnswerReceiver, ledger: &mut Ledger, question: &Question, window: Duration) {
    let timer = time::sleep(window);
    tokio::pin!(timer);
    loop {
        // A closed window takes precedence over answers still waiting in the channel.
        let Answer { user, question: id, choice } = tokio::select! {
            biased;
            _ = &mut timer => break,
            Some(answer) = answers.recv() => answer,
        };

        if id != question.id {
            log::debug!("ignoring answer of {user} to question {id} while question {} is open", question.id);
            continue;
        }

        match ledger.record_answer(&user, question, choice) {
            Some(points) => log::debug!("{user} earned {points} points on question {id}"),
            None => log::debug!("ignoring answer of the session creator {user}"),
        }
    }
}

async fn display_names<G: Gateway>(gateway: &G, ledger: &Ledger) -> BTreeMap<UserId, String> {
    let ids: Vec<_> = ledger.participants().map(|(user, _)| user.clone()).collect();
    match gateway.users(&ids).await {
        Ok(users) => users.into_iter().map(|User { id, display_name }| (id, display_name)).collect(),
        Err(err) => {
            log::warn!("falling back to user ids after display name lookup failed: {err}");
            BTreeMap::new()
        }
    }
}

async fn publish<G: Gateway>(gateway: &G, config: &Config, quiz: &Quiz, anchor: &str, ledger: &Ledger) -> Result<()> {
    let names = display_names(gateway, ledger).await;

    if quiz.award_points {
        time::sleep(config.timing.winner_delay).await;
        gateway.post(&quiz.key, Post::text("And the winners are...").under(Some(anchor))).await?;
        time::sleep(config.timing.reveal_delay).await;
        let tiers = ledger.top_scorers(config.places);
        gateway.post(&quiz.key, Post::text(render::winners(&tiers, &names)).under(Some(anchor))).await?;
    }

    if ledger.is_empty() {
        log::info!("session in {} ended without participants", quiz.key);
        return Ok(());
    }

    let entries = results::export(ledger, &quiz.catalog, &names);
    let summary = render::summary(&entries, quiz.catalog.len(), quiz.award_points);
    let summary = Post::text(summary).subject(render::summary_subject(entries.len()));
    gateway.post(&quiz.key, summary).await?;

    if let Err(err) = export(gateway, quiz, &entries).await {
        log::error!("failed to export the results of the session in {}: {err}", quiz.key);
    }

    log::info!("session in {} ended with {} participants", quiz.key, entries.len());
    Ok(())
}

/// Sends the structured results to the moderators, or privately to the creator when the quiz ran in
/// the moderator conversation itself.
async fn export<G: Gateway>(gateway: &G, quiz: &Quiz, entries: &[ResultEntry]) -> Result<()> {
    let destination = if quiz.moderator == quiz.key { gateway.direct(&quiz.creator).await? } else { quiz.moderator.clone() };
    let bytes = serde_json::to_vec_pretty(entries).map_err(|_| Error::Fatal)?;
    let post = Post {
        subject: Some(format!("{} - Total participants: {}", quiz.title(), entries.len())),
        content: Some(String::from("Attached are the results of the trivia quiz.")),
        attachments: vec![Attachment { name: String::from(EXPORT_NAME), mime: "application/json", bytes }],
        ..Default::default()
    };
    gateway.post(&destination, post).await?;
    Ok(())
}
