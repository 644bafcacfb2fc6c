//! Negotiates a new session with its creator, from the first mention to the accepted setup form.

use crate::{
    bot::{
        error::{Error, Result},
        Bot,
    },
    gateway::{Gateway, Post, RemoteError},
    render,
    session::Quiz,
    table::{Session, State},
};
use core::sync::atomic::Ordering;
use model::{
    catalog::{self, SlotError},
    event::{Attachment, FormSubmission, Mention},
    form::{PromptFields, SetupFields},
    premade::{self, PremadeEntry},
    ConversationId, ItemId, Question, UserId,
};

/// A mention that asked for a new session and now waits for its creator to say where.
#[derive(Clone, Debug)]
pub struct SetupPrompt {
    pub creator: UserId,
    pub conversation: ConversationId,
    /// Item under which the negotiation is threaded.
    pub thread: ItemId,
    /// Questions of an attached premade quiz. The setup form is skipped when present.
    pub catalog: Option<Vec<Question>>,
}

/// Reduces a pasted link to the identifier at its end. Plain identifiers pass through unchanged.
fn strip_url(input: &str) -> &str {
    let input = input.trim();
    let input = input.split('?').next().unwrap_or_default();
    let input = input.trim_end_matches('/');
    input.rsplit('/').next().unwrap_or_default()
}

impl<G: Gateway> Bot<G> {
    pub(crate) async fn on_mention(&self, mention: Mention) -> Result<()> {
        let config = &self.inner.config;
        if !mention.text.to_lowercase().contains(&config.trigger.to_lowercase()) {
            log::debug!("ignoring mention {} without the trigger", mention.item_id);
            return Ok(());
        }

        if config.moderator.as_ref().is_some_and(|moderator| *moderator != mention.conversation_id) {
            log::debug!("ignoring mention outside the moderator conversation");
            return Ok(());
        }

        let catalog = match mention.attachments.first() {
            Some(attachment) => Some(self.fetch_premade(attachment).await?),
            None => None,
        };

        let nonce = self.inner.nonce.fetch_add(1, Ordering::Relaxed);
        let thread = String::from(mention.thread());
        let form = render::prompt_form(nonce, config.max_slots, config.default_slots);
        let post = Post::form(form).under(Some(&thread));

        // Registered before posting so that a quick reply cannot miss it.
        let prompt = SetupPrompt {
            creator: mention.creator_id,
            conversation: mention.conversation_id,
            thread,
            catalog,
        };
        let conversation = prompt.conversation.clone();
        // At most one open prompt per creator and conversation.
        self.inner.prompts.retain(|_, open| open.creator != prompt.creator || open.conversation != conversation);
        self.inner.prompts.insert(nonce, prompt);

        if let Err(err) = self.inner.gateway.post(&conversation, post).await {
            self.inner.prompts.remove(&nonce);
            return Err(err.into());
        }

        log::info!("posted setup prompt {nonce} in {conversation}");
        Ok(())
    }

    async fn fetch_premade(&self, attachment: &Attachment) -> Result<Vec<Question>> {
        let bytes = self.inner.gateway.attachment(&attachment.url).await?;
        let doc: Option<Vec<PremadeEntry>> = serde_json::from_slice(&bytes).ok();
        if !premade::validate(doc.as_deref()) {
            log::info!("rejected premade quiz {}", attachment.name);
            return Err(Error::MalformedQuiz);
        }

        let catalog = doc.and_then(premade::into_questions).ok_or(Error::MalformedQuiz)?;
        if catalog.is_empty() {
            return Err(Error::NotEnoughQuestions);
        }
        Ok(catalog)
    }

    /// Resolves where the session should run and registers it.
    pub(crate) async fn on_prompt_reply(&self, nonce: u64, submission: FormSubmission) -> Result<()> {
        let removed = self.inner.prompts.remove_if(&nonce, |_, prompt| prompt.creator == submission.submitter_id);
        let Some((_, prompt)) = removed else {
            log::debug!("ignoring reply of {} to setup prompt {nonce}", submission.submitter_id);
            return Ok(());
        };

        let config = &self.inner.config;
        let fields = PromptFields::decode(&submission.form.data);
        let key = match strip_url(&fields.conversation) {
            "" => config.quiz.clone().unwrap_or_else(|| prompt.conversation.clone()),
            id => String::from(id),
        };

        let joined = self.inner.gateway.is_member(&key).await.map_err(|err| match err {
            RemoteError::NotFound => Error::UnknownConversation,
            err => Error::from(err),
        })?;
        if !joined {
            return Err(Error::NotMember);
        }

        let thread = match strip_url(&fields.thread) {
            "" => None,
            id => {
                let item = self.inner.gateway.item(id).await.map_err(|err| match err {
                    RemoteError::Transient => Error::Transient,
                    _ => Error::UnknownThread,
                })?;
                if item.conversation != key {
                    return Err(Error::UnknownThread);
                }
                Some(String::from(item.thread_root()))
            }
        };

        let award_points = fields.award_points();
        let session = Session {
            creator: prompt.creator.clone(),
            moderator: prompt.conversation.clone(),
            thread: thread.clone(),
            award_points,
            state: State::AwaitingSetup { form: None, slots: 0 },
        };
        let lease = self.inner.sessions.create_if_absent(&key, session).ok_or(Error::AlreadyRunning)?;
        log::info!("registered session in {key} for {}", prompt.creator);

        if let Some(catalog) = prompt.catalog {
            let answers = self.inner.sessions.start(&key, None).ok_or(Error::Fatal)?;
            let quiz = Quiz {
                key,
                creator: prompt.creator,
                moderator: prompt.conversation,
                thread,
                award_points,
                title: String::new(),
                catalog,
            };
            self.spawn(lease, quiz, answers);
            return Ok(());
        }

        let slots = fields.question_count(config.default_slots, config.max_slots);
        let form = render::setup_form(&key, slots, None);
        let item = self.inner.gateway.post(&prompt.conversation, Post::form(form).under(Some(&prompt.thread))).await?;
        if !self.inner.sessions.open_setup_form(&key, item.id, slots) {
            return Err(Error::Fatal);
        }

        lease.keep();
        Ok(())
    }

    /// Accepts the question setup form and starts the session.
    pub(crate) async fn on_setup_form(&self, key: &str, submission: FormSubmission) -> Result<()> {
        let sessions = &self.inner.sessions;
        let Some(session) = sessions.find(key) else {
            log::debug!("ignoring setup form of unknown session {key}");
            return Ok(());
        };

        if session.creator != submission.submitter_id {
            log::debug!("ignoring setup form of {key} submitted by {}", submission.submitter_id);
            return Ok(());
        }

        let slots = match session.awaiting_setup() {
            Some((Some(open), slots)) if open == submission.item_id => slots,
            _ => {
                log::debug!("ignoring stale setup form {} of {key}", submission.item_id);
                return Ok(());
            }
        };

        let fields = match SetupFields::decode(&submission.form.data, slots) {
            Ok(fields) => fields,
            Err(err) => {
                log::warn!("setup form of {key} does not match its schema: {err:?}");
                sessions.abandon_setup(key, &submission.item_id);
                return Err(Error::Schema);
            }
        };

        let catalog = match catalog::from_slots(&fields.slots) {
            Ok(catalog) => catalog,
            Err(err) => {
                let err = match err {
                    SlotError::Incomplete(n) => Error::Incomplete(n),
                    SlotError::TooLong(n) => Error::TooLong(n),
                };
                return self.retry_setup(key, &session, slots, &fields, &submission, err).await;
            }
        };

        if catalog.is_empty() {
            sessions.abandon_setup(key, &submission.item_id);
            return Err(Error::NotEnoughQuestions);
        }

        // Only one of several concurrent submissions gets past this point.
        let Some(answers) = sessions.start(key, Some(submission.item_id.as_str())) else {
            return Ok(());
        };

        let quiz = Quiz {
            key: String::from(key),
            creator: session.creator,
            moderator: session.moderator,
            thread: session.thread,
            award_points: session.award_points,
            title: String::from(fields.title.trim()),
            catalog,
        };
        self.spawn(sessions.lease(key), quiz, answers);
        Ok(())
    }

    /// Explains what is wrong with the submitted form and offers a new one with the same contents.
    /// The session is dropped if either post fails, since nobody could complete it.
    async fn retry_setup(
        &self,
        key: &str,
        session: &Session,
        slots: usize,
        fields: &SetupFields,
        submission: &FormSubmission,
        err: Error,
    ) -> Result<()> {
        let gateway = &self.inner.gateway;
        let parent = Some(submission.item_id.as_str());
        let posted = async {
            gateway.post(&session.moderator, Post::text(err.to_string()).under(parent)).await?;
            let form = render::setup_form(key, slots, Some(fields));
            gateway.post(&session.moderator, Post::form(form).under(parent)).await
        };

        match posted.await {
            Ok(item) => {
                self.inner.sessions.open_setup_form(key, item.id, slots);
                Ok(())
            }
            Err(err) => {
                if self.inner.sessions.abandon_setup(key, &submission.item_id) {
                    log::warn!("abandoned setup of {key} after a failed retry");
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, gateway::Item, mock::MockGateway};
    use core::time::Duration;
    use model::{
        event::{Event, SubmittedForm},
        form::{self, Field},
    };
    use tokio::time;

    fn bot(gateway: MockGateway) -> Bot<MockGateway> {
        Bot::new(gateway, Config::default())
    }

    fn mention(conversation: &str, creator: &str, text: &str) -> Event {
        Event::Mention(Mention {
            conversation_id: conversation.into(),
            item_id: String::from("mention"),
            parent_item_id: None,
            creator_id: creator.into(),
            text: text.into(),
            attachments: Vec::new(),
        })
    }

    fn submit(conversation: &str, item: &str, submitter: &str, form: &str, data: &[(&str, &str)]) -> Event {
        Event::FormSubmission(FormSubmission {
            conversation_id: conversation.into(),
            item_id: item.into(),
            submitter_id: submitter.into(),
            form: SubmittedForm {
                id: form.into(),
                data: data.iter().map(|&(name, value)| Field { name: name.into(), value: value.into() }).collect(),
            },
        })
    }

    fn prompt_reply(submitter: &str, conversation: &str, thread: &str) -> Event {
        let data = [("conversation", conversation), ("thread", thread), ("questions", "2"), ("points", "true")];
        submit("mod", "prompt-item", submitter, "prompt:0", &data)
    }

    /// Owned field list of a two-slot setup form.
    fn setup_data(first: [&str; form::SLOT_FIELDS], second: [&str; form::SLOT_FIELDS]) -> Vec<(String, String)> {
        let mut data = vec![(String::from("title"), String::from("Pub quiz"))];
        for (n, values) in [(1, first), (2, second)] {
            data.extend(form::slot_names(n).into_iter().zip(values.map(String::from)));
        }
        data
    }

    async fn submit_setup(bot: &Bot<MockGateway>, item: &str, data: &[(String, String)]) {
        let data: Vec<_> = data.iter().map(|(name, value)| (name.as_str(), value.as_str())).collect();
        bot.on_event(submit("mod", item, "alice", "setup:quiz", &data)).await;
    }

    const BLANK: [&str; form::SLOT_FIELDS] = ["", "", "", "", "", ""];
    const SKY: [&str; form::SLOT_FIELDS] = ["Sky?", "red", "green", "blue", "black", "2"];

    #[test]
    fn links_are_reduced_to_ids() {
        assert_eq!(strip_url(" conv-1 "), "conv-1");
        assert_eq!(strip_url("https://chat.example.com/#/conversation/conv-1"), "conv-1");
        assert_eq!(strip_url("https://chat.example.com/conversation/conv-1/?tab=files"), "conv-1");
        assert_eq!(strip_url(""), "");
    }

    #[tokio::test]
    async fn mentions_without_the_trigger_are_ignored() {
        let bot = bot(MockGateway::default());
        bot.on_event(mention("mod", "alice", "hello there")).await;
        assert!(bot.inner.gateway.calls().is_empty());
        assert!(bot.inner.prompts.is_empty());

        bot.on_event(mention("mod", "alice", "@trivia New Session please")).await;
        assert!(bot.inner.gateway.form("prompt:0").is_some());
        assert_eq!(bot.inner.prompts.len(), 1);
    }

    #[tokio::test]
    async fn mentions_outside_the_moderator_conversation_are_ignored() {
        let config = Config { moderator: Some("mod".into()), ..Default::default() };
        let bot = Bot::new(MockGateway::default(), config);
        bot.on_event(mention("elsewhere", "alice", "new session")).await;
        assert!(bot.inner.gateway.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn setup_to_running() {
        let bot = bot(MockGateway::default());
        bot.on_event(mention("mod", "alice", "new session")).await;

        // Only the creator may answer the prompt.
        bot.on_event(prompt_reply("mallory", "quiz", "")).await;
        assert!(bot.sessions().is_empty());
        assert_eq!(bot.inner.prompts.len(), 1);

        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        assert!(bot.inner.prompts.is_empty());
        let session = bot.sessions().find("quiz").unwrap();
        assert_eq!(session.moderator, "mod");
        assert!(session.award_points);
        let (item, form) = bot.inner.gateway.form("setup:quiz").unwrap();
        assert_eq!(form.controls.len(), 1 + 2 * 7 + 1);
        assert_eq!(session.awaiting_setup(), Some((Some(item.as_str()), 2)));

        let data = setup_data(SKY, BLANK);
        let imposter: Vec<_> = data.iter().map(|(name, value)| (name.as_str(), value.as_str())).collect();
        bot.on_event(submit("mod", &item, "mallory", "setup:quiz", &imposter)).await;
        assert!(bot.sessions().find("quiz").unwrap().awaiting_setup().is_some());

        submit_setup(&bot, &item, &data).await;
        assert!(matches!(bot.sessions().find("quiz").unwrap().state, State::Running(_)));

        // Resubmitting the accepted form does nothing.
        submit_setup(&bot, &item, &data).await;

        // One question: introduction, answer window, reveal and results.
        time::sleep(Duration::from_secs(120)).await;
        assert!(bot.sessions().is_empty());
        let texts = bot.inner.gateway.texts_to("quiz");
        assert!(texts[0].starts_with("I will post 1 question."));
        assert_eq!(texts.last().map(String::as_str), Some("Sorry there were no winners."));
    }

    #[tokio::test]
    async fn incomplete_slots_are_reported_and_prefilled() {
        let bot = bot(MockGateway::default());
        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        let (item, _) = bot.inner.gateway.form("setup:quiz").unwrap();

        let half = ["Grass?", "green", "", "", "", ""];
        submit_setup(&bot, &item, &setup_data(SKY, half)).await;

        let texts = bot.inner.gateway.texts_to("mod");
        assert!(texts.last().unwrap().starts_with("Question 2 is incomplete."));
        let (retry, form) = bot.inner.gateway.form("setup:quiz").unwrap();
        assert_ne!(retry, item);
        assert!(form.controls.iter().any(|control| matches!(
            control,
            form::Control::Input { name, value, .. } if name == "question2" && value == "Grass?"
        )));
        assert_eq!(bot.sessions().find("quiz").unwrap().awaiting_setup(), Some((Some(retry.as_str()), 2)));

        // The replaced form is stale now.
        submit_setup(&bot, &item, &setup_data(SKY, BLANK)).await;
        assert!(bot.sessions().find("quiz").unwrap().awaiting_setup().is_some());
    }

    #[tokio::test]
    async fn failed_retry_removes_the_session() {
        // Two posts reach the platform before it goes away: the prompt and the setup form. A third
        // limit lets the correction through and loses the prefilled form.
        for limit in [2, 3] {
            let gateway = MockGateway { post_limit: Some(limit), ..Default::default() };
            let bot = bot(gateway);
            bot.on_event(mention("mod", "alice", "new session")).await;
            bot.on_event(prompt_reply("alice", "quiz", "")).await;
            let (item, _) = bot.inner.gateway.form("setup:quiz").unwrap();

            let half = ["Grass?", "green", "", "", "", ""];
            submit_setup(&bot, &item, &setup_data(SKY, half)).await;
            assert!(bot.sessions().is_empty());
        }
    }

    #[tokio::test]
    async fn repeated_mentions_keep_one_prompt() {
        let bot = bot(MockGateway::default());
        for _ in 0..100 {
            bot.on_event(mention("mod", "alice", "new session")).await;
        }
        bot.on_event(mention("mod", "bob", "new session")).await;
        bot.on_event(mention("other", "alice", "new session")).await;
        assert_eq!(bot.inner.prompts.len(), 3);

        // Only the latest prompt of alice in this conversation is still open.
        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        assert!(bot.sessions().is_empty());
        let data = [("conversation", "quiz")];
        bot.on_event(submit("mod", "prompt-item", "alice", "prompt:99", &data)).await;
        assert!(bot.sessions().find("quiz").is_some());
        assert_eq!(bot.inner.prompts.len(), 2);
    }

    #[tokio::test]
    async fn empty_setup_form_removes_the_session() {
        let bot = bot(MockGateway::default());
        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        let (item, _) = bot.inner.gateway.form("setup:quiz").unwrap();

        submit_setup(&bot, &item, &setup_data(BLANK, BLANK)).await;
        assert!(bot.sessions().is_empty());
        let texts = bot.inner.gateway.texts_to("mod");
        assert_eq!(texts.last().map(String::as_str), Some("There aren't enough questions to make a quiz."));
    }

    #[tokio::test]
    async fn second_session_in_a_conversation_is_rejected() {
        let bot = bot(MockGateway::default());
        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "quiz", "")).await;

        bot.on_event(mention("mod", "bob", "new session")).await;
        let data = [("conversation", "quiz")];
        bot.on_event(submit("mod", "prompt-item", "bob", "prompt:1", &data)).await;

        assert_eq!(bot.sessions().find("quiz").unwrap().creator, "alice");
        let texts = bot.inner.gateway.texts_to("mod");
        assert_eq!(texts.last().map(String::as_str), Some("A trivia session is already running in that conversation."));
    }

    #[tokio::test]
    async fn target_conversation_must_be_joined() {
        let mut gateway = MockGateway::default();
        gateway.members.insert("private".into(), Ok(false));
        gateway.members.insert("gone".into(), Err(RemoteError::NotFound));
        let bot = bot(gateway);

        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "https://chat.example.com/#/conversation/private", "")).await;
        assert!(bot.sessions().is_empty());
        assert!(bot.inner.prompts.is_empty());
        assert_eq!(bot.inner.gateway.texts_to("mod"), [Error::NotMember.to_string()]);

        bot.on_event(mention("mod", "alice", "new session")).await;
        let data = [("conversation", "gone")];
        bot.on_event(submit("mod", "prompt-item", "alice", "prompt:1", &data)).await;
        assert!(bot.sessions().is_empty());
        assert_eq!(bot.inner.gateway.texts_to("mod").last(), Some(&Error::UnknownConversation.to_string()));
    }

    #[tokio::test]
    async fn threads_resolve_to_their_root() {
        let mut gateway = MockGateway::default();
        let reply = Item { id: "reply".into(), conversation: "quiz".into(), parent: Some("root".into()) };
        let foreign = Item { id: "foreign".into(), conversation: "other".into(), parent: None };
        gateway.items.insert(reply.id.clone(), reply);
        gateway.items.insert(foreign.id.clone(), foreign);
        let bot = bot(gateway);

        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "quiz", "foreign")).await;
        assert!(bot.sessions().is_empty());
        assert_eq!(bot.inner.gateway.texts_to("mod"), [Error::UnknownThread.to_string()]);

        bot.on_event(mention("mod", "alice", "new session")).await;
        let data = [("conversation", "quiz"), ("thread", "reply")];
        bot.on_event(submit("mod", "prompt-item", "alice", "prompt:1", &data)).await;
        assert_eq!(bot.sessions().find("quiz").unwrap().thread.as_deref(), Some("root"));
    }

    fn premade_mention(url: &str) -> Event {
        let Event::Mention(mut mention) = mention("mod", "alice", "new session") else {
            unreachable!();
        };
        mention.attachments.push(Attachment { url: url.into(), name: String::from("quiz.json") });
        Event::Mention(mention)
    }

    #[tokio::test]
    async fn malformed_premade_quiz_registers_nothing() {
        let mut gateway = MockGateway::default();
        let doc = br#"[{"question": "Sky?", "answers": ["red", "green", "blue"], "answer": "2"}]"#;
        gateway.files.insert("https://files/quiz.json".into(), doc.to_vec());
        gateway.files.insert("https://files/junk.json".into(), b"not json".to_vec());
        let bot = bot(gateway);

        for url in ["https://files/quiz.json", "https://files/junk.json"] {
            bot.on_event(premade_mention(url)).await;
        }

        assert!(bot.inner.prompts.is_empty());
        assert!(bot.sessions().is_empty());
        let malformed = Error::MalformedQuiz.to_string();
        assert_eq!(bot.inner.gateway.texts_to("mod"), [malformed.clone(), malformed]);
        assert!(bot.inner.gateway.posts_to("quiz").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn premade_quiz_starts_right_away() {
        let mut gateway = MockGateway::default();
        let doc = br#"[
            {"question": "Sky?", "answers": ["red", "green", "blue", "black"], "answer": "2"},
            {"question": "Grass?", "answers": ["red", "green", "blue", "black"], "answer": 1}
        ]"#;
        gateway.files.insert("https://files/quiz.json".into(), doc.to_vec());
        let bot = bot(gateway);

        bot.on_event(premade_mention("https://files/quiz.json")).await;
        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        assert!(matches!(bot.sessions().find("quiz").unwrap().state, State::Running(_)));
        assert!(bot.inner.gateway.form("setup:quiz").is_none());

        time::sleep(Duration::from_secs(120)).await;
        assert!(bot.sessions().is_empty());
        assert!(bot.inner.gateway.texts_to("quiz")[0].starts_with("I will post 2 questions."));
    }

    #[tokio::test(start_paused = true)]
    async fn answers_reach_the_running_session() {
        let bot = bot(MockGateway::default());
        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        let (item, _) = bot.inner.gateway.form("setup:quiz").unwrap();
        submit_setup(&bot, &item, &setup_data(SKY, BLANK)).await;

        time::sleep(Duration::from_secs(25)).await;
        let (question, _) = bot.inner.gateway.form("question:quiz:1").unwrap();
        bot.on_event(submit("quiz", &question, "bob", "question:quiz:1", &[("answer", "2")])).await;
        bot.on_event(submit("elsewhere", &question, "carol", "question:quiz:1", &[("answer", "2")])).await;

        time::sleep(Duration::from_secs(60)).await;
        let texts = bot.inner.gateway.texts_to("quiz");
        assert!(texts.contains(&String::from("Winners:\n\n1. bob - 2 points.\n")));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_quiz_conversation_aborts_the_session() {
        let mut gateway = MockGateway::default();
        gateway.unreachable.insert("quiz".into());
        let bot = bot(gateway);
        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        let (item, _) = bot.inner.gateway.form("setup:quiz").unwrap();
        submit_setup(&bot, &item, &setup_data(SKY, BLANK)).await;

        time::sleep(Duration::from_secs(1)).await;
        assert!(bot.sessions().is_empty());
        let texts = bot.inner.gateway.texts_to("mod");
        let last = texts.last().unwrap();
        assert!(last.starts_with("The trivia session in quiz was aborted."));
        assert!(last.ends_with(&Error::Transient.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_session_is_reported() {
        let gateway = MockGateway { panic_on_update: true, ..Default::default() };
        let bot = bot(gateway);
        bot.on_event(mention("mod", "alice", "new session")).await;
        bot.on_event(prompt_reply("alice", "quiz", "")).await;
        let (item, _) = bot.inner.gateway.form("setup:quiz").unwrap();
        submit_setup(&bot, &item, &setup_data(SKY, BLANK)).await;

        // The reveal after the first answer window updates the question form.
        time::sleep(Duration::from_secs(120)).await;
        assert!(bot.sessions().is_empty());
        let texts = bot.inner.gateway.texts_to("mod");
        let last = texts.last().unwrap();
        assert!(last.starts_with("The trivia session in quiz was aborted."));
        assert!(last.ends_with(&Error::Fatal.to_string()));
    }
}
