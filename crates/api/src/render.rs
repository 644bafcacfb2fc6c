//! Presentation of forms and announcements. Nothing in here makes decisions.

use core::{fmt::Write, time::Duration};
use model::{
    form::{self, Action, Choice, Control, Form, FormKey, PromptFields, SetupFields},
    ledger::Tier,
    quiz::{Question, CHOICES},
    results::ResultEntry,
    UserId,
};
use std::collections::BTreeMap;

const LETTERS: [&str; CHOICES] = ["A", "B", "C", "D"];

fn label(text: impl Into<String>) -> Control {
    Control::Label { text: text.into() }
}

fn input(name: &str, text: &str, value: &str) -> Control {
    Control::Input { name: name.into(), text: text.into(), value: value.into() }
}

fn submit(text: &str, notification: &str) -> Action {
    Action { text: text.into(), action: String::from("submit"), notification: notification.into() }
}

fn letter_choices() -> Vec<Choice> {
    (0..).zip(LETTERS).map(|(value, letter): (u8, _)| Choice { text: letter.into(), value: value.to_string() }).collect()
}

/// Asks the creator where and how the quiz should run.
pub fn prompt_form(nonce: u64, max_slots: usize, default_slots: usize) -> Form {
    let yes_no = ["Yes", "No"].into_iter().zip(["true", "false"]);
    Form {
        id: FormKey::Prompt(nonce).to_string(),
        title: String::from("New trivia session"),
        controls: vec![
            label("Where should the quiz run?"),
            input(PromptFields::CONVERSATION, "Conversation id or link (leave blank for this conversation)", ""),
            input(PromptFields::THREAD, "Optional thread id or link to post the questions in", ""),
            input(
                PromptFields::QUESTIONS,
                &format!("Number of questions (1-{max_slots}, default {default_slots}). Ignored for attached quizzes."),
                "",
            ),
            Control::RadioGroup {
                name: String::from(PromptFields::POINTS),
                text: String::from("Award points and announce winners?"),
                options: yes_no.map(|(text, value)| Choice { text: text.into(), value: value.into() }).collect(),
                value: Some(String::from("true")),
            },
            Control::Button { options: vec![submit("Continue", "Setting up the quiz...")] },
        ],
    }
}

/// The question setup form. When `prefill` is given, every field carries the value entered before.
pub fn setup_form(conversation: &str, slots: usize, prefill: Option<&SetupFields>) -> Form {
    let title = prefill.map_or("", |fields| fields.title.as_str());
    let mut controls = vec![input(form::TITLE_FIELD, "Enter an optional title", title)];

    for n in 1..=slots {
        let slot = prefill.and_then(|fields| fields.slots.get(n - 1));
        let [question, a, b, c, d, answer] = form::slot_names(n);
        controls.push(label(format!("Question {n}")));
        controls.push(input(&question, "Enter the question here...", slot.map_or("", |slot| slot.prompt.as_str())));
        for (k, name) in [a, b, c, d].iter().enumerate() {
            let value = slot.map_or("", |slot| slot.choices[k].as_str());
            controls.push(input(name, &format!("Answer {}", LETTERS[k]), value));
        }
        controls.push(Control::RadioGroup {
            name: answer,
            text: String::from("Correct answer"),
            options: letter_choices(),
            value: slot.map(|slot| slot.answer.clone()).filter(|answer| !answer.is_empty()),
        });
    }

    controls.push(Control::Button {
        options: vec![
            submit("Start session now", "Form submitted successfully"),
            Action {
                text: String::from("Cancel"),
                action: String::from("reset"),
                notification: String::from("Form cancelled successfully"),
            },
        ],
    });

    Form { id: FormKey::Setup(conversation.into()).to_string(), title: String::from("Trivia Quiz"), controls }
}

/// An answerable question.
pub fn question_form(conversation: &str, question: &Question) -> Form {
    let options = (0..)
        .zip(&question.choices)
        .map(|(value, text): (u8, _)| Choice { text: text.clone(), value: value.to_string() })
        .collect();
    Form {
        id: FormKey::Question(conversation.into(), question.id).to_string(),
        title: format!("Question {}", question.id),
        controls: vec![
            label(question.prompt.as_str()),
            Control::RadioGroup {
                name: String::from(form::ANSWER_FIELD),
                text: String::from("Your answer"),
                options,
                value: None,
            },
            Control::Button { options: vec![submit("Submit", "Answer submitted")] },
        ],
    }
}

/// The same question after its window closed, with the answer controls replaced by the solution.
pub fn revealed_form(conversation: &str, question: &Question) -> Form {
    Form {
        id: FormKey::Question(conversation.into(), question.id).to_string(),
        title: format!("Question {}", question.id),
        controls: vec![
            label(question.prompt.as_str()),
            label(format!("The correct answer was: {}", question.correct())),
        ],
    }
}

pub fn intro(count: usize, window: Duration, award_points: bool) -> String {
    let plural = if count == 1 { "" } else { "s" };
    let seconds = window.as_secs();
    let mut text = format!("I will post {count} question{plural}. You have {seconds} seconds to answer each question.");
    if award_points {
        text.push_str(" First person to answer correctly gets extra points.");
    }
    text.push_str(" Get ready, first question is coming up now...");
    text
}

fn name_of<'a>(names: &'a BTreeMap<UserId, String>, user: &'a UserId) -> &'a str {
    names.get(user).unwrap_or(user)
}

fn unit(score: u32) -> &'static str {
    if score == 1 {
        "point"
    } else {
        "points"
    }
}

/// Ranked winners. Co-equal scores share a line and a place.
pub fn winners(tiers: &[Tier], names: &BTreeMap<UserId, String>) -> String {
    if tiers.is_empty() {
        return String::from("Sorry there were no winners.");
    }

    let mut text = String::from("Winners:\n\n");
    for (place, Tier { score, users }) in (1..).zip(tiers) {
        let mut users: Vec<_> = users.iter().map(|user| name_of(names, user)).collect();
        users.sort_unstable();
        let users = users.join(", ");
        // Writing into a `String` cannot fail.
        let _ = writeln!(text, "{place}. {users} - {score} {}.", unit(*score));
    }
    text
}

/// Every participant's final score, in export order.
pub fn summary(entries: &[ResultEntry], questions: usize, award_points: bool) -> String {
    let mut text = String::new();
    for ResultEntry { name, score, answers, .. } in entries {
        let _ = if award_points {
            writeln!(text, "{name} - {score} {}.", unit(*score))
        } else {
            writeln!(text, "{name} - answered {} of {questions}.", answers.len())
        };
    }
    text
}

pub fn summary_subject(participants: usize) -> String {
    format!("Trivia Full Results - Total participants: {participants}")
}
