use crate::{form::Field, ConversationId, ItemId, UserId};
use alloc::{string::String, vec::Vec};
use serde::Deserialize;

/// Events delivered by the platform's webhook.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Mention(Mention),
    FormSubmission(FormSubmission),
}

/// The bot was mentioned in a conversation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub conversation_id: ConversationId,
    pub item_id: ItemId,
    /// Set when the mentioning item is a reply within a thread.
    #[serde(default)]
    pub parent_item_id: Option<ItemId>,
    pub creator_id: UserId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Mention {
    /// Item that replies to this mention should be threaded under.
    pub fn thread(&self) -> &str {
        self.parent_item_id.as_deref().unwrap_or(&self.item_id)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Attachment {
    pub url: String,
    #[serde(default)]
    pub name: String,
}

/// Someone submitted a form posted by the bot.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub conversation_id: ConversationId,
    pub item_id: ItemId,
    pub submitter_id: UserId,
    pub form: SubmittedForm,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubmittedForm {
    pub id: String,
    #[serde(default)]
    pub data: Vec<Field>,
}

impl SubmittedForm {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.data.iter().find(|field| field.name == name).map(|field| field.value.as_str())
    }
}
