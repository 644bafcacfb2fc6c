//! The messaging platform as seen by the quiz engine.

use core::{
    fmt::{self, Display},
    future::Future,
};
use model::{form::Form, ConversationId, ItemId, UserId};

/// Failure of a remote call to the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteError {
    /// The bot may not access the resource, typically because it is not a member of the conversation.
    PermissionDenied,
    NotFound,
    /// Anything else: network failures, unexpected responses, server errors.
    Transient,
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PermissionDenied => "permission denied",
            Self::NotFound => "not found",
            Self::Transient => "transient failure",
        })
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// A file to upload alongside a post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Contents of a new item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Post {
    /// Item to reply under. Top-level when absent.
    pub parent: Option<ItemId>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub form: Option<Form>,
    pub attachments: Vec<Attachment>,
}

impl Post {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Default::default() }
    }

    pub fn form(form: Form) -> Self {
        Self { form: Some(form), ..Default::default() }
    }

    pub fn under(mut self, parent: Option<&str>) -> Self {
        self.parent = parent.map(Into::into);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// An item as stored by the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub conversation: ConversationId,
    /// Root of the thread this item replies to, if any.
    pub parent: Option<ItemId>,
}

impl Item {
    /// Root of the thread this item belongs to. A top-level item is its own root.
    pub fn thread_root(&self) -> &str {
        self.parent.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
}

/// Operations the engine needs from the messaging platform.
pub trait Gateway: Send + Sync + 'static {
    fn post(&self, conversation: &str, post: Post) -> impl Future<Output = RemoteResult<Item>> + Send;

    /// Replaces the form of an existing item.
    fn update(&self, item: &str, form: Form) -> impl Future<Output = RemoteResult<()>> + Send;

    fn item(&self, item: &str) -> impl Future<Output = RemoteResult<Item>> + Send;

    /// Whether the bot is a member of the conversation.
    fn is_member(&self, conversation: &str) -> impl Future<Output = RemoteResult<bool>> + Send;

    fn users(&self, ids: &[UserId]) -> impl Future<Output = RemoteResult<Vec<User>>> + Send;

    /// Direct conversation between the bot and the user, created on demand.
    fn direct(&self, user: &str) -> impl Future<Output = RemoteResult<ConversationId>> + Send;

    fn attachment(&self, url: &str) -> impl Future<Output = RemoteResult<Vec<u8>>> + Send;
}
