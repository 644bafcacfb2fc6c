//! In-memory [`Gateway`] that records every call.

use crate::gateway::{Gateway, Item, Post, RemoteError, RemoteResult, User};
use model::{form::Form, ConversationId, ItemId, UserId};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Post { item: ItemId, conversation: ConversationId, post: Post },
    Update { item: ItemId, form: Form },
}

#[derive(Default)]
pub struct MockGateway {
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) counter: AtomicUsize,
    /// Number of posts accepted before every later post fails.
    pub post_limit: Option<usize>,
    /// Makes every form update panic.
    pub panic_on_update: bool,
    /// Membership answers. Conversations not listed here are joined.
    pub members: BTreeMap<ConversationId, RemoteResult<bool>>,
    /// Items that can be looked up, besides the ones posted through this gateway.
    pub items: BTreeMap<ItemId, Item>,
    pub names: BTreeMap<UserId, String>,
    pub files: BTreeMap<String, Vec<u8>>,
    /// Conversations that reject every post.
    pub unreachable: BTreeSet<ConversationId>,
}

impl MockGateway {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts_to(&self, conversation: &str) -> Vec<(ItemId, Post)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Post { item, conversation: target, post } if target == conversation => Some((item, post)),
                _ => None,
            })
            .collect()
    }

    /// Item id and contents of the latest form posted with the given form id.
    pub fn form(&self, id: &str) -> Option<(ItemId, Form)> {
        self.calls().into_iter().rev().find_map(|call| match call {
            Call::Post { item, post: Post { form: Some(form), .. }, .. } if form.id == id => Some((item, form)),
            _ => None,
        })
    }

    pub fn texts_to(&self, conversation: &str) -> Vec<String> {
        self.posts_to(conversation).into_iter().filter_map(|(_, post)| post.content).collect()
    }
}

impl Gateway for MockGateway {
    async fn post(&self, conversation: &str, post: Post) -> RemoteResult<Item> {
        if self.unreachable.contains(conversation) {
            return Err(RemoteError::Transient);
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        if self.post_limit.is_some_and(|limit| n >= limit) {
            return Err(RemoteError::Transient);
        }
        let item = Item { id: format!("item-{n}"), conversation: conversation.into(), parent: post.parent.clone() };
        self.calls.lock().unwrap().push(Call::Post { item: item.id.clone(), conversation: conversation.into(), post });
        Ok(item)
    }

    async fn update(&self, item: &str, form: Form) -> RemoteResult<()> {
        assert!(!self.panic_on_update, "update of {item} while updates are disabled");
        self.calls.lock().unwrap().push(Call::Update { item: item.into(), form });
        Ok(())
    }

    async fn item(&self, item: &str) -> RemoteResult<Item> {
        self.items.get(item).cloned().ok_or(RemoteError::NotFound)
    }

    async fn is_member(&self, conversation: &str) -> RemoteResult<bool> {
        self.members.get(conversation).copied().unwrap_or(Ok(true))
    }

    async fn users(&self, ids: &[UserId]) -> RemoteResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.names.get(id).map(|name| User { id: id.clone(), display_name: name.clone() }))
            .collect())
    }

    async fn direct(&self, user: &str) -> RemoteResult<ConversationId> {
        Ok(format!("dm-{user}"))
    }

    async fn attachment(&self, url: &str) -> RemoteResult<Vec<u8>> {
        self.files.get(url).cloned().ok_or(RemoteError::NotFound)
    }
}
