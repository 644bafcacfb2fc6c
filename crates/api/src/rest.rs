//! [`Gateway`] binding for a bearer-token JSON REST API.

use crate::gateway::{Gateway, Item, Post, RemoteError, RemoteResult, User};
use model::{form::Form, ConversationId, UserId};
use reqwest::{multipart, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Attachments larger than this are not downloaded.
const MAX_ATTACHMENT_SIZE: usize = 1 << 20;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewItem<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<&'a Form>,
}

#[derive(Serialize)]
struct FormUpdate<'a> {
    form: &'a Form,
}

#[derive(Serialize)]
struct DirectRequest<'a> {
    participant: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItem {
    item_id: String,
    conv_id: String,
    #[serde(default)]
    parent_item_id: Option<String>,
}

impl From<WireItem> for Item {
    fn from(WireItem { item_id, conv_id, parent_item_id }: WireItem) -> Self {
        Self { id: item_id, conversation: conv_id, parent: parent_item_id }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    user_id: String,
    display_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConversation {
    conv_id: String,
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        log::warn!("platform request failed: {err}");
        Self::Transient
    }
}

pub struct RestGateway {
    http: reqwest::Client,
    /// Base URL without a trailing slash.
    base: Box<str>,
    token: Box<str>,
}

impl RestGateway {
    pub fn new(base: &str, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').into(),
            token: token.into_boxed_str(),
        }
    }

    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request.bearer_auth(&self.token).send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RemoteError::PermissionDenied),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound),
            status => {
                log::warn!("platform responded with {status} for {}", response.url());
                Err(RemoteError::Transient)
            }
        }
    }
}

impl Gateway for RestGateway {
    async fn post(&self, conversation: &str, post: Post) -> RemoteResult<Item> {
        let url = format!("{}/conversations/{conversation}/messages", self.base);
        let item = NewItem {
            parent_id: post.parent.as_deref(),
            subject: post.subject.as_deref(),
            content: post.content.as_deref(),
            form: post.form.as_ref(),
        };

        let request = if post.attachments.is_empty() {
            self.http.post(url).json(&item)
        } else {
            let json = serde_json::to_string(&item).map_err(|_| RemoteError::Transient)?;
            let mut body = multipart::Form::new().text("item", json);
            for attachment in post.attachments {
                let part = multipart::Part::bytes(attachment.bytes).file_name(attachment.name).mime_str(attachment.mime)?;
                body = body.part("attachments", part);
            }
            self.http.post(url).multipart(body)
        };

        let item: WireItem = self.send(request).await?.json().await?;
        Ok(item.into())
    }

    async fn update(&self, item: &str, form: Form) -> RemoteResult<()> {
        let url = format!("{}/conversations/messages/{item}", self.base);
        self.send(self.http.put(url).json(&FormUpdate { form: &form })).await?;
        Ok(())
    }

    async fn item(&self, item: &str) -> RemoteResult<Item> {
        let url = format!("{}/conversations/messages/{item}", self.base);
        let item: WireItem = self.send(self.http.get(url)).await?.json().await?;
        Ok(item.into())
    }

    async fn is_member(&self, conversation: &str) -> RemoteResult<bool> {
        let url = format!("{}/conversations/{conversation}", self.base);
        match self.send(self.http.get(url)).await {
            Ok(_) => Ok(true),
            Err(RemoteError::PermissionDenied) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn users(&self, ids: &[UserId]) -> RemoteResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/users/list", self.base);
        let request = self.http.get(url).query(&[("userIdList", ids.join(","))]);
        let users: Vec<WireUser> = self.send(request).await?.json().await?;
        Ok(users.into_iter().map(|WireUser { user_id, display_name }| User { id: user_id, display_name }).collect())
    }

    async fn direct(&self, user: &str) -> RemoteResult<ConversationId> {
        let url = format!("{}/conversations/direct", self.base);
        let request = self.http.post(url).json(&DirectRequest { participant: user });
        let WireConversation { conv_id } = self.send(request).await?.json().await?;
        Ok(conv_id)
    }

    async fn attachment(&self, url: &str) -> RemoteResult<Vec<u8>> {
        // Only the platform's own file store gets to see the token.
        let request = self.http.get(url);
        let response = if url.starts_with(self.base.as_ref()) {
            self.send(request).await?
        } else {
            request.send().await?.error_for_status()?
        };

        if response.content_length().is_some_and(|len| len > MAX_ATTACHMENT_SIZE as u64) {
            return Err(RemoteError::Transient);
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_ATTACHMENT_SIZE {
            return Err(RemoteError::Transient);
        }

        Ok(bytes.to_vec())
    }
}
