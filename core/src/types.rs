//! Typed arguments and results for the Web API facade.
//!
//! Result types deserialize from the reply objects the server sends. Only
//! identifiers are required; the remaining fields are optional because the
//! server omits them freely depending on object kind and token scopes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dispatch::Payload;
use crate::endpoint::Endpoint;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Presence values accepted by `users.setPresence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Auto,
    Away,
}

impl Presence {
    pub fn as_str(self) -> &'static str {
        match self {
            Presence::Auto => "auto",
            Presence::Away => "away",
        }
    }
}

/// Message parse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    Full,
    #[default]
    None,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Full => "full",
            ParseMode::None => "none",
        }
    }
}

/// The four conversation families, each with its own endpoint group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationKind {
    Channel,
    Group,
    Im,
    Mpim,
}

impl ConversationKind {
    pub fn history_endpoint(self) -> Endpoint {
        match self {
            ConversationKind::Channel => Endpoint::ChannelsHistory,
            ConversationKind::Group => Endpoint::GroupsHistory,
            ConversationKind::Im => Endpoint::ImHistory,
            ConversationKind::Mpim => Endpoint::MpimHistory,
        }
    }

    pub fn mark_endpoint(self) -> Endpoint {
        match self {
            ConversationKind::Channel => Endpoint::ChannelsMark,
            ConversationKind::Group => Endpoint::GroupsMark,
            ConversationKind::Im => Endpoint::ImMark,
            ConversationKind::Mpim => Endpoint::MpimMark,
        }
    }

    pub fn list_endpoint(self) -> Endpoint {
        match self {
            ConversationKind::Channel => Endpoint::ChannelsList,
            ConversationKind::Group => Endpoint::GroupsList,
            ConversationKind::Im => Endpoint::ImList,
            ConversationKind::Mpim => Endpoint::MpimList,
        }
    }

    /// Key holding the array in a list reply. Multiparty IMs are listed
    /// under `groups`.
    pub fn list_key(self) -> &'static str {
        match self {
            ConversationKind::Channel => "channels",
            ConversationKind::Group | ConversationKind::Mpim => "groups",
            ConversationKind::Im => "ims",
        }
    }
}

/// Paging window for `*.history` calls.
///
/// `latest: None` leaves the upper bound to the server (now).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOptions {
    pub latest: Option<String>,
    pub oldest: String,
    pub inclusive: bool,
    pub count: u32,
    pub unreads: bool,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            latest: None,
            oldest: "0".to_string(),
            inclusive: false,
            count: 100,
            unreads: false,
        }
    }
}

/// Optional arguments of `chat.postMessage`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    pub username: Option<String>,
    pub as_user: Option<bool>,
    pub parse: Option<ParseMode>,
    pub link_names: Option<bool>,
    pub attachments: Option<Vec<Attachment>>,
    pub unfurl_links: Option<bool>,
    pub unfurl_media: Option<bool>,
    pub icon_url: Option<String>,
    pub icon_emoji: Option<String>,
}

/// Optional arguments of `files.upload`. `filetype: None` lets the server
/// detect the type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub filetype: Option<String>,
    pub title: Option<String>,
    pub initial_comment: Option<String>,
    pub channels: Vec<String>,
}

/// Target of a pin, reaction or star.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    File(String),
    FileComment(String),
    Message { channel: String, timestamp: String },
    /// Stars only.
    Channel(String),
}

/// Rich message attachment, sent JSON-encoded in the `attachments` parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reaction {
    pub name: String,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub ts: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A page of conversation history, newest first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct History {
    #[serde(default)]
    pub latest: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
}

/// Purpose or topic text of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Topic {
    pub value: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub last_set: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub is_archived: Option<bool>,
    #[serde(default)]
    pub is_general: Option<bool>,
    #[serde(default)]
    pub is_member: Option<bool>,
    #[serde(default)]
    pub is_channel: Option<bool>,
    #[serde(default)]
    pub is_group: Option<bool>,
    #[serde(default)]
    pub is_im: Option<bool>,
    #[serde(default)]
    pub is_mpim: Option<bool>,
    #[serde(default)]
    pub is_open: Option<bool>,
    /// Counterpart of a direct message conversation.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub topic: Option<Topic>,
    #[serde(default)]
    pub purpose: Option<Topic>,
    #[serde(default)]
    pub unread_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image_72: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub is_bot: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub tz: Option<String>,
    #[serde(default)]
    pub presence: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct File {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub url_private: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub comments_count: Option<u32>,
    /// Comments returned alongside `files.info`, keyed by comment id.
    #[serde(skip)]
    pub comments: BTreeMap<String, Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DoNotDisturbStatus {
    #[serde(default)]
    pub dnd_enabled: bool,
    #[serde(default)]
    pub next_dnd_start_ts: Option<i64>,
    #[serde(default)]
    pub next_dnd_end_ts: Option<i64>,
    #[serde(default)]
    pub snooze_enabled: Option<bool>,
    #[serde(default)]
    pub snooze_endtime: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub email_domain: Option<String>,
}

/// Identity behind the client's token, from `auth.test`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthIdentity {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Result of exchanging an OAuth code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthAccess {
    pub access_token: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Where a posted message landed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostedMessage {
    pub ts: String,
    pub channel: String,
}

/// Realtime session handoff from `rtm.start`.
///
/// `url` is the socket address for the realtime collaborator; `payload` is
/// the rest of the reply (self, team, users, channels) for its initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct RtmSession {
    pub url: String,
    pub payload: Payload,
}
