//! Async Web API facade.
//!
//! # Design
//! Every operation is `SlackClient::build_*` → `dispatch::execute` →
//! `decode::*`: exactly one round trip, errors forwarded unchanged. `WebApi`
//! is a cheap `Clone` over a shared inner value and holds no mutable state,
//! so clones can issue calls concurrently.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use url::Url;

use crate::client::SlackClient;
use crate::decode;
use crate::dispatch::{execute, Payload, Transport};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, BuildError};
use crate::http::HttpRequest;
use crate::params::Params;
use crate::request::{FileUpload, DEFAULT_BASE_URL};
use crate::transport::ReqwestTransport;
use crate::types::{
    Attachment, AuthIdentity, Channel, Comment, ConversationKind, DoNotDisturbStatus, File,
    History, HistoryOptions, Item, MessageOptions, OAuthAccess, ParseMode, PostedMessage,
    Presence, Reaction, RtmSession, Team, UploadOptions, User,
};

const DEFAULT_USER_AGENT: &str = concat!("slack-core", "@", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the token for [`WebApi::from_env`].
pub const TOKEN_ENV: &str = "SLACK_TOKEN";
/// Optional environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "SLACK_API_URL";

/// Configures a [`WebApi`] before construction.
///
/// # Defaults
/// - Base URL: `https://slack.com/api/`
/// - Request timeout: reqwest default (none) unless set via
///   [`Self::request_timeout`]
/// - User-agent: `slack-core@<crate-version>` plus any
///   [`Self::user_agent_extra`]
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct WebApiBuilder {
    token: Option<String>,
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    user_agent_extra: Option<String>,
}

impl WebApiBuilder {
    pub fn token<S: Into<String>>(&mut self, token: S) -> &mut Self {
        self.token = Some(token.into());
        self
    }

    /// Point the client at another deployment, e.g. a local mock server.
    pub fn base_url<S: Into<String>>(&mut self, base_url: S) -> &mut Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Append a segment after the default `slack-core@<version>` user agent.
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    pub fn build(&self) -> Result<WebApi, BuildError> {
        let token = match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(BuildError::MissingToken),
        };
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(base_url)?;

        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT.to_string(),
        };
        let mut http = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.request_timeout {
            http = http.timeout(timeout);
        }

        Ok(WebApi::with_transport(
            SlackClient::new(base_url, token),
            ReqwestTransport::new(http.build()?),
        ))
    }
}

/// Async client for the Web API.
pub struct WebApi<T = ReqwestTransport> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    client: SlackClient,
    transport: T,
}

impl<T> Clone for WebApi<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for WebApi<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebApi")
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

impl WebApi {
    pub fn builder() -> WebApiBuilder {
        WebApiBuilder::default()
    }

    /// Client for the public API with default settings.
    pub fn new(token: &str) -> Result<Self, BuildError> {
        Self::builder().token(token).build()
    }

    /// Configure from `SLACK_TOKEN` (required) and `SLACK_API_URL` (optional).
    pub fn from_env() -> Result<Self, BuildError> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(BuildError::MissingEnv(TOKEN_ENV))?;
        let mut builder = Self::builder();
        builder.token(token);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder.base_url(base_url);
        }
        builder.build()
    }
}

impl<T: Transport> WebApi<T> {
    /// Drive `client`'s requests through a custom transport.
    pub fn with_transport(client: SlackClient, transport: T) -> Self {
        Self {
            inner: Arc::new(Inner { client, transport }),
        }
    }

    /// The request builder behind this facade.
    pub fn client(&self) -> &SlackClient {
        &self.inner.client
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        request: Result<HttpRequest, ApiError>,
    ) -> Result<Payload, ApiError> {
        execute(&self.inner.transport, request)
            .instrument(tracing::debug_span!("web_api", %endpoint))
            .await
    }

    // -- realtime and auth --------------------------------------------------

    /// Start a realtime session and return the socket URL with the initial
    /// state payload.
    pub async fn rtm_start(
        &self,
        simple_latest: Option<bool>,
        no_unreads: Option<bool>,
        mpim_aware: Option<bool>,
    ) -> Result<RtmSession, ApiError> {
        let request = self
            .client()
            .build_rtm_start(simple_latest, no_unreads, mpim_aware);
        decode::rtm_session(self.send(Endpoint::RtmStart, request).await?)
    }

    pub async fn auth_test(&self) -> Result<AuthIdentity, ApiError> {
        let request = self.client().build_auth_test();
        decode::whole(self.send(Endpoint::AuthTest, request).await?)
    }

    pub async fn oauth_access(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<OAuthAccess, ApiError> {
        let request = self
            .client()
            .build_oauth_access(client_id, client_secret, code, redirect_uri);
        decode::whole(self.send(Endpoint::OauthAccess, request).await?)
    }

    /// Returns the server's `revoked` flag (false for a `test` call).
    pub async fn oauth_revoke(&self, token: &str, test: Option<bool>) -> Result<bool, ApiError> {
        let request = self.client().build_oauth_revoke(token, test);
        decode::field(self.send(Endpoint::AuthRevoke, request).await?, "revoked")
    }

    /// Echo `args` back from the server.
    pub async fn api_test(&self, args: &Params) -> Result<Payload, ApiError> {
        let request = self.client().build_api_test(args);
        self.send(Endpoint::ApiTest, request).await
    }

    // -- conversations by kind ----------------------------------------------

    pub async fn history(
        &self,
        kind: ConversationKind,
        channel: &str,
        options: &HistoryOptions,
    ) -> Result<History, ApiError> {
        let request = self.client().build_history(kind, channel, options);
        decode::history(self.send(kind.history_endpoint(), request).await?)
    }

    /// Move the read cursor to `ts`. Returns `ts` on success.
    pub async fn mark(&self, kind: ConversationKind, channel: &str, ts: &str) -> Result<String, ApiError> {
        let request = self.client().build_mark(kind, channel, ts);
        self.send(kind.mark_endpoint(), request).await?;
        Ok(ts.to_string())
    }

    pub async fn list(&self, kind: ConversationKind, exclude_archived: bool) -> Result<Vec<Channel>, ApiError> {
        let request = self.client().build_list(kind, exclude_archived);
        decode::channels(self.send(kind.list_endpoint(), request).await?, kind.list_key())
    }

    // -- channels -----------------------------------------------------------

    pub async fn channel_history(&self, channel: &str, options: &HistoryOptions) -> Result<History, ApiError> {
        self.history(ConversationKind::Channel, channel, options).await
    }

    pub async fn channel_info(&self, channel: &str) -> Result<Channel, ApiError> {
        let request = self.client().build_channel_info(channel);
        decode::channel(self.send(Endpoint::ChannelsInfo, request).await?, "channel")
    }

    pub async fn channels_list(&self, exclude_archived: bool) -> Result<Vec<Channel>, ApiError> {
        self.list(ConversationKind::Channel, exclude_archived).await
    }

    pub async fn mark_channel(&self, channel: &str, ts: &str) -> Result<String, ApiError> {
        self.mark(ConversationKind::Channel, channel, ts).await
    }

    pub async fn set_channel_purpose(&self, channel: &str, purpose: &str) -> Result<(), ApiError> {
        let request = self.client().build_set_channel_purpose(channel, purpose);
        self.send(Endpoint::ChannelsSetPurpose, request).await.map(drop)
    }

    pub async fn set_channel_topic(&self, channel: &str, topic: &str) -> Result<(), ApiError> {
        let request = self.client().build_set_channel_topic(channel, topic);
        self.send(Endpoint::ChannelsSetTopic, request).await.map(drop)
    }

    // -- chat ---------------------------------------------------------------

    pub async fn delete_message(&self, channel: &str, ts: &str) -> Result<(), ApiError> {
        let request = self.client().build_delete_message(channel, ts);
        self.send(Endpoint::ChatDelete, request).await.map(drop)
    }

    pub async fn send_message(
        &self,
        channel: &str,
        text: &str,
        options: &MessageOptions,
    ) -> Result<PostedMessage, ApiError> {
        let request = self.client().build_send_message(channel, text, options);
        decode::posted_message(self.send(Endpoint::ChatPostMessage, request).await?)
    }

    pub async fn send_me_message(&self, channel: &str, text: &str) -> Result<PostedMessage, ApiError> {
        let request = self.client().build_send_me_message(channel, text);
        decode::posted_message(self.send(Endpoint::ChatMeMessage, request).await?)
    }

    pub async fn update_message(
        &self,
        channel: &str,
        ts: &str,
        text: &str,
        attachments: Option<&[Attachment]>,
        parse: ParseMode,
        link_names: bool,
    ) -> Result<(), ApiError> {
        let request = self
            .client()
            .build_update_message(channel, ts, text, attachments, parse, link_names);
        self.send(Endpoint::ChatUpdate, request).await.map(drop)
    }

    // -- do not disturb and emoji -------------------------------------------

    /// Do-not-disturb status of `user`, or of the caller when `None`.
    pub async fn dnd_info(&self, user: Option<&str>) -> Result<DoNotDisturbStatus, ApiError> {
        let request = self.client().build_dnd_info(user);
        decode::dnd_status(self.send(Endpoint::DndInfo, request).await?)
    }

    pub async fn dnd_team_info(
        &self,
        users: Option<&[&str]>,
    ) -> Result<BTreeMap<String, DoNotDisturbStatus>, ApiError> {
        let request = self.client().build_dnd_team_info(users);
        decode::dnd_statuses(self.send(Endpoint::DndTeamInfo, request).await?)
    }

    pub async fn emoji_list(&self) -> Result<BTreeMap<String, String>, ApiError> {
        let request = self.client().build_emoji_list();
        decode::emoji(self.send(Endpoint::EmojiList, request).await?)
    }

    // -- files --------------------------------------------------------------

    pub async fn delete_file(&self, file: &str) -> Result<(), ApiError> {
        let request = self.client().build_delete_file(file);
        self.send(Endpoint::FilesDelete, request).await.map(drop)
    }

    /// File metadata with its comments attached.
    pub async fn file_info(&self, file: &str, comment_count: u32, page: u32) -> Result<File, ApiError> {
        let request = self.client().build_file_info(file, comment_count, page);
        decode::file_info(self.send(Endpoint::FilesInfo, request).await?)
    }

    pub async fn upload_file(&self, file: &FileUpload, options: &UploadOptions) -> Result<File, ApiError> {
        let request = self.client().build_upload_file(file, options);
        decode::file(self.send(Endpoint::FilesUpload, request).await?)
    }

    pub async fn add_file_comment(&self, file: &str, comment: &str) -> Result<Comment, ApiError> {
        let request = self.client().build_add_file_comment(file, comment);
        decode::comment(self.send(Endpoint::FilesCommentsAdd, request).await?)
    }

    pub async fn edit_file_comment(
        &self,
        file: &str,
        comment_id: &str,
        comment: &str,
    ) -> Result<Comment, ApiError> {
        let request = self
            .client()
            .build_edit_file_comment(file, comment_id, comment);
        decode::comment(self.send(Endpoint::FilesCommentsEdit, request).await?)
    }

    pub async fn delete_file_comment(&self, file: &str, comment_id: &str) -> Result<(), ApiError> {
        let request = self.client().build_delete_file_comment(file, comment_id);
        self.send(Endpoint::FilesCommentsDelete, request).await.map(drop)
    }

    // -- private groups -----------------------------------------------------

    pub async fn close_group(&self, channel: &str) -> Result<(), ApiError> {
        let request = self.client().build_close_group(channel);
        self.send(Endpoint::GroupsClose, request).await.map(drop)
    }

    pub async fn group_history(&self, channel: &str, options: &HistoryOptions) -> Result<History, ApiError> {
        self.history(ConversationKind::Group, channel, options).await
    }

    pub async fn group_info(&self, channel: &str) -> Result<Channel, ApiError> {
        let request = self.client().build_group_info(channel);
        decode::channel(self.send(Endpoint::GroupsInfo, request).await?, "group")
    }

    pub async fn groups_list(&self, exclude_archived: bool) -> Result<Vec<Channel>, ApiError> {
        self.list(ConversationKind::Group, exclude_archived).await
    }

    pub async fn mark_group(&self, channel: &str, ts: &str) -> Result<String, ApiError> {
        self.mark(ConversationKind::Group, channel, ts).await
    }

    pub async fn open_group(&self, channel: &str) -> Result<(), ApiError> {
        let request = self.client().build_open_group(channel);
        self.send(Endpoint::GroupsOpen, request).await.map(drop)
    }

    pub async fn set_group_purpose(&self, channel: &str, purpose: &str) -> Result<(), ApiError> {
        let request = self.client().build_set_group_purpose(channel, purpose);
        self.send(Endpoint::GroupsSetPurpose, request).await.map(drop)
    }

    pub async fn set_group_topic(&self, channel: &str, topic: &str) -> Result<(), ApiError> {
        let request = self.client().build_set_group_topic(channel, topic);
        self.send(Endpoint::GroupsSetTopic, request).await.map(drop)
    }

    // -- direct messages ----------------------------------------------------

    pub async fn close_im(&self, channel: &str) -> Result<(), ApiError> {
        let request = self.client().build_close_im(channel);
        self.send(Endpoint::ImClose, request).await.map(drop)
    }

    pub async fn im_history(&self, channel: &str, options: &HistoryOptions) -> Result<History, ApiError> {
        self.history(ConversationKind::Im, channel, options).await
    }

    pub async fn ims_list(&self, exclude_archived: bool) -> Result<Vec<Channel>, ApiError> {
        self.list(ConversationKind::Im, exclude_archived).await
    }

    pub async fn mark_im(&self, channel: &str, ts: &str) -> Result<String, ApiError> {
        self.mark(ConversationKind::Im, channel, ts).await
    }

    /// Open a direct message with `user` and return its channel id.
    pub async fn open_im(&self, user: &str) -> Result<String, ApiError> {
        let request = self.client().build_open_im(user);
        decode::id_of(self.send(Endpoint::ImOpen, request).await?, "channel")
    }

    // -- multiparty direct messages -----------------------------------------

    pub async fn close_mpim(&self, channel: &str) -> Result<(), ApiError> {
        let request = self.client().build_close_mpim(channel);
        self.send(Endpoint::MpimClose, request).await.map(drop)
    }

    pub async fn mpim_history(&self, channel: &str, options: &HistoryOptions) -> Result<History, ApiError> {
        self.history(ConversationKind::Mpim, channel, options).await
    }

    pub async fn mpims_list(&self, exclude_archived: bool) -> Result<Vec<Channel>, ApiError> {
        self.list(ConversationKind::Mpim, exclude_archived).await
    }

    pub async fn mark_mpim(&self, channel: &str, ts: &str) -> Result<String, ApiError> {
        self.mark(ConversationKind::Mpim, channel, ts).await
    }

    /// Open a conversation with `users` and return its id.
    pub async fn open_mpim(&self, users: &[&str]) -> Result<String, ApiError> {
        let request = self.client().build_open_mpim(users);
        decode::id_of(self.send(Endpoint::MpimOpen, request).await?, "group")
    }

    // -- pins, reactions, stars ---------------------------------------------

    pub async fn pin_item(&self, channel: &str, item: &Item) -> Result<(), ApiError> {
        let request = self.client().build_pin_item(channel, item);
        self.send(Endpoint::PinsAdd, request).await.map(drop)
    }

    pub async fn unpin_item(&self, channel: &str, item: &Item) -> Result<(), ApiError> {
        let request = self.client().build_unpin_item(channel, item);
        self.send(Endpoint::PinsRemove, request).await.map(drop)
    }

    pub async fn add_reaction(&self, name: &str, item: &Item) -> Result<(), ApiError> {
        let request = self.client().build_add_reaction(name, item);
        self.send(Endpoint::ReactionsAdd, request).await.map(drop)
    }

    pub async fn remove_reaction(&self, name: &str, item: &Item) -> Result<(), ApiError> {
        let request = self.client().build_remove_reaction(name, item);
        self.send(Endpoint::ReactionsRemove, request).await.map(drop)
    }

    pub async fn reactions_get(&self, item: &Item, full: Option<bool>) -> Result<Vec<Reaction>, ApiError> {
        let request = self.client().build_reactions_get(item, full);
        decode::item_reactions(self.send(Endpoint::ReactionsGet, request).await?)
    }

    /// Items reacted to by `user` (the caller when `None`), as raw objects.
    pub async fn reactions_list(
        &self,
        user: Option<&str>,
        full: Option<bool>,
        count: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Payload>, ApiError> {
        let request = self.client().build_reactions_list(user, full, count, page);
        decode::field(self.send(Endpoint::ReactionsList, request).await?, "items")
    }

    pub async fn add_star(&self, item: &Item) -> Result<(), ApiError> {
        let request = self.client().build_add_star(item);
        self.send(Endpoint::StarsAdd, request).await.map(drop)
    }

    pub async fn remove_star(&self, item: &Item) -> Result<(), ApiError> {
        let request = self.client().build_remove_star(item);
        self.send(Endpoint::StarsRemove, request).await.map(drop)
    }

    // -- team and users -----------------------------------------------------

    pub async fn team_info(&self) -> Result<Team, ApiError> {
        let request = self.client().build_team_info();
        decode::field(self.send(Endpoint::TeamInfo, request).await?, "team")
    }

    /// `active` or `away`.
    pub async fn user_presence(&self, user: &str) -> Result<String, ApiError> {
        let request = self.client().build_user_presence(user);
        decode::field(self.send(Endpoint::UsersGetPresence, request).await?, "presence")
    }

    pub async fn user_info(&self, user: &str) -> Result<User, ApiError> {
        let request = self.client().build_user_info(user);
        decode::field(self.send(Endpoint::UsersInfo, request).await?, "user")
    }

    pub async fn users_list(&self, include_presence: bool) -> Result<Vec<User>, ApiError> {
        let request = self.client().build_users_list(include_presence);
        decode::field(self.send(Endpoint::UsersList, request).await?, "members")
    }

    pub async fn set_user_active(&self) -> Result<(), ApiError> {
        let request = self.client().build_set_user_active();
        self.send(Endpoint::UsersSetActive, request).await.map(drop)
    }

    pub async fn set_user_presence(&self, presence: Presence) -> Result<(), ApiError> {
        let request = self.client().build_set_user_presence(presence);
        self.send(Endpoint::UsersSetPresence, request).await.map(drop)
    }
}
