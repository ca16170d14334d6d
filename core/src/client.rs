//! Stateless request builder for every Web API operation.
//!
//! # Design
//! `SlackClient` holds the token and a `RequestBuilder` and carries no mutable
//! state between calls. Each operation has a `build_*` method that turns typed
//! arguments into an `HttpRequest`; `parse_response` classifies whatever the
//! host got back. Hosts that do their own I/O use the pair directly, and
//! `WebApi` drives the same methods over a `Transport`, so parameter naming
//! lives in exactly one place.

use crate::dispatch::{classify, Payload};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, NetworkError};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{escape_message_text, Params};
use crate::request::{FileUpload, RequestBuilder};
use crate::types::{
    Attachment, ConversationKind, HistoryOptions, Item, MessageOptions, ParseMode, Presence,
    UploadOptions,
};

/// Builds request descriptors for one token against one API base URL.
#[derive(Clone)]
pub struct SlackClient {
    token: String,
    requests: RequestBuilder,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.requests.base_url())
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            token: token.to_string(),
            requests: RequestBuilder::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    /// Build any catalog endpoint from a raw parameter set. The stored token
    /// is attached unless the endpoint authenticates through its arguments.
    ///
    /// `files.upload` is refused here: it is always a multipart POST and goes
    /// through `build_upload_file` instead.
    pub fn build(&self, endpoint: Endpoint, params: Option<&Params>) -> Result<HttpRequest, ApiError> {
        if endpoint == Endpoint::FilesUpload {
            return Err(NetworkError::InvalidRequest {
                endpoint,
                reason: "uploads must be built as multipart requests".to_string(),
            }
            .into());
        }
        let token = endpoint.uses_stored_token().then_some(self.token.as_str());
        self.requests.build(endpoint, token, params)
    }

    /// Classify a response the host obtained for one of this client's requests.
    pub fn parse_response(&self, response: &HttpResponse) -> Result<Payload, ApiError> {
        classify(response)
    }

    fn call(&self, endpoint: Endpoint, params: Params) -> Result<HttpRequest, ApiError> {
        self.build(endpoint, Some(&params))
    }

    // -- realtime and auth --------------------------------------------------

    pub fn build_rtm_start(
        &self,
        simple_latest: Option<bool>,
        no_unreads: Option<bool>,
        mpim_aware: Option<bool>,
    ) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("simple_latest", simple_latest)
            .with("no_unreads", no_unreads)
            .with("mpim_aware", mpim_aware);
        self.call(Endpoint::RtmStart, params)
    }

    pub fn build_auth_test(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::AuthTest, None)
    }

    /// Exchange an OAuth code. Built without the stored token.
    pub fn build_oauth_access(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("client_id", client_id)
            .with("client_secret", client_secret)
            .with("code", code)
            .with("redirect_uri", redirect_uri);
        self.call(Endpoint::OauthAccess, params)
    }

    /// Revoke `token`, which need not be the stored one.
    pub fn build_oauth_revoke(&self, token: &str, test: Option<bool>) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("token", token).with("test", test);
        self.call(Endpoint::AuthRevoke, params)
    }

    /// `api.test` echoes its arguments back.
    pub fn build_api_test(&self, args: &Params) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::ApiTest, Some(args))
    }

    // -- conversations ------------------------------------------------------

    pub fn build_history(
        &self,
        kind: ConversationKind,
        channel: &str,
        options: &HistoryOptions,
    ) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("channel", channel)
            .with("latest", options.latest.as_ref())
            .with("oldest", &options.oldest)
            .with("inclusive", options.inclusive)
            .with("count", options.count)
            .with("unreads", options.unreads);
        self.call(kind.history_endpoint(), params)
    }

    pub fn build_mark(
        &self,
        kind: ConversationKind,
        channel: &str,
        ts: &str,
    ) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("channel", channel).with("ts", ts);
        self.call(kind.mark_endpoint(), params)
    }

    pub fn build_list(&self, kind: ConversationKind, exclude_archived: bool) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("exclude_archived", exclude_archived);
        self.call(kind.list_endpoint(), params)
    }

    pub fn build_channel_info(&self, channel: &str) -> Result<HttpRequest, ApiError> {
        self.channel_only(Endpoint::ChannelsInfo, channel)
    }

    pub fn build_group_info(&self, channel: &str) -> Result<HttpRequest, ApiError> {
        self.channel_only(Endpoint::GroupsInfo, channel)
    }

    pub fn build_set_channel_purpose(&self, channel: &str, purpose: &str) -> Result<HttpRequest, ApiError> {
        self.set_info(Endpoint::ChannelsSetPurpose, "purpose", channel, purpose)
    }

    pub fn build_set_channel_topic(&self, channel: &str, topic: &str) -> Result<HttpRequest, ApiError> {
        self.set_info(Endpoint::ChannelsSetTopic, "topic", channel, topic)
    }

    pub fn build_set_group_purpose(&self, channel: &str, purpose: &str) -> Result<HttpRequest, ApiError> {
        self.set_info(Endpoint::GroupsSetPurpose, "purpose", channel, purpose)
    }

    pub fn build_set_group_topic(&self, channel: &str, topic: &str) -> Result<HttpRequest, ApiError> {
        self.set_info(Endpoint::GroupsSetTopic, "topic", channel, topic)
    }

    pub fn build_close_group(&self, channel: &str) -> Result<HttpRequest, ApiError> {
        self.channel_only(Endpoint::GroupsClose, channel)
    }

    pub fn build_close_im(&self, channel: &str) -> Result<HttpRequest, ApiError> {
        self.channel_only(Endpoint::ImClose, channel)
    }

    pub fn build_close_mpim(&self, channel: &str) -> Result<HttpRequest, ApiError> {
        self.channel_only(Endpoint::MpimClose, channel)
    }

    pub fn build_open_group(&self, channel: &str) -> Result<HttpRequest, ApiError> {
        self.channel_only(Endpoint::GroupsOpen, channel)
    }

    pub fn build_open_im(&self, user: &str) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::ImOpen, Params::new().with("user", user))
    }

    pub fn build_open_mpim(&self, users: &[&str]) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::MpimOpen, Params::new().with("users", users.join(",")))
    }

    fn channel_only(&self, endpoint: Endpoint, channel: &str) -> Result<HttpRequest, ApiError> {
        self.call(endpoint, Params::new().with("channel", channel))
    }

    fn set_info(
        &self,
        endpoint: Endpoint,
        key: &str,
        channel: &str,
        text: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.call(endpoint, Params::new().with("channel", channel).with(key, text))
    }

    // -- chat ---------------------------------------------------------------

    /// Post `text` (escaped for the message format) to `channel`.
    pub fn build_send_message(
        &self,
        channel: &str,
        text: &str,
        options: &MessageOptions,
    ) -> Result<HttpRequest, ApiError> {
        let attachments =
            encode_attachments(Endpoint::ChatPostMessage, options.attachments.as_deref())?;
        let params = Params::new()
            .with("channel", channel)
            .with("text", escape_message_text(text))
            .with("as_user", options.as_user)
            .with("parse", options.parse.map(ParseMode::as_str))
            .with("link_names", options.link_names)
            .with("unfurl_links", options.unfurl_links)
            .with("unfurl_media", options.unfurl_media)
            .with("username", options.username.as_ref())
            .with("attachments", attachments)
            .with("icon_url", options.icon_url.as_ref())
            .with("icon_emoji", options.icon_emoji.as_ref());
        self.call(Endpoint::ChatPostMessage, params)
    }

    pub fn build_send_me_message(&self, channel: &str, text: &str) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("channel", channel)
            .with("text", escape_message_text(text));
        self.call(Endpoint::ChatMeMessage, params)
    }

    pub fn build_update_message(
        &self,
        channel: &str,
        ts: &str,
        text: &str,
        attachments: Option<&[Attachment]>,
        parse: ParseMode,
        link_names: bool,
    ) -> Result<HttpRequest, ApiError> {
        let attachments = encode_attachments(Endpoint::ChatUpdate, attachments)?;
        let params = Params::new()
            .with("channel", channel)
            .with("ts", ts)
            .with("text", escape_message_text(text))
            .with("parse", parse.as_str())
            .with("link_names", link_names)
            .with("attachments", attachments);
        self.call(Endpoint::ChatUpdate, params)
    }

    pub fn build_delete_message(&self, channel: &str, ts: &str) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("channel", channel).with("ts", ts);
        self.call(Endpoint::ChatDelete, params)
    }

    // -- do not disturb, emoji, team ----------------------------------------

    pub fn build_dnd_info(&self, user: Option<&str>) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::DndInfo, Params::new().with("user", user))
    }

    pub fn build_dnd_team_info(&self, users: Option<&[&str]>) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("users", users.map(|u| u.join(",")));
        self.call(Endpoint::DndTeamInfo, params)
    }

    pub fn build_emoji_list(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::EmojiList, None)
    }

    pub fn build_team_info(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::TeamInfo, None)
    }

    // -- files --------------------------------------------------------------

    pub fn build_delete_file(&self, file: &str) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::FilesDelete, Params::new().with("file", file))
    }

    /// File metadata with up to `comment_count` comments from page `page`.
    pub fn build_file_info(&self, file: &str, comment_count: u32, page: u32) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("file", file)
            .with("count", comment_count)
            .with("page", page);
        self.call(Endpoint::FilesInfo, params)
    }

    /// Multipart upload. Metadata rides in the query; the body holds only
    /// the file part.
    pub fn build_upload_file(&self, file: &FileUpload, options: &UploadOptions) -> Result<HttpRequest, ApiError> {
        let params = upload_params(file, options);
        self.requests.build_upload(Some(self.token.as_str()), Some(&params), file)
    }

    /// `build_upload_file` with a fixed multipart boundary.
    pub fn build_upload_file_with_boundary(
        &self,
        file: &FileUpload,
        options: &UploadOptions,
        boundary: &str,
    ) -> Result<HttpRequest, ApiError> {
        let params = upload_params(file, options);
        self.requests
            .build_upload_with_boundary(Some(self.token.as_str()), Some(&params), file, boundary)
    }

    pub fn build_add_file_comment(&self, file: &str, comment: &str) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("file", file)
            .with("comment", escape_message_text(comment));
        self.call(Endpoint::FilesCommentsAdd, params)
    }

    pub fn build_edit_file_comment(
        &self,
        file: &str,
        comment_id: &str,
        comment: &str,
    ) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("file", file)
            .with("id", comment_id)
            .with("comment", escape_message_text(comment));
        self.call(Endpoint::FilesCommentsEdit, params)
    }

    pub fn build_delete_file_comment(&self, file: &str, comment_id: &str) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("file", file).with("id", comment_id);
        self.call(Endpoint::FilesCommentsDelete, params)
    }

    // -- pins, reactions, stars ---------------------------------------------

    pub fn build_pin_item(&self, channel: &str, item: &Item) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::PinsAdd, pin_params(channel, item))
    }

    pub fn build_unpin_item(&self, channel: &str, item: &Item) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::PinsRemove, pin_params(channel, item))
    }

    pub fn build_add_reaction(&self, name: &str, item: &Item) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::ReactionsAdd, item_params(Params::new().with("name", name), item))
    }

    pub fn build_remove_reaction(&self, name: &str, item: &Item) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::ReactionsRemove, item_params(Params::new().with("name", name), item))
    }

    pub fn build_reactions_get(&self, item: &Item, full: Option<bool>) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::ReactionsGet, item_params(Params::new(), item).with("full", full))
    }

    pub fn build_reactions_list(
        &self,
        user: Option<&str>,
        full: Option<bool>,
        count: Option<u32>,
        page: Option<u32>,
    ) -> Result<HttpRequest, ApiError> {
        let params = Params::new()
            .with("user", user)
            .with("full", full)
            .with("count", count)
            .with("page", page);
        self.call(Endpoint::ReactionsList, params)
    }

    pub fn build_add_star(&self, item: &Item) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::StarsAdd, item_params(Params::new(), item))
    }

    pub fn build_remove_star(&self, item: &Item) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::StarsRemove, item_params(Params::new(), item))
    }

    // -- users --------------------------------------------------------------

    pub fn build_user_presence(&self, user: &str) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::UsersGetPresence, Params::new().with("user", user))
    }

    pub fn build_user_info(&self, user: &str) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::UsersInfo, Params::new().with("user", user))
    }

    pub fn build_users_list(&self, include_presence: bool) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::UsersList, Params::new().with("presence", include_presence))
    }

    pub fn build_set_user_active(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::UsersSetActive, None)
    }

    pub fn build_set_user_presence(&self, presence: Presence) -> Result<HttpRequest, ApiError> {
        self.call(Endpoint::UsersSetPresence, Params::new().with("presence", presence.as_str()))
    }
}

/// JSON-encode attachments for the `attachments` parameter.
fn encode_attachments(
    endpoint: Endpoint,
    attachments: Option<&[Attachment]>,
) -> Result<Option<String>, ApiError> {
    attachments
        .map(|a| {
            serde_json::to_string(a).map_err(|e| {
                ApiError::from(NetworkError::InvalidRequest {
                    endpoint,
                    reason: e.to_string(),
                })
            })
        })
        .transpose()
}

fn upload_params(file: &FileUpload, options: &UploadOptions) -> Params {
    let channels = (!options.channels.is_empty()).then(|| options.channels.join(","));
    Params::new()
        .with("filename", &file.filename)
        .with("filetype", options.filetype.as_deref().unwrap_or("auto"))
        .with("title", options.title.as_ref())
        .with("initial_comment", options.initial_comment.as_ref())
        .with("channels", channels)
}

fn pin_params(channel: &str, item: &Item) -> Params {
    item_params(Params::new().with("channel", channel), item)
}

fn item_params(params: Params, item: &Item) -> Params {
    match item {
        Item::File(id) => params.with("file", id),
        Item::FileComment(id) => params.with("file_comment", id),
        Item::Message { channel, timestamp } => {
            params.with("channel", channel).with("timestamp", timestamp)
        }
        Item::Channel(id) => params.with("channel", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn client() -> SlackClient {
        SlackClient::new("https://slack.com/api", "xoxb-1")
    }

    fn query(req: &HttpRequest) -> &str {
        req.url.split_once('?').map(|(_, q)| q).unwrap_or("")
    }

    #[test]
    fn history_uses_defaults_and_omits_latest() {
        let req = client()
            .build_history(ConversationKind::Channel, "C1", &HistoryOptions::default())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "https://slack.com/api/channels.history?token=xoxb-1&channel=C1&oldest=0&inclusive=false&count=100&unreads=false"
        );
    }

    #[test]
    fn history_endpoint_follows_kind() {
        let options = HistoryOptions {
            latest: Some("1500000000.000100".to_string()),
            ..HistoryOptions::default()
        };
        let req = client()
            .build_history(ConversationKind::Mpim, "G1", &options)
            .unwrap();
        assert!(req.url.starts_with("https://slack.com/api/mpim.history?"));
        assert!(query(&req).contains("&latest=1500000000.000100&"));
    }

    #[test]
    fn mark_per_kind() {
        for (kind, path) in [
            (ConversationKind::Channel, "channels.mark"),
            (ConversationKind::Group, "groups.mark"),
            (ConversationKind::Im, "im.mark"),
            (ConversationKind::Mpim, "mpim.mark"),
        ] {
            let req = client().build_mark(kind, "C1", "1.5").unwrap();
            assert_eq!(
                req.url,
                format!("https://slack.com/api/{path}?token=xoxb-1&channel=C1&ts=1.5")
            );
        }
    }

    #[test]
    fn send_message_escapes_text_and_drops_unset_options() {
        let req = client()
            .build_send_message("C1", "a <b> & c", &MessageOptions::default())
            .unwrap();
        assert_eq!(
            query(&req),
            "token=xoxb-1&channel=C1&text=a%20%26lt%3Bb%26gt%3B%20%26amp%3B%20c"
        );
    }

    #[test]
    fn send_message_with_options() {
        let options = MessageOptions {
            as_user: Some(true),
            parse: Some(ParseMode::Full),
            unfurl_media: Some(false),
            attachments: Some(vec![Attachment {
                text: Some("hi".to_string()),
                ..Attachment::default()
            }]),
            ..MessageOptions::default()
        };
        let req = client().build_send_message("C1", "x", &options).unwrap();
        assert_eq!(
            query(&req),
            "token=xoxb-1&channel=C1&text=x&as_user=true&parse=full&unfurl_media=false&attachments=%5B%7B%22text%22%3A%22hi%22%7D%5D"
        );
    }

    #[test]
    fn update_message_sends_parse_and_link_names() {
        let req = client()
            .build_update_message("C1", "1.0", "edited", None, ParseMode::None, false)
            .unwrap();
        assert_eq!(
            query(&req),
            "token=xoxb-1&channel=C1&ts=1.0&text=edited&parse=none&link_names=false"
        );
    }

    #[test]
    fn oauth_calls_skip_the_stored_token() {
        let access = client()
            .build_oauth_access("id", "secret", "code", None)
            .unwrap();
        assert_eq!(
            access.url,
            "https://slack.com/api/oauth.access?&client_id=id&client_secret=secret&code=code"
        );

        let revoke = client().build_oauth_revoke("xoxp-other", Some(true)).unwrap();
        assert_eq!(
            revoke.url,
            "https://slack.com/api/auth.revoke?&token=xoxp-other&test=true"
        );
    }

    #[test]
    fn open_mpim_joins_users() {
        let req = client().build_open_mpim(&["U1", "U2", "U3"]).unwrap();
        assert_eq!(query(&req), "token=xoxb-1&users=U1%2CU2%2CU3");
    }

    #[test]
    fn dnd_team_info_without_users_has_no_users_param() {
        let req = client().build_dnd_team_info(None).unwrap();
        assert_eq!(query(&req), "token=xoxb-1");
    }

    #[test]
    fn item_targets() {
        let c = client();
        let message = Item::Message {
            channel: "C1".to_string(),
            timestamp: "1.0".to_string(),
        };
        assert_eq!(
            query(&c.build_add_reaction("tada", &message).unwrap()),
            "token=xoxb-1&name=tada&channel=C1&timestamp=1.0"
        );
        assert_eq!(
            query(&c.build_add_star(&Item::FileComment("Fc1".to_string())).unwrap()),
            "token=xoxb-1&file_comment=Fc1"
        );
        assert_eq!(
            query(&c.build_pin_item("C1", &message).unwrap()),
            "token=xoxb-1&channel=C1&timestamp=1.0"
        );
        assert_eq!(
            query(&c.build_unpin_item("C1", &Item::File("F1".to_string())).unwrap()),
            "token=xoxb-1&channel=C1&file=F1"
        );
    }

    #[test]
    fn file_comment_text_is_escaped() {
        let req = client().build_add_file_comment("F1", "1 < 2").unwrap();
        assert_eq!(query(&req), "token=xoxb-1&file=F1&comment=1%20%26lt%3B%202");
    }

    #[test]
    fn upload_defaults_filetype_to_auto() {
        let file = FileUpload::new(b"data".to_vec(), "report.csv");
        let options = UploadOptions {
            channels: vec!["C1".to_string(), "C2".to_string()],
            ..UploadOptions::default()
        };
        let req = client()
            .build_upload_file_with_boundary(&file, &options, "B")
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            query(&req),
            "token=xoxb-1&filename=report.csv&filetype=auto&channels=C1%2CC2"
        );
    }

    #[test]
    fn set_user_presence_value() {
        let req = client().build_set_user_presence(Presence::Away).unwrap();
        assert_eq!(query(&req), "token=xoxb-1&presence=away");
    }

    #[test]
    fn generic_build_matches_typed_build() {
        let params = Params::new().with("user", "U1");
        assert_eq!(
            client().build(Endpoint::UsersInfo, Some(&params)).unwrap(),
            client().build_user_info("U1").unwrap()
        );
    }

    #[test]
    fn generic_build_refuses_uploads() {
        let err = client().build(Endpoint::FilesUpload, None).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Network(NetworkError::InvalidRequest {
                endpoint: Endpoint::FilesUpload,
                ..
            })
        ));
        let file = FileUpload::new(b"x".to_vec(), "x.txt");
        let upload = client()
            .build_upload_file(&file, &UploadOptions::default())
            .unwrap();
        assert_eq!(upload.method, HttpMethod::Post);
    }

    #[test]
    fn debug_output_hides_the_token() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("xoxb-1"));
        assert!(rendered.contains("slack.com"));
    }

    #[test]
    fn parse_response_classifies() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: br#"{"ok": false, "error": "not_authed"}"#.to_vec(),
        };
        assert_eq!(
            client().parse_response(&response).unwrap_err(),
            ApiError::Platform(crate::SlackError::NotAuthed)
        );
    }
}
