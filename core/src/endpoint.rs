//! Closed catalog of remote Web API methods.
//!
//! # Design
//! Every request the crate builds targets one `Endpoint` value, and each value
//! maps to exactly one fixed path such as `channels.history`. The set can only
//! grow by adding variants here; `FromStr` accepts catalog paths only, so a
//! caller-supplied string never reaches the wire unless it names a known
//! method.

use std::fmt;
use std::str::FromStr;

macro_rules! endpoints {
    ($($variant:ident => $path:literal,)+) => {
        /// A remote Web API method.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Endpoint {
            $($variant,)+
        }

        impl Endpoint {
            /// Every endpoint in the catalog, in declaration order.
            pub const ALL: &'static [Endpoint] = &[$(Endpoint::$variant,)+];

            /// Relative path appended to the API base URL.
            pub const fn path(self) -> &'static str {
                match self {
                    $(Endpoint::$variant => $path,)+
                }
            }
        }

        impl FromStr for Endpoint {
            type Err = UnknownEndpoint;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($path => Ok(Endpoint::$variant),)+
                    other => Err(UnknownEndpoint(other.to_string())),
                }
            }
        }
    };
}

endpoints! {
    ApiTest => "api.test",
    AuthRevoke => "auth.revoke",
    AuthTest => "auth.test",
    ChannelsHistory => "channels.history",
    ChannelsInfo => "channels.info",
    ChannelsList => "channels.list",
    ChannelsMark => "channels.mark",
    ChannelsSetPurpose => "channels.setPurpose",
    ChannelsSetTopic => "channels.setTopic",
    ChatDelete => "chat.delete",
    ChatMeMessage => "chat.meMessage",
    ChatPostMessage => "chat.postMessage",
    ChatUpdate => "chat.update",
    DndInfo => "dnd.info",
    DndTeamInfo => "dnd.teamInfo",
    EmojiList => "emoji.list",
    FilesCommentsAdd => "files.comments.add",
    FilesCommentsEdit => "files.comments.edit",
    FilesCommentsDelete => "files.comments.delete",
    FilesDelete => "files.delete",
    FilesInfo => "files.info",
    FilesUpload => "files.upload",
    GroupsClose => "groups.close",
    GroupsHistory => "groups.history",
    GroupsInfo => "groups.info",
    GroupsList => "groups.list",
    GroupsMark => "groups.mark",
    GroupsOpen => "groups.open",
    GroupsSetPurpose => "groups.setPurpose",
    GroupsSetTopic => "groups.setTopic",
    ImClose => "im.close",
    ImHistory => "im.history",
    ImList => "im.list",
    ImMark => "im.mark",
    ImOpen => "im.open",
    MpimClose => "mpim.close",
    MpimHistory => "mpim.history",
    MpimList => "mpim.list",
    MpimMark => "mpim.mark",
    MpimOpen => "mpim.open",
    OauthAccess => "oauth.access",
    PinsAdd => "pins.add",
    PinsRemove => "pins.remove",
    ReactionsAdd => "reactions.add",
    ReactionsGet => "reactions.get",
    ReactionsList => "reactions.list",
    ReactionsRemove => "reactions.remove",
    RtmStart => "rtm.start",
    StarsAdd => "stars.add",
    StarsRemove => "stars.remove",
    TeamInfo => "team.info",
    UsersGetPresence => "users.getPresence",
    UsersInfo => "users.info",
    UsersList => "users.list",
    UsersSetActive => "users.setActive",
    UsersSetPresence => "users.setPresence",
}

impl Endpoint {
    /// Whether requests to this endpoint carry the client's stored token.
    ///
    /// The OAuth exchange and revoke calls authenticate with their own
    /// arguments instead.
    pub const fn uses_stored_token(self) -> bool {
        !matches!(self, Endpoint::OauthAccess | Endpoint::AuthRevoke)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Returned by `Endpoint::from_str` for a name outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown endpoint `{0}`")]
pub struct UnknownEndpoint(pub String);
