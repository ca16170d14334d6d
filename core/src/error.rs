//! Error taxonomy for Web API calls.
//!
//! # Design
//! A 200 response can still carry an application-level failure
//! (`{"ok": false, "error": "<code>"}`). Known codes map to a named
//! `SlackError`; any other code, or a missing one, becomes
//! `ApiError::Unknown` so new server-side codes never break callers.
//! Transport failures, bad statuses, unparseable bodies and rate limiting each
//! get their own variant. Every layer above the dispatcher forwards these
//! values unchanged.

use thiserror::Error;

use crate::endpoint::Endpoint;

macro_rules! slack_errors {
    ($($variant:ident => $code:literal,)+) => {
        /// A documented platform error code returned in-band with `ok: false`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SlackError {
            $($variant,)+
        }

        impl SlackError {
            /// Every named error, in declaration order.
            pub const ALL: &'static [SlackError] = &[$(SlackError::$variant,)+];

            /// Map a wire code to its named error. Unrecognized codes yield `None`.
            pub fn from_code(code: &str) -> Option<SlackError> {
                match code {
                    $($code => Some(SlackError::$variant),)+
                    _ => None,
                }
            }

            /// The wire code for this error.
            pub const fn code(self) -> &'static str {
                match self {
                    $(SlackError::$variant => $code,)+
                }
            }
        }
    };
}

slack_errors! {
    AccountInactive => "account_inactive",
    AlreadyArchived => "already_archived",
    AlreadyInChannel => "already_in_channel",
    AlreadyPinned => "already_pinned",
    AlreadyReacted => "already_reacted",
    AlreadyStarred => "already_starred",
    BadClientSecret => "bad_client_secret",
    BadRedirectUri => "bad_redirect_uri",
    BadTimestamp => "bad_timestamp",
    CantDeleteFile => "cant_delete_file",
    CantDeleteFileComment => "cant_delete_file_comment",
    CantDeleteMessage => "cant_delete_message",
    CantEditFileComment => "cant_edit",
    CantInvite => "cant_invite",
    CantInviteSelf => "cant_invite_self",
    CantKickFromGeneral => "cant_kick_from_general",
    CantKickFromLastChannel => "cant_kick_from_last_channel",
    CantKickSelf => "cant_kick_self",
    CantLeaveGeneral => "cant_leave_general",
    CantLeaveLastChannel => "cant_leave_last_channel",
    CantUpdateMessage => "cant_update_message",
    ChannelNotFound => "channel_not_found",
    ComplianceExportsPreventDeletion => "compliance_exports_prevent_deletion",
    EditWindowClosed => "edit_window_closed",
    FileCommentNotFound => "file_comment_not_found",
    FileDeleted => "file_deleted",
    FileNotFound => "file_not_found",
    FileNotShared => "file_not_shared",
    GroupContainsOthers => "group_contains_others",
    InvalidArrayArg => "invalid_array_arg",
    InvalidAuth => "invalid_auth",
    InvalidChannel => "invalid_channel",
    InvalidCharset => "invalid_charset",
    InvalidClientId => "invalid_client_id",
    InvalidCode => "invalid_code",
    InvalidFormData => "invalid_form_data",
    InvalidName => "invalid_name",
    InvalidPostType => "invalid_post_type",
    InvalidPresence => "invalid_presence",
    InvalidTimestamp => "invalid_ts",
    InvalidTimestampLatest => "invalid_ts_latest",
    InvalidTimestampOldest => "invalid_ts_oldest",
    IsArchived => "is_archived",
    LastMember => "last_member",
    LastRestrictedChannel => "last_ra_channel",
    MessageNotFound => "message_not_found",
    MessageTooLong => "msg_too_long",
    MigrationInProgress => "migration_in_progress",
    MissingDuration => "missing_duration",
    MissingPostType => "missing_post_type",
    NameTaken => "name_taken",
    NoChannel => "no_channel",
    NoComment => "no_comment",
    NoItemSpecified => "no_item_specified",
    NoReaction => "no_reaction",
    NoText => "no_text",
    NotArchived => "not_archived",
    NotAuthed => "not_authed",
    NotAuthorized => "not_authorized",
    NotEnoughUsers => "not_enough_users",
    NotInChannel => "not_in_channel",
    NotInGroup => "not_in_group",
    NotPinned => "not_pinned",
    NotStarred => "not_starred",
    OverPaginationLimit => "over_pagination_limit",
    PaidOnly => "paid_only",
    PermissionDenied => "permission_denied",
    PostingToGeneralChannelDenied => "posting_to_general_channel_denied",
    RateLimited => "rate_limited",
    RequestTimeout => "request_timeout",
    RestrictedAction => "restricted_action",
    SnoozeEndFailed => "snooze_end_failed",
    SnoozeFailed => "snooze_failed",
    SnoozeNotActive => "snooze_not_active",
    TokenRevoked => "token_revoked",
    TooLong => "too_long",
    TooManyEmoji => "too_many_emoji",
    TooManyReactions => "too_many_reactions",
    TooManyUsers => "too_many_users",
    UnknownMethod => "unknown_method",
    UnknownType => "unknown_type",
    UserDisabled => "user_disabled",
    UserDoesNotOwnChannel => "user_does_not_own_channel",
    UserIsBot => "user_is_bot",
    UserIsRestricted => "user_is_restricted",
    UserIsUltraRestricted => "user_is_ultra_restricted",
    UserListNotSupplied => "user_list_not_supplied",
    UserNotFound => "user_not_found",
    UserNotVisible => "user_not_visible",
}

impl std::fmt::Display for SlackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for SlackError {}

/// Failures below the application layer: the request could not be built,
/// sent, or answered with a usable status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The descriptor for `endpoint` did not form a valid URL. This is a
    /// caller bug, not a network fault, and is never worth retrying as-is.
    #[error("could not build a request for {endpoint}: {reason}")]
    InvalidRequest { endpoint: Endpoint, reason: String },

    /// No HTTP response was obtained (connect, TLS, timeout, I/O).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a status other than 200 or 429.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// The classified outcome of a failed Web API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Status 200 but the body was not a JSON object with a boolean `ok`.
    #[error("malformed JSON response: {0}")]
    MalformedJson(String),

    /// Status 429. `retry_after` carries the `Retry-After` seconds when sent.
    #[error("too many requests")]
    TooManyRequests { retry_after: Option<u64> },

    /// A named platform error from the `error` field of an `ok: false` reply.
    #[error("platform error: {0}")]
    Platform(SlackError),

    /// `ok: false` with an unrecognized or missing `error` field.
    #[error("unknown platform error{}", .code.as_deref().map(|c| format!(" `{c}`")).unwrap_or_default())]
    Unknown { code: Option<String> },

    /// A successful reply did not have the shape the operation expects.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl ApiError {
    /// Total mapping from the `error` field of an `ok: false` reply.
    pub fn from_platform_code(code: Option<&str>) -> ApiError {
        match code.and_then(SlackError::from_code) {
            Some(named) => ApiError::Platform(named),
            None => ApiError::Unknown {
                code: code.map(str::to_string),
            },
        }
    }

    /// The wire code of a platform-level failure, named or not.
    pub fn platform_code(&self) -> Option<&str> {
        match self {
            ApiError::Platform(e) => Some(e.code()),
            ApiError::Unknown { code } => code.as_deref(),
            _ => None,
        }
    }
}

/// Errors that can occur while constructing a `WebApi` client.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to build the underlying HTTP client.
    #[error("failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// No token was configured.
    #[error("a token is required")]
    MissingToken,

    /// A required environment variable is unset or empty.
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_named_error_roundtrips() {
        for err in SlackError::ALL {
            assert_eq!(SlackError::from_code(err.code()), Some(*err));
        }
    }

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<&str> = SlackError::ALL.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), SlackError::ALL.len());
    }

    #[test]
    fn known_code_maps_to_named_error() {
        assert_eq!(
            ApiError::from_platform_code(Some("channel_not_found")),
            ApiError::Platform(SlackError::ChannelNotFound)
        );
        assert_eq!(
            ApiError::from_platform_code(Some("invalid_auth")),
            ApiError::Platform(SlackError::InvalidAuth)
        );
    }

    #[test]
    fn unrecognized_code_is_unknown_and_keeps_the_code() {
        let err = ApiError::from_platform_code(Some("totally_new_code"));
        assert_eq!(
            err,
            ApiError::Unknown {
                code: Some("totally_new_code".to_string())
            }
        );
        assert_eq!(err.platform_code(), Some("totally_new_code"));
    }

    #[test]
    fn missing_code_is_unknown() {
        let err = ApiError::from_platform_code(None);
        assert_eq!(err, ApiError::Unknown { code: None });
        assert_eq!(err.platform_code(), None);
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ApiError::Platform(SlackError::NotAuthed).to_string(),
            "platform error: not_authed"
        );
        assert_eq!(
            ApiError::Unknown { code: Some("x".to_string()) }.to_string(),
            "unknown platform error `x`"
        );
        assert_eq!(ApiError::Unknown { code: None }.to_string(), "unknown platform error");
        assert_eq!(
            ApiError::from(NetworkError::Status(503)).to_string(),
            "network error: unexpected HTTP status 503"
        );
    }
}
