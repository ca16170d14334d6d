//! Typed projections of success payloads.
//!
//! # Design
//! Each reply shape has one decoder. A decoder fails with `ApiError::Decode`
//! when a required field is missing or has the wrong type; it never
//! substitutes a default for a field the operation promises.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dispatch::Payload;
use crate::error::ApiError;
use crate::types::{
    Channel, Comment, DoNotDisturbStatus, File, History, PostedMessage, Reaction, RtmSession,
};

/// Deserialize the value under `key`.
pub fn field<T: DeserializeOwned>(mut payload: Payload, key: &str) -> Result<T, ApiError> {
    let value = payload
        .remove(key)
        .ok_or_else(|| ApiError::Decode(format!("missing `{key}`")))?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("`{key}`: {e}")))
}

/// Deserialize the whole payload.
pub fn whole<T: DeserializeOwned>(payload: Payload) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(payload)).map_err(|e| ApiError::Decode(e.to_string()))
}

pub fn history(payload: Payload) -> Result<History, ApiError> {
    whole(payload)
}

/// A conversation object under `key` (`channel` or `group`).
pub fn channel(payload: Payload, key: &str) -> Result<Channel, ApiError> {
    field(payload, key)
}

pub fn channels(payload: Payload, key: &str) -> Result<Vec<Channel>, ApiError> {
    field(payload, key)
}

/// The `id` of the object under `key`.
pub fn id_of(payload: Payload, key: &str) -> Result<String, ApiError> {
    let object: Payload = field(payload, key)?;
    match object.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        _ => Err(ApiError::Decode(format!("missing `{key}.id`"))),
    }
}

pub fn posted_message(payload: Payload) -> Result<PostedMessage, ApiError> {
    whole(payload)
}

pub fn file(payload: Payload) -> Result<File, ApiError> {
    field(payload, "file")
}

/// A file with the reply's top-level `comments` attached by id.
pub fn file_info(mut payload: Payload) -> Result<File, ApiError> {
    let comments: Vec<Comment> = match payload.remove("comments") {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::Decode(format!("`comments`: {e}")))?,
        None => Vec::new(),
    };
    let mut file = file(payload)?;
    file.comments
        .extend(comments.into_iter().map(|c| (c.id.clone(), c)));
    Ok(file)
}

pub fn comment(payload: Payload) -> Result<Comment, ApiError> {
    field(payload, "comment")
}

pub fn dnd_status(payload: Payload) -> Result<DoNotDisturbStatus, ApiError> {
    whole(payload)
}

pub fn dnd_statuses(payload: Payload) -> Result<BTreeMap<String, DoNotDisturbStatus>, ApiError> {
    field(payload, "users")
}

/// Custom emoji names mapped to image URLs or `alias:` targets.
pub fn emoji(payload: Payload) -> Result<BTreeMap<String, String>, ApiError> {
    field(payload, "emoji")
}

pub fn rtm_session(mut payload: Payload) -> Result<RtmSession, ApiError> {
    match payload.remove("url") {
        Some(Value::String(url)) => Ok(RtmSession { url, payload }),
        _ => Err(ApiError::Decode("missing `url`".to_string())),
    }
}

/// Reactions on the item described by a `reactions.get` reply.
///
/// The item sits under `message`, `file` or `comment` depending on `type`.
pub fn item_reactions(payload: Payload) -> Result<Vec<Reaction>, ApiError> {
    let key = match payload.get("type").and_then(Value::as_str) {
        Some("message") => "message",
        Some("file") => "file",
        Some("file_comment") => "comment",
        Some(other) => return Err(ApiError::Decode(format!("unknown item type `{other}`"))),
        None => return Err(ApiError::Decode("missing `type`".to_string())),
    };
    let mut item: Payload = field(payload, key)?;
    match item.remove("reactions") {
        Some(value) => {
            serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("`reactions`: {e}")))
        }
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let err = channel(payload(json!({"group": {"id": "G1"}})), "channel").unwrap_err();
        assert_eq!(err, ApiError::Decode("missing `channel`".to_string()));
    }

    #[test]
    fn wrong_type_is_a_decode_error() {
        let err = channels(payload(json!({"channels": {"id": "C1"}})), "channels").unwrap_err();
        assert!(matches!(err, ApiError::Decode(msg) if msg.starts_with("`channels`")));
    }

    #[test]
    fn id_of_nested_object() {
        let id = id_of(payload(json!({"group": {"id": "G9", "members": []}})), "group").unwrap();
        assert_eq!(id, "G9");
        assert!(id_of(payload(json!({"group": {}})), "group").is_err());
    }

    #[test]
    fn posted_message_needs_ts_and_channel() {
        let posted = posted_message(payload(json!({"ts": "1.2", "channel": "C1"}))).unwrap();
        assert_eq!(posted.ts, "1.2");
        assert!(posted_message(payload(json!({"channel": "C1"}))).is_err());
    }

    #[test]
    fn file_info_merges_comments_by_id() {
        let file = file_info(payload(json!({
            "file": {"id": "F1", "name": "a.png"},
            "comments": [
                {"id": "Fc1", "comment": "first"},
                {"id": "Fc2", "comment": "second"}
            ]
        })))
        .unwrap();
        assert_eq!(file.id, "F1");
        assert_eq!(file.comments.len(), 2);
        assert_eq!(file.comments["Fc2"].comment.as_deref(), Some("second"));
    }

    #[test]
    fn file_info_without_comments() {
        let file = file_info(payload(json!({"file": {"id": "F1"}}))).unwrap();
        assert!(file.comments.is_empty());
    }

    #[test]
    fn rtm_session_keeps_the_rest_of_the_payload() {
        let session = rtm_session(payload(json!({
            "url": "wss://rtm.example/ws",
            "self": {"id": "U1"}
        })))
        .unwrap();
        assert_eq!(session.url, "wss://rtm.example/ws");
        assert_eq!(session.payload["self"]["id"], "U1");
        assert!(!session.payload.contains_key("url"));
    }

    #[test]
    fn rtm_session_requires_url() {
        assert!(rtm_session(payload(json!({"self": {}}))).is_err());
    }

    #[test]
    fn item_reactions_by_type() {
        let reactions = item_reactions(payload(json!({
            "type": "message",
            "channel": "C1",
            "message": {"ts": "1.0", "reactions": [{"name": "tada", "count": 2, "users": ["U1", "U2"]}]}
        })))
        .unwrap();
        assert_eq!(reactions[0].name, "tada");
        assert_eq!(reactions[0].users.len(), 2);

        let none = item_reactions(payload(json!({"type": "file_comment", "comment": {"id": "Fc1"}})))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn dnd_statuses_keyed_by_user() {
        let statuses = dnd_statuses(payload(json!({
            "users": {"U1": {"dnd_enabled": true}, "U2": {"dnd_enabled": false}}
        })))
        .unwrap();
        assert!(statuses["U1"].dnd_enabled);
        assert!(!statuses["U2"].dnd_enabled);
    }
}
