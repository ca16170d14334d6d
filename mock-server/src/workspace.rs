//! In-memory workspace state and the per-method handlers over it.
//!
//! Every handler returns `Ok(body)` for an `ok: true` reply or `Err(code)`
//! for an `ok: false` reply; the router adds the envelope.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{json, Map, Value};

pub type Args = HashMap<String, String>;
pub type Reply = Result<Value, &'static str>;

/// The user every valid token belongs to.
pub const SELF_USER: &str = "U001";
pub const TEAM_ID: &str = "T001";
pub const CLIENT_ID: &str = "mock-client";
pub const CLIENT_SECRET: &str = "mock-secret";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Channel,
    Group,
    Im,
    Mpim,
}

impl Kind {
    fn from_family(family: &str) -> Option<Kind> {
        match family {
            "channels" => Some(Kind::Channel),
            "groups" => Some(Kind::Group),
            "im" => Some(Kind::Im),
            "mpim" => Some(Kind::Mpim),
            _ => None,
        }
    }

    fn list_key(self) -> &'static str {
        match self {
            Kind::Channel => "channels",
            Kind::Group | Kind::Mpim => "groups",
            Kind::Im => "ims",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Reaction {
    pub name: String,
    pub count: usize,
    pub users: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StoredMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub ts: String,
    pub user: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}

#[derive(Clone, Debug)]
pub struct Conversation {
    pub id: String,
    pub name: Option<String>,
    pub kind: Kind,
    pub user: Option<String>,
    pub members: Vec<String>,
    pub purpose: String,
    pub topic: String,
    pub is_open: bool,
    pub last_read: Option<String>,
    /// Oldest first.
    pub messages: Vec<StoredMessage>,
}

impl Conversation {
    fn to_json(&self) -> Value {
        let mut object = json!({
            "id": self.id,
            "created": 1_500_000_000,
            "creator": SELF_USER,
            "is_archived": false,
            "is_channel": self.kind == Kind::Channel,
            "is_group": self.kind == Kind::Group,
            "is_im": self.kind == Kind::Im,
            "is_mpim": self.kind == Kind::Mpim,
            "is_open": self.is_open,
            "members": self.members,
            "purpose": {"value": self.purpose, "creator": SELF_USER, "last_set": 0},
            "topic": {"value": self.topic, "creator": SELF_USER, "last_set": 0},
        });
        if let Some(name) = &self.name {
            object["name"] = json!(name);
        }
        if let Some(user) = &self.user {
            object["user"] = json!(user);
        }
        object
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StoredComment {
    pub id: String,
    pub user: String,
    pub comment: String,
    pub created: u64,
}

#[derive(Clone, Debug)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub title: String,
    pub filetype: String,
    pub mimetype: String,
    pub size: usize,
    pub channels: Vec<String>,
    pub comments: Vec<StoredComment>,
}

impl StoredFile {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "title": self.title,
            "filetype": self.filetype,
            "mimetype": self.mimetype,
            "size": self.size,
            "user": SELF_USER,
            "created": 1_500_000_000,
            "channels": self.channels,
            "comments_count": self.comments.len(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct Member {
    pub id: &'static str,
    pub name: &'static str,
    pub real_name: &'static str,
    pub presence: &'static str,
}

/// A file received by `files.upload`.
#[derive(Debug, Default)]
pub struct Upload {
    pub field_name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug)]
pub struct Workspace {
    pub conversations: BTreeMap<String, Conversation>,
    pub files: BTreeMap<String, StoredFile>,
    pub members: Vec<Member>,
    pub presence: &'static str,
    clock: u64,
    ids: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Workspace {
    /// A workspace with one channel, one private group, one direct message
    /// and two users.
    pub fn seeded() -> Self {
        let mut ws = Workspace {
            conversations: BTreeMap::new(),
            files: BTreeMap::new(),
            members: vec![
                Member { id: SELF_USER, name: "mockbot", real_name: "Mock Bot", presence: "active" },
                Member { id: "U002", name: "alice", real_name: "Alice Example", presence: "away" },
            ],
            presence: "auto",
            clock: 0,
            ids: 0,
        };
        ws.insert(Kind::Channel, "C001", Some("general"), None, &[SELF_USER, "U002"]);
        ws.insert(Kind::Group, "G001", Some("secret-plans"), None, &[SELF_USER, "U002"]);
        ws.insert(Kind::Im, "D001", None, Some("U002"), &[SELF_USER, "U002"]);
        ws
    }

    fn insert(&mut self, kind: Kind, id: &str, name: Option<&str>, user: Option<&str>, members: &[&str]) {
        self.conversations.insert(
            id.to_string(),
            Conversation {
                id: id.to_string(),
                name: name.map(str::to_string),
                kind,
                user: user.map(str::to_string),
                members: members.iter().map(|m| m.to_string()).collect(),
                purpose: String::new(),
                topic: String::new(),
                is_open: true,
                last_read: None,
                messages: Vec::new(),
            },
        );
    }

    fn next_ts(&mut self) -> String {
        self.clock += 1;
        format!("1500000000.{:06}", self.clock)
    }

    fn next_id(&mut self, prefix: char) -> String {
        self.ids += 1;
        format!("{prefix}{:03}", 100 + self.ids)
    }

    fn conversation(&mut self, kind: Kind, args: &Args) -> Result<&mut Conversation, &'static str> {
        let id = args.get("channel").ok_or("channel_not_found")?;
        self.conversations
            .get_mut(id)
            .filter(|c| c.kind == kind)
            .ok_or("channel_not_found")
    }

    fn any_conversation(&mut self, id: Option<&String>) -> Result<&mut Conversation, &'static str> {
        let id = id.ok_or("channel_not_found")?;
        self.conversations.get_mut(id).ok_or("channel_not_found")
    }

    fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Route one authenticated method call.
    pub fn call(&mut self, method: &str, args: &Args) -> Reply {
        if let Some((family, action)) = method.split_once('.') {
            if let Some(kind) = Kind::from_family(family) {
                return self.conversation_call(kind, action, args);
            }
        }
        match method {
            "auth.test" => Ok(json!({
                "url": "https://mock.slack.test/",
                "team": "Mock Team",
                "user": "mockbot",
                "team_id": TEAM_ID,
                "user_id": SELF_USER,
            })),
            "rtm.start" => Ok(json!({
                "url": "wss://mock.slack.test/websocket/abc",
                "self": {"id": SELF_USER, "name": "mockbot"},
                "team": {"id": TEAM_ID, "name": "Mock Team", "domain": "mock"},
            })),
            "chat.postMessage" | "chat.meMessage" => self.post_message(args),
            "chat.update" => self.update_message(args),
            "chat.delete" => self.delete_message(args),
            "dnd.info" => Ok(json!({"dnd_enabled": false, "next_dnd_start_ts": 1, "next_dnd_end_ts": 1})),
            "dnd.teamInfo" => {
                let users: Map<String, Value> = args
                    .get("users")
                    .map(|u| u.split(',').collect::<Vec<_>>())
                    .unwrap_or_else(|| self.members.iter().map(|m| m.id).collect())
                    .into_iter()
                    .map(|u| (u.to_string(), json!({"dnd_enabled": u == "U002"})))
                    .collect();
                Ok(json!({ "users": users }))
            }
            "emoji.list" => Ok(json!({
                "emoji": {
                    "shipit": "https://emoji.mock.slack.test/shipit.png",
                    "squirrel": "alias:shipit",
                }
            })),
            "files.info" => {
                let file = self.file(args)?;
                let comments: Vec<&StoredComment> = file.comments.iter().rev().collect();
                Ok(json!({"file": file.to_json(), "comments": comments}))
            }
            "files.delete" => {
                let id = args.get("file").ok_or("file_not_found")?;
                self.files.remove(id).map(|_| json!({})).ok_or("file_not_found")
            }
            "files.comments.add" => self.add_comment(args),
            "files.comments.edit" => self.edit_comment(args),
            "files.comments.delete" => {
                let id = args.get("id").ok_or("file_comment_not_found")?.clone();
                let file = self.file_mut(args)?;
                let before = file.comments.len();
                file.comments.retain(|c| c.id != id);
                if file.comments.len() == before {
                    return Err("file_comment_not_found");
                }
                Ok(json!({}))
            }
            "pins.add" | "pins.remove" | "stars.add" | "stars.remove" => self.item_target(args).map(|_| json!({})),
            "reactions.add" => self.react(args, true),
            "reactions.remove" => self.react(args, false),
            "reactions.get" => self.reactions_get(args),
            "reactions.list" => {
                let user = args.get("user").map(String::as_str).unwrap_or(SELF_USER);
                let items: Vec<Value> = self
                    .conversations
                    .values()
                    .flat_map(|c| {
                        c.messages
                            .iter()
                            .filter(move |m| m.reactions.iter().any(|r| r.users.iter().any(|u| u == user)))
                            .map(move |m| json!({"type": "message", "channel": c.id, "message": m}))
                    })
                    .collect();
                Ok(json!({ "items": items }))
            }
            "team.info" => Ok(json!({
                "team": {"id": TEAM_ID, "name": "Mock Team", "domain": "mock", "email_domain": "mock.test"}
            })),
            "users.getPresence" => {
                let user = args.get("user").ok_or("user_not_found")?;
                let member = self.member(user).ok_or("user_not_found")?;
                let presence = if member.id == SELF_USER && self.presence == "away" {
                    "away"
                } else {
                    member.presence
                };
                Ok(json!({ "presence": presence }))
            }
            "users.info" => {
                let user = args.get("user").ok_or("user_not_found")?;
                let member = self.member(user).ok_or("user_not_found")?;
                Ok(json!({ "user": member_json(member, false) }))
            }
            "users.list" => {
                let presence = args.get("presence").is_some_and(|p| p == "true");
                let members: Vec<Value> = self.members.iter().map(|m| member_json(m, presence)).collect();
                Ok(json!({ "members": members }))
            }
            "users.setActive" => Ok(json!({})),
            "users.setPresence" => match args.get("presence").map(String::as_str) {
                Some("auto") => {
                    self.presence = "auto";
                    Ok(json!({}))
                }
                Some("away") => {
                    self.presence = "away";
                    Ok(json!({}))
                }
                _ => Err("invalid_presence"),
            },
            _ => Err("unknown_method"),
        }
    }

    fn conversation_call(&mut self, kind: Kind, action: &str, args: &Args) -> Reply {
        match action {
            "history" => {
                let conversation = self.conversation(kind, args)?;
                history(conversation, args)
            }
            "info" if matches!(kind, Kind::Channel | Kind::Group) => {
                let conversation = self.conversation(kind, args)?;
                let key = if kind == Kind::Channel { "channel" } else { "group" };
                Ok(json!({ key: conversation.to_json() }))
            }
            "list" => {
                let list: Vec<Value> = self
                    .conversations
                    .values()
                    .filter(|c| c.kind == kind)
                    .map(Conversation::to_json)
                    .collect();
                Ok(json!({ kind.list_key(): list }))
            }
            "mark" => {
                let ts = args.get("ts").ok_or("invalid_timestamp")?.clone();
                self.conversation(kind, args)?.last_read = Some(ts);
                Ok(json!({}))
            }
            "setPurpose" if matches!(kind, Kind::Channel | Kind::Group) => {
                let purpose = args.get("purpose").cloned().unwrap_or_default();
                self.conversation(kind, args)?.purpose = purpose.clone();
                Ok(json!({ "purpose": purpose }))
            }
            "setTopic" if matches!(kind, Kind::Channel | Kind::Group) => {
                let topic = args.get("topic").cloned().unwrap_or_default();
                self.conversation(kind, args)?.topic = topic.clone();
                Ok(json!({ "topic": topic }))
            }
            "close" if kind != Kind::Channel => {
                let conversation = self.conversation(kind, args)?;
                let already_closed = !conversation.is_open;
                conversation.is_open = false;
                Ok(json!({ "already_closed": already_closed }))
            }
            "open" if kind == Kind::Group => {
                let conversation = self.conversation(kind, args)?;
                let already_open = conversation.is_open;
                conversation.is_open = true;
                Ok(json!({ "already_open": already_open }))
            }
            "open" if kind == Kind::Im => self.open_im(args),
            "open" if kind == Kind::Mpim => self.open_mpim(args),
            _ => Err("unknown_method"),
        }
    }

    fn open_im(&mut self, args: &Args) -> Reply {
        let user = args.get("user").ok_or("user_not_found")?.clone();
        if self.member(&user).is_none() {
            return Err("user_not_found");
        }
        let existing = self
            .conversations
            .values()
            .find(|c| c.kind == Kind::Im && c.user.as_deref() == Some(user.as_str()))
            .map(|c| c.id.clone());
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.next_id('D');
                self.insert(Kind::Im, &id, None, Some(user.as_str()), &[SELF_USER, user.as_str()]);
                id
            }
        };
        Ok(json!({ "channel": {"id": id} }))
    }

    fn open_mpim(&mut self, args: &Args) -> Reply {
        let users: Vec<&str> = args
            .get("users")
            .map(|u| u.split(',').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        if users.len() < 2 {
            return Err("not_enough_users");
        }
        if users.iter().any(|u| self.member(u).is_none()) {
            return Err("user_not_found");
        }
        let id = self.next_id('G');
        let name = format!("mpdm-{}", users.join("--"));
        self.insert(Kind::Mpim, &id, Some(name.as_str()), None, &users);
        Ok(json!({ "group": self.conversations[&id].to_json() }))
    }

    fn post_message(&mut self, args: &Args) -> Reply {
        let text = args.get("text").filter(|t| !t.is_empty()).ok_or("no_text")?.clone();
        let ts = self.next_ts();
        let conversation = self.any_conversation(args.get("channel"))?;
        let message = StoredMessage {
            kind: "message",
            ts: ts.clone(),
            user: SELF_USER.to_string(),
            text,
            reactions: Vec::new(),
        };
        conversation.messages.push(message.clone());
        Ok(json!({"channel": conversation.id, "ts": ts, "message": message}))
    }

    fn update_message(&mut self, args: &Args) -> Reply {
        let text = args.get("text").cloned().unwrap_or_default();
        let message = self.message_mut(args.get("channel"), args.get("ts"))?;
        message.text = text.clone();
        let ts = message.ts.clone();
        Ok(json!({"channel": args.get("channel"), "ts": ts, "text": text}))
    }

    fn delete_message(&mut self, args: &Args) -> Reply {
        let ts = args.get("ts").ok_or("message_not_found")?.clone();
        let conversation = self.any_conversation(args.get("channel"))?;
        let before = conversation.messages.len();
        conversation.messages.retain(|m| m.ts != ts);
        if conversation.messages.len() == before {
            return Err("message_not_found");
        }
        Ok(json!({"channel": conversation.id, "ts": ts}))
    }

    fn message_mut(
        &mut self,
        channel: Option<&String>,
        ts: Option<&String>,
    ) -> Result<&mut StoredMessage, &'static str> {
        let ts = ts.ok_or("message_not_found")?;
        self.any_conversation(channel)?
            .messages
            .iter_mut()
            .find(|m| &m.ts == ts)
            .ok_or("message_not_found")
    }

    fn file(&self, args: &Args) -> Result<&StoredFile, &'static str> {
        let id = args.get("file").ok_or("file_not_found")?;
        self.files.get(id).ok_or("file_not_found")
    }

    fn file_mut(&mut self, args: &Args) -> Result<&mut StoredFile, &'static str> {
        let id = args.get("file").ok_or("file_not_found")?;
        self.files.get_mut(id).ok_or("file_not_found")
    }

    fn add_comment(&mut self, args: &Args) -> Reply {
        let comment = args.get("comment").filter(|c| !c.is_empty()).ok_or("no_comment")?.clone();
        let id = self.next_id('c');
        let ts = self.clock;
        let file = self.file_mut(args)?;
        let stored = StoredComment {
            id: format!("F{id}"),
            user: SELF_USER.to_string(),
            comment,
            created: 1_500_000_000 + ts,
        };
        file.comments.push(stored.clone());
        Ok(json!({ "comment": stored }))
    }

    fn edit_comment(&mut self, args: &Args) -> Reply {
        let id = args.get("id").ok_or("file_comment_not_found")?.clone();
        let text = args.get("comment").filter(|c| !c.is_empty()).ok_or("no_comment")?.clone();
        let file = self.file_mut(args)?;
        let comment = file
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or("file_comment_not_found")?;
        comment.comment = text;
        Ok(json!({ "comment": comment.clone() }))
    }

    fn item_target(&self, args: &Args) -> Result<(), &'static str> {
        if let Some(file) = args.get("file") {
            return self.files.contains_key(file).then_some(()).ok_or("file_not_found");
        }
        if args.contains_key("file_comment") {
            return Ok(());
        }
        match (args.get("channel"), args.get("timestamp")) {
            (Some(channel), Some(ts)) => self
                .conversations
                .get(channel)
                .ok_or("channel_not_found")?
                .messages
                .iter()
                .any(|m| &m.ts == ts)
                .then_some(())
                .ok_or("message_not_found"),
            (Some(channel), None) => self
                .conversations
                .contains_key(channel)
                .then_some(())
                .ok_or("channel_not_found"),
            _ => Err("no_item_specified"),
        }
    }

    fn react(&mut self, args: &Args, add: bool) -> Reply {
        let name = args.get("name").ok_or("invalid_name")?.clone();
        self.item_target(args)?;
        let (Some(channel), Some(ts)) = (args.get("channel"), args.get("timestamp")) else {
            return Ok(json!({}));
        };
        let message = self.message_mut(Some(channel), Some(ts))?;
        let position = message.reactions.iter().position(|r| r.name == name);
        let mine = position.is_some_and(|i| message.reactions[i].users.iter().any(|u| u == SELF_USER));
        match (position, add) {
            (Some(_), true) if mine => return Err("already_reacted"),
            (Some(i), true) => message.reactions[i].users.push(SELF_USER.to_string()),
            (None, true) => message.reactions.push(Reaction {
                name,
                count: 0,
                users: vec![SELF_USER.to_string()],
            }),
            (Some(i), false) if mine => message.reactions[i].users.retain(|u| u != SELF_USER),
            (_, false) => return Err("no_reaction"),
        }
        for reaction in &mut message.reactions {
            reaction.count = reaction.users.len();
        }
        message.reactions.retain(|r| r.count > 0);
        Ok(json!({}))
    }

    fn reactions_get(&mut self, args: &Args) -> Reply {
        self.item_target(args)?;
        if let Some(file) = args.get("file") {
            return Ok(json!({"type": "file", "file": self.files[file].to_json()}));
        }
        if let Some(comment) = args.get("file_comment") {
            return Ok(json!({"type": "file_comment", "comment": {"id": comment}}));
        }
        let message = self.message_mut(args.get("channel"), args.get("timestamp"))?.clone();
        Ok(json!({"type": "message", "channel": args.get("channel"), "message": message}))
    }

    /// Store an uploaded file and return its reply body.
    pub fn upload(&mut self, args: &Args, upload: Upload) -> Reply {
        if upload.field_name.as_deref() != Some("file") {
            return Err("invalid_form_data");
        }
        let channels: Vec<String> = args
            .get("channels")
            .map(|c| c.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();
        for channel in &channels {
            if !self.conversations.contains_key(channel) {
                return Err("channel_not_found");
            }
        }
        let name = args
            .get("filename")
            .cloned()
            .or(upload.file_name)
            .unwrap_or_else(|| "upload".to_string());
        let filetype = match args.get("filetype").map(String::as_str) {
            None | Some("auto") => name.rsplit_once('.').map(|(_, ext)| ext.to_string()).unwrap_or_default(),
            Some(other) => other.to_string(),
        };
        let id = self.next_id('F');
        let file = StoredFile {
            id: id.clone(),
            title: args.get("title").cloned().unwrap_or_else(|| name.clone()),
            name,
            filetype,
            mimetype: upload.content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            size: upload.data.len(),
            channels,
            comments: Vec::new(),
        };
        let body = json!({ "file": file.to_json() });
        self.files.insert(id, file);
        if let Some(comment) = args.get("initial_comment").filter(|c| !c.is_empty()) {
            let mut comment_args = Args::new();
            comment_args.insert("file".to_string(), body["file"]["id"].as_str().unwrap_or_default().to_string());
            comment_args.insert("comment".to_string(), comment.clone());
            self.add_comment(&comment_args)?;
        }
        Ok(body)
    }
}

fn history(conversation: &Conversation, args: &Args) -> Reply {
    let bound = |key: &str| -> Result<Option<f64>, &'static str> {
        args.get(key)
            .map(|v| v.parse::<f64>().map_err(|_| "invalid_ts_latest"))
            .transpose()
    };
    let latest = bound("latest")?;
    let oldest = bound("oldest")?.unwrap_or(0.0);
    let inclusive = args.get("inclusive").is_some_and(|v| v == "true");
    let count: usize = args
        .get("count")
        .and_then(|c| c.parse().ok())
        .unwrap_or(100)
        .clamp(1, 1000);

    let in_window = |ts: f64| {
        let above = if inclusive { ts >= oldest } else { ts > oldest };
        let below = latest.map_or(true, |l| if inclusive { ts <= l } else { ts < l });
        above && below
    };
    let matching: Vec<&StoredMessage> = conversation
        .messages
        .iter()
        .rev()
        .filter(|m| m.ts.parse::<f64>().map(&in_window).unwrap_or(false))
        .collect();
    let has_more = matching.len() > count;
    let messages: Vec<&StoredMessage> = matching.into_iter().take(count).collect();

    let mut body = json!({ "messages": messages, "has_more": has_more });
    if let Some(latest) = args.get("latest") {
        body["latest"] = json!(latest);
    }
    Ok(body)
}

fn member_json(member: &Member, with_presence: bool) -> Value {
    let mut object = json!({
        "id": member.id,
        "name": member.name,
        "real_name": member.real_name,
        "deleted": false,
        "is_bot": member.id == SELF_USER,
        "is_admin": false,
        "tz": "Europe/Madrid",
        "profile": {
            "real_name": member.real_name,
            "display_name": member.name,
            "email": format!("{}@mock.test", member.name),
        },
    });
    if with_presence {
        object["presence"] = json!(member.presence);
    }
    object
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> Args {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn posted_messages_show_up_newest_first() {
        let mut ws = Workspace::seeded();
        ws.call("chat.postMessage", &args(&[("channel", "C001"), ("text", "one")])).unwrap();
        ws.call("chat.postMessage", &args(&[("channel", "C001"), ("text", "two")])).unwrap();

        let body = ws.call("channels.history", &args(&[("channel", "C001")])).unwrap();
        let texts: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["text"].as_str().unwrap())
            .collect();
        assert_eq!(texts, vec!["two", "one"]);
        assert_eq!(body["has_more"], false);
    }

    #[test]
    fn history_respects_count() {
        let mut ws = Workspace::seeded();
        for text in ["a", "b", "c"] {
            ws.call("chat.postMessage", &args(&[("channel", "G001"), ("text", text)])).unwrap();
        }
        let body = ws
            .call("groups.history", &args(&[("channel", "G001"), ("count", "2")]))
            .unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["has_more"], true);
    }

    #[test]
    fn history_checks_the_conversation_kind() {
        let mut ws = Workspace::seeded();
        assert_eq!(
            ws.call("groups.history", &args(&[("channel", "C001")])),
            Err("channel_not_found")
        );
    }

    #[test]
    fn channels_have_no_close() {
        let mut ws = Workspace::seeded();
        assert_eq!(ws.call("channels.close", &args(&[("channel", "C001")])), Err("unknown_method"));
    }

    #[test]
    fn open_im_reuses_existing_conversation() {
        let mut ws = Workspace::seeded();
        let body = ws.call("im.open", &args(&[("user", "U002")])).unwrap();
        assert_eq!(body["channel"]["id"], "D001");
    }

    #[test]
    fn reactions_toggle() {
        let mut ws = Workspace::seeded();
        let posted = ws.call("chat.postMessage", &args(&[("channel", "C001"), ("text", "hi")])).unwrap();
        let ts = posted["ts"].as_str().unwrap().to_string();
        let target = [("channel", "C001"), ("timestamp", ts.as_str()), ("name", "tada")];

        ws.call("reactions.add", &args(&target)).unwrap();
        assert_eq!(ws.call("reactions.add", &args(&target)), Err("already_reacted"));
        let got = ws.call("reactions.get", &args(&target)).unwrap();
        assert_eq!(got["message"]["reactions"][0]["count"], 1);

        ws.call("reactions.remove", &args(&target)).unwrap();
        assert_eq!(ws.call("reactions.remove", &args(&target)), Err("no_reaction"));
    }

    #[test]
    fn upload_then_comment_then_info() {
        let mut ws = Workspace::seeded();
        let upload = Upload {
            field_name: Some("file".to_string()),
            file_name: Some("notes.txt".to_string()),
            content_type: Some("text/plain".to_string()),
            data: b"hello".to_vec(),
        };
        let body = ws
            .upload(&args(&[("filename", "notes.txt"), ("filetype", "auto")]), upload)
            .unwrap();
        let id = body["file"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["file"]["size"], 5);
        assert_eq!(body["file"]["filetype"], "txt");

        ws.call("files.comments.add", &args(&[("file", id.as_str()), ("comment", "nice")])).unwrap();
        let info = ws.call("files.info", &args(&[("file", id.as_str())])).unwrap();
        assert_eq!(info["comments"][0]["comment"], "nice");
    }

    #[test]
    fn unknown_methods_are_reported() {
        let mut ws = Workspace::seeded();
        assert_eq!(ws.call("channels.nuke", &Args::new()), Err("unknown_method"));
        assert_eq!(ws.call("bogus", &Args::new()), Err("unknown_method"));
    }
}
