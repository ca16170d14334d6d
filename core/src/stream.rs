//! Single-element stream adapter.
//!
//! Wraps a facade call so stream-based consumers receive exactly one item:
//! the call's `Result`. Nothing here builds requests; every stream is the
//! corresponding async method with a different shape.

use std::future::Future;

use futures_util::stream::{self, BoxStream, Once, StreamExt};

use crate::dispatch::Transport;
use crate::error::ApiError;
use crate::types::{ConversationKind, History, HistoryOptions, MessageOptions, PostedMessage};
use crate::web_api::WebApi;

/// A stream yielding the output of `future` once, then ending.
pub fn single<F: Future>(future: F) -> Once<F> {
    stream::once(future)
}

impl<T: Transport + 'static> WebApi<T> {
    /// [`WebApi::history`] as a one-item stream.
    pub fn history_stream(
        &self,
        kind: ConversationKind,
        channel: &str,
        options: HistoryOptions,
    ) -> BoxStream<'static, Result<History, ApiError>> {
        let api = self.clone();
        let channel = channel.to_string();
        single(async move { api.history(kind, &channel, &options).await }).boxed()
    }

    /// [`WebApi::mark`] as a one-item stream.
    pub fn mark_stream(
        &self,
        kind: ConversationKind,
        channel: &str,
        ts: &str,
    ) -> BoxStream<'static, Result<String, ApiError>> {
        let api = self.clone();
        let (channel, ts) = (channel.to_string(), ts.to_string());
        single(async move { api.mark(kind, &channel, &ts).await }).boxed()
    }

    /// [`WebApi::send_message`] as a one-item stream.
    pub fn send_message_stream(
        &self,
        channel: &str,
        text: &str,
        options: MessageOptions,
    ) -> BoxStream<'static, Result<PostedMessage, ApiError>> {
        let api = self.clone();
        let (channel, text) = (channel.to_string(), text.to_string());
        single(async move { api.send_message(&channel, &text, &options).await }).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web_api::tests::{api, ScriptedTransport};

    #[tokio::test]
    async fn single_yields_exactly_once() {
        let items: Vec<u32> = single(async { 7 }).collect().await;
        assert_eq!(items, vec![7]);
    }

    #[tokio::test]
    async fn history_stream_emits_one_result() {
        let api = api(ScriptedTransport::default().reply(
            r#"{"ok": true, "messages": [{"ts": "2.0", "text": "b"}, {"ts": "1.0", "text": "a"}], "has_more": true}"#,
        ));
        let items: Vec<_> = api
            .history_stream(ConversationKind::Group, "G1", HistoryOptions::default())
            .collect()
            .await;
        assert_eq!(items.len(), 1);
        let history = items[0].as_ref().unwrap();
        assert_eq!(history.messages.len(), 2);
        assert!(history.has_more);
    }

    #[tokio::test]
    async fn errors_arrive_as_the_single_item() {
        let api = api(ScriptedTransport::default().reply(r#"{"ok": false, "error": "not_in_channel"}"#));
        let mut stream = api.mark_stream(ConversationKind::Channel, "C1", "1.0");
        let first = stream.next().await.unwrap();
        assert_eq!(
            first.unwrap_err(),
            ApiError::Platform(crate::SlackError::NotInChannel)
        );
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn send_message_stream_posts_once() {
        let api = api(ScriptedTransport::default().reply(r#"{"ok": true, "ts": "3.0", "channel": "C9"}"#));
        let items: Vec<_> = api
            .send_message_stream("C9", "hi", MessageOptions::default())
            .collect()
            .await;
        assert_eq!(items, vec![Ok(PostedMessage { ts: "3.0".to_string(), channel: "C9".to_string() })]);
    }
}
