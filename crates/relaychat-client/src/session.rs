//! The client session: in-memory turns, persistence mirroring and the
//! incremental render loop.
//!
//! One submission runs `Idle → Submitting → Streaming → Idle`. Cancellation
//! detours through `Stopped`, any other failure through `Errored`; both end
//! back in `Idle`. Only one submission is in flight at a time, which the
//! `&mut self` receiver of [`ChatSession::submit`] enforces.

use futures::StreamExt;
use relaychat_types::{ChatTurn, Conversation, Role, StreamChunk, TurnPayload};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::ClientError;
use crate::render::RenderSink;
use crate::sse::{SseDecoder, SseLine};
use crate::store::ChatStore;
use crate::transport::{ByteStream, ChatTransport, RelayReply};

/// Assistant content shown and stored when a reply fails.
pub const FALLBACK_ERROR_MESSAGE: &str = "Sorry, something went wrong.";

/// Title of a conversation started explicitly with [`ChatSession::new_chat`].
pub const DEFAULT_TITLE: &str = "New Chat";

const TITLE_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Submitting,
    Streaming,
    Stopped,
    Errored,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply finished; `content` is what was persisted.
    Completed { content: String },
    /// The caller cancelled. `persisted` is the partial reply, if any was
    /// shown before the cancellation.
    Stopped { persisted: Option<String> },
    /// The reply failed and the fallback message was shown in its place.
    Errored { reason: String },
}

pub struct ChatSession<S, T> {
    store: S,
    transport: T,
    conversation_id: Option<String>,
    turns: Vec<ChatTurn>,
    phase: SessionPhase,
}

/// Title for a conversation created by its first message.
fn title_from_input(input: &str) -> String {
    let prefix: String = input.chars().take(TITLE_CHARS).collect();
    format!("{prefix}...")
}

impl<S: ChatStore, T: ChatTransport> ChatSession<S, T> {
    /// A session with no current conversation; the first submission creates one.
    pub fn new(store: S, transport: T) -> Self {
        Self {
            store,
            transport,
            conversation_id: None,
            turns: Vec::new(),
            phase: SessionPhase::Idle,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start an empty conversation titled [`DEFAULT_TITLE`] and make it current.
    pub async fn new_chat(&mut self) -> Result<Conversation, ClientError> {
        let id = Uuid::new_v4().to_string();
        let conv = self.store.create_conversation(&id, DEFAULT_TITLE).await?;
        info!(conversation = %conv.id, "new chat");
        self.conversation_id = Some(conv.id.clone());
        self.turns.clear();
        Ok(conv)
    }

    /// Make `id` current and load its persisted turns.
    pub async fn select_conversation(&mut self, id: &str) -> Result<(), ClientError> {
        let known = self.store.list_conversations().await?;
        if !known.iter().any(|c| c.id == id) {
            return Err(crate::store::StoreError::NotFound(id.to_owned()).into());
        }
        let messages = self.store.list_messages(id).await?;
        debug!(conversation = %id, turns = messages.len(), "conversation loaded");
        self.turns = messages.into_iter().map(ChatTurn::from).collect();
        self.conversation_id = Some(id.to_owned());
        Ok(())
    }

    /// All conversations, most recently updated first.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        Ok(self.store.list_conversations().await?)
    }

    pub async fn rename_conversation(&self, id: &str, title: &str) -> Result<(), ClientError> {
        Ok(self.store.update_conversation_title(id, title).await?)
    }

    /// Delete a conversation. Deleting the current one starts a new chat.
    pub async fn delete_conversation(&mut self, id: &str) -> Result<(), ClientError> {
        self.store.delete_conversation(id).await?;
        info!(conversation = %id, "conversation deleted");
        if self.conversation_id.as_deref() == Some(id) {
            self.new_chat().await?;
        }
        Ok(())
    }

    pub async fn close(self) {
        self.store.close().await;
    }

    /// Submit `input` and render the reply into `sink` as it arrives.
    ///
    /// Returns `Err` only for empty input or when the store fails; relay
    /// failures end in [`SubmitOutcome::Errored`].
    pub async fn submit(
        &mut self,
        input: &str,
        cancel: CancellationToken,
        sink: &mut impl RenderSink,
    ) -> Result<SubmitOutcome, ClientError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ClientError::EmptyInput);
        }

        let result = self.run(input, &cancel, sink).await;
        self.set_phase(SessionPhase::Idle, sink);
        result
    }

    async fn run(
        &mut self,
        input: &str,
        cancel: &CancellationToken,
        sink: &mut impl RenderSink,
    ) -> Result<SubmitOutcome, ClientError> {
        self.set_phase(SessionPhase::Submitting, sink);

        let conversation_id = match &self.conversation_id {
            Some(id) => id.clone(),
            None => {
                let id = Uuid::new_v4().to_string();
                self.store.create_conversation(&id, &title_from_input(input)).await?;
                self.conversation_id = Some(id.clone());
                id
            }
        };

        self.turns.push(ChatTurn::new(Role::User, input));
        sink.render(&self.turns);
        self.store.append_message(&conversation_id, Role::User, input).await?;

        let outbound: Vec<TurnPayload> = self
            .turns
            .iter()
            .filter(|t| !t.is_blank())
            .map(TurnPayload::from)
            .collect();
        debug!(conversation = %conversation_id, turns = outbound.len(), "submitting");

        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            reply = self.transport.send(outbound) => Some(reply),
        };

        match reply {
            None => self.stop(&conversation_id, None, sink).await,
            Some(Err(e)) => self.fail(&conversation_id, e, false, sink).await,
            Some(Ok(RelayReply::Complete(completion))) => {
                let Some(content) = completion.content().filter(|c| !c.is_empty()) else {
                    return self
                        .fail(&conversation_id, ClientError::EmptyCompletion, false, sink)
                        .await;
                };
                let content = content.to_owned();
                self.turns.push(ChatTurn::new(Role::Assistant, content.as_str()));
                sink.render(&self.turns);
                self.store
                    .append_message(&conversation_id, Role::Assistant, &content)
                    .await?;
                Ok(SubmitOutcome::Completed { content })
            }
            Some(Ok(RelayReply::Stream(stream))) => {
                self.stream_reply(&conversation_id, stream, cancel, sink).await
            }
        }
    }

    async fn stream_reply(
        &mut self,
        conversation_id: &str,
        mut stream: ByteStream,
        cancel: &CancellationToken,
        sink: &mut impl RenderSink,
    ) -> Result<SubmitOutcome, ClientError> {
        self.set_phase(SessionPhase::Streaming, sink);
        self.turns.push(ChatTurn::new(Role::Assistant, ""));
        sink.render(&self.turns);

        let mut decoder = SseDecoder::new();
        let mut content = String::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                chunk = stream.next() => Some(chunk),
            };
            match next {
                None => {
                    // Dropping the stream aborts the request.
                    drop(stream);
                    return self.stop(conversation_id, Some(content), sink).await;
                }
                Some(None) => {
                    if let Some(line) = decoder.finish() {
                        self.apply_line(line, &mut content, sink);
                    }
                    break;
                }
                Some(Some(Err(e))) => return self.fail(conversation_id, e, true, sink).await,
                Some(Some(Ok(bytes))) => {
                    for line in decoder.push(&bytes) {
                        self.apply_line(line, &mut content, sink);
                    }
                }
            }
        }

        self.store
            .append_message(conversation_id, Role::Assistant, &content)
            .await?;
        info!(conversation = %conversation_id, chars = content.len(), "reply completed");
        Ok(SubmitOutcome::Completed { content })
    }

    /// Apply one stream line to the placeholder turn.
    fn apply_line(&mut self, line: SseLine, content: &mut String, sink: &mut impl RenderSink) {
        let SseLine::Data(payload) = line else {
            return;
        };
        let chunk: StreamChunk = match serde_json::from_str(&payload) {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(error = %e, line = %payload, "skipping malformed stream fragment");
                return;
            }
        };
        let Some(fragment) = chunk.fragment().filter(|f| !f.is_empty()) else {
            return;
        };
        content.push_str(fragment);
        if let Some(last) = self.turns.last_mut() {
            *last = last.with_content(content.as_str());
        }
        sink.render(&self.turns);
    }

    async fn stop(
        &mut self,
        conversation_id: &str,
        partial: Option<String>,
        sink: &mut impl RenderSink,
    ) -> Result<SubmitOutcome, ClientError> {
        self.set_phase(SessionPhase::Stopped, sink);

        let persisted = match partial {
            Some(content) if !content.is_empty() => {
                self.store
                    .append_message(conversation_id, Role::Assistant, &content)
                    .await?;
                Some(content)
            }
            Some(_) => {
                // Placeholder never received content.
                self.turns.pop();
                sink.render(&self.turns);
                None
            }
            None => None,
        };
        info!(conversation = %conversation_id, partial = persisted.is_some(), "reply stopped");
        Ok(SubmitOutcome::Stopped { persisted })
    }

    async fn fail(
        &mut self,
        conversation_id: &str,
        cause: ClientError,
        has_placeholder: bool,
        sink: &mut impl RenderSink,
    ) -> Result<SubmitOutcome, ClientError> {
        error!(conversation = %conversation_id, error = %cause, "chat reply failed");
        self.set_phase(SessionPhase::Errored, sink);

        if has_placeholder && let Some(last) = self.turns.last_mut() {
            *last = last.with_content(FALLBACK_ERROR_MESSAGE);
        } else {
            self.turns.push(ChatTurn::new(Role::Assistant, FALLBACK_ERROR_MESSAGE));
        }
        sink.render(&self.turns);

        self.store
            .append_message(conversation_id, Role::Assistant, FALLBACK_ERROR_MESSAGE)
            .await?;
        Ok(SubmitOutcome::Errored {
            reason: cause.to_string(),
        })
    }

    fn set_phase(&mut self, phase: SessionPhase, sink: &mut impl RenderSink) {
        self.phase = phase;
        sink.phase(phase);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::NullSink;
    use crate::store::MemoryStore;
    use bytes::Bytes;
    use futures::channel::mpsc;
    use relaychat_types::CompletionResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    /// Hands out pre-arranged replies and records what was sent.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<RelayReply, ClientError>>>,
        sent: Mutex<Vec<Vec<TurnPayload>>>,
    }

    impl ScriptedTransport {
        fn reply(self, reply: Result<RelayReply, ClientError>) -> Self {
            self.replies.lock().unwrap().push_back(reply);
            self
        }

        fn sent(&self) -> Vec<Vec<TurnPayload>> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl ChatTransport for ScriptedTransport {
        async fn send(&self, messages: Vec<TurnPayload>) -> Result<RelayReply, ClientError> {
            self.sent.lock().unwrap().push(messages);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ClientError::Status {
                    status: 500,
                    message: "no scripted reply".into(),
                }))
        }
    }

    type Sender = mpsc::UnboundedSender<Result<Bytes, ClientError>>;

    /// A stream fed through a channel so the test decides chunk boundaries.
    fn channel_stream() -> (Sender, RelayReply) {
        let (tx, rx) = mpsc::unbounded();
        (tx, RelayReply::Stream(rx.boxed()))
    }

    fn data_line(fragment: &str) -> Bytes {
        let chunk = serde_json::json!({ "choices": [{ "delta": { "content": fragment } }] });
        Bytes::from(format!("data: {chunk}\n\n"))
    }

    fn buffered(content: &str) -> RelayReply {
        let body = serde_json::json!({ "choices": [{ "message": { "content": content } }] });
        RelayReply::Complete(serde_json::from_value::<CompletionResponse>(body).unwrap())
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<Vec<ChatTurn>>,
        phases: Vec<SessionPhase>,
        cancel_after: Option<(usize, CancellationToken)>,
        fragments_seen: usize,
    }

    impl RenderSink for RecordingSink {
        fn render(&mut self, turns: &[ChatTurn]) {
            if turns.last().is_some_and(|t| t.role == Role::Assistant && !t.content.is_empty()) {
                self.fragments_seen += 1;
                if let Some((n, token)) = &self.cancel_after {
                    if self.fragments_seen == *n {
                        token.cancel();
                    }
                }
            }
            self.frames.push(turns.to_vec());
        }

        fn phase(&mut self, phase: SessionPhase) {
            self.phases.push(phase);
        }
    }

    fn session(transport: ScriptedTransport) -> ChatSession<MemoryStore, ScriptedTransport> {
        ChatSession::new(MemoryStore::new(), transport)
    }

    async fn persisted(s: &ChatSession<MemoryStore, ScriptedTransport>) -> Vec<(Role, String)> {
        let id = s.conversation_id().unwrap();
        s.store()
            .list_messages(id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| (m.role, m.content))
            .collect()
    }

    #[tokio::test]
    async fn buffered_reply_is_shown_and_persisted() {
        let mut s = session(ScriptedTransport::default().reply(Ok(buffered("hello"))));
        let mut sink = RecordingSink::default();

        let outcome = s.submit("hi", CancellationToken::new(), &mut sink).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Completed { content: "hello".into() });
        assert_eq!(s.turns().last().unwrap().content, "hello");
        assert_eq!(
            persisted(&s).await,
            vec![(Role::User, "hi".to_owned()), (Role::Assistant, "hello".to_owned())]
        );
        assert_eq!(s.transport.sent(), vec![vec![TurnPayload::new(Role::User, "hi")]]);
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(
            sink.phases,
            vec![SessionPhase::Submitting, SessionPhase::Idle]
        );
    }

    #[tokio::test]
    async fn streamed_fragments_render_one_by_one() {
        let (tx, reply) = channel_stream();
        for f in ["Hel", "lo", ", world"] {
            tx.unbounded_send(Ok(data_line(f))).unwrap();
        }
        tx.unbounded_send(Ok(Bytes::from_static(b"data: [DONE]\n\n"))).unwrap();
        drop(tx);

        let mut s = session(ScriptedTransport::default().reply(Ok(reply)));
        let mut sink = RecordingSink::default();
        let outcome = s.submit("hi", CancellationToken::new(), &mut sink).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Completed { content: "Hello, world".into() });
        let shown: Vec<_> = sink
            .frames
            .iter()
            .filter_map(|f| f.last())
            .filter(|t| t.role == Role::Assistant)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(shown, ["", "Hel", "Hello", "Hello, world"]);
        assert_eq!(persisted(&s).await.last().unwrap().1, "Hello, world");
        assert_eq!(
            sink.phases,
            vec![SessionPhase::Submitting, SessionPhase::Streaming, SessionPhase::Idle]
        );
    }

    #[tokio::test]
    async fn fragment_split_across_chunks_is_reassembled() {
        let (tx, reply) = channel_stream();
        let line = data_line("héllo");
        // Split inside the two-byte 'é'.
        let at = line.iter().position(|b| *b == 0xC3).unwrap() + 1;
        let (a, b) = line.split_at(at);
        tx.unbounded_send(Ok(Bytes::copy_from_slice(a))).unwrap();
        tx.unbounded_send(Ok(Bytes::copy_from_slice(b))).unwrap();
        drop(tx);

        let mut s = session(ScriptedTransport::default().reply(Ok(reply)));
        let outcome = s.submit("hi", CancellationToken::new(), &mut NullSink).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed { content: "héllo".into() });
    }

    #[tokio::test]
    #[traced_test]
    async fn malformed_fragment_is_skipped() {
        let (tx, reply) = channel_stream();
        tx.unbounded_send(Ok(data_line("A"))).unwrap();
        tx.unbounded_send(Ok(Bytes::from_static(b"data: {not json\n\n"))).unwrap();
        tx.unbounded_send(Ok(data_line("B"))).unwrap();
        drop(tx);

        let mut s = session(ScriptedTransport::default().reply(Ok(reply)));
        let outcome = s.submit("hi", CancellationToken::new(), &mut NullSink).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Completed { content: "AB".into() });
        assert!(logs_contain("skipping malformed stream fragment"));
    }

    #[tokio::test]
    async fn cancel_mid_stream_persists_shown_fragments() {
        let (tx, reply) = channel_stream();
        for f in ["one ", "two ", "three"] {
            tx.unbounded_send(Ok(data_line(f))).unwrap();
        }

        let cancel = CancellationToken::new();
        let mut s = session(ScriptedTransport::default().reply(Ok(reply)));
        let mut sink = RecordingSink {
            cancel_after: Some((2, cancel.clone())),
            ..Default::default()
        };
        let outcome = s.submit("count", cancel, &mut sink).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Stopped { persisted: Some("one two ".into()) });
        assert_eq!(s.turns().last().unwrap().content, "one two ");
        assert_eq!(persisted(&s).await.last().unwrap(), &(Role::Assistant, "one two ".to_owned()));
        assert!(sink.phases.contains(&SessionPhase::Stopped));
        assert_eq!(s.phase(), SessionPhase::Idle);
        drop(tx);
    }

    #[tokio::test]
    async fn cancel_before_content_persists_nothing() {
        let (tx, reply) = channel_stream();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut s = session(ScriptedTransport::default().reply(Ok(reply)));
        let outcome = s.submit("hi", cancel, &mut NullSink).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Stopped { persisted: None });
        assert_eq!(persisted(&s).await, vec![(Role::User, "hi".to_owned())]);
        assert_eq!(s.turns().len(), 1);
        drop(tx);
    }

    #[tokio::test]
    async fn transport_failure_appends_fallback() {
        let failure = ClientError::Status {
            status: 500,
            message: "Internal Server Error".into(),
        };
        let mut s = session(ScriptedTransport::default().reply(Err(failure)));
        let mut sink = RecordingSink::default();
        let outcome = s.submit("hi", CancellationToken::new(), &mut sink).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Errored { .. }));
        assert_eq!(s.turns().len(), 2);
        assert_eq!(s.turns()[1].content, FALLBACK_ERROR_MESSAGE);
        assert_eq!(persisted(&s).await[1], (Role::Assistant, FALLBACK_ERROR_MESSAGE.to_owned()));
        assert_eq!(
            sink.phases,
            vec![SessionPhase::Submitting, SessionPhase::Errored, SessionPhase::Idle]
        );
    }

    #[tokio::test]
    async fn broken_stream_replaces_placeholder_with_fallback() {
        let (tx, reply) = channel_stream();
        tx.unbounded_send(Ok(data_line("partial"))).unwrap();
        tx.unbounded_send(Err(ClientError::Status { status: 502, message: "gone".into() }))
            .unwrap();
        drop(tx);

        let mut s = session(ScriptedTransport::default().reply(Ok(reply)));
        let outcome = s.submit("hi", CancellationToken::new(), &mut NullSink).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Errored { .. }));
        assert_eq!(s.turns().len(), 2);
        assert_eq!(s.turns()[1].content, FALLBACK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn empty_buffered_content_is_an_error() {
        let mut s = session(ScriptedTransport::default().reply(Ok(buffered(""))));
        let outcome = s.submit("hi", CancellationToken::new(), &mut NullSink).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Errored { .. }));
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let mut s = session(ScriptedTransport::default());
        let err = s.submit("   ", CancellationToken::new(), &mut NullSink).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyInput));
        assert!(s.transport.sent().is_empty());
        assert!(s.conversation_id().is_none());
    }

    #[tokio::test]
    async fn first_message_titles_the_conversation() {
        let mut s = session(ScriptedTransport::default().reply(Ok(buffered("ok"))));
        let input = "How do I borrow a value mutably twice in Rust?";
        s.submit(input, CancellationToken::new(), &mut NullSink).await.unwrap();

        let convs = s.conversations().await.unwrap();
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].title, "How do I borrow a value mutabl...");
    }

    #[tokio::test]
    async fn empty_turns_are_not_sent() {
        let (tx, reply) = channel_stream();
        drop(tx);
        let mut s = session(
            ScriptedTransport::default()
                .reply(Ok(reply))
                .reply(Ok(buffered("second"))),
        );

        // An empty stream leaves an empty assistant turn behind.
        s.submit("first", CancellationToken::new(), &mut NullSink).await.unwrap();
        assert_eq!(s.turns()[1].content, "");

        s.submit("again", CancellationToken::new(), &mut NullSink).await.unwrap();
        let sent = s.transport.sent();
        assert_eq!(
            sent[1],
            vec![
                TurnPayload::new(Role::User, "first"),
                TurnPayload::new(Role::User, "again"),
            ]
        );
    }

    #[tokio::test]
    async fn whitespace_only_turns_are_not_sent() {
        let (tx, reply) = channel_stream();
        tx.unbounded_send(Ok(data_line("\n\n"))).unwrap();
        drop(tx);
        let mut s = session(
            ScriptedTransport::default()
                .reply(Ok(reply))
                .reply(Ok(buffered("second"))),
        );

        let outcome = s.submit("first", CancellationToken::new(), &mut NullSink).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed { content: "\n\n".into() });

        s.submit("again", CancellationToken::new(), &mut NullSink).await.unwrap();
        assert_eq!(
            s.transport.sent()[1],
            vec![
                TurnPayload::new(Role::User, "first"),
                TurnPayload::new(Role::User, "again"),
            ]
        );
    }

    #[tokio::test]
    async fn select_loads_history_and_new_chat_clears_it() {
        let mut s = session(ScriptedTransport::default().reply(Ok(buffered("hello"))));
        s.submit("hi", CancellationToken::new(), &mut NullSink).await.unwrap();
        let first = s.conversation_id().unwrap().to_owned();

        let fresh = s.new_chat().await.unwrap();
        assert_eq!(fresh.title, DEFAULT_TITLE);
        assert!(s.turns().is_empty());

        s.select_conversation(&first).await.unwrap();
        let contents: Vec<_> = s.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["hi", "hello"]);

        let err = s.select_conversation("missing").await.unwrap_err();
        assert!(matches!(err, ClientError::Store(_)));
    }

    #[tokio::test]
    async fn deleting_current_conversation_starts_a_new_chat() {
        let mut s = session(ScriptedTransport::default().reply(Ok(buffered("hello"))));
        s.submit("hi", CancellationToken::new(), &mut NullSink).await.unwrap();
        let doomed = s.conversation_id().unwrap().to_owned();

        s.delete_conversation(&doomed).await.unwrap();

        assert_ne!(s.conversation_id(), Some(doomed.as_str()));
        assert!(s.turns().is_empty());
        assert!(s.store().list_messages(&doomed).await.unwrap().is_empty());
        let convs = s.conversations().await.unwrap();
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn rename_updates_the_sidebar() {
        let mut s = session(ScriptedTransport::default());
        let conv = s.new_chat().await.unwrap();
        s.rename_conversation(&conv.id, "Lifetimes").await.unwrap();
        assert_eq!(s.conversations().await.unwrap()[0].title, "Lifetimes");
    }
}
