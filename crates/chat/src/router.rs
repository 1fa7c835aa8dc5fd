//! Reply routing: knowledge base first, completion backend second.
//!
//! Every user message takes the same path:
//!
//! 1. **Record** the message in the session log
//! 2. **Knowledge lookup** — a hit answers locally, no network call
//! 3. **Completion call** on a miss, with the windowed context
//! 4. **Record** whatever came back (answer or error text) as the
//!    assistant's turn
//!
//! Routing never fails: backend errors are folded into the reply as
//! user-facing Italian text, so the session log always advances by exactly
//! one user entry and one assistant entry per turn.

use std::sync::Arc;

use mina_core::{
    CompletionClient, CompletionError, CompletionRequest, ConversationLog, KnowledgeBase, Message,
    Personality,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::ContextBuilder;

/// Attribution banner prepended when an answer is *displayed* to the user
/// and came from the knowledge base. The stored transcript keeps the bare
/// answer so later context windows are not polluted with markup.
pub const KNOWLEDGE_ATTRIBUTION: &str = "📚 **Dalla mia base di conoscenze:**\n\n";

/// Where a reply's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Answered locally from the knowledge base
    KnowledgeBase,
    /// Generated by the completion backend
    Generated,
    /// The backend failed; the answer is error text
    Error,
}

/// The outcome of routing one user message.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// The answer text, exactly as recorded in the session log
    pub answer: String,

    /// How the answer was produced
    pub source: ReplySource,
}

impl Reply {
    /// The answer rendered for a user-facing surface. Knowledge-base
    /// answers gain the attribution banner; everything else is verbatim.
    pub fn display(&self) -> String {
        match self.source {
            ReplySource::KnowledgeBase => format!("{KNOWLEDGE_ATTRIBUTION}{}", self.answer),
            ReplySource::Generated | ReplySource::Error => self.answer.clone(),
        }
    }
}

/// Routes user messages to the knowledge base or the completion backend.
///
/// The router is stateless across turns: the session log is owned by the
/// calling shell and passed in per call, so one router can serve any number
/// of sessions concurrently.
pub struct ResponseRouter {
    knowledge: KnowledgeBase,
    builder: ContextBuilder,
    client: Arc<dyn CompletionClient>,
}

impl ResponseRouter {
    /// Create a router over the given knowledge base and backend.
    pub fn new(knowledge: KnowledgeBase, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            knowledge,
            builder: ContextBuilder::new(),
            client,
        }
    }

    /// Replace the default context builder.
    pub fn with_builder(mut self, builder: ContextBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// The knowledge base this router consults.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Process one user message and return the reply.
    ///
    /// Appends the user message and the resulting assistant message to
    /// `log`, in that order, every time. The reply's `answer` is byte-equal
    /// to the recorded assistant entry.
    pub async fn route(
        &self,
        log: &mut ConversationLog,
        user_message: &str,
        personality: Personality,
        temperature: f32,
    ) -> Reply {
        log.push(Message::user(user_message));

        let reply = if let Some(entry) = self.knowledge.lookup(user_message) {
            debug!(trigger = %entry.trigger, "Knowledge base hit, completion call skipped");
            Reply {
                answer: entry.response.clone(),
                source: ReplySource::KnowledgeBase,
            }
        } else {
            let messages = self
                .builder
                .build(log, personality.system_prompt(), user_message);
            debug!(
                backend = self.client.name(),
                personality = personality.name(),
                messages = messages.len(),
                "Requesting completion"
            );

            match self
                .client
                .complete(CompletionRequest::new(messages, temperature))
                .await
            {
                Ok(answer) => Reply {
                    answer,
                    source: ReplySource::Generated,
                },
                Err(e) => {
                    warn!(backend = self.client.name(), error = %e, "Completion failed");
                    Reply {
                        answer: error_answer(&e),
                        source: ReplySource::Error,
                    }
                }
            }
        };

        log.push(Message::assistant(&reply.answer));
        reply
    }
}

/// The Italian answer recorded when the backend fails.
fn error_answer(err: &CompletionError) -> String {
    match err {
        CompletionError::NotConfigured => {
            "❌ Errore: API Key non configurata. Controlla la configurazione.".into()
        }
        CompletionError::Timeout => "❌ Errore: Timeout nella richiesta. Riprova.".into(),
        CompletionError::Connection(detail) => format!("❌ Errore di connessione: {detail}"),
        CompletionError::Unexpected(detail) => format!("❌ Errore imprevisto: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mina_core::{PromptMessage, Role};
    use std::sync::Mutex;

    /// A mock backend that replies with a fixed answer.
    struct ScriptedClient {
        answer: String,
        call_count: Mutex<usize>,
    }

    impl ScriptedClient {
        fn new(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.into(),
                call_count: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
            *self.call_count.lock().unwrap() += 1;
            Ok(self.answer.clone())
        }
    }

    /// A mock backend that always fails.
    struct FailingClient {
        error: CompletionError,
    }

    #[async_trait]
    impl CompletionClient for FailingClient {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
            Err(self.error.clone())
        }
    }

    /// A mock backend that records every request it receives.
    struct RecordingClient {
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl RecordingClient {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request);
            Ok("va bene".into())
        }
    }

    fn router_with(client: Arc<dyn CompletionClient>) -> ResponseRouter {
        ResponseRouter::new(KnowledgeBase::with_defaults(), client)
    }

    #[tokio::test]
    async fn knowledge_hit_skips_the_backend() {
        let client = ScriptedClient::new("mai usato");
        let router = router_with(client.clone());
        let mut log = ConversationLog::new();

        let reply = router
            .route(&mut log, "chi sei", Personality::default(), 0.7)
            .await;

        assert_eq!(reply.source, ReplySource::KnowledgeBase);
        assert!(reply.answer.contains("assistente personale"));
        assert_eq!(client.calls(), 0);
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn generated_reply_round_trips_through_the_backend() {
        let client = ScriptedClient::new("Ciao! Come posso aiutarti?");
        let router = router_with(client.clone());
        let mut log = ConversationLog::new();

        let reply = router
            .route(&mut log, "raccontami qualcosa", Personality::default(), 0.7)
            .await;

        assert_eq!(reply.source, ReplySource::Generated);
        assert_eq!(reply.answer, "Ciao! Come posso aiutarti?");
        assert_eq!(client.calls(), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages[0].role, Role::User);
        assert_eq!(log.messages[1].role, Role::Assistant);
        assert_eq!(log.messages[1].content, "Ciao! Come posso aiutarti?");
    }

    #[tokio::test]
    async fn timeout_becomes_an_italian_error_reply() {
        let client = Arc::new(FailingClient {
            error: CompletionError::Timeout,
        });
        let router = router_with(client);
        let mut log = ConversationLog::new();

        let reply = router
            .route(&mut log, "una domanda qualsiasi", Personality::default(), 0.7)
            .await;

        assert_eq!(reply.source, ReplySource::Error);
        assert_eq!(reply.answer, "❌ Errore: Timeout nella richiesta. Riprova.");
        // The error text is recorded as the assistant's turn.
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages[1].content, reply.answer);
    }

    #[tokio::test]
    async fn missing_key_reply_names_the_configuration() {
        let client = Arc::new(FailingClient {
            error: CompletionError::NotConfigured,
        });
        let router = router_with(client);
        let mut log = ConversationLog::new();

        let reply = router
            .route(&mut log, "qualcosa di generato", Personality::default(), 0.7)
            .await;

        assert_eq!(reply.source, ReplySource::Error);
        assert!(reply.answer.contains("API Key non configurata"));
    }

    #[tokio::test]
    async fn connection_detail_is_preserved() {
        let client = Arc::new(FailingClient {
            error: CompletionError::Connection("HTTP 500: server error".into()),
        });
        let router = router_with(client);
        let mut log = ConversationLog::new();

        let reply = router
            .route(&mut log, "dimmi qualcosa", Personality::default(), 0.7)
            .await;

        assert_eq!(
            reply.answer,
            "❌ Errore di connessione: HTTP 500: server error"
        );
    }

    #[tokio::test]
    async fn every_turn_appends_exactly_two_entries() {
        let client = ScriptedClient::new("risposta");
        let router = router_with(client);
        let mut log = ConversationLog::new();

        for question in ["prima domanda", "seconda domanda", "terza domanda"] {
            router
                .route(&mut log, question, Personality::default(), 0.7)
                .await;
        }

        assert_eq!(log.len(), 6);
        for (i, msg) in log.messages.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(msg.role, expected);
        }
    }

    #[tokio::test]
    async fn knowledge_answers_ignore_personality_and_temperature() {
        let router = router_with(ScriptedClient::new("ignorato"));

        let mut log_a = ConversationLog::new();
        let a = router
            .route(&mut log_a, "chi sei", Personality::Amichevole, 0.1)
            .await;

        let mut log_b = ConversationLog::new();
        let b = router
            .route(&mut log_b, "chi sei", Personality::Tecnico, 1.9)
            .await;

        assert_eq!(a.answer, b.answer);
        assert_eq!(a.source, ReplySource::KnowledgeBase);
        assert_eq!(b.source, ReplySource::KnowledgeBase);
    }

    #[tokio::test]
    async fn submitted_context_is_windowed_and_ordered() {
        let client = RecordingClient::new();
        let router = router_with(client.clone());

        // 25 prior entries already in the session.
        let mut log = ConversationLog::new();
        for i in 0..25 {
            log.push(Message::user(format!("vecchia domanda {i}")));
        }

        router
            .route(&mut log, "raccontami una storia", Personality::Creativo, 1.2)
            .await;

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];

        // system + 19 history + current user
        assert_eq!(request.messages.len(), 21);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(
            request.messages[0].content,
            Personality::Creativo.system_prompt()
        );
        assert_eq!(
            *request.messages.last().unwrap(),
            PromptMessage::user("raccontami una storia")
        );
        assert!((request.temperature - 1.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn display_adds_attribution_only_for_knowledge_answers() {
        let router = router_with(ScriptedClient::new("testo generato"));

        let mut log = ConversationLog::new();
        let hit = router
            .route(&mut log, "cosa sai fare", Personality::default(), 0.7)
            .await;
        assert!(hit.display().starts_with(KNOWLEDGE_ATTRIBUTION));
        // The transcript records the bare answer, without the banner.
        assert_eq!(log.messages[1].content, hit.answer);
        assert!(!log.messages[1].content.contains("📚"));

        let miss = router
            .route(&mut log, "inventa un saluto", Personality::default(), 0.7)
            .await;
        assert_eq!(miss.display(), miss.answer);
    }

    #[test]
    fn reply_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ReplySource::KnowledgeBase).unwrap(),
            "\"knowledge_base\""
        );
        assert_eq!(
            serde_json::to_string(&ReplySource::Generated).unwrap(),
            "\"generated\""
        );
        assert_eq!(
            serde_json::to_string(&ReplySource::Error).unwrap(),
            "\"error\""
        );
    }
}
