//! Session binder: conversation resolution and provider session reuse.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, trace};

use crate::advisor::core::conversation::Conversation;
use crate::advisor::core::errors::{AdvisorError, AdvisorResult};
use crate::advisor::core::ids::{ConversationId, UserId};
use crate::advisor::storage::conversation_store::ConversationStore;
use crate::llm::{ChatProvider, ChatSession};

/// Result of one advisor question.
#[derive(Clone, Debug)]
pub struct AdvisorReply {
    /// Conversation the answer belongs to; echo it back to continue the
    /// conversation.
    pub conversation_id: ConversationId,
    /// The model's text response.
    pub text: String,
}

/// Binds durable conversations to in-memory provider chat sessions.
///
/// One instance owns the session table; inject it into the request path
/// rather than sharing process-global state, so tests can run isolated
/// binders with fake backends.
pub struct SessionBinder {
    store: Arc<dyn ConversationStore>,
    provider: Arc<dyn ChatProvider>,
    sessions: DashMap<ConversationId, Arc<dyn ChatSession>>,
}

impl SessionBinder {
    /// Create a binder over the given storage and provider backends.
    #[must_use]
    pub fn new(store: Arc<dyn ConversationStore>, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            store,
            provider,
            sessions: DashMap::new(),
        }
    }

    /// Resolve the conversation for a request, creating one if no id was
    /// supplied.
    ///
    /// # Errors
    /// Returns `ConversationNotFound` for an unknown id, `PermissionDenied`
    /// when the conversation belongs to another caller, or a storage error.
    pub async fn resolve_conversation(
        &self,
        conversation_id: Option<ConversationId>,
        caller: UserId,
    ) -> AdvisorResult<Conversation> {
        let Some(id) = conversation_id else {
            let conversation = Conversation::new(caller);
            self.store.save(&conversation).await?;
            debug!(conversation_id = %conversation.id, user_id = %caller, "created new conversation");
            return Ok(conversation);
        };

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdvisorError::ConversationNotFound(id.to_string()))?;

        if !existing.is_owned_by(caller) {
            return Err(AdvisorError::PermissionDenied(id.to_string()));
        }

        Ok(existing)
    }

    /// Return the chat session for a conversation, constructing it on first
    /// use.
    ///
    /// The entry API makes get-or-create atomic per key: when two callers
    /// race on the same fresh id, exactly one session is constructed and
    /// stored, and both receive it.
    ///
    /// # Errors
    /// Returns an error if the provider cannot construct a session.
    pub fn get_or_create_session(
        &self,
        conversation_id: ConversationId,
    ) -> AdvisorResult<Arc<dyn ChatSession>> {
        match self.sessions.entry(conversation_id) {
            Entry::Occupied(occupied) => Ok(Arc::clone(occupied.get())),
            Entry::Vacant(vacant) => {
                debug!(conversation_id = %conversation_id, "creating new chat session");
                let session = self.provider.create_session()?;
                vacant.insert(Arc::clone(&session));
                Ok(session)
            }
        }
    }

    /// Answer one user question within a conversation.
    ///
    /// Resolves (or creates) the conversation, binds its chat session and
    /// forwards the prompt to the provider. Ownership failures surface
    /// before any session is touched or any provider call is made.
    ///
    /// # Errors
    /// Propagates resolution failures and provider failures unmodified;
    /// nothing is retried.
    pub async fn ask(
        &self,
        prompt: &str,
        conversation_id: Option<ConversationId>,
        caller: UserId,
    ) -> AdvisorResult<AdvisorReply> {
        info!(user_id = %caller, "processing advisor question");
        debug!(prompt_chars = prompt.len(), "received prompt");

        let conversation = self.resolve_conversation(conversation_id, caller).await?;
        let session = self.get_or_create_session(conversation.id)?;

        debug!(conversation_id = %conversation.id, "sending prompt to provider");
        let text = session.send(prompt).await?;

        let turns = session.history_len().await;
        trace!(conversation_id = %conversation.id, turns, "conversation history after turn");
        info!(
            conversation_id = %conversation.id,
            response_chars = text.len(),
            "advisor response generated"
        );

        Ok(AdvisorReply {
            conversation_id: conversation.id,
            text,
        })
    }

    /// Number of live chat sessions, for diagnostics.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use dashmap::DashMap;
    use tokio::sync::Mutex;

    use crate::advisor::storage::conversation_store::StoreFuture;

    /// In-memory conversation store for binder tests.
    #[derive(Default)]
    struct InMemoryStore {
        rows: DashMap<ConversationId, Conversation>,
    }

    impl ConversationStore for InMemoryStore {
        fn save(&self, conversation: &Conversation) -> StoreFuture<'_, AdvisorResult<()>> {
            let conversation = conversation.clone();
            Box::pin(async move {
                self.rows.insert(conversation.id, conversation);
                Ok(())
            })
        }

        fn find_by_id(
            &self,
            id: ConversationId,
        ) -> StoreFuture<'_, AdvisorResult<Option<Conversation>>> {
            Box::pin(async move { Ok(self.rows.get(&id).map(|row| row.value().clone())) })
        }
    }

    /// Fake session that records prompts and returns a canned answer.
    #[derive(Default)]
    struct FakeSession {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatSession for FakeSession {
        async fn send(&self, prompt: &str) -> AdvisorResult<String> {
            let mut prompts = self.prompts.lock().await;
            prompts.push(prompt.to_string());
            Ok(format!("answer #{}", prompts.len()))
        }

        async fn history_len(&self) -> usize {
            self.prompts.lock().await.len() * 2
        }
    }

    /// Fake provider counting how many sessions it constructed.
    #[derive(Default)]
    struct FakeProvider {
        created: AtomicUsize,
    }

    impl ChatProvider for FakeProvider {
        fn create_session(&self) -> AdvisorResult<Arc<dyn ChatSession>> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FakeSession::default()))
        }
    }

    fn binder_with_fakes() -> (Arc<SessionBinder>, Arc<InMemoryStore>, Arc<FakeProvider>) {
        let store = Arc::new(InMemoryStore::default());
        let provider = Arc::new(FakeProvider::default());
        let binder = Arc::new(SessionBinder::new(
            Arc::clone(&store) as Arc<dyn ConversationStore>,
            Arc::clone(&provider) as Arc<dyn ChatProvider>,
        ));
        (binder, store, provider)
    }

    #[tokio::test]
    async fn ask_without_id_creates_an_owned_conversation() {
        let (binder, store, _provider) = binder_with_fakes();
        let caller = UserId::new();

        let reply = binder.ask("What is cash flow?", None, caller).await.unwrap();

        let stored = store
            .find_by_id(reply.conversation_id)
            .await
            .unwrap()
            .expect("conversation should be persisted");
        assert!(stored.is_owned_by(caller));
        assert_eq!(reply.text, "answer #1");
    }

    #[tokio::test]
    async fn fresh_conversations_never_reuse_an_id() {
        let (binder, _store, _provider) = binder_with_fakes();
        let caller = UserId::new();

        let first = binder.ask("q1", None, caller).await.unwrap();
        let second = binder.ask("q2", None, caller).await.unwrap();

        assert_ne!(first.conversation_id, second.conversation_id);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (binder, _store, provider) = binder_with_fakes();

        let result = binder
            .ask("hello", Some(ConversationId::new()), UserId::new())
            .await;

        assert!(matches!(
            result,
            Err(AdvisorError::ConversationNotFound(_))
        ));
        assert_eq!(provider.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn foreign_conversation_is_permission_denied() {
        let (binder, _store, provider) = binder_with_fakes();
        let owner = UserId::new();
        let intruder = UserId::new();

        let reply = binder.ask("mine", None, owner).await.unwrap();
        let result = binder
            .ask("yours?", Some(reply.conversation_id), intruder)
            .await;

        assert!(matches!(result, Err(AdvisorError::PermissionDenied(_))));
        // Only the owner's session was ever constructed.
        assert_eq!(provider.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeat_asks_reuse_the_same_session() {
        let (binder, _store, provider) = binder_with_fakes();
        let caller = UserId::new();

        let reply = binder.ask("And how do I improve it?", None, caller).await.unwrap();
        let again = binder
            .ask("More detail please", Some(reply.conversation_id), caller)
            .await
            .unwrap();

        assert_eq!(again.conversation_id, reply.conversation_id);
        assert_eq!(provider.created.load(Ordering::SeqCst), 1);
        // The second answer came from the same session's accumulated state.
        assert_eq!(again.text, "answer #2");
    }

    #[tokio::test]
    async fn racing_first_asks_bind_exactly_one_session() {
        let (binder, _store, provider) = binder_with_fakes();
        let caller = UserId::new();
        let reply = binder.ask("seed", None, caller).await.unwrap();
        let id = reply.conversation_id;

        // Drop the seeded session so the race targets a cold id.
        binder.sessions.clear();
        provider.created.store(0, Ordering::SeqCst);

        let mut handles = Vec::new();
        for i in 0..16 {
            let binder = Arc::clone(&binder);
            handles.push(tokio::spawn(async move {
                binder.ask(&format!("q{i}"), Some(id), caller).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(provider.created.load(Ordering::SeqCst), 1);
        assert_eq!(binder.session_count(), 1);
    }
}
