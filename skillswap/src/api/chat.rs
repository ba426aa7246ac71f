//! Direct chat API.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::{last_read_path, messages_path, CHATS};
use crate::{
    client::ClientInner,
    error::{Error, Result},
    models::{Conversation, ConversationId, LastRead, Message, UserId},
    store::{server_timestamp, DocumentStoreExt, Query, Watch},
};

/// API for two-party conversations.
pub struct ChatApi {
    client: Arc<ClientInner>,
}

impl ChatApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Conversation id between the signed-in user and `peer`.
    pub fn conversation_id(&self, peer: impl Into<UserId>) -> Result<ConversationId> {
        let auth = self.client.require_auth()?;
        let peer = checked_peer(&auth.uid, peer.into())?;
        Ok(ConversationId::between(&auth.uid, &peer))
    }

    /// Open a live session with `peer`.
    pub async fn open(&self, peer: impl Into<UserId>) -> Result<ChatSession> {
        let auth = self.client.require_auth()?;
        let peer = checked_peer(&auth.uid, peer.into())?;
        let id = ConversationId::between(&auth.uid, &peer);

        let subscription = self.client.store.watch(messages_query(&id)).await?;
        log::debug!("opened chat {}", id);

        Ok(ChatSession {
            client: self.client.clone(),
            id,
            me: auth.uid,
            peer,
            skill: None,
            watch: Watch::new(subscription),
        })
    }

    /// Send one message to `peer` without keeping a session open.
    ///
    /// Blank text is ignored and yields `Ok(None)`.
    pub async fn send(&self, peer: impl Into<UserId>, text: &str) -> Result<Option<String>> {
        let auth = self.client.require_auth()?;
        let peer = checked_peer(&auth.uid, peer.into())?;
        let id = ConversationId::between(&auth.uid, &peer);
        send_message(&self.client, &id, &auth.uid, &peer, None, text).await
    }

    /// Messages of a conversation, oldest first.
    pub async fn history(&self, id: &ConversationId) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> =
            self.client.store.query_as(&messages_query(id)).await?;
        sort_messages(&mut messages);
        Ok(messages)
    }

    /// The conversation document.
    pub async fn conversation(&self, id: &ConversationId) -> Result<Conversation> {
        self.client
            .store
            .get_as(CHATS, id.as_str())
            .await?
            .ok_or_else(|| Error::not_found("Conversation", id.as_str()))
    }

    /// Last-read watermark of `user`, if any.
    pub async fn last_read(&self, id: &ConversationId, user: &UserId) -> Result<Option<i64>> {
        let marker: Option<LastRead> = self
            .client
            .store
            .get_as(&last_read_path(id), user.as_str())
            .await?;
        Ok(marker.map(|m| m.timestamp))
    }

    /// Advance `reader`'s watermark to the newest of `messages`.
    pub async fn mark_read(
        &self,
        id: &ConversationId,
        reader: &UserId,
        messages: &[Message],
    ) -> Result<Option<i64>> {
        mark_read(&self.client, id, reader, messages).await
    }

    /// Messages from `peer` newer than the signed-in user's watermark.
    pub async fn unread_count(&self, peer: impl Into<UserId>) -> Result<usize> {
        let auth = self.client.require_auth()?;
        let peer = checked_peer(&auth.uid, peer.into())?;
        let id = ConversationId::between(&auth.uid, &peer);

        let watermark = self.last_read(&id, &auth.uid).await?.unwrap_or(0);
        let messages = self.history(&id).await?;
        Ok(messages
            .iter()
            .filter(|m| m.timestamp > watermark && !m.is_from(&auth.uid))
            .count())
    }
}

/// A live conversation between the signed-in user and one peer.
///
/// Every [`next`](ChatSession::next) yields the complete message list,
/// ordered by timestamp. The subscription is released by
/// [`close`](ChatSession::close) or on drop.
pub struct ChatSession {
    client: Arc<ClientInner>,
    id: ConversationId,
    me: UserId,
    peer: UserId,
    skill: Option<String>,
    watch: Watch<Message>,
}

impl ChatSession {
    /// Record the skill this conversation starts from.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn peer(&self) -> &UserId {
        &self.peer
    }

    /// Wait for the next full message list.
    ///
    /// A non-empty list also advances the user's last-read watermark; a
    /// failure to do so is logged and the list is still returned.
    pub async fn next(&mut self) -> Option<Result<Vec<Message>>> {
        let mut messages = match self.watch.next().await? {
            Ok(messages) => messages,
            Err(e) => return Some(Err(e)),
        };
        sort_messages(&mut messages);

        if let Err(e) = mark_read(&self.client, &self.id, &self.me, &messages).await {
            log::warn!("failed to mark {} read: {}", self.id, e);
        }
        Some(Ok(messages))
    }

    /// Send a message. Blank text is ignored and yields `Ok(None)`.
    pub async fn send(&self, text: &str) -> Result<Option<String>> {
        send_message(
            &self.client,
            &self.id,
            &self.me,
            &self.peer,
            self.skill.as_deref(),
            text,
        )
        .await
    }

    /// Stop receiving updates. Safe to call more than once.
    pub fn close(&mut self) {
        self.watch.cancel();
    }

    pub fn is_open(&self) -> bool {
        self.watch.is_active()
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .field("open", &self.is_open())
            .finish()
    }
}

fn checked_peer(me: &UserId, peer: UserId) -> Result<UserId> {
    if peer.is_empty() {
        return Err(Error::InvalidArgument("peer user id is empty".into()));
    }
    if &peer == me {
        return Err(Error::InvalidArgument("cannot chat with yourself".into()));
    }
    Ok(peer)
}

fn messages_query(id: &ConversationId) -> Query {
    Query::collection(messages_path(id)).order_by("timestamp")
}

fn sort_messages(messages: &mut [Message]) {
    messages.sort_by_key(|m| m.timestamp);
}

async fn send_message(
    client: &ClientInner,
    id: &ConversationId,
    sender: &UserId,
    peer: &UserId,
    skill: Option<&str>,
    text: &str,
) -> Result<Option<String>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    if client.store.get(CHATS, id.as_str()).await?.is_none() {
        let mut fields = Map::new();
        fields.insert("participants".into(), json!([sender, peer]));
        if let Some(skill) = skill {
            fields.insert("skill".into(), Value::String(skill.to_owned()));
        }
        client
            .store
            .set(CHATS, id.as_str(), Value::Object(fields), true)
            .await?;
        log::debug!("created conversation {}", id);
    }

    let message = json!({
        "sender": sender,
        "text": text,
        "timestamp": server_timestamp(),
    });
    let message_id = client.store.insert(&messages_path(id), message).await?;
    Ok(Some(message_id))
}

async fn mark_read(
    client: &ClientInner,
    id: &ConversationId,
    reader: &UserId,
    messages: &[Message],
) -> Result<Option<i64>> {
    let Some(last) = messages.last() else {
        return Ok(None);
    };

    client
        .store
        .set(
            &last_read_path(id),
            reader.as_str(),
            json!({ "timestamp": last.timestamp }),
            true,
        )
        .await?;
    Ok(Some(last.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{AuthInfo, SkillSwapClient},
        store::{DocumentStore, MemoryStore},
    };
    use pretty_assertions::assert_eq;

    fn client(store: &MemoryStore, uid: &str) -> SkillSwapClient {
        SkillSwapClient::builder()
            .store(Arc::new(store.clone()))
            .with_auth(AuthInfo::new("token", uid))
            .build()
            .unwrap()
    }

    fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_conversation_id_is_symmetric() {
        let store = MemoryStore::new();
        let a = client(&store, "zoe").chats().conversation_id("amir").unwrap();
        let b = client(&store, "amir").chats().conversation_id("zoe").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "amir_zoe");
    }

    #[tokio::test]
    async fn test_self_chat_rejected() {
        let store = MemoryStore::new();
        let err = client(&store, "zoe").chats().open("zoe").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_send_creates_conversation_once() {
        let store = MemoryStore::new();
        let chats = client(&store, "zoe").chats();

        assert!(chats.send("amir", "hi").await.unwrap().is_some());
        assert!(chats.send("amir", "again").await.unwrap().is_some());
        assert_eq!(store.count(CHATS), 1);

        let id = chats.conversation_id("amir").unwrap();
        let conv = chats.conversation(&id).await.unwrap();
        assert!(conv.includes(&"zoe".into()));
        assert!(conv.includes(&"amir".into()));
        assert_eq!(texts(&chats.history(&id).await.unwrap()), vec!["hi", "again"]);
    }

    #[tokio::test]
    async fn test_blank_message_is_noop() {
        let store = MemoryStore::new();
        let chats = client(&store, "zoe").chats();
        assert_eq!(chats.send("amir", "   \n").await.unwrap(), None);
        assert_eq!(store.count(CHATS), 0);

        let id = chats.conversation_id("amir").unwrap();
        assert!(chats.conversation(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_session_orders_out_of_order_inserts() {
        let store = MemoryStore::new();
        let client = client(&store, "zoe");
        let id = client.chats().conversation_id("amir").unwrap();
        let path = messages_path(&id);
        for (text, ts) in [("third", 30), ("first", 10), ("second", 20)] {
            store
                .insert(&path, json!({"sender": "amir", "text": text, "timestamp": ts}))
                .await
                .unwrap();
        }

        let mut session = client.chats().open("amir").await.unwrap();
        let messages = session.next().await.unwrap().unwrap();
        assert_eq!(texts(&messages), vec!["first", "second", "third"]);
        assert_eq!(
            client.chats().last_read(&id, &"zoe".into()).await.unwrap(),
            Some(30)
        );
    }

    #[tokio::test]
    async fn test_own_message_marks_read() {
        let store = MemoryStore::new();
        let client = client(&store, "zoe");
        let mut session = client.chats().open("amir").await.unwrap().with_skill("Guitar");
        assert!(session.next().await.unwrap().unwrap().is_empty());

        session.send("hello").await.unwrap();
        let messages = session.next().await.unwrap().unwrap();
        assert_eq!(texts(&messages), vec!["hello"]);

        let id = session.id().clone();
        let watermark = client.chats().last_read(&id, &"zoe".into()).await.unwrap();
        assert_eq!(watermark, Some(messages[0].timestamp));
        assert_eq!(
            client.chats().conversation(&id).await.unwrap().skill.as_deref(),
            Some("Guitar")
        );
    }

    #[tokio::test]
    async fn test_unread_count() {
        let store = MemoryStore::new();
        let zoe = client(&store, "zoe");
        let amir = client(&store, "amir");

        amir.chats().send("zoe", "one").await.unwrap();
        amir.chats().send("zoe", "two").await.unwrap();
        zoe.chats().send("amir", "mine").await.unwrap();
        assert_eq!(zoe.chats().unread_count("amir").await.unwrap(), 2);

        let id = zoe.chats().conversation_id("amir").unwrap();
        let history = zoe.chats().history(&id).await.unwrap();
        zoe.chats()
            .mark_read(&id, &"zoe".into(), &history)
            .await
            .unwrap();
        assert_eq!(zoe.chats().unread_count("amir").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let store = MemoryStore::new();
        let mut session = client(&store, "zoe").chats().open("amir").await.unwrap();
        assert!(session.is_open());
        session.close();
        session.close();
        assert!(!session.is_open());
        assert!(session.next().await.is_none());
    }
}
