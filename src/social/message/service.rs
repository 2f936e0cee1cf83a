//! 私信服务层
//!
//! 发送前的授权链：必须是 accepted 好友，且收件人没有关闭私信。
//! 「插入消息 + 创建通知」在同一个事务里提交，不允许出现
//! 已送达但未通知的半状态。

use crate::social::error::{SocialError, SocialResult};
use crate::social::friend::FriendGraphService;
use crate::social::message::dao::MessageDao;
use crate::social::message::models::{Message, MAX_MESSAGE_CHARS};
use crate::social::notification::NotificationDispatcher;
use crate::social::user::UserDao;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// 私信存储服务
#[derive(Clone)]
pub struct MessageStore {
    pool: Pool<Sqlite>,
    dao: MessageDao,
    friends: FriendGraphService,
    users: UserDao,
    notifier: NotificationDispatcher,
}

impl MessageStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            dao: MessageDao::new(pool.clone()),
            friends: FriendGraphService::new(pool.clone()),
            users: UserDao::new(pool.clone()),
            notifier: NotificationDispatcher::new(pool.clone()),
            pool,
        }
    }

    /// 校验消息文本：去首尾空白，拒绝空串和超长
    fn validate_text(content: &str) -> SocialResult<&str> {
        let text = content.trim();
        if text.is_empty() {
            return Err(SocialError::EmptyInput);
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(SocialError::TextTooLong);
        }
        Ok(text)
    }

    /// 发送一条私信
    ///
    /// 前置条件：双方是 accepted 好友、收件人允许私信、文本合法。
    /// 任一条件不满足时不写入任何状态。成功时消息和给收件人的
    /// 通知在同一个事务里落库。
    pub async fn send(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
        now: i64,
    ) -> SocialResult<Message> {
        let text = Self::validate_text(content)?;

        if !self.friends.are_friends(sender, recipient).await? {
            return Err(SocialError::Forbidden);
        }
        let prefs = self
            .users
            .get_prefs(recipient)
            .await?
            .ok_or(SocialError::Forbidden)?;
        if !prefs.can_message {
            return Err(SocialError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        let id = MessageDao::insert_on(&mut tx, sender, recipient, text, now).await?;
        self.notifier
            .notify_on(
                &mut tx,
                recipient,
                &format!("{} 给你发来了私信", sender),
                &format!("/messages/{}", sender),
                now,
            )
            .await?;
        tx.commit().await?;

        info!("[MsgStore] {} -> {} 发送消息 #{}", sender, recipient, id);
        Ok(Message {
            id,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            content: text.to_string(),
            sent_at: now,
            unread: true,
            edited: false,
        })
    }

    /// 查看与 other 的会话（按发送时间升序），顺带把 viewer
    /// 收到的消息标记为已读；重复查看是无操作
    pub async fn list_conversation(
        &self,
        viewer: &str,
        other: &str,
    ) -> SocialResult<Vec<Message>> {
        Ok(self.dao.list_conversation_marking_read(viewer, other).await?)
    }

    /// 编辑一条消息；只有原发送者可以编辑，编辑后 edited 恒为 true
    pub async fn edit(
        &self,
        message_id: i64,
        requester: &str,
        new_text: &str,
    ) -> SocialResult<()> {
        let text = Self::validate_text(new_text)?;

        let msg = self
            .dao
            .get_by_id(message_id)
            .await?
            .ok_or(SocialError::NotFound)?;
        if msg.sender != requester {
            return Err(SocialError::Forbidden);
        }

        if self.dao.update_content(message_id, requester, text).await? == 0 {
            // 读取和更新之间消息被并发删除
            return Err(SocialError::NotFound);
        }
        info!("[MsgStore] {} 编辑消息 #{}", requester, message_id);
        Ok(())
    }

    /// 删除一条消息；只有原发送者可以删除，收件人没有单边删除
    pub async fn delete(&self, message_id: i64, requester: &str) -> SocialResult<()> {
        let msg = self
            .dao
            .get_by_id(message_id)
            .await?
            .ok_or(SocialError::NotFound)?;
        if msg.sender != requester {
            return Err(SocialError::Forbidden);
        }

        if self.dao.delete_by_id(message_id, requester).await? == 0 {
            return Err(SocialError::NotFound);
        }
        info!("[MsgStore] {} 删除消息 #{}", requester, message_id);
        Ok(())
    }

    /// 清空一对用户的全部会话历史（不可恢复）
    ///
    /// 只有会话双方可以发起。
    pub async fn clear_conversation(
        &self,
        a: &str,
        b: &str,
        requester: &str,
    ) -> SocialResult<u64> {
        if requester != a && requester != b {
            return Err(SocialError::Forbidden);
        }
        let removed = self.dao.clear_pair(a, b).await?;
        info!(
            "[MsgStore] {} 清空了与对方的会话，共删除 {} 条",
            requester, removed
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::db::create_memory_pool;

    /// 建好 alice/bob 好友关系的测试环境
    async fn setup() -> (MessageStore, FriendGraphService, NotificationDispatcher) {
        let pool = create_memory_pool().await.expect("创建内存数据库失败");
        let users = UserDao::new(pool.clone());
        users.upsert_user("alice", true, true).await.unwrap();
        users.upsert_user("bob", true, true).await.unwrap();
        users.upsert_user("dave", false, true).await.unwrap();
        users.upsert_user("eve", true, true).await.unwrap();

        let friends = FriendGraphService::new(pool.clone());
        friends.request_friend("alice", "bob", 1_000).await.unwrap();
        friends.respond("bob", "alice", true).await.unwrap();

        let notifier = NotificationDispatcher::new(pool.clone());
        // 清掉建立好友关系产生的通知，隔离各用例的断言
        notifier.clear_all("bob").await.unwrap();

        (MessageStore::new(pool), friends, notifier)
    }

    #[tokio::test]
    async fn test_send_requires_friendship() {
        let (store, _, notifier) = setup().await;
        // alice 和 eve 不是好友
        assert!(matches!(
            store.send("alice", "eve", "hi", 2_000).await,
            Err(SocialError::Forbidden)
        ));
        // 失败时不写任何状态
        assert!(store.list_conversation("eve", "alice").await.unwrap().is_empty());
        assert_eq!(notifier.count_unread("eve").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_send_requires_recipient_can_message() {
        let (store, friends, _) = setup().await;
        friends.request_friend("alice", "dave", 2_000).await.unwrap();
        friends.respond("dave", "alice", true).await.unwrap();
        // dave 关闭了私信
        assert!(matches!(
            store.send("alice", "dave", "hi", 3_000).await,
            Err(SocialError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_send_validates_text() {
        let (store, _, _) = setup().await;
        assert!(matches!(
            store.send("alice", "bob", "   \n ", 2_000).await,
            Err(SocialError::EmptyInput)
        ));
        let long = "很".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            store.send("alice", "bob", &long, 2_000).await,
            Err(SocialError::TextTooLong)
        ));
        // 上限本身可以发送；存储的是去掉首尾空白的文本
        let exact = "a".repeat(MAX_MESSAGE_CHARS);
        store.send("alice", "bob", &format!("  {}  ", exact), 2_000).await.unwrap();
        let conv = store.list_conversation("bob", "alice").await.unwrap();
        assert_eq!(conv[0].content, exact);
    }

    #[tokio::test]
    async fn test_send_creates_unread_message_and_notification() {
        let (store, _, notifier) = setup().await;
        let msg = store.send("alice", "bob", "你好", 2_000).await.unwrap();
        assert!(msg.unread);
        assert!(!msg.edited);

        // 发件人视角查看：bob 的消息不受影响，仍是未读
        let from_alice = store.list_conversation("alice", "bob").await.unwrap();
        assert!(from_alice[0].unread);

        let unread = notifier.list_unread("bob").await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].url, "/messages/alice");
    }

    #[tokio::test]
    async fn test_list_conversation_marks_viewer_side_read() {
        let (store, _, _) = setup().await;
        store.send("alice", "bob", "一", 2_000).await.unwrap();
        store.send("bob", "alice", "二", 3_000).await.unwrap();
        store.send("alice", "bob", "三", 4_000).await.unwrap();

        let seen = store.list_conversation("bob", "alice").await.unwrap();
        assert_eq!(
            seen.iter().map(|m| m.content.as_str()).collect::<Vec<_>>(),
            vec!["一", "二", "三"]
        );
        // bob 收到的已读，alice 收到的不受影响
        let after = store.list_conversation("bob", "alice").await.unwrap();
        for m in &after {
            if m.recipient == "bob" {
                assert!(!m.unread);
            } else {
                assert!(m.unread);
            }
        }
    }

    #[tokio::test]
    async fn test_edit_only_by_sender_and_sticky_flag() {
        let (store, _, _) = setup().await;
        let msg = store.send("alice", "bob", "你好", 2_000).await.unwrap();

        assert!(matches!(
            store.edit(msg.id, "bob", "篡改").await,
            Err(SocialError::Forbidden)
        ));
        // 内容未被改动
        let conv = store.list_conversation("bob", "alice").await.unwrap();
        assert_eq!(conv[0].content, "你好");
        assert!(!conv[0].edited);

        store.edit(msg.id, "alice", "你好呀").await.unwrap();
        let conv = store.list_conversation("bob", "alice").await.unwrap();
        assert_eq!(conv[0].content, "你好呀");
        assert!(conv[0].edited);

        // 再次编辑后 edited 保持 true
        store.edit(msg.id, "alice", "第三版").await.unwrap();
        let conv = store.list_conversation("bob", "alice").await.unwrap();
        assert!(conv[0].edited);

        assert!(matches!(
            store.edit(9999, "alice", "x").await,
            Err(SocialError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_only_by_sender() {
        let (store, _, _) = setup().await;
        let msg = store.send("alice", "bob", "你好", 2_000).await.unwrap();

        assert!(matches!(
            store.delete(msg.id, "bob").await,
            Err(SocialError::Forbidden)
        ));
        store.delete(msg.id, "alice").await.unwrap();
        assert!(store.list_conversation("bob", "alice").await.unwrap().is_empty());
        assert!(matches!(
            store.delete(msg.id, "alice").await,
            Err(SocialError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_clear_conversation_by_participant_only() {
        let (store, _, _) = setup().await;
        store.send("alice", "bob", "一", 2_000).await.unwrap();
        store.send("bob", "alice", "二", 3_000).await.unwrap();

        assert!(matches!(
            store.clear_conversation("alice", "bob", "eve").await,
            Err(SocialError::Forbidden)
        ));
        // 双方任意一方都可以清空
        assert_eq!(store.clear_conversation("alice", "bob", "bob").await.unwrap(), 2);
        assert!(store.list_conversation("alice", "bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_timestamp_keeps_insert_order() {
        let (store, _, _) = setup().await;
        store.send("alice", "bob", "先", 2_000).await.unwrap();
        store.send("alice", "bob", "后", 2_000).await.unwrap();
        let conv = store.list_conversation("bob", "alice").await.unwrap();
        assert_eq!(
            conv.iter().map(|m| m.content.as_str()).collect::<Vec<_>>(),
            vec!["先", "后"]
        );
    }
}
