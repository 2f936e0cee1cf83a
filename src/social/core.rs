//! 社交核心门面
//!
//! 把四个子服务装配在同一个连接池上，对外暴露路由层需要的全部操作。
//! 当前用户身份和当前时间由调用方显式传入，核心不读任何全局会话状态。

use crate::social::db::create_sqlite_pool_with_migration;
use crate::social::error::SocialResult;
use crate::social::friend::{FriendEdge, FriendGraphService};
use crate::social::message::{Message, MessageStore};
use crate::social::notification::{Notification, NotificationDispatcher};
use crate::social::presence::{PresenceStatus, PresenceTracker};
use crate::social::user::{User, UserDao, UserSetting};
use anyhow::Result;
use sqlx::{Pool, Sqlite};

/// 社交核心：好友关系、私信、通知、在线状态
#[derive(Clone)]
pub struct SocialCore {
    users: UserDao,
    friends: FriendGraphService,
    messages: MessageStore,
    notifications: NotificationDispatcher,
    presence: PresenceTracker,
}

impl SocialCore {
    /// 连接数据库并执行迁移后装配核心
    ///
    /// `db_url` 形如 `sqlite://social.db?mode=rwc`。
    pub async fn connect(db_url: &str) -> Result<Self> {
        let pool = create_sqlite_pool_with_migration(db_url).await?;
        Ok(Self::with_pool(pool))
    }

    /// 在已有连接池上装配核心（供测试或外部共享池使用）
    pub fn with_pool(pool: Pool<Sqlite>) -> Self {
        Self {
            users: UserDao::new(pool.clone()),
            friends: FriendGraphService::new(pool.clone()),
            messages: MessageStore::new(pool.clone()),
            notifications: NotificationDispatcher::new(pool.clone()),
            presence: PresenceTracker::new(pool),
        }
    }

    // ---- 用户维护（CLI / 测试用最小入口，档案本体归外部模块） ----

    /// 插入或更新一个用户
    pub async fn upsert_user(
        &self,
        nickname: &str,
        can_message: bool,
        notify: bool,
    ) -> SocialResult<()> {
        Ok(self.users.upsert_user(nickname, can_message, notify).await?)
    }

    /// 修改一项用户设置（封闭枚举）
    pub async fn set_setting(&self, nickname: &str, setting: UserSetting) -> SocialResult<bool> {
        Ok(self.users.set_setting(nickname, setting).await? > 0)
    }

    /// 读取用户字段子集
    pub async fn get_user(&self, nickname: &str) -> SocialResult<Option<User>> {
        Ok(self.users.get_user(nickname).await?)
    }

    // ---- 好友关系 ----

    pub async fn request_friend(&self, requester: &str, target: &str, now: i64) -> SocialResult<()> {
        self.friends.request_friend(requester, target, now).await
    }

    pub async fn respond_friend(
        &self,
        responder: &str,
        requester: &str,
        accept: bool,
    ) -> SocialResult<()> {
        self.friends.respond(responder, requester, accept).await
    }

    pub async fn list_friends(&self, user: &str) -> SocialResult<Vec<String>> {
        self.friends.list_friends(user).await
    }

    pub async fn list_pending_requests(&self, responder: &str) -> SocialResult<Vec<FriendEdge>> {
        self.friends.list_pending(responder).await
    }

    pub async fn are_friends(&self, a: &str, b: &str) -> SocialResult<bool> {
        self.friends.are_friends(a, b).await
    }

    // ---- 私信 ----

    pub async fn send_message(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
        now: i64,
    ) -> SocialResult<Message> {
        self.messages.send(sender, recipient, content, now).await
    }

    /// 查看会话，顺带把 viewer 收到的消息标记为已读
    pub async fn list_conversation(&self, viewer: &str, other: &str) -> SocialResult<Vec<Message>> {
        self.messages.list_conversation(viewer, other).await
    }

    pub async fn edit_message(
        &self,
        message_id: i64,
        requester: &str,
        new_text: &str,
    ) -> SocialResult<()> {
        self.messages.edit(message_id, requester, new_text).await
    }

    pub async fn delete_message(&self, message_id: i64, requester: &str) -> SocialResult<()> {
        self.messages.delete(message_id, requester).await
    }

    pub async fn clear_conversation(
        &self,
        viewer: &str,
        other: &str,
    ) -> SocialResult<u64> {
        self.messages.clear_conversation(viewer, other, viewer).await
    }

    // ---- 通知 ----

    /// 内部事件入口：为 owner 创建一条通知（偏好门控在分发器里）
    pub async fn notify(
        &self,
        owner: &str,
        content: &str,
        url: &str,
        now: i64,
    ) -> SocialResult<bool> {
        self.notifications.notify(owner, content, url, now).await
    }

    /// 通知收件箱，作为读取的副作用整体标记已读
    pub async fn list_notifications(&self, owner: &str) -> SocialResult<Vec<Notification>> {
        self.notifications.list_all(owner).await
    }

    pub async fn list_unread_notifications(&self, owner: &str) -> SocialResult<Vec<Notification>> {
        self.notifications.list_unread(owner).await
    }

    pub async fn clear_notifications(&self, owner: &str) -> SocialResult<u64> {
        self.notifications.clear_all(owner).await
    }

    pub async fn count_unread_notifications(&self, owner: &str) -> SocialResult<i64> {
        self.notifications.count_unread(owner).await
    }

    // ---- 在线状态 ----

    /// 路由层在分发任何已认证请求前调用
    pub async fn touch_presence(&self, user: &str, now: i64) -> SocialResult<()> {
        self.presence.touch(user, now).await
    }

    pub async fn get_presence(&self, user: &str, now: i64) -> SocialResult<PresenceStatus> {
        self.presence.status(user, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::db::create_memory_pool;
    use crate::social::error::SocialError;

    async fn memory_core() -> SocialCore {
        let pool = create_memory_pool().await.expect("创建内存数据库失败");
        SocialCore::with_pool(pool)
    }

    /// 完整业务走查：请求、通知、接受、发送、查看、编辑、越权改删
    #[tokio::test]
    async fn test_full_walkthrough() {
        let core = memory_core().await;
        core.upsert_user("alice", true, true).await.unwrap();
        core.upsert_user("bob", true, true).await.unwrap();

        // alice 请求 bob，bob 收到通知
        core.request_friend("alice", "bob", 1_000).await.unwrap();
        assert_eq!(core.count_unread_notifications("bob").await.unwrap(), 1);

        // bob 接受，双方成为好友
        core.respond_friend("bob", "alice", true).await.unwrap();
        assert!(core.are_friends("alice", "bob").await.unwrap());

        // alice 发消息，未读落库且 bob 再收到一条通知
        let msg = core.send_message("alice", "bob", "Hi", 2_000).await.unwrap();
        assert!(msg.unread);
        assert_eq!(core.count_unread_notifications("bob").await.unwrap(), 2);

        // bob 打开会话后消息变为已读
        let conv = core.list_conversation("bob", "alice").await.unwrap();
        assert_eq!(conv.len(), 1);
        assert!(!conv[0].unread);

        // alice 编辑，edited 置位
        core.edit_message(msg.id, "alice", "Hi there").await.unwrap();
        let conv = core.list_conversation("bob", "alice").await.unwrap();
        assert_eq!(conv[0].content, "Hi there");
        assert!(conv[0].edited);

        // bob 不能改删 alice 的消息
        assert!(matches!(
            core.edit_message(msg.id, "bob", "x").await,
            Err(SocialError::Forbidden)
        ));
        assert!(matches!(
            core.delete_message(msg.id, "bob").await,
            Err(SocialError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_clear_conversation_then_empty() {
        let core = memory_core().await;
        core.upsert_user("alice", true, true).await.unwrap();
        core.upsert_user("bob", true, true).await.unwrap();
        core.request_friend("alice", "bob", 1_000).await.unwrap();
        core.respond_friend("bob", "alice", true).await.unwrap();
        core.send_message("alice", "bob", "一", 2_000).await.unwrap();
        core.send_message("bob", "alice", "二", 3_000).await.unwrap();

        assert_eq!(core.clear_conversation("alice", "bob").await.unwrap(), 2);
        assert!(core.list_conversation("alice", "bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_typed_setting_setter() {
        let core = memory_core().await;
        core.upsert_user("alice", true, true).await.unwrap();

        assert!(core
            .set_setting("alice", UserSetting::Notify(false))
            .await
            .unwrap());
        core.notify("alice", "x", "/", 1_000).await.unwrap();
        assert_eq!(core.count_unread_notifications("alice").await.unwrap(), 0);

        assert!(core
            .set_setting("alice", UserSetting::CanMessage(false))
            .await
            .unwrap());
        let user = core.get_user("alice").await.unwrap().unwrap();
        assert!(!user.can_message);
        assert!(!user.notify);

        // 不存在的用户返回 false
        assert!(!core
            .set_setting("ghost", UserSetting::Notify(true))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_presence_through_facade() {
        let core = memory_core().await;
        core.upsert_user("alice", true, true).await.unwrap();
        let now = 60 * 60_000;
        core.touch_presence("alice", now - 2 * 60_000).await.unwrap();
        let status = core.get_presence("alice", now).await.unwrap();
        assert!(status.online);
        assert_eq!(status.minutes_ago, Some(2));
    }
}
