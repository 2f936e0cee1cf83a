//! 通知分发服务层
//!
//! 对外的创建入口只有 `notify`：偏好门控在 DAO 的单条语句里，
//! 这里负责连接管理、日志和结果语义。

use crate::social::error::SocialResult;
use crate::social::notification::dao::NotificationDao;
use crate::social::notification::models::Notification;
use sqlx::{Pool, Sqlite, SqliteConnection};
use tracing::{debug, info};

/// 通知分发器
#[derive(Clone)]
pub struct NotificationDispatcher {
    pool: Pool<Sqlite>,
    dao: NotificationDao,
}

impl NotificationDispatcher {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        let dao = NotificationDao::new(pool.clone());
        Self { pool, dao }
    }

    /// 为 owner 创建一条通知；owner 的 notify 偏好关闭时静默跳过
    ///
    /// 返回是否真正创建了记录。
    pub async fn notify(
        &self,
        owner: &str,
        content: &str,
        url: &str,
        now: i64,
    ) -> SocialResult<bool> {
        let mut conn = self.pool.acquire().await?;
        let created = self.notify_on(&mut conn, owner, content, url, now).await?;
        Ok(created)
    }

    /// 在调用方的连接（通常是事务）上创建通知
    ///
    /// 消息发送把「插入消息 + 创建通知」做成一个事务时走这个入口。
    pub async fn notify_on(
        &self,
        conn: &mut SqliteConnection,
        owner: &str,
        content: &str,
        url: &str,
        now: i64,
    ) -> SocialResult<bool> {
        let inserted = NotificationDao::insert_gated(conn, owner, content, url, now).await?;
        if inserted > 0 {
            info!("[Notify] 已为 {} 创建通知: {}", owner, content);
        } else {
            debug!("[Notify] {} 关闭了通知偏好，跳过", owner);
        }
        Ok(inserted > 0)
    }

    /// owner 的未读通知，最新的在前
    pub async fn list_unread(&self, owner: &str) -> SocialResult<Vec<Notification>> {
        Ok(self.dao.list_unread(owner).await?)
    }

    /// owner 的全部通知，最新的在前；作为读取的副作用整体标记已读
    pub async fn list_all(&self, owner: &str) -> SocialResult<Vec<Notification>> {
        let notifications = self.dao.list_all_marking_read(owner).await?;
        debug!(
            "[Notify] {} 查看通知列表，共 {} 条",
            owner,
            notifications.len()
        );
        Ok(notifications)
    }

    /// 清空 owner 的全部通知
    pub async fn clear_all(&self, owner: &str) -> SocialResult<u64> {
        let removed = self.dao.clear_all(owner).await?;
        info!("[Notify] {} 清空通知，共删除 {} 条", owner, removed);
        Ok(removed)
    }

    /// owner 的未读数（角标）
    pub async fn count_unread(&self, owner: &str) -> SocialResult<i64> {
        Ok(self.dao.count_unread(owner).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::db::create_memory_pool;
    use crate::social::user::UserDao;

    async fn setup() -> (NotificationDispatcher, UserDao) {
        let pool = create_memory_pool().await.expect("创建内存数据库失败");
        let users = UserDao::new(pool.clone());
        users.upsert_user("alice", true, true).await.unwrap();
        users.upsert_user("mute", true, false).await.unwrap();
        (NotificationDispatcher::new(pool), users)
    }

    #[tokio::test]
    async fn test_notify_respects_preference_gate() {
        let (dispatcher, _) = setup().await;

        assert!(dispatcher.notify("alice", "你有一条新消息", "/messages/bob", 1_000).await.unwrap());
        // notify=false 的用户不落行
        assert!(!dispatcher.notify("mute", "你有一条新消息", "/messages/bob", 1_000).await.unwrap());
        // 不存在的用户同样不落行
        assert!(!dispatcher.notify("ghost", "x", "/", 1_000).await.unwrap());

        assert_eq!(dispatcher.count_unread("alice").await.unwrap(), 1);
        assert_eq!(dispatcher.count_unread("mute").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_marks_read_once() {
        let (dispatcher, _) = setup().await;
        dispatcher.notify("alice", "第一条", "/a", 1_000).await.unwrap();
        dispatcher.notify("alice", "第二条", "/b", 2_000).await.unwrap();

        let all = dispatcher.list_all("alice").await.unwrap();
        assert_eq!(all.len(), 2);
        // 最新的在前
        assert_eq!(all[0].content, "第二条");
        // 返回的是读取时刻的快照状态
        assert!(all.iter().all(|n| !n.read));
        // 读取之后全部已读
        assert_eq!(dispatcher.count_unread("alice").await.unwrap(), 0);

        let again = dispatcher.list_all("alice").await.unwrap();
        assert!(again.iter().all(|n| n.read));
    }

    #[tokio::test]
    async fn test_list_unread_and_clear_all() {
        let (dispatcher, _) = setup().await;
        dispatcher.notify("alice", "一", "/1", 1_000).await.unwrap();
        dispatcher.notify("alice", "二", "/2", 2_000).await.unwrap();

        let unread = dispatcher.list_unread("alice").await.unwrap();
        assert_eq!(unread.len(), 2);
        // list_unread 不产生已读副作用
        assert_eq!(dispatcher.count_unread("alice").await.unwrap(), 2);

        assert_eq!(dispatcher.clear_all("alice").await.unwrap(), 2);
        assert!(dispatcher.list_unread("alice").await.unwrap().is_empty());
        assert_eq!(dispatcher.count_unread("alice").await.unwrap(), 0);
    }
}
