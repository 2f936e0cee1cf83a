//! 通知数据访问层（DAO）
//!
//! 创建门控是一条 INSERT ... SELECT：只有 owner 的 notify 偏好打开时才落行，
//! 偏好检查和插入在同一条语句里，不给调用方留下「忘了检查」的空间。

use crate::social::notification::models::Notification;
use sqlx::{Pool, Row, Sqlite, SqliteConnection};

/// 通知 DAO（基于 sqlx）
#[derive(Clone)]
pub struct NotificationDao {
    pool: Pool<Sqlite>,
}

impl NotificationDao {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn placeholders(n: usize) -> String {
        if n == 0 {
            String::new()
        } else {
            vec!["?"; n].join(",")
        }
    }

    /// 在给定连接上插入一条通知，仅当 owner 的 notify 偏好为真
    ///
    /// 返回实际插入的行数（0 表示被偏好门控拦下）。消息发送的
    /// 「插入 + 通知」事务会在事务连接上调用这个方法。
    pub async fn insert_gated(
        conn: &mut SqliteConnection,
        owner: &str,
        content: &str,
        url: &str,
        now: i64,
    ) -> Result<u64, sqlx::Error> {
        let res = sqlx::query(
            r#"
            INSERT INTO notifications (owner, content, url, create_time, is_read)
            SELECT ?, ?, ?, ?, 0
            WHERE EXISTS (
                SELECT 1 FROM users WHERE nickname = ? AND notify = 1
            )
            "#,
        )
        .bind(owner)
        .bind(content)
        .bind(url)
        .bind(now)
        .bind(owner)
        .execute(conn)
        .await?;
        Ok(res.rows_affected())
    }

    /// owner 的未读通知，最新的在前
    pub async fn list_unread(&self, owner: &str) -> Result<Vec<Notification>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner, content, url, create_time, is_read
            FROM notifications
            WHERE owner = ? AND is_read = 0
            ORDER BY create_time DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Self::row_to_notification).collect())
    }

    /// owner 的全部通知，最新的在前；读取的同一事务里把取到的行标记为已读
    ///
    /// 按明确的 id 列表更新：快照之后并发插入的新通知保持未读。
    /// 返回值保留读取时刻的 read 状态，方便展示层高亮新通知。
    pub async fn list_all_marking_read(
        &self,
        owner: &str,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, owner, content, url, create_time, is_read
            FROM notifications
            WHERE owner = ?
            ORDER BY create_time DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&mut *tx)
        .await?;

        let notifications: Vec<Notification> =
            rows.into_iter().map(Self::row_to_notification).collect();

        let unread_ids: Vec<i64> = notifications
            .iter()
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();
        if !unread_ids.is_empty() {
            let sql = format!(
                "UPDATE notifications SET is_read = 1 WHERE id IN ({})",
                Self::placeholders(unread_ids.len())
            );
            let mut query = sqlx::query(&sql);
            for id in &unread_ids {
                query = query.bind(id);
            }
            query.execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(notifications)
    }

    /// 删除 owner 的全部通知
    pub async fn clear_all(&self, owner: &str) -> Result<u64, sqlx::Error> {
        let res = sqlx::query("DELETE FROM notifications WHERE owner = ?")
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    /// owner 的未读数，用于角标展示
    pub async fn count_unread(&self, owner: &str) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS unread_count FROM notifications WHERE owner = ? AND is_read = 0",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("unread_count"))
    }

    fn row_to_notification(row: sqlx::sqlite::SqliteRow) -> Notification {
        Notification {
            id: row.get("id"),
            owner: row.get("owner"),
            content: row.get("content"),
            url: row.get("url"),
            create_time: row.get("create_time"),
            read: row.get::<i64, _>("is_read") != 0,
        }
    }
}
