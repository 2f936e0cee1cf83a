//! 私信数据访问层（DAO）
//!
//! 会话键是规范化的无序对 (pair_low, pair_high)；展示顺序按
//! (sent_at, id) 升序，时间戳相同时用自增 id 保证严格有序。

use crate::social::message::models::Message;
use crate::social::pair::canonical_pair;
use sqlx::{Pool, Row, Sqlite, SqliteConnection};
use tracing::debug;

/// 私信 DAO（基于 sqlx）
#[derive(Clone)]
pub struct MessageDao {
    pool: Pool<Sqlite>,
}

impl MessageDao {
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

    /// 在给定连接（发送事务）上插入一条未读消息，返回新消息 id
    pub async fn insert_on(
        conn: &mut SqliteConnection,
        sender: &str,
        recipient: &str,
        content: &str,
        now: i64,
    ) -> Result<i64, sqlx::Error> {
        let (low, high) = canonical_pair(sender, recipient);
        let res = sqlx::query(
            r#"
            INSERT INTO messages (
                sender, recipient, content, sent_at, unread, edited, pair_low, pair_high
            ) VALUES (?, ?, ?, ?, 1, 0, ?, ?)
            "#,
        )
        .bind(sender)
        .bind(recipient)
        .bind(content)
        .bind(now)
        .bind(low)
        .bind(high)
        .execute(conn)
        .await?;
        Ok(res.last_insert_rowid())
    }

    /// 读取两人会话并把 viewer 收到的消息标记为已读
    ///
    /// 读取和标记在同一个事务里，标记按读取快照的 id 列表进行：
    /// 快照之后并发写入的新消息保持未读。重复查看是无操作。
    pub async fn list_conversation_marking_read(
        &self,
        viewer: &str,
        other: &str,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let (low, high) = canonical_pair(viewer, other);
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, sender, recipient, content, sent_at, unread, edited
            FROM messages
            WHERE pair_low = ? AND pair_high = ?
            ORDER BY sent_at ASC, id ASC
            "#,
        )
        .bind(low)
        .bind(high)
        .fetch_all(&mut *tx)
        .await?;

        let mut messages: Vec<Message> = rows.into_iter().map(Self::row_to_message).collect();

        let to_mark: Vec<i64> = messages
            .iter()
            .filter(|m| m.unread && m.recipient == viewer)
            .map(|m| m.id)
            .collect();
        if !to_mark.is_empty() {
            let sql = format!(
                "UPDATE messages SET unread = 0 WHERE id IN ({})",
                Self::placeholders(to_mark.len())
            );
            let mut query = sqlx::query(&sql);
            for id in &to_mark {
                query = query.bind(id);
            }
            query.execute(&mut *tx).await?;
            debug!(
                "[MsgDAO] {} 查看会话，标记 {} 条消息为已读",
                viewer,
                to_mark.len()
            );
        }

        tx.commit().await?;

        // 返回给查看者的内容反映「读过之后」的状态
        for m in messages.iter_mut() {
            if m.recipient == viewer {
                m.unread = false;
            }
        }
        Ok(messages)
    }

    /// 按 id 读取一条消息
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Message>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, sender, recipient, content, sent_at, unread, edited
            FROM messages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Self::row_to_message))
    }

    /// 改写消息内容并置 edited（WHERE 里校验发送者，返回受影响行数）
    pub async fn update_content(
        &self,
        id: i64,
        sender: &str,
        content: &str,
    ) -> Result<u64, sqlx::Error> {
        let res = sqlx::query(
            r#"
            UPDATE messages SET content = ?, edited = 1
            WHERE id = ? AND sender = ?
            "#,
        )
        .bind(content)
        .bind(id)
        .bind(sender)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    /// 删除一条消息（WHERE 里校验发送者，返回受影响行数）
    pub async fn delete_by_id(&self, id: i64, sender: &str) -> Result<u64, sqlx::Error> {
        let res = sqlx::query("DELETE FROM messages WHERE id = ? AND sender = ?")
            .bind(id)
            .bind(sender)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    /// 删除一对用户的全部会话历史，返回删除行数
    pub async fn clear_pair(&self, a: &str, b: &str) -> Result<u64, sqlx::Error> {
        let (low, high) = canonical_pair(a, b);
        let res = sqlx::query("DELETE FROM messages WHERE pair_low = ? AND pair_high = ?")
            .bind(low)
            .bind(high)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    fn row_to_message(row: sqlx::sqlite::SqliteRow) -> Message {
        Message {
            id: row.get("id"),
            sender: row.get("sender"),
            recipient: row.get("recipient"),
            content: row.get("content"),
            sent_at: row.get("sent_at"),
            unread: row.get::<i64, _>("unread") != 0,
            edited: row.get::<i64, _>("edited") != 0,
        }
    }
}
