//! 好友边数据访问层（DAO）
//!
//! 插入时写入规范化的 (pair_low, pair_high)，唯一索引保证
//! 同一对用户任意方向只能存在一条边，并发互发请求由索引裁决。

use crate::social::friend::models::{EdgeStatus, FriendEdge};
use crate::social::pair::canonical_pair;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// 好友边 DAO（基于 sqlx）
#[derive(Clone)]
pub struct FriendDao {
    pool: Pool<Sqlite>,
}

impl FriendDao {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// 插入一条 pending 边；无序对已有边时返回唯一约束冲突
    pub async fn insert_pending(
        &self,
        requester: &str,
        responder: &str,
        now: i64,
    ) -> Result<(), sqlx::Error> {
        let (low, high) = canonical_pair(requester, responder);
        sqlx::query(
            r#"
            INSERT INTO friend_edges (
                requester, responder, status, create_time, pair_low, pair_high
            ) VALUES (?, ?, 'pending', ?, ?, ?)
            "#,
        )
        .bind(requester)
        .bind(responder)
        .bind(now)
        .bind(low)
        .bind(high)
        .execute(&self.pool)
        .await?;
        debug!("[FriendDAO] 新增 pending 边: {} -> {}", requester, responder);
        Ok(())
    }

    /// 把 pending 边置为 accepted；返回受影响行数（0 表示边不存在或已非 pending）
    pub async fn accept(&self, requester: &str, responder: &str) -> Result<u64, sqlx::Error> {
        let res = sqlx::query(
            r#"
            UPDATE friend_edges SET status = 'accepted'
            WHERE requester = ? AND responder = ? AND status = 'pending'
            "#,
        )
        .bind(requester)
        .bind(responder)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    /// 删除 pending 边（拒绝请求）；返回受影响行数
    pub async fn delete_pending(
        &self,
        requester: &str,
        responder: &str,
    ) -> Result<u64, sqlx::Error> {
        let res = sqlx::query(
            r#"
            DELETE FROM friend_edges
            WHERE requester = ? AND responder = ? AND status = 'pending'
            "#,
        )
        .bind(requester)
        .bind(responder)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    /// 两人之间是否存在 accepted 边（任意方向）
    pub async fn accepted_exists(&self, a: &str, b: &str) -> Result<bool, sqlx::Error> {
        let (low, high) = canonical_pair(a, b);
        let row = sqlx::query(
            r#"
            SELECT 1 FROM friend_edges
            WHERE pair_low = ? AND pair_high = ? AND status = 'accepted'
            "#,
        )
        .bind(low)
        .bind(high)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    /// 与 user 相连的全部 accepted 边对端昵称，按昵称排序
    pub async fn list_accepted(&self, user: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT CASE WHEN requester = ? THEN responder ELSE requester END AS friend
            FROM friend_edges
            WHERE (requester = ? OR responder = ?) AND status = 'accepted'
            ORDER BY friend
            "#,
        )
        .bind(user)
        .bind(user)
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|m| m.get("friend")).collect())
    }

    /// 发给 responder 的全部 pending 请求（收件箱视角），最新的在前
    pub async fn list_pending_for(&self, responder: &str) -> Result<Vec<FriendEdge>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT requester, responder, status, create_time
            FROM friend_edges
            WHERE responder = ? AND status = 'pending'
            ORDER BY create_time DESC
            "#,
        )
        .bind(responder)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|m| FriendEdge {
                requester: m.get("requester"),
                responder: m.get("responder"),
                status: EdgeStatus::from_str_or_pending(m.get("status")),
                create_time: m.get("create_time"),
            })
            .collect())
    }
}
