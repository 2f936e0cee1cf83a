//! 用户数据访问层（DAO）
//!
//! 核心对用户表的读写：存在性检查、偏好读取、最后活跃时间写入。

use crate::social::user::models::{User, UserPrefs, UserSetting};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// 用户 DAO（基于 sqlx）
#[derive(Clone)]
pub struct UserDao {
    pool: Pool<Sqlite>,
}

impl UserDao {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// 插入或更新一个用户（last_seen 保持不变）
    pub async fn upsert_user(
        &self,
        nickname: &str,
        can_message: bool,
        notify: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (nickname, can_message, notify)
            VALUES (?, ?, ?)
            ON CONFLICT(nickname) DO UPDATE SET
                can_message = excluded.can_message,
                notify = excluded.notify
            "#,
        )
        .bind(nickname)
        .bind(if can_message { 1 } else { 0 })
        .bind(if notify { 1 } else { 0 })
        .execute(&self.pool)
        .await?;
        debug!("[UserDAO] upsert 用户: {}", nickname);
        Ok(())
    }

    /// 用户是否存在
    pub async fn exists(&self, nickname: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM users WHERE nickname = ?")
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// 读取用户的私信/通知偏好，用户不存在时返回 None
    pub async fn get_prefs(&self, nickname: &str) -> Result<Option<UserPrefs>, sqlx::Error> {
        let row = sqlx::query("SELECT can_message, notify FROM users WHERE nickname = ?")
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|m| UserPrefs {
            can_message: m.get::<i64, _>("can_message") != 0,
            notify: m.get::<i64, _>("notify") != 0,
        }))
    }

    /// 读取完整的用户字段子集，用户不存在时返回 None
    pub async fn get_user(&self, nickname: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT nickname, can_message, notify, last_seen FROM users WHERE nickname = ?",
        )
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|m| User {
            nickname: m.get("nickname"),
            can_message: m.get::<i64, _>("can_message") != 0,
            notify: m.get::<i64, _>("notify") != 0,
            last_seen: m.get("last_seen"),
        }))
    }

    /// 修改一项用户设置（封闭枚举，列名在编译期确定）
    pub async fn set_setting(
        &self,
        nickname: &str,
        setting: UserSetting,
    ) -> Result<u64, sqlx::Error> {
        let sql = format!("UPDATE users SET {} = ? WHERE nickname = ?", setting.column());
        let res = sqlx::query(&sql)
            .bind(setting.value())
            .bind(nickname)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    /// 覆盖最后活跃时间（last-write-wins，无需加锁）
    pub async fn set_last_seen(&self, nickname: &str, now: i64) -> Result<u64, sqlx::Error> {
        let res = sqlx::query("UPDATE users SET last_seen = ? WHERE nickname = ?")
            .bind(now)
            .bind(nickname)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    /// 读取最后活跃时间；外层 None 表示用户不存在，内层 None 表示从未活跃
    pub async fn get_last_seen(&self, nickname: &str) -> Result<Option<Option<i64>>, sqlx::Error> {
        let row = sqlx::query("SELECT last_seen FROM users WHERE nickname = ?")
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|m| m.get("last_seen")))
    }
}
