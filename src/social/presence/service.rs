//! 在线状态服务层
//!
//! `touch` 由外部路由层在每个已认证请求分发前调用；写入是
//! last-write-wins，旧值被并发覆盖无关紧要，读取只关心最大时间戳。

use crate::social::error::{SocialError, SocialResult};
use crate::social::presence::models::PresenceStatus;
use crate::social::user::UserDao;
use sqlx::{Pool, Sqlite};
use tracing::debug;

/// 在线判定窗口：最后活跃距今不足 3 分钟视为在线
const ONLINE_WINDOW_MS: i64 = 3 * 60 * 1000;

/// 在线状态追踪器
#[derive(Clone)]
pub struct PresenceTracker {
    users: UserDao,
}

impl PresenceTracker {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            users: UserDao::new(pool),
        }
    }

    /// 覆盖用户的最后活跃时间
    pub async fn touch(&self, user: &str, now: i64) -> SocialResult<()> {
        if self.users.set_last_seen(user, now).await? == 0 {
            return Err(SocialError::NotFound);
        }
        debug!("[Presence] touch {} @ {}", user, now);
        Ok(())
    }

    /// 读取时推导在线状态
    pub async fn status(&self, user: &str, now: i64) -> SocialResult<PresenceStatus> {
        let last_seen = self
            .users
            .get_last_seen(user)
            .await?
            .ok_or(SocialError::NotFound)?;

        Ok(match last_seen {
            None => PresenceStatus {
                online: false,
                minutes_ago: None,
            },
            Some(seen) => {
                let elapsed = now - seen;
                PresenceStatus {
                    online: elapsed < ONLINE_WINDOW_MS,
                    // 时钟偏移导致的负差按 0 分钟处理
                    minutes_ago: Some(elapsed.max(0) / 60_000),
                }
            }
        })
    }
}
