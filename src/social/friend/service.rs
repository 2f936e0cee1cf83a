//! 好友关系服务层
//!
//! 状态机：absent → pending（request）、pending → accepted（accept）、
//! pending → absent（decline）。`are_friends` 是私信模块的授权入口。

use crate::social::error::{SocialError, SocialResult};
use crate::social::friend::dao::FriendDao;
use crate::social::friend::models::FriendEdge;
use crate::social::notification::NotificationDispatcher;
use crate::social::user::UserDao;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// 好友关系服务
#[derive(Clone)]
pub struct FriendGraphService {
    dao: FriendDao,
    users: UserDao,
    notifier: NotificationDispatcher,
}

impl FriendGraphService {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            dao: FriendDao::new(pool.clone()),
            users: UserDao::new(pool.clone()),
            notifier: NotificationDispatcher::new(pool),
        }
    }

    /// 发起好友请求
    ///
    /// 自己加自己或目标不存在返回 `InvalidTarget`；这对用户之间
    /// 已有任意方向、任意状态的边时返回 `DuplicateRequest`。
    /// 成功后通知目标用户（通知偏好门控在分发器内部）。
    pub async fn request_friend(
        &self,
        requester: &str,
        target: &str,
        now: i64,
    ) -> SocialResult<()> {
        if requester == target {
            return Err(SocialError::InvalidTarget);
        }
        if !self.users.exists(target).await? {
            return Err(SocialError::InvalidTarget);
        }

        // 重复检查交给 (pair_low, pair_high) 唯一索引：并发互发时
        // 后写入的一方在这里确定性地失败，不需要先查后插。
        if let Err(e) = self.dao.insert_pending(requester, target, now).await {
            if SocialError::is_unique_violation(&e) {
                return Err(SocialError::DuplicateRequest);
            }
            return Err(e.into());
        }

        info!("[FriendGraph] {} 向 {} 发起好友请求", requester, target);
        self.notifier
            .notify(
                target,
                &format!("{} 发来了好友请求", requester),
                &format!("/profile/{}", requester),
                now,
            )
            .await?;
        Ok(())
    }

    /// 响应好友请求：accept=true 接受，否则拒绝并删除边
    ///
    /// 要求存在 requester → responder 的 pending 边，否则返回 `NotFound`。
    /// 同一条请求被响应两次时，第二次同样落在 `NotFound`。
    pub async fn respond(
        &self,
        responder: &str,
        requester: &str,
        accept: bool,
    ) -> SocialResult<()> {
        let affected = if accept {
            self.dao.accept(requester, responder).await?
        } else {
            self.dao.delete_pending(requester, responder).await?
        };
        if affected == 0 {
            return Err(SocialError::NotFound);
        }
        info!(
            "[FriendGraph] {} {} 了 {} 的好友请求",
            responder,
            if accept { "接受" } else { "拒绝" },
            requester
        );
        Ok(())
    }

    /// user 的好友昵称列表（accepted 边，任意方向），按昵称排序
    pub async fn list_friends(&self, user: &str) -> SocialResult<Vec<String>> {
        Ok(self.dao.list_accepted(user).await?)
    }

    /// 发给 responder 的待处理请求列表，最新的在前
    pub async fn list_pending(&self, responder: &str) -> SocialResult<Vec<FriendEdge>> {
        Ok(self.dao.list_pending_for(responder).await?)
    }

    /// 两人之间是否存在 accepted 边（任意方向），私信模块以此授权
    pub async fn are_friends(&self, a: &str, b: &str) -> SocialResult<bool> {
        Ok(self.dao.accepted_exists(a, b).await?)
    }
}
