//! 好友边本地模型定义

use serde::{Deserialize, Serialize};

/// 好友边状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Pending,
    Accepted,
}

impl EdgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStatus::Pending => "pending",
            EdgeStatus::Accepted => "accepted",
        }
    }

    /// 从数据库文本还原；未知文本按 pending 处理（schema 之外不会出现）
    pub fn from_str_or_pending(s: &str) -> Self {
        match s {
            "accepted" => EdgeStatus::Accepted,
            _ => EdgeStatus::Pending,
        }
    }
}

/// 好友边：方向上记录发起者和响应者，accepted 之后语义对称
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendEdge {
    #[serde(rename = "requester")]
    pub requester: String,
    #[serde(rename = "responder")]
    pub responder: String,
    #[serde(rename = "status")]
    pub status: EdgeStatus,
    /// 创建时间（毫秒）
    #[serde(rename = "createTime")]
    pub create_time: i64,
}
