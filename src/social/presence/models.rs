//! 在线状态模型定义

use serde::{Deserialize, Serialize};

/// 推导出的在线状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceStatus {
    /// 最后活跃距今不足 3 分钟
    #[serde(rename = "online")]
    pub online: bool,
    /// 最后活跃距今的整分钟数；从未活跃时为 None
    #[serde(rename = "minutesAgo")]
    pub minutes_ago: Option<i64>,
}
