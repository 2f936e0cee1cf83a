//! 通知本地模型定义

use serde::{Deserialize, Serialize};

/// 通知记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "id")]
    pub id: i64,
    /// 通知的拥有者，只有拥有者能查看和清除
    #[serde(rename = "owner")]
    pub owner: String,
    #[serde(rename = "text")]
    pub content: String,
    /// 通知指向的站内地址
    #[serde(rename = "url")]
    pub url: String,
    /// 创建时间（毫秒）
    #[serde(rename = "createdAt")]
    pub create_time: i64,
    #[serde(rename = "read")]
    pub read: bool,
}
