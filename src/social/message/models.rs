//! 私信本地模型定义

use serde::{Deserialize, Serialize};

/// 单条消息长度上限（按 Unicode 码点计）
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// 一条私信
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "id")]
    pub id: i64,
    #[serde(rename = "sender")]
    pub sender: String,
    #[serde(rename = "recipient")]
    pub recipient: String,
    #[serde(rename = "text")]
    pub content: String,
    /// 发送时间（毫秒）
    #[serde(rename = "sentAt")]
    pub sent_at: i64,
    /// 收件人是否尚未查看；只会从 true 变为 false
    #[serde(rename = "unread")]
    pub unread: bool,
    /// 是否被编辑过；首次编辑后恒为 true
    #[serde(rename = "edited")]
    pub edited: bool,
}
