//! 用户本地模型定义

use serde::{Deserialize, Serialize};

/// 用户记录中核心关心的字段子集
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "nickname")]
    pub nickname: String,
    /// 是否允许接收私信
    #[serde(rename = "canMessage")]
    pub can_message: bool,
    /// 是否接收通知
    #[serde(rename = "notify")]
    pub notify: bool,
    /// 最后活跃时间（毫秒），None 表示从未活跃
    #[serde(rename = "lastSeen")]
    pub last_seen: Option<i64>,
}

/// 私信/通知相关的偏好快照
#[derive(Debug, Clone, Copy)]
pub struct UserPrefs {
    pub can_message: bool,
    pub notify: bool,
}

/// 可修改的用户设置（封闭枚举）
///
/// 取代按字段名字符串修改偏好的做法：未知设置在编译期就不存在，
/// 不需要运行时再做名字校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSetting {
    /// 是否允许接收私信
    CanMessage(bool),
    /// 是否接收通知
    Notify(bool),
}

impl UserSetting {
    /// 设置对应的数据库列名
    pub fn column(&self) -> &'static str {
        match self {
            UserSetting::CanMessage(_) => "can_message",
            UserSetting::Notify(_) => "notify",
        }
    }

    /// 设置值（SQLite 中布尔存 INTEGER）
    pub fn value(&self) -> i64 {
        match self {
            UserSetting::CanMessage(v) | UserSetting::Notify(v) => {
                if *v {
                    1
                } else {
                    0
                }
            }
        }
    }
}
