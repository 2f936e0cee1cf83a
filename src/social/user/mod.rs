//! 用户模块
//!
//! 用户档案由外部的论坛模块维护，核心只读取偏好字段、写入最后活跃时间。
//! 为 CLI 和测试提供最小的用户写入能力。

pub mod dao;
pub mod models;

pub use dao::UserDao;
pub use models::{User, UserPrefs, UserSetting};
