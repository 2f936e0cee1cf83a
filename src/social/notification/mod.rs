//! 通知模块
//!
//! 按用户维度的一次性事件记录，创建时由分发器统一检查 notify 偏好。

pub mod dao;
pub mod models;
pub mod service;

pub use dao::NotificationDao;
pub use models::Notification;
pub use service::NotificationDispatcher;
