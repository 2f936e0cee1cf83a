//! 私信模块
//!
//! 两人会话的消息历史：发送（带好友授权和通知扇出）、查看（顺带标记已读）、
//! 发送者改删、参与者清空。

pub mod dao;
pub mod models;
pub mod service;

pub use dao::MessageDao;
pub use models::Message;
pub use service::MessageStore;
