//! 在线状态模块
//!
//! 没有独立的生命周期：只有一个滚动的最后活跃时间，在线与否
//! 每次读取时重新推导，不做后台扫描，也不推送状态变化。

pub mod models;
pub mod service;

pub use models::PresenceStatus;
pub use service::PresenceTracker;
