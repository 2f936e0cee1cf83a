//! 好友关系模块
//!
//! 好友边的生命周期：absent → pending（发起请求）→ accepted（接受），
//! pending → absent（拒绝）。accepted 边目前没有移除路径。

pub mod dao;
pub mod models;
pub mod service;

pub use dao::FriendDao;
pub use models::{EdgeStatus, FriendEdge};
pub use service::FriendGraphService;
