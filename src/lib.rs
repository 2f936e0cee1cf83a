pub mod social;

// 重新导出常用类型和函数，方便外部使用
pub use social::{
    EdgeStatus, FriendEdge, FriendGraphService, Message, MessageStore, Notification,
    NotificationDispatcher, PresenceStatus, PresenceTracker, SocialCore, SocialError,
    SocialResult, User, UserSetting,
};
