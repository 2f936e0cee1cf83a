pub mod core;
pub mod db;
pub mod error;
pub mod friend;
pub mod message;
pub mod notification;
pub mod pair;
pub mod presence;
pub mod user;

// 重新导出常用类型，方便外部使用
pub use self::core::SocialCore;
pub use error::{SocialError, SocialResult};
pub use friend::{EdgeStatus, FriendEdge, FriendGraphService};
pub use message::{Message, MessageStore};
pub use notification::{Notification, NotificationDispatcher};
pub use presence::{PresenceStatus, PresenceTracker};
pub use user::{User, UserSetting};
