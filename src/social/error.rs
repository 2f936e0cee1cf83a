//! 社交核心统一错误类型
//!
//! 所有业务错误都以类型化结果返回给调用方，由外部路由层转换成
//! 用户可见的提示或结构化响应，核心内部不做自动重试。

use thiserror::Error;

/// 社交核心错误分类
#[derive(Debug, Error)]
pub enum SocialError {
    /// 目标用户不存在，或请求者和目标是同一个人
    #[error("目标用户不合法")]
    InvalidTarget,

    /// 这对用户之间已经存在好友边（任意方向、任意状态）
    #[error("好友请求已存在")]
    DuplicateRequest,

    /// 请求的记录不存在（或状态已不满足操作前提）
    #[error("记录不存在")]
    NotFound,

    /// 没有操作权限：不是好友 / 对方关闭了私信 / 不是记录的所有者
    #[error("没有操作权限")]
    Forbidden,

    /// 内容去除首尾空白后为空
    #[error("内容不能为空")]
    EmptyInput,

    /// 内容超出长度限制
    #[error("内容超出长度限制")]
    TextTooLong,

    /// 底层存储错误，对当前请求而言是致命的
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
}

/// 社交核心统一结果类型
pub type SocialResult<T> = Result<T, SocialError>;

impl SocialError {
    /// 判断一个 sqlx 错误是否为唯一约束冲突
    ///
    /// 好友边的无序对唯一索引依赖这个判断：并发互发请求时，
    /// 后写入的一方会在存储层撞上唯一索引，映射为 `DuplicateRequest`。
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}
