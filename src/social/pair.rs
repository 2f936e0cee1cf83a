//! 无序用户对的规范化
//!
//! 好友边和会话都以「无序对」为键：同一对用户无论方向如何，
//! 在存储层都规范化成 (pair_low, pair_high) 两列，配合唯一索引
//! 消除重复方向带来的一致性问题。

/// 将两个昵称规范化为字典序 (low, high) 对
pub fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
