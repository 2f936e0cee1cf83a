//! 社交核心 CLI（测试版）
//!
//! 非交互式 CLI，用于在本地数据库上演练核心的全部操作：
//! 好友请求/响应、私信收发改删、通知收件箱、在线状态。
//! 当前时间取自本机时钟，以毫秒传给核心。

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use forum_social_core::{SocialCore, UserSetting};
use tracing::info;

/// 社交核心 CLI
#[derive(Parser, Debug)]
#[command(name = "social-cli")]
#[command(about = "社交核心 CLI - 在本地数据库上演练好友/私信/通知/在线状态", long_about = None)]
struct Args {
    /// SQLite 数据库 URL
    #[arg(long, default_value = "sqlite://social.db?mode=rwc")]
    db: String,

    /// 日志级别（默认: info,forum_social_core=debug）
    #[arg(long, default_value = "info,forum_social_core=debug")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 插入或更新一个用户
    AddUser {
        nickname: String,
        /// 关闭私信接收
        #[arg(long)]
        no_messages: bool,
        /// 关闭通知接收
        #[arg(long)]
        no_notify: bool,
    },
    /// 修改用户设置
    SetPref {
        nickname: String,
        /// 设置名：can-message 或 notify
        #[arg(value_parser = ["can-message", "notify"])]
        setting: String,
        /// 开关：on 或 off
        #[arg(value_parser = ["on", "off"])]
        value: String,
    },
    /// 发起好友请求
    Request { requester: String, target: String },
    /// 响应好友请求
    Respond {
        responder: String,
        requester: String,
        /// 拒绝而不是接受
        #[arg(long)]
        decline: bool,
    },
    /// 好友列表
    Friends { user: String },
    /// 待处理的好友请求
    Pending { user: String },
    /// 发送私信
    Send {
        sender: String,
        recipient: String,
        text: String,
    },
    /// 查看会话（收到的消息顺带标记已读）
    Conv { viewer: String, other: String },
    /// 编辑自己发出的消息
    Edit {
        message_id: i64,
        requester: String,
        text: String,
    },
    /// 删除自己发出的消息
    Delete { message_id: i64, requester: String },
    /// 清空与对方的全部会话历史
    Clear { viewer: String, other: String },
    /// 通知收件箱（读取后整体标记已读）
    Inbox { owner: String },
    /// 未读通知数
    Unread { owner: String },
    /// 清空通知
    ClearNotifs { owner: String },
    /// 记录一次活跃
    Touch { user: String },
    /// 查询在线状态
    Presence { user: String },
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("social-cli.log")
        .expect("无法创建日志文件 social-cli.log");

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);

    let core = SocialCore::connect(&args.db).await?;
    let now = Utc::now().timestamp_millis();

    match args.command {
        Command::AddUser {
            nickname,
            no_messages,
            no_notify,
        } => {
            core.upsert_user(&nickname, !no_messages, !no_notify).await?;
            info!("[CLI] 用户已就绪: {}", nickname);
        }
        Command::SetPref {
            nickname,
            setting,
            value,
        } => {
            let on = value == "on";
            let setting = match setting.as_str() {
                "can-message" => UserSetting::CanMessage(on),
                _ => UserSetting::Notify(on),
            };
            if core.set_setting(&nickname, setting).await? {
                info!("[CLI] 已更新 {} 的设置", nickname);
            } else {
                info!("[CLI] 用户不存在: {}", nickname);
            }
        }
        Command::Request { requester, target } => {
            core.request_friend(&requester, &target, now).await?;
            info!("[CLI] {} 已向 {} 发起好友请求", requester, target);
        }
        Command::Respond {
            responder,
            requester,
            decline,
        } => {
            core.respond_friend(&responder, &requester, !decline).await?;
            info!(
                "[CLI] {} 已{}来自 {} 的请求",
                responder,
                if decline { "拒绝" } else { "接受" },
                requester
            );
        }
        Command::Friends { user } => {
            let friends = core.list_friends(&user).await?;
            println!("{}", serde_json::to_string_pretty(&friends)?);
        }
        Command::Pending { user } => {
            let pending = core.list_pending_requests(&user).await?;
            println!("{}", serde_json::to_string_pretty(&pending)?);
        }
        Command::Send {
            sender,
            recipient,
            text,
        } => {
            let msg = core.send_message(&sender, &recipient, &text, now).await?;
            println!("{}", serde_json::to_string_pretty(&msg)?);
        }
        Command::Conv { viewer, other } => {
            let conv = core.list_conversation(&viewer, &other).await?;
            println!("{}", serde_json::to_string_pretty(&conv)?);
        }
        Command::Edit {
            message_id,
            requester,
            text,
        } => {
            core.edit_message(message_id, &requester, &text).await?;
            info!("[CLI] 消息 #{} 已编辑", message_id);
        }
        Command::Delete {
            message_id,
            requester,
        } => {
            core.delete_message(message_id, &requester).await?;
            info!("[CLI] 消息 #{} 已删除", message_id);
        }
        Command::Clear { viewer, other } => {
            let removed = core.clear_conversation(&viewer, &other).await?;
            info!("[CLI] 会话已清空，共删除 {} 条", removed);
        }
        Command::Inbox { owner } => {
            let inbox = core.list_notifications(&owner).await?;
            println!("{}", serde_json::to_string_pretty(&inbox)?);
        }
        Command::Unread { owner } => {
            println!("{}", core.count_unread_notifications(&owner).await?);
        }
        Command::ClearNotifs { owner } => {
            let removed = core.clear_notifications(&owner).await?;
            info!("[CLI] 通知已清空，共删除 {} 条", removed);
        }
        Command::Touch { user } => {
            core.touch_presence(&user, now).await?;
            info!("[CLI] 已记录 {} 的活跃时间", user);
        }
        Command::Presence { user } => {
            let status = core.get_presence(&user, now).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
