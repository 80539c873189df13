mod config;
mod session;

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use solitaire_core::{ClientMessage, ServerMessage, UserId};

use crate::config::ServerConfig;
use crate::session::SessionStore;

// 服务器全局状态：会话表 + 只读配置
struct AppState {
    sessions: SessionStore,
    config: ServerConfig,
}

type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let addr = config.addr;
    if config.render.reveal_all {
        info!("调试显示已开启：所有牌按正面渲染");
    }

    let state = SharedState::new(AppState {
        sessions: SessionStore::new(),
        config,
    });

    // 定时清理长时间没有操作的会话
    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweeper.config.sweep_interval);
        loop {
            ticker.tick().await;
            let removed = sweeper.sessions.evict_idle(sweeper.config.session_idle);
            if removed > 0 {
                info!("清理了 {} 个闲置会话，剩余 {} 个", removed, sweeper.sessions.len());
            }
        }
    });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state);

    info!("服务器正在监听 {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();

    // 创建一个 MPSC 通道，用于从其他任务接收要发送的消息
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(32);

    // 启动一个新任务，专门负责将 MPSC 通道中的消息发送到 WebSocket
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                // 发送失败，说明客户端已断开，退出任务
                break;
            }
        }
    });

    // 当前连接对应的用户，在 Hello 之后填充
    let mut user: Option<UserId> = None;

    // 主循环，处理从客户端接收到的消息
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    for reply in handle_client_message(client_msg, &state, &mut user) {
                        if tx.send(reply).await.is_err() {
                            tracing::warn!("向用户 {:?} 发送消息失败（可能已断开）", user);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("解析消息失败: {}", e);
                }
            }
        }
    }

    // 有进行中的游戏时会话保留在表中，同一用户可以用 Hello 接回
    info!("用户 {:?} 的连接关闭", user);
    if let Some(id) = user {
        state.sessions.release(&id);
    }
}

/// 核心消息处理逻辑
fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    user: &mut Option<UserId>,
) -> Vec<ServerMessage> {
    match (msg, *user) {
        (ClientMessage::Hello { user_id }, None) => {
            let (id, _) = state.sessions.attach(user_id);
            *user = Some(id);
            vec![
                ServerMessage::Welcome { your_id: id },
                ServerMessage::Info { message: "Type /start to start a new game, /help for commands.".to_string() },
            ]
        }
        (_, None) => vec![ServerMessage::Error { message: "Say Hello first.".to_string() }],
        (msg, Some(id)) => match state.sessions.get(&id) {
            // 同一局游戏的所有修改都在会话锁内完成
            Some(session) => session.lock().handle(msg, state.config.render),
            // 会话已被清理，这个连接需要重新 Hello
            None => {
                *user = None;
                vec![ServerMessage::Error { message: "Session expired. Send Hello to start over.".to_string() }]
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_state() -> AppState {
        AppState { sessions: SessionStore::new(), config: ServerConfig::default() }
    }

    #[test]
    fn test_hello_is_required_before_commands() {
        let state = app_state();
        let mut user = None;
        let replies = handle_client_message(ClientMessage::StartGame, &state, &mut user);
        assert!(matches!(replies[0], ServerMessage::Error { .. }));
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_hello_then_start() {
        let state = app_state();
        let mut user = None;
        let replies = handle_client_message(ClientMessage::Hello { user_id: None }, &state, &mut user);
        let id = user.expect("hello assigns a user id");
        assert_eq!(replies[0], ServerMessage::Welcome { your_id: id });

        let replies = handle_client_message(ClientMessage::StartGame, &state, &mut user);
        assert!(matches!(replies[0], ServerMessage::Board { .. }));
    }

    #[test]
    fn test_second_connection_resumes_game() {
        let state = app_state();
        let mut first = None;
        handle_client_message(ClientMessage::Hello { user_id: None }, &state, &mut first);
        handle_client_message(ClientMessage::StartGame, &state, &mut first);

        let mut second = None;
        handle_client_message(ClientMessage::Hello { user_id: first }, &state, &mut second);
        assert_eq!(second, first);
        let replies = handle_client_message(ClientMessage::Draw, &state, &mut second);
        assert!(matches!(replies[0], ServerMessage::Board { .. }));
    }

    #[test]
    fn test_evicted_session_asks_for_hello_again() {
        let state = app_state();
        let mut user = None;
        handle_client_message(ClientMessage::Hello { user_id: None }, &state, &mut user);
        handle_client_message(ClientMessage::StartGame, &state, &mut user);
        let old = user;

        assert_eq!(state.sessions.evict_idle(std::time::Duration::ZERO), 1);
        let replies = handle_client_message(ClientMessage::Draw, &state, &mut user);
        assert_eq!(
            replies,
            vec![ServerMessage::Error { message: "Session expired. Send Hello to start over.".to_string() }]
        );
        assert_eq!(user, None);

        // 旧 id 已经失效，重新 Hello 会拿到新会话
        handle_client_message(ClientMessage::Hello { user_id: old }, &state, &mut user);
        assert!(user.is_some());
        assert_ne!(user, old);
        assert_eq!(state.sessions.len(), 1);
    }
}
