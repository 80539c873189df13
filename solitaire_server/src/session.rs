use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use solitaire_core::{help_text, ClientMessage, Game, RenderOptions, ServerMessage, UserId, VICTORY_TEXT};

/// 所有用户的会话表
///
/// 每个用户最多只有一局正在进行的游戏。同一局游戏只在它所属会话的锁内被修改，
/// 所以同一个用户的多个连接 (例如连点按钮) 会被串行化。
///
/// 会话有两种回收方式：连接断开时没有进行中的游戏就立即移除 ([`SessionStore::release`])；
/// 留着游戏却长时间没有操作的会话由定时清理移除 ([`SessionStore::evict_idle`])。
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<UserId, Arc<Mutex<Session>>>,
}

/// 单个用户的会话：`game` 为 None 表示还没开局或者上一局已经结束
#[derive(Debug)]
pub struct Session {
    game: Option<Game>,
    last_active: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Session { game: None, last_active: Instant::now() }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得会话，不存在时新建。
    ///
    /// 传入的 id 已存在就接回原来的会话；没有传 id 或 id 未知时
    /// 新建一个会话并分配一个新的 id (不信任客户端自选的 id)。
    pub fn attach(&self, user_id: Option<UserId>) -> (UserId, Arc<Mutex<Session>>) {
        if let Some(id) = user_id {
            if let Some(session) = self.get(&id) {
                session.lock().last_active = Instant::now();
                info!("用户 {} 接回了会话", id);
                return (id, session);
            }
        }
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::default()));
        self.sessions.insert(id, session.clone());
        info!("为用户 {} 新建了会话", id);
        (id, session)
    }

    pub fn get(&self, user_id: &UserId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.get(user_id).map(|s| s.clone())
    }

    /// 连接断开时调用：会话里没有进行中的游戏就移除它。
    /// 正在被其他连接使用 (锁被占用) 的会话保留。返回是否移除。
    pub fn release(&self, user_id: &UserId) -> bool {
        let removed = self
            .sessions
            .remove_if(user_id, |_, s| s.try_lock().is_some_and(|s| s.game.is_none()))
            .is_some();
        if removed {
            info!("用户 {} 的会话已移除", user_id);
        }
        removed
    }

    /// 移除超过 `max_idle` 没有任何操作的会话，返回移除的个数。
    /// 锁被占用的会话视为活跃。
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| s.try_lock().is_none_or(|s| s.last_active.elapsed() < max_idle));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Session {
    #[cfg(test)]
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    fn board(&self, render: RenderOptions) -> Option<ServerMessage> {
        self.game.as_ref().map(|game| ServerMessage::Board { text: game.render(render) })
    }

    /// 胜利时发出最终棋盘和祝贺语，并结束这局游戏
    fn finish_or_show(&mut self, render: RenderOptions, replies: &mut Vec<ServerMessage>) {
        let won = self.game.as_ref().is_some_and(Game::check_game_over);
        replies.extend(self.board(render));
        if won {
            replies.push(ServerMessage::Victory { text: VICTORY_TEXT.to_string() });
            self.game = None;
            info!("一局游戏胜利结束");
        }
    }

    /// 处理一条指令，返回要回复给用户的消息
    pub fn handle(&mut self, msg: ClientMessage, render: RenderOptions) -> Vec<ServerMessage> {
        self.last_active = Instant::now();
        let mut replies = Vec::new();
        match msg {
            ClientMessage::Hello { .. } => {
                replies.push(ServerMessage::Error { message: "Already connected.".to_string() });
            }
            ClientMessage::StartGame => {
                self.game = Some(Game::new());
                replies.extend(self.board(render));
            }
            ClientMessage::Draw => match self.game.as_mut() {
                Some(game) => {
                    game.draw();
                    replies.extend(self.board(render));
                }
                None => replies.push(ServerMessage::Error {
                    message: "Game is stale. Type '/start' to start a new game.".to_string(),
                }),
            },
            ClientMessage::Move { from_row, card_index, to_row } => match self.game.as_mut() {
                Some(game) => {
                    if let Err(violation) = game.move_cards(from_row, card_index, to_row) {
                        tracing::debug!("rejected move: {}", violation);
                        replies.push(ServerMessage::Error { message: format!("InvalidMove: {}", violation) });
                    }
                    self.finish_or_show(render, &mut replies);
                }
                None => replies.push(not_started()),
            },
            ClientMessage::Cheat => match self.game.as_mut() {
                Some(game) => {
                    game.cheat();
                    self.finish_or_show(render, &mut replies);
                }
                None => replies.push(not_started()),
            },
            ClientMessage::Help => replies.push(ServerMessage::Help { text: help_text() }),
        }
        replies
    }
}

fn not_started() -> ServerMessage {
    ServerMessage::Error { message: "Game hasn't started yet. Type /start to start a new game.".to_string() }
}

// --- 单元测试 ---
