use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// 胜利时发给玩家的祝贺语
pub const VICTORY_TEXT: &str = "✨Congratulations, you win!✨";

// --- 客户端 -> 服务器 的消息 ---
// 前端把用户输入翻译成这些指令。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// 连接后的第一条消息。带上旧的 user_id 可以接回之前的会话，
    /// 不带或者服务器不认识时会新建一个会话。
    Hello { user_id: Option<UserId> },
    /// 开一局新游戏 (会替换掉正在进行的那一局)
    StartGame,
    /// 从牌堆翻一张牌
    Draw,
    /// 把 from_row 中从行首到 card_index 的牌链移到 to_row
    Move { from_row: usize, card_index: usize, to_row: usize },
    /// 直接填满接龙行，用来测试胜利流程
    Cheat,
    /// 查看指令说明
    Help,
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// 会话已建立 (或接回)
    Welcome { your_id: UserId },
    /// 当前棋盘的文字快照
    Board { text: String },
    /// 游戏胜利，text 是祝贺语
    Victory { text: String },
    Help { text: String },
    Info { message: String },
    Error { message: String },
}

/// 指令说明，每行一条
pub fn help_text() -> String {
    [
        "/start",
        "/draw",
        "/move <from_row> <card_index> <to_row>",
        "/cheat",
        "/help",
    ]
    .join("\n")
}
