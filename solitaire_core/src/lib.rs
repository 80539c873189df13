//! # 接龙规则引擎核心库
//!
//! 这个 `core` crate 持有一局接龙的权威棋盘状态：洗牌发牌、
//! 按固定顺序校验走法、合法时修改棋盘、判断胜利，
//! 以及客户端-服务器通信消息的定义。
//! 它与具体前端 (聊天机器人、命令行、图形界面) 解耦，
//! 前端只需要调用发牌、翻牌、移动三种基本操作。

mod board;
mod card;
mod deal;
mod game;
mod message;
mod render;
mod rules;

pub use board::*;

pub use card::*;

pub use deal::*;

pub use game::*;

pub use message::*;

pub use render::*;

pub use rules::*;
