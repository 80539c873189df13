use serde::{Deserialize, Serialize};
use std::fmt;

// --- 核心数据结构定义 ---

/// 一副牌的张数
pub const DECK_SIZE: usize = 52;
/// 每种花色的张数
pub const RANKS_PER_SUIT: u8 = 13;
/// K 的点数，接龙行必须从 K 开始
pub const KING: u8 = 13;

/// 背面朝上的牌的显示符号
pub const HIDDEN_GLYPH: &str = "*";
/// 牌堆(stock)行的行首符号
pub const STOCK_GLYPH: &str = "🂠";

/// 花色 (Suit)
/// 顺序即序号：梅花=0, 方块=1, 红心=2, 黑桃=3，
/// 序号同时就是该花色所属接龙行(foundation row)的行号。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Club,    // 梅花 ♣
    Diamond, // 方块 ♦
    Heart,   // 红心 ♥
    Spade,   // 黑桃 ♠
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

    /// 花色序号 (0..=3)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Suit> {
        Suit::ALL.get(index).copied()
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Suit::Club => "♣",
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
            Suit::Spade => "♠",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// 单张牌 (Card)
///
/// 相等性只看 (花色, 点数)，`visible` 只是牌面朝向，不属于牌的身份。
/// 牌自己从不翻面，朝向只由棋盘上的操作改变。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8, // 1..=13
    pub visible: bool,
}

impl Card {
    /// 新建一张背面朝上的牌
    pub fn new(suit: Suit, rank: u8) -> Card {
        Card { suit, rank, visible: false }
    }

    /// 新建一张正面朝上的牌
    pub fn face_up(suit: Suit, rank: u8) -> Card {
        Card { suit, rank, visible: true }
    }

    /// 由 0..52 的序号生成牌：花色 = index / 13，点数 = index % 13 + 1
    ///
    /// # Panics
    /// 序号超过 51 时 panic。
    pub fn from_index(index: usize) -> Card {
        let suit = Suit::from_index(index / RANKS_PER_SUIT as usize)
            .unwrap_or_else(|| panic!("card index {} out of range", index));
        Card::new(suit, (index % RANKS_PER_SUIT as usize) as u8 + 1)
    }

    /// 与朝向无关的牌面文字，例如 `♥12`
    pub fn face(&self) -> String {
        format!("{}{}", self.suit, self.rank)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.suit == other.suit && self.rank == other.rank
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.suit.hash(state);
        self.rank.hash(state);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.visible {
            write!(f, "{}{}", self.suit, self.rank)
        } else {
            write!(f, "{}", HIDDEN_GLYPH)
        }
    }
}

// --- 单元测试 ---
