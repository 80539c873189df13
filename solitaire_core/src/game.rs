use crate::board::{Board, Row, FOUNDATION_ROWS, ROW_COUNT, STOCK_ROW};
use crate::card::{Card, Suit, DECK_SIZE, KING};
use crate::deal::{deal, shuffle_deck};
use crate::render::{render, RenderOptions};
use crate::rules::{validate, Violation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// 一局接龙 (GameEngine)
///
/// 独占一块棋盘，是外部调用方唯一需要直接接触的组件。
/// 生命周期：发牌 -> 翻牌/移动 -> 胜利 -> 丢弃。
///
/// 胜利后不应再修改这局游戏。引擎本身不做锁定，这是调用方的约定。
/// 同一局游戏也不提供并发保护，多个调用方共享时需要自己串行化访问。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
}

impl Game {
    /// 用线程本地的随机数发生器开一局新游戏
    pub fn new() -> Game {
        Game::with_rng(&mut rand::rng())
    }

    /// 用给定的随机源开一局新游戏，方便做可复现的测试
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Game {
        Game { board: deal(shuffle_deck(DECK_SIZE, rng)) }
    }

    /// 用固定种子开局，相同的种子总是发出相同的牌
    pub fn from_seed(seed: u64) -> Game {
        Game::with_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// 直接从一块现成的棋盘开始 (例如测试中的残局)
    pub fn from_board(board: Board) -> Game {
        Game { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 从牌堆翻一张牌。牌堆少于 2 张时什么也不做。
    pub fn draw(&mut self) {
        if self.board.rotate_stock() {
            tracing::debug!(head = ?self.board.head(STOCK_ROW), "drew from stock");
        }
    }

    /// 把 `from_row` 中从行首到 `card_index` 的牌链移到 `to_row` 的行首。
    ///
    /// 这是唯一会移动牌的操作。非法时返回对应的 [`Violation`]，棋盘保持不变。
    pub fn move_cards(&mut self, from_row: usize, card_index: usize, to_row: usize) -> Result<(), Violation> {
        validate(&self.board, from_row, to_row, card_index)?;
        let chain = self.board.extract_chain(from_row, card_index);
        tracing::debug!(from_row, to_row, cards = chain.len(), "moved chain");
        self.board.prepend_chain(to_row, chain);
        Ok(())
    }

    /// 四个接龙行合计有 52 张牌即为胜利
    pub fn check_game_over(&self) -> bool {
        self.board.foundation_count() >= DECK_SIZE
    }

    /// 作弊：直接把四个接龙行填满 (行首 A，行尾 K，全部正面朝上)。
    ///
    /// 用于测试胜利流程。其余各行会被清空，所以棋盘上仍然正好是 52 张牌。
    pub fn cheat(&mut self) {
        let mut rows: [Row; ROW_COUNT] = Default::default();
        for (row, suit) in FOUNDATION_ROWS.zip(Suit::ALL) {
            rows[row] = (1..=KING).map(|rank| Card::face_up(suit, rank)).collect();
        }
        self.board = Board::from_rows(rows);
        tracing::debug!("filled every foundation row");
    }

    /// 按固定文字格式渲染棋盘
    pub fn render(&self, options: RenderOptions) -> String {
        render(&self.board, options)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(RenderOptions::default()))
    }
}

// --- 单元测试 ---
