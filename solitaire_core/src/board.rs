use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::Range;

/// 行总数：4 个接龙行 + 1 个牌堆行 + 7 个工作列
pub const ROW_COUNT: usize = 12;
/// 接龙行(foundation rows)，行号等于花色序号
pub const FOUNDATION_ROWS: Range<usize> = 0..4;
/// 牌堆行(stock row)，行首就是当前翻开的那张牌
pub const STOCK_ROW: usize = 4;
/// 工作列(tableau rows)
pub const TABLEAU_ROWS: Range<usize> = 5..12;

/// 一行牌。下标 0 是行首(head)，也是唯一能直接操作的一端。
pub type Row = VecDeque<Card>;

/// 棋盘状态 (BoardState)
///
/// 独占 12 行以及行中的每一张牌。移动只会把一段连续的牌从一行转移到另一行，
/// 所以只要初始发牌是 52 张牌的一个划分，牌就永远不会重复或丢失。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: [Row; ROW_COUNT],
}

pub fn is_foundation_row(row: usize) -> bool {
    FOUNDATION_ROWS.contains(&row)
}

pub fn is_tableau_row(row: usize) -> bool {
    TABLEAU_ROWS.contains(&row)
}

impl Board {
    pub fn from_rows(rows: [Row; ROW_COUNT]) -> Self {
        Board { rows }
    }

    pub fn rows(&self) -> &[Row; ROW_COUNT] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// 行首的牌 (如果存在)
    pub fn head(&self, row: usize) -> Option<&Card> {
        self.row(row).and_then(|r| r.front())
    }

    /// 所有接龙行中牌的总数
    pub fn foundation_count(&self) -> usize {
        self.rows[FOUNDATION_ROWS].iter().map(|r| r.len()).sum()
    }

    /// 按行号顺序遍历棋盘上的每一张牌
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.rows.iter().flatten()
    }

    // --- 行操作原语 ---

    /// 翻牌：牌堆行左移一位。
    ///
    /// 只有牌堆中至少有 2 张牌时才生效。新的行首翻成正面，
    /// 原来的行首移到末尾并翻回背面。
    /// 返回是否真的发生了轮转。
    pub fn rotate_stock(&mut self) -> bool {
        let stock = &mut self.rows[STOCK_ROW];
        if stock.len() < 2 {
            return false;
        }
        stock.rotate_left(1);
        if let Some(head) = stock.front_mut() {
            head.visible = true;
        }
        if let Some(previous) = stock.back_mut() {
            previous.visible = false;
        }
        true
    }

    /// 取出一条牌链：从行首到 `card_index` (含) 的前 `card_index + 1` 张牌，
    /// 保持原有顺序。若行中还剩牌，新的行首翻成正面。
    ///
    /// 行号越界时返回空链；`card_index` 超出行长时取出整行。
    pub fn extract_chain(&mut self, row: usize, card_index: usize) -> Vec<Card> {
        let Some(src) = self.rows.get_mut(row) else {
            return Vec::new();
        };
        let count = card_index.saturating_add(1).min(src.len());
        let chain: Vec<Card> = src.drain(..count).collect();
        if let Some(head) = src.front_mut() {
            head.visible = true;
        }
        chain
    }

    /// 把一条牌链放到行首，链的第一张牌成为新的行首。
    pub fn prepend_chain(&mut self, row: usize, chain: Vec<Card>) {
        if let Some(dst) = self.rows.get_mut(row) {
            for card in chain.into_iter().rev() {
                dst.push_front(card);
            }
        }
    }
}

/// 测试用快照：逐行列出 (花色, 点数, 是否正面)。
/// `Card` 的相等性不看朝向，所以比较"棋盘没变"时要用它。
#[cfg(test)]
impl Board {
    pub(crate) fn snapshot(&self) -> Vec<Vec<(crate::card::Suit, u8, bool)>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| (c.suit, c.rank, c.visible)).collect())
            .collect()
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn row_of(cards: &[(Suit, u8, bool)]) -> Row {
        cards.iter().map(|&(suit, rank, visible)| Card { suit, rank, visible }).collect()
    }

    fn board_with(row: usize, cards: Row) -> Board {
        let mut rows: [Row; ROW_COUNT] = Default::default();
        rows[row] = cards;
        Board::from_rows(rows)
    }

    #[test]
    fn test_rotate_stock_flips_new_and_old_head() {
        let mut board = board_with(
            STOCK_ROW,
            row_of(&[(Suit::Club, 1, true), (Suit::Club, 2, false), (Suit::Club, 3, false)]),
        );

        assert!(board.rotate_stock());
        let stock = board.row(STOCK_ROW).unwrap();
        assert_eq!(stock.len(), 3);
        assert_eq!(stock[0], Card::new(Suit::Club, 2));
        assert!(stock[0].visible);
        assert_eq!(stock[2], Card::new(Suit::Club, 1));
        assert!(!stock[2].visible);
    }

    #[test]
    fn test_rotate_stock_needs_two_cards() {
        let mut board = board_with(STOCK_ROW, row_of(&[(Suit::Heart, 5, true)]));
        let before = board.snapshot();
        assert!(!board.rotate_stock());
        assert_eq!(board.snapshot(), before);
        assert!(board.head(STOCK_ROW).unwrap().visible);

        let mut empty = Board::default();
        assert!(!empty.rotate_stock());
    }

    #[test]
    fn test_extract_chain_keeps_order_and_reveals_new_head() {
        let mut board = board_with(
            7,
            row_of(&[(Suit::Heart, 4, true), (Suit::Spade, 5, true), (Suit::Club, 9, false)]),
        );

        let chain = board.extract_chain(7, 1);
        assert_eq!(chain, vec![Card::new(Suit::Heart, 4), Card::new(Suit::Spade, 5)]);
        let rest = board.row(7).unwrap();
        assert_eq!(rest.len(), 1);
        assert!(rest[0].visible);
    }

    #[test]
    fn test_extract_whole_row_leaves_it_empty() {
        let mut board = board_with(5, row_of(&[(Suit::Diamond, 13, true)]));
        let chain = board.extract_chain(5, 0);
        assert_eq!(chain.len(), 1);
        assert!(board.row(5).unwrap().is_empty());
        assert!(board.extract_chain(ROW_COUNT, 0).is_empty());
    }

    #[test]
    fn test_prepend_chain_puts_first_card_at_head() {
        let mut board = board_with(9, row_of(&[(Suit::Club, 6, true)]));
        board.prepend_chain(9, vec![Card::face_up(Suit::Heart, 4), Card::face_up(Suit::Spade, 5)]);

        let row: Vec<Card> = board.row(9).unwrap().iter().copied().collect();
        assert_eq!(
            row,
            vec![Card::new(Suit::Heart, 4), Card::new(Suit::Spade, 5), Card::new(Suit::Club, 6)]
        );
    }

    #[test]
    fn test_foundation_count_only_counts_rows_0_to_3() {
        let mut board = Board::default();
        board.prepend_chain(0, vec![Card::face_up(Suit::Club, 13)]);
        board.prepend_chain(3, vec![Card::face_up(Suit::Spade, 13)]);
        board.prepend_chain(STOCK_ROW, vec![Card::new(Suit::Heart, 2)]);
        assert_eq!(board.foundation_count(), 2);
        assert_eq!(board.cards().count(), 3);
    }

    #[test]
    fn test_snapshot_sees_visibility() {
        let board = board_with(5, row_of(&[(Suit::Club, 7, true), (Suit::Heart, 2, false)]));
        let mut flipped = board.clone();
        flipped.rows[5][0].visible = false;
        // 只改朝向时 Card 仍然相等，快照必须能分辨出来
        assert_eq!(board, flipped);
        assert_ne!(board.snapshot(), flipped.snapshot());
        assert_eq!(board.snapshot()[5], vec![(Suit::Club, 7, true), (Suit::Heart, 2, false)]);
    }

    #[test]
    fn test_row_roles() {
        assert!(FOUNDATION_ROWS.clone().all(is_foundation_row));
        assert!(!is_foundation_row(STOCK_ROW));
        assert!(!is_tableau_row(STOCK_ROW));
        assert!(TABLEAU_ROWS.clone().all(is_tableau_row));
        assert_eq!(TABLEAU_ROWS.len(), 7);
    }
}
