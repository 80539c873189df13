use crate::board::{is_foundation_row, Board, FOUNDATION_ROWS, ROW_COUNT, STOCK_ROW};
use crate::card::{Card, Suit, KING};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 越界的是哪一端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowEnd {
    From,
    To,
}

/// 非法移动的原因 (Violation)
///
/// 纯数据，不会导致程序终止。移动被拒绝时棋盘保持不变，
/// 由调用方决定如何把 `Display` 的文字展示给用户。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    RowOutOfBounds { end: RowEnd, row: usize },
    /// `max_index` 为 None 表示源行是空的
    CardIndexOutOfBounds { row: usize, card_index: usize, max_index: Option<usize> },
    CardNotVisible,
    SameRowMove,
    CannotMoveIntoStock,
    ChainIntoFoundation,
    SuitMismatch { card: Card, foundation: Suit },
    FoundationRequiresKingFirst,
    NonConsecutiveFoundationMove { card: Card, head: Card, expected: Card },
    NonConsecutiveTableauMove { card: Card, head: Card },
}

fn all_suit_glyphs() -> String {
    Suit::ALL.iter().map(|s| s.glyph()).collect()
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Violation::RowOutOfBounds { end, .. } => {
                let name = match end {
                    RowEnd::From => "from_row",
                    RowEnd::To => "to_row",
                };
                write!(f, "{} out of bounds. (0 <= row <= {})", name, ROW_COUNT - 1)
            }
            Violation::CardIndexOutOfBounds { row, max_index: Some(max), .. } => {
                write!(f, "Card index out of bounds. Max index for row {} is {}.", row, max)
            }
            Violation::CardIndexOutOfBounds { row, max_index: None, .. } => {
                write!(f, "Card index out of bounds. Row {} is empty.", row)
            }
            Violation::CardNotVisible => write!(f, "Selected card is not visible."),
            Violation::SameRowMove => write!(f, "Cannot move cards to the same row."),
            Violation::CannotMoveIntoStock => write!(f, "Cards cannot be moved into deck."),
            Violation::ChainIntoFoundation => {
                write!(f, "Cannot move more than one card at a time into {} rows.", all_suit_glyphs())
            }
            Violation::SuitMismatch { card, foundation } => {
                write!(f, "Cannot place {} into {} row.", card.face(), foundation)
            }
            Violation::FoundationRequiresKingFirst => {
                write!(f, "Cards with rank {} must be placed first into {} rows.", KING, all_suit_glyphs())
            }
            Violation::NonConsecutiveFoundationMove { card, head, expected } => write!(
                f,
                "Non-consecutive cards {} {}. (Expecting {})",
                card.face(),
                head.face(),
                expected.face()
            ),
            Violation::NonConsecutiveTableauMove { card, head } => {
                write!(f, "Non-consecutive cards {} {}.", card.face(), head.face())
            }
        }
    }
}

impl std::error::Error for Violation {}

/// 判断把 `from_row` 中从行首到 `card_index` 的牌链移到 `to_row` 是否合法。
///
/// 检查顺序很重要：前面的检查保证后面读取的下标一定有效。
/// 工作列之间只要求点数递减，不要求花色或颜色交替。
pub fn validate(board: &Board, from_row: usize, to_row: usize, card_index: usize) -> Result<(), Violation> {
    // 1-2. 行号范围
    let src = board
        .row(from_row)
        .ok_or(Violation::RowOutOfBounds { end: RowEnd::From, row: from_row })?;
    let dst = board
        .row(to_row)
        .ok_or(Violation::RowOutOfBounds { end: RowEnd::To, row: to_row })?;

    // 3. 牌的下标
    let card = *src.get(card_index).ok_or(Violation::CardIndexOutOfBounds {
        row: from_row,
        card_index,
        max_index: src.len().checked_sub(1),
    })?;

    // 4-6.
    if !card.visible {
        return Err(Violation::CardNotVisible);
    }
    if from_row == to_row {
        return Err(Violation::SameRowMove);
    }
    if to_row == STOCK_ROW {
        return Err(Violation::CannotMoveIntoStock);
    }

    // 7. 接龙行：只能单张、同花色、从 K 往 A 依次递减
    if is_foundation_row(to_row) {
        if card_index > 0 {
            return Err(Violation::ChainIntoFoundation);
        }
        let foundation = Suit::ALL[to_row - FOUNDATION_ROWS.start];
        if card.suit != foundation {
            return Err(Violation::SuitMismatch { card, foundation });
        }
        return match dst.front() {
            None if card.rank == KING => {
                tracing::debug!("check passed: king opens a foundation row");
                Ok(())
            }
            None => Err(Violation::FoundationRequiresKingFirst),
            Some(&head) if card.rank + 1 != head.rank => Err(Violation::NonConsecutiveFoundationMove {
                card,
                head,
                expected: Card::face_up(foundation, head.rank - 1),
            }),
            Some(_) => {
                tracing::debug!("check passed: foundation row valid move");
                Ok(())
            }
        };
    }

    // 8. 空工作列可以放任何牌链
    let Some(&head) = dst.front() else {
        tracing::debug!("check passed: destination row is empty");
        return Ok(());
    };

    // 9. 点数连续递减，不看花色
    if card.rank != head.rank + 1 {
        return Err(Violation::NonConsecutiveTableauMove { card, head });
    }
    tracing::debug!("check passed: tableau move");
    Ok(())
}

// --- 单元测试 ---
