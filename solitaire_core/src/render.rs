use crate::board::{Board, Row, FOUNDATION_ROWS, STOCK_ROW, TABLEAU_ROWS};
use crate::card::{Suit, STOCK_GLYPH};

/// 渲染选项
///
/// `reveal_all` 是调试用的显示开关：把所有牌按正面显示。
/// 它只影响输出的文字，不会改变任何牌的朝向，也不影响走法判断。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub reveal_all: bool,
}

fn render_row(row: &Row, options: RenderOptions) -> String {
    row.iter()
        .map(|card| if options.reveal_all { card.face() } else { card.to_string() })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 把棋盘渲染成固定格式的文字，前端依赖这个格式，不要随意改动：
///
/// ```text
/// ♣(0): ♣1 ♣2
/// ♦(1):
/// ♥(2):
/// ♠(3):
///   🂠  (4): ♥7 * * *
/// row0(5): ♠13
/// row1(6): ♦1 *
/// ...
/// row6(11): ♦6 * * * * * *
/// ```
///
/// 每行冒号后固定有一个空格 (即使该行为空)，行与行之间用 `\n` 分隔，末尾没有换行。
pub fn render(board: &Board, options: RenderOptions) -> String {
    let line = |row: usize| board.row(row).map(|r| render_row(r, options)).unwrap_or_default();

    let mut lines: Vec<String> = FOUNDATION_ROWS
        .map(|row| format!("{}({}): {}", Suit::ALL[row], row, line(row)))
        .collect();
    lines.push(format!("  {}  ({}): {}", STOCK_GLYPH, STOCK_ROW, line(STOCK_ROW)));
    for row in TABLEAU_ROWS {
        lines.push(format!("row{}({}): {}", row - TABLEAU_ROWS.start, row, line(row)));
    }
    lines.join("\n")
}

// --- 单元测试 ---
