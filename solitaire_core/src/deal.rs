use crate::board::{Board, Row, ROW_COUNT, STOCK_ROW, TABLEAU_ROWS};
use crate::card::{Card, DECK_SIZE};
use rand::Rng;
use rand::prelude::SliceRandom;

// --- 洗牌与发牌 ---

/// 生成 `n` 张互不相同的牌并随机打乱。
///
/// 第 i 张牌的花色是 i / 13，点数是 i % 13 + 1。
///
/// # Panics
/// 如果 `n` 超过 52，则会 panic。
pub fn shuffle_deck<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Card> {
    assert!(n <= DECK_SIZE, "一副牌最多只有 {} 张", DECK_SIZE);
    let mut deck: Vec<Card> = (0..n).map(Card::from_index).collect();
    deck.shuffle(rng);
    deck
}

/// 把洗好的 52 张牌按经典阶梯形发到 12 行上。
///
/// - 工作列 5..=11 依次拿到 1..=7 张连续的牌 (共 28 张)
/// - 剩下的 24 张进入牌堆行
/// - 接龙行为空
/// - 第 4..=11 行的行首翻成正面，其余全部背面朝上
///
/// # Panics
/// 如果传入的牌不是正好 52 张，则会 panic。
pub fn deal(shuffled: Vec<Card>) -> Board {
    assert_eq!(shuffled.len(), DECK_SIZE, "发牌需要正好 {} 张牌", DECK_SIZE);

    let mut rows: [Row; ROW_COUNT] = Default::default();
    let mut cards = shuffled.into_iter().map(|mut card| {
        card.visible = false;
        card
    });

    // 第 5 行 1 张，第 6 行 2 张 …… 第 11 行 7 张
    for (count, row) in TABLEAU_ROWS.enumerate() {
        rows[row] = cards.by_ref().take(count + 1).collect();
    }
    rows[STOCK_ROW] = cards.collect();

    for row in &mut rows[STOCK_ROW..] {
        if let Some(head) = row.front_mut() {
            head.visible = true;
        }
    }

    tracing::debug!(stock = rows[STOCK_ROW].len(), "dealt a new board");
    Board::from_rows(rows)
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::FOUNDATION_ROWS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_shuffle_deck_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = shuffle_deck(DECK_SIZE, &mut rng);
        let unique: HashSet<Card> = deck.iter().copied().collect();
        assert_eq!(deck.len(), DECK_SIZE);
        assert_eq!(unique.len(), DECK_SIZE);
        assert!(deck.iter().all(|c| !c.visible));
    }

    #[test]
    fn test_shuffle_deck_partial_and_seeded() {
        let small = shuffle_deck(13, &mut StdRng::seed_from_u64(1));
        let clubs: HashSet<Card> = small.into_iter().collect();
        assert_eq!(clubs, (0..13).map(Card::from_index).collect());

        let a = shuffle_deck(DECK_SIZE, &mut StdRng::seed_from_u64(99));
        let b = shuffle_deck(DECK_SIZE, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic]
    fn test_shuffle_deck_rejects_oversized_deck() {
        shuffle_deck(DECK_SIZE + 1, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn test_deal_shape_and_visibility() {
        let board = deal(shuffle_deck(DECK_SIZE, &mut StdRng::seed_from_u64(2024)));
        let lengths: Vec<usize> = board.rows().iter().map(|r| r.len()).collect();
        assert_eq!(lengths, vec![0, 0, 0, 0, 24, 1, 2, 3, 4, 5, 6, 7]);

        for row in FOUNDATION_ROWS {
            assert!(board.row(row).unwrap().is_empty());
        }
        for row in STOCK_ROW..ROW_COUNT {
            let cards = board.row(row).unwrap();
            assert!(cards[0].visible, "row {} head should be face up", row);
            assert!(cards.iter().skip(1).all(|c| !c.visible), "row {} should be hidden below head", row);
        }
    }

    #[test]
    fn test_deal_uses_contiguous_slices() {
        let ordered: Vec<Card> = (0..DECK_SIZE).map(Card::from_index).collect();
        let board = deal(ordered.clone());
        assert_eq!(board.head(5), Some(&ordered[0]));
        let row6: Vec<Card> = board.row(6).unwrap().iter().copied().collect();
        assert_eq!(row6, ordered[1..3].to_vec());
        let row11: Vec<Card> = board.row(11).unwrap().iter().copied().collect();
        assert_eq!(row11, ordered[21..28].to_vec());
        let stock: Vec<Card> = board.row(STOCK_ROW).unwrap().iter().copied().collect();
        assert_eq!(stock, ordered[28..].to_vec());
    }

    #[test]
    #[should_panic]
    fn test_deal_requires_full_deck() {
        deal(shuffle_deck(51, &mut StdRng::seed_from_u64(3)));
    }
}
