use super::hand::Hand;
use super::kickers::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::suit::Suit;

/// Evaluates a 5-7 card [`Hand`] into its best achievable [`Ranking`] and
/// tie-breaking [`Kickers`], working directly off rank/suit presence masks
/// rather than enumerating 5-card subsets.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl Evaluator {
    pub fn find_ranking(&self) -> Ranking {
        None.or_else(|| self.find_flush())
            .or_else(|| self.find_4_oak())
            .or_else(|| self.find_3_oak_2_oak())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_3_oak())
            .or_else(|| self.find_2_oak_2_oak())
            .or_else(|| self.find_2_oak())
            .or_else(|| self.find_1_oak())
            .expect("at least one card in hand")
    }

    pub fn find_kickers(&self, ranking: Ranking) -> Kickers {
        let n = ranking.n_kickers();
        if n == 0 {
            return Kickers::from(0u16);
        }
        let claimed = ranking.claimed_mask();
        let mut bits = self.rank_masks() & !claimed;
        while (bits.count_ones() as usize) > n {
            bits &= !(1 << bits.trailing_zeros());
        }
        Kickers::from(bits)
    }

    fn find_1_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(1).map(Ranking::HighCard)
    }
    fn find_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).map(Ranking::OnePair)
    }
    fn find_3_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).map(Ranking::ThreeOAK)
    }
    fn find_4_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(4).map(Ranking::FourOAK)
    }
    fn find_2_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).and_then(|hi| {
            self.find_rank_of_n_oak_under(2, Some(hi))
                .map(|lo| Ranking::TwoPair(hi, lo))
                .or(Some(Ranking::OnePair(hi)))
        })
    }
    fn find_3_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).and_then(|trips| {
            self.find_rank_of_n_oak_under(2, Some(trips))
                .map(|pair| Ranking::FullHouse(trips, pair))
        })
    }
    fn find_straight(&self) -> Option<Ranking> {
        Self::straight_high(self.rank_masks()).map(Ranking::Straight)
    }
    fn find_flush(&self) -> Option<Ranking> {
        self.flush_suit().and_then(|suit| {
            let bits = self.suit_masks()[suit as usize];
            Self::straight_high(bits)
                .map(Ranking::StraightFlush)
                .or_else(|| Some(Ranking::Flush(Rank::from(bits))))
        })
    }

    /// Highest rank of 5 consecutive set bits in a 13-bit mask, treating
    /// ace (bit 12) as low for the wheel (5-4-3-2-A) as well as high.
    fn straight_high(mask: u16) -> Option<Rank> {
        const WHEEL: u16 = 0b_1_0000_0000_1111;
        let mut bits = mask;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Rank::from(bits))
        } else if mask & WHEEL == WHEEL {
            Some(Rank::Five)
        } else {
            None
        }
    }

    fn flush_suit(&self) -> Option<Suit> {
        self.suit_counts()
            .iter()
            .position(|&n| n >= 5)
            .map(|i| Suit::from(i as u8))
    }

    fn find_rank_of_n_oak_under(&self, oak: usize, below: Option<Rank>) -> Option<Rank> {
        let ceiling = below.map(u8::from).unwrap_or(13) as u64;
        let hand = u64::from(self.0) & ((1u64 << (4 * ceiling)) - 1);
        let mut window = 0b1111_u64 << (4 * ceiling) >> 4;
        while window > 0 {
            if oak <= (hand & window).count_ones() as usize {
                return Some(Rank::from((window.trailing_zeros() / 4) as u8));
            }
            window >>= 4;
        }
        None
    }
    fn find_rank_of_n_oak(&self, n: usize) -> Option<Rank> {
        self.find_rank_of_n_oak_under(n, None)
    }

    fn rank_masks(&self) -> u16 {
        Vec::<super::card::Card>::from(self.0)
            .iter()
            .map(|c| u16::from(c.rank()))
            .fold(0, |acc, r| acc | r)
    }
    fn suit_counts(&self) -> [u8; 4] {
        Vec::<super::card::Card>::from(self.0)
            .iter()
            .map(|c| u8::from(c.suit()))
            .fold([0; 4], |mut counts, s| {
                counts[s as usize] += 1;
                counts
            })
    }
    fn suit_masks(&self) -> [u16; 4] {
        Vec::<super::card::Card>::from(self.0)
            .iter()
            .map(|c| (u8::from(c.suit()), u16::from(c.rank())))
            .fold([0; 4], |mut suits, (s, r)| {
                suits[s as usize] |= r;
                suits
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    fn evaluate(cards: Vec<(Rank, Suit)>) -> Ranking {
        let hand: Hand = cards.into_iter().map(Card::from).collect();
        Evaluator::from(hand).find_ranking()
    }

    #[test]
    fn high_card() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::King, Suit::H),
            (Rank::Queen, Suit::D),
            (Rank::Jack, Suit::C),
            (Rank::Nine, Suit::S),
        ];
        assert_eq!(evaluate(hand), Ranking::HighCard(Rank::Ace));
    }

    #[test]
    fn one_pair() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::King, Suit::D),
            (Rank::Queen, Suit::C),
            (Rank::Jack, Suit::S),
        ];
        assert_eq!(evaluate(hand), Ranking::OnePair(Rank::Ace));
    }

    #[test]
    fn two_pair() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::King, Suit::D),
            (Rank::King, Suit::C),
            (Rank::Queen, Suit::S),
        ];
        assert_eq!(evaluate(hand), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    fn wheel_straight_treats_ace_low() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Two, Suit::H),
            (Rank::Three, Suit::D),
            (Rank::Four, Suit::C),
            (Rank::Five, Suit::S),
        ];
        assert_eq!(evaluate(hand), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn broadway_straight_treats_ace_high() {
        let hand = vec![
            (Rank::Ten, Suit::S),
            (Rank::Jack, Suit::H),
            (Rank::Queen, Suit::D),
            (Rank::King, Suit::C),
            (Rank::Ace, Suit::S),
        ];
        assert_eq!(evaluate(hand), Ranking::Straight(Rank::Ace));
    }

    #[test]
    fn full_house_beats_flush() {
        let hand = vec![
            (Rank::King, Suit::S),
            (Rank::King, Suit::H),
            (Rank::King, Suit::D),
            (Rank::Queen, Suit::C),
            (Rank::Queen, Suit::S),
        ];
        assert_eq!(evaluate(hand), Ranking::FullHouse(Rank::King, Rank::Queen));
    }

    #[test]
    fn seven_card_hand_picks_best_five() {
        let hand = vec![
            (Rank::Two, Suit::C),
            (Rank::Seven, Suit::D),
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::Ace, Suit::D),
            (Rank::King, Suit::S),
            (Rank::King, Suit::H),
        ];
        assert_eq!(evaluate(hand), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn four_of_a_kind_beats_full_house() {
        let hand = vec![
            (Rank::Nine, Suit::C),
            (Rank::Nine, Suit::D),
            (Rank::Nine, Suit::H),
            (Rank::Nine, Suit::S),
            (Rank::King, Suit::S),
            (Rank::King, Suit::D),
            (Rank::Two, Suit::C),
        ];
        assert_eq!(evaluate(hand), Ranking::FourOAK(Rank::Nine));
    }

    #[test]
    fn strength_orders_by_ranking_then_kickers() {
        use crate::strength::Strength;
        let better: Hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::King, Suit::D),
            (Rank::Queen, Suit::C),
            (Rank::Jack, Suit::S),
        ]
        .into_iter()
        .map(Card::from)
        .collect();
        let worse: Hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::Two, Suit::D),
            (Rank::Three, Suit::C),
            (Rank::Four, Suit::S),
        ]
        .into_iter()
        .map(Card::from)
        .collect();
        assert!(Strength::from(better) > Strength::from(worse));
    }
}
