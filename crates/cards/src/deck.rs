use super::card::Card;
use rand::seq::SliceRandom;
use rand::rng;

/// A 52-card deck, shuffled once at construction and drawn from the top.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        let mut cards: Vec<Card> = (0..52).map(Card::from).collect();
        cards.shuffle(&mut rng());
        Self { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deals_fifty_two_distinct_cards() {
        let mut deck = Deck::new();
        let mut seen = std::collections::HashSet::new();
        let mut count = 0;
        while let Some(card) = deck.draw() {
            assert!(seen.insert(card));
            count += 1;
        }
        assert_eq!(count, 52);
    }
}
