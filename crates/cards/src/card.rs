use super::rank::Rank;
use super::suit::Suit;
use std::fmt::{Display, Formatter, Result};

/// A single playing card. Index `rank * 4 + suit` gives its position in
/// a 52-bit deck mask (see [`super::hand::Hand`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((rank, suit): (Rank, Suit)) -> Self {
        Self::new(rank, suit)
    }
}

impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        (c.rank as u8) * 4 + (c.suit as u8)
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        1 << u8::from(c)
    }
}

/// Wire encoding is `<rank><suit-letter>`, e.g. `AS`, `TD`, `2C`.
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        let s = s.trim();
        if s.len() < 2 {
            return Err(format!("card string too short: {s}"));
        }
        let (rank_str, suit_str) = s.split_at(s.len() - 1);
        let rank = Rank::try_from(rank_str)?;
        let suit = Suit::try_from(
            suit_str
                .chars()
                .next()
                .ok_or_else(|| "missing suit letter".to_string())?,
        )?;
        Ok(Self::new(rank, suit))
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u8() {
        let card = Card::new(Rank::Queen, Suit::H);
        assert_eq!(card, Card::from(u8::from(card)));
    }

    #[test]
    fn roundtrips_through_wire_string() {
        let card = Card::new(Rank::Ten, Suit::S);
        let encoded = card.to_string();
        assert_eq!(encoded, "10S");
        assert_eq!(card, Card::try_from(encoded.as_str()).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Card::try_from("Z9").is_err());
        assert!(Card::try_from("A").is_err());
    }
}
