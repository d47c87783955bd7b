use super::rank::Rank;

/// A hand's category, carrying just enough rank information to break ties
/// between hands of the same category without consulting kickers (e.g. the
/// pair rank in `OnePair`, or both triplet/pair ranks in `FullHouse`).
///
/// Variant order is the category order: later variants outrank earlier
/// ones regardless of embedded ranks.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),
    OnePair(Rank),
    TwoPair(Rank, Rank),
    ThreeOAK(Rank),
    Straight(Rank),
    Flush(Rank),
    FullHouse(Rank, Rank),
    FourOAK(Rank),
    StraightFlush(Rank),
}

impl Ranking {
    /// How many kicker cards (beyond the embedded ranks) distinguish two
    /// hands of this category.
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::FourOAK(_) | Ranking::TwoPair(_, _) => 1,
            _ => 0,
        }
    }
    /// A 13-bit mask of ranks already spoken for by this category, so the
    /// kicker search can exclude them.
    pub fn claimed_mask(&self) -> u16 {
        match *self {
            Ranking::TwoPair(hi, lo) => u16::from(hi) | u16::from(lo),
            Ranking::HighCard(hi)
            | Ranking::OnePair(hi)
            | Ranking::FourOAK(hi)
            | Ranking::ThreeOAK(hi) => u16::from(hi),
            Ranking::FullHouse(..) | Ranking::StraightFlush(..) | Ranking::Straight(..) | Ranking::Flush(..) => 0,
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Ranking::HighCard(_) => "high card",
            Ranking::OnePair(_) => "one pair",
            Ranking::TwoPair(..) => "two pair",
            Ranking::ThreeOAK(_) => "three of a kind",
            Ranking::Straight(_) => "straight",
            Ranking::Flush(_) => "flush",
            Ranking::FullHouse(..) => "full house",
            Ranking::FourOAK(_) => "four of a kind",
            Ranking::StraightFlush(_) => "straight flush",
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::HighCard(r) => write!(f, "{} high", r),
            Ranking::OnePair(r) => write!(f, "pair of {}s", r),
            Ranking::TwoPair(hi, lo) => write!(f, "{}s and {}s", hi, lo),
            Ranking::ThreeOAK(r) => write!(f, "three {}s", r),
            Ranking::Straight(r) => write!(f, "{}-high straight", r),
            Ranking::Flush(r) => write!(f, "{}-high flush", r),
            Ranking::FullHouse(hi, lo) => write!(f, "{}s full of {}s", hi, lo),
            Ranking::FourOAK(r) => write!(f, "four {}s", r),
            Ranking::StraightFlush(r) => write!(f, "{}-high straight flush", r),
        }
    }
}
