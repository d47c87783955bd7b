use pcore::Chips;

/// The shape of an action without its chip amount, used for the
/// `action_request.options` wire list and for wire (de)serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fold => write!(f, "FOLD"),
            Self::Check => write!(f, "CHECK"),
            Self::Call => write!(f, "CALL"),
            Self::Bet => write!(f, "BET"),
            Self::Raise => write!(f, "RAISE"),
            Self::AllIn => write!(f, "ALL_IN"),
        }
    }
}

/// A validated action with its chip amount already resolved against the
/// legal range. `Call`/`Bet`/`AllIn` carry chips *added* to `street_bet`;
/// `Raise` carries the new `street_bet` total (matching how the client
/// names a raise — "raise to X" — and how `min_raise` math is framed).
/// `Blind` is never client-originated; the state machine posts it
/// directly at the start of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Action {
    Fold,
    Check,
    Call(Chips),
    Bet(Chips),
    Raise(Chips),
    AllIn(Chips),
    Blind(Chips),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Fold => ActionKind::Fold,
            Self::Check => ActionKind::Check,
            Self::Call(_) => ActionKind::Call,
            Self::Bet(_) => ActionKind::Bet,
            Self::Raise(_) => ActionKind::Raise,
            Self::AllIn(_) => ActionKind::AllIn,
            Self::Blind(_) => ActionKind::Call,
        }
    }

    pub fn is_aggro(&self) -> bool {
        matches!(self, Self::Bet(_) | Self::Raise(_) | Self::AllIn(_))
    }

    /// Chips this action moves from the seat's stack into `street_bet`,
    /// regardless of whether the amount is an increment or a new total.
    pub fn chips_added(&self, street_bet_before: Chips) -> Chips {
        match self {
            Self::Fold | Self::Check => 0,
            Self::Call(added) | Self::Bet(added) | Self::AllIn(added) | Self::Blind(added) => *added,
            Self::Raise(new_total) => (*new_total - street_bet_before).max(0),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fold => write!(f, "FOLD"),
            Self::Check => write!(f, "CHECK"),
            Self::Call(n) => write!(f, "CALL {n}"),
            Self::Bet(n) => write!(f, "BET {n}"),
            Self::Raise(n) => write!(f, "RAISE {n}"),
            Self::AllIn(n) => write!(f, "ALL_IN {n}"),
            Self::Blind(n) => write!(f, "BLIND {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_chips_added_is_the_increment_not_the_total() {
        let raise = Action::Raise(100);
        assert_eq!(raise.chips_added(20), 80);
    }

    #[test]
    fn call_chips_added_is_already_an_increment() {
        let call = Action::Call(40);
        assert_eq!(call.chips_added(0), 40);
    }
}
