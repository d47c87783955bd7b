use engine::{Action, ActionKind, LegalOptions};

/// The deterministic substitute an oracle timeout or error falls back
/// to: CHECK when it's free, otherwise FOLD. Never random, so a flaky
/// oracle produces the same hand history on every replay.
pub fn deterministic_fallback(options: &LegalOptions) -> Action {
    if options.kinds.contains(&ActionKind::Check) {
        Action::Check
    } else {
        Action::Fold
    }
}

/// True if `action` is one of `options`'s legal choices with a chip
/// amount inside its allowed range.
pub fn is_legal(action: Action, options: &LegalOptions) -> bool {
    match action {
        Action::Fold => true,
        Action::Check => options.kinds.contains(&ActionKind::Check),
        Action::Call(n) => options.kinds.contains(&ActionKind::Call) && n == options.call_amount,
        Action::Bet(n) => {
            options.kinds.contains(&ActionKind::Bet) && n >= options.min_total && n <= options.max_total
        }
        Action::Raise(n) => {
            options.kinds.contains(&ActionKind::Raise) && n >= options.min_total && n <= options.max_total
        }
        Action::AllIn(n) => options.kinds.contains(&ActionKind::AllIn) && n == options.max_total,
        Action::Blind(_) => false,
    }
}

/// Coerces an illegal choice into a legal one, preferring
/// CHECK -> CALL -> FOLD in that order.
pub fn coerce_legal(action: Action, options: &LegalOptions) -> Action {
    if is_legal(action, options) {
        return action;
    }
    if options.kinds.contains(&ActionKind::Check) {
        Action::Check
    } else if options.kinds.contains(&ActionKind::Call) {
        Action::Call(options.call_amount)
    } else {
        Action::Fold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(kinds: &[ActionKind], call_amount: i64) -> LegalOptions {
        LegalOptions { kinds: kinds.to_vec(), call_amount, min_total: 20, max_total: 1000 }
    }

    #[test]
    fn fallback_prefers_check_when_free() {
        let opts = options(&[ActionKind::Fold, ActionKind::Check, ActionKind::Bet, ActionKind::AllIn], 0);
        assert_eq!(deterministic_fallback(&opts), Action::Check);
    }

    #[test]
    fn fallback_folds_when_check_is_not_legal() {
        let opts = options(&[ActionKind::Fold, ActionKind::Call, ActionKind::Raise, ActionKind::AllIn], 20);
        assert_eq!(deterministic_fallback(&opts), Action::Fold);
    }

    #[test]
    fn coerce_passes_through_an_already_legal_action() {
        let opts = options(&[ActionKind::Fold, ActionKind::Call, ActionKind::Raise, ActionKind::AllIn], 20);
        assert_eq!(coerce_legal(Action::Call(20), &opts), Action::Call(20));
    }

    #[test]
    fn coerce_downgrades_an_illegal_raise_to_a_call() {
        let opts = options(&[ActionKind::Fold, ActionKind::Call, ActionKind::Raise, ActionKind::AllIn], 20);
        // raise amount below min_total is illegal; call is next in the preference order
        assert_eq!(coerce_legal(Action::Raise(5), &opts), Action::Call(20));
    }

    #[test]
    fn coerce_falls_all_the_way_to_fold_when_nothing_else_is_legal() {
        let opts = options(&[ActionKind::Fold, ActionKind::AllIn], 20);
        assert_eq!(coerce_legal(Action::Bet(50), &opts), Action::Fold);
    }
}
