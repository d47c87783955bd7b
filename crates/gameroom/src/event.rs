use pcore::{Chips, Position};
use engine::{Action, GameActionResult};

/// One step of the ordered notification sequence §4.4 produces from a
/// single applied action. `EventOrchestrator::run` walks these in order,
/// translating each to a [`crate::message::ServerMessage`] and handing it
/// to the hub; some steps carry a wait key the orchestrator blocks on.
#[derive(Clone, Debug)]
pub enum RoomEvent {
    PlayerAction { seat: Position, action: Action, pot: Chips },
    ActionLog { text: String },
    TurnHighlightRemoved { seat: Position },
    RoundBetsFinalized { wait_key: &'static str },
    StreetDealt { street: cards::Street, wait_key: String },
    ShowdownTransition,
    ShowdownHandsRevealed,
    PotWinnersDetermined,
    ChipsDistributed,
    HandResult,
    ActionRequestFor { seat: Position },
}

/// Human-readable phrasing for `action_log.text`, matching the external
/// interfaces table exactly. All-in phrasing is reserved for a literal
/// `Action::AllIn` — a `Call` that happens to exhaust the caller's stack
/// still reads as an ordinary call.
pub fn describe_action(display_name: &str, action: Action, post_street_bet: Chips, post_hand_bet: Chips) -> String {
    match action {
        Action::Fold => format!("{display_name} folds"),
        Action::Check => format!("{display_name} checks"),
        Action::Call(amount) => format!("{display_name} calls {amount} (to {post_street_bet} total)"),
        Action::Bet(amount) => format!("{display_name} bets {amount}"),
        Action::Raise(_) => format!("{display_name} raises to {post_street_bet}"),
        Action::AllIn(amount) => format!("{display_name} all-in for {amount} (total {post_hand_bet})"),
        Action::Blind(amount) => format!("{display_name} posts {amount}"),
    }
}

/// Milliseconds-since-epoch stamp for every outbound wire message.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_millis() as u64
}

pub fn describe_win(display_name: &str, amount: Chips, hand_description: &str) -> String {
    format!("\u{1f3c6} {display_name} wins {amount} with {hand_description}!")
}

pub fn describe_street_header(street: cards::Street, cards: &[cards::Card]) -> String {
    let label = match street {
        cards::Street::Flop => "Flop",
        cards::Street::Turn => "Turn",
        cards::Street::River => "River",
        cards::Street::Preflop => "Preflop",
    };
    let rendered: Vec<String> = cards.iter().map(|c| c.to_string()).collect();
    format!("*** Dealing the {label}: [{}] ***", rendered.join(", "))
}

/// Convenience for building the [`RoomEvent::PlayerAction`] step directly
/// from the state machine's result, since every caller needs this pair.
pub fn player_action_event(result: &GameActionResult, pot_total: Chips) -> RoomEvent {
    RoomEvent::PlayerAction {
        seat: result.acting_seat,
        action: result.action,
        pot: pot_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_and_check_have_no_amount() {
        assert_eq!(describe_action("Ann", Action::Fold, 0, 0), "Ann folds");
        assert_eq!(describe_action("Ann", Action::Check, 20, 20), "Ann checks");
    }

    #[test]
    fn raise_reports_the_street_total_not_the_increment() {
        let text = describe_action("Bo", Action::Raise(80), 80, 80);
        assert_eq!(text, "Bo raises to 80");
    }

    #[test]
    fn a_covering_call_keeps_ordinary_call_phrasing_even_though_it_exhausts_the_stack() {
        let text = describe_action("Cy", Action::Call(10), 30, 30);
        assert_eq!(text, "Cy calls 10 (to 30 total)");
    }

    #[test]
    fn a_literal_all_in_action_gets_all_in_phrasing_even_if_it_does_not_cover() {
        let text = describe_action("Cy", Action::AllIn(10), 30, 30);
        assert_eq!(text, "Cy all-in for 10 (total 30)");
    }

    #[test]
    fn win_line_includes_the_trophy_emoji() {
        let text = describe_win("Dee", 600, "a full house, Kings full of Queens");
        assert!(text.starts_with('\u{1f3c6}'));
        assert!(text.contains("wins 600"));
    }
}
