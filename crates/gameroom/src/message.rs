use pcore::{Chips, Position};
use engine::{ActionKind, Game, Pot, Seat};
use serde::{Deserialize, Serialize};

/// One seat's public shape inside a `game_state`/`chips_distributed`
/// payload. `hole_cards` is filled in or nulled out by
/// [`crate::hub::filter_for_recipient`] depending on the recipient.
#[derive(Clone, Debug, Serialize)]
pub struct SeatView {
    pub position: Position,
    pub display_name: String,
    pub is_human: bool,
    pub chips: Chips,
    pub hole_cards: Option<[String; 2]>,
    pub street_bet: Chips,
    pub hand_bet: Chips,
    pub status: &'static str,
}

impl SeatView {
    /// Always includes hole cards when the seat has them. Per-recipient
    /// nulling happens downstream, once per connection, in
    /// `ConnectionHub::broadcast` — this lets one canonical snapshot
    /// serve every subscriber of a game.
    pub fn from_seat(seat: &Seat) -> Self {
        Self {
            position: seat.position,
            display_name: seat.display_name.clone(),
            is_human: seat.is_human,
            chips: seat.chips,
            hole_cards: seat.hole_cards.map(|h| [h[0].to_string(), h[1].to_string()]),
            street_bet: seat.street_bet,
            hand_bet: seat.hand_bet,
            status: match seat.status {
                engine::SeatStatus::Waiting => "WAITING",
                engine::SeatStatus::Active => "ACTIVE",
                engine::SeatStatus::Folded => "FOLDED",
                engine::SeatStatus::AllIn => "ALL_IN",
                engine::SeatStatus::Out => "OUT",
            },
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PotView {
    pub pot_id: usize,
    pub name: String,
    pub amount: Chips,
    pub eligible: Vec<Position>,
}

impl PotView {
    pub fn from_pot(index: usize, pot: &Pot) -> Self {
        Self {
            pot_id: index,
            name: Pot::name(index),
            amount: pot.amount,
            eligible: pot.eligible.iter().copied().collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GameStateData {
    pub hand_number: u64,
    pub seats: Vec<SeatView>,
    pub community_cards: Vec<String>,
    pub pots: Vec<PotView>,
    pub current_round: String,
    pub button_position: Position,
    pub current_actor_index: Option<Position>,
    pub current_bet: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub action_history: Vec<String>,
}

impl GameStateData {
    /// Snapshots the whole table with every dealt hole card present;
    /// `ConnectionHub::broadcast` nulls out everyone but the recipient
    /// before a `game_state`/`chips_distributed` frame goes out.
    pub fn from_game(game: &Game) -> Self {
        Self {
            hand_number: game.hand_number,
            seats: game.seats.iter().map(SeatView::from_seat).collect(),
            community_cards: game.community.iter().map(|c| c.to_string()).collect(),
            pots: game.pots.iter().enumerate().map(|(i, p)| PotView::from_pot(i, p)).collect(),
            current_round: game.round.to_string(),
            button_position: game.button,
            current_actor_index: game.current_actor(),
            current_bet: game.current_bet,
            small_blind: game.config.small_blind,
            big_blind: game.config.big_blind,
            ante: game.config.ante,
            action_history: game
                .action_log
                .iter()
                .map(|e| format!("seat {}: {}", e.position, e.action))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ActionRequestData {
    pub hand_id: u64,
    pub seat_id: Position,
    pub options: Vec<ActionKind>,
    pub call_amount: Chips,
    pub min_raise: Chips,
    pub max_raise: Chips,
    pub time_limit: u64,
    pub timestamp: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerActionData {
    pub seat_id: Position,
    pub action: String,
    pub amount: Chips,
    pub timestamp: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct SeatBet {
    pub seat_id: Position,
    pub amount: Chips,
}

#[derive(Clone, Debug, Serialize)]
pub struct SeatHand {
    pub seat_id: Position,
    pub cards: [String; 2],
}

#[derive(Clone, Debug, Serialize)]
pub struct PotWinner {
    pub seat_id: Position,
    pub hand_rank: String,
    pub share: Chips,
}

#[derive(Clone, Debug, Serialize)]
pub struct PotResult {
    pub pot_id: usize,
    pub amount: Chips,
    pub winners: Vec<PotWinner>,
}

/// Every payload the server ever sends, tagged by `type` per the wire
/// table — a client need only switch on `type` to dispatch.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState(GameStateData),
    ActionRequest(ActionRequestData),
    PlayerAction(PlayerActionData),
    ActionLog { text: String, timestamp: u64 },
    TurnHighlightRemoved { seat_id: Position },
    RoundBetsFinalized {
        player_bets: Vec<SeatBet>,
        pot: Chips,
        timestamp: u64,
    },
    StreetDealt {
        street: String,
        cards: Vec<String>,
        timestamp: u64,
    },
    ShowdownTransition { timestamp: u64 },
    ShowdownHandsRevealed { player_hands: Vec<SeatHand> },
    PotWinnersDetermined { pots: Vec<PotResult> },
    ChipsDistributed(GameStateData),
    HandResult {
        hand_id: u64,
        winners: Vec<PotWinner>,
        players: Vec<Position>,
        board: Vec<String>,
        timestamp: u64,
    },
    HandVisuallyConcluded { timestamp: u64 },
    Keepalive { timestamp: u64 },
    Pong { timestamp: u64 },
    Error { code: &'static str, message: String },
    Chat { from: String, text: String, timestamp: u64 },
}

/// Nulls every seat's hole cards except `recipient`'s — an observer
/// (`recipient = None`) sees none at all. `ConnectionHub::broadcast`
/// routes every `game_state`/`chips_distributed` frame through this
/// per recipient; `AIDriver` uses it to build a non-human seat's view.
pub fn filter_for_recipient(data: &mut GameStateData, recipient: Option<Position>) {
    for seat in &mut data.seats {
        if Some(seat.position) != recipient {
            seat.hole_cards = None;
        }
    }
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

/// Inbound payload shapes, matching `ClientMessage::Action`'s
/// `{action, amount}` pair exactly as the wire table specifies.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Action { action: ActionKind, amount: Option<Chips> },
    Chat { text: String, target: Option<Position> },
    Ping { timestamp: u64, needs_refresh: Option<bool> },
    AnimationDone { step_type: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_tags_by_snake_case_type() {
        let msg = ServerMessage::Pong { timestamp: 42 };
        let json = msg.to_json();
        assert!(json.contains("\"type\":\"pong\""));
        assert!(json.contains("42"));
    }

    #[test]
    fn client_message_parses_action_with_amount() {
        let raw = r#"{"type":"action","action":"RAISE","amount":80}"#;
        let parsed: ClientMessage = serde_json::from_str(raw).unwrap();
        match parsed {
            ClientMessage::Action { action, amount } => {
                assert_eq!(action, ActionKind::Raise);
                assert_eq!(amount, Some(80));
            }
            _ => panic!("expected Action"),
        }
    }

    #[test]
    fn client_message_parses_animation_done() {
        let raw = r#"{"type":"animation_done","step_type":"hand_visually_concluded"}"#;
        let parsed: ClientMessage = serde_json::from_str(raw).unwrap();
        assert!(matches!(parsed, ClientMessage::AnimationDone { step_type } if step_type == "hand_visually_concluded"));
    }

    #[test]
    fn from_game_carries_every_dealt_hole_card() {
        let seats = vec![Seat::new(0, "a", true, 1000), Seat::new(1, "b", true, 1000)];
        let mut game = engine::Game::new(seats, 0, engine::HandConfig::default());
        game.start_hand();
        let data = GameStateData::from_game(&game);
        assert!(data.seats.iter().all(|s| s.hole_cards.is_some()));
    }

    #[test]
    fn filter_for_recipient_nulls_every_seat_but_the_recipient() {
        let seats = vec![Seat::new(0, "a", true, 1000), Seat::new(1, "b", true, 1000)];
        let mut game = engine::Game::new(seats, 0, engine::HandConfig::default());
        game.start_hand();
        let mut data = GameStateData::from_game(&game);
        filter_for_recipient(&mut data, Some(0));
        assert!(data.seats[0].hole_cards.is_some());
        assert!(data.seats[1].hole_cards.is_none());
    }

    #[test]
    fn filter_for_recipient_nulls_everyone_for_an_observer() {
        let seats = vec![Seat::new(0, "a", true, 1000), Seat::new(1, "b", true, 1000)];
        let mut game = engine::Game::new(seats, 0, engine::HandConfig::default());
        game.start_hand();
        let mut data = GameStateData::from_game(&game);
        filter_for_recipient(&mut data, None);
        assert!(data.seats.iter().all(|s| s.hole_cards.is_none()));
    }
}
