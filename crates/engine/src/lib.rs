pub mod action;
pub mod errors;
pub mod game;
pub mod pot;
pub mod result;
pub mod round;
pub mod seat;
pub mod turn;

pub use action::{Action, ActionKind};
pub use errors::EngineError;
pub use game::{ActionLogEntry, BettingStructure, Game, HandConfig, LegalOptions};
pub use pot::{build_pots, Pot};
pub use result::{AnimationSequence, GameActionResult, GameEvent};
pub use round::Round;
pub use seat::{Seat, SeatStatus};
pub use turn::{TurnController, TurnOutcome};
