pub mod context;
pub mod errors;
pub mod event;
pub mod message;
pub mod orchestrator;
pub mod registry;
pub mod snapshot;
pub mod timer;

pub use context::HandContext;
pub use errors::RoomError;
pub use event::{describe_action, describe_street_header, describe_win, now_millis, player_action_event, RoomEvent};
pub use message::{filter_for_recipient, ClientMessage, GameStateData, SeatView, ServerMessage};
pub use orchestrator::{prompt_next_actor, AnimationLatches, Broadcaster};
pub use registry::{GameRegistry, GameRoom, GameSnapshot};
pub use snapshot::Repository;
pub use timer::{Timer, TimerConfig};
