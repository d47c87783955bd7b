use engine::{Action, LegalOptions};
use gameroom::GameStateData;

/// A pluggable decision source for a non-human seat. `AIDriver` holds
/// one of these per game and calls it whenever an AI-controlled seat
/// is owed a turn; `decide` must always return *some* action, so any
/// internal failure (timeout, transport error) is the implementation's
/// own job to substitute a deterministic fallback for — the caller
/// treats every return value as the seat's final choice.
#[async_trait::async_trait]
pub trait Player: Send + Sync {
    async fn decide(&mut self, view: &GameStateData, options: &LegalOptions) -> Action;
}
