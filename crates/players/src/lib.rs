pub mod fallback;
pub mod oracle;
pub mod player;

pub use fallback::{coerce_legal, deterministic_fallback, is_legal};
pub use oracle::{AIDriver, OraclePlayer};
pub use player::Player;
