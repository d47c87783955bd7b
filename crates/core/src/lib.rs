//! Identifiers, dimensional type aliases, table constants, and the
//! process bootstrap (logging + shutdown + configuration) shared by
//! every other crate in the workspace.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/// Chip amount. Signed so that intermediate deltas (e.g. a rake skim
/// subtracted from a pot) can be computed without underflow checks.
pub type Chips = i64;

/// 0-indexed seat position around the table, stable for one hand.
pub type Position = usize;

/// Monotonic sequence number for an append-only log (action_log entries).
pub type Epoch = u64;

/// Smallest and largest table sizes this server seats.
pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 9;

/// Default cash-game blind/stack parameters, used when a game is
/// created without explicit stakes.
pub const DEFAULT_SMALL_BLIND: Chips = 1;
pub const DEFAULT_BIG_BLIND: Chips = 2;
pub const DEFAULT_STACK: Chips = 100 * DEFAULT_BIG_BLIND;

/// Rake parameters (cash games only).
pub const DEFAULT_RAKE_PERCENT: f64 = 0.05;
pub const DEFAULT_RAKE_CAP_BB: Chips = 3;
pub const NO_RAKE_THRESHOLD_BB: Chips = 10;

/// Timeouts, in seconds, for the pieces of the system that suspend.
pub const DECISION_TIMEOUT_SECS: u64 = 30;
pub const SHOWDOWN_TIMEOUT_SECS: u64 = 5;
pub const ANIMATION_FALLBACK_MILLIS: u64 = 1_000;
pub const AI_ORACLE_TIMEOUT_MILLIS: u64 = 5_000;
pub const IDLE_KEEPALIVE_SECS: u64 = 30;
pub const IDLE_CLOSE_SECS: u64 = 120;
pub const SEND_TO_SEAT_RETRIES: usize = 2;

/// A phantom-typed wrapper around a UUID, so `ID<Game>` and `ID<Hand>`
/// cannot be mixed up at compile time even though both are just a
/// `Uuid` at runtime.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ID<T> {
    inner: uuid::Uuid,
    #[serde(skip)]
    marker: PhantomData<fn() -> T>,
}

impl<T> ID<T> {
    pub fn new(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
    /// Re-tags an id as belonging to a different entity type, for the
    /// rare case where one underlying uuid genuinely identifies two
    /// related records (e.g. a room id doubling as its first game id).
    pub fn cast<U>(self) -> ID<U> {
        ID::new(self.inner)
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::new(uuid::Uuid::now_v7())
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}
impl<T> Eq for ID<T> {}
impl<T> Hash for ID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state)
    }
}
impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
impl<T> std::fmt::Display for ID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
impl<T> std::str::FromStr for ID<T> {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self::new)
    }
}

/// Trait for generating arbitrary values, used by property-style tests
/// that need a quick randomized fixture rather than a hand-built one.
pub trait Arbitrary {
    fn random() -> Self;
}

#[cfg(feature = "server")]
mod bootstrap {
    use super::*;

    /// Resolved server configuration: CLI flags win over environment,
    /// environment wins over the built-in defaults. No global statics —
    /// this is threaded explicitly through constructors by the binary.
    #[derive(clap::Parser, Debug, Clone)]
    #[command(name = "server", about = "Texas Hold'em orchestration server")]
    pub struct Config {
        /// Address to bind the WebSocket/HTTP listener on.
        #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
        pub listen: String,

        /// Directory for snapshot persistence and log files.
        #[arg(long, env = "DATA_DIR", default_value = "./data")]
        pub data_dir: std::path::PathBuf,

        /// Minimum log level (error, warn, info, debug, trace).
        #[arg(long, default_value = "info")]
        pub log_level: String,

        /// Base URL of the external AI decision oracle.
        #[arg(long, env = "AI_ORACLE_URL", default_value = "http://127.0.0.1:9000")]
        pub ai_oracle_url: String,
    }

    impl Config {
        pub fn resolved_log_level(&self) -> log::LevelFilter {
            if std::env::var("DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
                return log::LevelFilter::Debug;
            }
            match self.log_level.to_lowercase().as_str() {
                "error" => log::LevelFilter::Error,
                "warn" => log::LevelFilter::Warn,
                "debug" => log::LevelFilter::Debug,
                "trace" => log::LevelFilter::Trace,
                _ => log::LevelFilter::Info,
            }
        }
    }

    /// Initializes the dual terminal + rotated-file logger. Creates
    /// `<data_dir>/logs` if missing.
    pub fn init_logging(config: &Config) {
        let level = config.resolved_log_level();
        let logs_dir = config.data_dir.join("logs");
        std::fs::create_dir_all(&logs_dir).expect("create logs directory");
        let lcfg = simplelog::ConfigBuilder::new()
            .set_location_level(log::LevelFilter::Off)
            .set_target_level(log::LevelFilter::Off)
            .build();
        let time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs();
        let file = simplelog::WriteLogger::new(
            log::LevelFilter::Debug,
            lcfg.clone(),
            std::fs::File::create(logs_dir.join(format!("{time}.log")))
                .expect("create log file"),
        );
        let term = simplelog::TermLogger::new(
            level,
            lcfg,
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        );
        simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
    }

    /// Spawns the "kill yourself" task: a single Ctrl-C forces a clean
    /// process exit. A second signal handler (`brb`, "be right back") is
    /// registered separately so a double interrupt always wins even if
    /// orchestration is mid-flight and not polling for shutdown.
    pub fn kys() {
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.expect("listen for ctrl-c");
            log::warn!("received interrupt, shutting down");
            std::process::exit(0);
        });
    }

    /// Secondary shutdown path: typing a bare "q" on stdin exits even
    /// when the terminal isn't forwarding signals (e.g. under a process
    /// supervisor that swallows Ctrl-C).
    pub fn brb() {
        std::thread::spawn(|| {
            let mut line = String::new();
            loop {
                line.clear();
                if std::io::stdin().read_line(&mut line).is_err() {
                    return;
                }
                if line.trim().eq_ignore_ascii_case("q") {
                    log::warn!("quit command received, shutting down");
                    std::process::exit(0);
                }
            }
        });
    }
}

#[cfg(feature = "server")]
pub use bootstrap::*;

#[cfg(test)]
mod tests {
    use super::*;

    struct Game;
    struct Hand;

    #[test]
    fn ids_are_distinct_types_same_repr() {
        let g: ID<Game> = ID::default();
        let h: ID<Hand> = g.cast();
        assert_eq!(g.to_string(), h.to_string());
    }

    #[test]
    fn id_roundtrips_through_string() {
        let id: ID<Game> = ID::default();
        let parsed: ID<Game> = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn ids_are_unique() {
        let a: ID<Game> = ID::default();
        let b: ID<Game> = ID::default();
        assert_ne!(a, b);
    }
}
