use crate::hub::ConnectionHub;
use engine::HandConfig;
use gameroom::{AnimationLatches, GameRegistry, GameSnapshot, HandContext, Repository, TimerConfig};
use players::{AIDriver, OraclePlayer};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Everything a route handler or session task needs, shared across
/// every actix-web worker behind one `web::Data` (itself `Arc`-backed).
pub struct AppState {
    pub registry: GameRegistry,
    pub hub: ConnectionHub,
    pub latches: AnimationLatches,
    pub timers: TimerConfig,
    pub ai: Mutex<AIDriver<OraclePlayer>>,
    pub default_hand_config: HandConfig,
    pub games: Mutex<Repository<GameSnapshot>>,
    pub hands: Mutex<Repository<HandContext>>,
}

impl AppState {
    pub fn new(oracle_url: impl Into<String>, default_hand_config: HandConfig, data_dir: impl AsRef<Path>) -> Self {
        let data_dir: PathBuf = data_dir.as_ref().to_path_buf();
        Self {
            registry: GameRegistry::new(),
            hub: ConnectionHub::new(),
            latches: AnimationLatches::new(),
            timers: TimerConfig::default(),
            ai: Mutex::new(AIDriver::new(OraclePlayer::new(oracle_url))),
            default_hand_config,
            games: Mutex::new(Repository::open(&data_dir, "games")),
            hands: Mutex::new(Repository::open(&data_dir, "hands")),
        }
    }
}
