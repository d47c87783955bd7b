//! Table-hosting server binary.
//!
//! Parses configuration, brings up logging and the two shutdown paths,
//! and runs the HTTP/WebSocket listener until one of them fires.

use clap::Parser;
use pcore::Config;
use engine::HandConfig;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    pcore::init_logging(&config);
    pcore::kys();
    pcore::brb();

    let state = hosting::AppState::new(config.ai_oracle_url.clone(), HandConfig::default(), &config.data_dir);
    hosting::run(&config.listen, state).await.expect("run hosting server");
}
