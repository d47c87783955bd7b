//! Connection hub, per-subscriber session loop, and HTTP/WebSocket
//! route wiring for a live poker table.
//!
//! ## Submodules
//!
//! - [`hub`] — fan-out registry of every subscriber of every game
//! - [`session`] — pure message dispatch, independent of the socket
//! - [`handlers`] — actix-web routes and the actix-ws bridge loop
//! - [`state`] — the shared application state handlers close over

pub mod handlers;
pub mod hub;
pub mod session;
pub mod state;

pub use hub::{ConnectionHub, SubscriberId};
pub use state::AppState;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

/// Builds and runs the HTTP/WebSocket server until the process is
/// told to stop. `state` is shared across every worker behind one
/// `web::Data` (itself `Arc`-backed internally).
pub async fn run(listen: &str, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    log::info!("starting hosting server on {listen}");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/rooms")
                    .route("", web::post().to(handlers::create_room))
                    .route("/{game_id}/sit", web::post().to(handlers::sit))
                    .route("/{game_id}/start", web::post().to(handlers::start_hand))
                    .route("/{game_id}/connect", web::get().to(handlers::connect)),
            )
    })
    .bind(listen)?
    .run()
    .await
}
