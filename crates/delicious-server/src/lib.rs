//! delicious-server: the HTTP face of the store directory.
//!
//! [`router`] wires every endpoint onto an [`AppState`]; [`serve`] binds it
//! and runs until Ctrl+C or SIGTERM.

pub mod auth;
pub mod error;
pub mod mail;
pub mod photos;
pub mod routes;
pub mod seed;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::{services::ServeDir, trace::TraceLayer};

use routes::{account, hearts, reviews, search, stores};

pub use error::ApiError;
pub use state::AppState;

/// Uploads larger than this are refused before they reach the photo intake.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.photos.dir());

    Router::new()
        .route("/api/search", get(search::search_stores))
        .route("/api/stores/near", get(search::map_stores))
        .route("/stores/within", get(search::map_stores))
        .route("/stores", get(stores::list_stores).post(stores::create_store))
        .route("/store/{slug}", get(stores::store_by_slug))
        .route("/stores/{id}", post(stores::update_store))
        .route("/stores/{id}/edit", get(stores::edit_store))
        .route("/stores/{id}/photo", post(stores::upload_photo))
        .route("/tags", get(stores::all_tags))
        .route("/tags/{tag}", get(stores::stores_by_tag))
        .route("/api/stores/{id}/heart", post(hearts::heart_store))
        .route("/hearts", get(hearts::hearted_stores))
        .route("/reviews/{id}", post(reviews::add_review))
        .route("/top", get(reviews::top_stores))
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/account/forgot", post(account::forgot))
        .route(
            "/account/reset/{token}",
            get(account::reset_form).post(account::update_password),
        )
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until a shutdown signal arrives.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let address = state.config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(%address, "server: listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server: stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("server: received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "server: could not listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("server: received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "server: could not install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
