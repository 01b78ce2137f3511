//! delicious typeahead: incremental store search in the terminal.
//!
//! Every keystroke in the search box queries the server's `/api/search`
//! endpoint; the latest answer is rendered into the results pane, arrow keys
//! move the highlight and Enter opens the store page in a browser.

pub mod app;
pub mod client;
pub mod controller;
pub mod event;
pub mod navigator;
pub mod pane;
pub mod theme;
pub mod widgets;

use std::sync::Arc;

use delicious_core::config::TypeaheadConfig;

pub use app::App;
pub use client::{HttpSearchClient, SearchClient};
pub use controller::Typeahead;

/// Run the typeahead against `config.server_url` until the user quits.
///
/// Must be called from inside a tokio runtime. The terminal loop blocks, so
/// it runs on the blocking pool while searches run on the runtime.
pub async fn run(config: TypeaheadConfig) -> anyhow::Result<()> {
    tracing::info!(server = %config.server_url, "typeahead: starting");
    let client = Arc::new(HttpSearchClient::new(config.server_url.clone()));
    let app = App::new(
        client,
        tokio::runtime::Handle::current(),
        &config,
        theme::Theme::load_default(),
    );
    tokio::task::spawn_blocking(move || app.run()).await?
}
