//! Typeahead controller: binds the search box to the search endpoint and the
//! results pane.
//!
//! Every edit that leaves text in the box issues a [`SearchRequest`] carrying
//! a fresh sequence number. Only the response to the most recently issued
//! request is applied; anything older is dropped when it arrives, whatever
//! the arrival order. Clearing the box hides the pane and also bumps the
//! sequence, so a reply still in flight can not pop the pane back open.

use delicious_core::{render::render_results, SearchResult};

use crate::{
    client::ClientError,
    event::AppEvent,
    navigator::NavAction,
    pane::ResultsPane,
    widgets::search_box::SearchInput,
};

/// A search the caller should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// The outcome of a finished search, sent back to the controller.
#[derive(Debug)]
pub struct SearchResponse {
    pub seq: u64,
    pub result: Result<Vec<SearchResult>, ClientError>,
}

/// What the event loop should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Search(SearchRequest),
    Follow(String),
    Quit,
}

#[derive(Debug, Default)]
pub struct Typeahead {
    input: SearchInput,
    pane: ResultsPane,
    /// Sequence number of the latest issued request.
    seq: u64,
    /// Query text of the latest issued request.
    issued: String,
}

impl Typeahead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn pane(&self) -> &ResultsPane {
        &self.pane
    }

    pub fn latest_seq(&self) -> u64 {
        self.seq
    }

    pub fn handle(&mut self, event: &AppEvent) -> Action {
        match event {
            AppEvent::Quit => Action::Quit,
            AppEvent::Escape if self.input.text().is_empty() => Action::Quit,
            AppEvent::Escape => {
                self.input.clear();
                self.on_input_changed();
                Action::None
            }
            AppEvent::Up | AppEvent::Down | AppEvent::Enter => match self.pane.handle(event) {
                NavAction::Follow(href) => Action::Follow(href),
                _ => Action::None,
            },
            other => {
                if self.input.handle(other) {
                    self.on_input_changed()
                        .map(Action::Search)
                        .unwrap_or(Action::None)
                } else {
                    Action::None
                }
            }
        }
    }

    /// React to new text in the box. Returns the request to issue, or `None`
    /// when the box is empty.
    pub fn on_input_changed(&mut self) -> Option<SearchRequest> {
        self.seq += 1;

        if self.input.text().trim().is_empty() {
            tracing::debug!(seq = self.seq, "typeahead: input blank");
            self.issued.clear();
            self.pane.hide();
            return None;
        }

        self.issued = self.input.text().to_string();
        self.pane.show();
        tracing::debug!(seq = self.seq, query = %self.issued, "typeahead: search issued");
        Some(SearchRequest {
            seq: self.seq,
            query: self.issued.clone(),
        })
    }

    /// Apply a finished search. Returns `true` when the pane was updated.
    pub fn on_response(&mut self, response: SearchResponse) -> bool {
        if response.seq != self.seq {
            tracing::debug!(
                seq = response.seq,
                latest = self.seq,
                "typeahead: stale response dropped"
            );
            return false;
        }

        match response.result {
            Ok(results) => {
                let fragment = render_results(&results, &self.issued);
                tracing::debug!(seq = response.seq, blocks = fragment.len(), "typeahead: results shown");
                self.pane.replace(fragment, results);
                true
            }
            Err(e) => {
                tracing::error!(seq = response.seq, error = %e, "typeahead: search failed");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
