//! Ratatui widgets for the typeahead.

pub mod results;
pub mod search_box;
