//! Keyboard navigation over rendered result blocks.
//!
//! Only `Up`, `Down` and `Enter` are handled; every other event comes back as
//! [`NavAction::Ignored`] so the caller can route it elsewhere. Movement wraps
//! at both ends. With no blocks the selection stays at
//! [`Selection::NoneActive`].

use delicious_core::render::ResultBlock;

use crate::event::AppEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoneActive,
    ActiveAt(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::NoneActive => None,
            Selection::ActiveAt(i) => Some(i),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Not a navigation key.
    Ignored,
    /// `Up` or `Down` was applied; carries the new selection.
    Moved(Selection),
    /// `Enter` on a block with a link target.
    Follow(String),
    /// `Enter` with nothing active, or on a block without a link.
    Stay,
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    selection: Selection,
}

impl Navigator {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Back to [`Selection::NoneActive`]; called whenever new blocks replace
    /// the old ones.
    pub fn reset(&mut self) {
        self.selection = Selection::NoneActive;
    }

    pub fn down(&mut self, len: usize) -> Selection {
        self.selection = match (self.selection, len) {
            (_, 0) => Selection::NoneActive,
            (Selection::NoneActive, _) => Selection::ActiveAt(0),
            (Selection::ActiveAt(i), n) if i + 1 < n => Selection::ActiveAt(i + 1),
            (Selection::ActiveAt(_), _) => Selection::ActiveAt(0),
        };
        self.selection
    }

    pub fn up(&mut self, len: usize) -> Selection {
        self.selection = match (self.selection, len) {
            (_, 0) => Selection::NoneActive,
            (Selection::NoneActive, n) => Selection::ActiveAt(n - 1),
            (Selection::ActiveAt(i), n) if i >= 1 && i < n => Selection::ActiveAt(i - 1),
            (Selection::ActiveAt(_), n) => Selection::ActiveAt(n - 1),
        };
        self.selection
    }

    pub fn handle(&mut self, event: &AppEvent, blocks: &[ResultBlock]) -> NavAction {
        match event {
            AppEvent::Down => {
                let selection = self.down(blocks.len());
                tracing::debug!(?selection, "navigator: down");
                NavAction::Moved(selection)
            }
            AppEvent::Up => {
                let selection = self.up(blocks.len());
                tracing::debug!(?selection, "navigator: up");
                NavAction::Moved(selection)
            }
            AppEvent::Enter => {
                let target = self
                    .selection
                    .index()
                    .and_then(|i| blocks.get(i))
                    .and_then(|block| block.href.clone());
                match target {
                    Some(href) => {
                        tracing::debug!(%href, "navigator: follow");
                        NavAction::Follow(href)
                    }
                    None => NavAction::Stay,
                }
            }
            _ => NavAction::Ignored,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
