//! The results pane below the search box.

use delicious_core::{
    render::{Fragment, ResultBlock},
    SearchResult,
};

use crate::{
    event::AppEvent,
    navigator::{NavAction, Navigator, Selection},
};

/// Visibility, rendered content and keyboard selection of the results area.
///
/// At most one block is active at a time, and swapping in new content always
/// clears the selection.
#[derive(Debug, Clone, Default)]
pub struct ResultsPane {
    visible: bool,
    fragment: Fragment,
    results: Vec<SearchResult>,
    navigator: Navigator,
}

impl ResultsPane {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.navigator.reset();
    }

    /// Swap in freshly rendered content. `results` are the hits the fragment
    /// was rendered from, used for secondary detail such as descriptions.
    pub fn replace(&mut self, fragment: Fragment, results: Vec<SearchResult>) {
        tracing::debug!(blocks = fragment.len(), "pane: content replaced");
        self.fragment = fragment;
        self.results = results;
        self.navigator.reset();
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn blocks(&self) -> &[ResultBlock] {
        &self.fragment.blocks
    }

    pub fn selection(&self) -> Selection {
        self.navigator.selection()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.selection().index() == Some(index)
    }

    /// Description of the hit behind block `index`, if it has one.
    pub fn description(&self, index: usize) -> Option<&str> {
        self.results.get(index)?.description.as_deref()
    }

    /// Route a navigation key. Hidden panes ignore everything.
    pub fn handle(&mut self, event: &AppEvent) -> NavAction {
        if !self.visible {
            return NavAction::Ignored;
        }
        self.navigator.handle(event, &self.fragment.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delicious_core::render::render_results;
    use pretty_assertions::assert_eq;

    fn hit(slug: &str) -> SearchResult {
        SearchResult {
            slug: slug.into(),
            name: slug.to_uppercase(),
            description: Some(format!("about {slug}")),
            score: Some(1.0),
        }
    }

    fn shown(results: Vec<SearchResult>) -> ResultsPane {
        let mut pane = ResultsPane::default();
        pane.show();
        pane.replace(render_results(&results, "q"), results);
        pane
    }

    #[test]
    fn exactly_one_block_active() {
        let mut pane = shown(vec![hit("a"), hit("b"), hit("c")]);
        pane.handle(&AppEvent::Down);
        pane.handle(&AppEvent::Down);

        let active: Vec<usize> = (0..pane.blocks().len()).filter(|&i| pane.is_active(i)).collect();
        assert_eq!(active, [1]);
    }

    #[test]
    fn replace_clears_selection() {
        let mut pane = shown(vec![hit("a"), hit("b")]);
        pane.handle(&AppEvent::Down);
        assert_eq!(pane.selection(), Selection::ActiveAt(0));

        pane.replace(render_results(&[hit("c")], "q"), vec![hit("c")]);
        assert_eq!(pane.selection(), Selection::NoneActive);
    }

    #[test]
    fn hidden_pane_ignores_keys() {
        let mut pane = shown(vec![hit("a")]);
        pane.hide();
        assert_eq!(pane.handle(&AppEvent::Down), NavAction::Ignored);
        assert_eq!(pane.selection(), Selection::NoneActive);
    }

    #[test]
    fn descriptions_follow_block_order() {
        let pane = shown(vec![hit("a"), hit("b")]);
        assert_eq!(pane.description(1), Some("about b"));
        assert_eq!(pane.description(5), None);
    }
}
