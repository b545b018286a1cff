use std::sync::Arc;

use ipl_statzone::analysis::compare::{
    available_entities, compute_comparison_with, ComparisonKind, ComparisonOptions,
    ComparisonRequest, ResultBundle,
};
use ipl_statzone::data::model::CanonicalDataset;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Trends,
    Results,
    Compare,
    Records,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Overview, Tab::Trends, Tab::Results, Tab::Compare, Tab::Records];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Trends => "Trends",
            Tab::Results => "Results",
            Tab::Compare => "Compare",
            Tab::Records => "Records",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Shared read-only; replaced wholesale by File → Open.
    pub dataset: Arc<CanonicalDataset>,
    pub options: ComparisonOptions,

    pub kind: ComparisonKind,
    /// Identifiers offered for `kind`, sorted.
    pub choices: Vec<String>,
    pub selection1: Option<String>,
    /// Optional second entity for side-by-side comparison.
    pub selection2: Option<String>,

    pub tab: Tab,

    /// Output of the last comparison; `None` while `comparison_error` is set.
    pub bundle: Option<ResultBundle>,
    pub comparison_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<CanonicalDataset>, options: ComparisonOptions) -> Self {
        let mut state = Self {
            dataset,
            options,
            kind: ComparisonKind::Team,
            choices: Vec::new(),
            selection1: None,
            selection2: None,
            tab: Tab::Overview,
            bundle: None,
            comparison_error: None,
            status_message: None,
        };
        state.reset_selection();
        state
    }

    /// Swap in a newly loaded dataset. Selections restart from defaults.
    pub fn set_dataset(&mut self, dataset: CanonicalDataset) {
        self.dataset = Arc::new(dataset);
        self.status_message = None;
        self.reset_selection();
    }

    pub fn set_kind(&mut self, kind: ComparisonKind) {
        if self.kind != kind {
            self.kind = kind;
            self.reset_selection();
        }
    }

    pub fn set_selection1(&mut self, entity: String) {
        self.selection1 = Some(entity);
        self.recompute();
    }

    pub fn set_selection2(&mut self, entity: Option<String>) {
        self.selection2 = entity;
        self.recompute();
    }

    fn reset_selection(&mut self) {
        self.choices = available_entities(&self.dataset, self.kind);
        self.selection1 = self.choices.first().cloned();
        self.selection2 = None;
        self.recompute();
    }

    pub fn request(&self) -> ComparisonRequest {
        ComparisonRequest::new(
            self.kind,
            self.selection1.iter().chain(self.selection2.iter()).cloned(),
        )
    }

    /// Rerun the comparison for the current selection.
    pub fn recompute(&mut self) {
        match compute_comparison_with(&self.dataset, &self.request(), &self.options) {
            Ok(bundle) => {
                for warning in &bundle.warnings {
                    log::debug!("{warning}");
                }
                self.bundle = Some(bundle);
                self.comparison_error = None;
            }
            Err(e) => {
                log::warn!("comparison failed: {e}");
                self.bundle = None;
                self.comparison_error = Some(e.to_string());
            }
        }
    }
}
