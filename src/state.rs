use std::collections::BTreeSet;

use crate::data::model::Dataset;
use crate::data::transform::{ClipReport, clip_dataset};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// A proposed transform result, held until the user applies or changes the
/// configuration. Preview-only: `working` is untouched until [`SessionState::apply`].
pub struct Preview {
    pub dataset: Dataset,
    pub report: ClipReport,
}

/// The full session state, independent of rendering.
///
/// `original` is set once per load and only replaced by the next load;
/// `working` is the copy the user mutates through reset and apply; `status`
/// is overwritten by every state-changing action. As long as no new file is
/// loaded, `working` keeps the same column set as `original` (clipping only
/// changes values, never schema).
pub struct SessionState {
    /// Dataset as loaded (None until the user opens a file).
    pub original: Option<Dataset>,

    /// Current working copy of the dataset.
    pub working: Option<Dataset>,

    /// Status message shown in the side panel.
    pub status: String,

    /// Numeric columns selected for clipping.
    pub selected_columns: BTreeSet<String>,

    /// Sensitivity factor: bounds are `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub k: f64,

    /// Column shown in the before/after histogram.
    pub preview_column: Option<String>,

    /// Cached engine output for the current configuration.
    pub preview: Option<Preview>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            original: None,
            working: None,
            status: "Load a file to get started.".to_string(),
            selected_columns: BTreeSet::new(),
            k: 1.5,
            preview_column: None,
            preview: None,
        }
    }
}

impl SessionState {
    /// Ingest a freshly loaded dataset: keep it as the new original, start a
    /// working copy, and pre-select the first few numeric columns.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        let numeric = dataset.numeric_column_names();
        self.selected_columns = numeric.iter().take(3).cloned().collect();
        self.preview_column = numeric.first().cloned();

        let status = if numeric.is_empty() {
            "Loaded file, but it has no numeric columns.".to_string()
        } else {
            format!(
                "Loaded file | {} rows | {} columns",
                dataset.n_rows(),
                dataset.n_columns()
            )
        };

        self.original = Some(dataset.clone());
        self.working = Some(dataset);
        self.refresh_preview();
        // refresh_preview reports an engine error in `status` when nothing is
        // selectable; the load message wins either way.
        self.status = status;
    }

    /// Restore the working copy from the original. No-op before a load.
    pub fn reset(&mut self) {
        if let Some(original) = &self.original {
            self.working = Some(original.clone());
            self.status = "Reset applied. Original dataset restored.".to_string();
            self.refresh_preview();
        }
    }

    /// Commit the current preview into the working copy. The preview stays
    /// preview-only until this explicit action.
    pub fn apply(&mut self) {
        if let Some(preview) = self.preview.take() {
            self.working = Some(preview.dataset);
            self.status = "IQR clipping applied.".to_string();
            self.refresh_preview();
        }
    }

    pub fn set_k(&mut self, k: f64) {
        self.k = k;
        self.refresh_preview();
    }

    /// Toggle one column in the clipping selection.
    pub fn toggle_column(&mut self, name: &str) {
        if !self.selected_columns.remove(name) {
            self.selected_columns.insert(name.to_string());
        }
        // Keep the histogram on a selected column when possible.
        let in_selection = self
            .preview_column
            .as_ref()
            .is_some_and(|c| self.selected_columns.contains(c));
        if !in_selection {
            if let Some(first) = self.selection_in_order().into_iter().next() {
                self.preview_column = Some(first);
            }
        }
        self.refresh_preview();
    }

    pub fn set_preview_column(&mut self, name: String) {
        self.preview_column = Some(name);
    }

    /// Selected columns in dataset order. The engine's report follows this
    /// order, so the report table matches the column list in the panel.
    pub fn selection_in_order(&self) -> Vec<String> {
        match &self.working {
            Some(ds) => ds
                .numeric_column_names()
                .into_iter()
                .filter(|n| self.selected_columns.contains(n))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Re-run the engine against the working copy and cache the proposal.
    /// Called after every input change (event-driven, not per-frame).
    pub fn refresh_preview(&mut self) {
        let Some(working) = &self.working else {
            self.preview = None;
            return;
        };

        let columns = self.selection_in_order();
        match clip_dataset(working, &columns, self.k) {
            Ok((dataset, report)) => {
                self.preview = Some(Preview { dataset, report });
            }
            Err(e) => {
                self.preview = None;
                self.status = format!("Error: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            Column::numeric(
                "v",
                vec![
                    Some(1.0),
                    Some(2.0),
                    Some(3.0),
                    Some(4.0),
                    Some(5.0),
                    Some(6.0),
                    Some(7.0),
                    Some(8.0),
                    Some(9.0),
                    Some(100.0),
                ],
            ),
            Column::text("tag", vec![Some("x".into()); 10]),
        ])
    }

    fn value_at(ds: &Dataset, name: &str, row: usize) -> Option<f64> {
        ds.column(name).unwrap().as_numeric().unwrap()[row]
    }

    #[test]
    fn load_sets_both_copies_and_defaults() {
        let mut state = SessionState::default();
        state.load_dataset(sample());

        assert_eq!(state.original, state.working);
        assert_eq!(state.selection_in_order(), vec!["v"]);
        assert_eq!(state.preview_column.as_deref(), Some("v"));
        assert!(state.status.contains("10 rows"));
        assert!(state.preview.is_some());
    }

    #[test]
    fn preview_does_not_touch_working() {
        let mut state = SessionState::default();
        state.load_dataset(sample());

        let preview = state.preview.as_ref().unwrap();
        assert_eq!(value_at(&preview.dataset, "v", 9), Some(14.5));
        assert_eq!(preview.report[0].affected, 1);

        // The proposal exists but the working copy still holds the outlier.
        assert_eq!(value_at(state.working.as_ref().unwrap(), "v", 9), Some(100.0));
    }

    #[test]
    fn apply_commits_and_reset_restores() {
        let mut state = SessionState::default();
        state.load_dataset(sample());

        state.apply();
        assert_eq!(value_at(state.working.as_ref().unwrap(), "v", 9), Some(14.5));
        assert_eq!(state.status, "IQR clipping applied.");
        // Schema is unchanged by apply.
        assert_eq!(
            state.working.as_ref().unwrap().column_names(),
            state.original.as_ref().unwrap().column_names()
        );
        // Original is untouched.
        assert_eq!(value_at(state.original.as_ref().unwrap(), "v", 9), Some(100.0));

        // Re-clipping the committed copy is a no-op.
        assert_eq!(state.preview.as_ref().unwrap().report[0].affected, 0);

        state.reset();
        assert_eq!(value_at(state.working.as_ref().unwrap(), "v", 9), Some(100.0));
        assert_eq!(state.status, "Reset applied. Original dataset restored.");
    }

    #[test]
    fn empty_selection_clears_preview() {
        let mut state = SessionState::default();
        state.load_dataset(sample());

        state.toggle_column("v");
        assert!(state.selected_columns.is_empty());
        assert!(state.preview.is_none());
        assert!(state.status.starts_with("Error:"));

        // Apply with no preview must not corrupt the working copy.
        state.apply();
        assert_eq!(value_at(state.working.as_ref().unwrap(), "v", 9), Some(100.0));
    }

    #[test]
    fn k_change_refreshes_preview() {
        let mut state = SessionState::default();
        state.load_dataset(sample());

        // Wide enough bounds swallow the outlier entirely.
        state.set_k(50.0);
        assert_eq!(state.preview.as_ref().unwrap().report[0].affected, 0);

        state.set_k(1.5);
        assert_eq!(state.preview.as_ref().unwrap().report[0].affected, 1);
    }

    #[test]
    fn reset_before_load_is_a_noop() {
        let mut state = SessionState::default();
        state.reset();
        state.apply();
        assert!(state.working.is_none());
        assert_eq!(state.status, "Load a file to get started.");
    }
}
