use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{DashboardConfig, SourceConfig};
use crate::data::cache;
use crate::data::filter::FilterSelection;
use crate::data::model::{Attribute, Dataset};
use crate::data::pipeline::{evaluate, Evaluation};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Shared, immutable dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Allowed values per filterable attribute.
    pub selection: FilterSelection,

    /// Pipeline output for the current selection (cached until it changes).
    pub evaluation: Option<Evaluation>,

    /// Fatal load error; the dashboard is replaced by this message.
    pub load_error: Option<String>,

    /// Non-fatal status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// `file://` URI of the banner image, if the file exists.
    pub banner_uri: Option<String>,
}

impl AppState {
    /// Build the state and load the configured source.
    pub fn new(config: DashboardConfig) -> Self {
        let banner_uri = config.banner_image.as_ref().and_then(|path| {
            if path.is_file() {
                Some(format!("file://{}", path.display()))
            } else {
                log::warn!("Banner image {} not found, skipping", path.display());
                None
            }
        });

        let mut state = Self {
            config,
            dataset: None,
            selection: FilterSelection::default(),
            evaluation: None,
            load_error: None,
            status_message: None,
            banner_uri,
        };
        let source = state.config.source.clone();
        state.load_source(&source);
        state
    }

    /// Load `source` through the process cache.
    ///
    /// A failure with no dataset on screen is fatal (`load_error`); with a
    /// dataset already shown it only sets the status message.
    pub fn load_source(&mut self, source: &SourceConfig) {
        match cache::load(source) {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{} contains no sales rows", source.path.display());
                }
                log::info!(
                    "Dataset ready: {} records from {}",
                    dataset.len(),
                    source.path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", source.path.display());
                let msg = format!("Could not load {}: {e}", source.path.display());
                if self.dataset.is_some() {
                    self.status_message = Some(msg);
                } else {
                    self.load_error = Some(msg);
                }
            }
        }
    }

    /// Open another file with the configured sheet/range/cap.
    pub fn open_path(&mut self, path: PathBuf) {
        let source = self.config.source.with_path(path);
        self.load_source(&source);
    }

    /// Ingest a dataset and reset the selection to "everything selected".
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::all(&dataset);
        self.dataset = Some(dataset);
        self.load_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// Re-run the pipeline after a selection change.
    pub fn refilter(&mut self) {
        self.evaluation = self
            .dataset
            .as_deref()
            .map(|ds| evaluate(ds, &self.selection));
    }

    /// Toggle a single value in an attribute's filter.
    pub fn toggle_filter_value(&mut self, attribute: Attribute, value: &str) {
        self.selection.toggle(attribute, value);
        self.refilter();
    }

    /// Select all values of an attribute.
    pub fn select_all(&mut self, attribute: Attribute) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(ds, attribute);
            self.refilter();
        }
    }

    /// Deselect all values of an attribute.
    pub fn select_none(&mut self, attribute: Attribute) {
        self.selection.select_none(attribute);
        self.refilter();
    }

    /// Number of records matching the current selection.
    pub fn visible_count(&self) -> usize {
        match &self.evaluation {
            Some(Evaluation::Ready(report)) => report.visible_indices.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::small_dataset;

    fn state_with(dataset: Dataset) -> AppState {
        let mut state = AppState {
            config: DashboardConfig {
                banner_image: None,
                ..DashboardConfig::default()
            },
            dataset: None,
            selection: FilterSelection::default(),
            evaluation: None,
            load_error: None,
            status_message: None,
            banner_uri: None,
        };
        state.set_dataset(Arc::new(dataset));
        state
    }

    #[test]
    fn test_new_dataset_selects_everything() {
        let state = state_with(small_dataset());
        assert_eq!(state.visible_count(), 5);
        assert!(matches!(state.evaluation, Some(Evaluation::Ready(_))));
    }

    #[test]
    fn test_select_none_then_all() {
        let mut state = state_with(small_dataset());

        state.select_none(Attribute::City);
        assert_eq!(state.evaluation, Some(Evaluation::NoData));
        assert_eq!(state.visible_count(), 0);

        state.select_all(Attribute::City);
        assert_eq!(state.visible_count(), 5);
    }

    #[test]
    fn test_toggle_refilters() {
        let mut state = state_with(small_dataset());
        state.toggle_filter_value(Attribute::Gender, "Male");
        assert_eq!(state.visible_count(), 2);
    }

    #[test]
    fn test_failed_first_load_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            source: SourceConfig::default().with_path(dir.path().join("missing.csv")),
            banner_image: Some(PathBuf::from("no-such-banner.png")),
        };

        let state = AppState::new(config);
        assert!(state.dataset.is_none());
        assert!(state.load_error.is_some());
        assert!(state.banner_uri.is_none());
    }

    #[test]
    fn test_header_only_file_loads_as_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(
            &path,
            "City,Customer_type,Gender,Branch,Payment,Product_line,Total,Rating,gross income,Time\n",
        )
        .unwrap();

        let mut state = state_with(small_dataset());
        state.open_path(path);
        assert!(state.dataset.as_ref().is_some_and(|ds| ds.is_empty()));
        assert_eq!(state.evaluation, Some(Evaluation::NoData));
    }

    #[test]
    fn test_failed_reload_keeps_current_dataset() {
        let mut state = state_with(small_dataset());
        let dir = tempfile::tempdir().unwrap();

        state.open_path(dir.path().join("missing.csv"));
        assert!(state.load_error.is_none());
        assert!(state.status_message.is_some());
        assert_eq!(state.visible_count(), 5);
    }
}
