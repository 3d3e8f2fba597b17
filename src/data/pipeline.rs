//! Filter → aggregate, as one pure function the UI calls on every change.

use super::aggregate::{ChartSeries, KpiSummary};
use super::filter::{filter, FilterSelection, FilteredView};
use super::model::Dataset;

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    /// Dataset indices of the matching records, in dataset order.
    pub visible_indices: Vec<usize>,
    pub kpis: KpiSummary,
    pub charts: ChartSeries,
}

impl DashboardReport {
    /// The matching records, for the table view.
    pub fn view<'a>(&self, dataset: &'a Dataset) -> FilteredView<'a> {
        FilteredView::from_indices(dataset, self.visible_indices.clone())
    }
}

/// Result of running the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// No record matches the selection. Not an error.
    NoData,
    Ready(DashboardReport),
}

/// Run the filter and every aggregate for `selection`.
pub fn evaluate(dataset: &Dataset, selection: &FilterSelection) -> Evaluation {
    let view = filter(dataset, selection);
    let Some(kpis) = KpiSummary::compute(&view) else {
        log::debug!("Selection matches no records");
        return Evaluation::NoData;
    };
    let charts = ChartSeries::compute(&view);
    Evaluation::Ready(DashboardReport {
        visible_indices: view.into_indices(),
        kpis,
        charts,
    })
}
