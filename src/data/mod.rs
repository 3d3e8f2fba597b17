/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (hour derived from Time)
///   └──────────┘
///        │  once per source
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<Dataset>, shared for the process lifetime
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs + chart series
///   └───────────┘
/// ```
/// `pipeline` chains filter and aggregate for the UI.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
