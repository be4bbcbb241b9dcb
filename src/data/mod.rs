/// Data layer: core types, loading, and the clipping engine.
///
/// Architecture:
/// ```text
///     .csv / .json
///          │
///          ▼
///     ┌──────────┐
///     │  loader   │  parse file → Dataset (typed columns)
///     └──────────┘
///          │
///          ▼
///     ┌──────────┐
///     │  Dataset  │  named columns, numeric or text
///     └──────────┘
///          │
///          ▼
///     ┌───────────┐
///     │ transform  │  IQR bounds per column → clipped copy + ClipReport
///     └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod transform;
