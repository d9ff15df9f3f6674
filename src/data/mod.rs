/// Data layer: table model, store, filtering, statistics.
///
/// Architecture:
/// ```text
///  upload (.csv / .xlsx)      add-row form
///        │                        │
///        ▼                        ▼
///   ┌──────────┐            ┌──────────┐
///   │  loader   │           │  entry    │  validate → Row
///   └──────────┘            └──────────┘
///        │ replace                │ append
///        ▼                        ▼
///   ┌────────────────────────────────┐
///   │ store  (Table + CSV snapshot)   │
///   └────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  classify columns → controls → filtered Table
///   └──────────┘
///        │
///        ▼
///   stats (KPIs, value counts, describe)   export (CSV bytes)
/// ```

pub mod entry;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod store;
