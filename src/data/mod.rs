/// Data layer: raw cells, loading, recoding and filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  recode   │  lookup tables, drop missing → RecodedTable (once per session)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection predicates → matching records
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod lookup;
pub mod model;
pub mod recode;
pub mod session;
