/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .parquet / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<WineRecord>, schema checks
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ DataContext  │  Catalog + ClientCatalog, read-only
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply predicates → filtered view
///   └──────────┘
/// ```

pub mod context;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
