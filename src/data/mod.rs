/// Data layer: core types, loading, filtering and summarising.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet      SchemaMapping
///        │                           │
///        ▼                           ▼
///   ┌──────────┐
///   │  loader   │  parse file, check header → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record> in submission order (read-only)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │ ──▶ │  engine   │  latest match → trials + Summary
///   └──────────┘     └──────────┘
/// ```

pub mod engine;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod summary;
