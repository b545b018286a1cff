/// Data layer: core types, loading, and match selection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read cells → RawTable
///   └──────────┘
///        │  schema: resolve fixed columns once
///        │  aliases: canonical team / venue names
///        ▼
///   ┌──────────────────┐
///   │ CanonicalDataset  │  Vec<MatchRecord>, team / venue / season sets
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  entity predicates → matching records
///   └──────────┘
/// ```

pub mod aliases;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
