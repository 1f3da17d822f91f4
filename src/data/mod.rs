//! Data layer: table loading, series selection and the correlation matrix.
//!
//! Architecture:
//! ```text
//!  LD2011_2014.csv  (";" delimited, "," decimal)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  keep MT_* columns, fix the index order
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  matrix   │  pairwise Pearson → CorrelationMatrix (built once)
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod matrix;
pub mod model;
