pub mod config;
pub mod data;
pub mod error;
pub mod lookup;
pub mod server;
pub mod state;
pub mod telemetry;

pub use data::matrix::CorrelationMatrix;
pub use data::model::{SeriesId, Table};
pub use error::{DataFormatError, LookupError};
pub use lookup::{CorrelationLookup, CorrelationMatch};
pub use state::AppState;
