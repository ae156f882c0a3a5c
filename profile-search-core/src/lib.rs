pub mod criteria;
pub mod dataset;
pub mod filter;
pub mod record;
pub mod snapshot;

pub use criteria::{AgeFilter, Criteria};
pub use dataset::{Cell, ColumnKind, Dataset, LoadOptions, Row};
pub use filter::{evaluate, search_any, Outcome};
pub use profile_search_common::{MatchMode, ProfileSearchError, Result};
pub use record::{Profile, ProfileLayout};
pub use snapshot::Snapshot;
