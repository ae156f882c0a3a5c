use crate::dataset::{Dataset, LoadOptions};
use profile_search_common::{ProfileSearchError, Result};
use std::path::Path;
use tracing::error;

/// The dataset as loaded at startup. Never reloaded; a failed load stays failed.
#[derive(Debug)]
pub enum Snapshot {
    Loaded(Dataset),
    Unavailable(String),
}

impl Snapshot {
    /// Never fails: a load error is logged and kept as the unavailable reason.
    pub fn load(path: &Path, opts: &LoadOptions) -> Self {
        match Dataset::load_csv(path, opts) {
            Ok(ds) => Snapshot::Loaded(ds),
            Err(e) => {
                error!(path = %path.display(), error = %e, "dataset load failed, searches will be rejected");
                Snapshot::Unavailable(e.to_string())
            }
        }
    }

    /// A dataset with no rows counts as unavailable, same as one that failed to load.
    pub fn dataset(&self) -> Result<&Dataset> {
        match self {
            Snapshot::Loaded(ds) if !ds.is_empty() => Ok(ds),
            _ => Err(ProfileSearchError::DatasetUnavailable),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Snapshot::Loaded(ds) if ds.is_empty() => Some("dataset has no rows"),
            Snapshot::Loaded(_) => None,
            Snapshot::Unavailable(r) => Some(r.as_str()),
        }
    }
}

impl From<Dataset> for Snapshot {
    fn from(ds: Dataset) -> Self {
        Snapshot::Loaded(ds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unavailable() {
        let snap = Snapshot::load(Path::new("/nonexistent/people.csv"), &LoadOptions::default());
        assert!(matches!(snap.dataset(), Err(ProfileSearchError::DatasetUnavailable)));
        assert!(snap.reason().is_some());
    }

    #[test]
    fn empty_dataset_is_unavailable() {
        let ds = Dataset::from_reader("name,age\n".as_bytes(), &LoadOptions::default()).unwrap();
        let snap = Snapshot::from(ds);
        assert!(snap.dataset().is_err());
        assert_eq!(snap.reason(), Some("dataset has no rows"));
    }

    #[test]
    fn loaded_dataset_is_served() {
        let ds = Dataset::from_reader("name,age\nAnna,25\n".as_bytes(), &LoadOptions::default()).unwrap();
        let snap = Snapshot::from(ds);
        assert_eq!(snap.dataset().unwrap().len(), 1);
        assert_eq!(snap.reason(), None);
    }
}
