use std::path::PathBuf;

/// Failures of the weeks data store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed weeks document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize weeks document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Weeks document has no weeks")]
    NoWeeks,

    #[error("Week {0} appears more than once")]
    DuplicateWeek(u32),

    #[error("Week {0} already exists")]
    WeekExists(u32),

    #[error("Week {0} not found")]
    WeekNotFound(u32),

    #[error("No pick for {name} in week {week}")]
    ParticipantNotFound { week: u32, name: String },
}
