use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved key that always aggregates to zero, used as a filler for series
/// that have no measurements.
pub const SKIPPED_KEY: &str = "skipped";

/// Versions that name the non-persistent baseline. Their keys carry no
/// persistence strategy.
pub const ORIGINAL_VERSIONS: [&str; 2] = ["Original", "Original-dram"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// One point of a benchmark sweep
pub struct ConfigKey {
    pub datastructure: String,
    pub version: String,
    pub persist: String,
    pub size: u64,
    pub update: u64,
    pub threads: u64,
}

impl ConfigKey {
    pub fn new(
        datastructure: impl Into<String>,
        version: impl Into<String>,
        persist: impl Into<String>,
        size: u64,
        update: u64,
        threads: u64,
    ) -> Self {
        Self {
            datastructure: datastructure.into(),
            version: version.into(),
            persist: persist.into(),
            size,
            update,
            threads,
        }
    }

    /// key of the non-persistent baseline sharing size, ratio and thread count
    pub fn original(datastructure: impl Into<String>, size: u64, update: u64, threads: u64) -> Self {
        Self::new(datastructure, ORIGINAL_VERSIONS[0], "", size, update, threads)
    }

    pub fn is_original(&self) -> bool {
        is_original_version(&self.version)
    }
}

pub fn is_original_version(version: &str) -> bool {
    ORIGINAL_VERSIONS.contains(&version)
}

/// Serialized form used as mapping key, e.g. `List_Auto_persist_counter_1000s_20up_4th`
impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_original() {
            write!(
                f,
                "{}_{}_{}s_{}up_{}th",
                self.datastructure, self.version, self.size, self.update, self.threads
            )
        } else {
            write!(
                f,
                "{}_{}_{}_{}s_{}up_{}th",
                self.datastructure, self.version, self.persist, self.size, self.update, self.threads
            )
        }
    }
}
