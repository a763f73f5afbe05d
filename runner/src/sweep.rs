use crate::cli::{Cli, Datastructure};
use itertools::iproduct;
use nvbench_ingest::HashRelabel;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// sizes above this are too slow for a skiplist without flush elision
const SKIPLIST_SIMPLE_LIMIT: u64 = 100_000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SweepError {
    #[error("invalid argument: one of threads, versions or ratios must be a bracketed list")]
    InvalidArgument,
    #[error("Invalid {axis} value '{value}'")]
    InvalidValue { axis: &'static str, value: String },
    #[error("Unknown version '{0}', expected auto, manual or traverse")]
    UnknownVersion(String),
}

/// axis swept by a run, decides which chart is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentKind {
    Scalability,
    Version,
    Ratio,
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalability => "scalability",
            Self::Version => "version",
            Self::Ratio => "ratio",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Original,
    Auto,
    Manual,
    Traverse,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Auto => "auto",
            Self::Manual => "manual",
            Self::Traverse => "traverse",
        }
    }
}

impl FromStr for Version {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            "traverse" => Ok(Self::Traverse),
            other => Err(SweepError::UnknownVersion(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    Simple,
    Counter,
    Hash12,
    Hash16,
    Hash20,
    Hash23,
    Hash26,
    Link,
}

impl Persist {
    pub const DEFAULT: [Persist; 4] = [Self::Simple, Self::Counter, Self::Hash20, Self::Link];
    pub const HASH_SIZES: [Persist; 5] = [
        Self::Hash12,
        Self::Hash16,
        Self::Hash20,
        Self::Hash23,
        Self::Hash26,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Counter => "counter",
            Self::Hash12 => "hash12",
            Self::Hash16 => "hash16",
            Self::Hash20 => "hash20",
            Self::Hash23 => "hash23",
            Self::Hash26 => "hash26",
            Self::Link => "link",
        }
    }

    /// label logged for this strategy once legacy builds are disambiguated,
    /// `None` unless legacy builds reported it as `persist_hash_cacheline`
    pub fn legacy_hash_label(&self) -> Option<&'static str> {
        match self {
            Self::Hash12 => Some("persist_hash_12"),
            Self::Hash16 => Some("persist_hash_16"),
            Self::Hash20 => Some("persist_hash_20"),
            _ => None,
        }
    }
}

/// One benchmark invocation, written `repeats` times into the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub datastructure: Datastructure,
    pub version: Version,
    pub persist: Persist,
    pub update: u64,
    pub size: u64,
    pub threads: u64,
}

/// Split `[a, b, c]` into its trimmed items, a plain value yields itself
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .collect()
}

fn is_list(value: &str) -> bool {
    value.contains('[')
}

fn parse_axis<T: FromStr>(axis: &'static str, value: &str) -> Result<Vec<T>, SweepError> {
    split_list(value)
        .into_iter()
        .map(|item| {
            item.parse().map_err(|_| SweepError::InvalidValue {
                axis,
                value: item.to_owned(),
            })
        })
        .collect()
}

/// The full parameter space of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep {
    pub datastructure: Datastructure,
    pub kind: ExperimentKind,
    pub threads: Vec<u64>,
    pub sizes: Vec<u64>,
    pub versions: Vec<Version>,
    pub ratios: Vec<u64>,
    pub persists: Vec<Persist>,
    pub flithash: bool,
}

impl Sweep {
    pub fn from_cli(cli: &Cli) -> Result<Self, SweepError> {
        let kind = if is_list(&cli.threads) {
            ExperimentKind::Scalability
        } else if is_list(&cli.versions) {
            ExperimentKind::Version
        } else if is_list(&cli.ratios) {
            ExperimentKind::Ratio
        } else {
            return Err(SweepError::InvalidArgument);
        };

        let threads = parse_axis("threads", &cli.threads)?;
        let sizes: Vec<u64> = parse_axis("size", &cli.size)?;
        let versions = split_list(&cli.versions)
            .into_iter()
            .map(Version::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        let ratios: Vec<u64> = parse_axis("ratios", &cli.ratios)?;

        if let Some(ratio) = ratios.iter().find(|&&ratio| ratio > 100) {
            return Err(SweepError::InvalidValue {
                axis: "ratios",
                value: ratio.to_string(),
            });
        }

        Ok(Self {
            datastructure: cli.datastructure,
            kind,
            persists: persists_for(cli.datastructure, &sizes, cli.flithash),
            threads,
            sizes,
            versions,
            ratios,
            flithash: cli.flithash,
        })
    }

    /// Runs in script order: threads, sizes, ratios, then the baseline followed
    /// by every version and persist pair.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();

        for (&threads, &size, &update) in iproduct!(&self.threads, &self.sizes, &self.ratios) {
            let run = |version, persist| Run {
                datastructure: self.datastructure,
                version,
                persist,
                update,
                size,
                threads,
            };

            if !self.flithash {
                runs.push(run(Version::Original, Persist::Counter));
            }

            runs.extend(
                iproduct!(&self.versions, &self.persists)
                    .map(|(&version, &persist)| run(version, persist)),
            );
        }

        runs
    }

    /// Relabelling for logs of legacy builds, following the script order: the
    /// n-th ambiguous run is assigned its persist for `repeats` samples.
    pub fn legacy_relabel(&self, repeats: usize) -> HashRelabel {
        HashRelabel {
            variants: self
                .runs()
                .iter()
                .filter_map(|run| run.persist.legacy_hash_label())
                .map(String::from)
                .collect(),
            ..HashRelabel::legacy(repeats)
        }
    }
}

fn persists_for(datastructure: Datastructure, sizes: &[u64], flithash: bool) -> Vec<Persist> {
    if flithash {
        return Persist::HASH_SIZES.to_vec();
    }

    let large_skiplist = datastructure == Datastructure::Skiplist
        && sizes.iter().any(|&size| size > SKIPLIST_SIMPLE_LIMIT);

    Persist::DEFAULT
        .into_iter()
        .filter(|persist| match persist {
            Persist::Link => datastructure != Datastructure::Bst,
            Persist::Simple => !large_skiplist,
            _ => true,
        })
        .collect()
}
