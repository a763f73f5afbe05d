use crate::{
    key::{ConfigKey, SKIPPED_KEY},
    stats,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// map of serialized configuration key -> raw trial measurements in log order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries(BTreeMap<String, Vec<f64>>);

impl SampleSeries {
    pub fn push(&mut self, key: &ConfigKey, sample: f64) {
        self.0.entry(key.to_string()).or_default().push(sample);
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<f64>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub mean: f64,
    pub stddev: f64,
}

impl Aggregate {
    pub const ZERO: Self = Self {
        mean: 0.0,
        stddev: 0.0,
    };

    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        Some(Self {
            mean: stats::mean(samples)?,
            stddev: stats::population_stddev(samples)?,
        })
    }
}

/// map of serialized configuration key -> mean and population standard deviation
///
/// Keys without samples are absent. [`SKIPPED_KEY`] is always present and zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates(BTreeMap<String, Aggregate>);

impl Default for Aggregates {
    fn default() -> Self {
        Self::from_series(&SampleSeries::default())
    }
}

impl Aggregates {
    pub fn from_series(series: &SampleSeries) -> Self {
        let mut entries: BTreeMap<String, Aggregate> = series
            .iter()
            .filter_map(|(key, samples)| {
                Aggregate::from_samples(samples).map(|aggregate| (key.clone(), aggregate))
            })
            .collect();
        entries.insert(SKIPPED_KEY.to_owned(), Aggregate::ZERO);

        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&Aggregate> {
        self.0.get(key)
    }

    pub fn get_key(&self, key: &ConfigKey) -> Option<&Aggregate> {
        self.get(&key.to_string())
    }

    pub fn mean(&self, key: &str) -> Option<f64> {
        self.get(key).map(|aggregate| aggregate.mean)
    }

    pub fn stddev(&self, key: &str) -> Option<f64> {
        self.get(key).map(|aggregate| aggregate.stddev)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// number of configurations, counting the reserved skipped entry
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Distinct parameter values seen while scanning a log, in discovery order
/// until [`SweepAxes::sort`] is called
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepAxes {
    pub datastructures: Vec<String>,
    pub versions: Vec<String>,
    /// persistence strategies of non-baseline runs only
    pub persists: Vec<String>,
    pub sizes: BTreeMap<String, Vec<u64>>,
    pub updates: Vec<u64>,
    pub threads: Vec<u64>,
}

fn insert_unique<T: PartialEq + Clone>(values: &mut Vec<T>, value: &T) {
    if !values.contains(value) {
        values.push(value.clone());
    }
}

impl SweepAxes {
    pub fn record(&mut self, key: &ConfigKey) {
        insert_unique(&mut self.datastructures, &key.datastructure);
        insert_unique(&mut self.versions, &key.version);
        if !key.is_original() {
            insert_unique(&mut self.persists, &key.persist);
        }
        insert_unique(
            self.sizes.entry(key.datastructure.clone()).or_default(),
            &key.size,
        );
        insert_unique(&mut self.updates, &key.update);
        insert_unique(&mut self.threads, &key.threads);
    }

    /// sort numeric axes ascending; name axes keep discovery order
    pub fn sort(&mut self) {
        self.threads.sort_unstable();
        self.updates.sort_unstable();
        self.sizes.values_mut().for_each(|sizes| sizes.sort_unstable());
    }

    pub fn sizes_of(&self, datastructure: &str) -> &[u64] {
        self.sizes
            .get(datastructure)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// first persistent version, falling back to the baseline if nothing else ran
    pub fn primary_version(&self) -> Option<&str> {
        self.versions
            .iter()
            .find(|version| !crate::key::is_original_version(version))
            .or_else(|| self.versions.first())
            .map(String::as_str)
    }
}

/// Result of parsing one results log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub throughput: Aggregates,
    pub flushes: Aggregates,
    pub throughput_samples: SampleSeries,
    pub flush_samples: SampleSeries,
    pub axes: SweepAxes,
}

impl Report {
    pub fn from_samples(
        throughput_samples: SampleSeries,
        flush_samples: SampleSeries,
        axes: SweepAxes,
    ) -> Self {
        Self {
            throughput: Aggregates::from_series(&throughput_samples),
            flushes: Aggregates::from_series(&flush_samples),
            throughput_samples,
            flush_samples,
            axes,
        }
    }

    /// keys whose number of throughput trials differs from `expected`
    pub fn irregular_trials(&self, expected: usize) -> Vec<(String, usize)> {
        self.throughput_samples
            .iter()
            .filter(|(_, samples)| samples.len() != expected)
            .map(|(key, samples)| (key.clone(), samples.len()))
            .sorted()
            .collect()
    }
}
