use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Occurrence counts keyed by a discrete value, in enumeration order
///
/// Serializes as a JSON object whose keys appear in the same order as
/// [`Distribution::iter`] yields them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution(Vec<(String, u64)>);

impl Distribution {
    /// Collect counts and order them with `compare` on the keys
    pub fn sorted_by<'a, I, F>(counts: I, mut compare: F) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a u64)>,
        F: FnMut(&str, &str) -> Ordering,
    {
        let mut entries: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        entries.sort_by(|a, b| compare(&a.0, &b.0));
        Self(entries)
    }

    /// Collect counts in lexical key order
    pub fn lexical<'a, I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a u64)>,
    {
        Self::sorted_by(counts, |a, b| a.cmp(b))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(key, count)| (key.as_str(), *count))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, count)| *count)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = Distribution;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of value to occurrence count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, count)) = access.next_entry::<String, u64>()? {
                    entries.push((key, count));
                }
                Ok(Distribution(entries))
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// Payload sizes bucketed into five disjoint ranges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeHistogram {
    #[serde(rename = "< 1KB")]
    pub under_1kb: u64,
    #[serde(rename = "1KB - 10KB")]
    pub from_1kb_to_10kb: u64,
    #[serde(rename = "10KB - 100KB")]
    pub from_10kb_to_100kb: u64,
    #[serde(rename = "100KB - 1MB")]
    pub from_100kb_to_1mb: u64,
    #[serde(rename = ">= 1MB")]
    pub at_least_1mb: u64,
}

impl SizeHistogram {
    /// Count one payload of `size` bytes
    pub fn record(&mut self, size: u64) {
        match size {
            s if s < KIB => self.under_1kb += 1,
            s if s < 10 * KIB => self.from_1kb_to_10kb += 1,
            s if s < 100 * KIB => self.from_10kb_to_100kb += 1,
            s if s < MIB => self.from_100kb_to_1mb += 1,
            _ => self.at_least_1mb += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.under_1kb += other.under_1kb;
        self.from_1kb_to_10kb += other.from_1kb_to_10kb;
        self.from_10kb_to_100kb += other.from_10kb_to_100kb;
        self.from_100kb_to_1mb += other.from_100kb_to_1mb;
        self.at_least_1mb += other.at_least_1mb;
    }

    /// Bucket labels and counts, smallest range first
    pub fn buckets(&self) -> [(&'static str, u64); 5] {
        [
            ("< 1KB", self.under_1kb),
            ("1KB - 10KB", self.from_1kb_to_10kb),
            ("10KB - 100KB", self.from_10kb_to_100kb),
            ("100KB - 1MB", self.from_100kb_to_1mb),
            (">= 1MB", self.at_least_1mb),
        ]
    }

    pub fn total(&self) -> u64 {
        self.buckets().iter().map(|(_, count)| count).sum()
    }
}
