//! Ordering policies for the unplayed pool

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use swassets::Recording;

use crate::{Error, Result};

/// Serve-order strategy for in-range, unplayed recordings.
///
/// Fixed when the session pool is built; applied to the unplayed pool on
/// every reclassification, never to the far or played pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Fresh uniform permutation on every invocation.
    #[default]
    Random,
    /// Stable descending sort by like count.
    ByLikeCount,
    /// Stable descending sort by editorial weight.
    ByWeight,
}

impl OrderingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::Random => "random",
            OrderingPolicy::ByLikeCount => "by_like",
            OrderingPolicy::ByWeight => "by_weight",
        }
    }

    /// Reorders a prospective unplayed pool in place.
    ///
    /// The two sorts are stable: recordings with equal keys keep their
    /// relative order from before the sort.
    pub fn apply(&self, recordings: &mut [Arc<Recording>]) {
        match self {
            OrderingPolicy::Random => {
                let mut rng = rand::rng();
                recordings.shuffle(&mut rng);
            }
            OrderingPolicy::ByLikeCount => {
                recordings.sort_by(|a, b| b.like_count.cmp(&a.like_count));
            }
            OrderingPolicy::ByWeight => {
                recordings.sort_by(|a, b| b.weight.total_cmp(&a.weight));
            }
        }
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderingPolicy {
    type Err = Error;

    // No catch-all: a session asking for an ordering this build does not
    // know about must fail at configuration time.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(OrderingPolicy::Random),
            "by_like" => Ok(OrderingPolicy::ByLikeCount),
            "by_weight" => Ok(OrderingPolicy::ByWeight),
            other => Err(Error::Validation(format!(
                "unknown ordering policy: {}",
                other
            ))),
        }
    }
}

impl Serialize for OrderingPolicy {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderingPolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        OrderingPolicy::from_str(&value).map_err(serde::de::Error::custom)
    }
}
