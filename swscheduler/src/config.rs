//! Session configuration surface consumed by the scheduler

use serde::{Deserialize, Serialize};
use swgeo::GeoPosition;

use crate::ordering::OrderingPolicy;
use crate::{Error, Result};

/// Configuration of one listening session.
///
/// Produced by the surrounding streaming service (typically deserialized
/// from its session store) and consumed once at scheduler construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity of the listening session.
    pub session_id: i64,
    /// Project the session belongs to; owns the repeat mode.
    pub project_id: i64,
    /// Optional tag filter narrowing the candidate set.
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
    /// Audibility radius in meters. Must be strictly positive.
    pub radius_meters: f64,
    /// Serve order of in-range, unplayed clips.
    #[serde(default)]
    pub ordering: OrderingPolicy,
    /// Initial listener position, if the client reported one.
    #[serde(default)]
    pub listener: Option<GeoPosition>,
}

impl SessionConfig {
    /// Creates a configuration with no tag filter, random ordering and no
    /// initial listener position.
    pub fn new(session_id: i64, project_id: i64, radius_meters: f64) -> Self {
        Self {
            session_id,
            project_id,
            tags: None,
            radius_meters,
            ordering: OrderingPolicy::default(),
            listener: None,
        }
    }

    /// Sets the tag filter.
    pub fn with_tags(mut self, tags: Vec<i64>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets the ordering policy.
    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the initial listener position.
    pub fn with_listener(mut self, listener: GeoPosition) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Fails fast on configurations the scheduler cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(Error::Validation(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_meters
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        assert!(SessionConfig::new(1, 1, 50.0).validate().is_ok());
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        for radius in [0.0, -25.0, f64::NAN, f64::INFINITY] {
            let config = SessionConfig::new(1, 1, radius);
            assert!(
                matches!(config.validate(), Err(Error::Validation(_))),
                "radius {} should be rejected",
                radius
            );
        }
    }

    #[test]
    fn deserializes_from_session_store_json() {
        let config: SessionConfig = serde_json::from_str(
            r#"{
                "session_id": 42,
                "project_id": 7,
                "tags": [3, 5],
                "radius_meters": 75.5,
                "ordering": "by_weight",
                "listener": { "latitude": 42.36, "longitude": -71.06 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.session_id, 42);
        assert_eq!(config.project_id, 7);
        assert_eq!(config.tags, Some(vec![3, 5]));
        assert_eq!(config.ordering, OrderingPolicy::ByWeight);
        assert!(config.listener.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn optional_fields_default() {
        let config: SessionConfig = serde_json::from_str(
            r#"{ "session_id": 1, "project_id": 2, "radius_meters": 10.0 }"#,
        )
        .unwrap();
        assert_eq!(config.tags, None);
        assert_eq!(config.ordering, OrderingPolicy::Random);
        assert_eq!(config.listener, None);
    }

    #[test]
    fn unknown_ordering_fails_deserialization() {
        let parsed: std::result::Result<SessionConfig, _> = serde_json::from_str(
            r#"{ "session_id": 1, "project_id": 2, "radius_meters": 10.0, "ordering": "newest" }"#,
        );
        assert!(parsed.is_err());
    }
}
