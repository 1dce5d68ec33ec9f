//! Proximity classification of recordings against a listener position

use swassets::Recording;
use swgeo::GeoPosition;

/// True if the listener and recording are close enough for the clip to be
/// heard.
///
/// A missing listener position means the listener is treated as omnipresent
/// (every clip is audible); a recording without coordinates is likewise
/// audible from everywhere. Otherwise the clip is audible iff its
/// great-circle distance to the listener does not exceed the radius;
/// a clip sitting exactly on the radius is in range.
pub fn is_audible(
    listener: Option<&GeoPosition>,
    radius_meters: f64,
    recording: &Recording,
) -> bool {
    let (Some(listener), Some(position)) = (listener, recording.position.as_ref()) else {
        return true;
    };
    listener.distance_to(position) <= radius_meters
}

#[cfg(test)]
mod tests {
    use super::*;
    use swgeo::distance_meters;

    fn recording_at(latitude: f64, longitude: f64) -> Recording {
        Recording::new(1, "clip.wav").with_position(GeoPosition::new(latitude, longitude))
    }

    #[test]
    fn boundary_is_inclusive() {
        let listener = GeoPosition::new(0.0, 0.0);
        // Place the clip ~50 m north and use its exact distance as the radius
        let clip = recording_at(50.0 / 111_195.0, 0.0);
        let radius = distance_meters(0.0, 0.0, clip.position.unwrap().latitude, 0.0);

        assert!(is_audible(Some(&listener), radius, &clip));
        assert!(!is_audible(Some(&listener), radius - 0.001, &clip));
    }

    #[test]
    fn far_clip_is_out_of_range() {
        let listener = GeoPosition::new(0.0, 0.0);
        let clip = recording_at(1.0, 0.0); // ~111 km away
        assert!(!is_audible(Some(&listener), 50.0, &clip));
    }

    #[test]
    fn missing_listener_position_means_everything_is_audible() {
        let clip = recording_at(1.0, 0.0);
        assert!(is_audible(None, 50.0, &clip));
    }

    #[test]
    fn clip_without_coordinates_is_always_audible() {
        let listener = GeoPosition::new(0.0, 0.0);
        let clip = Recording::new(1, "clip.wav");
        assert!(is_audible(Some(&listener), 50.0, &clip));
        assert!(is_audible(Some(&listener), 0.001, &clip));
    }
}
