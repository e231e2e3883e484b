//! Joint angle calculation using dot product
//!
//! The angle at a joint is measured between the two segments leaving it,
//! e.g. elbow→shoulder (upper arm) and elbow→wrist (forearm).

use nalgebra::Vector3;

use crate::bridge::Landmark;

/// Segments shorter than this cannot define a direction
const MIN_SEGMENT: f32 = 1e-4;

/// Angle at `vertex` between `vertex→a` and `vertex→c`, in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns angle in degrees, range [0, 180]:
/// - 180° = the three points are collinear with the vertex in the middle
/// - 90° = segments perpendicular
pub fn joint_angle(a: Vector3<f32>, vertex: Vector3<f32>, c: Vector3<f32>) -> f32 {
    let v1 = a - vertex;
    let v2 = c - vertex;

    let mag1 = v1.norm();
    let mag2 = v2.norm();

    // Handle degenerate case
    if mag1 < MIN_SEGMENT || mag2 < MIN_SEGMENT {
        return 180.0; // Assume straight if we can't calculate
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees().min(180.0)
}

/// Position of a landmark as a vector; depth is dropped unless requested
pub fn landmark_vector(landmark: &Landmark, use_depth: bool) -> Vector3<f32> {
    let z = if use_depth { landmark.z } else { 0.0 };
    Vector3::new(landmark.x, landmark.y, z)
}

/// Joint angle between three landmarks
pub fn landmark_angle(a: &Landmark, vertex: &Landmark, c: &Landmark, use_depth: bool) -> f32 {
    joint_angle(
        landmark_vector(a, use_depth),
        landmark_vector(vertex, use_depth),
        landmark_vector(c, use_depth),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_arm() {
        // Arm in a straight line
        let shoulder = Vector3::new(0.0, 0.0, 0.0);
        let elbow = Vector3::new(0.5, 0.0, 0.0);
        let wrist = Vector3::new(1.0, 0.0, 0.0);
        let angle = joint_angle(shoulder, elbow, wrist);
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_bent_arm() {
        // Arm bent at 90 degrees
        let shoulder = Vector3::new(0.0, 0.0, 0.0);
        let elbow = Vector3::new(0.5, 0.0, 0.0);
        let wrist = Vector3::new(0.5, 0.5, 0.0);
        let angle = joint_angle(shoulder, elbow, wrist);
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_folded_back() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let vertex = Vector3::new(0.0, 0.0, 0.0);
        let c = Vector3::new(2.0, 0.0, 0.0);
        assert!(joint_angle(a, vertex, c).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Vector3::new(0.3, 0.3, 0.0);
        assert_eq!(joint_angle(p, p, Vector3::new(1.0, 0.0, 0.0)), 180.0);
    }

    #[test]
    fn test_depth_only_counts_when_enabled() {
        let a = Landmark::new(0.0, 0.0, 0.0, 1.0);
        let vertex = Landmark::new(0.5, 0.0, 0.0, 1.0);
        let c = Landmark::new(1.0, 0.0, 0.5, 1.0);

        assert!((landmark_angle(&a, &vertex, &c, false) - 180.0).abs() < 1e-3);
        assert!((landmark_angle(&a, &vertex, &c, true) - 135.0).abs() < 1e-3);
    }
}
