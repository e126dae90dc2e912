use crate::config::config::{ClinicalConfig, LandmarkTopology};
use crate::utils::geometry::{distance, midpoint, rotate_around, to_deg};
use crate::utils::landmark::LandmarkSet;

/// A landmark set with head tilt removed, plus the measured roll in degrees.
/// Lives only for the duration of one scoring call.
#[derive(Debug, Clone)]
pub struct RollCorrected {
    pub landmarks: LandmarkSet,
    pub roll_deg: f32,
}

/// Midline and scale reference derived from the roll-corrected eye corners.
///
/// Every absolute distance must be divided by `scale` before it is compared
/// across zones or across subjects.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceFrame {
    pub mid_x: f32,
    pub scale: f32,
    pub roll_deg: f32,
    pub roll_ok: bool,
}

#[derive(Debug, Clone)]
pub struct AlignHelper {
    topology: LandmarkTopology,
    min_reference_scale: f32,
    roll_tolerance_deg: f32,
}

impl AlignHelper {

    /// new initializes new instance of the alignment helper.
    pub fn new(in_topology: Option<LandmarkTopology>, in_clinical: Option<ClinicalConfig>) -> Self {
        let topology = in_topology.unwrap_or_else(LandmarkTopology::new);
        let clinical = in_clinical.unwrap_or_else(ClinicalConfig::new);

        AlignHelper {
            topology,
            min_reference_scale: clinical.min_reference_scale,
            roll_tolerance_deg: clinical.roll_tolerance_deg,
        }
    }

    /// deroll removes head tilt by rotating every landmark about the
    /// outer-eye midpoint by the negative of the measured eye-line angle.
    ///
    /// When both eye corners are missing they default to the origin and the
    /// measured angle is `atan2(0, 0) = 0`, so no correction is applied and
    /// downstream metrics degrade instead of failing.
    ///
    /// # Arguments
    /// * `landmarks` - the raw landmark set from the upstream model
    ///
    /// # Returns
    /// * `RollCorrected`
    pub fn deroll(&self, landmarks: &LandmarkSet) -> RollCorrected {
        let l = landmarks.point_or_origin(self.topology.eye_outer_l);
        let r = landmarks.point_or_origin(self.topology.eye_outer_r);
        let center = midpoint(l, r);
        let roll_deg = to_deg((r.y - l.y).atan2(r.x - l.x));
        let corrected = landmarks.map(|p| rotate_around(p, center, -roll_deg));

        RollCorrected {
            landmarks: corrected,
            roll_deg,
        }
    }

    /// reference_frame derives the facial midline and the floored inter-eye
    /// reference scale from a roll-corrected set.
    pub fn reference_frame(&self, corrected: &RollCorrected) -> ReferenceFrame {
        let l = corrected.landmarks.point_or_origin(self.topology.eye_outer_l);
        let r = corrected.landmarks.point_or_origin(self.topology.eye_outer_r);
        let mid = midpoint(l, r);
        let scale = distance(l, r).max(self.min_reference_scale);

        ReferenceFrame {
            mid_x: mid.x,
            scale,
            roll_deg: corrected.roll_deg,
            roll_ok: corrected.roll_deg.abs() <= self.roll_tolerance_deg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::rotate_around;
    use crate::utils::landmark::{Landmark, LandmarkSet};
    use nalgebra::Vector2;

    fn eye_corner_set(l: (f32, f32), r: (f32, f32)) -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); 478];
        points[33] = Landmark::new(l.0, l.1);
        points[263] = Landmark::new(r.0, r.1);
        LandmarkSet::new(points)
    }

    #[test]
    fn test_deroll_horizontal_eye_line() {
        let helper = AlignHelper::new(None, None);
        let corrected = helper.deroll(&eye_corner_set((0.4, 0.5), (0.6, 0.5)));
        assert!(corrected.roll_deg.abs() < 1e-4);
    }

    #[test]
    fn test_deroll_recovers_tilt() {
        let helper = AlignHelper::new(None, None);
        let pivot = Vector2::new(0.5, 0.5);
        let tilted = eye_corner_set((0.4, 0.5), (0.6, 0.5))
            .map(|p| rotate_around(p, pivot, 9.0));
        let corrected = helper.deroll(&tilted);
        assert!((corrected.roll_deg - 9.0).abs() < 1e-2);

        // After correction the eye line must be horizontal again.
        let l = corrected.landmarks.point_or_origin(33);
        let r = corrected.landmarks.point_or_origin(263);
        assert!((l.y - r.y).abs() < 1e-5);
    }

    #[test]
    fn test_reference_frame_floors_degenerate_scale() {
        let helper = AlignHelper::new(None, None);
        let corrected = helper.deroll(&eye_corner_set((0.5, 0.5), (0.5, 0.5)));
        let frame = helper.reference_frame(&corrected);
        assert_eq!(frame.scale, 0.04);
    }

    #[test]
    fn test_roll_ok_tolerance() {
        let helper = AlignHelper::new(None, None);
        let pivot = Vector2::new(0.5, 0.5);
        let tilted = eye_corner_set((0.4, 0.5), (0.6, 0.5))
            .map(|p| rotate_around(p, pivot, 8.0));
        let corrected = helper.deroll(&tilted);
        let frame = helper.reference_frame(&corrected);
        assert!(!frame.roll_ok);

        let level = helper.deroll(&eye_corner_set((0.4, 0.5), (0.6, 0.5)));
        assert!(helper.reference_frame(&level).roll_ok);
    }
}
