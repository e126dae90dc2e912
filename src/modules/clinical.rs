use crate::config::config::{ClinicalConfig, LandmarkTopology};
use crate::helper::align_helper::ReferenceFrame;
use crate::utils::geometry::{distance, to_deg};
use crate::utils::landmark::LandmarkSet;
use crate::utils::score::{round_dp, ClinicalMetrics};

const APERTURE_EPS: f32 = 1e-6;

/// Unrounded clinical measurements and sub-scores for one frame.
///
/// Score composition works on these raw values; only `to_metrics` quantizes
/// for display, so rounding error never compounds across the pipeline.
#[derive(Debug, Clone)]
pub struct ClinicalSignals {
    pub aperture_l: f32,
    pub aperture_r: f32,
    pub aperture_diff: f32,
    pub aperture_score: f32,
    pub mouth_vert_diff: f32,
    pub mouth_vert_score: f32,
    pub mouth_angle_deg: f32,
    pub mouth_angle_score: f32,
    pub dental_proxy: f32,
    pub smile_likely: bool,
    pub brow_eye_dist_l: f32,
    pub brow_eye_dist_r: f32,
    pub brow_asym: f32,
    pub mid_x: f32,
}

impl ClinicalSignals {
    /// to_metrics rounds the measurements to their display precisions.
    pub fn to_metrics(&self) -> ClinicalMetrics {
        ClinicalMetrics {
            eyes_apert_l: round_dp(self.aperture_l, 4),
            eyes_apert_r: round_dp(self.aperture_r, 4),
            eyes_apert_diff: round_dp(self.aperture_diff, 4),
            mouth_angle_deg: round_dp(self.mouth_angle_deg, 1),
            mouth_vert_diff: round_dp(self.mouth_vert_diff, 3),
            dental_proxy: round_dp(self.dental_proxy, 3),
            smile_likely: self.smile_likely,
            brow_eye_dist_l: round_dp(self.brow_eye_dist_l, 3),
            brow_eye_dist_r: round_dp(self.brow_eye_dist_r, 3),
            brow_asym: round_dp(self.brow_asym, 3),
            mid_x: round_dp(self.mid_x, 4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClinicalExtractor {
    topology: LandmarkTopology,
    mouth_angle_limit_deg: f32,
    smile_dental_threshold: f32,
}

impl ClinicalExtractor {

    /// new initializes new instance of the clinical metric extractor.
    pub fn new(in_topology: Option<LandmarkTopology>, in_clinical: Option<ClinicalConfig>) -> Self {
        let topology = in_topology.unwrap_or_else(LandmarkTopology::new);
        let clinical = in_clinical.unwrap_or_else(ClinicalConfig::new);

        ClinicalExtractor {
            topology,
            mouth_angle_limit_deg: clinical.mouth_angle_limit_deg,
            smile_dental_threshold: clinical.smile_dental_threshold,
        }
    }

    /// extract computes the clinical sub-metrics from a roll-corrected set.
    ///
    /// # Arguments
    /// * `corrected` - roll-corrected landmark set
    /// * `frame` - midline and reference scale for that set
    ///
    /// # Returns
    /// * `ClinicalSignals`
    pub fn extract(&self, corrected: &LandmarkSet, frame: &ReferenceFrame) -> ClinicalSignals {
        let t = &self.topology;

        // Eye aperture: lower lid minus upper lid, floored at zero per side.
        let aperture_l = (corrected.point_or_origin(t.eye_lid_bottom_l).y
            - corrected.point_or_origin(t.eye_lid_top_l).y)
            .max(0.0);
        let aperture_r = (corrected.point_or_origin(t.eye_lid_bottom_r).y
            - corrected.point_or_origin(t.eye_lid_top_r).y)
            .max(0.0);
        let aperture_diff = (aperture_l - aperture_r).abs();
        let aperture_ratio_diff = aperture_diff / aperture_l.max(aperture_r).max(APERTURE_EPS);
        let aperture_score = 100.0 * (1.0 - aperture_ratio_diff.min(1.0));

        // Mouth: commissure vertical offset and commissure-line angle.
        let mouth_l = corrected.point_or_origin(t.mouth_corner_l);
        let mouth_r = corrected.point_or_origin(t.mouth_corner_r);
        let mouth_vert_diff = (mouth_l.y - mouth_r.y).abs() / frame.scale;
        let mouth_vert_score = 100.0 * (1.0 - mouth_vert_diff.min(1.0));
        let mouth_angle_deg = to_deg((mouth_r.y - mouth_l.y).atan2(mouth_r.x - mouth_l.x)).abs();
        let mouth_angle_score =
            100.0 * (1.0 - (mouth_angle_deg / self.mouth_angle_limit_deg).min(1.0));

        // Dental-area proxy: mouth width times lip opening over scale squared.
        let mouth_open = (corrected.point_or_origin(t.lower_lip).y
            - corrected.point_or_origin(t.upper_lip).y)
            .max(0.0);
        let mouth_width = distance(mouth_r, mouth_l).max(APERTURE_EPS);
        let dental_proxy = (mouth_width * mouth_open) / (frame.scale * frame.scale);
        let smile_likely = dental_proxy > self.smile_dental_threshold;

        // Brow apex to eye center, vertical, per side.
        let eye_center_l = corrected.mean_of(&t.eye_center_l());
        let eye_center_r = corrected.mean_of(&t.eye_center_r());
        let brow_eye_dist_l =
            (eye_center_l.y - corrected.point_or_origin(t.brow_l).y).max(0.0) / frame.scale;
        let brow_eye_dist_r =
            (eye_center_r.y - corrected.point_or_origin(t.brow_r).y).max(0.0) / frame.scale;
        let brow_asym = (brow_eye_dist_l - brow_eye_dist_r).abs();

        ClinicalSignals {
            aperture_l,
            aperture_r,
            aperture_diff,
            aperture_score,
            mouth_vert_diff,
            mouth_vert_score,
            mouth_angle_deg,
            mouth_angle_score,
            dental_proxy,
            smile_likely,
            brow_eye_dist_l,
            brow_eye_dist_r,
            brow_asym,
            mid_x: frame.mid_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::align_helper::AlignHelper;
    use crate::utils::landmark::{Landmark, LandmarkSet};

    fn base_face() -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.5); 478];
        points[33] = Landmark::new(0.4, 0.5);
        points[263] = Landmark::new(0.6, 0.5);
        points[133] = Landmark::new(0.45, 0.5);
        points[362] = Landmark::new(0.55, 0.5);
        points[159] = Landmark::new(0.425, 0.49);
        points[145] = Landmark::new(0.425, 0.51);
        points[386] = Landmark::new(0.575, 0.49);
        points[374] = Landmark::new(0.575, 0.51);
        points[61] = Landmark::new(0.44, 0.62);
        points[291] = Landmark::new(0.56, 0.62);
        points[13] = Landmark::new(0.5, 0.615);
        points[14] = Landmark::new(0.5, 0.625);
        points[105] = Landmark::new(0.42, 0.45);
        points[334] = Landmark::new(0.58, 0.45);
        points
    }

    fn extract(points: Vec<Landmark>) -> ClinicalSignals {
        let set = LandmarkSet::new(points);
        let helper = AlignHelper::new(None, None);
        let extractor = ClinicalExtractor::new(None, None);
        let corrected = helper.deroll(&set);
        let frame = helper.reference_frame(&corrected);
        extractor.extract(&corrected.landmarks, &frame)
    }

    #[test]
    fn test_symmetric_face_scores_perfect() {
        let signals = extract(base_face());
        assert!((signals.aperture_score - 100.0).abs() < 1e-3);
        assert!((signals.mouth_vert_score - 100.0).abs() < 1e-3);
        assert!((signals.mouth_angle_score - 100.0).abs() < 1e-3);
        assert!(signals.brow_asym < 1e-5);
        assert!(!signals.smile_likely);
    }

    #[test]
    fn test_aperture_asymmetry_drops_score() {
        let mut points = base_face();
        // Right eye nearly closed.
        points[386] = Landmark::new(0.575, 0.505);
        points[374] = Landmark::new(0.575, 0.51);
        let signals = extract(points);
        assert!(signals.aperture_score < 100.0);
        assert!(signals.aperture_diff > 0.0);
    }

    #[test]
    fn test_smile_flag_threshold() {
        // ref = 0.2, width = 0.12: opening 0.09 puts the proxy at 0.27.
        let mut smiling = base_face();
        smiling[13] = Landmark::new(0.5, 0.58);
        smiling[14] = Landmark::new(0.5, 0.67);
        let signals = extract(smiling);
        assert!(signals.dental_proxy > 0.25);
        assert!(signals.smile_likely);

        let neutral = extract(base_face());
        assert!(!neutral.smile_likely);
    }

    #[test]
    fn test_mouth_angle_capped_falloff() {
        let mut points = base_face();
        // Commissure line tilted well past the 12 degree cap.
        points[61] = Landmark::new(0.44, 0.58);
        points[291] = Landmark::new(0.56, 0.66);
        let signals = extract(points);
        assert!(signals.mouth_angle_deg > 12.0);
        assert_eq!(signals.mouth_angle_score, 0.0);
    }

    #[test]
    fn test_metrics_rounding() {
        let signals = extract(base_face());
        let metrics = signals.to_metrics();
        assert_eq!(metrics.eyes_apert_l, round_dp(signals.aperture_l, 4));
        assert_eq!(metrics.mid_x, 0.5);
    }
}
