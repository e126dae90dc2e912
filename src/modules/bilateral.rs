use nalgebra::Vector2;
use crate::config::config::LandmarkTopology;
use crate::helper::align_helper::ReferenceFrame;
use crate::utils::landmark::LandmarkSet;

/// pair_score rates a left/right landmark pair against the facial midline.
///
/// A perfectly symmetric face has both sides equidistant from the midline, so
/// the absolute difference of the two midline distances, normalized by the
/// reference scale, isolates lateral asymmetry independent of face position
/// and size.
///
/// # Arguments
/// * `a` - left-side point
/// * `b` - right-side point
/// * `mid_x` - facial midline x-coordinate
/// * `reference_scale` - floored inter-eye distance
///
/// # Returns
/// * `f32` - 0..100, 100 = equidistant from the midline
pub fn pair_score(a: Vector2<f32>, b: Vector2<f32>, mid_x: f32, reference_scale: f32) -> f32 {
    let da = (a.x - mid_x).abs();
    let db = (b.x - mid_x).abs();
    let diff = (da - db).abs();
    let norm = (diff / reference_scale).min(1.0);
    100.0 * (1.0 - norm)
}

/// Per-zone bilateral scores from the midline-distance comparator.
#[derive(Debug, Clone, Copy)]
pub struct BilateralScores {
    pub eyes: f32,
    pub mouth: f32,
    pub jaw: f32,
    pub nose: f32,
}

/// zone_scores applies `pair_score` to the inner eye corners, mouth corners,
/// jaw points and nose-base points of a roll-corrected set.
pub fn zone_scores(
    corrected: &LandmarkSet,
    topology: &LandmarkTopology,
    frame: &ReferenceFrame,
) -> BilateralScores {
    let score = |l: usize, r: usize| {
        pair_score(
            corrected.point_or_origin(l),
            corrected.point_or_origin(r),
            frame.mid_x,
            frame.scale,
        )
    };

    BilateralScores {
        eyes: score(topology.eye_inner_l, topology.eye_inner_r),
        mouth: score(topology.mouth_corner_l, topology.mouth_corner_r),
        jaw: score(topology.jaw_l, topology.jaw_r),
        nose: score(topology.nose_base_l, topology.nose_base_r),
    }
}
