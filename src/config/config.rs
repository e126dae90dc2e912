use anyhow::Error;
use serde::{Deserialize, Serialize};

/// LandmarkTopology maps semantic facial features to indices into the
/// landmark set. The defaults target the MediaPipe FaceMesh topology; when a
/// different landmark model is substituted the whole table must be
/// revalidated, so it is configuration, not derived data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandmarkTopology {
    pub eye_outer_l: usize,
    pub eye_outer_r: usize,
    pub eye_inner_l: usize,
    pub eye_inner_r: usize,
    pub eye_lid_top_l: usize,
    pub eye_lid_bottom_l: usize,
    pub eye_lid_top_r: usize,
    pub eye_lid_bottom_r: usize,
    pub mouth_corner_l: usize,
    pub mouth_corner_r: usize,
    pub upper_lip: usize,
    pub lower_lip: usize,
    pub jaw_l: usize,
    pub jaw_r: usize,
    pub nose_tip: usize,
    pub nose_base_l: usize,
    pub nose_base_r: usize,
    pub brow_l: usize,
    pub brow_r: usize,
    pub mirror_pairs_eyes: Vec<(usize, usize)>,
    pub mirror_pairs_mouth: Vec<(usize, usize)>,
    pub mirror_pairs_jaw: Vec<(usize, usize)>,
}

impl LandmarkTopology {
    pub fn new() -> Self {
        LandmarkTopology {
            eye_outer_l: 33,
            eye_outer_r: 263,
            eye_inner_l: 133,
            eye_inner_r: 362,
            eye_lid_top_l: 159,
            eye_lid_bottom_l: 145,
            eye_lid_top_r: 386,
            eye_lid_bottom_r: 374,
            mouth_corner_l: 61,
            mouth_corner_r: 291,
            upper_lip: 13,
            lower_lip: 14,
            jaw_l: 172,
            jaw_r: 397,
            nose_tip: 1,
            nose_base_l: 98,
            nose_base_r: 327,
            brow_l: 105,
            brow_r: 334,
            mirror_pairs_eyes: vec![(33, 263), (133, 362), (159, 386), (145, 374)],
            mirror_pairs_mouth: vec![(61, 291), (78, 308), (13, 14), (0, 17)],
            mirror_pairs_jaw: vec![(172, 397), (58, 288), (132, 361)],
        }
    }

    /// eye_center_l lists the four landmarks averaged into the left eye center.
    pub fn eye_center_l(&self) -> [usize; 4] {
        [
            self.eye_outer_l,
            self.eye_inner_l,
            self.eye_lid_top_l,
            self.eye_lid_bottom_l,
        ]
    }

    pub fn eye_center_r(&self) -> [usize; 4] {
        [
            self.eye_inner_r,
            self.eye_outer_r,
            self.eye_lid_top_r,
            self.eye_lid_bottom_r,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalConfig {
    pub min_reference_scale: f32,
    pub mouth_angle_limit_deg: f32,
    pub smile_dental_threshold: f32,
    pub roll_tolerance_deg: f32,
}

impl ClinicalConfig {
    pub fn new() -> Self {
        ClinicalConfig {
            min_reference_scale: 0.04,
            mouth_angle_limit_deg: 12.0,
            smile_dental_threshold: 0.25,
            roll_tolerance_deg: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeWeights {
    pub eyes: f32,
    pub mouth: f32,
    pub jaw: f32,
    pub nose: f32,
    pub eyes_bilateral: f32,
    pub mouth_vert: f32,
    pub mouth_angle: f32,
    pub mouth_vert_smile: f32,
    pub mouth_angle_smile: f32,
    pub critical_floor: f32,
}

impl CompositeWeights {
    pub fn new() -> Self {
        CompositeWeights {
            eyes: 0.32,
            mouth: 0.38,
            jaw: 0.18,
            nose: 0.12,
            eyes_bilateral: 0.5,
            mouth_vert: 0.4,
            mouth_angle: 0.2,
            mouth_vert_smile: 0.2,
            mouth_angle_smile: 0.1,
            critical_floor: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmoothingConfig {
    pub blend_new: f32,
}

impl SmoothingConfig {
    pub fn new() -> Self {
        SmoothingConfig { blend_new: 0.8 }
    }

    pub fn blend_prev(&self) -> f32 {
        1.0 - self.blend_new
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    pub capacity: usize,
    pub stride: u32,
    pub distance_gain: f32,
    pub mouth_weight: f32,
    pub eyes_weight: f32,
    pub jaw_weight: f32,
}

impl WindowConfig {
    pub fn new() -> Self {
        WindowConfig {
            capacity: 80,
            stride: 8,
            distance_gain: 200.0,
            mouth_weight: 0.5,
            eyes_weight: 0.25,
            jaw_weight: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    pub topology: LandmarkTopology,
    pub clinical: ClinicalConfig,
    pub weights: CompositeWeights,
    pub smoothing: SmoothingConfig,
    pub window: WindowConfig,
}

impl ScoringConfig {
    pub fn new() -> Self {
        ScoringConfig {
            topology: LandmarkTopology::new(),
            clinical: ClinicalConfig::new(),
            weights: CompositeWeights::new(),
            smoothing: SmoothingConfig::new(),
            window: WindowConfig::new(),
        }
    }

    /// from_json loads a full scoring configuration from a JSON document.
    ///
    /// # Arguments
    /// * `raw` - JSON string
    ///
    /// # Returns
    /// * `Result<ScoringConfig, Error>`
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let config: ScoringConfig = serde_json::from_str(raw)?;
        Ok(config)
    }
}
