use serde::{Deserialize, Serialize};

/// round_dp rounds a value to `dp` decimal places for display stability.
/// Internal score composition must always use unrounded values.
pub fn round_dp(v: f32, dp: u32) -> f32 {
    let p = 10f32.powi(dp as i32);
    (v * p).round() / p
}

pub fn clamp_score(v: f32) -> f32 {
    v.clamp(0.0, 100.0)
}

/// Derived clinical scalars, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalMetrics {
    pub eyes_apert_l: f32,
    pub eyes_apert_r: f32,
    pub eyes_apert_diff: f32,
    pub mouth_angle_deg: f32,
    pub mouth_vert_diff: f32,
    pub dental_proxy: f32,
    pub smile_likely: bool,
    pub brow_eye_dist_l: f32,
    pub brow_eye_dist_r: f32,
    pub brow_asym: f32,
    pub mid_x: f32,
}

/// Quality signal surfaced alongside every score so the caller can warn the
/// user instead of silently trusting an unreliable measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreQuality {
    pub roll_deg: f32,
    pub roll_ok: bool,
}

/// Per-zone and global symmetry scores in [0, 100], 100 = perfectly symmetric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub global: f32,
    pub eyes: f32,
    pub mouth: f32,
    pub jaw: f32,
    pub nose: Option<f32>,
    pub quality: ScoreQuality,
    pub frames_processed: u32,
    pub clinical: Option<ClinicalMetrics>,
}

/// Per-session analysis state, looping per frame while capture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Detecting,
    Scored,
    NoFace,
}
