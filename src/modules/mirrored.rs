use std::collections::VecDeque;

use nalgebra::Vector2;
use ndarray::Array1;

use crate::config::config::{LandmarkTopology, ScoringConfig, WindowConfig};
use crate::modules::Scorer;
use crate::utils::geometry::to_deg;
use crate::utils::landmark::LandmarkSet;
use crate::utils::score::{clamp_score, round_dp, ScoreQuality, Scores};

/// MirroredDistanceScorer is the sliding-window alternative to the clinical
/// method: each frame is aligned to the eye-center line, scaled by the
/// eye-center distance and buffered; every `stride` frames the element-wise
/// mean of the buffer is scored by reflecting right-side points across the
/// vertical axis and measuring their distance to the left-side counterparts.
#[derive(Debug, Clone)]
pub struct MirroredDistanceScorer {
    topology: LandmarkTopology,
    window: WindowConfig,
    roll_tolerance_deg: f32,
    buffer: VecDeque<Array1<f32>>,
    frames_seen: u32,
    last_roll_deg: f32,
}

impl MirroredDistanceScorer {

    /// new initializes new instance of the mirrored-distance scorer.
    pub fn new(config: &ScoringConfig) -> Self {
        MirroredDistanceScorer {
            topology: config.topology.clone(),
            window: config.window.clone(),
            roll_tolerance_deg: config.clinical.roll_tolerance_deg,
            buffer: VecDeque::with_capacity(config.window.capacity),
            frames_seen: 0,
            last_roll_deg: 0.0,
        }
    }

    pub fn buffered_frames(&self) -> usize {
        self.buffer.len()
    }

    /// normalize_frame flattens a landmark set into an eye-line-aligned,
    /// eye-distance-scaled coordinate vector centered on the midpoint of the
    /// two eye centers.
    fn normalize_frame(&self, landmarks: &LandmarkSet) -> (Array1<f32>, f32) {
        let l = landmarks.mean_of(&self.topology.eye_center_l());
        let r = landmarks.mean_of(&self.topology.eye_center_r());
        let mid = (l + r) / 2.0;
        let mut d = (l - r).norm();
        if d == 0.0 {
            d = 1.0;
        }
        let ang = (r.y - l.y).atan2(r.x - l.x);
        let (sin, cos) = (-ang).sin_cos();

        let mut flat = Vec::with_capacity(landmarks.len() * 2);
        for p in landmarks.iter() {
            let t = (p.xy() - mid) / d;
            flat.push(t.x * cos - t.y * sin);
            flat.push(t.x * sin + t.y * cos);
        }
        (Array1::from_vec(flat), to_deg(ang))
    }

    fn averaged(&self) -> Array1<f32> {
        let mut sum = self.buffer[0].clone();
        for frame in self.buffer.iter().skip(1) {
            sum = sum + frame;
        }
        sum / self.buffer.len() as f32
    }

    fn pair_mean_distance(avg: &Array1<f32>, pairs: &[(usize, usize)]) -> f32 {
        if pairs.is_empty() {
            return 0.0;
        }
        let pt = |i: usize| -> Vector2<f32> {
            if 2 * i + 1 < avg.len() {
                Vector2::new(avg[2 * i], avg[2 * i + 1])
            } else {
                Vector2::new(0.0, 0.0)
            }
        };
        let total: f32 = pairs
            .iter()
            .map(|&(il, ir)| {
                let l = pt(il);
                let r = pt(ir);
                let mirrored = Vector2::new(-r.x, r.y);
                (l - mirrored).norm()
            })
            .sum();
        total / pairs.len() as f32
    }

    fn scores_from(&self, avg: &Array1<f32>) -> Scores {
        let w = &self.window;
        let zone = |pairs: &[(usize, usize)]| {
            let mean = Self::pair_mean_distance(avg, pairs);
            100.0 - (mean * w.distance_gain).min(100.0)
        };

        let eyes = zone(&self.topology.mirror_pairs_eyes);
        let mouth = zone(&self.topology.mirror_pairs_mouth);
        let jaw = zone(&self.topology.mirror_pairs_jaw);
        let global = clamp_score(mouth * w.mouth_weight + eyes * w.eyes_weight + jaw * w.jaw_weight);

        Scores {
            global: round_dp(global, 1),
            eyes: round_dp(clamp_score(eyes), 1),
            mouth: round_dp(clamp_score(mouth), 1),
            jaw: round_dp(clamp_score(jaw), 1),
            nose: None,
            quality: ScoreQuality {
                roll_deg: round_dp(self.last_roll_deg, 1),
                roll_ok: self.last_roll_deg.abs() <= self.roll_tolerance_deg,
            },
            frames_processed: self.frames_seen,
            clinical: None,
        }
    }

    /// push_frame buffers one normalized frame, evicting the oldest when the
    /// window is full, and emits an averaged score every `stride` frames.
    ///
    /// # Arguments
    /// * `landmarks` - the raw landmark set for this frame
    ///
    /// # Returns
    /// * `Option<Scores>` - `Some` on emission frames, `None` while filling
    pub fn push_frame(&mut self, landmarks: &LandmarkSet) -> Option<Scores> {
        let (flat, roll_deg) = self.normalize_frame(landmarks);
        self.last_roll_deg = roll_deg;

        // A landmark-count change means the upstream model was swapped
        // mid-session; stale frames are not comparable.
        if self.buffer.front().is_some_and(|f| f.len() != flat.len()) {
            self.buffer.clear();
        }

        self.buffer.push_back(flat);
        while self.buffer.len() > self.window.capacity {
            self.buffer.pop_front();
        }

        self.frames_seen += 1;
        if self.frames_seen % self.window.stride == 0 {
            let avg = self.averaged();
            Some(self.scores_from(&avg))
        } else {
            None
        }
    }
}

impl Scorer for MirroredDistanceScorer {
    fn score(&mut self, landmarks: &LandmarkSet) -> Option<Scores> {
        self.push_frame(landmarks)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.frames_seen = 0;
        self.last_roll_deg = 0.0;
    }
}
