use crate::config::config::{CompositeWeights, LandmarkTopology, ScoringConfig};
use crate::helper::align_helper::AlignHelper;
use crate::modules::bilateral::zone_scores;
use crate::modules::clinical::ClinicalExtractor;
use crate::modules::Scorer;
use crate::utils::landmark::LandmarkSet;
use crate::utils::score::{clamp_score, round_dp, ScoreQuality, Scores};

/// ClinicalScorer combines bilateral and clinical signals into per-zone and
/// global scores, one result per frame.
#[derive(Debug, Clone)]
pub struct ClinicalScorer {
    align: AlignHelper,
    extractor: ClinicalExtractor,
    weights: CompositeWeights,
    topology: LandmarkTopology,
}

impl ClinicalScorer {

    /// new initializes new instance of the clinical scorer.
    pub fn new(config: &ScoringConfig) -> Self {
        ClinicalScorer {
            align: AlignHelper::new(Some(config.topology.clone()), Some(config.clinical.clone())),
            extractor: ClinicalExtractor::new(
                Some(config.topology.clone()),
                Some(config.clinical.clone()),
            ),
            weights: config.weights.clone(),
            topology: config.topology.clone(),
        }
    }

    /// score_once derives a fresh score bundle from one landmark set.
    ///
    /// Roll correction runs first, then the bilateral comparator and the
    /// clinical extractor, then the weighted zone blend. When a smile is
    /// detected the mouth-vertical and mouth-angle weights are reduced and
    /// the remainder shifts onto the bilateral mouth-corner score, since
    /// smiling displaces mouth geometry for reasons unrelated to pathological
    /// asymmetry. The global score is then floored by the worst critical
    /// sub-metric so one severely asymmetric feature cannot be masked.
    ///
    /// # Arguments
    /// * `landmarks` - the raw landmark set from the upstream model
    ///
    /// # Returns
    /// * `Scores`
    pub fn score_once(&self, landmarks: &LandmarkSet) -> Scores {
        let corrected = self.align.deroll(landmarks);
        let frame = self.align.reference_frame(&corrected);

        let bilateral = zone_scores(&corrected.landmarks, &self.topology, &frame);
        let signals = self.extractor.extract(&corrected.landmarks, &frame);

        let w = &self.weights;
        let eyes = bilateral.eyes * w.eyes_bilateral + signals.aperture_score * (1.0 - w.eyes_bilateral);

        let (vert_weight, angle_weight) = if signals.smile_likely {
            (w.mouth_vert_smile, w.mouth_angle_smile)
        } else {
            (w.mouth_vert, w.mouth_angle)
        };
        let corner_weight = 1.0 - vert_weight - angle_weight;
        let mouth = bilateral.mouth * corner_weight
            + signals.mouth_vert_score * vert_weight
            + signals.mouth_angle_score * angle_weight;

        let jaw = bilateral.jaw;
        let nose = bilateral.nose;

        let mut global = eyes * w.eyes + mouth * w.mouth + jaw * w.jaw + nose * w.nose;
        let critical_min = signals
            .aperture_score
            .min(signals.mouth_vert_score)
            .min(signals.mouth_angle_score);
        global = global.min(critical_min * w.critical_floor + global * (1.0 - w.critical_floor));

        Scores {
            global: round_dp(clamp_score(global), 1),
            eyes: round_dp(clamp_score(eyes), 1),
            mouth: round_dp(clamp_score(mouth), 1),
            jaw: round_dp(clamp_score(jaw), 1),
            nose: Some(round_dp(clamp_score(nose), 1)),
            quality: ScoreQuality {
                roll_deg: round_dp(frame.roll_deg, 1),
                roll_ok: frame.roll_ok,
            },
            frames_processed: 1,
            clinical: Some(signals.to_metrics()),
        }
    }
}

impl Scorer for ClinicalScorer {
    fn score(&mut self, landmarks: &LandmarkSet) -> Option<Scores> {
        Some(self.score_once(landmarks))
    }

    fn reset(&mut self) {}
}
