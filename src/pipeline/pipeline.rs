use crate::config::config::SmoothingConfig;
use crate::modules::Scorer;
use crate::utils::landmark::LandmarkSet;
use crate::utils::score::{round_dp, Scores, SessionState};

/// LandmarkSource is the injected capability for the external
/// landmark-detection model: given a frame it returns the landmark set for
/// zero or one detected face. The core never owns or initializes the model.
pub trait LandmarkSource<F> {
    fn detect(&mut self, frame: &F) -> Option<LandmarkSet>;
}

/// SymmetryPipeline drives one analysis session: it feeds each frame's
/// landmarks to the selected scorer, applies the exponential temporal blend
/// against the previous returned value, and tracks the session state
/// machine (`idle → detecting → {scored, no-face}`).
///
/// The previous score and the scorer's window buffer are the only mutable
/// state; both are cleared by `stop` so a new subject never inherits
/// carry-over from the last session.
#[derive(Debug, Clone)]
pub struct SymmetryPipeline<S: Scorer> {
    scorer: S,
    smoothing: SmoothingConfig,
    prev: Option<Scores>,
    frames_processed: u32,
    state: SessionState,
}

impl<S: Scorer> SymmetryPipeline<S> {

    /// new initializes new instance of the pipeline.
    pub fn new(scorer: S, in_smoothing: Option<SmoothingConfig>) -> Self {
        SymmetryPipeline {
            scorer,
            smoothing: in_smoothing.unwrap_or_else(SmoothingConfig::new),
            prev: None,
            frames_processed: 0,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_scores(&self) -> Option<&Scores> {
        self.prev.as_ref()
    }

    /// process_frame scores the landmarks of one frame, or registers the
    /// absence of a face (which is distinct from a zero score).
    ///
    /// On the very first scored frame the new value passes through unchanged;
    /// afterwards each score is blended `blend_new × new + blend_prev × prev`
    /// against the previously returned value.
    ///
    /// # Arguments
    /// * `landmarks` - `Some` landmark set, or `None` when no face was detected
    ///
    /// # Returns
    /// * `Option<Scores>` - `Some` whenever the scorer emitted for this frame
    pub fn process_frame(&mut self, landmarks: Option<&LandmarkSet>) -> Option<Scores> {
        let landmarks = match landmarks {
            None => {
                self.state = SessionState::NoFace;
                return None;
            }
            Some(landmarks) => landmarks,
        };

        self.state = SessionState::Detecting;
        let fresh = match self.scorer.score(landmarks) {
            // Window-based scorers emit only on their stride; the session
            // stays in detecting until the next emission.
            None => return None,
            Some(fresh) => fresh,
        };

        self.frames_processed += 1;
        let mut blended = self.blend(fresh);
        blended.frames_processed = self.frames_processed;
        self.prev = Some(blended.clone());
        self.state = SessionState::Scored;
        Some(blended)
    }

    /// process_source runs detection on a frame through the injected model
    /// and scores the result.
    ///
    /// # Arguments
    /// * `source` - the landmark-detection capability
    /// * `frame` - an opaque frame handle for the source
    ///
    /// # Returns
    /// * `Option<Scores>`
    pub fn process_source<F>(
        &mut self,
        source: &mut impl LandmarkSource<F>,
        frame: &F,
    ) -> Option<Scores> {
        let landmarks = source.detect(frame);
        self.process_frame(landmarks.as_ref())
    }

    /// score_still scores a single uploaded image: any previous smoothing
    /// state is discarded and the result is reported unblended with a frame
    /// count of one.
    pub fn score_still(&mut self, landmarks: &LandmarkSet) -> Option<Scores> {
        self.stop();
        self.state = SessionState::Detecting;
        let mut scores = self.scorer.score(landmarks)?;
        scores.frames_processed = 1;
        self.frames_processed = 1;
        self.prev = Some(scores.clone());
        self.state = SessionState::Scored;
        Some(scores)
    }

    /// stop ends the session: the state machine returns to idle and both the
    /// smoothing state and the scorer's buffered frames are cleared.
    pub fn stop(&mut self) {
        self.state = SessionState::Idle;
        self.prev = None;
        self.frames_processed = 0;
        self.scorer.reset();
    }

    fn blend(&self, fresh: Scores) -> Scores {
        let prev = match &self.prev {
            // First frame passes through unchanged.
            None => return fresh,
            Some(prev) => prev,
        };

        let a = self.smoothing.blend_new;
        let b = self.smoothing.blend_prev();
        let mix = |new: f32, old: f32| round_dp(new * a + old * b, 1);

        Scores {
            global: mix(fresh.global, prev.global),
            eyes: mix(fresh.eyes, prev.eyes),
            mouth: mix(fresh.mouth, prev.mouth),
            jaw: mix(fresh.jaw, prev.jaw),
            nose: match (fresh.nose, prev.nose) {
                (Some(new), Some(old)) => Some(mix(new, old)),
                (new, _) => new,
            },
            // Quality and clinical detail always reflect the latest frame.
            quality: fresh.quality,
            frames_processed: fresh.frames_processed,
            clinical: fresh.clinical,
        }
    }
}
