use crate::utils::landmark::LandmarkSet;
use crate::utils::score::Scores;

pub mod bilateral;
pub mod clinical;
pub mod composite;
pub mod mirrored;

/// Scorer is the capability implemented by both scoring strategies.
///
/// `ClinicalScorer` emits a score for every frame; `MirroredDistanceScorer`
/// accumulates frames and emits on its configured stride. Callers pick one
/// implementation per session and must not mix their state.
pub trait Scorer {
    fn score(&mut self, landmarks: &LandmarkSet) -> Option<Scores>;

    /// reset clears any retained per-session state. Must be called when the
    /// capture source stops so a new subject never sees stale carry-over.
    fn reset(&mut self);
}
