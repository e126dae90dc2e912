use rs_facesym::config::config::ScoringConfig;
use rs_facesym::modules::composite::ClinicalScorer;
use rs_facesym::modules::mirrored::MirroredDistanceScorer;
use rs_facesym::pipeline::pipeline::SymmetryPipeline;
use rs_facesym::utils::landmark::{Landmark, LandmarkSet};
use rs_facesym::utils::score::SessionState;

/// Mirror-symmetric synthetic face about x = 0.5, outer eye corners at
/// (0.4, 0.5) and (0.6, 0.5).
fn symmetric_face() -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.5); 478];
    let mut mirror = |l: usize, r: usize, x_off: f32, y: f32| {
        points[l] = Landmark::new(0.5 - x_off, y);
        points[r] = Landmark::new(0.5 + x_off, y);
    };
    mirror(33, 263, 0.1, 0.5); // outer eye corners
    mirror(133, 362, 0.05, 0.5); // inner eye corners
    mirror(159, 386, 0.075, 0.49); // upper lids
    mirror(145, 374, 0.075, 0.51); // lower lids
    mirror(61, 291, 0.06, 0.62); // mouth corners
    mirror(78, 308, 0.05, 0.62);
    mirror(172, 397, 0.15, 0.65); // jaw
    mirror(58, 288, 0.13, 0.68);
    mirror(132, 361, 0.14, 0.60);
    mirror(98, 327, 0.03, 0.58); // nose base
    mirror(105, 334, 0.08, 0.45); // brow apices
    points[1] = Landmark::new(0.5, 0.56);
    points[13] = Landmark::new(0.5, 0.615);
    points[14] = Landmark::new(0.5, 0.625);
    points[0] = Landmark::new(0.5, 0.60);
    points[17] = Landmark::new(0.5, 0.64);
    LandmarkSet::new(points)
}

#[test]
fn clinical_session_scores_symmetric_face_near_perfect() {
    let config = ScoringConfig::new();
    let mut pipeline = SymmetryPipeline::new(ClinicalScorer::new(&config), None);
    let face = symmetric_face();

    let mut last = None;
    for _ in 0..10 {
        last = pipeline.process_frame(Some(&face));
    }
    let scores = last.unwrap();
    assert!(scores.global >= 99.0, "global was {}", scores.global);
    assert!(scores.quality.roll_ok);
    assert_eq!(scores.frames_processed, 10);

    let clinical = scores.clinical.as_ref().unwrap();
    assert!((clinical.mid_x - 0.5).abs() < 1e-3);
    assert!(!clinical.smile_likely);
}

#[test]
fn all_scores_stay_in_range_for_distorted_faces() {
    let config = ScoringConfig::new();
    let mut pipeline = SymmetryPipeline::new(ClinicalScorer::new(&config), None);

    // Progressively drag the right half of the face downwards and outwards.
    for step in 0..30 {
        let k = step as f32 / 30.0;
        let face = symmetric_face().map(|p| {
            if p.x > 0.5 {
                nalgebra::Vector2::new(p.x + 0.2 * k, p.y + 0.15 * k)
            } else {
                p
            }
        });
        let scores = pipeline.process_frame(Some(&face)).unwrap();
        for v in [scores.global, scores.eyes, scores.mouth, scores.jaw] {
            assert!((0.0..=100.0).contains(&v), "score {} out of range", v);
        }
    }
}

#[test]
fn mirrored_session_emits_on_stride_and_clears_on_stop() {
    let config = ScoringConfig::new();
    let mut pipeline = SymmetryPipeline::new(MirroredDistanceScorer::new(&config), None);
    let face = symmetric_face();

    let mut emissions = 0;
    for _ in 0..24 {
        if pipeline.process_frame(Some(&face)).is_some() {
            emissions += 1;
        }
    }
    assert_eq!(emissions, 3);
    let scores = pipeline.last_scores().unwrap();
    assert!(scores.global > 90.0);
    assert!(scores.nose.is_none());

    pipeline.stop();
    assert_eq!(pipeline.state(), SessionState::Idle);
    assert!(pipeline.last_scores().is_none());
}

#[test]
fn session_state_transitions() {
    let config = ScoringConfig::new();
    let mut pipeline = SymmetryPipeline::new(ClinicalScorer::new(&config), None);
    assert_eq!(pipeline.state(), SessionState::Idle);

    assert!(pipeline.process_frame(None).is_none());
    assert_eq!(pipeline.state(), SessionState::NoFace);

    pipeline.process_frame(Some(&symmetric_face()));
    assert_eq!(pipeline.state(), SessionState::Scored);

    pipeline.stop();
    assert_eq!(pipeline.state(), SessionState::Idle);
}

#[test]
fn scores_serialize_for_the_ui_boundary() {
    let config = ScoringConfig::new();
    let mut pipeline = SymmetryPipeline::new(ClinicalScorer::new(&config), None);
    let scores = pipeline.process_frame(Some(&symmetric_face())).unwrap();

    let raw = serde_json::to_string(&scores).unwrap();
    assert!(raw.contains("\"global\""));
    assert!(raw.contains("\"roll_ok\":true"));

    let parsed: rs_facesym::utils::score::Scores = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, scores);
}

#[test]
fn landmark_sets_load_from_model_json() {
    let face = symmetric_face();
    let raw = serde_json::to_string(&face).unwrap();
    let parsed = LandmarkSet::from_json(&raw).unwrap();
    assert_eq!(parsed, face);

    let config = ScoringConfig::new();
    let mut pipeline = SymmetryPipeline::new(ClinicalScorer::new(&config), None);
    let scores = pipeline.score_still(&parsed).unwrap();
    assert!(scores.global >= 99.0);
    assert_eq!(scores.frames_processed, 1);
}
