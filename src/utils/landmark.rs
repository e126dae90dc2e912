use anyhow::Error;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A single facial landmark in frame-normalized coordinates (x, y in [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: None }
    }

    pub fn xy(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }
}

/// An ordered landmark set for exactly one detected face.
///
/// Point identity is positional index; the index scheme is carried by
/// `LandmarkTopology` and must stay consistent across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        LandmarkSet { points }
    }

    /// from_json parses a landmark set from a JSON array of `{x, y, z?}` points.
    ///
    /// # Arguments
    /// * `raw` - JSON string as produced by the upstream landmark model
    ///
    /// # Returns
    /// * `Result<LandmarkSet, Error>`
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let points: Vec<Landmark> = serde_json::from_str(raw)?;
        if points.is_empty() {
            return Err(Error::msg("landmark set is empty"));
        }
        Ok(LandmarkSet { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// point_at returns the point at `idx`, or `None` when the index is not
    /// covered by this set. Callers that can tolerate a degraded metric use
    /// `point_or_origin` instead.
    pub fn point_at(&self, idx: usize) -> Option<Vector2<f32>> {
        self.points.get(idx).map(|p| p.xy())
    }

    /// point_or_origin returns the point at `idx`, substituting the origin for
    /// a missing landmark so a single bad index degrades the metric instead of
    /// failing the whole computation.
    pub fn point_or_origin(&self, idx: usize) -> Vector2<f32> {
        self.point_at(idx).unwrap_or_else(|| Vector2::new(0.0, 0.0))
    }

    /// mean_of returns the centroid of the points at the given indices.
    pub fn mean_of(&self, idxs: &[usize]) -> Vector2<f32> {
        if idxs.is_empty() {
            return Vector2::new(0.0, 0.0);
        }
        let sum: Vector2<f32> = idxs.iter().map(|&i| self.point_or_origin(i)).sum();
        sum / idxs.len() as f32
    }

    /// map applies a point transform to every landmark, keeping depth as-is.
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Vector2<f32>) -> Vector2<f32>,
    {
        let points = self
            .points
            .iter()
            .map(|p| {
                let q = f(p.xy());
                Landmark { x: q.x, y: q.y, z: p.z }
            })
            .collect();
        LandmarkSet { points }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }
}
