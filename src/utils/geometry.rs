use nalgebra::Vector2;

pub fn to_rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

pub fn to_deg(rad: f32) -> f32 {
    rad * 180.0 / std::f32::consts::PI
}

pub fn midpoint(a: Vector2<f32>, b: Vector2<f32>) -> Vector2<f32> {
    (a + b) / 2.0
}

pub fn distance(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    (a - b).norm()
}

/// rotate_around rotates a point about a pivot by a signed angle in degrees.
///
/// The rotation is rigid, so all pairwise distances are preserved.
///
/// # Arguments
/// * `p` - the point to rotate
/// * `pivot` - the rotation center
/// * `deg` - signed rotation angle in degrees
///
/// # Returns
/// * `Vector2<f32>`
pub fn rotate_around(p: Vector2<f32>, pivot: Vector2<f32>, deg: f32) -> Vector2<f32> {
    let r = to_rad(deg);
    let (sin, cos) = r.sin_cos();
    let t = p - pivot;
    Vector2::new(
        t.x * cos - t.y * sin + pivot.x,
        t.x * sin + t.y * cos + pivot.y,
    )
}
