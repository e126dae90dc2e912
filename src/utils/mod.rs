pub mod geometry;
pub mod landmark;
pub mod score;
