//! Pure generators that turn a metric sample into scene parameters.
//!
//! Nothing in here performs I/O or keeps state; randomness enters only through
//! the [`SceneRng`] handed in by the caller.

pub mod assemble;
pub mod beacon;
pub mod clouds;
pub mod flocks;
pub mod normalize;
pub mod phase;
pub mod rng;
pub mod waves;

pub use assemble::{assemble_scene, rescale_for_viewport};
pub use normalize::{kpi_ratio, kpi_score, normalize, normalize_labor};
pub use phase::{local_hour, resolve_phase};
pub use rng::SceneRng;

#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
