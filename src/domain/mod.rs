pub mod metrics;
pub mod scene;
