pub mod best_score_store;
pub mod constants;
pub mod engine;
pub mod error;
pub mod frame_clock;
pub mod rng;
pub mod types;
pub mod world;
