pub mod candidates;
pub mod diversity;
pub mod providers;
pub mod query;
pub mod recommendations;
pub mod retry;
pub mod sampler;
pub mod scoring;
pub mod seed;

pub use recommendations::Recommender;
