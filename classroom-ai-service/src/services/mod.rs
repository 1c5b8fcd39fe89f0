pub mod analysis;
pub mod demo;
pub mod image;
pub mod metrics;
pub mod normalizer;
pub mod prompts;
pub mod providers;
pub mod rate_limiter;

pub use rate_limiter::SlidingWindowLimiter;
