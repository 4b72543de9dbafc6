pub mod estimator;
pub mod interpolation;

pub use estimator::SocEstimator;
