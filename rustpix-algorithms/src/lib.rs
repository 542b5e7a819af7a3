//! Online clustering and peak-fitting algorithms: the Adaptive Box Search
//! cluster engine and the centroid / fast-Gaussian peak fitters that
//! implement the capability traits from `rustpix-core`.

#![forbid(unsafe_code)]

mod abs;
mod centroid;
mod fastgaussian;

pub use abs::{AbsConfig, AbsEngine};
pub use centroid::CentroidFitter;
pub use fastgaussian::FastGaussianFitter;
