use crate::domain::features::FeatureVector;

pub mod linear;

pub use linear::LinearPriceModel;

/// Maps a feature vector to a scalar electricity price.
pub trait PricePredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64>;
}
