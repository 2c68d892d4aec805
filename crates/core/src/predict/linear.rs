use super::PricePredictor;
use crate::domain::features::FeatureVector;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Linear regression artifact stored as JSON next to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPriceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearPriceModel {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prediction artifact {}", path.display()))?;
        let model = Self::from_json(&text)
            .with_context(|| format!("invalid prediction artifact {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            version = model.version.as_deref().unwrap_or("unversioned"),
            "loaded prediction artifact"
        );
        Ok(model)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let model = serde_json::from_str::<Self>(text)
            .context("prediction artifact is not valid JSON for the linear model schema")?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.coefficients.len() == FeatureVector::LEN,
            "expected {} coefficients (got {})",
            FeatureVector::LEN,
            self.coefficients.len()
        );
        ensure!(self.intercept.is_finite(), "intercept must be finite");
        ensure!(
            self.coefficients.iter().all(|c| c.is_finite()),
            "coefficients must be finite"
        );

        if !self.feature_names.is_empty() {
            ensure!(
                self.feature_names
                    .iter()
                    .map(String::as_str)
                    .eq(FeatureVector::NAMES),
                "feature_names must be {:?} (got {:?})",
                FeatureVector::NAMES,
                self.feature_names
            );
        }
        Ok(())
    }
}

impl PricePredictor for LinearPriceModel {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64> {
        let price = features
            .as_array()
            .iter()
            .zip(&self.coefficients)
            .fold(self.intercept, |acc, (x, w)| acc + x * w);
        ensure!(
            price.is_finite(),
            "prediction is not finite for features {features:?}"
        );
        Ok(price)
    }
}
