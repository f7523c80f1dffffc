//! Model seam for the ML scorer.
//!
//! Scoring is pluggable behind [`UrlModel`]; the crate ships a calibrated
//! logistic model over the feature vector as the default implementation.

use thiserror::Error;

use super::features::FEATURE_COUNT;

/// A missing model must be distinguishable from a model that failed to
/// score, so the caller can omit the ML signal instead of fabricating one.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("model not available: {0}")]
    ModelNotAvailable(String),
    #[error("scoring failed: {0}")]
    ScoringFailed(String),
}

/// Maps a feature vector to a phishing probability in [0,1].
pub trait UrlModel: Send + Sync {
    fn name(&self) -> &'static str;
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, MlError>;
}

/// Logistic model with fixed coefficients, one per feature in vector
/// order.
pub struct LinearModel {
    bias: f64,
    weights: [f64; FEATURE_COUNT],
}

impl LinearModel {
    /// The shipped default, calibrated so a plain HTTPS URL on an
    /// established domain lands well under the Medium threshold and a
    /// stacked-signal URL lands above High.
    pub fn calibrated() -> Self {
        LinearModel {
            bias: -2.2,
            weights: [
                0.08,  // NumDots
                0.35,  // SubdomainLevel
                0.10,  // PathLevel
                0.004, // UrlLength
                0.10,  // NumDash
                0.25,  // NumDashInHostname
                1.20,  // AtSymbol
                0.40,  // TildeSymbol
                0.08,  // NumUnderscore
                0.15,  // NumPercent
                0.05,  // NumQueryComponents
                0.05,  // NumAmpersand
                0.10,  // NumHash
                0.02,  // NumNumericChars
                1.10,  // NoHttps
                0.70,  // RandomString
                1.60,  // IpAddress
                0.90,  // DomainInSubdomains
                0.60,  // DomainInPaths
                1.40,  // HttpsInHostname
                0.008, // HostnameLength
                0.002, // PathLength
                0.002, // QueryLength
                0.80,  // DoubleSlashInPath
                0.30,  // NumSensitiveWords
                1.30,  // EmbeddedBrandName
                0.80,  // FrequentDomainNameMismatch
            ],
        }
    }
}

impl UrlModel for LinearModel {
    fn name(&self) -> &'static str {
        "linear-v1"
    }

    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, MlError> {
        let z: f64 = self.bias
            + self
                .weights
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        if !z.is_finite() {
            return Err(MlError::ScoringFailed(
                "non-finite activation from feature vector".to_string(),
            ));
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_in_unit_interval() {
        let model = LinearModel::calibrated();
        let zeros = [0.0; FEATURE_COUNT];
        let p = model.predict(&zeros).unwrap();
        assert!((0.0..=1.0).contains(&p));

        let heavy = [10.0; FEATURE_COUNT];
        let p = model.predict(&heavy).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_zero_vector_is_low_probability() {
        let model = LinearModel::calibrated();
        let p = model.predict(&[0.0; FEATURE_COUNT]).unwrap();
        assert!(p < 0.2);
    }

    #[test]
    fn test_monotone_in_risky_flags() {
        let model = LinearModel::calibrated();
        let mut low = [0.0; FEATURE_COUNT];
        let base = model.predict(&low).unwrap();
        low[16] = 1.0; // IpAddress
        low[14] = 1.0; // NoHttps
        assert!(model.predict(&low).unwrap() > base);
    }

    #[test]
    fn test_non_finite_features_rejected() {
        let model = LinearModel::calibrated();
        let mut features = [0.0; FEATURE_COUNT];
        features[0] = f64::INFINITY;
        assert!(matches!(
            model.predict(&features),
            Err(MlError::ScoringFailed(_))
        ));
    }
}
