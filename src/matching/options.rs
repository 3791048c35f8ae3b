use crate::Errors;
use anyhow::Result;

/// Default maximal cosine distance for the accepted cross-view match
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.32;

/// Class that is used to configure the cross-view matcher
///
#[derive(Debug, Clone)]
pub struct MatcherOptions {
    threshold: f32,
}

impl MatcherOptions {
    /// The maximal cosine distance between representative embeddings that still allows to consider
    /// two tracks the same player. The pair is accepted when its distance is strictly lower than the
    /// threshold.
    ///
    /// The value depends on the ReID model that produced the embeddings; `0.32` is tuned for the
    /// OSNet family.
    ///
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn get_threshold(&self) -> f32 {
        self.threshold
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Errors::InvalidThreshold(self.threshold).into());
        }
        Ok(())
    }
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::matching::options::MatcherOptions;

    #[test]
    fn defaults() {
        let opts = MatcherOptions::default();
        assert_eq!(opts.get_threshold(), 0.32);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn invalid_threshold() {
        assert!(MatcherOptions::default().threshold(-0.1).validate().is_err());
        assert!(MatcherOptions::default()
            .threshold(f32::NAN)
            .validate()
            .is_err());
        assert!(MatcherOptions::default().threshold(2.5).validate().is_ok());
    }
}
