//! Engine configuration.
//!
//! Every pacing and sizing constant of the engine lives here so a front-end
//! can tune delivery for its transport. Durations are stored as milliseconds
//! to keep the serialized form flat.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpreadError};

/// Marker appended to an interpretation that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Room reserved in a card block for its numbered position label.
pub const POSITION_LABEL_BUDGET: usize = 96;

/// Reversal probability used when none is configured.
pub const DEFAULT_REVERSED_PROBABILITY: f64 = 0.30;

/// How a spread is delivered to the chat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// One reveal step per card, with images where available.
    #[default]
    Staged,
    /// Whole spread as text, split into parts when too long.
    Compact,
}

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pause after each announcement/shuffling status message.
    pub announce_delay_ms: u64,

    /// Pause after each card reveal.
    pub reveal_delay_ms: u64,

    /// Maximum characters of a rendered interpretation before truncation.
    pub interpretation_max_chars: usize,

    /// Transport limit for a single message, in characters.
    pub message_limit: usize,

    /// Probability that a drawn card comes out reversed.
    pub reversed_probability: f64,

    /// Staged reveal or compact text delivery.
    pub delivery_mode: DeliveryMode,

    /// Directory that card images are resolved against.
    pub image_dir: String,

    /// Upper bound on a narrative enrichment call.
    pub enrich_timeout_ms: u64,

    /// Fixed seed for the master RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            announce_delay_ms: 1_500,
            reveal_delay_ms: 2_000,
            interpretation_max_chars: 500,
            message_limit: 4_096,
            reversed_probability: DEFAULT_REVERSED_PROBABILITY,
            delivery_mode: DeliveryMode::Staged,
            image_dir: "Cards-png".to_string(),
            enrich_timeout_ms: 30_000,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SpreadError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set both pacing delays.
    pub fn with_delays(mut self, announce: Duration, reveal: Duration) -> Self {
        self.announce_delay_ms = announce.as_millis() as u64;
        self.reveal_delay_ms = reveal.as_millis() as u64;
        self
    }

    /// Disable pacing entirely (tests, batch export).
    pub fn without_delays(self) -> Self {
        self.with_delays(Duration::ZERO, Duration::ZERO)
    }

    /// Set the interpretation truncation length.
    pub fn with_interpretation_max_chars(mut self, max: usize) -> Self {
        self.interpretation_max_chars = max;
        self
    }

    /// Set the transport message size limit.
    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    /// Set the reversed-orientation probability.
    pub fn with_reversed_probability(mut self, p: f64) -> Self {
        self.reversed_probability = p;
        self
    }

    /// Set the delivery mode.
    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.delivery_mode = mode;
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<String>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Set the enrichment timeout.
    pub fn with_enrich_timeout(mut self, timeout: Duration) -> Self {
        self.enrich_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Fix the master RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn enrich_timeout(&self) -> Duration {
        Duration::from_millis(self.enrich_timeout_ms)
    }

    /// Check that the values can work together.
    ///
    /// A truncated card block must always fit in one message, otherwise the
    /// splitter could not keep blocks whole.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reversed_probability) {
            return Err(SpreadError::InvalidConfig(format!(
                "reversed_probability must be within [0, 1], got {}",
                self.reversed_probability
            )));
        }
        if self.interpretation_max_chars == 0 {
            return Err(SpreadError::InvalidConfig(
                "interpretation_max_chars must be positive".to_string(),
            ));
        }
        let block_max =
            self.interpretation_max_chars + TRUNCATION_MARKER.len() + POSITION_LABEL_BUDGET;
        if block_max > self.message_limit {
            return Err(SpreadError::InvalidConfig(format!(
                "message_limit {} cannot hold a card block of up to {} characters",
                self.message_limit, block_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.announce_delay(), Duration::from_millis(1500));
        assert_eq!(config.reveal_delay(), Duration::from_secs(2));
        assert_eq!(config.interpretation_max_chars, 500);
        assert_eq!(config.message_limit, 4096);
        assert!((config.reversed_probability - 0.30).abs() < f64::EPSILON);
        assert_eq!(config.delivery_mode, DeliveryMode::Staged);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .without_delays()
            .with_message_limit(1000)
            .with_seed(123)
            .with_delivery_mode(DeliveryMode::Compact);

        assert_eq!(config.announce_delay(), Duration::ZERO);
        assert_eq!(config.reveal_delay(), Duration::ZERO);
        assert_eq!(config.message_limit, 1000);
        assert_eq!(config.seed, Some(123));
        assert_eq!(config.delivery_mode, DeliveryMode::Compact);
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let config = EngineConfig::default().with_reversed_probability(1.5);
        assert!(matches!(config.validate(), Err(SpreadError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_limit_below_block_size() {
        let config = EngineConfig::default().with_message_limit(300);
        assert!(matches!(config.validate(), Err(SpreadError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            EngineConfig::from_json(r#"{"reveal_delay_ms": 10, "delivery_mode": "compact"}"#)
                .unwrap();
        assert_eq!(config.reveal_delay_ms, 10);
        assert_eq!(config.delivery_mode, DeliveryMode::Compact);
        assert_eq!(config.message_limit, 4096);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(EngineConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::default().with_seed(9);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
