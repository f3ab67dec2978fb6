use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Weight given to the first child when the caller does not pick one.
    #[serde(default = "default_split_weight")]
    pub default_split_weight: f32,
    /// Lower clamp applied to stored split weights on resize.
    #[serde(default = "min_weight")]
    pub min_weight: f32,
    /// Upper clamp applied to stored split weights on resize.
    #[serde(default = "max_weight")]
    pub max_weight: f32,
}

fn default_split_weight() -> f32 { 0.5 }
fn min_weight() -> f32 { 0.05 }
fn max_weight() -> f32 { 0.95 }

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            default_split_weight: default_split_weight(),
            min_weight: min_weight(),
            max_weight: max_weight(),
        }
    }
}

impl LayoutSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: LayoutSettings = toml::from_str(&raw)
            .with_context(|| format!("parsing settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0 < self.min_weight && self.min_weight < self.max_weight && self.max_weight < 1.0) {
            bail!(
                "weight bounds must satisfy 0 < min < max < 1, got min={} max={}",
                self.min_weight,
                self.max_weight
            );
        }
        if !(self.min_weight..=self.max_weight).contains(&self.default_split_weight) {
            bail!(
                "default_split_weight {} is outside [{}, {}]",
                self.default_split_weight,
                self.min_weight,
                self.max_weight
            );
        }
        Ok(())
    }

    pub fn clamp_weight(&self, weight: f32) -> f32 {
        weight.clamp(self.min_weight, self.max_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let settings: LayoutSettings = toml::from_str("min_weight = 0.1").unwrap();
        assert_eq!(settings.min_weight, 0.1);
        assert_eq!(settings.max_weight, 0.95);
        assert_eq!(settings.default_split_weight, 0.5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<LayoutSettings>("outer_gap = 8").is_err());
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let settings = LayoutSettings {
            min_weight: 0.9,
            max_weight: 0.1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn clamp_respects_bounds() {
        let settings = LayoutSettings::default();
        assert_eq!(settings.clamp_weight(0.01), 0.05);
        assert_eq!(settings.clamp_weight(0.99), 0.95);
        assert_eq!(settings.clamp_weight(0.4), 0.4);
    }
}
