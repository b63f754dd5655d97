use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::matcher::MatchParams;
use crate::types::RegionOfInterest;

/// Operator configuration. Missing or malformed files fall back to the
/// defaults, but a config that fails `validate` never starts a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Title pattern (regex) used to locate the target window.
    pub window_pattern: String,
    /// Name whose messages carry the actionable button.
    pub target_label: String,
    /// Marker for command echoes; lines carrying it never match even when
    /// they mention the target. Empty disables the exclusion.
    pub exclude_marker: String,
    /// Button caption, compared exactly after trimming.
    pub button_label: String,
    pub interval_lower_secs: f64,
    pub interval_upper_secs: f64,
    pub crop: RegionOfInterest,
    pub max_vertical_gap: i32,
    pub max_horizontal_offset: f64,
    pub min_confidence: f32,
    pub jitter_shrink: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_pattern: "(?i)discord".into(),
            target_label: "player".into(),
            exclude_marker: "used /".into(),
            button_label: "farm".into(),
            interval_lower_secs: 2.5,
            interval_upper_secs: 4.5,
            crop: RegionOfInterest::default(),
            max_vertical_gap: 500,
            max_horizontal_offset: 200.0,
            min_confidence: 0.6,
            jitter_shrink: 0.3,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(path, json);
        }
    }

    /// Reject configurations the loop must never start with.
    pub fn validate(&self) -> Result<()> {
        if self.target_label.trim().is_empty() {
            bail!("target label is empty");
        }
        if self.button_label.trim().is_empty() {
            bail!("button label is empty");
        }
        if self.interval_lower_secs <= 0.0 || self.interval_upper_secs <= 0.0 {
            bail!(
                "interval bounds must be positive, got {} and {}",
                self.interval_lower_secs,
                self.interval_upper_secs
            );
        }
        if self.interval_lower_secs > self.interval_upper_secs {
            bail!(
                "interval lower bound {} exceeds upper bound {}",
                self.interval_lower_secs,
                self.interval_upper_secs
            );
        }
        self.crop.validate()?;
        if self.max_vertical_gap <= 0 {
            bail!("max vertical gap must be positive");
        }
        if self.max_horizontal_offset <= 0.0 {
            bail!("max horizontal offset must be positive");
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            bail!(
                "confidence threshold {} lies outside [0, 1]",
                self.min_confidence
            );
        }
        if self.jitter_shrink <= 0.0 || self.jitter_shrink >= 0.5 {
            bail!(
                "jitter shrink {} must lie in (0, 0.5)",
                self.jitter_shrink
            );
        }
        Ok(())
    }

    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            target_label: self.target_label.clone(),
            exclude_marker: self.exclude_marker.clone(),
            button_label: self.button_label.clone(),
            max_vertical_gap: self.max_vertical_gap,
            max_horizontal_offset: self.max_horizontal_offset,
        }
    }
}
