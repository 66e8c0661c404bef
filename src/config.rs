use std::{path::Path, time::Duration};

use crate::foundation::error::{FlowError, FlowResult};

/// All engine tunables. Every field has a default, so an empty JSON object is a
/// valid config.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub viewport: Viewport,
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> FlowResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> FlowResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            FlowError::config(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> FlowResult<()> {
        let m = &self.motion;
        if !m.min_size.is_finite() || m.min_size < 0.0 {
            return Err(FlowError::config("motion.min_size must be finite and >= 0"));
        }
        if !m.size_step.is_finite() || m.size_step < 0.0 {
            return Err(FlowError::config("motion.size_step must be finite and >= 0"));
        }
        if !m.move_step.is_finite() {
            return Err(FlowError::config("motion.move_step must be finite"));
        }
        if m.random_min >= m.random_max {
            return Err(FlowError::config(
                "motion.random_min must be < motion.random_max",
            ));
        }
        let v = &self.viewport;
        if !(v.width.is_finite() && v.width > 0.0 && v.height.is_finite() && v.height > 0.0) {
            return Err(FlowError::config("viewport width/height must be > 0"));
        }
        Ok(())
    }
}

/// Timing of scheduled playback.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between two consecutive steps.
    pub step_delay_ms: u64,
    /// Delay between a step carrying repeat markers and the restarted sub-run.
    pub repeat_delay_ms: u64,
    /// Keep a step on screen for the longest visible message duration before the next delay.
    pub hold_for_messages: bool,
    /// Upper bound on repeat sub-runs; `None` repeats for as long as the flow asks.
    pub max_repeats: Option<u32>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 500,
            repeat_delay_ms: 800,
            hold_for_messages: true,
            max_repeats: None,
        }
    }
}

impl PlaybackConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn repeat_delay(&self) -> Duration {
        Duration::from_millis(self.repeat_delay_ms)
    }
}

/// Magnitudes used by the built-in actions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub move_step: f64,
    pub turn_degrees: f64,
    pub spin_degrees: f64,
    pub size_step: f64,
    pub min_size: f64,
    /// Inclusive lower bound for random positions.
    pub random_min: i64,
    /// Exclusive upper bound for random positions.
    pub random_max: i64,
    pub greeting: String,
    pub greeting_hold_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_step: 50.0,
            turn_degrees: 45.0,
            spin_degrees: 360.0,
            size_step: 10.0,
            min_size: 10.0,
            random_min: -150,
            random_max: 150,
            greeting: "Hello!".to_string(),
            greeting_hold_ms: 1000,
        }
    }
}

/// Stage extent used by the wrapping moves.
///
/// A move wraps its axis to 0 when `coord + step + margin` would exceed the extent;
/// the margin accounts for the actor's own footprint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 768.0,
            height: 720.0,
            margin_x: 100.0,
            margin_y: 200.0,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
