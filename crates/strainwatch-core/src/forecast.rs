//! Time-to-threshold forecasting.
//!
//! Reads the fatigue value and slope; never mutates the engine. A forecast of
//! `None` minutes means no threshold is approaching (recovering, negligible
//! growth, or further out than the horizon).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_threshold")]
    pub high_efficiency_threshold: f64,
    #[serde(default = "default_horizon")]
    pub horizon_minutes: f64,
    /// Slopes below this (%/min) are treated as flat.
    #[serde(default = "default_negligible_slope")]
    pub negligible_slope: f64,
    #[serde(default = "default_lower_load_weight")]
    pub lower_load_weight: f64,
}

fn default_threshold() -> f64 {
    85.0
}
fn default_horizon() -> f64 {
    240.0
}
fn default_negligible_slope() -> f64 {
    0.01
}
fn default_lower_load_weight() -> f64 {
    0.3
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            high_efficiency_threshold: default_threshold(),
            horizon_minutes: default_horizon(),
            negligible_slope: default_negligible_slope(),
            lower_load_weight: default_lower_load_weight(),
        }
    }
}

impl ForecastConfig {
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            high_efficiency_threshold: finite_or(self.high_efficiency_threshold, d.high_efficiency_threshold)
                .clamp(0.0, 100.0),
            horizon_minutes: finite_or(self.horizon_minutes, d.horizon_minutes).max(0.0),
            negligible_slope: finite_or(self.negligible_slope, d.negligible_slope).max(0.0),
            lower_load_weight: finite_or(self.lower_load_weight, d.lower_load_weight).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub is_over_threshold: bool,
    /// Minutes until the threshold at the current slope.
    pub time_to_threshold_min: Option<f64>,
    /// Same, if the slope were scaled to the lower-load weight.
    pub lower_load_time_to_threshold_min: Option<f64>,
    /// Continuous seconds spent at or above the threshold.
    pub over_threshold_seconds: f64,
}

impl Forecast {
    pub fn describe(&self) -> String {
        if self.is_over_threshold {
            return format!(
                "over threshold for {}",
                format_minutes(self.over_threshold_seconds / 60.0)
            );
        }
        match self.time_to_threshold_min {
            Some(minutes) => format!("threshold in {}", format_minutes(minutes)),
            None => "no approaching threshold".to_string(),
        }
    }
}

fn format_minutes(minutes: f64) -> String {
    let total = minutes.round().max(0.0) as u64;
    if total >= 60 {
        format!("{}h {:02}m", total / 60, total % 60)
    } else {
        format!("{total}m")
    }
}

/// Minutes for `value` to reach `threshold` at `slope` %/min.
///
/// `Some(0.0)` when already there; `None` when not approaching within the
/// horizon.
pub fn time_to_threshold(value: f64, slope: f64, config: &ForecastConfig) -> Option<f64> {
    let threshold = config.high_efficiency_threshold;
    if value >= threshold {
        return Some(0.0);
    }
    if !slope.is_finite() || slope <= 0.0 || slope < config.negligible_slope {
        return None;
    }
    let minutes = (threshold - value) / slope;
    (minutes <= config.horizon_minutes).then_some(minutes)
}

#[derive(Debug, Clone)]
pub struct ForecastService {
    config: ForecastConfig,
    over_threshold_seconds: f64,
}

impl Default for ForecastService {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl ForecastService {
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            config: config.sanitized(),
            over_threshold_seconds: 0.0,
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn over_threshold_seconds(&self) -> f64 {
        self.over_threshold_seconds
    }

    /// Fold one elapsed interval into the over-threshold counter and report.
    pub fn update(&mut self, value: f64, slope: f64, elapsed_seconds: f64) -> Forecast {
        if value >= self.config.high_efficiency_threshold {
            if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
                self.over_threshold_seconds += elapsed_seconds;
            }
        } else {
            self.over_threshold_seconds = 0.0;
        }
        self.peek(value, slope)
    }

    /// Report without advancing any counter.
    pub fn peek(&self, value: f64, slope: f64) -> Forecast {
        let is_over_threshold = value >= self.config.high_efficiency_threshold;
        if is_over_threshold {
            return Forecast {
                is_over_threshold,
                time_to_threshold_min: Some(0.0),
                lower_load_time_to_threshold_min: Some(0.0),
                over_threshold_seconds: self.over_threshold_seconds,
            };
        }
        Forecast {
            is_over_threshold,
            time_to_threshold_min: time_to_threshold(value, slope, &self.config),
            lower_load_time_to_threshold_min: self.estimate_at_lower_load(
                value,
                slope,
                self.config.lower_load_weight,
            ),
            over_threshold_seconds: self.over_threshold_seconds,
        }
    }

    /// Hypothetical forecast with the slope scaled to `weight`.
    pub fn estimate_at_lower_load(&self, value: f64, slope: f64, weight: f64) -> Option<f64> {
        time_to_threshold(value, slope * weight.max(0.0), &self.config)
    }

    pub fn reset(&mut self) {
        self.over_threshold_seconds = 0.0;
    }
}
