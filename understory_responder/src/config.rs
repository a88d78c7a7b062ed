// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture thresholds.

use core::time::Duration;

/// Thresholds for multi-click detection and press stillness.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Longest gap between presses that still counts as one multi-click sequence.
    pub multi_click_time: Duration,
    /// Horizontal travel allowed before a press stops being still.
    pub multi_click_max_x: f64,
    /// Vertical travel allowed before a press stops being still.
    pub multi_click_max_y: f64,
}

impl GestureConfig {
    /// Default multi-click window.
    pub const DEFAULT_MULTI_CLICK_TIME: Duration = Duration::from_millis(500);
    /// Default per-axis travel threshold.
    pub const DEFAULT_MULTI_CLICK_DISTANCE: f64 = 5.0;

    /// Check that both distance thresholds are finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [('x', self.multi_click_max_x), ('y', self.multi_click_max_y)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Distance { axis, value });
            }
        }
        Ok(())
    }

    /// Whether `(dx, dy)` stays inside the per-axis thresholds.
    pub fn within_distance(&self, dx: f64, dy: f64) -> bool {
        dx.abs() <= self.multi_click_max_x && dy.abs() <= self.multi_click_max_y
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            multi_click_time: Self::DEFAULT_MULTI_CLICK_TIME,
            multi_click_max_x: Self::DEFAULT_MULTI_CLICK_DISTANCE,
            multi_click_max_y: Self::DEFAULT_MULTI_CLICK_DISTANCE,
        }
    }
}

/// Rejected [`GestureConfig`] values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A distance threshold is negative, infinite or NaN.
    #[error("multi-click distance on {axis} must be finite and non-negative, got {value}")]
    Distance {
        /// Offending axis, `'x'` or `'y'`.
        axis: char,
        /// The rejected value.
        value: f64,
    },
}
