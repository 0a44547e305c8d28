//! Emission schedule: exponential-decay token emission sampled for charts.
//!
//! rate(t)   = r0 · e^(−k·t)
//! minted(t) = r0 / k · (1 − e^(−k·t))
//!
//! `t` is measured in the same unit the rate is expressed per (e.g. days
//! since launch). With `k = 0` the schedule is a flat rate.

use crate::error::SdkError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionCurve {
    pub initial_rate: f64,
    /// Decay constant `k`.
    pub decay: f64,
    /// Offset applied to every sample's `t`.
    #[serde(default)]
    pub start: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionPoint {
    pub t: f64,
    pub rate: f64,
    pub minted: f64,
}

impl EmissionCurve {
    pub fn new(initial_rate: f64, decay: f64) -> Result<Self, SdkError> {
        if !initial_rate.is_finite() || initial_rate < 0.0 {
            return Err(SdkError::Validation(format!(
                "initial rate must be finite and non-negative, got {}",
                initial_rate
            )));
        }
        if !decay.is_finite() || decay < 0.0 {
            return Err(SdkError::Validation(format!(
                "decay must be finite and non-negative, got {}",
                decay
            )));
        }
        Ok(Self {
            initial_rate,
            decay,
            start: 0.0,
        })
    }

    /// Build from a half-life instead of a raw decay constant.
    pub fn from_half_life(initial_rate: f64, half_life: f64) -> Result<Self, SdkError> {
        if half_life.is_nan() || half_life <= 0.0 {
            return Err(SdkError::Validation(format!(
                "half-life must be positive, got {}",
                half_life
            )));
        }
        Self::new(initial_rate, std::f64::consts::LN_2 / half_life)
    }

    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    pub fn rate_at(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        self.initial_rate * (-self.decay * t).exp()
    }

    pub fn minted_at(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        if self.decay == 0.0 {
            return self.initial_rate * t;
        }
        self.initial_rate / self.decay * (1.0 - (-self.decay * t).exp())
    }

    /// Everything that will ever be emitted; infinite for a flat schedule.
    pub fn total_supply(&self) -> f64 {
        if self.decay == 0.0 {
            return f64::INFINITY;
        }
        self.initial_rate / self.decay
    }

    /// `points` evenly spaced samples over `[0, horizon]`, ends included.
    pub fn sample(&self, horizon: f64, points: usize) -> Vec<EmissionPoint> {
        let at = |t: f64| EmissionPoint {
            t: self.start + t,
            rate: self.rate_at(t),
            minted: self.minted_at(t),
        };

        if points < 2 || horizon.is_nan() || horizon <= 0.0 {
            return vec![at(0.0)];
        }

        let step = horizon / (points - 1) as f64;
        (0..points).map(|i| at(step * i as f64)).collect()
    }
}
