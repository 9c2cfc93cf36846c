// src/environment.rs
//
// Rendering context shared by every gen in a graph.

use std::sync::Arc;

use snafu::ensure;

use crate::error::{GenError, GenResult, InvalidConfigurationSnafu};

pub const DEFAULT_SAMPLING_RATE: f64 = 44_100.0;
pub const DEFAULT_FRAME_SIZE: usize = 32;

/// Environment variable overriding the sampling rate in `Environment::from_env`.
pub const SAMPLING_RATE_VAR: &str = "ARACHNE_SAMPLING_RATE";
/// Environment variable overriding the frame size in `Environment::from_env`.
pub const FRAME_SIZE_VAR: &str = "ARACHNE_FRAME_SIZE";

/// Gens hold the environment through this handle; it is never mutated.
pub type SharedEnvironment = Arc<Environment>;

/// Immutable sample rate and frame size for one graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    sampling_rate: f64,
    frame_size: usize,
}

impl Environment {
    pub fn new(sampling_rate: f64, frame_size: usize) -> GenResult<Self> {
        ensure!(
            sampling_rate.is_finite() && sampling_rate > 0.0,
            InvalidConfigurationSnafu {
                reason: format!("sampling rate must be positive, got {sampling_rate}"),
            }
        );
        ensure!(
            frame_size > 0,
            InvalidConfigurationSnafu {
                reason: "frame size must be positive, got 0",
            }
        );

        Ok(Self {
            sampling_rate,
            frame_size,
        })
    }

    /// Build an environment from string settings.
    ///
    /// `lookup` is asked for `ARACHNE_SAMPLING_RATE` and `ARACHNE_FRAME_SIZE`;
    /// a missing key keeps the default for that field.
    pub fn from_lookup<F>(lookup: F) -> GenResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sampling_rate = match lookup(SAMPLING_RATE_VAR) {
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                GenError::InvalidConfiguration {
                    reason: format!("{SAMPLING_RATE_VAR} is not a number: `{raw}`"),
                }
            })?,
            None => DEFAULT_SAMPLING_RATE,
        };

        let frame_size = match lookup(FRAME_SIZE_VAR) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                GenError::InvalidConfiguration {
                    reason: format!("{FRAME_SIZE_VAR} is not an unsigned integer: `{raw}`"),
                }
            })?,
            None => DEFAULT_FRAME_SIZE,
        };

        Self::new(sampling_rate, frame_size)
    }

    /// Read the process environment, see [`Environment::from_lookup`].
    pub fn from_env() -> GenResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[inline]
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    #[inline]
    pub fn nyquist(&self) -> f64 {
        self.sampling_rate * 0.5
    }

    pub fn shared(self) -> SharedEnvironment {
        Arc::new(self)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            sampling_rate: DEFAULT_SAMPLING_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
        }
    }
}
