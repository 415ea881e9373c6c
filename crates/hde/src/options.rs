use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of pivot axes in the high-dimensional embedding, before clamping to the vertex count.
pub const DEFAULT_PIVOT_COUNT: usize = 50;
/// Convergence tolerance for power iteration.
pub const DEFAULT_EPSILON: f64 = 0.001;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Output coordinates are multiplied by this after projection.
pub const DEFAULT_SCALE: f64 = 10.0;

/// Output dimensionality of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensions {
    #[default]
    Two,
    Three,
}

impl Dimensions {
    pub fn count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for Dimensions {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(Error::invalid(format!(
                "dimensions must be 2 or 3, got {other}"
            ))),
        }
    }
}

impl From<Dimensions> for u8 {
    fn from(value: Dimensions) -> Self {
        value.count() as u8
    }
}

/// How vertices that a pivot's BFS never reaches enter the embedding.
///
/// Only disconnected graphs are affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreachedPolicy {
    /// Unreached cells keep the BFS sentinel `-1`. The row mean sums reached distances only but
    /// divides by the full vertex count, and the sentinel cells are centered like any other.
    /// This reproduces layouts produced by earlier versions of the algorithm.
    #[default]
    Sentinel,
    /// Unreached cells are set to one hop past the farthest reached vertex of that pivot and take
    /// part in the mean.
    Clamp,
    /// The mean covers reached vertices only and unreached cells are zero after centering, so
    /// they contribute nothing to the covariance or the projection.
    Exclude,
}

impl std::str::FromStr for UnreachedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel" => Ok(Self::Sentinel),
            "clamp" => Ok(Self::Clamp),
            "exclude" => Ok(Self::Exclude),
            other => Err(Error::invalid(format!("unknown unreached policy: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrangeOptions {
    pub dimensions: Dimensions,
    /// Requested embedding dimensionality. The effective pivot count is
    /// `min(pivot_count, vertex_count)`.
    pub pivot_count: usize,
    /// Power iteration budget per eigenvector.
    pub max_iterations: usize,
    pub epsilon: f64,
    pub scale: f64,
    /// Seed for the eigenvector start vectors. `None` seeds from OS entropy, so repeated runs may
    /// differ by a rotation/reflection.
    pub random_seed: Option<u64>,
    pub unreached: UnreachedPolicy,
    /// Translate the written axes so their mean matches the mean before arranging.
    pub preserve_mean: bool,
}

impl Default for ArrangeOptions {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            pivot_count: DEFAULT_PIVOT_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            epsilon: DEFAULT_EPSILON,
            scale: DEFAULT_SCALE,
            random_seed: None,
            unreached: UnreachedPolicy::default(),
            preserve_mean: false,
        }
    }
}

impl ArrangeOptions {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pivot_count == 0 {
            return Err(Error::invalid("pivot_count must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid("max_iterations must be at least 1"));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(Error::invalid(format!(
                "epsilon must be in (0, 1), got {}",
                self.epsilon
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::invalid(format!(
                "scale must be positive and finite, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}
