// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Search configuration.
//!
//! `SearchConfig` carries every tunable of a suggestion run: the wall-clock
//! budget, the frontier capacity, the capacity override, the distance metric
//! and the cost weights. It is assembled with `SearchConfigBuilder`; the
//! defaults favor the fewest disruptions to the existing schedule.

use docket_model::{cost::Cost, location::DistanceMetric, suggestion::PenaltyCounts};
use std::time::Duration;

/// Default wall-clock budget of one search.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default number of suggestions returned.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 20;

/// Weights of the additive cost terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostWeights {
    /// Per request whose enrollment changed.
    pub change: f64,
    /// Per request enrolled outside its preferred sections.
    pub preference: f64,
    /// Per distance conflict.
    pub distance: f64,
    /// Per overlapping minute.
    pub overlap: f64,
    /// Per request left without an enrollment.
    pub unassigned: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            change: 1.0,
            preference: 0.1,
            distance: 0.5,
            overlap: 0.01,
            unassigned: 100.0,
        }
    }
}

impl CostWeights {
    /// Returns the weighted sum of the penalty counts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_bnb::config::CostWeights;
    /// # use docket_model::suggestion::PenaltyCounts;
    /// let w = CostWeights::default();
    /// let counts = PenaltyCounts { changes: 2, unassigned: 1, ..Default::default() };
    /// assert_eq!(w.cost(&counts).value(), 102.0);
    /// ```
    #[inline]
    pub fn cost(&self, counts: &PenaltyCounts) -> Cost {
        Cost::new(
            self.change * counts.changes as f64
                + self.preference * counts.preference_misses as f64
                + self.distance * counts.distance_conflicts as f64
                + self.overlap * counts.overlap_minutes as f64
                + self.unassigned * counts.unassigned as f64,
        )
    }

    fn first_invalid(&self) -> Option<&'static str> {
        [
            ("change", self.change),
            ("preference", self.preference),
            ("distance", self.distance),
            ("overlap", self.overlap),
            ("unassigned", self.unassigned),
        ]
        .into_iter()
        .find(|(_, w)| !(w.is_finite() && *w >= 0.0))
        .map(|(name, _)| name)
    }
}

impl std::fmt::Display for CostWeights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CostWeights(change: {}, preference: {}, distance: {}, overlap: {}, unassigned: {})",
            self.change, self.preference, self.distance, self.overlap, self.unassigned
        )
    }
}

/// Errors raised by `SearchConfigBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A cost weight is negative, infinite or NaN.
    InvalidWeight(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeight(name) => write!(
                f,
                "Cost weight '{}' must be a finite, non-negative number",
                name
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration of one suggestion search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    timeout: Duration,
    max_suggestions: usize,
    allow_over_limit: bool,
    distance_metric: DistanceMetric,
    weights: CostWeights,
    max_changes: Option<u32>,
    allow_drop_selected: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            allow_over_limit: false,
            distance_metric: DistanceMetric::default(),
            weights: CostWeights::default(),
            max_changes: None,
            allow_drop_selected: false,
        }
    }
}

impl SearchConfig {
    /// Returns a builder starting from the defaults.
    #[inline]
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the frontier capacity K.
    #[inline]
    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    #[inline]
    pub fn allow_over_limit(&self) -> bool {
        self.allow_over_limit
    }

    #[inline]
    pub fn distance_metric(&self) -> &DistanceMetric {
        &self.distance_metric
    }

    #[inline]
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Returns the cap on changed requests other than the selected one.
    #[inline]
    pub fn max_changes(&self) -> Option<u32> {
        self.max_changes
    }

    /// Returns `true` if dropping the selected course request is offered.
    #[inline]
    pub fn allow_drop_selected(&self) -> bool {
        self.allow_drop_selected
    }
}

impl std::fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchConfig(timeout: {:?}, max_suggestions: {}, allow_over_limit: {}, {}, {}",
            self.timeout,
            self.max_suggestions,
            self.allow_over_limit,
            self.distance_metric,
            self.weights
        )?;
        if let Some(m) = self.max_changes {
            write!(f, ", max_changes: {}", m)?;
        }
        write!(f, ")")
    }
}

/// Builder for `SearchConfig`.
///
/// # Examples
///
/// ```rust
/// # use docket_bnb::config::SearchConfig;
/// # use std::time::Duration;
/// let config = SearchConfig::builder()
///     .timeout(Duration::from_millis(250))
///     .max_suggestions(5)
///     .allow_over_limit(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_suggestions(), 5);
/// assert!(config.allow_over_limit());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget.
    #[inline]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    #[inline]
    pub fn timeout_millis(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// Sets the frontier capacity K.
    #[inline]
    pub fn max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.config.max_suggestions = max_suggestions;
        self
    }

    /// Permits enrollments into sections that are already full.
    #[inline]
    pub fn allow_over_limit(mut self, allow: bool) -> Self {
        self.config.allow_over_limit = allow;
        self
    }

    #[inline]
    pub fn distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.config.distance_metric = metric;
        self
    }

    #[inline]
    pub fn weights(mut self, weights: CostWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Caps the number of requests, other than the selected one, that may
    /// change in any suggestion.
    #[inline]
    pub fn max_changes(mut self, max_changes: Option<u32>) -> Self {
        self.config.max_changes = max_changes;
        self
    }

    /// Offers leaving the selected course request unassigned when it is
    /// currently enrolled.
    #[inline]
    pub fn allow_drop_selected(mut self, allow: bool) -> Self {
        self.config.allow_drop_selected = allow;
        self
    }

    /// Validates the weights and returns the configuration.
    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        match self.config.weights.first_invalid() {
            Some(name) => Err(ConfigError::InvalidWeight(name)),
            None => Ok(self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SearchConfig::default();
        assert_eq!(c.timeout(), Duration::from_millis(1000));
        assert_eq!(c.max_suggestions(), 20);
        assert!(!c.allow_over_limit());
        assert_eq!(c.max_changes(), None);
        assert!(!c.allow_drop_selected());
        assert_eq!(SearchConfig::builder().build().unwrap(), c);
    }

    #[test]
    fn test_rejects_negative_or_nan_weights() {
        let w = CostWeights {
            overlap: -1.0,
            ..Default::default()
        };
        assert_eq!(
            SearchConfig::builder().weights(w).build(),
            Err(ConfigError::InvalidWeight("overlap"))
        );
        let w = CostWeights {
            change: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            SearchConfig::builder().weights(w).build(),
            Err(ConfigError::InvalidWeight("change"))
        );
    }

    #[test]
    fn test_weighted_cost() {
        let w = CostWeights {
            change: 2.0,
            preference: 1.0,
            distance: 3.0,
            overlap: 0.5,
            unassigned: 10.0,
        };
        let counts = PenaltyCounts {
            changes: 1,
            preference_misses: 2,
            distance_conflicts: 1,
            overlap_minutes: 4,
            unassigned: 1,
        };
        assert_eq!(w.cost(&counts), Cost::new(2.0 + 2.0 + 3.0 + 2.0 + 10.0));
        assert_eq!(w.cost(&PenaltyCounts::default()), Cost::ZERO);
    }

    #[test]
    fn test_builder_timeout_millis() {
        let c = SearchConfig::builder()
            .timeout_millis(5)
            .max_changes(Some(2))
            .build()
            .unwrap();
        assert_eq!(c.timeout(), Duration::from_millis(5));
        assert_eq!(c.max_changes(), Some(2));
    }
}
