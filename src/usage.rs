//! Session-lifetime usage accounting.

use crate::error::Result;
use crate::pricing::PricingTable;
use crate::types::Usage;

/// Accumulates token counts across a session and derives the running cost.
///
/// Totals are monotonically non-decreasing and mutated only after a
/// successful exchange. Each session owns its own tracker; there is no
/// process-wide state.
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    totals: Usage,
}

impl UsageTracker {
    /// Creates a tracker with zeroed totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one exchange's usage to the running totals.
    pub fn record(&mut self, usage: Usage) {
        self.totals = self.totals + usage;
    }

    /// Total prompt tokens across the session.
    pub fn prompt_tokens(&self) -> u64 {
        self.totals.prompt_tokens
    }

    /// Total completion tokens across the session.
    pub fn completion_tokens(&self) -> u64 {
        self.totals.completion_tokens
    }

    /// Total tokens across the session.
    pub fn total_tokens(&self) -> u64 {
        self.totals.total()
    }

    /// Estimated cost of the session in USD, formatted to six decimals.
    ///
    /// The cost is computed against the *current* model's rates over the
    /// cumulative totals; it is an approximation against present rates,
    /// not a per-exchange ledger.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModelPricing` when the model has no pricing entry.
    pub fn cost(&self, model: &str, pricing: &PricingTable) -> Result<String> {
        let entry = pricing.rate_for(model)?;
        let expense = (self.totals.prompt_tokens as f64 / 1000.0) * entry.prompt
            + (self.totals.completion_tokens as f64 / 1000.0) * entry.completion;
        Ok(format!("{expense:.6}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingEntry;

    #[test]
    fn totals_accumulate() {
        let mut tracker = UsageTracker::new();
        tracker.record(Usage::new(10, 20));
        tracker.record(Usage::new(5, 15));

        assert_eq!(tracker.prompt_tokens(), 15);
        assert_eq!(tracker.completion_tokens(), 35);
        assert_eq!(tracker.total_tokens(), 50);
    }

    #[test]
    fn totals_monotonic() {
        let mut tracker = UsageTracker::new();
        let mut previous = 0;
        for (p, c) in [(10, 5), (0, 0), (100, 200), (1, 0)] {
            tracker.record(Usage::new(p, c));
            assert!(tracker.total_tokens() >= previous);
            previous = tracker.total_tokens();
        }
    }

    #[test]
    fn cost_is_deterministic() {
        let table =
            PricingTable::empty().with_rate("test-model", PricingEntry::new(0.0015, 0.002));
        let mut tracker = UsageTracker::new();
        tracker.record(Usage::new(1000, 500));

        assert_eq!(tracker.cost("test-model", &table).unwrap(), "0.002500");
    }

    #[test]
    fn cost_of_empty_session_is_zero() {
        let table = PricingTable::new();
        let tracker = UsageTracker::new();
        assert_eq!(tracker.cost("gpt-4", &table).unwrap(), "0.000000");
    }

    #[test]
    fn cost_with_unknown_model_fails() {
        let tracker = UsageTracker::new();
        assert!(tracker.cost("gpt-unreleased", &PricingTable::new()).is_err());
    }
}
