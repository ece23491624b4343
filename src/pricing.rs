//! Per-model pricing rates.
//!
//! Rates are USD per 1000 tokens, split by prompt and completion. An
//! unknown model is a defined error condition, not a silent default.

use crate::error::{Error, Result};

/// Pricing rates for one model.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PricingEntry {
    /// USD per 1000 prompt tokens.
    pub prompt: f64,

    /// USD per 1000 completion tokens.
    pub completion: f64,
}

impl PricingEntry {
    /// Creates a new pricing entry.
    pub fn new(prompt: f64, completion: f64) -> Self {
        Self { prompt, completion }
    }
}

/// Published rates for the models this client knows about.
const BUILTIN_RATES: &[(&str, PricingEntry)] = &[
    (
        "gpt-3.5-turbo",
        PricingEntry {
            prompt: 0.0015,
            completion: 0.002,
        },
    ),
    (
        "gpt-3.5-turbo-0613",
        PricingEntry {
            prompt: 0.0015,
            completion: 0.002,
        },
    ),
    (
        "gpt-3.5-turbo-16k",
        PricingEntry {
            prompt: 0.003,
            completion: 0.004,
        },
    ),
    (
        "gpt-3.5-turbo-16k-0613",
        PricingEntry {
            prompt: 0.003,
            completion: 0.004,
        },
    ),
    (
        "gpt-4",
        PricingEntry {
            prompt: 0.03,
            completion: 0.06,
        },
    ),
    (
        "gpt-4-0613",
        PricingEntry {
            prompt: 0.03,
            completion: 0.06,
        },
    ),
    (
        "gpt-4-32k",
        PricingEntry {
            prompt: 0.06,
            completion: 0.12,
        },
    ),
    (
        "gpt-4-32k-0613",
        PricingEntry {
            prompt: 0.06,
            completion: 0.12,
        },
    ),
];

/// Mapping from model identifier to pricing rates.
#[derive(Debug, Clone)]
pub struct PricingTable {
    entries: Vec<(String, PricingEntry)>,
}

impl PricingTable {
    /// Creates a table populated with the built-in rates.
    pub fn new() -> Self {
        Self {
            entries: BUILTIN_RATES
                .iter()
                .map(|(model, entry)| (model.to_string(), *entry))
                .collect(),
        }
    }

    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces the rates for a model.
    pub fn with_rate(mut self, model: impl Into<String>, entry: PricingEntry) -> Self {
        let model = model.into();
        self.entries.retain(|(existing, _)| existing != &model);
        self.entries.push((model, entry));
        self
    }

    /// Looks up the rates for a model.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModelPricing` when the model has no entry.
    pub fn rate_for(&self, model: &str) -> Result<PricingEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == model)
            .map(|(_, entry)| *entry)
            .ok_or_else(|| Error::unknown_model_pricing(model))
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rates_present() {
        let table = PricingTable::new();
        let entry = table.rate_for("gpt-3.5-turbo").unwrap();
        assert_eq!(entry, PricingEntry::new(0.0015, 0.002));
        let entry = table.rate_for("gpt-4-32k").unwrap();
        assert_eq!(entry, PricingEntry::new(0.06, 0.12));
    }

    #[test]
    fn unknown_model_is_an_error() {
        let table = PricingTable::new();
        let err = table.rate_for("gpt-unreleased").unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::UnknownModelPricing { model } if model == "gpt-unreleased"
        ));
    }

    #[test]
    fn with_rate_overrides() {
        let table = PricingTable::new().with_rate("gpt-4", PricingEntry::new(0.01, 0.02));
        assert_eq!(
            table.rate_for("gpt-4").unwrap(),
            PricingEntry::new(0.01, 0.02)
        );
    }
}
