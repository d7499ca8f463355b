//! Load combinations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A load combination defines how load case results are superposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Name of the load combination
    pub name: String,
    /// Description of the load combination
    #[serde(default)]
    pub description: String,
    /// Factors for each load case (case_name -> factor)
    pub factors: BTreeMap<String, f64>,
}

impl LoadCombination {
    /// Create a new load combination
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            factors: BTreeMap::new(),
        }
    }

    /// Add a load case with a factor
    pub fn with_case(mut self, case: &str, factor: f64) -> Self {
        self.factors.insert(case.to_string(), factor);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Check if this combination includes a specific load case
    pub fn includes(&self, case: &str) -> bool {
        self.factors.contains_key(case)
    }

    /// Create common LRFD combinations
    pub fn lrfd_dead_only() -> Self {
        Self::new("1.4D").with_case("Dead", 1.4)
    }

    pub fn lrfd_dead_live() -> Self {
        Self::new("1.2D + 1.6L")
            .with_case("Dead", 1.2)
            .with_case("Live", 1.6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        let combo = LoadCombination::lrfd_dead_live();
        assert_eq!(combo.factors["Dead"], 1.2);
        assert_eq!(combo.factors.get("Wind"), None);
        assert!(combo.includes("Live"));
        assert!(!combo.includes("Wind"));
    }

    #[test]
    fn test_repeated_case_keeps_one_factor() {
        let combo = LoadCombination::new("C").with_case("Dead", 1.0).with_case("Dead", 1.35);
        assert_eq!(combo.factors.len(), 1);
        assert_eq!(combo.factors["Dead"], 1.35);
    }
}
