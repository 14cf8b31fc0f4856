use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Importance tier of a criterion. Iteration order is `ALL`.
/// Serializes as its canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    MustHave,
    GoodToHave,
    NiceToHave,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::MustHave, Tier::GoodToHave, Tier::NiceToHave];

    /// Canonical JSON key.
    pub fn key(self) -> &'static str {
        match self {
            Tier::MustHave => "MustHave",
            Tier::GoodToHave => "GoodToHave",
            Tier::NiceToHave => "NiceToHave",
        }
    }

    /// Human label, used in CSV headers and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Tier::MustHave => "Must have",
            Tier::GoodToHave => "Good to have",
            Tier::NiceToHave => "Nice to have",
        }
    }

    /// Every spelling accepted when reading JSON, canonical key first.
    pub fn aliases(self) -> [&'static str; 3] {
        match self {
            Tier::MustHave => ["MustHave", "Must have", "must_have"],
            Tier::GoodToHave => ["GoodToHave", "Good to have", "good_to_have"],
            Tier::NiceToHave => ["NiceToHave", "Nice to have", "nice_to_have"],
        }
    }

    /// Upper bound of the inclusive score range `[0, max_score]`.
    pub fn max_score(self) -> f64 {
        match self {
            Tier::MustHave => 10.0,
            Tier::GoodToHave => 5.0,
            Tier::NiceToHave => 2.0,
        }
    }

    /// Looks the tier up in a JSON object under any accepted spelling.
    pub fn find_in(self, object: &Map<String, Value>) -> Option<&Value> {
        self.aliases().iter().find_map(|alias| object.get(*alias))
    }
}

/// Three tiers of job criteria, each mapping criterion name to an opaque
/// value. Criterion order is preserved from the source JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSet {
    #[serde(rename = "MustHave", alias = "Must have", alias = "must_have")]
    pub must_have: Map<String, Value>,
    #[serde(rename = "GoodToHave", alias = "Good to have", alias = "good_to_have")]
    pub good_to_have: Map<String, Value>,
    #[serde(rename = "NiceToHave", alias = "Nice to have", alias = "nice_to_have")]
    pub nice_to_have: Map<String, Value>,
}

impl CriteriaSet {
    pub fn tier(&self, tier: Tier) -> &Map<String, Value> {
        match tier {
            Tier::MustHave => &self.must_have,
            Tier::GoodToHave => &self.good_to_have,
            Tier::NiceToHave => &self.nice_to_have,
        }
    }

    /// Every `(tier, criterion)` pair in fixed tier order, then source order.
    pub fn criteria(&self) -> impl Iterator<Item = (Tier, &str)> + '_ {
        Tier::ALL
            .into_iter()
            .flat_map(move |tier| self.tier(tier).keys().map(move |name| (tier, name.as_str())))
    }

    pub fn len(&self) -> usize {
        Tier::ALL.iter().map(|t| self.tier(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses client-supplied criteria JSON. Accepts the bare set or the
    /// `{"criteria": {...}}` envelope returned by the extraction endpoint.
    pub fn from_input(raw: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AppError::MalformedCriteriaInput(format!("criteria is not valid JSON: {e}")))?;

        let inner = match value {
            Value::Object(mut object) if object.contains_key("criteria") => object
                .remove("criteria")
                .unwrap_or(Value::Null),
            other => other,
        };

        serde_json::from_value(inner).map_err(|e| {
            AppError::MalformedCriteriaInput(format!(
                "criteria must be an object with MustHave, GoodToHave and NiceToHave groups: {e}"
            ))
        })
    }
}

/// Column label for one criterion, e.g. `Must have: Rust`.
pub fn column_label(tier: Tier, criterion: &str) -> String {
    format!("{}: {}", tier.label(), criterion)
}
