//! Personalised recommendations.
//!
//! Each category's monthly total is compared with a fixed threshold; every
//! category above its threshold yields one recommendation. A footprint under
//! all thresholds gets a single congratulation instead.

use serde::{Deserialize, Serialize};

use crate::model::{Category, FootprintResult};

/// Monthly transport total (kg CO₂) above which transport advice is given.
pub const TRANSPORT_THRESHOLD: f64 = 50.0;
/// Monthly food total (kg CO₂) above which food advice is given.
pub const FOOD_THRESHOLD: f64 = 30.0;
/// Monthly housing total (kg CO₂) above which housing advice is given.
pub const HABITAT_THRESHOLD: f64 = 40.0;

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of advice for one area of the footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Area the advice is about (`"Transport"`, `"Food"`, ...)
    pub category: String,
    pub priority: Priority,
    pub suggestion: String,
    pub actions: Vec<String>,
    pub impact: String,
}

fn advice(
    category: &str,
    priority: Priority,
    suggestion: &str,
    actions: &[&str],
    impact: &str,
) -> Recommendation {
    Recommendation {
        category: category.to_string(),
        priority,
        suggestion: suggestion.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
        impact: impact.to_string(),
    }
}

/// Recommendations for a result, in transport, food, housing order.
pub fn recommend(result: &FootprintResult) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if result.monthly(Category::Transport) > TRANSPORT_THRESHOLD {
        recommendations.push(advice(
            Category::Transport.label(),
            Priority::High,
            "Your travel generates a lot of emissions",
            &[
                "Use public transport",
                "Car-pool to work",
                "Consider a bike or an e-bike",
            ],
            "Possible reduction: -40% of your emissions",
        ));
    }

    if result.monthly(Category::Food) > FOOD_THRESHOLD {
        recommendations.push(advice(
            Category::Food.label(),
            Priority::Medium,
            "Your meat consumption is high",
            &[
                "Cut down on red meat, the most emitting",
                "Try plant-based meals 2-3 times a week",
                "Prefer local and seasonal produce",
            ],
            "Possible reduction: -30% of your emissions",
        ));
    }

    if result.monthly(Category::Habitat) > HABITAT_THRESHOLD {
        recommendations.push(advice(
            Category::Habitat.label(),
            Priority::Medium,
            "Your home uses a lot of energy",
            &[
                "Improve your home's insulation",
                "Switch to LED bulbs",
                "Lowering the thermostat by 1°C cuts consumption by 7%",
            ],
            "Possible reduction: -25% of your emissions",
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(advice(
            "Well done!",
            Priority::Low,
            "Your footprint is low, keep it up!",
            &[
                "You are setting an environmental example",
                "Share your good habits with the people around you",
            ],
            "You inspire others positively",
        ));
    }

    tracing::debug!(count = recommendations.len(), "built recommendations");
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FoodBreakdown, HabitatBreakdown, TransportBreakdown};

    fn result(transport: f64, habitat: f64, food: f64) -> FootprintResult {
        FootprintResult {
            transport: TransportBreakdown {
                total: transport,
                ..Default::default()
            },
            habitat: HabitatBreakdown {
                total: habitat,
                ..Default::default()
            },
            food: FoodBreakdown {
                total: food,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn categories(recommendations: &[Recommendation]) -> Vec<&str> {
        recommendations.iter().map(|r| r.category.as_str()).collect()
    }

    #[test]
    fn test_low_footprint_gets_congratulation() {
        let recommendations = recommend(&result(10.0, 10.0, 10.0));
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].priority, Priority::Low);
        assert_eq!(recommendations[0].actions.len(), 2);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let recommendations = recommend(&result(50.0, 40.0, 30.0));
        assert_eq!(categories(&recommendations), vec!["Well done!"]);
    }

    #[test]
    fn test_all_categories_in_order() {
        let recommendations = recommend(&result(50.1, 40.1, 30.1));
        assert_eq!(
            categories(&recommendations),
            vec!["Transport", "Food", "Housing"]
        );
        assert_eq!(recommendations[0].priority, Priority::High);
        assert_eq!(recommendations[1].priority, Priority::Medium);
        assert_eq!(recommendations[2].priority, Priority::Medium);
    }

    #[test]
    fn test_single_category() {
        let recommendations = recommend(&result(0.0, 120.0, 0.0));
        assert_eq!(categories(&recommendations), vec!["Housing"]);
        assert!(recommendations[0].impact.contains("-25%"));
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
        assert!(Priority::High > Priority::Medium);
    }
}
