//! Core data structures for footprint results.
//!
//! A [`FootprintResult`] is the calculator's answer for one survey: monthly
//! subtotals per category (kg CO₂/month) plus yearly totals and equivalence
//! figures. It is read-only once built; formatting happens in
//! [`crate::display`].

use serde::{Deserialize, Serialize};

use crate::error::FootprintError;
use crate::Result;

/// Months per year, used for every monthly → annual conversion.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Emission category of the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Car, bus, train and plane travel
    Transport,
    /// Heating, electricity and water at home
    Habitat,
    /// Meat, dairy and vegetables
    Food,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 3] = [Category::Transport, Category::Habitat, Category::Food];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Transport => "Transport",
            Category::Habitat => "Housing",
            Category::Food => "Food",
        }
    }

    /// Stable machine key (matches the JSON field name)
    pub fn key(&self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Habitat => "habitat",
            Category::Food => "food",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Yearly totals and equivalence figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Monthly total (kg CO₂/month)
    #[serde(default)]
    pub monthly: f64,
    /// Annual total (kg CO₂/year)
    pub annual: f64,
    /// Signed percentage against the global average
    pub vs_global: f64,
    /// Trees needed to absorb the annual total
    pub trees_needed: f64,
    /// Equivalent number of long-haul flights
    pub flights_equivalent: f64,
    /// Equivalent kilometers driven by car
    pub cars_km: f64,
}

/// Transport line items (kg CO₂/month).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportBreakdown {
    #[serde(default)]
    pub car: f64,
    #[serde(default)]
    pub bus: f64,
    #[serde(default)]
    pub train: f64,
    #[serde(default)]
    pub flight: f64,
    pub total: f64,
}

/// Housing line items (kg CO₂/month).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitatBreakdown {
    #[serde(default)]
    pub heating: f64,
    #[serde(default)]
    pub electricity: f64,
    #[serde(default)]
    pub water: f64,
    pub total: f64,
}

/// Food line items (kg CO₂/month).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodBreakdown {
    #[serde(default)]
    pub meat: f64,
    #[serde(default)]
    pub dairy: f64,
    #[serde(default)]
    pub vegetables: f64,
    pub total: f64,
}

/// Emissions breakdown for one survey.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    pub totals: Totals,
    pub transport: TransportBreakdown,
    pub habitat: HabitatBreakdown,
    pub food: FoodBreakdown,
}

impl FootprintResult {
    /// Monthly subtotal of a category (kg CO₂/month)
    pub fn monthly(&self, category: Category) -> f64 {
        match category {
            Category::Transport => self.transport.total,
            Category::Habitat => self.habitat.total,
            Category::Food => self.food.total,
        }
    }

    /// Annual mass of a category (kg CO₂/year)
    pub fn annual(&self, category: Category) -> f64 {
        self.monthly(category) * MONTHS_PER_YEAR
    }

    /// Check the values a formatter relies on.
    ///
    /// Category subtotals and the annual total must be finite and
    /// non-negative; `vs_global` and the equivalences must be finite.
    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let value = self.monthly(category);
            if !value.is_finite() || value < 0.0 {
                return Err(FootprintError::InvalidInput(format!(
                    "{} total must be a non-negative number, got {}",
                    category.key(),
                    value
                )));
            }
        }
        if !self.totals.annual.is_finite() || self.totals.annual < 0.0 {
            return Err(FootprintError::InvalidInput(format!(
                "annual total must be a non-negative number, got {}",
                self.totals.annual
            )));
        }
        let figures = [
            ("vs_global", self.totals.vs_global),
            ("trees_needed", self.totals.trees_needed),
            ("flights_equivalent", self.totals.flights_equivalent),
            ("cars_km", self.totals.cars_km),
        ];
        for (name, value) in figures {
            if !value.is_finite() {
                return Err(FootprintError::InvalidInput(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }
        Ok(())
    }
}
