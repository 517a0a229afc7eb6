//! Footprint calculation from monthly survey answers.
//!
//! Each answer is multiplied by an emission factor (kg CO₂ per unit) to get a
//! monthly line item; line items add up to category totals, and the monthly
//! total is scaled to a year and compared with reference figures.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Country};
use crate::display::round_to;
use crate::error::FootprintError;
use crate::model::{
    FoodBreakdown, FootprintResult, HabitatBreakdown, Totals, TransportBreakdown, MONTHS_PER_YEAR,
};
use crate::response::CalculateResponse;
use crate::Result;

/// Average yearly footprint per person worldwide (kg CO₂).
pub const GLOBAL_AVERAGE_KG: f64 = 4800.0;
/// CO₂ absorbed by one tree in a year (kg).
pub const KG_PER_TREE: f64 = 20.0;
/// CO₂ of one long-haul flight (kg).
pub const KG_PER_FLIGHT: f64 = 700.0;
/// CO₂ of one kilometer driven by car (kg).
pub const CAR_KG_PER_KM: f64 = 0.21;
/// Country used when the survey names none.
pub const DEFAULT_COUNTRY: &str = "FR";
/// Format of [`CalculateResponse::timestamp`] for local calculations.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// Monthly survey answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyInput {
    pub country_code: String,
    pub car_km: f64,
    pub bus_km: f64,
    pub train_km: f64,
    pub flight_km: f64,
    pub heating_kwh: f64,
    pub electricity_kwh: f64,
    pub water_m3: f64,
    pub meat_kg: f64,
    pub dairy_kg: f64,
    pub vegetables_kg: f64,
}

impl Default for SurveyInput {
    fn default() -> Self {
        Self {
            country_code: default_country(),
            car_km: 0.0,
            bus_km: 0.0,
            train_km: 0.0,
            flight_km: 0.0,
            heating_kwh: 0.0,
            electricity_kwh: 0.0,
            water_m3: 0.0,
            meat_kg: 0.0,
            dairy_kg: 0.0,
            vegetables_kg: 0.0,
        }
    }
}

impl SurveyInput {
    /// Create an empty survey for the default country.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the country code
    pub fn country(mut self, code: impl Into<String>) -> Self {
        self.country_code = code.into();
        self
    }

    fn quantities(&self) -> [(&'static str, f64); 10] {
        [
            ("car_km", self.car_km),
            ("bus_km", self.bus_km),
            ("train_km", self.train_km),
            ("flight_km", self.flight_km),
            ("heating_kwh", self.heating_kwh),
            ("electricity_kwh", self.electricity_kwh),
            ("water_m3", self.water_m3),
            ("meat_kg", self.meat_kg),
            ("dairy_kg", self.dairy_kg),
            ("vegetables_kg", self.vegetables_kg),
        ]
    }

    /// Reject negative or non-finite quantities.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.quantities() {
            if !value.is_finite() || value < 0.0 {
                return Err(FootprintError::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Emission factors in kg CO₂ per unit.
///
/// Heating and electricity have no factor here: they use the country's grid
/// intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionFactors {
    /// per km, petrol car
    pub car: f64,
    /// per km
    pub bus: f64,
    /// per km
    pub train: f64,
    /// per km, domestic flight
    pub flight: f64,
    /// per m³
    pub water: f64,
    /// per kg, beef
    pub meat: f64,
    /// per kg, cheese
    pub dairy: f64,
    /// per kg
    pub vegetables: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            car: 0.21,
            bus: 0.089,
            train: 0.041,
            flight: 0.255,
            water: 0.2,
            meat: 27.0,
            dairy: 13.5,
            vegetables: 0.5,
        }
    }
}

/// Compute the breakdown for one survey and a known grid intensity.
pub fn compute(
    input: &SurveyInput,
    co2_intensity: f64,
    factors: &EmissionFactors,
) -> FootprintResult {
    let mut transport = TransportBreakdown {
        car: input.car_km * factors.car,
        bus: input.bus_km * factors.bus,
        train: input.train_km * factors.train,
        flight: input.flight_km * factors.flight,
        total: 0.0,
    };
    transport.total = transport.car + transport.bus + transport.train + transport.flight;

    let mut habitat = HabitatBreakdown {
        heating: input.heating_kwh * co2_intensity,
        electricity: input.electricity_kwh * co2_intensity,
        water: input.water_m3 * factors.water,
        total: 0.0,
    };
    habitat.total = habitat.heating + habitat.electricity + habitat.water;

    let mut food = FoodBreakdown {
        meat: input.meat_kg * factors.meat,
        dairy: input.dairy_kg * factors.dairy,
        vegetables: input.vegetables_kg * factors.vegetables,
        total: 0.0,
    };
    food.total = food.meat + food.dairy + food.vegetables;

    // Both totals are rounded from the unrounded sum.
    let raw_monthly = transport.total + habitat.total + food.total;
    let monthly = round_to(raw_monthly, 2);
    let annual = round_to(raw_monthly * MONTHS_PER_YEAR, 2);

    FootprintResult {
        totals: Totals {
            monthly,
            annual,
            trees_needed: round_to(annual / KG_PER_TREE, 1),
            flights_equivalent: round_to(annual / KG_PER_FLIGHT, 1),
            cars_km: round_to(annual / CAR_KG_PER_KM, 0),
            vs_global: round_to((annual / GLOBAL_AVERAGE_KG - 1.0) * 100.0, 1),
        },
        transport,
        habitat,
        food,
    }
}

/// Local time in ISO 8601 with microseconds (`2024-12-01T10:00:00.123456`).
fn timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Calculator bound to a catalog and a set of emission factors.
#[derive(Debug, Clone)]
pub struct Calculator {
    catalog: Catalog,
    factors: EmissionFactors,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl Calculator {
    /// Create a calculator with default emission factors.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            factors: EmissionFactors::default(),
        }
    }

    /// Builder: replace the emission factors
    pub fn factors(mut self, factors: EmissionFactors) -> Self {
        self.factors = factors;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Look up the survey's country.
    pub fn country(&self, input: &SurveyInput) -> Result<&Country> {
        self.catalog.require_country(&input.country_code)
    }

    /// Validate the survey and compute its footprint.
    ///
    /// # Example
    ///
    /// ```rust
    /// use footprintlib::{Calculator, SurveyInput};
    ///
    /// let mut input = SurveyInput::new().country("FR");
    /// input.car_km = 1000.0;
    ///
    /// let response = Calculator::default().calculate(&input).unwrap();
    /// assert_eq!(response.results.totals.monthly, 210.0);
    /// assert_eq!(response.results.totals.annual, 2520.0);
    /// ```
    pub fn calculate(&self, input: &SurveyInput) -> Result<CalculateResponse> {
        input.validate()?;
        let country = self.country(input)?;
        let results = compute(input, country.co2_intensity, &self.factors);

        tracing::debug!(
            country = %country.code,
            monthly = results.totals.monthly,
            annual = results.totals.annual,
            "calculated footprint"
        );

        Ok(CalculateResponse {
            results,
            country_code: country.code.clone(),
            timestamp: Some(timestamp()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn france() -> f64 {
        Catalog::builtin().country("FR").unwrap().co2_intensity
    }

    #[test]
    fn test_empty_survey() {
        let result = compute(&SurveyInput::new(), france(), &EmissionFactors::default());
        assert_eq!(result.totals.annual, 0.0);
        assert_eq!(result.totals.vs_global, -100.0);
        assert_eq!(result.totals.trees_needed, 0.0);
    }

    #[test]
    fn test_line_items() {
        let input = SurveyInput {
            car_km: 100.0,
            bus_km: 100.0,
            train_km: 100.0,
            flight_km: 100.0,
            water_m3: 10.0,
            meat_kg: 1.0,
            dairy_kg: 2.0,
            vegetables_kg: 10.0,
            ..SurveyInput::new()
        };
        let result = compute(&input, 0.1, &EmissionFactors::default());

        assert!((result.transport.car - 21.0).abs() < 1e-9);
        assert!((result.transport.bus - 8.9).abs() < 1e-9);
        assert!((result.transport.train - 4.1).abs() < 1e-9);
        assert!((result.transport.flight - 25.5).abs() < 1e-9);
        assert!((result.transport.total - 59.5).abs() < 1e-9);
        assert!((result.habitat.water - 2.0).abs() < 1e-9);
        assert!((result.food.total - 59.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_intensity_drives_housing() {
        let input = SurveyInput {
            heating_kwh: 1000.0,
            electricity_kwh: 500.0,
            ..SurveyInput::new()
        };
        let result = compute(&input, 0.4, &EmissionFactors::default());
        assert!((result.habitat.heating - 400.0).abs() < 1e-9);
        assert!((result.habitat.electricity - 200.0).abs() < 1e-9);
        assert!((result.habitat.total - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_and_equivalences() {
        // 400 kg/month -> 4800 kg/year, exactly the global average
        let input = SurveyInput {
            meat_kg: 400.0 / 27.0,
            ..SurveyInput::new()
        };
        let result = compute(&input, 0.0, &EmissionFactors::default());

        assert_eq!(result.totals.monthly, 400.0);
        assert_eq!(result.totals.annual, 4800.0);
        assert_eq!(result.totals.vs_global, 0.0);
        assert_eq!(result.totals.trees_needed, 240.0);
        assert_eq!(result.totals.flights_equivalent, 6.9);
        assert_eq!(result.totals.cars_km, 22857.0);
    }

    #[test]
    fn test_annual_rounds_from_unrounded_monthly() {
        let input = SurveyInput {
            meat_kg: 2000.0 / 81.0,
            ..SurveyInput::new()
        };
        let result = compute(&input, 0.0, &EmissionFactors::default());
        assert_eq!(result.totals.monthly, 666.67);
        assert_eq!(result.totals.annual, 8000.0);
        assert_eq!(result.totals.trees_needed, 400.0);

        let input = SurveyInput {
            vegetables_kg: 0.01,
            ..SurveyInput::new()
        };
        let result = compute(&input, 0.0, &EmissionFactors::default());
        assert_eq!(result.totals.annual, 0.06);
    }

    #[test]
    fn test_calculator_sets_timestamp() {
        let response = Calculator::default().calculate(&SurveyInput::new()).unwrap();
        let timestamp = response.timestamp.expect("timestamp");
        assert!(chrono::NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).is_ok());
        assert!(timestamp.contains('T'));
    }

    #[test]
    fn test_custom_factors() {
        let factors = EmissionFactors {
            car: 0.1,
            ..EmissionFactors::default()
        };
        let input = SurveyInput {
            car_km: 50.0,
            ..SurveyInput::new()
        };
        let result = compute(&input, 0.0, &factors);
        assert!((result.transport.total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculator_unknown_country() {
        let input = SurveyInput::new().country("ZZ");
        let err = Calculator::default().calculate(&input).unwrap_err();
        assert!(matches!(err, FootprintError::UnknownCountry(_)));
    }

    #[test]
    fn test_calculator_rejects_negative_input() {
        let input = SurveyInput {
            bus_km: -3.0,
            ..SurveyInput::new()
        };
        let err = Calculator::default().calculate(&input).unwrap_err();
        assert!(err.to_string().contains("bus_km"));
    }

    #[test]
    fn test_calculator_normalizes_country_code() {
        let input = SurveyInput::new().country("de");
        let response = Calculator::default().calculate(&input).unwrap();
        assert_eq!(response.country_code, "DE");
    }

    #[test]
    fn test_survey_defaults_from_json() {
        let input: SurveyInput = serde_json::from_str(r#"{"car_km": 12.5}"#).unwrap();
        assert_eq!(input.country_code, "FR");
        assert_eq!(input.car_km, 12.5);
        assert_eq!(input.meat_kg, 0.0);
    }
}
