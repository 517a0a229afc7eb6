//! Country grid intensities, energy sources and world statistics.
//!
//! The catalog holds the reference data the calculator needs: each country's
//! electricity carbon intensity (kg CO₂/kWh) and the lifecycle emissions of
//! common energy sources. A built-in catalog ships with the library; a TOML
//! or JSON file with the same shape can replace it.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::display::format_fixed;
use crate::error::FootprintError;
use crate::options::NumberLocale;
use crate::Result;

/// Number of entries in each country ranking.
pub const RANKING_SIZE: usize = 10;

/// A country and its electricity grid intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166 alpha-2 code
    pub code: String,
    pub name: String,
    pub region: String,
    /// kg CO₂ per kWh
    pub co2_intensity: f64,
}

/// An electricity generation source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySource {
    pub name: String,
    /// Lifecycle kg CO₂ per kWh
    pub co2_per_kwh: f64,
    #[serde(default)]
    pub description: String,
}

/// Aggregated intensities of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub region: String,
    pub countries_count: usize,
    pub avg_intensity: f64,
    pub min_intensity: f64,
    pub max_intensity: f64,
}

/// A country name with its intensity, as listed in rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryIntensity {
    pub name: String,
    pub co2_intensity: f64,
}

/// World statistics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub regions: Vec<RegionStats>,
    pub most_polluting: Vec<CountryIntensity>,
    pub cleanest: Vec<CountryIntensity>,
    pub energy_sources: Vec<EnergySource>,
}

/// Average, minimum and maximum grid intensity over all countries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub global_avg: f64,
    pub min_intensity: f64,
    pub max_intensity: f64,
}

/// Coarse classification of an energy source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyClass {
    /// Above 0.5 kg CO₂/kWh
    Fossil,
    /// Above 0.2 kg CO₂/kWh
    Moderate,
    Clean,
}

impl EnergyClass {
    /// Classify a lifecycle intensity (kg CO₂/kWh)
    pub fn classify(co2_per_kwh: f64) -> Self {
        if co2_per_kwh > 0.5 {
            EnergyClass::Fossil
        } else if co2_per_kwh > 0.2 {
            EnergyClass::Moderate
        } else {
            EnergyClass::Clean
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnergyClass::Fossil => "Fossil",
            EnergyClass::Moderate => "Moderate",
            EnergyClass::Clean => "Clean",
        }
    }
}

/// Render an intensity given in kg/kWh as whole grams (`0.056` → `"56 g CO₂/kWh"`).
pub fn format_intensity(kg_per_kwh: f64, locale: &NumberLocale) -> String {
    format!("{} g CO₂/kWh", format_fixed(kg_per_kwh * 1000.0, 0, locale))
}

/// Reference data for the calculator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub energy_sources: Vec<EnergySource>,
}

const BUILTIN_COUNTRIES: &[(&str, &str, &str, f64)] = &[
    ("AE", "United Arab Emirates", "Middle East", 0.492),
    ("AR", "Argentina", "South America", 0.354),
    ("AU", "Australia", "Oceania", 0.549),
    ("BE", "Belgium", "Europe", 0.138),
    ("BR", "Brazil", "South America", 0.098),
    ("CA", "Canada", "North America", 0.128),
    ("CH", "Switzerland", "Europe", 0.046),
    ("CL", "Chile", "South America", 0.291),
    ("CN", "China", "Asia", 0.582),
    ("DE", "Germany", "Europe", 0.385),
    ("ES", "Spain", "Europe", 0.174),
    ("FR", "France", "Europe", 0.056),
    ("GB", "United Kingdom", "Europe", 0.238),
    ("ID", "Indonesia", "Asia", 0.676),
    ("IN", "India", "Asia", 0.713),
    ("IT", "Italy", "Europe", 0.331),
    ("JP", "Japan", "Asia", 0.485),
    ("KE", "Kenya", "Africa", 0.071),
    ("KR", "South Korea", "Asia", 0.436),
    ("MA", "Morocco", "Africa", 0.630),
    ("MX", "Mexico", "North America", 0.423),
    ("NL", "Netherlands", "Europe", 0.328),
    ("NO", "Norway", "Europe", 0.029),
    ("NZ", "New Zealand", "Oceania", 0.112),
    ("PL", "Poland", "Europe", 0.662),
    ("SA", "Saudi Arabia", "Middle East", 0.557),
    ("SE", "Sweden", "Europe", 0.041),
    ("US", "United States", "North America", 0.369),
    ("ZA", "South Africa", "Africa", 0.709),
];

const BUILTIN_ENERGY_SOURCES: &[(&str, f64, &str)] = &[
    ("Coal", 0.820, "Pulverised coal power plants"),
    ("Oil", 0.650, "Fuel oil and diesel generators"),
    ("Natural gas", 0.490, "Combined-cycle gas turbines"),
    ("Biomass", 0.230, "Dedicated biomass and wood pellets"),
    ("Solar PV", 0.045, "Utility-scale photovoltaics"),
    ("Geothermal", 0.038, "Geothermal power stations"),
    ("Hydropower", 0.024, "Reservoir and run-of-river dams"),
    ("Nuclear", 0.012, "Pressurised water reactors"),
    ("Wind", 0.011, "Onshore wind turbines"),
];

impl Catalog {
    /// The catalog bundled with the library.
    pub fn builtin() -> Self {
        Catalog {
            countries: BUILTIN_COUNTRIES
                .iter()
                .map(|(code, name, region, intensity)| Country {
                    code: code.to_string(),
                    name: name.to_string(),
                    region: region.to_string(),
                    co2_intensity: *intensity,
                })
                .collect(),
            energy_sources: BUILTIN_ENERGY_SOURCES
                .iter()
                .map(|(name, co2, description)| EnergySource {
                    name: name.to_string(),
                    co2_per_kwh: *co2,
                    description: description.to_string(),
                })
                .collect(),
        }
    }

    /// Load a catalog from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FootprintError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config_err = |message: String| FootprintError::Config {
            path: path.to_path_buf(),
            message,
        };

        let catalog: Catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))?,
            _ => toml::from_str(&text).map_err(|e| config_err(e.to_string()))?,
        };
        catalog.check().map_err(config_err)?;

        tracing::debug!(
            path = %path.display(),
            countries = catalog.countries.len(),
            energy_sources = catalog.energy_sources.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    fn check(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for country in &self.countries {
            if !seen.insert(country.code.to_uppercase()) {
                return Err(format!("duplicate country code '{}'", country.code));
            }
            if !country.co2_intensity.is_finite() || country.co2_intensity < 0.0 {
                return Err(format!(
                    "country '{}' has an invalid intensity {}",
                    country.code, country.co2_intensity
                ));
            }
        }
        for source in &self.energy_sources {
            if !source.co2_per_kwh.is_finite() || source.co2_per_kwh < 0.0 {
                return Err(format!(
                    "energy source '{}' has an invalid intensity {}",
                    source.name, source.co2_per_kwh
                ));
            }
        }
        Ok(())
    }

    /// Look up a country by code (case-insensitive).
    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Look up a country, failing with [`FootprintError::UnknownCountry`].
    pub fn require_country(&self, code: &str) -> Result<&Country> {
        self.country(code)
            .ok_or_else(|| FootprintError::UnknownCountry(code.to_string()))
    }

    /// All countries ordered by name.
    pub fn countries_by_name(&self) -> Vec<Country> {
        let mut countries = self.countries.clone();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }

    /// Average, minimum and maximum intensity. `None` for an empty catalog.
    pub fn global_summary(&self) -> Option<GlobalSummary> {
        if self.countries.is_empty() {
            return None;
        }
        let intensities = self.countries.iter().map(|c| c.co2_intensity);
        let sum: f64 = intensities.clone().sum();
        Some(GlobalSummary {
            global_avg: sum / self.countries.len() as f64,
            min_intensity: intensities.clone().fold(f64::INFINITY, f64::min),
            max_intensity: intensities.fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// Region aggregates, rankings and energy sources.
    pub fn statistics(&self) -> StatisticsResponse {
        let mut by_region: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for country in &self.countries {
            by_region
                .entry(country.region.as_str())
                .or_default()
                .push(country.co2_intensity);
        }

        let regions = by_region
            .into_iter()
            .map(|(region, values)| RegionStats {
                region: region.to_string(),
                countries_count: values.len(),
                avg_intensity: values.iter().sum::<f64>() / values.len() as f64,
                min_intensity: values.iter().copied().fold(f64::INFINITY, f64::min),
                max_intensity: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
            .collect();

        let mut ranked: Vec<&Country> = self.countries.iter().collect();
        ranked.sort_by(|a, b| {
            a.co2_intensity
                .total_cmp(&b.co2_intensity)
                .then_with(|| a.name.cmp(&b.name))
        });
        let to_entry = |c: &&Country| CountryIntensity {
            name: c.name.clone(),
            co2_intensity: c.co2_intensity,
        };
        let cleanest = ranked.iter().take(RANKING_SIZE).map(to_entry).collect();
        let most_polluting = ranked.iter().rev().take(RANKING_SIZE).map(to_entry).collect();

        let mut energy_sources = self.energy_sources.clone();
        energy_sources.sort_by(|a, b| a.co2_per_kwh.total_cmp(&b.co2_per_kwh));

        StatisticsResponse {
            regions,
            most_polluting,
            cleanest,
            energy_sources,
        }
    }
}
