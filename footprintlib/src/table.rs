//! Table-ready data structures for footprint output.
//!
//! This module provides `FootprintTable`, a presentation-ready data structure
//! that can be directly consumed by templates or serialized to JSON.
//!
//! The data flow is:
//! 1. Raw result (calculator output or catalog statistics)
//! 2. Display formatting (units, rounding, separators)
//! 3. FootprintTable (table-ready: headers, rows, footer)

use serde::{Deserialize, Serialize};

use crate::catalog::{format_intensity, Country, CountryIntensity, EnergyClass, StatisticsResponse};
use crate::display::{format_fixed, format_metrics_with};
use crate::model::{Category, FootprintResult};
use crate::options::{DisplayOptions, NumberLocale};

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (category, country, region, "Total", etc.)
    pub label: String,
    /// Values for each column after the label (as strings, ready for display)
    pub values: Vec<String>,
}

impl TableRow {
    fn new(label: impl Into<String>, values: Vec<String>) -> Self {
        TableRow {
            label: label.into(),
            values,
        }
    }
}

/// Table-ready footprint data.
///
/// This is the final data structure before presentation. Templates
/// iterate over headers/rows/footer and apply styling - no computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintTable {
    /// Optional title (e.g., "Emissions by region")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers: [label_header, column1, column2, ...]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary/footer row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<TableRow>,
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

impl FootprintTable {
    /// Yearly tonnes and share per category, with the annual total as footer.
    pub fn categories(result: &FootprintResult, options: &DisplayOptions) -> Self {
        let metrics = format_metrics_with(result, options);
        let rows = Category::ALL
            .iter()
            .map(|c| {
                TableRow::new(
                    c.label(),
                    vec![
                        metrics.total_for(*c).to_string(),
                        metrics.percent_for(*c).to_string(),
                    ],
                )
            })
            .collect();
        let share = if result.totals.annual > 0.0 { "100%" } else { "0%" };

        FootprintTable {
            title: Some("Emissions by category".to_string()),
            headers: headers(&["Category", "t CO₂/year", "Share"]),
            rows,
            footer: Some(TableRow::new(
                "Total",
                vec![metrics.annual_total, share.to_string()],
            )),
        }
    }

    /// Monthly kilograms per line item, with the monthly total as footer.
    pub fn line_items(result: &FootprintResult, locale: &NumberLocale) -> Self {
        let items = [
            (Category::Transport, "Car", result.transport.car),
            (Category::Transport, "Bus", result.transport.bus),
            (Category::Transport, "Train", result.transport.train),
            (Category::Transport, "Flight", result.transport.flight),
            (Category::Habitat, "Heating", result.habitat.heating),
            (Category::Habitat, "Electricity", result.habitat.electricity),
            (Category::Habitat, "Water", result.habitat.water),
            (Category::Food, "Meat", result.food.meat),
            (Category::Food, "Dairy", result.food.dairy),
            (Category::Food, "Vegetables", result.food.vegetables),
        ];
        let rows = items
            .iter()
            .filter(|(_, _, kg)| *kg > 0.0)
            .map(|(category, name, kg)| {
                TableRow::new(
                    *name,
                    vec![category.label().to_string(), format_fixed(*kg, 2, locale)],
                )
            })
            .collect();
        let monthly: f64 = Category::ALL.iter().map(|c| result.monthly(*c)).sum();

        FootprintTable {
            title: Some("Monthly breakdown".to_string()),
            headers: headers(&["Item", "Category", "kg CO₂/month"]),
            rows,
            footer: Some(TableRow::new(
                "Total",
                vec![String::new(), format_fixed(monthly, 2, locale)],
            )),
        }
    }

    /// Country count and intensity range per region.
    pub fn regions(stats: &StatisticsResponse, locale: &NumberLocale) -> Self {
        let rows = stats
            .regions
            .iter()
            .map(|r| {
                TableRow::new(
                    r.region.clone(),
                    vec![
                        r.countries_count.to_string(),
                        format_intensity(r.avg_intensity, locale),
                        format_intensity(r.min_intensity, locale),
                        format_intensity(r.max_intensity, locale),
                    ],
                )
            })
            .collect();

        FootprintTable {
            title: Some("Emissions by region".to_string()),
            headers: headers(&["Region", "Countries", "Average", "Min", "Max"]),
            rows,
            footer: None,
        }
    }

    /// A titled country ranking.
    pub fn ranking(title: &str, countries: &[CountryIntensity], locale: &NumberLocale) -> Self {
        let rows = countries
            .iter()
            .map(|c| TableRow::new(c.name.clone(), vec![format_intensity(c.co2_intensity, locale)]))
            .collect();

        FootprintTable {
            title: Some(title.to_string()),
            headers: headers(&["Country", "Intensity"]),
            rows,
            footer: None,
        }
    }

    /// Energy sources with their emissions and class.
    pub fn energy_sources(stats: &StatisticsResponse, locale: &NumberLocale) -> Self {
        let rows = stats
            .energy_sources
            .iter()
            .map(|s| {
                TableRow::new(
                    s.name.clone(),
                    vec![
                        format_intensity(s.co2_per_kwh, locale),
                        EnergyClass::classify(s.co2_per_kwh).label().to_string(),
                    ],
                )
            })
            .collect();

        FootprintTable {
            title: Some("Energy sources".to_string()),
            headers: headers(&["Source", "Emissions", "Type"]),
            rows,
            footer: None,
        }
    }

    /// Country list with codes and regions.
    pub fn countries(countries: &[Country], locale: &NumberLocale) -> Self {
        let rows = countries
            .iter()
            .map(|c| {
                TableRow::new(
                    c.code.clone(),
                    vec![
                        c.name.clone(),
                        c.region.clone(),
                        format_intensity(c.co2_intensity, locale),
                    ],
                )
            })
            .collect();

        FootprintTable {
            title: None,
            headers: headers(&["Code", "Country", "Region", "Intensity"]),
            rows,
            footer: Some(TableRow::new(
                format!("Total ({} countries)", countries.len()),
                vec![],
            )),
        }
    }
}
