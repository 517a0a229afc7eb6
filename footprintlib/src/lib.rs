//! # footprintlib
//!
//! A carbon footprint library: calculates monthly and yearly CO₂ emissions
//! from a short lifestyle survey, and turns the results into display-ready
//! figures.
//!
//! ## Overview
//!
//! A survey covers three categories:
//!
//! - **Transport**: car, bus, train and plane kilometers
//! - **Housing**: heating and electricity (weighted by the country's grid
//!   intensity) and water
//! - **Food**: meat, dairy and vegetables
//!
//! The calculator produces a [`FootprintResult`]; the display layer derives
//! tonnes per year, category shares, a signed comparison with the global
//! average and intuitive equivalences (trees, flights, car kilometers).
//!
//! ## Features
//!
//! - **Pure formatting**: [`format_metrics`] has no I/O and no failure modes
//! - **Typed responses**: calculator envelopes decode into [`ApiResponse`]
//! - **Reference data**: a built-in country catalog, replaceable by a file
//! - **Table-ready output**: [`FootprintTable`] feeds templates or JSON
//!
//! ## Example
//!
//! ```rust
//! use footprintlib::{format_metrics, recommend, Calculator, SurveyInput};
//!
//! let mut input = SurveyInput::new().country("FR");
//! input.car_km = 800.0;
//! input.meat_kg = 2.0;
//!
//! let response = Calculator::default().calculate(&input).unwrap();
//! let metrics = format_metrics(&response.results);
//! assert_eq!(metrics.transport_percent, "76%");
//!
//! let advice = recommend(&response.results);
//! assert_eq!(advice[0].category, "Transport");
//! ```

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod options;
pub mod recommend;
pub mod response;
pub mod table;

pub use calculator::{compute, Calculator, EmissionFactors, SurveyInput};
pub use catalog::{
    Catalog, Country, CountryIntensity, EnergyClass, EnergySource, GlobalSummary, RegionStats,
    StatisticsResponse,
};
pub use config::FootprintConfig;
pub use display::{format_metrics, format_metrics_with, DisplayMetrics};
pub use error::FootprintError;
pub use model::{Category, FootprintResult, Totals};
pub use options::{DisplayOptions, NumberLocale, Sections, ZeroSign};
pub use recommend::{recommend, Priority, Recommendation};
pub use response::{
    parse_response, parse_results, read_results, ApiResponse, CalculateResponse,
    CountriesResponse, CountryResponse, RecommendationsResponse,
};
pub use table::{FootprintTable, TableRow};

/// Result type for footprintlib operations
pub type Result<T> = std::result::Result<T, FootprintError>;
