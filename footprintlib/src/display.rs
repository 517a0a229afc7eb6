//! Derived display metrics.
//!
//! Turns a [`FootprintResult`] into the strings shown to the user: totals in
//! tonnes, each category's share of the annual total, the signed comparison
//! with the global average, and the rounded equivalence figures.
//!
//! Everything here is pure. The only guarded condition is a zero annual
//! total, for which every share is reported as `0%`.

use serde::Serialize;

use crate::model::{Category, FootprintResult};
use crate::options::{DisplayOptions, NumberLocale, ZeroSign};

/// Kilograms per metric tonne.
pub const KG_PER_TONNE: f64 = 1000.0;

/// Display-ready strings for one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMetrics {
    /// Annual total in tonnes, two decimals (`"8.00"`)
    pub annual_total: String,
    /// Signed comparison with the global average (`"+12%"`, `"-8%"`)
    pub comparison: String,
    /// Transport tonnes per year
    pub transport_total: String,
    /// Housing tonnes per year
    pub habitat_total: String,
    /// Food tonnes per year
    pub food_total: String,
    /// Transport share of the annual total (`"45%"`)
    pub transport_percent: String,
    /// Housing share of the annual total
    pub habitat_percent: String,
    /// Food share of the annual total
    pub food_percent: String,
    /// Trees needed, nearest integer
    pub trees_needed: String,
    /// Flight equivalents, one decimal
    pub flights_equivalent: String,
    /// Car kilometers, nearest integer with grouped thousands
    pub cars_km: String,
}

impl DisplayMetrics {
    /// Tonnes-per-year string of a category
    pub fn total_for(&self, category: Category) -> &str {
        match category {
            Category::Transport => &self.transport_total,
            Category::Habitat => &self.habitat_total,
            Category::Food => &self.food_total,
        }
    }

    /// Share string of a category
    pub fn percent_for(&self, category: Category) -> &str {
        match category {
            Category::Transport => &self.transport_percent,
            Category::Habitat => &self.habitat_percent,
            Category::Food => &self.food_percent,
        }
    }
}

/// Format a result with default display options.
pub fn format_metrics(result: &FootprintResult) -> DisplayMetrics {
    format_metrics_with(result, &DisplayOptions::default())
}

/// Format a result with explicit display options.
///
/// # Example
///
/// ```rust
/// use footprintlib::{format_metrics, FootprintResult};
///
/// let mut result = FootprintResult::default();
/// result.totals.annual = 8000.0;
/// result.transport.total = 300.0;
/// result.habitat.total = 200.0;
/// result.food.total = 167.0;
///
/// let metrics = format_metrics(&result);
/// assert_eq!(metrics.annual_total, "8.00");
/// assert_eq!(metrics.transport_percent, "45%");
/// ```
pub fn format_metrics_with(result: &FootprintResult, options: &DisplayOptions) -> DisplayMetrics {
    let locale = &options.locale;
    let annual_kg = result.totals.annual;

    let tonnes =
        |category: Category| format_fixed(kg_to_tonnes(result.annual(category)), 2, locale);
    let percent = |category: Category| {
        format!(
            "{}%",
            format_fixed(share_percent(result.annual(category), annual_kg), 0, locale)
        )
    };

    DisplayMetrics {
        annual_total: format_fixed(kg_to_tonnes(annual_kg), 2, locale),
        comparison: format_signed_percent(result.totals.vs_global, options.zero_sign, locale),
        transport_total: tonnes(Category::Transport),
        habitat_total: tonnes(Category::Habitat),
        food_total: tonnes(Category::Food),
        transport_percent: percent(Category::Transport),
        habitat_percent: percent(Category::Habitat),
        food_percent: percent(Category::Food),
        trees_needed: format_fixed(result.totals.trees_needed, 0, locale),
        flights_equivalent: format_fixed(result.totals.flights_equivalent, 1, locale),
        cars_km: format_grouped(result.totals.cars_km, locale),
    }
}

/// Convert kilograms to tonnes.
pub fn kg_to_tonnes(kg: f64) -> f64 {
    kg / KG_PER_TONNE
}

/// Share of `part` in `total`, in percent. Zero when `total` is not positive.
pub fn share_percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Round half away from zero to `decimals` places.
///
/// Values too large to scale are returned unchanged; they have no
/// fractional part left to round.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Fixed-point rendering with the locale's decimal separator.
///
/// Halves round away from zero (`12.5` → `"13"`), and a negative zero is
/// printed without its sign.
pub fn format_fixed(value: f64, decimals: u32, locale: &NumberLocale) -> String {
    let rounded = normalize_zero(round_to(value, decimals));
    let text = format!("{:.*}", decimals as usize, rounded);
    localize_decimal(text, locale)
}

/// Nearest integer with grouped thousands (`15234.6` → `"15 235"`).
pub fn format_grouped(value: f64, locale: &NumberLocale) -> String {
    let rounded = normalize_zero(value.round());
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(locale.group_separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Signed percentage: `+` before positive values, natural `-` for negatives.
///
/// The value is printed as given (`12.5` → `"+12.5%"`, `12` → `"+12%"`).
pub fn format_signed_percent(value: f64, zero_sign: ZeroSign, locale: &NumberLocale) -> String {
    let value = normalize_zero(value);
    let sign = if value > 0.0 || (value == 0.0 && zero_sign == ZeroSign::Plus) {
        "+"
    } else {
        ""
    };
    format!("{}{}%", sign, localize_decimal(value.to_string(), locale))
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn localize_decimal(text: String, locale: &NumberLocale) -> String {
    if locale.decimal_separator == '.' {
        text
    } else {
        text.replace('.', &locale.decimal_separator.to_string())
    }
}
