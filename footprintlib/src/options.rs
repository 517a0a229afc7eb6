//! Input options for formatting and reporting.
//!
//! This module contains the configuration types that control how the
//! library renders numbers and which report sections it produces.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Separators used when printing numbers for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    /// Thousands group separator
    pub group_separator: char,
    /// Decimal separator
    pub decimal_separator: char,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::plain()
    }
}

impl NumberLocale {
    /// Space-grouped thousands, dot decimals (`15 235`, `4.3`)
    pub fn plain() -> Self {
        Self {
            group_separator: ' ',
            decimal_separator: '.',
        }
    }

    /// French typography: narrow no-break space groups, comma decimals
    pub fn french() -> Self {
        Self {
            group_separator: '\u{202F}',
            decimal_separator: ',',
        }
    }
}

impl FromStr for NumberLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "default" | "en" => Ok(NumberLocale::plain()),
            "fr" | "fr-fr" | "french" => Ok(NumberLocale::french()),
            _ => Err(format!("Unknown locale: {}", s)),
        }
    }
}

/// How a comparison ratio of exactly zero is signed.
///
/// Positive ratios always get a leading `+` and negative ones keep their
/// `-`; zero is the only ambiguous case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroSign {
    /// Zero renders as `0%`
    #[default]
    Plain,
    /// Zero renders as `+0%`
    Plus,
}

impl FromStr for ZeroSign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "none" => Ok(ZeroSign::Plain),
            "plus" | "+" => Ok(ZeroSign::Plus),
            _ => Err(format!("Unknown zero sign policy: {}", s)),
        }
    }
}

/// Display settings for the derived-metrics formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Number separators
    pub locale: NumberLocale,
    /// Sign convention for a zero comparison
    pub zero_sign: ZeroSign,
}

impl DisplayOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the number locale
    pub fn locale(mut self, locale: NumberLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Builder: set the zero sign policy
    pub fn zero_sign(mut self, zero_sign: ZeroSign) -> Self {
        self.zero_sign = zero_sign;
        self
    }
}

/// Which report sections to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    /// Headline metrics and category breakdown
    pub results: bool,
    /// Personalised recommendations
    pub recommendations: bool,
}

impl Default for Sections {
    fn default() -> Self {
        Self::all()
    }
}

impl Sections {
    /// Every section (default)
    pub fn all() -> Self {
        Self {
            results: true,
            recommendations: true,
        }
    }

    /// No section
    pub fn none() -> Self {
        Self {
            results: false,
            recommendations: false,
        }
    }

    /// Builder: set results inclusion
    pub fn with_results(mut self, include: bool) -> Self {
        self.results = include;
        self
    }

    /// Builder: set recommendations inclusion
    pub fn with_recommendations(mut self, include: bool) -> Self {
        self.recommendations = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_options_default() {
        let options = DisplayOptions::default();
        assert_eq!(options.locale, NumberLocale::plain());
        assert_eq!(options.zero_sign, ZeroSign::Plain);
    }

    #[test]
    fn test_display_options_builder() {
        let options = DisplayOptions::new()
            .locale(NumberLocale::french())
            .zero_sign(ZeroSign::Plus);
        assert_eq!(options.locale.decimal_separator, ',');
        assert_eq!(options.zero_sign, ZeroSign::Plus);
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!(NumberLocale::from_str("fr").unwrap(), NumberLocale::french());
        assert_eq!(NumberLocale::from_str("PLAIN").unwrap(), NumberLocale::plain());
        assert!(NumberLocale::from_str("klingon").is_err());
    }

    #[test]
    fn test_zero_sign_from_str() {
        assert_eq!(ZeroSign::from_str("plus").unwrap(), ZeroSign::Plus);
        assert_eq!(ZeroSign::from_str("plain").unwrap(), ZeroSign::Plain);
        assert!(ZeroSign::from_str("minus").is_err());
    }

    #[test]
    fn test_sections_builder() {
        let sections = Sections::none().with_results(true);
        assert!(sections.results);
        assert!(!sections.recommendations);
        assert_eq!(Sections::default(), Sections::all());
    }
}
