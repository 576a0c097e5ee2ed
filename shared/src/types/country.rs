//! Country table used for phone formatting and dial prefix display

use serde::{Deserialize, Serialize};

/// Digit grouping applied when formatting a local number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberLayout {
    /// North American Numbering Plan, grouped 3-3-4
    NorthAmerican,
    /// Digits only, no punctuation
    Plain,
}

/// A country entry known to the phone formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Two-letter country identifier (ISO 3166-1 alpha-2)
    pub code: String,
    /// Display name
    pub name: String,
    /// International dial prefix including '+'
    pub dial_code: String,
    /// Local number layout
    #[serde(default = "default_layout")]
    pub layout: NumberLayout,
}

impl Country {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        dial_code: impl Into<String>,
        layout: NumberLayout,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            dial_code: dial_code.into(),
            layout,
        }
    }

    /// Case-insensitive match on the two-letter code
    pub fn matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }
}

fn default_layout() -> NumberLayout {
    NumberLayout::Plain
}

/// Default country table
pub fn default_countries() -> Vec<Country> {
    vec![
        Country::new("US", "United States", "+1", NumberLayout::NorthAmerican),
        Country::new("CA", "Canada", "+1", NumberLayout::NorthAmerican),
        Country::new("GB", "United Kingdom", "+44", NumberLayout::Plain),
        Country::new("AU", "Australia", "+61", NumberLayout::Plain),
        Country::new("CN", "China", "+86", NumberLayout::Plain),
        Country::new("DE", "Germany", "+49", NumberLayout::Plain),
        Country::new("FR", "France", "+33", NumberLayout::Plain),
        Country::new("IN", "India", "+91", NumberLayout::Plain),
        Country::new("JP", "Japan", "+81", NumberLayout::Plain),
        Country::new("BR", "Brazil", "+55", NumberLayout::Plain),
    ]
}

/// Find a country by its two-letter code
pub fn find_country<'a>(countries: &'a [Country], code: &str) -> Option<&'a Country> {
    countries.iter().find(|c| c.matches(code))
}
