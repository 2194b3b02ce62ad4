//! Unit conversion engine
//!
//! Category-aware conversion between spoken unit names. Length and weight are
//! linear against a category base unit (meter, gram); temperature converts
//! through a single canonical unit (kelvin) instead of a pairwise function
//! table. Alias sets include plurals and common abbreviations, with a
//! trailing-`s` fallback for plural forms the table does not list.

use thiserror::Error;

/// Errors produced by the converter
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    /// No single category contains both units
    #[error("no common category for '{from}' and '{to}'")]
    UnsupportedConversion { from: String, to: String },

    /// The value to convert was not numeric
    #[error("invalid numeric value '{0}'")]
    Parse(String),
}

/// A group of mutually convertible units. Checked in declaration order when
/// resolving a conversion; the first category containing both units wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Length,
    Weight,
    Temperature,
}

/// A linear unit: aliases plus a scale factor relative to the category base
/// (meter for length, gram for weight).
struct LinearUnit {
    aliases: &'static [&'static str],
    scale: f64,
}

const LENGTH_UNITS: &[LinearUnit] = &[
    LinearUnit { aliases: &["meter", "meters", "metre", "metres", "m"], scale: 1.0 },
    LinearUnit { aliases: &["kilometer", "kilometers", "km"], scale: 1000.0 },
    LinearUnit { aliases: &["centimeter", "centimeters", "cm"], scale: 0.01 },
    LinearUnit { aliases: &["millimeter", "millimeters", "mm"], scale: 0.001 },
    LinearUnit { aliases: &["inch", "inches", "in"], scale: 0.0254 },
    LinearUnit { aliases: &["foot", "feet", "ft"], scale: 0.3048 },
    LinearUnit { aliases: &["yard", "yards", "yd"], scale: 0.9144 },
    LinearUnit { aliases: &["mile", "miles", "mi"], scale: 1609.34 },
];

const WEIGHT_UNITS: &[LinearUnit] = &[
    LinearUnit { aliases: &["gram", "grams", "g"], scale: 1.0 },
    LinearUnit { aliases: &["kilogram", "kilograms", "kg"], scale: 1000.0 },
    LinearUnit { aliases: &["milligram", "milligrams", "mg"], scale: 0.001 },
    LinearUnit { aliases: &["pound", "pounds", "lb", "lbs"], scale: 453.592 },
    LinearUnit { aliases: &["ounce", "ounces", "oz"], scale: 28.3495 },
];

/// A temperature unit: aliases plus conversion to and from kelvin.
struct TemperatureUnit {
    aliases: &'static [&'static str],
    to_kelvin: fn(f64) -> f64,
    from_kelvin: fn(f64) -> f64,
}

const TEMPERATURE_UNITS: &[TemperatureUnit] = &[
    TemperatureUnit {
        aliases: &["celsius", "centigrade", "c"],
        to_kelvin: |c| c + 273.15,
        from_kelvin: |k| k - 273.15,
    },
    TemperatureUnit {
        aliases: &["fahrenheit", "f"],
        to_kelvin: |f| (f - 32.0) * 5.0 / 9.0 + 273.15,
        from_kelvin: |k| (k - 273.15) * 9.0 / 5.0 + 32.0,
    },
    TemperatureUnit {
        aliases: &["kelvin", "kelvins", "k"],
        to_kelvin: |k| k,
        from_kelvin: |k| k,
    },
];

fn known_alias(name: &str) -> bool {
    LENGTH_UNITS
        .iter()
        .chain(WEIGHT_UNITS.iter())
        .any(|u| u.aliases.contains(&name))
        || TEMPERATURE_UNITS.iter().any(|u| u.aliases.contains(&name))
}

/// Normalize a spoken unit name: case-fold, trim, and fall back to the
/// singular form (trailing `s` removed) only when the raw name is unknown
/// across every category.
pub fn normalize_unit(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    if !known_alias(&lower) {
        if let Some(singular) = lower.strip_suffix('s') {
            return singular.to_string();
        }
    }
    lower
}

fn linear_scale(units: &[LinearUnit], name: &str) -> Option<f64> {
    units
        .iter()
        .find(|u| u.aliases.contains(&name))
        .map(|u| u.scale)
}

fn temperature_unit(name: &str) -> Option<&'static TemperatureUnit> {
    TEMPERATURE_UNITS.iter().find(|u| u.aliases.contains(&name))
}

/// Find the first category (fixed order: Length, Weight, Temperature)
/// whose alias set contains both normalized names.
pub fn resolve_category(from: &str, to: &str) -> Option<Category> {
    if linear_scale(LENGTH_UNITS, from).is_some() && linear_scale(LENGTH_UNITS, to).is_some() {
        return Some(Category::Length);
    }
    if linear_scale(WEIGHT_UNITS, from).is_some() && linear_scale(WEIGHT_UNITS, to).is_some() {
        return Some(Category::Weight);
    }
    if temperature_unit(from).is_some() && temperature_unit(to).is_some() {
        return Some(Category::Temperature);
    }
    None
}

/// Convert `value` from one unit to another. Full f64 precision internally;
/// use [`round2`] only at the presentation edge.
pub fn convert(value: f64, from_unit: &str, to_unit: &str) -> Result<f64, ConvertError> {
    let from = normalize_unit(from_unit);
    let to = normalize_unit(to_unit);

    let category =
        resolve_category(&from, &to).ok_or_else(|| ConvertError::UnsupportedConversion {
            from: from_unit.to_string(),
            to: to_unit.to_string(),
        })?;

    let result = match category {
        Category::Length => {
            // Resolved above, lookups cannot miss.
            let from_scale = linear_scale(LENGTH_UNITS, &from).unwrap_or(1.0);
            let to_scale = linear_scale(LENGTH_UNITS, &to).unwrap_or(1.0);
            value * from_scale / to_scale
        }
        Category::Weight => {
            let from_scale = linear_scale(WEIGHT_UNITS, &from).unwrap_or(1.0);
            let to_scale = linear_scale(WEIGHT_UNITS, &to).unwrap_or(1.0);
            value * from_scale / to_scale
        }
        Category::Temperature => {
            let kelvin = match temperature_unit(&from) {
                Some(unit) => (unit.to_kelvin)(value),
                None => value,
            };
            match temperature_unit(&to) {
                Some(unit) => (unit.from_kelvin)(kelvin),
                None => kelvin,
            }
        }
    };

    Ok(result)
}

/// Convert a value still held as text (the router hands units over raw).
pub fn convert_text(value: &str, from_unit: &str, to_unit: &str) -> Result<f64, ConvertError> {
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| ConvertError::Parse(value.to_string()))?;
    convert(value, from_unit, to_unit)
}

/// Round to 2 decimal places for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
