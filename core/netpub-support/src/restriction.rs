//! Symbolic restriction usage levels.

use netpub_types::AttributeParameter;

/// Numeric restriction usage values and the keyword clients understand.
const USAGE_SYMBOLS: [(&str, &str); 7] = [
    ("-1.0", "PROHIBITED"),
    ("5.0", "AVOID_HIGH"),
    ("2.0", "AVOID_MEDIUM"),
    ("1.3", "AVOID_LOW"),
    ("0.5", "PREFER_MEDIUM"),
    ("0.8", "PREFER_LOW"),
    ("0.2", "PREFER_HIGH"),
];

/// The keyword for a printed usage value, if it has one.
pub fn usage_symbol(value: &str) -> Option<&'static str> {
    USAGE_SYMBOLS
        .iter()
        .find(|(number, _)| *number == value)
        .map(|(_, symbol)| *symbol)
}

/// Maps a printed usage value to its keyword, passing unknown values
/// through unchanged.
pub fn map_usage(value: &str) -> String {
    usage_symbol(value).unwrap_or(value).to_string()
}

/// Maps a numeric usage value, formatted to one decimal place first.
pub fn map_numeric_usage(value: f64) -> String {
    map_usage(&format!("{value:.1}"))
}

/// Returns true if the parameter scales restriction usage, either by its
/// declared usage or by its conventional name.
pub fn is_usage_parameter(parameter: &AttributeParameter) -> bool {
    parameter.is_restriction_usage() || is_usage_parameter_name(&parameter.name)
}

pub fn is_usage_parameter_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("restriction usage")
}
