//! Input filters applied before validation

/// Trim surrounding whitespace
pub fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Trimmed value, or `None` when nothing is left
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
