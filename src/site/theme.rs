pub const THEME_KEY: &str = "theme";
pub const DEFAULT_THEME: &str = "light";
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// The stored name is applied as-is; only a missing or empty value falls back.
pub fn resolve_theme(stored: Option<String>) -> String {
    stored
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_THEME.to_string())
}
