pub const REVEAL_SELECTORS: [&str; 7] = [
    ".service__card",
    ".project__card",
    ".client__card",
    ".feature",
    ".stat",
    ".hero__content",
    ".hero__logo-container",
];

pub const REVEALED_CLASS: &str = "animate-in";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const STAGGER_STEP_SECONDS: f64 = 0.02;

pub const PLACEHOLDER_SELECTOR: &str = ".project__image-placeholder";
pub const PLACEHOLDER_BACKGROUND: &str = "linear-gradient(135deg, #64748b, #94a3b8)";
pub const PLACEHOLDER_TRANSITION: &str = "background 0.5s ease";

pub const STYLE_ELEMENT_ID: &str = "reveal-animation-styles";
pub const ANIMATION_STYLES: &str = "
    .animate-in {
        opacity: 1 !important;
        transform: translateY(0) !important;
    }

    .scroll-header {
        background-color: rgba(255, 255, 255, 0.98) !important;
        box-shadow: 0 2px 12px rgba(15, 23, 42, 0.08) !important;
    }
";

pub fn reveal_selector_list() -> String {
    REVEAL_SELECTORS.join(", ")
}

pub fn stagger_delay_seconds(index: usize) -> f64 {
    index as f64 * STAGGER_STEP_SECONDS
}

/// Inline style for an element that has not been revealed yet.
pub fn hidden_style(index: usize) -> Vec<(&'static str, String)> {
    vec![
        ("opacity", "0".to_string()),
        ("transform", "translateY(30px)".to_string()),
        ("transition", "opacity 0.45s ease-in, transform 0.45s ease-in".to_string()),
        ("transition-delay", format!("{:.2}s", stagger_delay_seconds(index))),
    ]
}
