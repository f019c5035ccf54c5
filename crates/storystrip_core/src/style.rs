//! Suggested art-style modifiers.

/// Style modifiers offered to users. Any non-empty modifier is accepted.
pub const STYLE_MODIFIERS: &[&str] = &[
    "editorial",
    "manga",
    "cyberpunk",
    "noir",
    "saturday morning",
    "flat vector",
    "golden age",
    "pixel art",
    "pastel sketch",
];

/// Modifier used when the caller supplies none.
pub const DEFAULT_STYLE: &str = "editorial";
