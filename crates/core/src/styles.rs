//! Static catalog of color-grading styles.
//!
//! The catalog is a fixed enumerated list loaded once; the browser client
//! renders it as-is and submits a style by `id`.

/// A selectable color-grading style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StyleOption {
    /// Stable identifier submitted by the client.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Descriptive prompt fragment handed to the generative API.
    pub prompt: &'static str,
}

/// All available grading styles, in display order.
pub const STYLE_CATALOG: &[StyleOption] = &[
    StyleOption {
        id: "hollywood",
        name: "Hollywood (Teal & Orange)",
        prompt: "Hollywood blockbuster Teal and Orange cinematic color grading, high contrast",
    },
    StyleOption {
        id: "cyberpunk",
        name: "Cyberpunk",
        prompt: "Neon cyberpunk aesthetic with deep purples, vibrant cyans and high glow",
    },
    StyleOption {
        id: "vintage",
        name: "Vintage",
        prompt: "70s vintage film stock with warm grain, faded colors and retro atmosphere",
    },
    StyleOption {
        id: "noir",
        name: "Noir",
        prompt: "High contrast dramatic black and white cinematic noir style with deep shadows",
    },
    StyleOption {
        id: "dreamy",
        name: "Dreamy",
        prompt: "Dreamy pastel colors with soft glow, ethereal lighting and magical atmosphere",
    },
];

/// Style used when the client does not pick one.
pub const DEFAULT_STYLE_PROMPT: &str = "Cinematic Hollywood teal and orange";

/// Look up a style by its stable id.
pub fn find_style(id: &str) -> Option<&'static StyleOption> {
    STYLE_CATALOG.iter().find(|s| s.id == id)
}
