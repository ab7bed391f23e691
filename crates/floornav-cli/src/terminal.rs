//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions plus the color detection used when
//! rendering routes.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    // Tag colors (bold reverse video for high visibility badges)
    /// Bold reverse green for STRT tags.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for DOOR tags.
    pub const TAG_DOOR: &str = "\x1b[1;7;36m";
    /// Bold reverse yellow for HALL tags.
    pub const TAG_HALL: &str = "\x1b[1;7;33m";
    /// Bold reverse magenta for GOAL tags.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";

    /// Bright bold white for room names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for identifiers and secondary details.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for distances.
    pub const GREEN: &str = "\x1b[32m";
}

/// A collection of resolved color codes, either actual ANSI sequences
/// or empty strings when color is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_door: &'static str,
    pub tag_hall: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_door: colors::TAG_DOOR,
            tag_hall: colors::TAG_HALL,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_door: "",
            tag_hall: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            green: "",
        }
    }

    /// Create a palette based on terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// This function respects:
/// - The `NO_COLOR` environment variable (https://no-color.org/)
/// - The `TERM=dumb` convention for non-capable terminals
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}
