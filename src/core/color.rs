// src/core/color.rs

use colored::Color;

/// Parses a color name from the configuration (e.g., "red", "bright blue")
/// into a terminal color.
pub fn parse_color_name(name: &str) -> Option<Color> {
    let normalized = name.trim().to_lowercase().replace(['_', '-'], " ");
    match normalized.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "bright black" => Some(Color::BrightBlack),
        "bright red" => Some(Color::BrightRed),
        "bright green" => Some(Color::BrightGreen),
        "bright yellow" => Some(Color::BrightYellow),
        "bright blue" => Some(Color::BrightBlue),
        "bright magenta" => Some(Color::BrightMagenta),
        "bright cyan" => Some(Color::BrightCyan),
        "bright white" => Some(Color::BrightWhite),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(parse_color_name("yellow"), Some(Color::Yellow));
        assert_eq!(parse_color_name(" Red "), Some(Color::Red));
        assert_eq!(parse_color_name("bright_blue"), Some(Color::BrightBlue));
        assert_eq!(parse_color_name("bright-white"), Some(Color::BrightWhite));
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(parse_color_name("chartreuse"), None);
        assert_eq!(parse_color_name(""), None);
    }
}
