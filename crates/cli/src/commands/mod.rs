//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod catalog;

use keebcraft_core::{Size, SwitchColor};

/// Parse a size argument, case-insensitively; `tkl` is accepted shorthand.
pub fn parse_size(raw: &str) -> Result<Size, String> {
    match raw.to_ascii_lowercase().as_str() {
        "compact" => Ok(Size::Compact),
        "tenkeyless" | "tkl" => Ok(Size::Tenkeyless),
        "full" => Ok(Size::Full),
        _ => Err(format!(
            "unknown size `{raw}` (expected compact, tenkeyless, or full)"
        )),
    }
}

/// Parse a switch-color argument, case-insensitively.
pub fn parse_switch_color(raw: &str) -> Result<SwitchColor, String> {
    match raw.to_ascii_lowercase().as_str() {
        "brown" => Ok(SwitchColor::Brown),
        "red" => Ok(SwitchColor::Red),
        "blue" => Ok(SwitchColor::Blue),
        _ => Err(format!(
            "unknown switch color `{raw}` (expected brown, red, or blue)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("TKL"), Ok(Size::Tenkeyless));
        assert_eq!(parse_size("Full"), Ok(Size::Full));
        assert!(parse_size("huge").is_err());
    }

    #[test]
    fn test_parse_switch_color() {
        assert_eq!(parse_switch_color("red"), Ok(SwitchColor::Red));
        assert!(parse_switch_color("green").is_err());
    }
}
