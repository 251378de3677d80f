//! Status glyphs for log lines.
//!
//! Log output goes to stderr, so colour support is checked on stderr.

use std::fmt::Display;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

pub(crate) fn ok_mark() -> String {
    "\u{2714}".if_supports_color(Stderr, |t| t.green()).to_string()
}

pub(crate) fn fail_mark() -> String {
    "\u{2718}".if_supports_color(Stderr, |t| t.red()).to_string()
}

/// Bold text for a log line.
pub(crate) fn emphasis<T: Display>(text: T) -> String {
    text.if_supports_color(Stderr, |t| t.bold()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_are_plain_without_color() {
        owo_colors::set_override(false);
        assert_eq!(ok_mark(), "\u{2714}");
        assert_eq!(fail_mark(), "\u{2718}");
        assert_eq!(emphasis("Game.zip"), "Game.zip");
        owo_colors::unset_override();
    }
}
