//! Input scripts that stand in for a keyboard.

use anyhow::{bail, Result};
use ls20_core::Direction;

/// Signal delivered to the session during a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// A direction key went down this frame.
    Press(Direction),
    /// No key went down this frame.
    Idle,
    /// The escape key went down this frame.
    Escape,
}

/// Parses a script such as `"RRR ^^ . q"` into one input per frame.
///
/// Tokens are case-insensitive and whitespace is ignored.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Input>> {
    script
        .chars()
        .enumerate()
        .filter(|(_, token)| !token.is_whitespace())
        .map(|(position, token)| {
            let input = match token.to_ascii_lowercase() {
                'u' | '^' => Input::Press(Direction::North),
                'd' | 'v' => Input::Press(Direction::South),
                'l' | '<' => Input::Press(Direction::West),
                'r' | '>' => Input::Press(Direction::East),
                '.' => Input::Idle,
                'q' => Input::Escape,
                other => bail!("unknown input token {other:?} at position {position}"),
            };
            Ok(input)
        })
        .collect()
}
