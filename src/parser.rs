//! Parsing of the bot's stdout into per-turn scores.
//!
//! The bot prints a banner, then one block of [`TURN_LINES`] data lines per
//! turn (four board rows followed by a `<label>: <value>` score line), with
//! `Can...` continuation prompts and a final `Gam...` game-over line mixed in.
//! Lines end in `\r\n`.

use core::fmt;

/// The prompt the bot prints before its first turn: 46 characters and a CRLF.
pub const DEFAULT_BANNER_BYTES: usize = 48;
pub const TURN_LINES: usize = 5;
/// Trailing chunks shorter than this are end-of-output padding, not turns.
pub const MIN_TURN_LINES: usize = 2;
const SCORE_LINE: usize = TURN_LINES - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Continuation,
    GameOver,
}

impl Marker {
    pub const ALL: [Marker; 2] = [Marker::Continuation, Marker::GameOver];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Continuation => "Can",
            Self::GameOver => "Gam",
        }
    }

    pub fn classify(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|marker| line.starts_with(marker.keyword()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    MissingScoreLine {
        bot_id: String,
        turn: usize,
        lines: usize,
    },
    MissingColon {
        bot_id: String,
        turn: usize,
        line: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScoreLine { bot_id, turn, lines } => write!(
                f,
                "{bot_id} turn {turn}: block has {lines} lines, score line {} missing",
                SCORE_LINE + 1
            ),
            Self::MissingColon { bot_id, turn, line } => {
                write!(f, "{bot_id} turn {turn}: score line has no ':' ({line:?})")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub index: usize,
    pub score: String,
}

/// Drops the banner and splits the rest into lines on `\r`, removing the
/// `\n` that follows each carriage return.
pub fn clean_output(raw: &str, banner_bytes: usize) -> Vec<&str> {
    let mut start = banner_bytes.min(raw.len());
    while !raw.is_char_boundary(start) {
        start += 1;
    }
    raw[start..]
        .split('\r')
        .map(|line| line.strip_prefix('\n').unwrap_or(line))
        .collect()
}

pub fn filter_markers<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter(|line| Marker::classify(line).is_none())
        .collect()
}

pub fn group_turns<'a>(lines: &'a [&'a str]) -> impl Iterator<Item = &'a [&'a str]> {
    lines
        .chunks(TURN_LINES)
        .filter(|chunk| chunk.len() >= MIN_TURN_LINES)
}

/// Returns the text between the first and second `:` minus its first
/// character (the space after the label).
pub fn extract_score(line: &str) -> Option<&str> {
    let value = line.split(':').nth(1)?;
    let mut chars = value.chars();
    chars.next();
    Some(chars.as_str())
}

/// Parses already-cleaned lines. Every accepted block must carry a score
/// line; a short block (2-4 lines) is accepted as a turn but then fails here.
pub fn parse_lines(bot_id: &str, lines: &[&str]) -> Result<Vec<Turn>, ParseError> {
    let data = filter_markers(lines.iter().copied());
    let mut turns = Vec::new();
    for (index, block) in group_turns(&data).enumerate() {
        let line = block
            .get(SCORE_LINE)
            .ok_or_else(|| ParseError::MissingScoreLine {
                bot_id: bot_id.to_string(),
                turn: index,
                lines: block.len(),
            })?;
        let score = extract_score(line).ok_or_else(|| ParseError::MissingColon {
            bot_id: bot_id.to_string(),
            turn: index,
            line: line.to_string(),
        })?;
        turns.push(Turn {
            index,
            score: score.to_string(),
        });
    }
    Ok(turns)
}

pub fn parse_output(bot_id: &str, raw: &str, banner_bytes: usize) -> Result<Vec<Turn>, ParseError> {
    parse_lines(bot_id, &clean_output(raw, banner_bytes))
}
