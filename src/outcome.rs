use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker the simulator prints right before the round count, e.g.
/// "mainbot (A) wins (round 512)"
const ROUND_MARKER: &str = "wins (round ";

/// Which seat a bot occupies in a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

/// What a single game log says about the primary bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    PrimaryWon,
    PrimaryLost,
    /// Neither team's winner announcement was found in the log
    Unreadable,
}

/// Parsed result of one directional run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameReport {
    pub verdict: Verdict,
    /// Round the game ended on, when the log carried the marker
    pub rounds: Option<u32>,
}

/// Scan one game log for the winner announcement.
///
/// The simulator prints `<team> (A) wins` or `<team> (B) wins` somewhere in its
/// output; the rest of the log is ignored. `current_side` is the seat the
/// primary bot played in this run.
pub fn parse_game(
    output: &str,
    current_bot: &str,
    opponent: &str,
    current_side: Side,
) -> GameReport {
    let win_marker = format!("{} ({}) wins", current_bot, current_side.label());
    let lose_marker = format!("{} ({}) wins", opponent, current_side.opponent().label());

    let verdict = if output.contains(&win_marker) {
        Verdict::PrimaryWon
    } else if output.contains(&lose_marker) {
        Verdict::PrimaryLost
    } else {
        Verdict::Unreadable
    };

    GameReport {
        verdict,
        rounds: game_length(output),
    }
}

/// Round count from the `wins (round <n>)` marker, if the log has one
fn game_length(output: &str) -> Option<u32> {
    let start = output.find(ROUND_MARKER)? + ROUND_MARKER.len();
    let end = output[start..].find(')')? + start;
    output[start..end].trim().parse().ok()
}

/// How one matchup resolved, from the primary bot's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Primary bot took both directional games
    Won,
    /// Primary bot lost both directional games
    Lost,
    /// One game each
    Tied,
    /// A run failed or its log was unreadable
    Error,
    /// The pair was scheduled but never resolved
    NotPlayed,
}

impl Outcome {
    /// Outcome from the number of directional games the primary bot took
    pub fn from_wins(wins: u32) -> Outcome {
        match wins {
            0 => Outcome::Lost,
            1 => Outcome::Tied,
            _ => Outcome::Won,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Won => "Won",
            Outcome::Lost => "Lost",
            Outcome::Tied => "Tied",
            Outcome::Error => "Error",
            Outcome::NotPlayed => "N/A",
        }
    }

    /// Emoji shorthand used in the summary table
    pub fn emoji(&self) -> &'static str {
        match self {
            Outcome::Won => ":heavy_check_mark:",
            Outcome::Lost => ":x:",
            Outcome::Tied => ":grimacing:",
            Outcome::Error => ":heavy_exclamation_mark:",
            Outcome::NotPlayed => ":heavy_minus_sign:",
        }
    }

    pub fn label(&self, emoji: bool) -> &'static str {
        if emoji { self.emoji() } else { self.as_str() }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved result of one matchup, both directional games folded together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub outcome: Outcome,
    /// Round counts of the (primary-as-A, primary-as-B) games, where known
    pub rounds: (Option<u32>, Option<u32>),
}

impl MatchRecord {
    /// Record for a matchup whose runs failed or could not be read
    pub fn error() -> Self {
        MatchRecord {
            outcome: Outcome::Error,
            rounds: (None, None),
        }
    }

    /// Directional wins this record contributes to the arena total
    pub fn wins(&self) -> u32 {
        match self.outcome {
            Outcome::Won => 2,
            Outcome::Tied => 1,
            _ => 0,
        }
    }

    /// Summary table cell, round counts annotated when games actually finished
    pub fn cell(&self, emoji: bool) -> String {
        let label = self.outcome.label(emoji);
        match self.outcome {
            Outcome::Won | Outcome::Lost | Outcome::Tied => format!(
                "{} ({}, {})",
                label,
                round_label(self.rounds.0),
                round_label(self.rounds.1)
            ),
            Outcome::Error | Outcome::NotPlayed => label.to_string(),
        }
    }
}

fn round_label(rounds: Option<u32>) -> String {
    match rounds {
        Some(n) => n.to_string(),
        None => "?".to_string(),
    }
}

/// Classify a matchup from its two directional game reports.
///
/// An unreadable log on either side poisons the whole matchup; otherwise the
/// win count decides: 0 lost, 1 tied, 2 won.
pub fn classify(primary_as_a: &GameReport, primary_as_b: &GameReport) -> MatchRecord {
    if primary_as_a.verdict == Verdict::Unreadable || primary_as_b.verdict == Verdict::Unreadable {
        return MatchRecord::error();
    }

    let wins = [primary_as_a, primary_as_b]
        .iter()
        .filter(|report| report.verdict == Verdict::PrimaryWon)
        .count() as u32;

    MatchRecord {
        outcome: Outcome::from_wins(wins),
        rounds: (primary_as_a.rounds, primary_as_b.rounds),
    }
}
