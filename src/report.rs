use crate::arena::ArenaResults;
use crate::matchup::Matchup;
use crate::outcome::Outcome;
use std::io;
use std::path::Path;

/// Render the full summary: statistics line, outcome table, error appendix.
///
/// Rows follow the configured map order and columns the configured opponent
/// order, regardless of the order matches finished in.
pub fn render(results: &ArenaResults, opponents: &[String], maps: &[String], emoji: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Win ratio: {}/{} ({:.2}%)\n",
        results.wins,
        results.total_games(),
        results.win_ratio()
    ));

    // Header: empty corner cell, then one column per opponent
    let mut header = vec![String::new()];
    header.extend(opponents.iter().cloned());
    out.push_str(&table_row(&header));

    let separator = vec![":---:".to_string(); opponents.len() + 1];
    out.push_str(&table_row(&separator));

    for map in maps {
        let mut row = vec![map.clone()];
        for opponent in opponents {
            let matchup = Matchup::new(opponent, map);
            let cell = match results.records.get(&matchup) {
                Some(record) => record.cell(emoji),
                None => Outcome::NotPlayed.label(emoji).to_string(),
            };
            row.push(cell);
        }
        out.push_str(&table_row(&row));
    }

    out.push('\n');
    for error in &results.roster_errors {
        out.push_str(error);
        out.push('\n');
    }

    out
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |\n", cells.join(" | "))
}

/// Write the rendered summary to the configured file.
pub fn write_summary<P: AsRef<Path>>(path: P, summary: &str) -> io::Result<()> {
    std::fs::write(path, summary)
}
