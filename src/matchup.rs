use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One (opponent, map) pair to resolve against the primary bot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matchup {
    pub opponent: String,
    pub map: String,
}

impl Matchup {
    pub fn new(opponent: &str, map: &str) -> Self {
        Matchup {
            opponent: opponent.to_string(),
            map: map.to_string(),
        }
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.opponent, self.map)
    }
}

/// Deduplicated cross product of opponents and maps, in roster order.
pub fn build_schedule(opponents: &[String], maps: &[String]) -> Vec<Matchup> {
    let mut seen = HashSet::new();
    let mut schedule = Vec::new();

    for opponent in opponents {
        for map in maps {
            let matchup = Matchup::new(opponent, map);
            if seen.insert(matchup.clone()) {
                schedule.push(matchup);
            }
        }
    }

    schedule
}

/// Check a schedule against the configured roster.
///
/// Returns one human-readable line per pair naming an unknown bot or map; the
/// lines end up in the summary's error appendix.
pub fn validate_schedule(
    schedule: &[Matchup],
    opponents: &[String],
    maps: &[String],
) -> Vec<String> {
    let known_bots: HashSet<&str> = opponents.iter().map(String::as_str).collect();
    let known_maps: HashSet<&str> = maps.iter().map(String::as_str).collect();

    schedule
        .iter()
        .filter(|m| {
            !known_bots.contains(m.opponent.as_str()) || !known_maps.contains(m.map.as_str())
        })
        .map(|m| format!("Unable to parse bot={}, map={}", m.opponent, m.map))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_schedule_is_full_cross_product() {
        let opponents = names(&["sprint1", "v6"]);
        let maps = names(&["DefaultSmall", "DefaultLarge"]);

        let schedule = build_schedule(&opponents, &maps);

        assert_eq!(schedule.len(), 4);
        assert!(schedule.contains(&Matchup::new("v6", "DefaultSmall")));
        assert!(schedule.contains(&Matchup::new("sprint1", "DefaultLarge")));
    }

    #[test]
    fn test_schedule_preserves_roster_order() {
        let opponents = names(&["sprint1"]);
        let maps = names(&["DefaultHuge", "DefaultSmall"]);

        let schedule = build_schedule(&opponents, &maps);

        assert_eq!(schedule[0], Matchup::new("sprint1", "DefaultHuge"));
        assert_eq!(schedule[1], Matchup::new("sprint1", "DefaultSmall"));
    }

    #[test]
    fn test_duplicate_roster_entries_collapse() {
        let opponents = names(&["sprint1", "sprint1"]);
        let maps = names(&["DefaultSmall", "DefaultSmall", "DefaultLarge"]);

        let schedule = build_schedule(&opponents, &maps);

        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn test_validation_passes_for_generated_schedule() {
        let opponents = names(&["sprint1"]);
        let maps = names(&["DefaultSmall"]);
        let schedule = build_schedule(&opponents, &maps);

        assert!(validate_schedule(&schedule, &opponents, &maps).is_empty());
    }

    #[test]
    fn test_validation_flags_foreign_pairs() {
        let opponents = names(&["sprint1"]);
        let maps = names(&["DefaultSmall"]);
        let schedule = vec![
            Matchup::new("sprint1", "DefaultSmall"),
            Matchup::new("ghostbot", "DefaultSmall"),
            Matchup::new("sprint1", "NoSuchMap"),
        ];

        let errors = validate_schedule(&schedule, &opponents, &maps);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "Unable to parse bot=ghostbot, map=DefaultSmall");
        assert_eq!(errors[1], "Unable to parse bot=sprint1, map=NoSuchMap");
    }
}
