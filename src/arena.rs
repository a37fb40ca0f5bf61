use crate::engine::MatchEngine;
use crate::matchup::{Matchup, build_schedule, validate_schedule};
use crate::outcome::{MatchRecord, Side, classify, parse_game};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// How the schedule is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One matchup at a time, in roster order
    Serial,
    /// Independent tasks bounded by `jobs`, collected as they complete
    Concurrent { jobs: usize },
}

/// Concurrency bound when none is given: one match per cpu
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Aggregated results of a full arena run
#[derive(Debug)]
pub struct ArenaResults {
    /// Resolved records keyed by matchup; a scheduled pair missing here was
    /// never resolved and renders as N/A
    pub records: HashMap<Matchup, MatchRecord>,
    /// Directional games the primary bot took across all matchups
    pub wins: u32,
    /// Matchups scheduled, two directional games each
    pub scheduled: usize,
    /// Roster validation problems, carried into the report appendix
    pub roster_errors: Vec<String>,
}

impl ArenaResults {
    pub fn total_games(&self) -> u32 {
        self.scheduled as u32 * 2
    }

    pub fn losses(&self) -> u32 {
        self.total_games() - self.wins
    }

    /// Win percentage over all scheduled games; 0 when nothing was scheduled
    pub fn win_ratio(&self) -> f64 {
        if self.total_games() == 0 {
            0.0
        } else {
            100.0 * f64::from(self.wins) / f64::from(self.total_games())
        }
    }
}

/// Dispatches the gauntlet schedule and folds outcomes into totals
pub struct Arena<E> {
    engine: Arc<E>,
    current_bot: String,
    verbose: bool,
}

impl<E: MatchEngine + 'static> Arena<E> {
    pub fn new(engine: E, current_bot: &str, verbose: bool) -> Self {
        Arena {
            engine: Arc::new(engine),
            current_bot: current_bot.to_string(),
            verbose,
        }
    }

    /// Build the schedule for the given roster, dispatch it, and fold the
    /// outcomes into totals.
    pub async fn run_gauntlet(
        &self,
        opponents: &[String],
        maps: &[String],
        mode: RunMode,
    ) -> ArenaResults {
        let schedule = build_schedule(opponents, maps);
        let roster_errors = validate_schedule(&schedule, opponents, maps);

        let records = match mode {
            RunMode::Serial => {
                if self.verbose {
                    println!("Running {} matches", schedule.len());
                }
                self.run_serial(&schedule).await
            }
            RunMode::Concurrent { jobs } => {
                if self.verbose {
                    println!("Running {} matches on {} cpus", schedule.len(), jobs);
                }
                self.run_concurrent(&schedule, jobs).await
            }
        };

        let wins = records.values().map(MatchRecord::wins).sum();

        ArenaResults {
            records,
            wins,
            scheduled: schedule.len(),
            roster_errors,
        }
    }

    /// Resolve one matchup: the primary bot as team A, then as team B, on the
    /// same map.
    pub async fn run_match(&self, matchup: &Matchup) -> MatchRecord {
        resolve_match(self.engine.as_ref(), &self.current_bot, matchup).await
    }

    async fn run_serial(&self, schedule: &[Matchup]) -> HashMap<Matchup, MatchRecord> {
        let mut records = HashMap::new();

        for matchup in schedule {
            if self.verbose {
                println!(
                    "Running {} vs {} on {}",
                    self.current_bot, matchup.opponent, matchup.map
                );
            }
            let record = self.run_match(matchup).await;
            records.insert(matchup.clone(), record);
        }

        records
    }

    async fn run_concurrent(
        &self,
        schedule: &[Matchup],
        jobs: usize,
    ) -> HashMap<Matchup, MatchRecord> {
        let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
        let mut set = JoinSet::new();

        for matchup in schedule.iter().cloned() {
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);
            let current_bot = self.current_bot.clone();
            let verbose = self.verbose;

            set.spawn(async move {
                // Never closed, so acquisition cannot fail
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                if verbose {
                    println!(
                        "Running {} vs {} on {}",
                        current_bot, matchup.opponent, matchup.map
                    );
                }
                let record = resolve_match(engine.as_ref(), &current_bot, &matchup).await;
                (matchup, record)
            });
        }

        let mut records = HashMap::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((matchup, record)) => {
                    if self.verbose {
                        println!("Finished {} of {}", records.len() + 1, schedule.len());
                    }
                    records.insert(matchup, record);
                }
                Err(e) => {
                    // The matchup stays unresolved and renders as N/A
                    eprintln!("Match task failed: {}", e);
                }
            }
        }

        records
    }
}

async fn resolve_match<E: MatchEngine>(
    engine: &E,
    current_bot: &str,
    matchup: &Matchup,
) -> MatchRecord {
    let first = engine
        .run_game(current_bot, &matchup.opponent, &matchup.map)
        .await;
    let second = engine
        .run_game(&matchup.opponent, current_bot, &matchup.map)
        .await;

    let (log_a, log_b) = match (first, second) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Status: FAIL {}", e);
            return MatchRecord::error();
        }
    };

    let run_a = parse_game(&log_a, current_bot, &matchup.opponent, Side::A);
    let run_b = parse_game(&log_b, current_bot, &matchup.opponent, Side::B);
    classify(&run_a, &run_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use crate::outcome::Outcome;
    use async_trait::async_trait;
    use std::io;

    /// Engine that replays canned logs keyed by (team_a, team_b, map)
    struct ScriptedEngine {
        logs: HashMap<(String, String, String), String>,
    }

    impl ScriptedEngine {
        fn new() -> Self {
            ScriptedEngine {
                logs: HashMap::new(),
            }
        }

        /// Script the winner announcement for one directional game
        fn script(&mut self, team_a: &str, team_b: &str, map: &str, winner: &str, seat: &str) {
            let log = format!("{} ({}) wins (round 100)\n", winner, seat);
            self.logs.insert(
                (team_a.to_string(), team_b.to_string(), map.to_string()),
                log,
            );
        }
    }

    #[async_trait]
    impl MatchEngine for ScriptedEngine {
        async fn run_game(
            &self,
            team_a: &str,
            team_b: &str,
            map: &str,
        ) -> Result<String, EngineError> {
            let key = (team_a.to_string(), team_b.to_string(), map.to_string());
            match self.logs.get(&key) {
                Some(log) => Ok(log.clone()),
                None => Err(EngineError::Spawn {
                    command: "scripted".to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no script for game"),
                }),
            }
        }
    }

    /// Engine whose every run fails
    struct BrokenEngine;

    #[async_trait]
    impl MatchEngine for BrokenEngine {
        async fn run_game(&self, _: &str, _: &str, _: &str) -> Result<String, EngineError> {
            Err(EngineError::Spawn {
                command: "broken".to_string(),
                source: io::Error::new(io::ErrorKind::Other, "simulator missing"),
            })
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Script a full matchup: whether the primary bot wins with each seat
    fn script_matchup(
        engine: &mut ScriptedEngine,
        opponent: &str,
        map: &str,
        win_as_a: bool,
        win_as_b: bool,
    ) {
        if win_as_a {
            engine.script("mainbot", opponent, map, "mainbot", "A");
        } else {
            engine.script("mainbot", opponent, map, opponent, "B");
        }
        if win_as_b {
            engine.script(opponent, "mainbot", map, "mainbot", "B");
        } else {
            engine.script(opponent, "mainbot", map, opponent, "A");
        }
    }

    #[tokio::test]
    async fn test_serial_gauntlet_classifies_every_pair() {
        let mut engine = ScriptedEngine::new();
        script_matchup(&mut engine, "sprint1", "Maze", true, true);
        script_matchup(&mut engine, "sprint1", "Snake", true, false);
        script_matchup(&mut engine, "sprint1", "Duck", false, false);

        let arena = Arena::new(engine, "mainbot", false);
        let results = arena
            .run_gauntlet(
                &names(&["sprint1"]),
                &names(&["Maze", "Snake", "Duck"]),
                RunMode::Serial,
            )
            .await;

        assert_eq!(results.scheduled, 3);
        assert_eq!(
            results.records[&Matchup::new("sprint1", "Maze")].outcome,
            Outcome::Won
        );
        assert_eq!(
            results.records[&Matchup::new("sprint1", "Snake")].outcome,
            Outcome::Tied
        );
        assert_eq!(
            results.records[&Matchup::new("sprint1", "Duck")].outcome,
            Outcome::Lost
        );
        // 2 wins on Maze, 1 on Snake, 0 on Duck
        assert_eq!(results.wins, 3);
        assert_eq!(results.total_games(), 6);
        assert_eq!(results.losses(), 3);
        assert_eq!(results.win_ratio(), 50.0);
    }

    #[tokio::test]
    async fn test_concurrent_gauntlet_matches_serial() {
        let mut engine = ScriptedEngine::new();
        for map in ["Maze", "Snake", "Duck", "Rivers", "Canals"] {
            script_matchup(&mut engine, "v6", map, true, true);
        }

        let arena = Arena::new(engine, "mainbot", false);
        let results = arena
            .run_gauntlet(
                &names(&["v6"]),
                &names(&["Maze", "Snake", "Duck", "Rivers", "Canals"]),
                RunMode::Concurrent { jobs: 3 },
            )
            .await;

        assert_eq!(results.records.len(), 5);
        assert_eq!(results.wins, 10);
        assert!(results.records.values().all(|r| r.outcome == Outcome::Won));
    }

    #[tokio::test]
    async fn test_engine_failure_marks_match_as_error() {
        let arena = Arena::new(BrokenEngine, "mainbot", false);
        let results = arena
            .run_gauntlet(&names(&["sprint1"]), &names(&["Maze"]), RunMode::Serial)
            .await;

        assert_eq!(
            results.records[&Matchup::new("sprint1", "Maze")].outcome,
            Outcome::Error
        );
        // Error matches contribute nothing, but their games still count as played
        assert_eq!(results.wins, 0);
        assert_eq!(results.losses(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_stop_the_gauntlet() {
        let mut engine = ScriptedEngine::new();
        // Only Maze is scripted; Snake's runs fall through to a spawn error
        script_matchup(&mut engine, "sprint1", "Maze", true, true);

        let arena = Arena::new(engine, "mainbot", false);
        let results = arena
            .run_gauntlet(
                &names(&["sprint1"]),
                &names(&["Maze", "Snake"]),
                RunMode::Serial,
            )
            .await;

        assert_eq!(
            results.records[&Matchup::new("sprint1", "Maze")].outcome,
            Outcome::Won
        );
        assert_eq!(
            results.records[&Matchup::new("sprint1", "Snake")].outcome,
            Outcome::Error
        );
        assert_eq!(results.wins, 2);
    }

    #[tokio::test]
    async fn test_empty_roster_yields_empty_results() {
        let arena = Arena::new(ScriptedEngine::new(), "mainbot", false);
        let results = arena
            .run_gauntlet(&[], &[], RunMode::Concurrent { jobs: 2 })
            .await;

        assert_eq!(results.scheduled, 0);
        assert_eq!(results.total_games(), 0);
        assert_eq!(results.win_ratio(), 0.0);
        assert!(results.records.is_empty());
    }
}
