use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Anything that can resolve one game between two teams on a map.
///
/// The production implementation shells out to the simulator's gradle wrapper;
/// tests substitute scripted logs.
#[async_trait]
pub trait MatchEngine: Send + Sync {
    /// Run a single game and return the simulator's captured stdout.
    async fn run_game(
        &self,
        team_a: &str,
        team_b: &str,
        map: &str,
    ) -> Result<String, EngineError>;
}

/// Runs games through the simulator's gradle wrapper
pub struct GradleEngine {
    dir: PathBuf,
}

impl GradleEngine {
    /// `dir` is the simulator checkout containing the wrapper script.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        GradleEngine {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn wrapper(&self) -> PathBuf {
        if cfg!(windows) {
            self.dir.join("gradlew.bat")
        } else {
            self.dir.join("gradlew")
        }
    }
}

#[async_trait]
impl MatchEngine for GradleEngine {
    async fn run_game(
        &self,
        team_a: &str,
        team_b: &str,
        map: &str,
    ) -> Result<String, EngineError> {
        let wrapper = self.wrapper();

        let output = Command::new(&wrapper)
            .arg("run")
            .arg(format!("-PteamA={}", team_a))
            .arg(format!("-PteamB={}", team_b))
            .arg(format!("-Pmaps={}", map))
            .current_dir(&self.dir)
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                command: wrapper.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                command: wrapper.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
