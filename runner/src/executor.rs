use nix::{
    sys::signal::{killpg, Signal},
    unistd::Pid,
};
use std::{
    fs::{self, File},
    io,
    os::unix::process::CommandExt,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    time::{Duration, Instant},
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use wait_timeout::ChildExt;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to write script {0}")]
    WriteScript(PathBuf, #[source] io::Error),
    #[error("Failed to create results file {0}")]
    CreateResults(PathBuf, #[source] io::Error),
    #[error("Failed to run bash")]
    Spawn(#[source] io::Error),
    #[error("Benchmark script did not finish within {0:?} and was killed")]
    Timeout(Duration),
}

/// Runs a generated script with bash, capturing stdout into a results file
#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    script: PathBuf,
    results: PathBuf,
    timeout: Option<Duration>,
}

impl ScriptExecutor {
    pub fn new(script: &Path, results: &Path, timeout: Option<Duration>) -> Self {
        Self {
            script: script.to_path_buf(),
            results: results.to_path_buf(),
            timeout,
        }
    }

    /// Write `contents` to the script path and run it to completion
    ///
    /// A non-zero exit status is logged but not treated as an error, the
    /// results written so far are still usable.
    #[instrument(skip(self, contents), fields(script = ?self.script), level = "info")]
    pub fn execute(&self, contents: &str) -> Result<ExitStatus, ExecutorError> {
        fs::write(&self.script, contents)
            .map_err(|e| ExecutorError::WriteScript(self.script.clone(), e))?;

        if let Some(parent) = self.results.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ExecutorError::CreateResults(self.results.clone(), e))?;
        }
        let stdout = File::create(&self.results)
            .map_err(|e| ExecutorError::CreateResults(self.results.clone(), e))?;

        let start = Instant::now();
        let mut child = Command::new("bash")
            .arg(&self.script)
            .stdin(Stdio::null())
            .stdout(stdout)
            .process_group(0)
            .spawn()
            .map_err(ExecutorError::Spawn)?;

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout).map_err(ExecutorError::Spawn)? {
                Some(status) => status,
                None => {
                    // child hasn't exited yet
                    kill_group(&mut child);
                    if let Err(e) = child.wait() {
                        warn!("Failed to reap benchmark script: {e}");
                    }
                    return Err(ExecutorError::Timeout(timeout));
                }
            },
            None => child.wait().map_err(ExecutorError::Spawn)?,
        };

        info!(
            "Finished in {:.1} s | status: {}",
            start.elapsed().as_secs_f64(),
            status
        );
        if !status.success() {
            warn!(
                "Benchmark script exited with {status}, results in {} may be incomplete",
                self.results.display()
            );
        }

        Ok(status)
    }
}

/// Kill the script together with every benchmark it started
fn kill_group(child: &mut Child) {
    let group = i32::try_from(child.id()).map(Pid::from_raw);

    match group.map(|pgid| killpg(pgid, Signal::SIGKILL)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to kill process group of benchmark script: {e}"),
        Err(e) => warn!("Process id of benchmark script out of range: {e}"),
    }

    // group already gone, make sure the script itself is
    if let Err(e) = child.kill() {
        debug!("Benchmark script already stopped: {e}");
    }
}
