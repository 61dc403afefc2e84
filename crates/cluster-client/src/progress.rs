use thiserror::Error;
use tracing::debug;

use crate::layout::ClusterLayout;
use crate::store::RemoteStore;

/// Marker of a progress line in a run's output log.
pub const PROGRESS_MARKER: &str = "MAIN:  Time:";

/// Position of the `<completed>/<total>` token on a marker line,
/// whitespace-delimited, 0-based.
const FRACTION_TOKEN_INDEX: usize = 3;

/// Why no progress reading is available. Diagnosed internally and logged;
/// the public reading stays `0.0` in every case so a monitoring loop never
/// crashes on partially written output.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NoProgress {
    #[error("run output not readable: {0}")]
    OutputUnavailable(String),
    #[error("no line contains the progress marker")]
    MarkerNotFound,
    #[error("marker line has no fraction token")]
    TokenMissing,
    #[error("fraction token is malformed: {0:?}")]
    MalformedFraction(String),
    #[error("total step count is zero")]
    ZeroTotal,
}

/// Reads `completed/total` step fractions from partially-written run logs.
pub struct ProgressReader<S: RemoteStore> {
    store: S,
    layout: ClusterLayout,
}

impl<S: RemoteStore> ProgressReader<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            layout: ClusterLayout::new(),
        }
    }

    /// Completion fraction of a run, `0.0` when nothing parseable exists yet.
    pub fn completion(&self, index: u32) -> f64 {
        match self.try_completion(index) {
            Ok(fraction) => fraction,
            Err(cause) => {
                debug!(index, %cause, "no progress available");
                0.0
            }
        }
    }

    /// Like [`completion`](Self::completion) but exposing the cause when no
    /// reading is available.
    pub fn try_completion(&self, index: u32) -> Result<f64, NoProgress> {
        let output = self
            .store
            .read_to_string(&self.layout.run_output(index))
            .map_err(|error| NoProgress::OutputUnavailable(error.to_string()))?;
        parse_completion(&output)
    }
}

/// Scan log text for the last marker line and parse its fraction token.
pub fn parse_completion(output: &str) -> Result<f64, NoProgress> {
    let line = output
        .lines()
        .filter(|line| line.contains(PROGRESS_MARKER))
        .next_back()
        .ok_or(NoProgress::MarkerNotFound)?;

    let token = line
        .split_whitespace()
        .nth(FRACTION_TOKEN_INDEX)
        .ok_or(NoProgress::TokenMissing)?;

    let (completed, total) = token
        .split_once('/')
        .ok_or_else(|| NoProgress::MalformedFraction(token.to_string()))?;
    let completed: f64 = completed
        .parse()
        .map_err(|_| NoProgress::MalformedFraction(token.to_string()))?;
    let total: f64 = total
        .parse()
        .map_err(|_| NoProgress::MalformedFraction(token.to_string()))?;

    if total == 0.0 {
        return Err(NoProgress::ZeroTotal);
    }
    Ok(completed / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use tempfile::tempdir;

    #[test]
    fn parses_the_fraction_from_a_marker_line() {
        let log = "starting up\nMAIN:  Time: t 5/20\n";
        assert_eq!(parse_completion(log), Ok(0.25));
    }

    #[test]
    fn uses_the_last_marker_line() {
        let log = "MAIN:  Time: t 5/20\nsolver output\nMAIN:  Time: t 10/20\n";
        assert_eq!(parse_completion(log), Ok(0.5));
    }

    #[test]
    fn empty_log_yields_marker_not_found() {
        assert_eq!(parse_completion(""), Err(NoProgress::MarkerNotFound));
    }

    #[test]
    fn unparsable_fraction_is_diagnosed() {
        assert_eq!(
            parse_completion("MAIN:  Time: t garbage\n"),
            Err(NoProgress::MalformedFraction("garbage".to_string()))
        );
        assert_eq!(
            parse_completion("MAIN:  Time: t\n"),
            Err(NoProgress::TokenMissing)
        );
        assert_eq!(
            parse_completion("MAIN:  Time: t 5/0\n"),
            Err(NoProgress::ZeroTotal)
        );
    }

    #[test]
    fn reader_returns_zero_sentinel_on_any_failure() {
        let dir = tempdir().unwrap();
        let reader = ProgressReader::new(LocalStore::new(dir.path()));

        // Run directory does not exist yet.
        assert_eq!(reader.completion(3), 0.0);
        assert!(matches!(
            reader.try_completion(3),
            Err(NoProgress::OutputUnavailable(_))
        ));

        std::fs::create_dir_all(dir.path().join("outbox/run3")).unwrap();
        std::fs::write(
            dir.path().join("outbox/run3/output"),
            "MAIN:  Time: t 5/20\n",
        )
        .unwrap();
        assert_eq!(reader.completion(3), 0.25);
    }
}
