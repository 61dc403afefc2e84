//! Naming conventions for the shared cluster filesystem.
//!
//! Relative to a configured cluster root: `contour.dat` is the last-submitted
//! outline, `inbox/run<i>` signals a submission, `outbox/run<i>/output` is the
//! plain-text progress log, and `outbox/signal/run<i>` signals completion.

/// Prefix of run-identifying directory and file names.
pub const RUN_PREFIX: &str = "run";

#[derive(Debug, Clone, Default)]
pub struct ClusterLayout;

impl ClusterLayout {
    pub fn new() -> Self {
        Self
    }

    /// Shared location of the last-submitted outline.
    pub fn contour_file(&self) -> String {
        "contour.dat".to_string()
    }

    /// Submission signal for one run.
    pub fn inbox_signal(&self, index: u32) -> String {
        format!("inbox/{}", run_name(index))
    }

    /// Progress log of one run.
    pub fn run_output(&self, index: u32) -> String {
        format!("outbox/{}/output", run_name(index))
    }

    /// Directory of completion signal files.
    pub fn signal_dir(&self) -> String {
        "outbox/signal".to_string()
    }
}

pub fn run_name(index: u32) -> String {
    format!("{RUN_PREFIX}{index}")
}

/// Recover the run index from an entry name: `"run12"` → `Some(12)`.
/// Anything not of that exact shape is rejected.
pub fn parse_run_index(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(RUN_PREFIX)?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_the_shared_layout() {
        let layout = ClusterLayout::new();
        assert_eq!(layout.contour_file(), "contour.dat");
        assert_eq!(layout.inbox_signal(7), "inbox/run7");
        assert_eq!(layout.run_output(7), "outbox/run7/output");
        assert_eq!(layout.signal_dir(), "outbox/signal");
    }

    #[test]
    fn run_index_round_trips() {
        assert_eq!(parse_run_index(&run_name(12)), Some(12));
        assert_eq!(parse_run_index("run0"), Some(0));
    }

    #[test]
    fn non_conforming_names_are_rejected() {
        assert_eq!(parse_run_index("run"), None);
        assert_eq!(parse_run_index("runX"), None);
        assert_eq!(parse_run_index("12"), None);
        assert_eq!(parse_run_index("signal_file"), None);
        assert_eq!(parse_run_index("run-3"), None);
    }
}
