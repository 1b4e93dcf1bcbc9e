//! Planner analysis output.

use std::fmt;

/// Human-readable record of planner decisions.
///
/// Lines are only kept when debug recording is enabled; rules check
/// [`AnalysisRecord::record_debug`] before building a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRecord {
    record_debug: bool,
    lines: Vec<String>,
}

impl AnalysisRecord {
    /// Create a record.
    pub fn new(record_debug: bool) -> Self {
        Self {
            record_debug,
            lines: Vec::new(),
        }
    }

    /// Whether debug lines are kept.
    pub fn record_debug(&self) -> bool {
        self.record_debug
    }

    /// Append a line.
    pub fn println(&mut self, line: impl Into<String>) {
        if self.record_debug {
            self.lines.push(line.into());
        }
    }

    /// Recorded lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl fmt::Display for AnalysisRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_record_drops_lines() {
        let mut record = AnalysisRecord::new(false);
        record.println("ignored");
        assert!(record.lines().is_empty());
    }

    #[test]
    fn test_enabled_record_keeps_lines() {
        let mut record = AnalysisRecord::new(true);
        record.println("first");
        record.println("second");

        assert!(record.contains("sec"));
        assert_eq!(record.to_string(), "first\nsecond\n");
    }
}
