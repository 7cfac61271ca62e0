use std::io::{self, Write};

/// Prints transfer progress to stderr each time another `step_bytes` have moved.
///
/// Totals are optional: when the size is unknown only the byte count is shown.
pub struct ConsoleProgressReporter {
    label: String,
    total_bytes: Option<u64>,
    step_bytes: u64,
    next_report: u64,
}

impl ConsoleProgressReporter {
    pub fn new(label: impl Into<String>, total_bytes: Option<u64>, step_bytes: u64) -> Self {
        let step_bytes = step_bytes.max(1);
        Self {
            label: label.into(),
            total_bytes,
            step_bytes,
            next_report: step_bytes,
        }
    }

    /// Print progress if a reporting threshold has been crossed.
    pub fn maybe_report(&mut self, processed_bytes: u64) {
        if processed_bytes < self.next_report {
            return;
        }
        while self.next_report <= processed_bytes {
            self.next_report += self.step_bytes;
        }
        self.print(processed_bytes);
    }

    pub fn finish(&mut self, processed_bytes: u64) {
        self.print(processed_bytes);
        eprintln!();
    }

    fn print(&self, processed_bytes: u64) {
        match self.total_bytes {
            Some(total) if total > 0 => {
                let progress = (processed_bytes.min(total) * 100) / total;
                eprint!("\r {}: {}%", self.label, progress);
            }
            _ => eprint!("\r {}: {} bytes", self.label, processed_bytes),
        }
        let _ = io::stderr().flush();
    }
}
