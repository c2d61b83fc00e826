//! Parallel batch processing
//!
//! Runs one operation per file on a rayon pool. Each file's pipeline is
//! independent: a failure is caught, logged, and recorded in the report
//! without aborting or corrupting sibling pipelines. Every buffer is either
//! freshly allocated per call or read-only, so no locks are needed.

use crate::error::{Error, Result};
use log::{info, warn};
use rayon::prelude::*;
use std::fmt;

/// Outcome of a batch run: produced outputs plus the per-file failures
#[derive(Debug, Default)]
pub struct BatchReport {
    /// `(name, output bytes)` for each file that completed
    pub outputs: Vec<(String, Vec<u8>)>,
    /// `(name, error)` for each file that failed
    pub failures: Vec<(String, Error)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_ok() {
            write!(f, "{} files processed", self.succeeded())
        } else {
            write!(
                f,
                "{} files processed, {} files failed",
                self.succeeded(),
                self.failed()
            )
        }
    }
}

/// Run `op` over every `(name, input)` pair in parallel.
///
/// Output order matches input order regardless of scheduling.
pub fn process<T, F>(files: Vec<(String, T)>, op: F) -> BatchReport
where
    T: Send,
    F: Fn(&str, T) -> Result<Vec<u8>> + Sync,
{
    let results: Vec<_> = files
        .into_par_iter()
        .map(|(name, input)| match op(&name, input) {
            Ok(bytes) => {
                info!("processed {name}");
                Ok((name, bytes))
            }
            Err(err) => {
                warn!("failed {name}: {err}");
                Err((name, err))
            }
        })
        .collect();

    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(output) => report.outputs.push(output),
            Err(failure) => report.failures.push(failure),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerFormat;

    #[test]
    fn failures_do_not_abort_siblings() {
        let files = vec![
            ("a.jpg".to_string(), vec![0xFF, 0xD8]),
            ("b.bin".to_string(), vec![0x00]),
            ("c.jpg".to_string(), vec![0xFF, 0xD8]),
        ];

        let report = process(files, |_, bytes| {
            match ContainerFormat::detect(&bytes) {
                ContainerFormat::Unknown => Err(Error::UnsupportedFormat),
                _ => Ok(bytes),
            }
        });

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].0, "b.bin");
        assert!(!report.all_ok());
        assert_eq!(report.to_string(), "2 files processed, 1 files failed");
    }

    #[test]
    fn output_order_matches_input_order() {
        let files: Vec<_> = (0..64)
            .map(|i| (format!("f{i:02}"), vec![i as u8]))
            .collect();
        let report = process(files, |_, bytes| Ok(bytes));
        assert!(report.all_ok());
        for (i, (name, bytes)) in report.outputs.iter().enumerate() {
            assert_eq!(name, &format!("f{i:02}"));
            assert_eq!(bytes, &vec![i as u8]);
        }
    }
}
