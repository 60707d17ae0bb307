//! JSON-lines snapshot reader.
//!
//! One `MarketSnapshot` per line. Blank lines are skipped; line numbers in
//! errors are 1-based and count blank lines.

use std::io::{BufRead, Lines};

use pairmm_core::MarketSnapshot;

use crate::error::{AppError, AppResult};

/// Iterator over the snapshots in a JSON-lines stream.
pub struct SnapshotReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> SnapshotReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for SnapshotReader<R> {
    type Item = AppResult<MarketSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(AppError::Io(e))),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let line_no = self.line_no;
            return Some(
                MarketSnapshot::from_json(&line).map_err(|source| AppError::Snapshot {
                    line: line_no,
                    source,
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairmm_core::InstrumentId;

    #[test]
    fn test_reads_lines_and_skips_blanks() {
        let input = "\
{\"timestamp\": 0, \"order_depths\": {\"PEARLS\": {\"buy_orders\": {\"9999\": 5}}}}

{\"timestamp\": 100, \"order_depths\": {}}
";
        let snapshots: Vec<MarketSnapshot> = SnapshotReader::new(input.as_bytes())
            .collect::<AppResult<_>>()
            .unwrap();

        assert_eq!(snapshots.len(), 2);
        assert!(snapshots[0].book(&InstrumentId::from("PEARLS")).is_some());
        assert_eq!(snapshots[1].timestamp, Some(100));
    }

    #[test]
    fn test_reports_line_number() {
        let input = "{\"order_depths\": {}}\n\n{oops\n";
        let mut reader = SnapshotReader::new(input.as_bytes());

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(AppError::Snapshot { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected snapshot error, got {other:?}"),
        }
        assert!(reader.next().is_none());
    }
}
