//! Time-ordered merging of several row sources.
//!
//! Each source has exactly one pending slot. A merge step picks the slot with
//! the earliest `start_time` and refills it from the same source, so the slot
//! always holds that source's next row. The interpreter relies on this to look
//! ahead within a single source when reassembling coded transmissions.

use crate::error::Error;
use crate::io::{LogRow, RowSource};

/// Per-source cursors over a set of row sources.
pub struct MergeSelector<S: RowSource> {
    sources: Vec<S>,
    pending: Vec<Option<LogRow>>,
    rows_read: u64,
}

impl<S: RowSource> MergeSelector<S> {
    /// Create a selector, pre-fetching the first row of every source.
    pub fn new(mut sources: Vec<S>) -> Result<Self, Error> {
        let mut pending = Vec::with_capacity(sources.len());
        let mut rows_read = 0;

        for source in &mut sources {
            let row = source.next_row()?;
            if row.is_none() {
                tracing::debug!(source = source.name(), "input has no rows");
            } else {
                rows_read += 1;
            }
            pending.push(row);
        }

        Ok(Self {
            sources,
            pending,
            rows_read,
        })
    }

    /// Number of sources being merged.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Name of a source, for diagnostics.
    pub fn source_name(&self, source: usize) -> &str {
        self.sources[source].name()
    }

    /// Total rows pulled from all sources so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Index of the source holding the earliest pending row.
    ///
    /// Ties go to the lowest source index.
    fn earliest(&self) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (idx, slot) in self.pending.iter().enumerate() {
            if let Some(row) = slot {
                if best.map_or(true, |(_, t)| row.start_time < t) {
                    best = Some((idx, row.start_time));
                }
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Take the globally earliest pending row together with its source index.
    ///
    /// Returns `Ok(None)` once every source is exhausted.
    pub fn next_row(&mut self) -> Result<Option<(usize, LogRow)>, Error> {
        let Some(source) = self.earliest() else {
            return Ok(None);
        };
        Ok(self.take(source)?.map(|row| (source, row)))
    }

    /// Look at the next row of a specific source without consuming it.
    pub fn peek(&self, source: usize) -> Option<&LogRow> {
        self.pending[source].as_ref()
    }

    /// Consume the pending row of a specific source and refill its slot.
    pub fn take(&mut self, source: usize) -> Result<Option<LogRow>, Error> {
        let Some(row) = self.pending[source].take() else {
            return Ok(None);
        };

        let next = self.sources[source].next_row()?;
        if next.is_some() {
            self.rows_read += 1;
        }
        self.pending[source] = next;

        Ok(Some(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct VecSource {
        name: String,
        rows: VecDeque<LogRow>,
    }

    impl VecSource {
        fn new(name: &str, times: &[u64]) -> Self {
            Self {
                name: name.to_string(),
                rows: times.iter().map(|&t| row(t)).collect(),
            }
        }
    }

    impl RowSource for VecSource {
        fn next_row(&mut self) -> Result<Option<LogRow>, Error> {
            Ok(self.rows.pop_front())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn row(start_time: u64) -> LogRow {
        LogRow {
            start_time,
            center_freq: 2402.0,
            phy_address: 0x8E89_BED6,
            modulation: 0x10,
            packet_size: 0,
            packet: String::new(),
            power_level: 0.0,
        }
    }

    fn drain(merge: &mut MergeSelector<VecSource>) -> Vec<(usize, u64)> {
        let mut out = Vec::new();
        while let Some((src, row)) = merge.next_row().unwrap() {
            out.push((src, row.start_time));
        }
        out
    }

    #[test]
    fn test_merge_interleaves_by_time() {
        let mut merge = MergeSelector::new(vec![
            VecSource::new("a", &[10, 30, 50]),
            VecSource::new("b", &[20, 40]),
        ])
        .unwrap();

        assert_eq!(
            drain(&mut merge),
            vec![(0, 10), (1, 20), (0, 30), (1, 40), (0, 50)]
        );
        assert_eq!(merge.rows_read(), 5);
    }

    #[test]
    fn test_ties_go_to_first_source() {
        let mut merge = MergeSelector::new(vec![
            VecSource::new("a", &[5, 7]),
            VecSource::new("b", &[5, 7]),
            VecSource::new("c", &[5]),
        ])
        .unwrap();

        assert_eq!(
            drain(&mut merge),
            vec![(0, 5), (1, 5), (2, 5), (0, 7), (1, 7)]
        );
    }

    #[test]
    fn test_empty_sources_are_skipped() {
        let mut merge = MergeSelector::new(vec![
            VecSource::new("empty", &[]),
            VecSource::new("b", &[1, 2]),
            VecSource::new("c", &[]),
        ])
        .unwrap();

        assert_eq!(merge.source_count(), 3);
        assert_eq!(drain(&mut merge), vec![(1, 1), (1, 2)]);
        assert!(merge.next_row().unwrap().is_none());
    }

    #[test]
    fn test_no_sources() {
        let mut merge = MergeSelector::<VecSource>::new(Vec::new()).unwrap();
        assert!(merge.next_row().unwrap().is_none());
    }

    #[test]
    fn test_peek_and_take_stay_within_source() {
        let mut merge = MergeSelector::new(vec![
            VecSource::new("a", &[1, 100]),
            VecSource::new("b", &[2]),
        ])
        .unwrap();

        let (src, first) = merge.next_row().unwrap().unwrap();
        assert_eq!((src, first.start_time), (0, 1));

        // Source 0's next row is later than source 1's, but peek/take ignore that.
        assert_eq!(merge.peek(0).map(|r| r.start_time), Some(100));
        let taken = merge.take(0).unwrap().unwrap();
        assert_eq!(taken.start_time, 100);
        assert!(merge.peek(0).is_none());
        assert!(merge.take(0).unwrap().is_none());

        assert_eq!(drain(&mut merge), vec![(1, 2)]);
    }
}
