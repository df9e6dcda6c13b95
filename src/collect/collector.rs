use tracing::{debug, info, warn};

use super::{Dataset, Error, parse_identifiers};
use crate::fetch::Fetcher;
use crate::io::sdf;
use crate::model::molecule::ParsedMolecule;
use crate::record::extract;
use crate::toolkit::Toolkit;

/// What one identifier contributed to a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The document yielded this many records.
    Added(usize),
    /// The document was fetched but held no valid molecule.
    NoMolecules,
    /// The fetch failed; the reason is kept for display.
    FetchFailed(String),
}

impl Outcome {
    pub fn added(&self) -> usize {
        match self {
            Outcome::Added(n) => *n,
            Outcome::NoMolecules | Outcome::FetchFailed(_) => 0,
        }
    }
}

/// Per-identifier outcomes of a batch that appended at least one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    outcomes: Vec<(u64, Outcome)>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[(u64, Outcome)] {
        &self.outcomes
    }

    /// Records appended by the batch.
    pub fn added(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.added()).sum()
    }

    /// Identifiers processed by the batch.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Identifiers that contributed nothing.
    pub fn failed(&self) -> impl Iterator<Item = &(u64, Outcome)> {
        self.outcomes.iter().filter(|(_, o)| o.added() == 0)
    }
}

/// Runs fetch, parse and extract for requested identifiers.
#[derive(Debug)]
pub struct Collector<F, T> {
    fetcher: F,
    toolkit: T,
}

impl<F: Fetcher, T: Toolkit> Collector<F, T> {
    pub fn new(fetcher: F, toolkit: T) -> Self {
        Self { fetcher, toolkit }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    /// Processes a comma-separated identifier list.
    ///
    /// Non-numeric tokens are ignored. Fails with [`Error::NoData`] when the
    /// dataset gained no record, including when no token was numeric.
    pub fn submit(&self, dataset: &mut Dataset, input: &str) -> Result<BatchReport, Error> {
        self.submit_ids(dataset, &parse_identifiers(input))
    }

    pub fn submit_ids(&self, dataset: &mut Dataset, cids: &[u64]) -> Result<BatchReport, Error> {
        self.submit_with(dataset, cids, |_, _| {})
    }

    /// Like [`submit_ids`](Self::submit_ids), reporting each identifier's
    /// outcome to `on_progress` as soon as it is known.
    pub fn submit_with<P>(
        &self,
        dataset: &mut Dataset,
        cids: &[u64],
        mut on_progress: P,
    ) -> Result<BatchReport, Error>
    where
        P: FnMut(u64, &Outcome),
    {
        let mut report = BatchReport::default();

        for &cid in cids {
            let outcome = match self.fetcher.fetch(cid) {
                Ok(bytes) => match self.collect_document(dataset, cid, &bytes) {
                    0 => {
                        info!(cid, "document held no valid molecule");
                        Outcome::NoMolecules
                    }
                    n => {
                        info!(cid, records = n, "collected records");
                        Outcome::Added(n)
                    }
                },
                Err(e) => {
                    warn!(cid, error = %e, "fetch failed");
                    Outcome::FetchFailed(e.to_string())
                }
            };
            on_progress(cid, &outcome);
            report.outcomes.push((cid, outcome));
        }

        if report.added() == 0 {
            return Err(Error::NoData {
                attempted: report.attempted(),
            });
        }
        Ok(report)
    }

    /// Parses one document and appends a record per valid molecule, in
    /// document order. Returns the number of records appended.
    pub fn collect_document(&self, dataset: &mut Dataset, cid: u64, bytes: &[u8]) -> usize {
        let mut added = 0;
        for entry in sdf::parse(bytes) {
            match entry {
                ParsedMolecule::Valid(molecule) => {
                    dataset.push(extract(cid, &molecule, &self.toolkit));
                    added += 1;
                }
                ParsedMolecule::Invalid {
                    index,
                    line,
                    reason,
                } => {
                    debug!(cid, index, line, %reason, "skipping invalid molecule");
                }
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::fetch::Error as FetchError;
    use crate::io::sdf::fixtures::{BROKEN, ETHANOL, GLUCOSE};
    use crate::record::{FIELD_COUNT, SENTINEL};
    use crate::toolkit::DisabledToolkit;

    #[derive(Default)]
    struct StubFetcher {
        documents: HashMap<u64, Vec<u8>>,
        requested: RefCell<Vec<u64>>,
    }

    impl StubFetcher {
        fn with(mut self, cid: u64, document: &str) -> Self {
            self.documents.insert(cid, document.as_bytes().to_vec());
            self
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, cid: u64) -> Result<Vec<u8>, FetchError> {
            self.requested.borrow_mut().push(cid);
            self.documents
                .get(&cid)
                .cloned()
                .ok_or(FetchError::NotFound(cid))
        }
    }

    fn collector(fetcher: StubFetcher) -> Collector<StubFetcher, DisabledToolkit> {
        Collector::new(fetcher, DisabledToolkit)
    }

    #[test]
    fn valid_and_invalid_siblings_yield_one_record() {
        let document = format!("{GLUCOSE}{BROKEN}");
        let collector = collector(StubFetcher::default().with(5793, &document));
        let mut dataset = Dataset::new();

        let report = collector.submit(&mut dataset, "5793").expect("one record");

        assert_eq!(report.added(), 1);
        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.cid(), 5793);
        assert_eq!(record.get("Molecular Formula"), Some("C6H12O6"));
        assert_eq!(record.get("XLogP3"), Some(SENTINEL));
    }

    #[test]
    fn non_numeric_tokens_are_never_fetched() {
        let collector = collector(StubFetcher::default().with(12, ETHANOL).with(5, GLUCOSE));
        let mut dataset = Dataset::new();

        let report = collector.submit(&mut dataset, "12, abc, 5").expect("records");

        assert_eq!(*collector.fetcher().requested.borrow(), vec![12, 5]);
        assert_eq!(report.attempted(), 2);
        let cids: Vec<_> = dataset.iter().map(|r| r.cid()).collect();
        assert_eq!(cids, vec![12, 5]);
    }

    #[test]
    fn records_follow_document_order_and_use_requesting_cid() {
        let document = format!("{ETHANOL}{GLUCOSE}");
        let collector = collector(StubFetcher::default().with(1, &document));
        let mut dataset = Dataset::new();

        let report = collector.submit_ids(&mut dataset, &[1]).expect("records");

        assert_eq!(report.outcomes(), &[(1, Outcome::Added(2))]);
        let formulas: Vec<_> = dataset
            .iter()
            .map(|r| (r.cid(), r.get("Molecular Formula")))
            .collect();
        assert_eq!(formulas, vec![(1, Some("C2H6O")), (1, Some("C6H12O6"))]);
    }

    #[test]
    fn all_fetches_failing_is_one_aggregate_failure() {
        let collector = collector(StubFetcher::default());
        let mut dataset = Dataset::new();

        let err = collector.submit(&mut dataset, "1, 2, 3").unwrap_err();

        assert_eq!(err, Error::NoData { attempted: 3 });
        assert!(dataset.is_empty());
    }

    #[test]
    fn input_without_numeric_tokens_reports_no_data() {
        let collector = collector(StubFetcher::default());
        let mut dataset = Dataset::new();

        let err = collector.submit(&mut dataset, "abc, ,x1").unwrap_err();

        assert_eq!(err, Error::NoData { attempted: 0 });
        assert!(collector.fetcher().requested.borrow().is_empty());
    }

    #[test]
    fn empty_document_counts_like_a_fetch_failure() {
        let collector = collector(StubFetcher::default().with(7, "").with(8, BROKEN));
        let mut dataset = Dataset::new();

        let mut seen = Vec::new();
        let err = collector
            .submit_with(&mut dataset, &[7, 8, 9], |cid, outcome| {
                seen.push((cid, outcome.clone()));
            })
            .unwrap_err();

        assert_eq!(err, Error::NoData { attempted: 3 });
        assert_eq!(seen[0], (7, Outcome::NoMolecules));
        assert_eq!(seen[1], (8, Outcome::NoMolecules));
        assert!(matches!(seen[2], (9, Outcome::FetchFailed(_))));
    }

    #[test]
    fn partial_failure_does_not_abort_the_batch() {
        let collector = collector(StubFetcher::default().with(702, ETHANOL));
        let mut dataset = Dataset::new();

        let report = collector.submit(&mut dataset, "404, 702").expect("records");

        assert_eq!(report.added(), 1);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(dataset.records()[0].cid(), 702);
    }

    #[test]
    fn dataset_grows_across_batches() {
        let collector = collector(StubFetcher::default().with(702, ETHANOL));
        let mut dataset = Dataset::new();

        collector.submit(&mut dataset, "702").expect("first");
        collector.submit(&mut dataset, "702").expect("second");

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0], dataset.records()[1]);
        assert!(dataset.iter().all(|r| r.values().len() == FIELD_COUNT));
    }

    #[test]
    fn collect_document_counts_appended_records() {
        let collector = collector(StubFetcher::default());
        let mut dataset = Dataset::new();
        let document = format!("{BROKEN}{ETHANOL}{GLUCOSE}");

        assert_eq!(collector.collect_document(&mut dataset, 42, document.as_bytes()), 2);
        assert_eq!(collector.collect_document(&mut dataset, 42, b""), 0);
        assert_eq!(dataset.len(), 2);
    }
}
