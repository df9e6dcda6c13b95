//! Serialization of a [`Dataset`] as one table.
//!
//! The header row is `CID` followed by the catalogue column names; each
//! record becomes one row, in dataset order.

mod delimited;
mod xlsx;

use std::io::Write;

use super::Format;
use super::error::Error;
use crate::collect::Dataset;

/// Name of the single worksheet in exported workbooks.
pub const SHEET_NAME: &str = "Compounds";

/// Writes a dataset to a byte sink in one of the tabular formats.
#[derive(Debug)]
pub struct TableWriter<W: Write> {
    writer: W,
    format: Format,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W, format: Format) -> Self {
        Self { writer, format }
    }

    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn write(&mut self, dataset: &Dataset) -> Result<(), Error> {
        match self.format {
            Format::Xlsx => xlsx::write(&mut self.writer, dataset),
            Format::Csv => delimited::write(&mut self.writer, dataset, b','),
            Format::Tsv => delimited::write(&mut self.writer, dataset, b'\t'),
            Format::Sdf => Err(Error::UnsupportedWriteFormat(Format::Sdf)),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::{FIELD_COUNT, Record, SENTINEL};

    pub(crate) fn sample_dataset() -> Dataset {
        let mut glucose: [String; FIELD_COUNT] = std::array::from_fn(|_| SENTINEL.to_string());
        glucose[6] = "C6H12O6".to_string();
        glucose[19] = "180.16".to_string();
        let mut ethanol: [String; FIELD_COUNT] = std::array::from_fn(|_| SENTINEL.to_string());
        ethanol[0] = "ethanol, absolute".to_string();
        [Record::new(5793, glucose), Record::new(702, ethanol)]
            .into_iter()
            .collect()
    }

    #[test]
    fn sdf_is_not_a_table_format() {
        let mut writer = TableWriter::new(Vec::new(), Format::Sdf);
        assert!(matches!(
            writer.write(&sample_dataset()),
            Err(Error::UnsupportedWriteFormat(Format::Sdf))
        ));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn dispatches_on_format() {
        let dataset = sample_dataset();

        let mut csv = TableWriter::new(Vec::new(), Format::Csv);
        csv.write(&dataset).expect("csv");
        let csv = String::from_utf8(csv.into_inner()).expect("utf8");
        assert!(csv.starts_with("CID,OpenEye Name,InChI,"));

        let mut tsv = TableWriter::new(Vec::new(), Format::Tsv);
        tsv.write(&dataset).expect("tsv");
        let tsv = String::from_utf8(tsv.into_inner()).expect("utf8");
        assert!(tsv.starts_with("CID\tOpenEye Name\tInChI\t"));

        let mut xlsx = TableWriter::new(Vec::new(), Format::Xlsx);
        xlsx.write(&dataset).expect("xlsx");
        assert!(xlsx.into_inner().starts_with(b"PK"));
    }
}
