use std::io::Write;

use rust_xlsxwriter::{Format as CellFormat, Workbook, XlsxError};
use tracing::warn;

use super::SHEET_NAME;
use crate::collect::Dataset;
use crate::io::error::Error;
use crate::record::{Record, catalogue};

/// Longest string Excel stores in one cell, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Largest integer an `f64` cell represents exactly.
const MAX_EXACT_NUMBER: u64 = 1 << 53;

#[derive(Debug, Clone, PartialEq)]
enum Cell<'a> {
    Number(f64),
    Text(&'a str),
    Owned(String),
}

/// Builds the workbook in memory, then copies it to `writer`.
pub fn write<W: Write>(mut writer: W, dataset: &Dataset) -> Result<(), Error> {
    let mut workbook = Workbook::new();
    let bold = CellFormat::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in catalogue::header().enumerate() {
        sheet.write_string_with_format(0, column(col)?, name, &bold)?;
    }

    for (i, record) in dataset.iter().enumerate() {
        let row = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in row_cells(record).into_iter().enumerate() {
            let col = column(col)?;
            match cell {
                Cell::Number(n) => sheet.write_number(row, col, n)?,
                Cell::Text(s) => sheet.write_string(row, col, s)?,
                Cell::Owned(s) => sheet.write_string(row, col, s)?,
            };
        }
    }
    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();

    let buffer = workbook.save_to_buffer()?;
    writer.write_all(&buffer)?;
    writer.flush()?;
    Ok(())
}

/// One worksheet row: the CID, then every catalogue value.
fn row_cells(record: &Record) -> Vec<Cell<'_>> {
    let cid = record.cid();
    let cid_cell = if cid <= MAX_EXACT_NUMBER {
        Cell::Number(cid as f64)
    } else {
        Cell::Owned(cid.to_string())
    };

    let values = record
        .fields()
        .map(|(name, value)| Cell::Text(fit_cell(cid, name, value)));
    std::iter::once(cid_cell).chain(values).collect()
}

/// Cuts `value` to [`MAX_CELL_CHARS`] characters.
fn fit_cell<'a>(cid: u64, name: &str, value: &'a str) -> &'a str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                cid,
                column = name,
                chars = value.chars().count(),
                "value exceeds the XLSX cell limit; truncated"
            );
            &value[..end]
        }
        None => value,
    }
}

fn column(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::table::tests::sample_dataset;
    use crate::record::{FIELD_COUNT, SENTINEL};

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("read-only volume"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn record_with(cid: u64, column: usize, value: String) -> Record {
        let mut values: [String; FIELD_COUNT] = std::array::from_fn(|_| SENTINEL.to_string());
        values[column] = value;
        Record::new(cid, values)
    }

    #[test]
    fn produces_a_zip_container() {
        let mut out = Vec::new();
        write(&mut out, &sample_dataset()).expect("xlsx");
        assert!(out.len() > 4);
        assert_eq!(&out[..2], b"PK");
    }

    #[test]
    fn header_only_workbook_is_valid() {
        let mut out = Vec::new();
        write(&mut out, &Dataset::new()).expect("xlsx");
        assert_eq!(&out[..2], b"PK");
    }

    #[test]
    fn rows_hold_numeric_cid_then_catalogue_values() {
        let dataset = sample_dataset();
        let rows: Vec<_> = dataset.iter().map(row_cells).collect();

        assert_eq!(rows.len(), dataset.len());
        assert!(rows.iter().all(|r| r.len() == catalogue::header().count()));
        assert_eq!(rows[0][0], Cell::Number(5793.0));
        assert_eq!(rows[0][7], Cell::Text("C6H12O6"));
        assert_eq!(rows[1][0], Cell::Number(702.0));
        assert_eq!(rows[1][1], Cell::Text("ethanol, absolute"));
        assert_eq!(rows[1][2], Cell::Text(SENTINEL));
    }

    #[test]
    fn cid_beyond_exact_float_range_is_written_as_text() {
        let record = record_with(u64::MAX, 0, "x".to_string());
        assert_eq!(row_cells(&record)[0], Cell::Owned(u64::MAX.to_string()));

        let record = record_with(1 << 53, 0, "x".to_string());
        assert_eq!(row_cells(&record)[0], Cell::Number(9_007_199_254_740_992.0));
    }

    #[test]
    fn over_long_values_are_truncated_to_the_cell_limit() {
        let record = record_with(1, 3, "é".repeat(40_000));
        let cells = row_cells(&record);
        match &cells[4] {
            Cell::Text(s) => assert_eq!(s.chars().count(), MAX_CELL_CHARS),
            other => panic!("expected text cell, got {other:?}"),
        }

        let mut out = Vec::new();
        write(&mut out, &[record].into_iter().collect()).expect("xlsx with long value");
        assert_eq!(&out[..2], b"PK");
    }

    #[test]
    fn values_at_the_limit_are_kept_whole() {
        let value = "a".repeat(MAX_CELL_CHARS);
        assert_eq!(fit_cell(1, "SMILES", &value), value);
    }

    #[test]
    fn sink_failure_is_an_io_error() {
        let err = write(FailingWriter, &sample_dataset()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
