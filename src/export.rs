//! Exporting a collected [`Dataset`] as one tabular artifact.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::collect::Dataset;
use crate::io::{self, Format, TableWriter};

#[derive(Debug, Error)]
pub enum Error {
    #[error("nothing to export: the dataset is empty")]
    EmptyDataset,

    #[error("failed to create '{}'", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {format} table")]
    Write {
        format: Format,
        #[source]
        source: io::Error,
    },
}

/// Writes `dataset` to `writer` as a table in `format`.
///
/// An empty dataset is rejected before a single byte is written.
pub fn export<W: Write>(dataset: &Dataset, format: Format, writer: W) -> Result<(), Error> {
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }

    TableWriter::new(writer, format)
        .write(dataset)
        .map_err(|source| Error::Write { format, source })
}

/// Writes `dataset` to a new file at `path`, replacing any existing file.
///
/// The table is built in memory first: nothing is created, and an existing
/// file is left untouched, when the dataset is empty, the format is not
/// tabular, or serialization fails.
pub fn export_to_path(
    dataset: &Dataset,
    path: impl AsRef<Path>,
    format: Format,
) -> Result<(), Error> {
    let path = path.as_ref();
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }
    if !format.is_tabular() {
        return Err(Error::Write {
            format,
            source: io::Error::UnsupportedWriteFormat(format),
        });
    }

    // A failed export leaves any existing file untouched.
    let mut buffer = Vec::new();
    export(dataset, format, &mut buffer)?;

    let mut file = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(&buffer)
        .and_then(|()| file.flush())
        .map_err(|source| Error::Write {
            format,
            source: io::Error::from(source),
        })?;

    info!(path = %path.display(), %format, records = dataset.len(), "exported dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::table::tests::sample_dataset;
    use crate::record::{FIELD_COUNT, Record};

    #[test]
    fn empty_dataset_is_rejected_before_writing() {
        let mut out = Vec::new();
        let err = export(&Dataset::new(), Format::Csv, &mut out).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
        assert!(out.is_empty());
    }

    #[test]
    fn empty_dataset_creates_no_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("compound_data.xlsx");

        let err = export_to_path(&Dataset::new(), &path, Format::Xlsx).unwrap_err();

        assert!(matches!(err, Error::EmptyDataset));
        assert!(!path.exists());
    }

    #[test]
    fn exports_n_rows_in_catalogue_order() {
        let dataset = sample_dataset();
        let mut out = Vec::new();
        export(&dataset, Format::Csv, &mut out).expect("export");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), dataset.len() + 1);
        assert!(lines[0].starts_with("CID,OpenEye Name,InChI,InChI Key,SMILES,"));
        assert!(lines[0].ends_with(",Isotopic Atom Count"));
        assert_eq!(lines[0].split(',').count(), FIELD_COUNT + 1);
        assert!(lines[1].starts_with("5793,"));
    }

    #[test]
    fn writes_workbook_to_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.xlsx");

        export_to_path(&sample_dataset(), &path, Format::Xlsx).expect("export");

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn sdf_target_is_refused_without_creating_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.sdf");

        let err = export_to_path(&sample_dataset(), &path, Format::Sdf).unwrap_err();

        assert!(matches!(
            err,
            Error::Write {
                source: io::Error::UnsupportedWriteFormat(Format::Sdf),
                ..
            }
        ));
        assert!(!path.exists());
    }

    #[test]
    fn rejected_export_keeps_previous_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("compound_data.xlsx");
        std::fs::write(&path, b"previous export data").expect("seed file");

        assert!(export_to_path(&Dataset::new(), &path, Format::Xlsx).is_err());
        assert!(export_to_path(&sample_dataset(), &path, Format::Sdf).is_err());

        assert_eq!(std::fs::read(&path).expect("read back"), b"previous export data");
    }

    #[test]
    fn over_long_value_still_replaces_previous_workbook() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("compound_data.xlsx");
        std::fs::write(&path, b"previous export data").expect("seed file");

        let mut values: [String; FIELD_COUNT] =
            std::array::from_fn(|_| crate::record::SENTINEL.to_string());
        values[3] = "C".repeat(40_000);
        let dataset: Dataset = [Record::new(1, values)].into_iter().collect();

        export_to_path(&dataset, &path, Format::Xlsx).expect("export");

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn unwritable_path_reports_create_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.csv");

        let err = export_to_path(&sample_dataset(), &path, Format::Csv).unwrap_err();
        assert!(matches!(err, Error::Create { .. }));
    }

    #[test]
    fn export_leaves_dataset_untouched() {
        let dataset = sample_dataset();
        let before = dataset.clone();
        let _ = export(&dataset, Format::Tsv, Vec::new());
        assert_eq!(dataset, before);
    }
}
