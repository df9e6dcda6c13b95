use std::io::{self, Write};

use cid_forge::{BatchReport, Outcome, Record};

use crate::util::text::{single_line, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Records are wider than the summary tables; long names and InChIs are cut.
const RECORD_TABLE_WIDTH: usize = 78;

pub fn print_records<'a>(records: impl IntoIterator<Item = &'a Record>) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    for record in records {
        write_record(&mut out, record);
        let _ = writeln!(out);
    }
}

pub fn print_batch_summary(report: &BatchReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_batch_summary(&mut out, report);
}

fn write_record(out: &mut impl Write, record: &Record) {
    let rows: Vec<(&str, String)> = record
        .fields()
        .map(|(name, value)| (name, single_line(value)))
        .collect();

    print_kv_table(
        out,
        &format!("CID {}", record.cid()),
        ("Field", "Value"),
        &rows,
        RECORD_TABLE_WIDTH,
    );
}

fn write_batch_summary(out: &mut impl Write, report: &BatchReport) {
    let owned: Vec<(String, String)> = report
        .outcomes()
        .iter()
        .map(|(cid, outcome)| {
            let status = match outcome {
                Outcome::Added(n) => format!("{n} added"),
                Outcome::NoMolecules => "no valid molecule".to_string(),
                Outcome::FetchFailed(reason) => format!("failed: {reason}"),
            };
            (cid.to_string(), status)
        })
        .collect();
    let rows: Vec<(&str, String)> = owned.iter().map(|(c, s)| (c.as_str(), s.clone())).collect();

    print_kv_table(out, "Batch Summary", ("CID", "Result"), &rows, SAFE_TABLE_WIDTH);
}

fn print_kv_table(
    out: &mut impl Write,
    title: &str,
    (key_head, val_head): (&str, &str),
    rows: &[(&str, String)],
    width: usize,
) {
    let key_w = rows
        .iter()
        .map(|(k, _)| k.chars().count())
        .chain(std::iter::once(key_head.chars().count()))
        .max()
        .unwrap_or(0)
        .min(24);
    let sep_overhead = 7;
    let val_w = width.saturating_sub(key_w + sep_overhead).max(8);

    let _ = writeln!(out, "{}┌─ {} ─┐", INDENT, truncate(title, width - 6));
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:<val_w$} │",
        INDENT,
        key_head,
        val_head,
        key_w = key_w,
        val_w = val_w
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:<val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
            key_w = key_w,
            val_w = val_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid_forge::{
        Collector, Dataset, DisabledToolkit, FIELD_COUNT, FetchError, Fetcher, SENTINEL,
    };

    struct Single(&'static str);

    impl Fetcher for Single {
        fn fetch(&self, cid: u64) -> Result<Vec<u8>, FetchError> {
            if cid == 1 {
                Ok(self.0.as_bytes().to_vec())
            } else {
                Err(FetchError::NotFound(cid))
            }
        }
    }

    const DOC: &str = concat!(
        "1\n\n\n",
        "  1  0  0     0  0  0  0  0  0999 V2000\n",
        "    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0\n",
        "M  END\n",
        "> <PUBCHEM_MOLECULAR_FORMULA>\n",
        "CH4\n",
        "\n",
        "$$$$\n",
    );

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn record_table_lists_every_field() {
        let record = Record::new(2244, std::array::from_fn(|_| SENTINEL.to_string()));
        let text = render(|out| write_record(out, &record));

        assert!(text.contains("CID 2244"));
        assert!(text.contains("Isotopic Atom Count"));
        // title, top border, header, separator, rows, bottom border
        assert_eq!(text.lines().count(), FIELD_COUNT + 5);
    }

    #[test]
    fn table_rows_have_equal_width() {
        let mut values: [String; FIELD_COUNT] = std::array::from_fn(|_| SENTINEL.to_string());
        values[1] = "InChI=1S/C9H8O4/c1-6(10)13-8-5-3-2-4-7(8)9(11)12/h2-5H,1H3,(H,11,12)".into();
        let record = Record::new(2244, values);
        let text = render(|out| write_record(out, &record));

        let widths: Vec<_> = text.lines().skip(1).map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(text.contains('…'));
    }

    #[test]
    fn batch_summary_shows_each_identifier() {
        let collector = Collector::new(Single(DOC), DisabledToolkit);
        let mut dataset = Dataset::new();
        let report = collector
            .submit(&mut dataset, "1, 2")
            .expect("one record");

        let text = render(|out| write_batch_summary(out, &report));
        assert!(text.contains("1 added"));
        assert!(text.contains("failed: CID 2 was not found"));
    }
}
