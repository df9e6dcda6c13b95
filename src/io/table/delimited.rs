use std::io::Write;

use csv::WriterBuilder;

use crate::collect::Dataset;
use crate::io::error::Error;
use crate::record::catalogue;

pub fn write<W: Write>(writer: W, dataset: &Dataset, delimiter: u8) -> Result<(), Error> {
    let mut table = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    table.write_record(catalogue::header())?;
    for record in dataset {
        let cid = record.cid().to_string();
        let row = std::iter::once(cid.as_str()).chain(record.values().iter().map(String::as_str));
        table.write_record(row)?;
    }

    table.flush()?;
    Ok(())
}
