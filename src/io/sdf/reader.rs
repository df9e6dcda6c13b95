use std::io::BufRead;

use tracing::debug;

use super::ctab;
use crate::io::{Format, error::Error};
use crate::model::molecule::{Annotations, Molecule, ParsedMolecule};

type Line = (usize, String);

/// Lazy reader over the records of an SDF document.
///
/// Yields one [`ParsedMolecule`] per `$$$$`-terminated record. Records whose
/// connection table cannot be decoded are yielded as
/// [`ParsedMolecule::Invalid`]; an I/O failure ends the sequence after one
/// final invalid entry.
pub struct SdfReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    index: usize,
    done: bool,
}

impl<R: BufRead> SdfReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            index: 0,
            done: false,
        }
    }

    /// Keeps only the successfully decoded molecules.
    pub fn molecules(self) -> impl Iterator<Item = Molecule> {
        self.filter_map(ParsedMolecule::into_molecule)
    }

    fn read_line(&mut self) -> Result<Option<String>, Error> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let text = String::from_utf8_lossy(&self.buf);
        Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn next_record(&mut self) -> Result<Option<Vec<Line>>, Error> {
        loop {
            let mut lines = Vec::new();
            let mut terminated = false;

            while let Some(line) = self.read_line()? {
                if line.trim() == "$$$$" {
                    terminated = true;
                    break;
                }
                lines.push((self.line_no, line));
            }

            if lines.iter().any(|(_, l)| !l.trim().is_empty()) {
                return Ok(Some(lines));
            }
            if !terminated {
                return Ok(None);
            }
        }
    }
}

impl<R: BufRead> Iterator for SdfReader<R> {
    type Item = ParsedMolecule;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let index = self.index;
        match self.next_record() {
            Ok(Some(lines)) => {
                self.index += 1;
                Some(decode_record(index, lines))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(reason) => {
                self.done = true;
                self.index += 1;
                Some(ParsedMolecule::Invalid {
                    index,
                    line: self.line_no + 1,
                    reason,
                })
            }
        }
    }
}

fn decode_record(index: usize, lines: Vec<Line>) -> ParsedMolecule {
    let start_line = lines.first().map(|(ln, _)| *ln).unwrap_or(1);

    let Some(end) = lines.iter().position(|(_, l)| l.starts_with("M  END")) else {
        let last = lines.last().map(|(ln, _)| *ln).unwrap_or(start_line);
        debug!(index, line = start_line, "SDF record has no 'M  END' terminator");
        return ParsedMolecule::Invalid {
            index,
            line: start_line,
            reason: Error::parse(Format::Sdf, last, "record has no 'M  END' terminator"),
        };
    };

    let (molfile, data) = lines.split_at(end + 1);
    match ctab::decode(molfile) {
        Ok(structure) => {
            let mut molblock = String::new();
            for (_, l) in molfile {
                molblock.push_str(l);
                molblock.push('\n');
            }
            ParsedMolecule::Valid(Molecule {
                title: molfile[0].1.clone(),
                molblock,
                structure,
                annotations: parse_data_items(data),
            })
        }
        Err(reason) => {
            debug!(index, line = start_line, %reason, "skipping undecodable SDF record");
            ParsedMolecule::Invalid {
                index,
                line: start_line,
                reason,
            }
        }
    }
}

fn parse_data_items(lines: &[Line]) -> Annotations {
    let mut annotations = Annotations::new();
    let mut iter = lines.iter().peekable();

    while let Some((_, header)) = iter.next() {
        if !header.starts_with('>') {
            continue;
        }
        let Some(name) = data_item_name(header) else {
            continue;
        };

        let mut value: Vec<&str> = Vec::new();
        while let Some((_, line)) = iter.next_if(|(_, l)| !l.trim().is_empty()) {
            value.push(line);
        }
        annotations.insert(name, value.join("\n"));
    }

    annotations
}

/// Extracts `NAME` from a data header such as `>  <NAME>  (1)`.
fn data_item_name(header: &str) -> Option<&str> {
    let start = header.find('<')? + 1;
    let len = header[start..].find('>')?;
    let name = &header[start..start + len];
    (!name.is_empty()).then_some(name)
}
