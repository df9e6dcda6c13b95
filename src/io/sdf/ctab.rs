//! Connection-table decoding for V2000 and V3000 molfiles.

use std::collections::HashMap;
use std::str::FromStr;

use crate::io::{Format, error::Error};
use crate::model::{
    atom::Atom,
    structure::{Bond, Structure},
    types::{AtomSymbol, BondOrder},
};

type Line = (usize, String);

/// Decodes the molfile part of one SDF record (header through `M  END`).
pub fn decode(lines: &[Line]) -> Result<Structure, Error> {
    if lines.len() < 4 {
        return Err(Error::parse(
            Format::Sdf,
            lines.first().map(|(ln, _)| *ln).unwrap_or(1),
            "molfile must contain a three-line header and a counts line",
        ));
    }

    let (counts_line_no, counts_line) = &lines[3];
    if counts_line.contains("V3000") {
        return decode_v3000(&lines[4..], *counts_line_no);
    }

    let (atom_count, bond_count) = parse_counts(counts_line, *counts_line_no)?;
    let atom_start: usize = 4;

    // The final line is `M  END`; atoms and bonds must fit before it.
    let bounds = atom_start
        .checked_add(atom_count)
        .and_then(|bond_start| Some((bond_start, bond_start.checked_add(bond_count)?)))
        .filter(|&(_, bond_end)| bond_end < lines.len());
    let Some((bond_start, bond_end)) = bounds else {
        return Err(Error::parse(
            Format::Sdf,
            lines.last().map(|(ln, _)| *ln).unwrap_or(*counts_line_no),
            "molfile ended before atoms/bonds were fully specified",
        ));
    };

    let atoms = parse_atoms(&lines[atom_start..bond_start])?;
    let bonds = parse_bonds(&lines[bond_start..bond_end], atom_count)?;

    Ok(Structure { atoms, bonds })
}

fn column(line: &str, start: usize, end: usize) -> Option<&str> {
    let end = end.min(line.len());
    if start >= end {
        return None;
    }
    line.get(start..end).map(str::trim)
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let fixed = column(line, 0, 3)
        .and_then(|a| a.parse::<usize>().ok())
        .zip(column(line, 3, 6).and_then(|b| b.parse::<usize>().ok()));
    if let Some(counts) = fixed {
        return Ok(counts);
    }

    let tokens: Vec<_> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(Error::parse(
            Format::Sdf,
            line_no,
            "counts line must contain atom and bond counts",
        ));
    }
    let atoms = tokens[0]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid atom count"))?;
    let bonds = tokens[1]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(lines: &[Line]) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        if !raw.is_ascii() {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "atom line contains non-ASCII characters",
            ));
        }
        let coord = |start: usize, axis: &str| {
            column(raw, start, start + 10)
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| {
                    Error::parse(
                        Format::Sdf,
                        *ln,
                        format!("invalid {axis} coordinate in atom line"),
                    )
                })
        };
        let x = coord(0, "x")?;
        let y = coord(10, "y")?;
        let z = coord(20, "z")?;
        let symbol_token = column(raw, 31, 34).unwrap_or_default();
        let symbol = AtomSymbol::from_str(symbol_token)
            .map_err(|e| Error::parse(Format::Sdf, *ln, e.to_string()))?;
        atoms.push(Atom::new(symbol, [x, y, z]));
    }
    Ok(atoms)
}

fn parse_bonds(lines: &[Line], atom_count: usize) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        if !raw.is_ascii() {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "bond line contains non-ASCII characters",
            ));
        }

        let (a1, a2, code) = bond_fields(raw)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "invalid bond line"))?;
        bonds.push(build_bond(*ln, a1, a2, code, atom_count)?);
    }
    Ok(bonds)
}

fn bond_fields(raw: &str) -> Option<(usize, usize, i32)> {
    let fixed: Option<(usize, usize, i32)> = (|| {
        let a1 = column(raw, 0, 3)?.parse().ok()?;
        let a2 = column(raw, 3, 6)?.parse().ok()?;
        let code = column(raw, 6, 9)?.parse().ok()?;
        Some((a1, a2, code))
    })();
    if fixed.is_some() {
        return fixed;
    }

    let tokens: Vec<_> = raw.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }
    Some((
        tokens[0].parse().ok()?,
        tokens[1].parse().ok()?,
        tokens[2].parse().ok()?,
    ))
}

fn build_bond(
    line_no: usize,
    a1: usize,
    a2: usize,
    code: i32,
    atom_count: usize,
) -> Result<Bond, Error> {
    let order = BondOrder::from_ctfile(code)
        .map_err(|e| Error::parse(Format::Sdf, line_no, e.to_string()))?;

    if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
        return Err(Error::parse(
            Format::Sdf,
            line_no,
            "bond references atom outside declared range",
        ));
    }
    if a1 == a2 {
        return Err(Error::parse(
            Format::Sdf,
            line_no,
            "bond connects an atom to itself",
        ));
    }

    Ok(Bond::new(a1 - 1, a2 - 1, order))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    Ctab,
    Atom,
    Bond,
    Skipped,
}

fn decode_v3000(lines: &[Line], counts_line_no: usize) -> Result<Structure, Error> {
    let logical = join_v30_lines(lines)?;

    let mut section = Section::Outside;
    let mut counts: Option<(usize, usize, usize)> = None;
    let mut atoms = Vec::new();
    let mut atom_positions: HashMap<usize, usize> = HashMap::new();
    let mut pending_bonds: Vec<(usize, usize, usize, i32)> = Vec::new();

    for (ln, text) in &logical {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match (section, tokens.as_slice()) {
            (Section::Outside, ["BEGIN", "CTAB", ..]) => section = Section::Ctab,
            (Section::Ctab, ["END", "CTAB", ..]) => section = Section::Outside,
            (Section::Ctab, ["COUNTS", na, nb, ..]) => {
                let na = na
                    .parse::<usize>()
                    .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid atom count"))?;
                let nb = nb
                    .parse::<usize>()
                    .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid bond count"))?;
                counts = Some((na, nb, *ln));
            }
            (Section::Ctab, ["BEGIN", "ATOM", ..]) => section = Section::Atom,
            (Section::Ctab, ["BEGIN", "BOND", ..]) => section = Section::Bond,
            (Section::Ctab, ["BEGIN", ..]) => section = Section::Skipped,
            (Section::Atom, ["END", "ATOM", ..])
            | (Section::Bond, ["END", "BOND", ..])
            | (Section::Skipped, ["END", ..]) => section = Section::Ctab,
            (Section::Atom, fields) => {
                let (index, atom) = parse_v3000_atom(*ln, fields)?;
                if atom_positions.insert(index, atoms.len()).is_some() {
                    return Err(Error::parse(
                        Format::Sdf,
                        *ln,
                        format!("duplicate atom index {index}"),
                    ));
                }
                atoms.push(atom);
            }
            (Section::Bond, fields) => pending_bonds.push(parse_v3000_bond(*ln, fields)?),
            _ => {}
        }
    }

    if section != Section::Outside {
        return Err(Error::parse(
            Format::Sdf,
            logical.last().map(|(ln, _)| *ln).unwrap_or(counts_line_no),
            "V3000 connection table is not closed",
        ));
    }

    let (atom_count, bond_count, counts_no) = counts.ok_or_else(|| {
        Error::parse(
            Format::Sdf,
            counts_line_no,
            "V3000 connection table has no COUNTS line",
        )
    })?;
    if atoms.len() != atom_count || pending_bonds.len() != bond_count {
        return Err(Error::parse(
            Format::Sdf,
            counts_no,
            format!(
                "COUNTS declares {atom_count} atoms and {bond_count} bonds but found {} and {}",
                atoms.len(),
                pending_bonds.len()
            ),
        ));
    }

    let bonds = pending_bonds
        .into_iter()
        .map(|(ln, a1, a2, code)| {
            let resolve = |idx: usize| {
                atom_positions.get(&idx).map(|pos| pos + 1).ok_or_else(|| {
                    Error::parse(
                        Format::Sdf,
                        ln,
                        "bond references atom outside declared range",
                    )
                })
            };
            build_bond(ln, resolve(a1)?, resolve(a2)?, code, atoms.len())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Structure { atoms, bonds })
}

/// Strips the `M  V30 ` prefix and joins `-` continuation lines.
fn join_v30_lines(lines: &[Line]) -> Result<Vec<Line>, Error> {
    let mut logical = Vec::new();
    let mut pending: Option<Line> = None;

    for (ln, raw) in lines {
        if raw.starts_with("M  END") {
            break;
        }
        let Some(body) = raw.strip_prefix("M  V30 ") else {
            continue;
        };
        let body = body.trim_end();
        let (text, continues) = match body.strip_suffix('-') {
            Some(head) => (head, true),
            None => (body, false),
        };

        let (_, acc) = pending.get_or_insert_with(|| (*ln, String::new()));
        acc.push_str(text);

        if !continues {
            logical.extend(pending.take());
        }
    }

    if let Some((ln, _)) = pending {
        return Err(Error::parse(
            Format::Sdf,
            ln,
            "V3000 continuation line has no successor",
        ));
    }
    Ok(logical)
}

fn parse_v3000_atom(line_no: usize, fields: &[&str]) -> Result<(usize, Atom), Error> {
    // `idx type x y z aamap ...`; a `NOT [..]` list shifts the coordinates by one.
    let (symbol, coord_start) = match fields {
        [_, "NOT", ..] => (AtomSymbol::Pseudo("L"), 3),
        [_, ty, ..] if ty.starts_with('[') => (AtomSymbol::Pseudo("L"), 2),
        [_, ty, ..] => (
            AtomSymbol::from_str(ty.trim_matches('"'))
                .map_err(|e| Error::parse(Format::Sdf, line_no, e.to_string()))?,
            2,
        ),
        _ => return Err(Error::parse(Format::Sdf, line_no, "invalid V3000 atom line")),
    };

    let index = fields[0]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid V3000 atom index"))?;

    let mut position = [0.0; 3];
    for (axis, slot) in position.iter_mut().enumerate() {
        *slot = fields
            .get(coord_start + axis)
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| {
                Error::parse(Format::Sdf, line_no, "invalid coordinate in V3000 atom line")
            })?;
    }

    Ok((index, Atom::new(symbol, position)))
}

fn parse_v3000_bond(line_no: usize, fields: &[&str]) -> Result<(usize, usize, usize, i32), Error> {
    let [_, code, a1, a2, ..] = fields else {
        return Err(Error::parse(Format::Sdf, line_no, "invalid V3000 bond line"));
    };
    let code = code
        .parse::<i32>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond order value"))?;
    let a1 = a1
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid first atom index"))?;
    let a2 = a2
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid second atom index"))?;
    Ok((line_no, a1, a2, code))
}
