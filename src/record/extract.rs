use tracing::debug;

use super::catalogue::{CATALOGUE, Derived, Source};
use super::{Record, SENTINEL};
use crate::model::molecule::Molecule;
use crate::toolkit::Toolkit;

/// Builds the record of one decoded molecule.
///
/// Every catalogue column is filled: data items are copied verbatim, the
/// InChI comes from `toolkit`, and anything unavailable becomes [`SENTINEL`].
pub fn extract<T: Toolkit + ?Sized>(cid: u64, molecule: &Molecule, toolkit: &T) -> Record {
    let values = std::array::from_fn(|i| match CATALOGUE[i].source {
        Source::Annotation(key) => molecule
            .annotation(key)
            .map_or_else(|| SENTINEL.to_string(), str::to_string),
        Source::Derived(Derived::Inchi) => match toolkit.inchi(molecule) {
            Ok(inchi) => inchi,
            Err(e) => {
                debug!(cid, error = %e, "InChI unavailable, using sentinel");
                SENTINEL.to_string()
            }
        },
    });

    Record::new(cid, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sdf::{fixtures, parse};
    use crate::record::FIELD_COUNT;
    use crate::toolkit::{DisabledToolkit, Error as ToolkitError};

    struct FixedInchi(&'static str);

    impl Toolkit for FixedInchi {
        fn inchi(&self, _molecule: &Molecule) -> Result<String, ToolkitError> {
            Ok(self.0.to_string())
        }
    }

    fn glucose() -> Molecule {
        parse(fixtures::GLUCOSE.as_bytes())
            .molecules()
            .next()
            .expect("glucose fixture")
    }

    #[test]
    fn copies_annotations_verbatim_and_fills_sentinels() {
        let record = extract(5793, &glucose(), &DisabledToolkit);

        assert_eq!(record.cid(), 5793);
        assert_eq!(record.get("Molecular Formula"), Some("C6H12O6"));
        assert_eq!(record.get("Molecular Weight"), Some("180.16"));
        assert_eq!(record.get("XLogP3"), Some(SENTINEL));
        assert_eq!(record.get("InChI"), Some(SENTINEL));
        assert_eq!(record.values().len(), FIELD_COUNT);
    }

    #[test]
    fn every_column_is_defined() {
        let record = extract(1, &glucose(), &DisabledToolkit);
        assert!(record.values().iter().all(|v| !v.is_empty()));
        let sentinels = record.values().iter().filter(|v| *v == SENTINEL).count();
        // formula and weight are the only items the fixture carries
        assert_eq!(sentinels, FIELD_COUNT - 2);
    }

    #[test]
    fn derived_inchi_comes_from_toolkit() {
        let toolkit = FixedInchi("InChI=1S/C6H12O6/c7-1-2-3(8)4(9)5(10)6(11)12-2/h2-11H,1H2");
        let record = extract(5793, &glucose(), &toolkit);
        assert_eq!(record.get("InChI"), Some(toolkit.0));
    }

    #[test]
    fn extraction_is_repeatable() {
        let molecule = glucose();
        let toolkit = FixedInchi("InChI=1S/x");
        assert_eq!(
            extract(5793, &molecule, &toolkit),
            extract(5793, &molecule, &toolkit)
        );
    }

    #[test]
    fn values_are_not_normalized() {
        let mut molecule = glucose();
        molecule.annotations.insert("PUBCHEM_XLOGP3", " -3.0 ");
        molecule.annotations.insert("PUBCHEM_EXACT_MASS", "180.06338810");
        let record = extract(5793, &molecule, &DisabledToolkit);
        assert_eq!(record.get("XLogP3"), Some(" -3.0 "));
        assert_eq!(record.get("Exact Mass"), Some("180.06338810"));
    }
}
