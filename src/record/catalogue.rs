/// Where the value of a catalogue column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Copied verbatim from the named SDF data item.
    Annotation(&'static str),
    /// Computed from the connection table by a [`Toolkit`](crate::Toolkit).
    Derived(Derived),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    Inchi,
}

/// One named column of the record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub source: Source,
}

const fn annotation(name: &'static str, key: &'static str) -> Column {
    Column {
        name,
        source: Source::Annotation(key),
    }
}

/// Header of the identifier column that precedes the catalogue.
pub const CID_COLUMN: &str = "CID";

pub const FIELD_COUNT: usize = 29;

/// The record schema, in export column order.
pub const CATALOGUE: [Column; FIELD_COUNT] = [
    annotation("OpenEye Name", "PUBCHEM_IUPAC_OPENEYE_NAME"),
    Column {
        name: "InChI",
        source: Source::Derived(Derived::Inchi),
    },
    annotation("InChI Key", "PUBCHEM_IUPAC_INCHIKEY"),
    annotation("SMILES", "PUBCHEM_SMILES"),
    annotation("OpenEye Can Smiles", "PUBCHEM_OPENEYE_CAN_SMILES"),
    annotation("OpenEye Iso Smiles", "PUBCHEM_OPENEYE_ISO_SMILES"),
    annotation("Molecular Formula", "PUBCHEM_MOLECULAR_FORMULA"),
    annotation("Canonicalized", "PUBCHEM_COMPOUND_CANONICALIZED"),
    annotation("Complexity", "PUBCHEM_CACTVS_COMPLEXITY"),
    annotation("H-bond Acceptors", "PUBCHEM_CACTVS_HBOND_ACCEPTOR"),
    annotation("H-bond Donors", "PUBCHEM_CACTVS_HBOND_DONOR"),
    annotation("Rotatable Bonds", "PUBCHEM_CACTVS_ROTATABLE_BOND"),
    annotation("Iupac Cas Name", "PUBCHEM_IUPAC_CAS_NAME"),
    annotation("Iupac Name Markup", "PUBCHEM_IUPAC_NAME_MARKUP"),
    annotation("Iupac Name", "PUBCHEM_IUPAC_NAME"),
    annotation("Iupac Systematic Name", "PUBCHEM_IUPAC_SYSTEMATIC_NAME"),
    annotation("Iupac Traditional Name", "PUBCHEM_IUPAC_TRADITIONAL_NAME"),
    annotation("XLogP3", "PUBCHEM_XLOGP3"),
    annotation("Exact Mass", "PUBCHEM_EXACT_MASS"),
    annotation("Molecular Weight", "PUBCHEM_MOLECULAR_WEIGHT"),
    annotation("Monoisotopic Weight", "PUBCHEM_MONOISOTOPIC_WEIGHT"),
    annotation("Total Charge", "PUBCHEM_TOTAL_CHARGE"),
    annotation("Heavy Atom Count", "PUBCHEM_HEAVY_ATOM_COUNT"),
    annotation("TPSA", "PUBCHEM_CACTVS_TPSA"),
    annotation("Atom Def Stereo Count", "PUBCHEM_ATOM_DEF_STEREO_COUNT"),
    annotation("Atom Udef Stereo Count", "PUBCHEM_ATOM_UDEF_STEREO_COUNT"),
    annotation("Bond Def Stereo Count", "PUBCHEM_BOND_DEF_STEREO_COUNT"),
    annotation("Bond Udef Stereo Count", "PUBCHEM_BOND_UDEF_STEREO_COUNT"),
    annotation("Isotopic Atom Count", "PUBCHEM_ISOTOPIC_ATOM_COUNT"),
];

/// Position of a column in [`CATALOGUE`], looked up by name.
pub fn position(name: &str) -> Option<usize> {
    CATALOGUE.iter().position(|c| c.name == name)
}

/// Header row of an exported table: the identifier column, then the catalogue.
pub fn header() -> impl Iterator<Item = &'static str> {
    std::iter::once(CID_COLUMN).chain(CATALOGUE.iter().map(|c| c.name))
}
