use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported atom symbol: '{0}'")]
pub struct ParseAtomSymbolError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid CTfile bond type code: {0}")]
pub struct ParseBondOrderError(i32);

/// Element symbols H through Og, in atomic-number order.
const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// CTfile pseudo-atoms and query atoms accepted in atom blocks.
const PSEUDO_SYMBOLS: [&str; 9] = ["D", "T", "A", "Q", "L", "*", "LP", "R", "R#"];

/// The symbol of one connection-table atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomSymbol {
    /// A periodic-table element, stored with its atomic number.
    Element(u8),
    /// Isotope shorthand, query atom or R-group placeholder.
    Pseudo(&'static str),
}

impl AtomSymbol {
    pub fn symbol(&self) -> &'static str {
        match self {
            AtomSymbol::Element(z) => ELEMENT_SYMBOLS[usize::from(*z) - 1],
            AtomSymbol::Pseudo(s) => s,
        }
    }
}

impl fmt::Display for AtomSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for AtomSymbol {
    type Err = ParseAtomSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(pos) = ELEMENT_SYMBOLS.iter().position(|&e| e == s) {
            return Ok(AtomSymbol::Element((pos + 1) as u8));
        }
        PSEUDO_SYMBOLS
            .iter()
            .find(|&&p| p == s)
            .map(|&p| AtomSymbol::Pseudo(p))
            .ok_or_else(|| ParseAtomSymbolError(s.to_string()))
    }
}

/// Bond types of the CTfile bond block (codes 1 through 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
    SingleOrDouble,
    SingleOrAromatic,
    DoubleOrAromatic,
    Any,
}

impl BondOrder {
    pub fn from_ctfile(code: i32) -> Result<Self, ParseBondOrderError> {
        match code {
            1 => Ok(BondOrder::Single),
            2 => Ok(BondOrder::Double),
            3 => Ok(BondOrder::Triple),
            4 => Ok(BondOrder::Aromatic),
            5 => Ok(BondOrder::SingleOrDouble),
            6 => Ok(BondOrder::SingleOrAromatic),
            7 => Ok(BondOrder::DoubleOrAromatic),
            8 => Ok(BondOrder::Any),
            other => Err(ParseBondOrderError(other)),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
            BondOrder::SingleOrDouble => write!(f, "Single or Double"),
            BondOrder::SingleOrAromatic => write!(f, "Single or Aromatic"),
            BondOrder::DoubleOrAromatic => write!(f, "Double or Aromatic"),
            BondOrder::Any => write!(f, "Any"),
        }
    }
}
