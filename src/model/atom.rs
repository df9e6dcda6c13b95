use super::types::AtomSymbol;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub symbol: AtomSymbol,
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(symbol: AtomSymbol, position: [f64; 3]) -> Self {
        Self { symbol, position }
    }
}
