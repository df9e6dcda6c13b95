mod ctab;
mod reader;

pub use reader::SdfReader;

/// Parses an in-memory SDF document into a lazy sequence of entries.
pub fn parse(bytes: &[u8]) -> SdfReader<&[u8]> {
    SdfReader::new(bytes)
}
