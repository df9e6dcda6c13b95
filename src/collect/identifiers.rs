use tracing::debug;

/// Splits a comma-separated identifier list into CIDs, in input order.
///
/// Tokens are trimmed; anything that is not a run of ASCII digits fitting in
/// a `u64` is dropped without error.
pub fn parse_identifiers(input: &str) -> Vec<u64> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let cid = token
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| token.parse::<u64>().ok())
                .flatten();
            if cid.is_none() {
                debug!(token, "ignoring non-numeric identifier");
            }
            cid
        })
        .collect()
}
