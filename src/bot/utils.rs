const SHORT_SHA_LENGTH: usize = 7;

/// Abbreviates a commit id the way git does, ids shorter than that are kept whole.
pub(crate) fn short_sha(id: &str) -> &str {
    match id.char_indices().nth(SHORT_SHA_LENGTH) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
