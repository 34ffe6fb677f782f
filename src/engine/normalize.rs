/// Canonical form of a raw symptom label: surrounding whitespace trimmed,
/// underscore and space characters removed, remainder lower-cased.
///
/// Total over all inputs (the empty string normalizes to itself) and
/// idempotent, so user-facing labels like `"Nodal_Skin Eruptions"` and the
/// weight table's `"nodalskineruptions"` meet at the same key.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '_' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}
