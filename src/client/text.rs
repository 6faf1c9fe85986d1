//! Cleanup of recognized text.
//!
//! The recognizer reliably mangles a handful of names. Those are corrected
//! through a fixed alias table before the result is snapped to a known name.

/// Known misreadings and their corrections.
const NAME_ALIASES: &[(&str, &str)] = &[("Ilaoi", "Illaoi"), ("Xayah & Raka", "Xayah & Rakan")];

/// Applies the alias table to a raw name read.
pub fn correct_alias(raw: &str) -> String {
    let trimmed = raw.trim();
    NAME_ALIASES
        .iter()
        .find(|(bad, _)| *bad == trimmed)
        .map(|(_, good)| good.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Snaps a corrected read to one of `known`.
///
/// Matches exactly, then case-insensitively, then by unique prefix. Returns
/// the read unchanged when nothing matches.
pub fn match_known<'a, I>(read: &str, known: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let known: Vec<&str> = known.into_iter().collect();
    if known.contains(&read) {
        return read.to_string();
    }
    let lower = read.to_lowercase();
    if let Some(hit) = known.iter().find(|k| k.to_lowercase() == lower) {
        return hit.to_string();
    }
    if lower.len() >= 3 {
        let prefixed: Vec<&&str> =
            known.iter().filter(|k| k.to_lowercase().starts_with(&lower)).collect();
        if let [only] = prefixed.as_slice() {
            return only.to_string();
        }
    }
    read.to_string()
}

/// Full normalization pipeline for a unit name read off the info panel.
pub fn normalize_unit_name<'a, I>(raw: &str, known: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    match_known(&correct_alias(raw), known)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_corrected() {
        assert_eq!(correct_alias("Ilaoi"), "Illaoi");
        assert_eq!(correct_alias(" Xayah & Raka "), "Xayah & Rakan");
        assert_eq!(correct_alias("Zyra"), "Zyra");
    }

    #[test]
    fn matches_case_and_prefix() {
        let known = ["Zyra", "Zoe", "Ahri"];
        assert_eq!(match_known("zyra", known), "Zyra");
        assert_eq!(match_known("Ahr", known), "Ahri");
        // Ambiguous or too short: left alone.
        assert_eq!(match_known("Z", known), "Z");
        assert_eq!(match_known("Garen", known), "Garen");
    }

    #[test]
    fn pipeline_runs_alias_first() {
        let known = ["Illaoi"];
        assert_eq!(normalize_unit_name("Ilaoi", known), "Illaoi");
    }
}
