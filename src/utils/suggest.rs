/// Lowercased ASCII alphanumerics only, so `Knowledge-Graph` and
/// `knowledge_graph` compare equal.
fn fold(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != *cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b_chars.len()]
}

fn distance_budget(folded_len: usize) -> usize {
    match folded_len {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        n => (n * 35 / 100).max(3),
    }
}

/// Candidates close enough to `input` to be worth suggesting, best first.
pub fn suggest(input: &str, candidates: &[&str], limit: usize) -> Vec<String> {
    let needle = fold(input);
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    let budget = distance_budget(needle.len());

    let mut scored: Vec<(usize, &str)> = candidates
        .iter()
        .filter_map(|candidate| {
            let folded = fold(candidate);
            if folded.is_empty() {
                return None;
            }
            let score = if folded == needle {
                0
            } else if folded.contains(&needle) || needle.contains(&folded) {
                1
            } else {
                edit_distance(&needle, &folded)
            };
            (score <= budget).then_some((score, *candidate))
        })
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// `Did you mean: a, b?` or `None` when nothing is close.
pub fn did_you_mean(input: &str, candidates: &[&str]) -> Option<String> {
    let matches = suggest(input, candidates, 3);
    if matches.is_empty() {
        None
    } else {
        Some(format!("Did you mean: {}?", matches.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COGS: &[&str] = &[
        "deidentification",
        "relationships",
        "ai_authorship_detection",
        "knowledge_graph",
    ];

    #[test]
    fn near_misses_are_suggested() {
        assert_eq!(suggest("relationship", COGS, 3), vec!["relationships"]);
        assert_eq!(suggest("Knowledge-Graph", COGS, 3), vec!["knowledge_graph"]);
        assert_eq!(suggest("coast", &["time", "cost"], 3), vec!["cost"]);
    }

    #[test]
    fn unrelated_input_yields_nothing() {
        assert!(suggest("bogus", COGS, 3).is_empty());
        assert!(did_you_mean("", COGS).is_none());
    }

    #[test]
    fn edit_distance_counts_single_edits() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }
}
