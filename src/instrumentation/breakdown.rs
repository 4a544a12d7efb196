//! Instantiation breakdown formatting.

use super::instantiation::InstantiationCounts;

/// `["Total: N", "Type: count", ...]`, types ordered by count descending and
/// then by name. Zero counts are kept.
pub fn breakdown(counts: &InstantiationCounts) -> Vec<String> {
    let mut per_type: Vec<(&String, &u64)> = counts.per_type.iter().collect();
    per_type.sort_by(|(a_name, a_count), (b_name, b_count)| {
        b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
    });

    std::iter::once(format!("Total: {}", counts.total))
        .chain(per_type.into_iter().map(|(name, count)| format!("{name}: {count}")))
        .collect()
}
