use rand::Rng;

use crate::item::AttentionItem;

/// Synthetic items: `score` uniform in [0, 1], `delta` uniform in [-0.5, 0.5],
/// no title, source or url.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<AttentionItem> {
    (0..count)
        .map(|_| AttentionItem::new(rng.gen_range(0.0..=1.0), rng.gen_range(-0.5..=0.5)))
        .collect()
}

/// Append placeholders until `items` holds `target` entries. Never removes
/// or replaces real items. Returns how many were appended.
pub fn pad_to<R: Rng + ?Sized>(items: &mut Vec<AttentionItem>, target: usize, rng: &mut R) -> usize {
    let missing = target.saturating_sub(items.len());
    items.extend(generate(rng, missing));
    missing
}
