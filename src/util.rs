use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic pseudo-random unit pair in [-1, 1] derived from an item id.
/// Used to place nodes without a layout stage; the same id always lands in
/// the same spot across reloads.
pub fn stable_unit_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Fallback fill for nodes whose tag carries a cluster id but no color.
pub fn group_color(group: u32) -> [u8; 3] {
    const PALETTE: [[u8; 3]; 8] = [
        [86, 156, 214],
        [220, 133, 80],
        [120, 196, 120],
        [200, 120, 200],
        [230, 200, 90],
        [100, 200, 200],
        [210, 100, 120],
        [150, 150, 220],
    ];
    PALETTE[(group as usize) % PALETTE.len()]
}

/// Rough layout width of a text run, in world units, for label extents.
/// Good enough for threshold decisions; exact text metrics live in the
/// rendering backend.
pub fn text_width_hint(text: &str, font_size: f32) -> f32 {
    (text.chars().count() as f32) * font_size * 0.58
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_unit_pair_is_deterministic_and_bounded() {
        let first = stable_unit_pair("node-a");
        let second = stable_unit_pair("node-a");
        assert_eq!(first, second);

        for id in ["node-a", "node-b", "", "a-very-long-identifier"] {
            let (x, y) = stable_unit_pair(id);
            assert!((-1.0..=1.0).contains(&x));
            assert!((-1.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn group_colors_cycle_through_palette() {
        assert_eq!(group_color(0), group_color(8));
        assert_ne!(group_color(0), group_color(1));
    }

    #[test]
    fn text_width_grows_with_length() {
        assert!(text_width_hint("abcdef", 12.0) > text_width_hint("abc", 12.0));
        assert_eq!(text_width_hint("", 12.0), 0.0);
    }
}
