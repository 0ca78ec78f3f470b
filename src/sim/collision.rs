//! Player/villain collision detection
//!
//! Hitboxes are deliberately forgiving: both boxes are shrunk by a fixed
//! padding before the overlap test, so a catch only registers once the
//! sprites visibly cover each other.

use super::rect::Rect;

/// Check whether two boxes collide after insetting both by `padding`
#[inline]
pub fn padded_overlap(a: &Rect, b: &Rect, padding: f32) -> bool {
    a.inset(padding).overlaps(&b.inset(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PAD: f32 = 10.0;

    fn player() -> Rect {
        Rect::new(200.0, 680.0, 80.0, 80.0)
    }

    #[test]
    fn test_centered_villain_collides() {
        let villain = Rect::new(210.0, 670.0, 60.0, 60.0);
        assert!(padded_overlap(&player(), &villain, PAD));
    }

    #[test]
    fn test_visual_touch_is_not_a_catch() {
        // Unshrunk boxes overlap by 15px, inset boxes are 5px apart
        let villain = Rect::new(150.0, 680.0, 65.0, 60.0);
        assert!(player().overlaps(&villain));
        assert!(!padded_overlap(&player(), &villain, PAD));
    }

    #[test]
    fn test_inset_edges_touching_is_not_a_catch() {
        // Player inset starts at x=210, villain inset ends at x=210
        let villain = Rect::new(160.0, 690.0, 60.0, 60.0);
        assert!(!padded_overlap(&player(), &villain, PAD));
        // One more pixel of overlap and it counts
        let villain = Rect::new(161.0, 690.0, 60.0, 60.0);
        assert!(padded_overlap(&player(), &villain, PAD));
    }

    #[test]
    fn test_vertical_gap_prevents_catch() {
        // Villain horizontally aligned but still high above
        let villain = Rect::new(210.0, 100.0, 60.0, 60.0);
        assert!(!padded_overlap(&player(), &villain, PAD));
    }

    proptest! {
        #[test]
        fn prop_matches_inset_interval_test(
            px in 0.0f32..400.0,
            py in 600.0f32..720.0,
            vx in -60.0f32..480.0,
            vy in -260.0f32..860.0,
            vs in 55.0f32..65.0,
        ) {
            let p = Rect::new(px, py, 80.0, 80.0);
            let v = Rect::new(vx, vy, vs, vs);
            let expected = px + PAD < vx + vs - PAD
                && px + 80.0 - PAD > vx + PAD
                && py + PAD < vy + vs - PAD
                && py + 80.0 - PAD > vy + PAD;
            prop_assert_eq!(padded_overlap(&p, &v, PAD), expected);
        }

        #[test]
        fn prop_symmetric(
            ax in -100.0f32..500.0, ay in -100.0f32..900.0,
            bx in -100.0f32..500.0, by in -100.0f32..900.0,
        ) {
            let a = Rect::new(ax, ay, 80.0, 80.0);
            let b = Rect::new(bx, by, 60.0, 60.0);
            prop_assert_eq!(padded_overlap(&a, &b, PAD), padded_overlap(&b, &a, PAD));
        }
    }
}
