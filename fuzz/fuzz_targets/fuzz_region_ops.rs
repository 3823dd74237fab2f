#![no_main]

use flicker_core::{Rect, Region};
use libfuzzer_sys::fuzz_target;

/// Four bytes per rectangle: x, y, width, height on a small grid so
/// rectangles collide often.
fn rects(bytes: &[u8]) -> Vec<Rect> {
    bytes
        .chunks_exact(4)
        .take(16)
        .map(|c| {
            Rect::new(
                i32::from(c[0] % 64) - 16,
                i32::from(c[1] % 64) - 16,
                i32::from(c[2] % 32),
                i32::from(c[3] % 32),
            )
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let split = usize::from(data[0]).min(data.len() - 1);
    let payload = &data[1..];
    let (left, right) = payload.split_at(split.min(payload.len()));

    let a = Region::from_rects(rects(left)).expect("non-negative rects");
    let b = Region::from_rects(rects(right)).expect("non-negative rects");

    let union = a.union(&b);
    let inter = a.intersection(&b);
    let diff = a.subtract(&b);

    // Inclusion-exclusion.
    assert_eq!(union.area() + inter.area(), a.area() + b.area());
    // A = (A - B) ⊔ (A ∩ B).
    assert!(diff.not_overlaps(&inter));
    assert!(diff.union(&inter).covers_exactly(&a));
    // Symmetry.
    assert_eq!(a.covers_exactly(&b), b.covers_exactly(&a));
    assert_eq!(union, b.union(&a));
    // Stored rectangles never overlap and are never empty.
    let stored = union.rects();
    let total: i64 = stored.iter().map(Rect::area).sum();
    assert_eq!(total, union.area());
    assert!(stored.iter().all(|r| !r.is_empty()));
});
