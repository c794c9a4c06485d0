//! Canonical brick set - generator shapes closed under rotation and vertical flip.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::Brick;

/// Generator diagrams. Every orientation of each is added by `build`.
const GENERATORS: &[&[&str]] = &[
    &["#"],
    &["##"],
    &["###"],
    &["####"],
    &["#####"],
    &["##", "##"],
    &["###", "###", "###"],
    // L-shapes: small corner, 4-cell L, big corner
    &["#.", "##"],
    &["#.", "#.", "##"],
    &["#..", "#..", "###"],
    // plus and T
    &[".#.", "###", ".#."],
    &["###", ".#."],
    // Z/S
    &["##.", ".##"],
];

static CATALOG: OnceLock<Vec<Brick>> = OnceLock::new();

/// Process-wide catalog, built on first use.
pub fn bricks() -> &'static [Brick] {
    CATALOG.get_or_init(build)
}

/// Build the catalog from the generator shapes. Order is deterministic:
/// generators in declaration order, each followed by its rotations, then
/// by its vertical mirror's rotations when the mirror is new.
pub fn build() -> Vec<Brick> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();

    for rows in GENERATORS {
        let generator = match Brick::from_rows(rows) {
            Ok(b) => b,
            Err(e) => unreachable!("generator diagram {rows:?} is malformed: {e}"),
        };
        add_rotations(&generator, &mut seen, &mut out);

        let flipped = generator.flip_vertical();
        if !seen.contains(&flipped) {
            add_rotations(&flipped, &mut seen, &mut out);
        }
    }

    out
}

fn add_rotations(start: &Brick, seen: &mut FxHashSet<Brick>, out: &mut Vec<Brick>) {
    let mut current = start.clone();
    loop {
        if seen.insert(current.clone()) {
            out.push(current.clone());
        }
        current = current.rotate();
        if current == *start {
            break;
        }
    }
}
