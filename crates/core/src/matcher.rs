use rand::Rng;

use crate::types::{BBox, ClickPoint, TextElement};

/// Label and geometry tolerances for one matching pass.
#[derive(Debug, Clone)]
pub struct MatchParams {
    /// Case-insensitive substring that identifies the name line.
    pub target_label: String,
    /// Lines containing this marker never qualify as the name line, even if
    /// they mention the target (command echoes do).
    pub exclude_marker: String,
    /// Button caption, compared exactly after trimming and lowercasing.
    pub button_label: String,
    /// How far below the name line's top edge the button may sit, in pixels.
    pub max_vertical_gap: i32,
    /// How far the button's center may drift from the name's center, in pixels.
    pub max_horizontal_offset: f64,
}

/// A matched (name line, button) pair from one pass. Never kept across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    pub name_box: BBox,
    pub button_box: BBox,
}

/// Find the button to click in a column of elements sorted by `y_min`.
///
/// Recognized text carries no semantic structure, so vertical position
/// stands in for recency and for "this button belongs to this message":
/// the scan walks bottom-up to the lowest line naming the target, then
/// downward within a bounded vertical window for a horizontally aligned
/// button. One name candidate per pass: if the bottom-most name has no
/// button below it, the pass reports no match rather than retrying
/// earlier occurrences.
pub fn find_candidate(elements: &[TextElement], params: &MatchParams) -> Option<MatchCandidate> {
    let target = params.target_label.to_lowercase();
    let exclude = params.exclude_marker.to_lowercase();
    let button = params.button_label.to_lowercase();

    let (idx, name) = elements.iter().enumerate().rev().find(|(_, e)| {
        let text = e.text.to_lowercase();
        text.contains(&target) && (exclude.is_empty() || !text.contains(&exclude))
    })?;

    let name_y_top = name.bbox.y_min;
    let name_x_center = name.bbox.x_center();

    for e in &elements[idx + 1..] {
        // Leaving the vertical window ends the pass.
        if e.bbox.y_min - name_y_top > params.max_vertical_gap {
            break;
        }
        if e.text.trim().to_lowercase() != button {
            continue;
        }
        if (e.bbox.x_center() - name_x_center).abs() < params.max_horizontal_offset {
            return Some(MatchCandidate {
                name_box: name.bbox,
                button_box: e.bbox,
            });
        }
    }
    None
}

/// Pick a click point confined to the central region of a button box, so
/// repeated clicks never land on the same pixel.
///
/// Half-extents are `width * shrink` and `height * shrink`; with shrink
/// below 0.5 the jittered point stays inside the box by construction. Pure
/// function of the box and the caller's random source.
pub fn click_point(bbox: &BBox, shrink: f64, rng: &mut impl Rng) -> ClickPoint {
    let hw = bbox.width() as f64 * shrink;
    let hh = bbox.height() as f64 * shrink;
    let jx = if hw > 0.0 { rng.gen_range(-hw..=hw) } else { 0.0 };
    let jy = if hh > 0.0 { rng.gen_range(-hh..=hh) } else { 0.0 };
    ClickPoint {
        x: (bbox.x_center() + jx).round() as i32,
        y: (bbox.y_center() + jy).round() as i32,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn elem(text: &str, bbox: (i32, i32, i32, i32)) -> TextElement {
        TextElement {
            text: text.into(),
            bbox: BBox {
                x_min: bbox.0,
                y_min: bbox.1,
                x_max: bbox.2,
                y_max: bbox.3,
            },
        }
    }

    fn params() -> MatchParams {
        MatchParams {
            target_label: "dak".into(),
            exclude_marker: "used /".into(),
            button_label: "farm".into(),
            max_vertical_gap: 100,
            max_horizontal_offset: 200.0,
        }
    }

    #[test]
    fn command_echo_is_skipped_and_the_name_below_matches() {
        let elements = [
            elem("dak used /farm", (0, 0, 50, 10)),
            elem("dak", (0, 20, 50, 30)),
            elem("farm", (10, 40, 60, 50)),
        ];
        let m = find_candidate(&elements, &params()).unwrap();
        assert_eq!(m.name_box.y_min, 20);
        assert_eq!(m.button_box.y_min, 40);
    }

    #[test]
    fn misaligned_button_is_rejected() {
        let elements = [
            elem("dak", (0, 20, 50, 30)),
            elem("farm", (300, 40, 400, 50)),
        ];
        assert_eq!(find_candidate(&elements, &params()), None);
    }

    #[test]
    fn scan_stops_once_the_vertical_gap_is_exceeded() {
        // Both buttons sit past the gap; neither may be considered.
        let elements = [
            elem("dak", (0, 20, 50, 30)),
            elem("farm", (10, 150, 60, 160)),
            elem("farm", (10, 300, 60, 310)),
        ];
        assert_eq!(find_candidate(&elements, &params()), None);
    }

    #[test]
    fn bottom_most_name_without_a_button_ends_the_pass() {
        // An earlier name/button pair exists higher up, but the pass commits
        // to the lowest name occurrence and does not retry.
        let elements = [
            elem("dak", (0, 0, 50, 10)),
            elem("farm", (10, 20, 60, 30)),
            elem("dak", (0, 200, 50, 210)),
        ];
        assert_eq!(find_candidate(&elements, &params()), None);
    }

    #[test]
    fn button_comparison_trims_and_ignores_case() {
        let elements = [elem("Dak", (0, 20, 50, 30)), elem("  FaRm ", (10, 40, 60, 50))];
        assert!(find_candidate(&elements, &params()).is_some());
    }

    #[test]
    fn name_containing_button_text_is_not_its_own_button() {
        let elements = [elem("dak", (0, 20, 50, 30))];
        assert_eq!(find_candidate(&elements, &params()), None);
    }

    #[test]
    fn empty_column_has_no_candidate() {
        assert_eq!(find_candidate(&[], &params()), None);
    }

    #[test]
    fn click_point_stays_inside_the_box() {
        let mut rng = StdRng::seed_from_u64(7);
        let bbox = BBox {
            x_min: 10,
            y_min: 20,
            x_max: 90,
            y_max: 60,
        };
        for shrink in [0.05, 0.3, 0.49] {
            for _ in 0..1000 {
                let p = click_point(&bbox, shrink, &mut rng);
                assert!(bbox.contains(p.x, p.y), "{:?} escaped at shrink {}", p, shrink);
            }
        }
    }

    #[test]
    fn click_point_is_reproducible_with_a_fixed_seed() {
        let bbox = BBox {
            x_min: 0,
            y_min: 0,
            x_max: 100,
            y_max: 40,
        };
        let a = click_point(&bbox, 0.3, &mut StdRng::seed_from_u64(42));
        let b = click_point(&bbox, 0.3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn click_point_varies_across_draws() {
        let mut rng = StdRng::seed_from_u64(1);
        let bbox = BBox {
            x_min: 0,
            y_min: 0,
            x_max: 200,
            y_max: 100,
        };
        let points: HashSet<(i32, i32)> = (0..50)
            .map(|_| {
                let p = click_point(&bbox, 0.3, &mut rng);
                (p.x, p.y)
            })
            .collect();
        assert!(points.len() > 10);
    }

    #[test]
    fn degenerate_box_clicks_its_center() {
        let bbox = BBox {
            x_min: 5,
            y_min: 5,
            x_max: 5,
            y_max: 5,
        };
        let p = click_point(&bbox, 0.3, &mut StdRng::seed_from_u64(9));
        assert_eq!(p, ClickPoint { x: 5, y: 5 });
    }
}
