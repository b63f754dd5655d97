use crate::types::{BBox, RawText, TextElement};

/// Convert raw recognition output into full-frame text elements.
///
/// Entries below `min_confidence` are dropped, quadrilaterals are reduced to
/// axis-aligned boxes, and the crop origin `(dx, dy)` is added back so boxes
/// land in full-frame coordinates.
pub fn normalize(raw: Vec<RawText>, min_confidence: f32, dx: i32, dy: i32) -> Vec<TextElement> {
    raw.into_iter()
        .filter(|r| r.confidence >= min_confidence)
        .map(|r| TextElement {
            bbox: BBox::from_quad(&r.quad).translate(dx, dy),
            text: r.text,
        })
        .collect()
}

/// Restrict elements to the chat column and order them top to bottom.
///
/// Keeps elements whose `x_min` lies strictly between the pixel bounds and
/// sorts ascending by `y_min`. The sort is stable, so ties keep their input
/// order. Vertical trimming is not done here; the frame was already cropped
/// before recognition.
pub fn chat_column(mut elements: Vec<TextElement>, left_px: f64, right_px: f64) -> Vec<TextElement> {
    elements.retain(|e| {
        let x = e.bbox.x_min as f64;
        left_px < x && x < right_px
    });
    elements.sort_by_key(|e| e.bbox.y_min);
    elements
}
