use anyhow::Result;
use rand::Rng;

use crate::elements;
use crate::logger;
use crate::matcher;
use crate::platform::{Recognizer, WindowHandle};
use crate::scheduler::CancelToken;
use crate::settings::Settings;
use crate::types::CycleOutcome;

/// One detection pass: capture, crop to the region of interest, recognize,
/// rebuild the chat column, match, click.
///
/// Capture, recognition and injection block and cannot be interrupted once
/// started; the cancel token is consulted once more right before injection,
/// so a stop landing mid-cycle withholds the click but the pass still
/// finishes its own bookkeeping.
pub fn run(
    win: &mut dyn WindowHandle,
    recognizer: &mut dyn Recognizer,
    settings: &Settings,
    cancel: &CancelToken,
    rng: &mut impl Rng,
) -> Result<CycleOutcome> {
    let frame = win.capture()?;
    let rect = settings.crop.capture_rect(frame.width, frame.height);
    let roi = frame.crop(rect)?;

    #[cfg(feature = "debug-capture")]
    dump_roi(&roi);

    let raw = recognizer.recognize(&roi)?;
    if raw.is_empty() {
        return Ok(CycleOutcome::NoText);
    }

    let found = elements::normalize(raw, settings.min_confidence, rect.l, rect.t);
    let (left_px, right_px) = settings.crop.horizontal_bounds(frame.width);
    let column = elements::chat_column(found, left_px, right_px);

    let Some(candidate) = matcher::find_candidate(&column, &settings.match_params()) else {
        return Ok(CycleOutcome::NoMatch);
    };

    let point = matcher::click_point(&candidate.button_box, settings.jitter_shrink, rng);
    if cancel.is_cancelled() {
        return Ok(CycleOutcome::InjectionSkipped);
    }

    logger::info_p(
        "cycle",
        &format!(
            "match at y={}, clicking with jitter at ({}, {})",
            candidate.button_box.y_min, point.x, point.y
        ),
    );
    win.click(point)?;
    Ok(CycleOutcome::Clicked(point))
}

#[cfg(feature = "debug-capture")]
fn dump_roi(roi: &crate::types::Capture) {
    use image::{ImageBuffer, Rgba};

    let mut img = ImageBuffer::<Rgba<u8>, Vec<u8>>::new(roi.width, roi.height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let i = (y * roi.bytes_per_row + x * 4) as usize;
        *px = Rgba([roi.data[i + 2], roi.data[i + 1], roi.data[i], 255]);
    }
    if let Err(e) = img.save("debug-roi.png") {
        logger::warn_p("cycle", &format!("debug capture save failed: {e}"));
    }
}
