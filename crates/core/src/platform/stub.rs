use anyhow::Result;
use regex::Regex;

use super::{Platform, Recognizer, WindowHandle};
use crate::logger;
use crate::types::{Capture, ClickPoint, RawText, WindowId};

/// In-memory stand-in for a native backend: one fake chat window and a
/// recognizer that replays a canned conversation, so the full pipeline can
/// run without OS capture or OCR.
pub struct StubPlatform;

impl Platform for StubPlatform {
    fn find_windows(&self, pattern: &str) -> Vec<(WindowId, String)> {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                logger::warn_p("stub", &format!("bad window pattern: {e}"));
                return Vec::new();
            }
        };
        [
            (10001u64, "Discord - #general"),
            (20001u64, "Terminal"),
        ]
        .into_iter()
        .filter(|(_, title)| re.is_match(title))
        .map(|(id, title)| (id, title.to_string()))
        .collect()
    }

    fn open_window(&self, id: WindowId) -> Result<Box<dyn WindowHandle>> {
        logger::info_p("stub", &format!("open_window({id})"));
        Ok(Box::new(StubWindow {
            id,
            title: format!("Stub-{id}"),
        }))
    }

    fn create_recognizer(&self) -> Result<Box<dyn Recognizer>> {
        Ok(Box::new(StubRecognizer { frame: 0 }))
    }
}

struct StubWindow {
    id: WindowId,
    title: String,
}

impl WindowHandle for StubWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn capture(&mut self) -> Result<Capture> {
        let (w, h) = (1280u32, 720u32);
        Ok(Capture {
            data: vec![0; (w * h * 4) as usize],
            width: w,
            height: h,
            bytes_per_row: w * 4,
        })
    }

    fn click(&mut self, point: ClickPoint) -> Result<()> {
        logger::info_p(
            "stub",
            &format!("win({}).click({}, {})", self.id, point.x, point.y),
        );
        Ok(())
    }
}

/// Replays a scripted conversation matching the default settings: odd
/// frames show the actionable message, even frames show idle chatter, so a
/// running session exercises both the click and the no-match paths.
struct StubRecognizer {
    frame: usize,
}

impl Recognizer for StubRecognizer {
    fn recognize(&mut self, _frame: &Capture) -> Result<Vec<RawText>> {
        self.frame += 1;
        if self.frame % 2 == 0 {
            return Ok(vec![
                scripted("someone", 80.0, 60.0, 90.0, 20.0, 0.94),
                scripted("hello there", 80.0, 90.0, 140.0, 20.0, 0.92),
            ]);
        }
        // Boxes are crop-relative; the cycle shifts them back to the frame.
        Ok(vec![
            scripted("Player used /farm", 80.0, 40.0, 200.0, 20.0, 0.97),
            scripted("Player", 80.0, 120.0, 80.0, 20.0, 0.95),
            scripted("press the button below", 80.0, 150.0, 220.0, 20.0, 0.91),
            scripted("farm", 100.0, 200.0, 60.0, 20.0, 0.93),
            scripted("???", 400.0, 300.0, 30.0, 20.0, 0.31),
        ])
    }
}

fn scripted(text: &str, x: f64, y: f64, w: f64, h: f64, confidence: f32) -> RawText {
    RawText {
        text: text.into(),
        quad: [[x, y], [x + w, y], [x + w, y + h], [x, y + h]],
        confidence,
    }
}
