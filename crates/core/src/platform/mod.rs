pub mod stub;

use anyhow::Result;

use crate::types::{Capture, ClickPoint, RawText, WindowId};

/// Handle to a specific OS window, providing the ops one detection cycle
/// needs.
pub trait WindowHandle: Send {
    fn id(&self) -> WindowId;
    fn title(&self) -> &str;
    /// Grab the window's client-area pixels. Blocking; cannot be
    /// interrupted once started.
    fn capture(&mut self) -> Result<Capture>;
    /// Synthetic click at client-area coordinates. Blocking; cannot be
    /// interrupted once started.
    fn click(&mut self, point: ClickPoint) -> Result<()>;
}

/// Text recognition over a captured frame. Blocking; cannot be interrupted
/// once started.
pub trait Recognizer: Send {
    fn recognize(&mut self, frame: &Capture) -> Result<Vec<RawText>>;
}

/// Platform-level operations (window lookup, factories).
pub trait Platform: Send {
    /// Open windows whose title matches `pattern` (a regex).
    fn find_windows(&self, pattern: &str) -> Vec<(WindowId, String)>;
    fn open_window(&self, id: WindowId) -> Result<Box<dyn WindowHandle>>;
    fn create_recognizer(&self) -> Result<Box<dyn Recognizer>>;
}

/// Create the platform for the current environment. Native capture and
/// input backends plug in behind the traits above; the stub stands in
/// wherever none is wired up.
pub fn create_platform() -> Box<dyn Platform> {
    Box::new(stub::StubPlatform)
}
