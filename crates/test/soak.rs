use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};

use harvester_core::logger;
use harvester_core::platform::create_platform;
use harvester_core::scheduler::Session;
use harvester_core::settings::Settings;

/// Run a short stub-backed session end to end, drain the log sink, and
/// report what the pipeline did. Exits nonzero if it never clicked.
fn main() -> Result<()> {
    logger::init(&std::env::temp_dir().join("harvester-soak"));
    let (tx, rx) = mpsc::channel();
    logger::set_sink(tx);

    let settings = Settings {
        interval_lower_secs: 0.05,
        interval_upper_secs: 0.15,
        ..Settings::default()
    };

    let platform = create_platform();
    let windows = platform.find_windows(&settings.window_pattern);
    let Some((id, title)) = windows.into_iter().next() else {
        bail!("no stub window matched \"{}\"", settings.window_pattern);
    };
    println!("soaking against \"{title}\" for 2s");

    let session = Session::start(
        settings,
        platform.open_window(id)?,
        platform.create_recognizer()?,
    )?;
    thread::sleep(Duration::from_secs(2));
    session.stop();

    let mut cycles = 0usize;
    let mut clicks = 0usize;
    while let Ok(line) = rx.try_recv() {
        if line.contains("[cycle]") {
            cycles += 1;
        }
        if line.contains("clicked button") {
            clicks += 1;
        }
        println!("{line}");
    }
    println!("--- {cycles} cycle log lines, {clicks} clicks");
    if clicks == 0 {
        bail!("soak run produced no clicks");
    }
    Ok(())
}
