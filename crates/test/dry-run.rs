use anyhow::{bail, Result};

use harvester_core::cycle;
use harvester_core::logger;
use harvester_core::platform::create_platform;
use harvester_core::scheduler::CancelToken;
use harvester_core::settings::Settings;

/// Run exactly one detection cycle against the stub and print the outcome.
fn main() -> Result<()> {
    logger::init(&std::env::temp_dir().join("harvester-dry-run"));

    let settings = Settings::default();
    settings.validate()?;

    let platform = create_platform();
    let windows = platform.find_windows(&settings.window_pattern);
    let Some((id, title)) = windows.into_iter().next() else {
        bail!("no stub window matched \"{}\"", settings.window_pattern);
    };
    println!("window: {title}");

    let mut win = platform.open_window(id)?;
    let mut recognizer = platform.create_recognizer()?;
    let cancel = CancelToken::new();
    let mut rng = rand::thread_rng();

    let outcome = cycle::run(
        win.as_mut(),
        recognizer.as_mut(),
        &settings,
        &cancel,
        &mut rng,
    )?;
    println!("outcome: {outcome:?}");
    Ok(())
}
