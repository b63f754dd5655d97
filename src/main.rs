use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Result};

use harvester_core::logger;
use harvester_core::platform::create_platform;
use harvester_core::scheduler::Session;
use harvester_core::settings::Settings;

fn main() -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let logs_dir = cwd.join("logs");
    let settings_path = cwd.join("settings.json");

    logger::init(&logs_dir);

    let settings = Settings::load(&settings_path);
    if !settings_path.exists() {
        // First run: write the defaults so the operator has a file to edit.
        settings.save(&settings_path);
    }
    settings.validate()?;

    let platform = create_platform();
    let windows = platform.find_windows(&settings.window_pattern);
    let Some((id, title)) = windows.into_iter().next() else {
        bail!(
            "no window matched pattern \"{}\"",
            settings.window_pattern
        );
    };
    logger::info(&format!("target window: {title} ({id})"));

    let win = platform.open_window(id)?;
    let recognizer = platform.create_recognizer()?;
    let session = Session::start(settings, win, recognizer)?;

    println!("harvester running against \"{title}\" — press Enter to stop");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    session.stop();
    Ok(())
}
