use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Result;
use rand::Rng;

use crate::cycle;
use crate::logger;
use crate::platform::{Recognizer, WindowHandle};
use crate::settings::Settings;
use crate::types::CycleOutcome;

/// Randomized firing cadence in seconds. `lower <= upper`, both positive.
#[derive(Debug, Clone, Copy)]
pub struct IntervalBounds {
    pub lower: f64,
    pub upper: f64,
}

impl IntervalBounds {
    /// Draw the next interval uniformly from the bounds.
    pub fn draw(&self, rng: &mut impl Rng) -> Duration {
        let secs = if self.lower < self.upper {
            rng.gen_range(self.lower..=self.upper)
        } else {
            self.lower
        };
        Duration::from_secs_f64(secs)
    }
}

/// Shared stop signal between the session owner and the worker. The wait
/// wakes on cancellation, not on a poll tick.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    stopped: Mutex<bool>,
    cv: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let mut stopped = self.inner.stopped.lock().unwrap();
        *stopped = true;
        self.inner.cv.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.stopped.lock().unwrap()
    }

    /// Block until `deadline` or cancellation, whichever comes first.
    /// Returns true if cancellation arrived.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut stopped = self.inner.stopped.lock().unwrap();
        loop {
            if *stopped {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .inner
                .cv
                .wait_timeout(stopped, deadline - now)
                .unwrap();
            stopped = guard;
        }
    }
}

/// Fixed-rate detection loop.
///
/// Each target fire time advances from the previous target plus a fresh
/// interval, not from when the cycle actually finished, so the long-run
/// cadence holds at the midpoint of the bounds even when cycles are slow.
/// If a cycle overruns its interval the next fire resets to `now + interval`
/// instead of replaying the backlog: slow cycles delay the cadence, they
/// never produce a burst of immediate re-fires.
///
/// The loop body is sequential (wait, run, reschedule), so at most one
/// cycle is ever in flight.
pub fn run_loop(cancel: &CancelToken, bounds: IntervalBounds, mut cycle_fn: impl FnMut()) {
    let mut rng = rand::thread_rng();
    let mut interval = bounds.draw(&mut rng);
    let mut next_fire = Instant::now() + interval;

    loop {
        if cancel.wait_until(next_fire) {
            return;
        }

        cycle_fn();

        interval = bounds.draw(&mut rng);
        next_fire += interval;
        let now = Instant::now();
        if next_fire <= now {
            let overrun = now.duration_since(next_fire) + interval;
            logger::warn_p(
                "scheduler",
                &format!(
                    "cycle overran its slot by {:.2}s, resetting cadence",
                    overrun.as_secs_f64()
                ),
            );
            next_fire = now + interval;
        }
    }
}

/// A running automation session: the cancel token, the worker thread, and
/// the start timestamp. Lives from the start command to the stop command.
pub struct Session {
    cancel: CancelToken,
    worker: Option<JoinHandle<()>>,
    started: Instant,
}

impl Session {
    /// Validate the settings and spawn the worker loop. Configuration
    /// errors are returned synchronously; nothing starts on a bad config.
    pub fn start(
        settings: Settings,
        win: Box<dyn WindowHandle>,
        recognizer: Box<dyn Recognizer>,
    ) -> Result<Session> {
        settings.validate()?;
        let bounds = IntervalBounds {
            lower: settings.interval_lower_secs,
            upper: settings.interval_upper_secs,
        };

        logger::info_p(
            "scheduler",
            &format!(
                "session started: target \"{}\" on window \"{}\", interval {:.1}-{:.1}s",
                settings.target_label,
                win.title(),
                bounds.lower,
                bounds.upper
            ),
        );

        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let worker = thread::spawn(move || {
            let mut rng = rand::thread_rng();
            let mut win = win;
            let mut recognizer = recognizer;
            let cycle_cancel = worker_cancel.clone();
            run_loop(&worker_cancel, bounds, move || {
                match cycle::run(
                    win.as_mut(),
                    recognizer.as_mut(),
                    &settings,
                    &cycle_cancel,
                    &mut rng,
                ) {
                    Ok(outcome) => log_outcome(outcome),
                    Err(e) => logger::error_p("cycle", &format!("cycle failed: {e:#}")),
                }
            });
        });

        Ok(Session {
            cancel,
            worker: Some(worker),
            started: Instant::now(),
        })
    }

    /// Request stop and wait for the worker to wind down. A cycle already
    /// in flight finishes its bookkeeping but will not inject.
    pub fn stop(mut self) {
        self.shutdown();
        logger::info_p(
            "scheduler",
            &format!(
                "session stopped after {}",
                format_duration(self.started.elapsed().as_secs_f64())
            ),
        );
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            worker.join().ok();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn log_outcome(outcome: CycleOutcome) {
    match outcome {
        CycleOutcome::Clicked(p) => {
            logger::info_p("cycle", &format!("clicked button at ({}, {})", p.x, p.y))
        }
        CycleOutcome::NoText => logger::info_p("cycle", "no text recognized"),
        CycleOutcome::NoMatch => logger::info_p("cycle", "no actionable match"),
        CycleOutcome::InjectionSkipped => {
            logger::info_p("cycle", "stop requested, click withheld")
        }
    }
}

/// Compact elapsed-time formatting: "12.3s", "1m 12s", "2h 3m".
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.1}s");
    }
    let total = seconds as u64;
    let s = total % 60;
    let m = (total / 60) % 60;
    let h = total / 3600;
    if h > 0 {
        format!("{h}h {m}m")
    } else {
        format!("{m}m {s}s")
    }
}
