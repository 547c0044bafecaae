use super::clock::Clock;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
pub const ZERO_ELAPSED: &str = "00:00:00";

/// `HH:MM:SS`, hours unbounded so a session crossing midnight keeps counting.
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Republishes the elapsed time of the running session once per second.
///
/// The recurring task is an owned handle: at most one exists per ticker, and
/// it is aborted on `stop`, on restart and when the ticker is dropped. Each
/// run carries a generation number so a tick racing a cancellation can never
/// overwrite the reset value.
pub struct ElapsedTimeTicker {
    display: Arc<watch::Sender<String>>,
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl ElapsedTimeTicker {
    pub fn new() -> Self {
        let (display, _) = watch::channel(ZERO_ELAPSED.to_string());
        Self {
            display: Arc::new(display),
            generation: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    pub fn current(&self) -> String {
        self.display.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts ticking from `started_at`, replacing any running ticker.
    /// Publishes once right away, then every [`TICK_PERIOD`].
    pub fn start(&mut self, started_at: NaiveDateTime, clock: Arc<dyn Clock>) {
        self.cancel();

        let generation = self.generation.load(Ordering::SeqCst);
        publish(&self.display, &self.generation, generation, started_at, clock.as_ref());

        let display = Arc::clone(&self.display);
        let current = Arc::clone(&self.generation);
        self.handle = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                if !publish(&display, &current, generation, started_at, clock.as_ref()) {
                    break;
                }
            }
        }));
        debug!(%started_at, "elapsed ticker started");
    }

    /// Cancels the running ticker and resets the display to zero.
    pub fn stop(&mut self) {
        let was_running = self.handle.is_some();
        self.cancel();
        self.display.send_replace(ZERO_ELAPSED.to_string());
        if was_running {
            debug!("elapsed ticker stopped");
        }
    }

    fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Default for ElapsedTimeTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ElapsedTimeTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Returns false once the run identified by `generation` has been superseded.
fn publish(
    display: &watch::Sender<String>,
    current: &AtomicU64,
    generation: u64,
    started_at: NaiveDateTime,
    clock: &dyn Clock,
) -> bool {
    let mut live = true;
    display.send_if_modified(|value| {
        // checked under the channel lock, so `stop` cannot interleave
        if current.load(Ordering::SeqCst) != generation {
            live = false;
            return false;
        }
        let next = format_elapsed(clock.now() - started_at);
        if *value == next {
            return false;
        }
        *value = next;
        true
    });
    live
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::clock::ManualClock;
    use chrono::NaiveDate;

    fn nine_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    async fn one_period() {
        tokio::time::sleep(TICK_PERIOD + Duration::from_millis(10)).await;
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_elapsed(chrono::Duration::seconds(0)), "00:00:00");
        assert_eq!(format_elapsed(chrono::Duration::seconds(3_725)), "01:02:05");
        assert_eq!(format_elapsed(chrono::Duration::hours(27)), "27:00:00");
    }

    #[test]
    fn negative_elapsed_clamps_to_zero() {
        assert_eq!(format_elapsed(chrono::Duration::seconds(-30)), "00:00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_immediately_on_start() {
        let clock = Arc::new(ManualClock::at(nine_am() + chrono::Duration::minutes(90)));
        let mut ticker = ElapsedTimeTicker::new();

        ticker.start(nine_am(), clock);

        assert_eq!(ticker.current(), "01:30:00");
        assert!(ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn republishes_every_period() {
        let clock = Arc::new(ManualClock::at(nine_am()));
        let mut ticker = ElapsedTimeTicker::new();
        ticker.start(nine_am(), clock.clone());

        clock.advance(chrono::Duration::seconds(1));
        one_period().await;
        assert_eq!(ticker.current(), "00:00:01");

        clock.advance(chrono::Duration::seconds(1));
        one_period().await;
        assert_eq!(ticker.current(), "00:00:02");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_resets_and_silences() {
        let clock = Arc::new(ManualClock::at(nine_am()));
        let mut ticker = ElapsedTimeTicker::new();
        ticker.start(nine_am(), clock.clone());
        clock.advance(chrono::Duration::seconds(5));
        one_period().await;

        ticker.stop();
        assert_eq!(ticker.current(), ZERO_ELAPSED);
        assert!(!ticker.is_running());

        clock.advance(chrono::Duration::seconds(5));
        one_period().await;
        one_period().await;
        assert_eq!(ticker.current(), ZERO_ELAPSED);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_running_ticker() {
        let clock = Arc::new(ManualClock::at(nine_am() + chrono::Duration::hours(2)));
        let mut ticker = ElapsedTimeTicker::new();
        let mut updates = ticker.subscribe();

        ticker.start(nine_am(), clock.clone());
        ticker.start(nine_am() + chrono::Duration::hours(1), clock.clone());
        assert_eq!(ticker.current(), "01:00:00");
        updates.borrow_and_update();

        // only the second run may publish; the first would write 02:00:01
        clock.advance(chrono::Duration::seconds(1));
        one_period().await;
        assert_eq!(ticker.current(), "01:00:01");
        assert!(updates.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_run() {
        let clock = Arc::new(ManualClock::at(nine_am()));
        let mut ticker = ElapsedTimeTicker::new();
        let updates = ticker.subscribe();
        ticker.start(nine_am(), clock.clone());

        drop(ticker);
        clock.advance(chrono::Duration::seconds(3));
        one_period().await;

        assert_eq!(*updates.borrow(), ZERO_ELAPSED);
    }
}
