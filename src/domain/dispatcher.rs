//! Periodic command dispatch.
//!
//! Every tick re-asserts the command for the active zone. The vehicle keeps
//! acting on the last byte it saw, so a lost write is simply repeated on the
//! next tick.

use crate::domain::active_zone::ActiveZone;
use crate::domain::link::{Link, LinkError};
use crate::domain::zone::Zone;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(90);

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    Idle,
    Sent { zone: Zone, byte: u8 },
    Skipped { zone: Zone, error: LinkError },
}

#[derive(Debug, Default)]
pub struct DispatchStats {
    ticks: AtomicU64,
    sent: AtomicU64,
    skipped: AtomicU64,
}

impl DispatchStats {
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

pub struct CommandDispatcher {
    zone: Arc<ActiveZone>,
    link: Arc<dyn Link>,
    stats: Arc<DispatchStats>,
}

impl CommandDispatcher {
    pub fn new(zone: Arc<ActiveZone>, link: Arc<dyn Link>) -> Self {
        Self {
            zone,
            link,
            stats: Arc::new(DispatchStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<DispatchStats> {
        self.stats.clone()
    }

    /// Run one tick. Link errors stop here.
    pub fn tick(&self) -> TickOutcome {
        self.stats.ticks.fetch_add(1, Ordering::Relaxed);

        let zone = self.zone.get();
        let Some(byte) = zone.command_byte() else {
            return TickOutcome::Idle;
        };

        match self.link.write(&[byte]) {
            Ok(()) => {
                self.stats.sent.fetch_add(1, Ordering::Relaxed);
                trace!("Sent {:?} for {}", byte as char, zone);
                TickOutcome::Sent { zone, byte }
            }
            Err(error) => {
                self.stats.skipped.fetch_add(1, Ordering::Relaxed);
                trace!("Skipped {} tick: {}", zone, error);
                TickOutcome::Skipped { zone, error }
            }
        }
    }

    /// Start ticking every `period` on `runtime`, first tick immediately.
    pub fn spawn(self, period: Duration, runtime: &Handle) -> DispatcherHandle {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let stats = self.stats.clone();
        let dispatcher = Arc::new(self);

        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Late ticks are caught up, as a fixed-rate timer would.
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel_rx.changed() => break,
                    _ = interval.tick() => {
                        if *cancel_rx.borrow() {
                            break;
                        }
                        // Device writes block, so they run off the async workers.
                        let dispatcher = dispatcher.clone();
                        if let Err(e) = tokio::task::spawn_blocking(move || dispatcher.tick()).await {
                            warn!("Dispatch tick failed: {}", e);
                        }
                    }
                }
            }
            debug!("Command dispatcher stopped");
        });

        debug!("Command dispatcher started, period {:?}", period);
        DispatcherHandle {
            cancel: cancel_tx,
            task: Some(task),
            stats,
        }
    }
}

/// Owner of a running dispatcher. Dropping it cancels the timer.
pub struct DispatcherHandle {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    stats: Arc<DispatchStats>,
}

impl DispatcherHandle {
    /// Stop scheduling ticks. A tick already running is allowed to finish.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Cancel and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for DispatcherHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::link::LinkState;
    use crate::infrastructure::link::recording::RecordingLink;

    #[derive(Default)]
    struct ThreadRecordingLink {
        threads: std::sync::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl Link for ThreadRecordingLink {
        fn connection_state(&self) -> LinkState {
            LinkState::Connected
        }

        fn write(&self, _bytes: &[u8]) -> Result<(), LinkError> {
            self.threads
                .lock()
                .unwrap()
                .push(std::thread::current().id());
            Ok(())
        }

        fn device_name(&self) -> Option<String> {
            None
        }

        fn close(&self) {}
    }

    fn setup(link: &Arc<RecordingLink>) -> (CommandDispatcher, Arc<ActiveZone>) {
        let zone = Arc::new(ActiveZone::new());
        let link: Arc<dyn Link> = link.clone();
        (CommandDispatcher::new(zone.clone(), link), zone)
    }

    #[test]
    fn test_tick_writes_command_for_active_zone() {
        let link = Arc::new(RecordingLink::connected());
        let (dispatcher, zone) = setup(&link);
        zone.replace(Zone::Up);

        assert!(matches!(
            dispatcher.tick(),
            TickOutcome::Sent {
                zone: Zone::Up,
                byte: b'c'
            }
        ));
        assert_eq!(link.writes(), vec![vec![b'c']]);
    }

    #[test]
    fn test_idle_tick_writes_nothing_in_any_state() {
        for state in [
            LinkState::Connected,
            LinkState::Connecting,
            LinkState::Disconnected,
        ] {
            let link = Arc::new(RecordingLink::connected());
            link.set_state(state);
            let (dispatcher, _zone) = setup(&link);

            assert!(matches!(dispatcher.tick(), TickOutcome::Idle));
            assert!(link.writes().is_empty());
            assert_eq!(link.attempts(), 0);
        }
    }

    #[test]
    fn test_disconnect_skips_then_resumes() {
        let link = Arc::new(RecordingLink::connected());
        let (dispatcher, zone) = setup(&link);
        zone.replace(Zone::Right);

        dispatcher.tick();
        link.set_state(LinkState::Disconnected);
        for _ in 0..3 {
            assert!(matches!(
                dispatcher.tick(),
                TickOutcome::Skipped {
                    error: LinkError::NotConnected,
                    ..
                }
            ));
        }
        link.set_state(LinkState::Connected);
        dispatcher.tick();

        assert_eq!(link.bytes(), b"dd".to_vec());
        let stats = dispatcher.stats();
        assert_eq!(stats.ticks(), 5);
        assert_eq!(stats.sent(), 2);
        assert_eq!(stats.skipped(), 3);
    }

    #[test]
    fn test_repeated_ticks_are_independent_writes() {
        let link = Arc::new(RecordingLink::connected());
        let (dispatcher, zone) = setup(&link);
        zone.replace(Zone::TurboUpLeft);

        for _ in 0..4 {
            dispatcher.tick();
        }
        assert_eq!(link.writes(), vec![vec![b'x']; 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_dispatcher_ticks_at_period() {
        let link = Arc::new(RecordingLink::connected());
        let (dispatcher, zone) = setup(&link);
        zone.replace(Zone::Down);

        let handle = dispatcher.spawn(DEFAULT_TICK_PERIOD, &Handle::current());
        // Ticks at 0, 90, 180, 270 and 360 ms.
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(link.bytes(), b"aaaaa".to_vec());
        assert_eq!(handle.stats().sent(), 5);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_cancel() {
        let link = Arc::new(RecordingLink::connected());
        let (dispatcher, zone) = setup(&link);
        zone.replace(Zone::Left);

        let handle = dispatcher.spawn(DEFAULT_TICK_PERIOD, &Handle::current());
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        assert!(handle.is_cancelled());
        let sent = link.writes().len();

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(link.writes().len(), sent);
        assert_eq!(sent, 2);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels() {
        let link = Arc::new(RecordingLink::connected());
        let (dispatcher, zone) = setup(&link);
        zone.replace(Zone::UpRight);

        let handle = dispatcher.spawn(DEFAULT_TICK_PERIOD, &Handle::current());
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(link.bytes(), b"3".to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn test_writes_run_off_the_runtime_thread() {
        let link = Arc::new(ThreadRecordingLink::default());
        let zone = Arc::new(ActiveZone::new());
        zone.replace(Zone::Up);
        let dyn_link: Arc<dyn Link> = link.clone();

        let handle =
            CommandDispatcher::new(zone, dyn_link).spawn(DEFAULT_TICK_PERIOD, &Handle::current());
        // Ticks at 0, 90 and 180 ms.
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.shutdown().await;

        let runtime_thread = std::thread::current().id();
        let threads = link.threads.lock().unwrap();
        assert_eq!(threads.len(), 3);
        assert!(threads.iter().all(|id| *id != runtime_thread));
    }
}
