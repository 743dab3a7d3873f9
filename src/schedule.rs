//! Scheduling policies that decide when a producer recomputes its slot
//!
//! Every policy exposes one blocking operation, `wait_for_trigger`, which
//! returns how many updates the producer owes its slot. Interval policies
//! always return one; a file watch returns one per close-after-write event it
//! drained.

use crate::error::{IronStatusError, Result};
use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// The closed set of scheduling policies
pub enum Schedule {
    Every(FixedInterval),
    Aligned(AlignedInterval),
    Watch(WatchTrigger),
}

impl Schedule {
    /// Block until the next trigger.
    ///
    /// # Errors
    ///
    /// Only a file watch can fail, when its notification channel breaks.
    pub fn wait_for_trigger(&mut self) -> Result<usize> {
        match self {
            Schedule::Every(fixed) => Ok(fixed.wait_for_trigger()),
            Schedule::Aligned(aligned) => Ok(aligned.wait_for_trigger()),
            Schedule::Watch(watch) => watch.wait_for_trigger(),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Every(fixed) => write!(f, "every {:?}", fixed.period),
            Schedule::Aligned(aligned) => write!(
                f,
                "every {}s aligned on {}",
                aligned.interval, aligned.epoch
            ),
            Schedule::Watch(watch) => write!(f, "on write to {}", watch.path().display()),
        }
    }
}

/// Sleep until the monotonic `deadline`, re-arming after any early wakeup.
pub fn sleep_until(deadline: Instant) {
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(deadline - now);
    }
}

/// Longest single wait on the monotonic clock; longer periods are clamped
pub const MAX_WAIT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// `start + period`, clamped to [`MAX_WAIT`] so it cannot overflow
#[must_use]
pub fn deadline_after(start: Instant, period: Duration) -> Instant {
    start.checked_add(period.min(MAX_WAIT)).unwrap_or(start)
}

/// Fires every `period`, measured on the monotonic clock
#[derive(Debug, Clone)]
pub struct FixedInterval {
    period: Duration,
}

impl FixedInterval {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn wait_for_trigger(&mut self) -> usize {
        sleep_until(deadline_after(Instant::now(), self.period));
        1
    }
}

/// Source of wall-clock time for aligned schedules
pub trait WallClock: Send {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;

    fn sleep(&self, duration: Duration);
}

/// The real system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// First aligned instant strictly after `now`, in `(now, now + interval]`.
///
/// All values are Unix seconds. `now` may be before `epoch`.
#[must_use]
pub fn first_aligned_wake(now: i64, epoch: i64, interval: i64) -> i64 {
    now.saturating_add(interval - now.saturating_sub(epoch).rem_euclid(interval))
}

/// Next aligned instant after a wake that was scheduled for `scheduled`.
///
/// Normally this is `scheduled + interval`. When the clock has already moved
/// past that (suspend, clock jump) the next instant is derived from `now`
/// instead, keeping the same alignment, so missed instants are skipped rather
/// than fired in a burst.
#[must_use]
pub fn next_aligned_wake(scheduled: i64, now: i64, interval: i64) -> i64 {
    let next = scheduled.saturating_add(interval);
    if next > now {
        return next;
    }
    now.saturating_add(interval - now.saturating_sub(next).rem_euclid(interval))
}

/// Fires on the wall-clock instants `epoch + k * interval`
pub struct AlignedInterval {
    epoch: i64,
    interval: i64,
    next_wake: Option<i64>,
    clock: Box<dyn WallClock>,
}

impl AlignedInterval {
    /// # Panics
    ///
    /// Panics if `interval` is zero; configuration validation rejects that.
    #[must_use]
    pub fn new(epoch: i64, interval: u64) -> Self {
        Self::with_clock(epoch, interval, Box::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(epoch: i64, interval: u64, clock: Box<dyn WallClock>) -> Self {
        assert!(interval > 0, "aligned interval must be positive");
        Self {
            epoch,
            interval: i64::try_from(interval).unwrap_or(i64::MAX),
            next_wake: None,
            clock,
        }
    }

    /// The instant (Unix seconds) the next trigger is scheduled for, once known
    #[must_use]
    pub fn next_wake(&self) -> Option<i64> {
        self.next_wake
    }

    pub fn wait_for_trigger(&mut self) -> usize {
        let (epoch, interval) = (self.epoch, self.interval);
        let now = self.clock.now_millis().div_euclid(1000);
        let target = *self
            .next_wake
            .get_or_insert_with(|| first_aligned_wake(now, epoch, interval));

        self.sleep_until_wall(target);

        let now = self.clock.now_millis().div_euclid(1000);
        let next = next_aligned_wake(target, now, self.interval);
        if next != target.saturating_add(self.interval) {
            debug!(target, now, next, "clock jumped past aligned wake, realigning");
        }
        self.next_wake = Some(next);
        1
    }

    fn sleep_until_wall(&self, target_secs: i64) {
        let target_ms = target_secs.saturating_mul(1000);
        loop {
            let remaining = target_ms.saturating_sub(self.clock.now_millis());
            if remaining <= 0 {
                return;
            }
            self.clock
                .sleep(Duration::from_millis(remaining.unsigned_abs()));
        }
    }
}

/// Fires once per close-after-write event on one path
pub struct WatchTrigger {
    path: PathBuf,
    events: Receiver<notify::Result<Event>>,
    _watcher: Option<RecommendedWatcher>,
}

impl WatchTrigger {
    /// Install a non-recursive watch on `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS watcher cannot be created or the path cannot
    /// be watched (for example because it does not exist).
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (event_tx, event_rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(move |event| {
            if event_tx.send(event).is_err() {
                debug!("watch event dropped because producer channel is closed");
            }
        })?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        debug!(path = %path.display(), "installed file watch");

        Ok(Self {
            path,
            events: event_rx,
            _watcher: Some(watcher),
        })
    }

    /// Build a trigger over an existing event channel, without an OS watch.
    #[must_use]
    pub fn from_receiver(
        path: impl Into<PathBuf>,
        events: Receiver<notify::Result<Event>>,
    ) -> Self {
        Self {
            path: path.into(),
            events,
            _watcher: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until at least one close-after-write event arrives, then drain
    /// everything already queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher reports an error or its channel closes.
    pub fn wait_for_trigger(&mut self) -> Result<usize> {
        loop {
            let first = self.events.recv().map_err(|_| self.closed())?;
            let mut triggers = self.count_triggers(first)?;

            loop {
                match self.events.try_recv() {
                    Ok(event) => triggers += self.count_triggers(event)?,
                    // A closed channel surfaces on the next blocking recv,
                    // after the writes already drained have been delivered.
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }

            if triggers > 0 {
                return Ok(triggers);
            }
            trace!(path = %self.path.display(), "ignoring non-write events");
        }
    }

    fn count_triggers(&self, event: notify::Result<Event>) -> Result<usize> {
        let event = event?;
        Ok(usize::from(is_close_write(&event)))
    }

    fn closed(&self) -> IronStatusError {
        IronStatusError::Generic(format!(
            "watch channel for {} closed",
            self.path.display()
        ))
    }
}

/// Whether the event is a "closed after write" notification
#[must_use]
pub fn is_close_write(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use std::sync::{Arc, Mutex};

    const EPOCH: i64 = 1_592_384_460;

    /// Clock whose sleeps advance time instantly, with optional jumps
    struct FakeClock {
        now_ms: Arc<Mutex<i64>>,
        sleeps: Arc<Mutex<Vec<Duration>>>,
    }

    impl WallClock for FakeClock {
        fn now_millis(&self) -> i64 {
            *self.now_ms.lock().unwrap()
        }

        fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
            *self.now_ms.lock().unwrap() += i64::try_from(duration.as_millis()).unwrap();
        }
    }

    fn fake_clock(start_secs: i64) -> (FakeClock, Arc<Mutex<i64>>, Arc<Mutex<Vec<Duration>>>) {
        let now_ms = Arc::new(Mutex::new(start_secs * 1000));
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        let clock = FakeClock {
            now_ms: Arc::clone(&now_ms),
            sleeps: Arc::clone(&sleeps),
        };
        (clock, now_ms, sleeps)
    }

    fn close_write() -> notify::Result<Event> {
        Ok(Event::new(EventKind::Access(AccessKind::Close(AccessMode::Write))))
    }

    #[test]
    fn test_first_aligned_wake_within_interval() {
        for offset in [0, 1, 30, 59, 60, 61, 3_599] {
            let now = EPOCH + offset;
            let wake = first_aligned_wake(now, EPOCH, 60);
            assert!(wake > now && wake <= now + 60, "offset {offset}");
            assert_eq!((wake - EPOCH).rem_euclid(60), 0);
        }
    }

    #[test]
    fn test_first_aligned_wake_before_epoch() {
        let now = EPOCH - 90;
        let wake = first_aligned_wake(now, EPOCH, 60);
        assert_eq!(wake, EPOCH - 60);
    }

    #[test]
    fn test_next_aligned_wake_advances_from_schedule() {
        let scheduled = EPOCH + 600;
        // Woke a little late: next is still relative to the scheduled instant.
        assert_eq!(next_aligned_wake(scheduled, scheduled + 2, 60), scheduled + 60);
    }

    #[test]
    fn test_next_aligned_wake_after_clock_jump() {
        let scheduled = EPOCH + 600;
        let now = scheduled + 3_600 * 5 + 17;
        let next = next_aligned_wake(scheduled, now, 60);
        assert!(next > now && next <= now + 60);
        assert_eq!((next - EPOCH).rem_euclid(60), 0);
    }

    #[test]
    fn test_next_aligned_wake_exactly_on_boundary() {
        let scheduled = EPOCH + 600;
        let now = scheduled + 60;
        assert_eq!(next_aligned_wake(scheduled, now, 60), now + 60);
    }

    #[test]
    fn test_aligned_interval_fires_on_schedule() {
        let start = EPOCH + 1_000_000 + 13;
        let (clock, now_ms, _) = fake_clock(start);
        let mut aligned = AlignedInterval::with_clock(EPOCH, 60, Box::new(clock));

        assert_eq!(aligned.wait_for_trigger(), 1);
        let first = *now_ms.lock().unwrap() / 1000;
        assert!(first > start && first <= start + 60);
        assert_eq!((first - EPOCH).rem_euclid(60), 0);

        aligned.wait_for_trigger();
        assert_eq!(*now_ms.lock().unwrap() / 1000, first + 60);
        aligned.wait_for_trigger();
        assert_eq!(*now_ms.lock().unwrap() / 1000, first + 120);
    }

    #[test]
    fn test_aligned_interval_late_wake_keeps_schedule() {
        let start = EPOCH + 5;
        let (clock, now_ms, _) = fake_clock(start);
        let mut aligned = AlignedInterval::with_clock(EPOCH, 60, Box::new(clock));

        aligned.wait_for_trigger();
        let first = *now_ms.lock().unwrap() / 1000;
        // Simulate the trigger handler taking a few seconds.
        *now_ms.lock().unwrap() += 4_000;
        aligned.wait_for_trigger();
        assert_eq!(*now_ms.lock().unwrap() / 1000, first + 60);
    }

    #[test]
    fn test_aligned_interval_realigns_after_jump_without_burst() {
        let start = EPOCH + 7;
        let (clock, now_ms, sleeps) = fake_clock(start);
        let mut aligned = AlignedInterval::with_clock(EPOCH, 60, Box::new(clock));

        aligned.wait_for_trigger();
        let first = *now_ms.lock().unwrap() / 1000;

        // Suspend for several hours right after the trigger.
        *now_ms.lock().unwrap() += 6 * 3_600 * 1000 + 25_000;
        let resumed = *now_ms.lock().unwrap() / 1000;

        // The wake scheduled before suspend fires once, immediately.
        sleeps.lock().unwrap().clear();
        aligned.wait_for_trigger();
        assert!(sleeps.lock().unwrap().is_empty());
        assert_eq!(*now_ms.lock().unwrap() / 1000, resumed);

        // The next one lands on the first boundary after resume, not on first + 120.
        let next = aligned.next_wake().unwrap();
        assert!(next > resumed && next <= resumed + 60);
        assert_ne!(next, first + 120);
        assert_eq!((next - EPOCH).rem_euclid(60), 0);

        aligned.wait_for_trigger();
        assert_eq!(*now_ms.lock().unwrap() / 1000, next);
    }

    #[test]
    fn test_fixed_interval_waits_full_period() {
        let mut fixed = FixedInterval::new(Duration::from_millis(30));
        let started = Instant::now();
        assert_eq!(fixed.wait_for_trigger(), 1);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_sleep_until_past_deadline_returns() {
        let started = Instant::now();
        sleep_until(started);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_deadline_after_clamps_huge_periods() {
        let start = Instant::now();
        assert_eq!(
            deadline_after(start, Duration::from_secs(5)),
            start + Duration::from_secs(5)
        );
        assert_eq!(
            deadline_after(start, Duration::from_secs(i64::MAX.unsigned_abs())),
            start + MAX_WAIT
        );
    }

    #[test]
    fn test_aligned_wakes_saturate_instead_of_overflowing() {
        let now = EPOCH + 42;
        assert_eq!(first_aligned_wake(now, 0, i64::MAX), i64::MAX);
        let far_epoch = first_aligned_wake(now, i64::MIN, 60);
        assert!(far_epoch > now && far_epoch <= now + 60);
        assert_eq!(next_aligned_wake(i64::MAX - 5, now, 60), i64::MAX);
    }

    #[test]
    fn test_aligned_interval_with_huge_interval() {
        let (clock, _, _) = fake_clock(EPOCH);
        let mut aligned = AlignedInterval::with_clock(0, i64::MAX.unsigned_abs(), Box::new(clock));
        assert_eq!(aligned.wait_for_trigger(), 1);
        assert_eq!(aligned.next_wake(), Some(i64::MAX));
    }

    #[test]
    fn test_watch_counts_each_close_write() {
        let (tx, rx) = mpsc::channel();
        let mut watch = WatchTrigger::from_receiver("/tmp/volume", rx);

        tx.send(close_write()).unwrap();
        tx.send(Ok(Event::new(EventKind::Modify(ModifyKind::Any)))).unwrap();
        tx.send(close_write()).unwrap();
        tx.send(close_write()).unwrap();

        assert_eq!(watch.wait_for_trigger().unwrap(), 3);
    }

    #[test]
    fn test_watch_ignores_wakes_without_writes() {
        let (tx, rx) = mpsc::channel();
        let mut watch = WatchTrigger::from_receiver("/tmp/volume", rx);

        tx.send(Ok(Event::new(EventKind::Create(CreateKind::File)))).unwrap();
        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            tx.send(close_write()).unwrap();
            tx
        });

        assert_eq!(watch.wait_for_trigger().unwrap(), 1);
        drop(sender.join().unwrap());
    }

    #[test]
    fn test_watch_error_is_fatal() {
        let (tx, rx) = mpsc::channel();
        let mut watch = WatchTrigger::from_receiver("/tmp/volume", rx);

        tx.send(Err(notify::Error::generic("inotify read failed"))).unwrap();
        assert!(matches!(
            watch.wait_for_trigger(),
            Err(IronStatusError::Watch(_))
        ));
    }

    #[test]
    fn test_watch_closed_channel_is_fatal() {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watch = WatchTrigger::from_receiver("/tmp/volume", rx);
        drop(tx);
        assert!(matches!(
            watch.wait_for_trigger(),
            Err(IronStatusError::Generic(_))
        ));
    }

    #[test]
    fn test_watch_missing_path_fails_setup() {
        let dir = tempfile::tempdir().unwrap();
        let result = WatchTrigger::new(dir.path().join("does-not-exist"));
        assert!(result.is_err());
    }

    #[test]
    fn test_schedule_display() {
        let every = Schedule::Every(FixedInterval::from_secs(5));
        assert_eq!(every.to_string(), "every 5s");
        let aligned = Schedule::Aligned(AlignedInterval::new(EPOCH, 60));
        assert_eq!(aligned.to_string(), "every 60s aligned on 1592384460");
        let (_tx, rx) = mpsc::channel();
        let watch = Schedule::Watch(WatchTrigger::from_receiver("/tmp/volume", rx));
        assert_eq!(watch.to_string(), "on write to /tmp/volume");
    }
}
