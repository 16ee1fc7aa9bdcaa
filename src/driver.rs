//! Threaded session driver for native builds
//!
//! A worker thread owns the `Session` and is the only thing that touches
//! it. Keys and control commands arrive on one queue and are applied in
//! order between ticks, so `tick` and key resolution never overlap.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::session::Session;
use crate::sim::GameMode;
use crate::snapshot::SessionSnapshot;

/// Ticks the worker may fall behind before it stops catching up
const MAX_LAG_TICKS: u32 = 5;

/// Commands applied per tick once a tick is overdue
const MAX_COMMANDS_PER_TICK: u32 = 64;

/// Messages for the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Key(char),
    Unlock,
    /// Abandon the run
    Exit,
    /// Shut the worker down and hand the session back
    Stop,
}

pub struct SessionDriver {
    commands: Sender<Command>,
    snapshots: Receiver<SessionSnapshot>,
    worker: Option<JoinHandle<Session>>,
}

impl SessionDriver {
    /// Start a run and hand the session to a worker thread
    pub fn spawn(mut session: Session, mode: GameMode) -> std::io::Result<Self> {
        session.start(mode);

        let (cmd_tx, cmd_rx) = mpsc::channel();
        // One slot: a slow reader sees the newest snapshot it has room for
        let (snap_tx, snap_rx) = mpsc::sync_channel(1);
        let worker = thread::Builder::new()
            .name("sucheng-session".into())
            .spawn(move || Worker::new(session).run(cmd_rx, snap_tx))?;

        Ok(Self {
            commands: cmd_tx,
            snapshots: snap_rx,
            worker: Some(worker),
        })
    }

    /// Queue a key press. False once the worker is gone.
    pub fn send_key(&self, key: char) -> bool {
        self.send(Command::Key(key))
    }

    pub fn unlock(&self) -> bool {
        self.send(Command::Unlock)
    }

    pub fn exit(&self) -> bool {
        self.send(Command::Exit)
    }

    fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Snapshots as ticks complete. Ticks that find the slot still full
    /// publish nothing.
    pub fn snapshots(&self) -> &Receiver<SessionSnapshot> {
        &self.snapshots
    }

    /// Snapshot waiting in the slot, if any
    pub fn latest(&self) -> Option<SessionSnapshot> {
        self.snapshots.try_iter().last()
    }

    /// True once the worker has returned (game over, exit or stop)
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(|w| w.is_finished())
    }

    /// Stop the worker and take the session back. Later calls return `None`.
    pub fn stop(&mut self) -> Option<Session> {
        let worker = self.worker.take()?;
        // Already gone if the run ended
        let _ = self.commands.send(Command::Stop);
        match worker.join() {
            Ok(session) => Some(session),
            Err(_) => {
                log::error!("Session worker panicked");
                None
            }
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker-side pacing around the owned session
struct Worker {
    session: Session,
    tick_ms: u64,
    period: Duration,
    deadline: Instant,
    /// Commands applied since the last tick
    handled: u32,
}

impl Worker {
    fn new(session: Session) -> Self {
        let tick_ms = session.settings().tick_ms();
        let period = Duration::from_millis(tick_ms);
        Self {
            session,
            tick_ms,
            period,
            deadline: Instant::now() + period,
            handled: 0,
        }
    }

    /// An overdue tick that has waited out a full batch of commands
    fn must_tick(&self, now: Instant) -> bool {
        now >= self.deadline && self.handled >= MAX_COMMANDS_PER_TICK
    }

    /// Apply one command. False means shut down.
    fn apply(&mut self, command: Command) -> bool {
        self.handled += 1;
        match command {
            Command::Key(key) => {
                self.session.on_key(key);
            }
            Command::Unlock => self.session.unlock(),
            Command::Exit => self.session.on_exit(),
            Command::Stop => return false,
        }
        true
    }

    fn tick(&mut self) {
        self.session.tick(self.tick_ms);
        self.handled = 0;
        self.deadline += self.period;

        let now = Instant::now();
        if now > self.deadline + self.period * MAX_LAG_TICKS {
            log::warn!("Session worker fell behind, skipping ticks");
            self.deadline = now + self.period;
        }
    }

    fn run(mut self, commands: Receiver<Command>, snapshots: SyncSender<SessionSnapshot>) -> Session {
        log::debug!("Session worker running at {} ms per tick", self.tick_ms);

        while self.session.is_running() {
            let now = Instant::now();
            if self.must_tick(now) {
                self.tick();
                let _ = snapshots.try_send(self.session.snapshot());
                continue;
            }

            match commands.recv_timeout(self.deadline.saturating_duration_since(now)) {
                Ok(command) => {
                    if !self.apply(command) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    self.tick();
                    // Full slot or nobody watching: drop this one
                    let _ = snapshots.try_send(self.session.snapshot());
                }
            }
        }

        let _ = snapshots.try_send(self.session.snapshot());
        log::debug!("Session worker finished in {:?}", self.session.phase());
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPhase;
    use crate::settings::Settings;

    fn fast_session(seed: u64) -> Session {
        Session::with_settings(
            seed,
            Settings {
                tick_ms: 1,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_publishes_snapshots_and_stops() {
        let mut driver = SessionDriver::spawn(fast_session(1), GameMode::RootDrill).expect("spawn");
        let first = driver
            .snapshots()
            .recv_timeout(Duration::from_secs(5))
            .expect("snapshot");
        assert_eq!(first.phase, SessionPhase::Running);
        assert_eq!(first.mode, Some(GameMode::RootDrill));

        let session = driver.stop().expect("session back");
        assert!(session.is_running());
        assert!(driver.stop().is_none());
        assert!(driver.is_finished());
    }

    #[test]
    fn test_unread_snapshots_do_not_pile_up() {
        let mut driver = SessionDriver::spawn(fast_session(5), GameMode::RootDrill).expect("spawn");
        thread::sleep(Duration::from_millis(200));
        assert!(driver.snapshots().try_iter().count() <= 1);

        // The worker kept ticking while nobody read
        let session = driver.stop().expect("session back");
        let time_ms = session.state().map_or(0, |s| s.time_ms);
        assert!(time_ms > 10, "only {time_ms} ms simulated");
    }

    #[test]
    fn test_keys_reach_the_session() {
        let mut driver = SessionDriver::spawn(fast_session(2), GameMode::RootDrill).expect("spawn");
        let key = loop {
            let snap = driver
                .snapshots()
                .recv_timeout(Duration::from_secs(5))
                .expect("snapshot");
            if let Some(target) = snap.targets.first() {
                break target.code.chars().next().expect("root code");
            }
        };
        assert!(driver.send_key(key));

        // Wait for the defeat to show up in a snapshot
        loop {
            let snap = driver
                .snapshots()
                .recv_timeout(Duration::from_secs(5))
                .expect("snapshot");
            if snap.score > 0 {
                assert_eq!(snap.score, 50);
                break;
            }
        }
        let session = driver.stop().expect("session back");
        assert_eq!(session.state().map(|s| s.score), Some(50));
    }

    #[test]
    fn test_exit_ends_the_worker() {
        let mut driver = SessionDriver::spawn(fast_session(3), GameMode::WordChallenge).expect("spawn");
        assert!(driver.exit());

        // Drain until the worker drops its sender
        for _ in driver.snapshots().iter() {}
        assert!(!driver.send_key('A'));

        let session = driver.stop().expect("session back");
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_key_flood_cannot_starve_ticks() {
        let mut session = fast_session(4);
        session.start(GameMode::WordChallenge);
        let mut worker = Worker::new(session);
        worker.deadline = Instant::now();

        for _ in 0..MAX_COMMANDS_PER_TICK - 1 {
            assert!(worker.apply(Command::Key('1')));
        }
        assert!(!worker.must_tick(Instant::now()));
        assert!(worker.apply(Command::Key('1')));
        assert!(worker.must_tick(Instant::now()));

        worker.tick();
        assert_eq!(worker.handled, 0);
        assert_eq!(worker.session.state().map(|s| s.time_ms), Some(1));
        assert!(!worker.apply(Command::Stop));
    }
}
