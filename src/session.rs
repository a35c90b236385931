//! The surface the host (renderer, input, audio) talks to.
//!
//! A [`Session`] owns the game state, the upgrade trees and the bowl, and
//! wires them to a save store and a clock. Everything runs on the host's
//! single update thread: purchases, ticks and saves never interleave.

use crate::config::Config;
use crate::error::SaveError;
use crate::logic::{self, Rainfall, TickOutcome};
use crate::save::{self, OfflineResult};
use crate::state::GameState;
use crate::storage::{default_store, SaveStore};
use crate::time::{Clock, FrameClock, SystemClock};
use crate::upgrades::manager::UpgradeManager;
use crate::upgrades::TreeId;

/// Result of advancing a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub tick: TickOutcome,
    /// Enough play time has passed since the last save; the host should
    /// call [`Session::save`] when convenient.
    pub autosave_due: bool,
}

pub struct Session<S = Box<dyn SaveStore>, C = SystemClock> {
    state: GameState,
    upgrades: UpgradeManager,
    rain: Rainfall,
    store: S,
    clock: C,
    config: Config,
    frame_clock: FrameClock,
    since_save_secs: f64,
    loaded: bool,
}

impl Session {
    /// Session on the platform's default store and the system clock.
    pub fn new(config: Config) -> Self {
        let store = default_store(&config);
        Session::with_parts(config, store, SystemClock)
    }
}

impl<S: SaveStore, C: Clock> Session<S, C> {
    pub fn with_parts(config: Config, store: S, clock: C) -> Self {
        Self {
            state: GameState::new(),
            upgrades: UpgradeManager::new(),
            rain: Rainfall::new(),
            store,
            clock,
            config,
            frame_clock: FrameClock::new(),
            since_save_secs: 0.0,
            loaded: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn upgrades(&self) -> &UpgradeManager {
        &self.upgrades
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn currency(&self) -> u64 {
        self.state.currency
    }

    pub fn drops_to_fill(&self) -> u32 {
        self.state.drops_to_fill
    }

    pub fn fall_speed(&self) -> f64 {
        self.state.fall_speed
    }

    pub fn rps(&self) -> f64 {
        self.state.rps
    }

    pub fn cps(&self) -> f64 {
        self.state.cps
    }

    pub fn currency_per_conversion(&self) -> u64 {
        self.state.currency_per_conversion
    }

    /// Drops currently sitting in the bowl.
    pub fn drops_collected(&self) -> u32 {
        self.rain.drops_collected
    }

    /// Buy tier `index` (0-based) of `tree`. Returns true if successful.
    pub fn try_purchase(&mut self, tree: TreeId, index: usize) -> bool {
        let bought = self.upgrades.try_purchase(tree, index, &mut self.state);
        if bought {
            self.rain.sync_bowl(&self.state);
        }
        bought
    }

    /// A falling drop reached the bowl. Returns true if it completed a conversion.
    pub fn collect_drop(&mut self) -> bool {
        logic::collect_drop(&mut self.rain, &mut self.state)
    }

    /// Advance auto-rain and passive income by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f64) -> FrameReport {
        let tick = logic::tick(&mut self.rain, &mut self.state, delta_secs);
        let mut autosave_due = false;
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.since_save_secs += delta_secs;
            if self.since_save_secs >= self.config.autosave_interval_secs {
                self.since_save_secs = 0.0;
                autosave_due = true;
            }
        }
        FrameReport { tick, autosave_due }
    }

    /// Advance by the time since the previous frame, given the host's
    /// monotonic timestamp in milliseconds.
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        let delta = self.frame_clock.update(now_ms);
        self.tick(delta)
    }

    /// Persist the session. Failures are logged and returned; the session
    /// keeps running either way.
    pub fn save(&mut self) -> Result<(), SaveError> {
        self.since_save_secs = 0.0;
        save::save(&self.store, &self.clock, &self.state, &self.upgrades)
    }

    /// Restore the last save and credit offline progress. Only the first
    /// call in a session does anything.
    pub fn load(&mut self) -> OfflineResult {
        if self.loaded {
            log::warn!("session already loaded, ignoring repeated load");
            return OfflineResult::none();
        }
        self.loaded = true;
        let result = save::load(
            &self.store,
            &self.clock,
            self.config.max_offline_seconds,
            &mut self.state,
            &mut self.upgrades,
        );
        self.rain.sync_bowl(&self.state);
        result
    }

    /// Delete the save record. In-memory state is kept.
    pub fn delete_save(&mut self) -> Result<bool, SaveError> {
        save::delete_save(&self.store)
    }

    /// Start over: delete the save and reset state, bowl and every tree.
    /// The in-memory reset happens even if deleting the save fails.
    pub fn prestige_reset(&mut self) -> Result<bool, SaveError> {
        let deleted = save::delete_save(&self.store);
        self.state = GameState::new();
        self.rain = Rainfall::new();
        self.upgrades.reset_purchases();
        self.since_save_secs = 0.0;
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::time::ManualClock;

    const NOW: i64 = 1_760_000_000;

    fn session() -> Session<MemoryStore, ManualClock> {
        Session::with_parts(Config::default(), MemoryStore::new(), ManualClock::new(NOW))
    }

    #[test]
    fn starts_at_defaults() {
        let s = session();
        assert_eq!(s.currency(), 0);
        assert_eq!(s.drops_to_fill(), 50);
        assert!((s.fall_speed() - 300.0).abs() < f64::EPSILON);
        assert!(s.rps().abs() < f64::EPSILON);
        assert!(s.cps().abs() < f64::EPSILON);
        assert_eq!(s.currency_per_conversion(), 1);
    }

    #[test]
    fn fifty_drops_make_one_currency() {
        let mut s = session();
        let conversions = (0..50).filter(|_| s.collect_drop()).count();
        assert_eq!(conversions, 1);
        assert_eq!(s.currency(), 1);
        assert_eq!(s.drops_collected(), 0);
    }

    #[test]
    fn purchase_resyncs_bowl() {
        let mut s = session();
        for _ in 0..49 {
            s.collect_drop();
        }
        s.state.currency = 20;
        assert!(s.try_purchase(TreeId::Value, 0));
        assert_eq!(s.drops_to_fill(), 45);
        assert_eq!(s.drops_collected(), 44);
        assert!(s.collect_drop());
    }

    #[test]
    fn failed_purchase_changes_nothing() {
        let mut s = session();
        assert!(!s.try_purchase(TreeId::Auto, 0));
        assert!(!s.try_purchase(TreeId::Auto, 42));
        assert_eq!(s.state(), &GameState::new());
    }

    #[test]
    fn autosave_due_after_interval() {
        let mut s = session();
        let mut due = 0;
        for _ in 0..120 {
            if s.tick(0.5).autosave_due {
                due += 1;
            }
        }
        assert_eq!(due, 2);
    }

    #[test]
    fn frame_uses_clamped_deltas() {
        let mut s = session();
        s.state.rps = 10.0;
        s.frame(0.0);
        // 10s gap counts as 0.5s
        let report = s.frame(10_000.0);
        assert_eq!(report.tick.drops, 5);
    }

    #[test]
    fn save_then_load_in_new_session() {
        let mut s = session();
        s.state.currency = 100;
        assert!(s.try_purchase(TreeId::Speed, 0));
        assert!(s.try_purchase(TreeId::Auto, 0));
        s.save().unwrap();

        let json = s.store().contents().unwrap();
        let mut next = Session::with_parts(
            Config::default(),
            MemoryStore::with_contents(&json),
            ManualClock::new(NOW),
        );
        let result = next.load();
        assert!(!result.has_progress);
        assert_eq!(next.state(), s.state());
        assert_eq!(next.upgrades().purchased_ids(), s.upgrades().purchased_ids());
    }

    #[test]
    fn second_load_is_ignored() {
        let mut s = session();
        s.state.rps = 1.0;
        s.save().unwrap();
        s.clock().advance(3_600);
        s.state = GameState::new();

        let first = s.load();
        assert!(first.has_progress);
        let currency = s.currency();
        let second = s.load();
        assert_eq!(second, OfflineResult::none());
        assert_eq!(s.currency(), currency);
    }

    #[test]
    fn delete_save_keeps_memory() {
        let mut s = session();
        s.state.currency = 5;
        s.save().unwrap();
        assert!(s.delete_save().unwrap());
        assert_eq!(s.currency(), 5);
        assert!(s.store().contents().is_none());
    }

    #[test]
    fn prestige_reset_clears_everything() {
        let mut s = session();
        s.state.currency = 1_000;
        assert!(s.try_purchase(TreeId::Conversion, 0));
        s.collect_drop();
        s.save().unwrap();

        assert!(s.prestige_reset().unwrap());
        assert_eq!(s.state(), &GameState::new());
        assert_eq!(s.drops_collected(), 0);
        assert_eq!(s.upgrades().purchased_count(), 0);
        assert!(s.store().contents().is_none());
    }
}
