//! Save/load of the economic state and purchased upgrades, plus offline
//! progress.
//!
//! ## Format
//!
//! One flat JSON object:
//!
//! ```json
//! {
//!   "version": 2,
//!   "currency": 100,
//!   "fallSpeed": 350.0,
//!   "dropsToFill": 45,
//!   "rps": 0.5,
//!   "cps": 0.2,
//!   "currencyEarned": 2,
//!   "lastClosedTime": 1760000000,
//!   "purchasedUpgrades": ["speed_1", "value_1", "auto_1"]
//! }
//! ```
//!
//! Missing fields take their defaults and unknown fields are ignored, so
//! records written before `version` existed (read as version 1) still load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION` is bumped whenever a field is added.
//! - `MIN_COMPATIBLE_VERSION` is bumped only for breaking changes (a field
//!   removed or its meaning changed). Anything older is discarded as if no
//!   save existed.
//!
//! ## Effects on load
//!
//! Loaded numeric fields already carry every purchased upgrade's effect, so
//! restoring a purchase only flips its flag. Re-applying effects would count
//! them twice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::logic;
use crate::state::{
    GameState, BASE_CURRENCY_PER_CONVERSION, BASE_DROPS_TO_FILL, BASE_FALL_SPEED,
};
use crate::storage::SaveStore;
use crate::time::Clock;
use crate::upgrades::manager::UpgradeManager;

/// Current save format version.
pub const SAVE_VERSION: u32 = 2;

/// Oldest version that can still be loaded.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// The durable form of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveRecord {
    pub version: u32,
    pub currency: i64,
    pub fall_speed: f64,
    pub drops_to_fill: i64,
    pub rps: f64,
    pub cps: f64,
    /// Currency per bowl conversion.
    pub currency_earned: i64,
    /// Unix seconds when the record was written. 0 means unknown.
    pub last_closed_time: i64,
    pub purchased_upgrades: Vec<String>,
}

impl Default for SaveRecord {
    fn default() -> Self {
        Self {
            // Records from before versioning carry no version field.
            version: 1,
            currency: 0,
            fall_speed: BASE_FALL_SPEED,
            drops_to_fill: i64::from(BASE_DROPS_TO_FILL),
            rps: 0.0,
            cps: 0.0,
            currency_earned: BASE_CURRENCY_PER_CONVERSION as i64,
            last_closed_time: 0,
            purchased_upgrades: Vec::new(),
        }
    }
}

/// What the player earned while away. Returned by [`load`] so the host can
/// show a "welcome back" breakdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OfflineResult {
    /// True if anything was earned.
    pub has_progress: bool,
    /// Time away, capped and never negative.
    pub seconds_away: u64,
    pub earned_from_conversion: u64,
    pub earned_from_passive: u64,
}

impl OfflineResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.earned_from_conversion
            .saturating_add(self.earned_from_passive)
    }
}

/// Build the record for `state` and `upgrades`, stamped with `now`.
pub fn extract_record(state: &GameState, upgrades: &UpgradeManager, now: i64) -> SaveRecord {
    SaveRecord {
        version: SAVE_VERSION,
        currency: i64::try_from(state.currency).unwrap_or(i64::MAX),
        fall_speed: state.fall_speed,
        drops_to_fill: i64::from(state.drops_to_fill),
        rps: state.rps,
        cps: state.cps,
        currency_earned: i64::try_from(state.currency_per_conversion).unwrap_or(i64::MAX),
        last_closed_time: now,
        purchased_upgrades: upgrades.purchased_ids(),
    }
}

/// Parse and version-check a serialized record.
pub fn parse_record(json: &str) -> Result<SaveRecord, SaveError> {
    let record: SaveRecord = serde_json::from_str(json)?;
    if record.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            found: record.version,
            min_compatible: MIN_COMPATIBLE_VERSION,
        });
    }
    if record.version < SAVE_VERSION {
        log::info!(
            "migrating save from version {} to {}",
            record.version,
            SAVE_VERSION
        );
    }
    Ok(record)
}

/// Overwrite `state` with the record's fields and flag its purchases.
///
/// Out-of-range values are clamped back into range and reported. Returns
/// how many upgrade tiers were restored.
pub fn apply_record(
    record: &SaveRecord,
    state: &mut GameState,
    upgrades: &mut UpgradeManager,
) -> usize {
    if record.currency < 0 {
        log::warn!("save had negative currency {}, clamping to 0", record.currency);
    }
    *state = GameState {
        currency: u64::try_from(record.currency).unwrap_or(0),
        fall_speed: record.fall_speed,
        drops_to_fill: u32::try_from(record.drops_to_fill.max(0)).unwrap_or(u32::MAX),
        rps: record.rps,
        cps: record.cps,
        currency_per_conversion: u64::try_from(record.currency_earned.max(0)).unwrap_or(0),
    };
    let fixed = state.sanitize();
    if !fixed.is_empty() {
        log::warn!("save had out-of-range fields, reset: {}", fixed.join(", "));
    }

    let ids: HashSet<String> = record.purchased_upgrades.iter().cloned().collect();
    let restored = upgrades.restore_purchased(&ids);
    if restored < ids.len() {
        log::warn!(
            "{} purchased upgrade id(s) in save match no known tier",
            ids.len() - restored
        );
    }
    restored
}

/// Seconds between `last_closed` and `now`, capped at `max_secs`.
///
/// Unknown close times (0 or less) and clocks that went backwards both
/// give 0.
pub fn seconds_away(last_closed: i64, now: i64, max_secs: u64) -> u64 {
    if last_closed <= 0 {
        return 0;
    }
    let raw = now.saturating_sub(last_closed);
    if raw <= 0 {
        return 0;
    }
    (raw as u64).min(max_secs)
}

/// Credit offline earnings for `seconds_away` to `state`.
pub fn apply_offline_progress(state: &mut GameState, seconds_away: u64) -> OfflineResult {
    let (from_conversion, from_passive) = logic::offline_earnings(state, seconds_away);
    let result = OfflineResult {
        has_progress: from_conversion.saturating_add(from_passive) > 0,
        seconds_away,
        earned_from_conversion: from_conversion,
        earned_from_passive: from_passive,
    };
    state.earn(result.total());
    result
}

/// Write `state` and every purchased tier to `store`, replacing what was
/// there. Failures are logged and returned; in-memory state is untouched
/// either way.
pub fn save<S, C>(
    store: &S,
    clock: &C,
    state: &GameState,
    upgrades: &UpgradeManager,
) -> Result<(), SaveError>
where
    S: SaveStore + ?Sized,
    C: Clock + ?Sized,
{
    let record = extract_record(state, upgrades, clock.now_unix_secs());
    let result = serde_json::to_string_pretty(&record)
        .map_err(SaveError::from)
        .and_then(|json| store.write(&json));
    match &result {
        Ok(()) => log::info!(
            "game saved, purchased upgrades: {}",
            record.purchased_upgrades.len()
        ),
        Err(e) => log::warn!("save failed: {}", e),
    }
    result
}

/// Restore `state` and `upgrades` from `store` and credit offline progress.
///
/// A missing, unreadable or corrupt record leaves both untouched and
/// returns [`OfflineResult::none`]. Call once per session: a second call
/// with the same record would pay out the offline window again.
pub fn load<S, C>(
    store: &S,
    clock: &C,
    max_offline_seconds: u64,
    state: &mut GameState,
    upgrades: &mut UpgradeManager,
) -> OfflineResult
where
    S: SaveStore + ?Sized,
    C: Clock + ?Sized,
{
    let json = match store.read() {
        Ok(Some(json)) => json,
        Ok(None) => {
            log::info!("no save found, starting fresh");
            return OfflineResult::none();
        }
        Err(e) => {
            log::warn!("failed to read save: {}", e);
            return OfflineResult::none();
        }
    };

    let record = match parse_record(&json) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("failed to load save, starting fresh: {}", e);
            return OfflineResult::none();
        }
    };

    apply_record(&record, state, upgrades);

    let away = seconds_away(
        record.last_closed_time,
        clock.now_unix_secs(),
        max_offline_seconds,
    );
    let result = apply_offline_progress(state, away);
    log::info!(
        "game loaded, currency: {} (offline +{} over {}s)",
        state.currency,
        result.total(),
        result.seconds_away
    );
    result
}

/// Delete the save record. In-memory state is not touched; a full reset
/// also needs the caller to reset its state. Returns true if a record
/// existed.
pub fn delete_save<S: SaveStore + ?Sized>(store: &S) -> Result<bool, SaveError> {
    let deleted = store.remove();
    match &deleted {
        Ok(true) => log::info!("save deleted"),
        Ok(false) => {}
        Err(e) => log::warn!("failed to delete save: {}", e),
    }
    deleted
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::time::ManualClock;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_seconds_away_within_cap(
            last in -10i64..2_000_000_000,
            now in 0i64..2_000_000_000,
            cap in 0u64..100_000,
        ) {
            prop_assert!(seconds_away(last, now, cap) <= cap);
        }

        #[test]
        fn prop_roundtrip_preserves_state(
            currency in 0u64..1_000_000_000,
            fall_speed in 1.0f64..5_000.0,
            drops_to_fill in 1u32..100,
            rps in 0.0f64..50.0,
            cps in 0.0f64..50.0,
            per in 1u64..1_000,
        ) {
            let state = GameState {
                currency,
                fall_speed,
                drops_to_fill,
                rps,
                cps,
                currency_per_conversion: per,
            };
            let store = MemoryStore::new();
            let clock = ManualClock::new(1_760_000_000);
            save(&store, &clock, &state, &UpgradeManager::new()).unwrap();
            let mut loaded = GameState::new();
            let result = load(&store, &clock, 3_600, &mut loaded, &mut UpgradeManager::new());
            prop_assert_eq!(result, OfflineResult::none());
            prop_assert_eq!(loaded, state);
        }
    }
}
