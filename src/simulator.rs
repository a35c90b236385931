//! Balance simulator for the upgrade catalog.
//! Run with: cargo test -p storm-idle simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use crate::logic::{self, Rainfall};
    use crate::state::GameState;
    use crate::upgrades::manager::UpgradeManager;
    use crate::upgrades::{TierStatus, TreeId};

    /// Simulated seconds per step.
    const STEP_SECS: u64 = 60;

    /// Drops the player catches by hand each second.
    const MANUAL_DROPS_PER_SEC: u64 = 2;

    /// Cheapest tier that can be bought right now.
    fn find_cheapest(upgrades: &UpgradeManager, state: &GameState) -> Option<(TreeId, usize)> {
        upgrades
            .trees()
            .iter()
            .filter_map(|tree| {
                let (idx, tier) = tree.next_available()?;
                match tree.status(idx, state)? {
                    TierStatus::Available => Some((tier.cost, tree.id, idx)),
                    _ => None,
                }
            })
            .min_by_key(|(cost, _, _)| *cost)
            .map(|(_, id, idx)| (id, idx))
    }

    #[test]
    fn simulate_greedy() {
        let mut state = GameState::new();
        let mut upgrades = UpgradeManager::new();
        let mut rain = Rainfall::new();
        let total_tiers: usize = upgrades.trees().iter().map(|t| t.len()).sum();
        let limit_secs = 10_000 * 3_600;

        let mut elapsed = 0u64;
        while upgrades.purchased_count() < total_tiers && elapsed < limit_secs {
            while let Some((tree, idx)) = find_cheapest(&upgrades, &state) {
                assert!(upgrades.try_purchase(tree, idx, &mut state));
                rain.sync_bowl(&state);
                let tier = &upgrades.tree(tree).unwrap().tiers()[idx];
                println!(
                    "{:>8}s  {:<20} cost {:>13}  rps {:>5.1} cps {:>5.1} fill {:>2} x{}",
                    elapsed,
                    tier.name,
                    tier.cost,
                    state.rps,
                    state.cps,
                    state.drops_to_fill,
                    state.currency_per_conversion
                );
            }
            logic::tick(&mut rain, &mut state, STEP_SECS as f64);
            logic::collect_drops(&mut rain, &mut state, MANUAL_DROPS_PER_SEC * STEP_SECS);
            elapsed += STEP_SECS;
        }

        println!("all tiers bought after {:.1}h", elapsed as f64 / 3_600.0);
        assert_eq!(upgrades.purchased_count(), total_tiers);
        // Every tree is climbed in order, so the last tier of each is owned.
        for tree in upgrades.trees() {
            assert!(tree.tiers().iter().all(|t| t.purchased));
        }
    }

    #[test]
    fn first_purchase_within_first_minute() {
        // Fall Speed I costs 1, one bowl of hand-caught drops.
        let mut state = GameState::new();
        let mut upgrades = UpgradeManager::new();
        let mut rain = Rainfall::new();
        logic::collect_drops(&mut rain, &mut state, MANUAL_DROPS_PER_SEC * 30);
        assert_eq!(find_cheapest(&upgrades, &state), Some((TreeId::Speed, 0)));
        assert!(upgrades.try_purchase(TreeId::Speed, 0, &mut state));
    }
}
