//! Static upgrade content. Every tree is built fresh, with nothing purchased.

use super::{Effect, TreeId, UpgradeTier, UpgradeTree};

/// Build the tree for `id` with its full tier list.
pub fn build_tree(id: TreeId) -> UpgradeTree {
    let tiers = match id {
        TreeId::Speed => speed_tiers(),
        TreeId::Value => value_tiers(),
        TreeId::Auto => auto_tiers(),
        TreeId::Conversion => conversion_tiers(),
        TreeId::Condensation => condensation_tiers(),
    };
    UpgradeTree::new(id, tiers)
}

/// Every tree in display order.
pub fn build_all() -> Vec<UpgradeTree> {
    TreeId::all().iter().map(|id| build_tree(*id)).collect()
}

// Flat bonus added on top of the current fall speed.
fn speed_tiers() -> Vec<UpgradeTier> {
    let t = TreeId::Speed;
    let desc = "Increases rainfall speed";
    vec![
        UpgradeTier::new(t, 1, "Fall Speed I", desc, 1, Effect::AddFallSpeed(50.0)),
        UpgradeTier::new(t, 2, "Fall Speed II", desc, 20, Effect::AddFallSpeed(100.0)),
        UpgradeTier::new(t, 3, "Fall Speed III", desc, 1_000, Effect::AddFallSpeed(200.0)),
        UpgradeTier::new(t, 4, "Fall Speed IV", desc, 100_000, Effect::AddFallSpeed(400.0)),
        UpgradeTier::new(t, 5, "Fall Speed V", desc, 1_000_000_000, Effect::AddFallSpeed(800.0)),
    ]
}

// New bowl size; lower means fewer drops per conversion.
fn value_tiers() -> Vec<UpgradeTier> {
    let t = TreeId::Value;
    let desc = "Less drops required to convert to currency";
    vec![
        UpgradeTier::new(t, 1, "Rain Value I", desc, 20, Effect::SetDropsToFill(45)),
        UpgradeTier::new(t, 2, "Rain Value II", desc, 200, Effect::SetDropsToFill(40)),
        UpgradeTier::new(t, 3, "Rain Value III", desc, 20_000, Effect::SetDropsToFill(35)),
        UpgradeTier::new(t, 4, "Rain Value IV", desc, 2_000_000, Effect::SetDropsToFill(25)),
        UpgradeTier::new(t, 5, "Rain Value V", desc, 2_000_000_000, Effect::SetDropsToFill(10)),
    ]
}

fn auto_tiers() -> Vec<UpgradeTier> {
    let t = TreeId::Auto;
    vec![
        UpgradeTier::new(
            t,
            1,
            "Rain Generation I",
            "Cloud auto generates 1 drop every 2 seconds",
            5,
            Effect::AddRps(0.5),
        ),
        UpgradeTier::new(
            t,
            2,
            "Rain Generation II",
            "Increases raindrop generation to 1/second",
            50,
            Effect::AddRps(1.0),
        ),
        UpgradeTier::new(
            t,
            3,
            "Rain Generation III",
            "Increases raindrop generation to 2/second",
            1_000,
            Effect::AddRps(2.0),
        ),
        UpgradeTier::new(
            t,
            4,
            "Rain Generation IV",
            "Increases raindrop generation to 5/second",
            100_000,
            Effect::AddRps(5.0),
        ),
        UpgradeTier::new(
            t,
            5,
            "Rain Generation V",
            "Increases raindrop generation to 10/second",
            1_000_000_000,
            Effect::AddRps(10.0),
        ),
    ]
}

fn conversion_tiers() -> Vec<UpgradeTier> {
    let t = TreeId::Conversion;
    vec![
        UpgradeTier::new(
            t,
            1,
            "Silver Lining I",
            "Bowl conversions now yield 2 currency",
            30,
            Effect::SetCurrencyPerConversion(2),
        ),
        UpgradeTier::new(
            t,
            2,
            "Silver Lining II",
            "Bowl conversions now yield 5 currency",
            300,
            Effect::SetCurrencyPerConversion(5),
        ),
        UpgradeTier::new(
            t,
            3,
            "Silver Lining III",
            "Bowl conversions now yield 10 currency",
            3_000,
            Effect::SetCurrencyPerConversion(10),
        ),
        UpgradeTier::new(
            t,
            4,
            "Silver Lining IV",
            "Bowl conversions now yield 100 currency",
            300_000,
            Effect::SetCurrencyPerConversion(100),
        ),
        UpgradeTier::new(
            t,
            5,
            "Silver Lining V",
            "Bowl conversions now yield 1000 currency",
            30_000_000,
            Effect::SetCurrencyPerConversion(1_000),
        ),
    ]
}

fn condensation_tiers() -> Vec<UpgradeTier> {
    let t = TreeId::Condensation;
    vec![
        UpgradeTier::new(
            t,
            1,
            "Condensation I",
            "Generate 1 currency every 5 seconds",
            50,
            Effect::AddCps(0.2),
        ),
        UpgradeTier::new(
            t,
            2,
            "Condensation II",
            "Generate 1 currency per 2 seconds",
            200,
            Effect::AddCps(0.5),
        ),
        UpgradeTier::new(
            t,
            3,
            "Condensation III",
            "Generate 1 currency per second",
            1_000,
            Effect::AddCps(1.0),
        ),
        UpgradeTier::new(
            t,
            4,
            "Condensation IV",
            "Generate 10 currency per second",
            10_000,
            Effect::AddCps(10.0),
        ),
        UpgradeTier::new(
            t,
            5,
            "Condensation V",
            "Generate 20 currency per second",
            1_000_000,
            Effect::AddCps(20.0),
        ),
    ]
}
