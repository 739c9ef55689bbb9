use std::collections::BTreeMap;

use crate::character::{CharacterId, CharacterStats, OptimizerSettings};
use crate::mods::{Mod, ModSet, ModSlot, ModTier, PrimaryStat, SecondaryStat};
use crate::plan::{OptimizationPlan, TargetStat};
use crate::stats::{CharStatKind, ModStatKind, StatSummary};

use super::{find_best_loadout, loadout_satisfies_structure, SearchContext};

fn base() -> CharacterStats {
    CharacterStats {
        level: 85,
        health: 30_000.0,
        protection: 40_000.0,
        speed: 60.0,
        crit_dmg: 150.0,
        potency: 40.0,
        tenacity: 35.0,
        phys_dmg: 3_000.0,
        spec_dmg: 2_000.0,
        crit_chance: 25.0,
        armor: 300.0,
        resistance: 200.0,
        accuracy: 0.0,
        crit_avoid: 0.0,
    }
}

fn mod_in(id: &str, slot: ModSlot, set: ModSet, primary: PrimaryStat) -> Mod {
    Mod::new(id, slot, set, 5, 15, ModTier::Gold, primary)
}

fn plain_primary(slot: ModSlot) -> PrimaryStat {
    match slot {
        ModSlot::Square => PrimaryStat::new(ModStatKind::OffensePercent, 5.88),
        ModSlot::Diamond => PrimaryStat::new(ModStatKind::DefensePercent, 11.75),
        _ => PrimaryStat::new(ModStatKind::HealthPercent, 5.88),
    }
}

fn full_pool(set: ModSet) -> Vec<Mod> {
    ModSlot::all()
        .into_iter()
        .map(|slot| mod_in(&format!("{slot}-mod"), slot, set, plain_primary(slot)))
        .collect()
}

struct Fixture {
    stats: CharacterStats,
    settings: OptimizerSettings,
    plan: OptimizationPlan,
    references: BTreeMap<CharacterId, StatSummary>,
}

impl Fixture {
    fn new(plan: OptimizationPlan) -> Self {
        Self {
            stats: base(),
            settings: OptimizerSettings::default(),
            plan,
            references: BTreeMap::new(),
        }
    }

    fn ctx(&self) -> SearchContext<'_> {
        SearchContext {
            stats: &self.stats,
            settings: &self.settings,
            plan: &self.plan,
            references: &self.references,
        }
    }
}

#[test]
fn zero_weights_still_fill_every_slot() {
    let pool = full_pool(ModSet::Potency);
    let refs: Vec<&Mod> = pool.iter().collect();
    let fixture = Fixture::new(OptimizationPlan::new("zero"));

    let outcome = find_best_loadout(&refs, &fixture.ctx());
    assert_eq!(outcome.loadout.len(), 6);
    assert_eq!(outcome.value, 0.0);
    assert!(outcome.missed_goals.is_empty());

    let mut ids = outcome.loadout.mod_ids();
    ids.sort();
    let mut expected: Vec<_> = pool.iter().map(|m| m.id.clone()).collect();
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn higher_speed_primary_wins_the_arrow() {
    let slow = mod_in(
        "arrow-slow",
        ModSlot::Arrow,
        ModSet::Potency,
        PrimaryStat::new(ModStatKind::Speed, 5.0),
    );
    let fast = mod_in(
        "arrow-fast",
        ModSlot::Arrow,
        ModSet::Potency,
        PrimaryStat::new(ModStatKind::Speed, 10.0),
    );
    let pool = [&slow, &fast];
    let fixture =
        Fixture::new(OptimizationPlan::new("speed").with_weight(CharStatKind::Speed, 100.0));

    let outcome = find_best_loadout(&pool, &fixture.ctx());
    let chosen = outcome.loadout.get(ModSlot::Arrow).unwrap();
    assert_eq!(chosen.id.as_str(), "arrow-fast");
}

#[test]
fn unreachable_target_degrades_to_missed_goal() {
    let arrow = mod_in(
        "arrow",
        ModSlot::Arrow,
        ModSet::Potency,
        PrimaryStat::new(ModStatKind::Speed, 30.0),
    );
    let pool = [&arrow];
    // Base speed 60 + 30 = 90, below the 100..120 window.
    let plan = OptimizationPlan::new("target")
        .with_weight(CharStatKind::Speed, 1.0)
        .with_target(TargetStat::new(CharStatKind::Speed, 100.0, 120.0));
    let fixture = Fixture::new(plan);

    let outcome = find_best_loadout(&pool, &fixture.ctx());
    assert_eq!(outcome.loadout.len(), 1);
    assert_eq!(outcome.missed_goals.len(), 1);
    let missed = &outcome.missed_goals[0];
    assert_eq!(missed.target.stat, CharStatKind::Speed);
    assert!((missed.achieved - 90.0).abs() < 1e-9);
}

#[test]
fn satisfiable_target_constrains_the_choice() {
    // A big health square pushes value, but the target caps health.
    let big = mod_in(
        "square-big",
        ModSlot::Square,
        ModSet::Potency,
        plain_primary(ModSlot::Square),
    )
    .with_secondary(SecondaryStat::new(ModStatKind::Health, 2_000.0, 4));
    let small = mod_in(
        "square-small",
        ModSlot::Square,
        ModSet::Potency,
        plain_primary(ModSlot::Square),
    )
    .with_secondary(SecondaryStat::new(ModStatKind::Health, 200.0, 1));
    let pool = [&big, &small];

    let plan = OptimizationPlan::new("capped")
        .with_weight(CharStatKind::Health, 1.0)
        .with_target(TargetStat::new(
            CharStatKind::Health,
            0.0,
            30_000.0 + 1_000.0,
        ));
    let fixture = Fixture::new(plan);

    let outcome = find_best_loadout(&pool, &fixture.ctx());
    let chosen = outcome.loadout.get(ModSlot::Square).unwrap();
    assert_eq!(chosen.id.as_str(), "square-small");
    assert!(outcome.missed_goals.is_empty());
}

#[test]
fn full_sets_rule_rejects_partial_sets() {
    // Four speed mods and a pair of health mods complete; a lone offense
    // cross with a juicy secondary would break the full-sets rule.
    let mut pool = full_pool(ModSet::Speed);
    pool.truncate(4);
    pool.push(mod_in(
        "circle-health",
        ModSlot::Circle,
        ModSet::Health,
        plain_primary(ModSlot::Circle),
    ));
    pool.push(mod_in(
        "cross-health",
        ModSlot::Cross,
        ModSet::Health,
        plain_primary(ModSlot::Cross),
    ));
    pool.push(
        mod_in(
            "cross-offense",
            ModSlot::Cross,
            ModSet::Offense,
            plain_primary(ModSlot::Cross),
        )
        .with_secondary(SecondaryStat::new(ModStatKind::Speed, 25.0, 5)),
    );

    let refs: Vec<&Mod> = pool.iter().collect();
    let mut plan = OptimizationPlan::new("full-sets").with_weight(CharStatKind::Speed, 10.0);
    plan.use_only_full_sets = true;
    plan.set_restrictions.insert(ModSet::Speed, 1);
    let fixture = Fixture::new(plan);

    let outcome = find_best_loadout(&refs, &fixture.ctx());
    let tally = outcome
        .loadout
        .set_tally(&fixture.settings, &fixture.plan, true);
    assert!(tally.is_full_sets_only());
    assert_eq!(tally.count(ModSet::Speed), 4);
    // The offense cross loses to the health cross despite its speed line.
    assert_eq!(
        outcome.loadout.get(ModSlot::Cross).unwrap().id.as_str(),
        "cross-health"
    );
    assert!(loadout_satisfies_structure(&outcome.loadout, &fixture.ctx()));
}

#[test]
fn unsatisfiable_set_restriction_reports_and_falls_back() {
    // Only three speed mods exist; a full speed set is impossible.
    let mut pool = full_pool(ModSet::Potency);
    pool[0].set = ModSet::Speed;
    pool[1].set = ModSet::Speed;
    pool[2].set = ModSet::Speed;

    let refs: Vec<&Mod> = pool.iter().collect();
    let mut plan = OptimizationPlan::new("impossible").with_weight(CharStatKind::Speed, 1.0);
    plan.set_restrictions.insert(ModSet::Speed, 1);
    let fixture = Fixture::new(plan);

    let outcome = find_best_loadout(&refs, &fixture.ctx());
    assert_eq!(outcome.loadout.len(), 6);
    assert!(outcome
        .messages
        .iter()
        .any(|m| m.contains("set restrictions cannot be satisfied")));
}

#[test]
fn primary_restrictions_exclude_mismatched_mods() {
    let crit = mod_in(
        "triangle-crit",
        ModSlot::Triangle,
        ModSet::Potency,
        PrimaryStat::new(ModStatKind::CritDmgPercent, 36.0),
    );
    let health = mod_in(
        "triangle-health",
        ModSlot::Triangle,
        ModSet::Potency,
        PrimaryStat::new(ModStatKind::HealthPercent, 5.88),
    )
    .with_secondary(SecondaryStat::new(ModStatKind::Speed, 20.0, 4));

    let pool = [&crit, &health];
    let mut plan = OptimizationPlan::new("crit-triangle").with_weight(CharStatKind::Speed, 100.0);
    plan.primary_restrictions
        .insert(ModSlot::Triangle, ModStatKind::CritDmgPercent);
    let fixture = Fixture::new(plan);

    let outcome = find_best_loadout(&pool, &fixture.ctx());
    // The speedy triangle is ineligible; the crit-damage one is chosen.
    assert_eq!(
        outcome.loadout.get(ModSlot::Triangle).unwrap().id.as_str(),
        "triangle-crit"
    );
}

#[test]
fn pip_floor_excludes_low_rarity_mods() {
    let mut weak = mod_in(
        "arrow-weak",
        ModSlot::Arrow,
        ModSet::Potency,
        PrimaryStat::new(ModStatKind::Speed, 30.0),
    );
    weak.pips = 4;

    let pool = [&weak];
    let fixture = {
        let mut fixture =
            Fixture::new(OptimizationPlan::new("floor").with_weight(CharStatKind::Speed, 1.0));
        fixture.settings.minimum_mod_dots = 5;
        fixture
    };

    let outcome = find_best_loadout(&pool, &fixture.ctx());
    assert!(outcome.loadout.is_empty());
    assert!(outcome
        .messages
        .iter()
        .any(|m| m.contains("no eligible mod for the arrow slot")));
}

#[test]
fn identical_inputs_reproduce_identical_outcomes() {
    let mut pool = full_pool(ModSet::Speed);
    pool.extend(full_pool(ModSet::Offense).into_iter().map(|mut m| {
        m.id = format!("alt-{}", m.id).into();
        m
    }));
    let refs: Vec<&Mod> = pool.iter().collect();

    let mut plan = OptimizationPlan::new("repeat")
        .with_weight(CharStatKind::Speed, 3.0)
        .with_weight(CharStatKind::PhysDmg, 0.2);
    plan.use_only_full_sets = true;
    let fixture = Fixture::new(plan);

    let first = find_best_loadout(&refs, &fixture.ctx());
    let second = find_best_loadout(&refs, &fixture.ctx());
    assert_eq!(first, second);
}

#[test]
fn raising_a_weight_never_lowers_that_stat() {
    let pool: Vec<Mod> = vec![
        mod_in(
            "arrow-speed",
            ModSlot::Arrow,
            ModSet::Potency,
            PrimaryStat::new(ModStatKind::Speed, 30.0),
        ),
        mod_in(
            "arrow-health",
            ModSlot::Arrow,
            ModSet::Potency,
            plain_primary(ModSlot::Arrow),
        )
        .with_secondary(SecondaryStat::new(ModStatKind::Speed, 4.0, 1)),
    ];
    let refs: Vec<&Mod> = pool.iter().collect();

    let mut realized = Vec::new();
    for weight in [0.5, 5.0, 50.0] {
        let plan = OptimizationPlan::new("mono")
            .with_weight(CharStatKind::Health, 0.01)
            .with_weight(CharStatKind::Speed, weight);
        let fixture = Fixture::new(plan);
        let outcome = find_best_loadout(&refs, &fixture.ctx());
        realized.push(outcome.summary[CharStatKind::Speed]);
    }
    assert!(realized.windows(2).all(|pair| pair[1] >= pair[0]));
}
