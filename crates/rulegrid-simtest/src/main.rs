//! RuleGrid Headless Validation Harness
//!
//! Plays scripted levels against the engine the way the real
//! collaborators would: construct from a layout, feed one input per
//! tick, read snapshots, run the win/lose checks. No rendering, no
//! persistence, entirely in-process.
//!
//! Usage:
//!   cargo run -p rulegrid-simtest
//!   cargo run -p rulegrid-simtest -- --verbose

use rulegrid_core::prelude::*;
use serde::Deserialize;

// ── Level files (same JSON shape a renderer front-end would feed) ──────
const TUTORIAL_JSON: &str = include_str!("../../../data/levels/tutorial.json");
const PUSH_PUZZLE_JSON: &str = include_str!("../../../data/levels/push_puzzle.json");
const HAZARDS_JSON: &str = include_str!("../../../data/levels/hazards.json");

#[derive(Debug, Deserialize)]
struct LevelFile {
    name: String,
    rows: usize,
    cols: usize,
    cells: LevelLayout,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== RuleGrid Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Level loading and construction
    results.extend(validate_level_loading(verbose));

    // 2. Rule derivation on loaded levels
    results.extend(validate_rule_derivation(verbose));

    // 3. Scripted playthroughs
    results.extend(validate_playthroughs(verbose));

    // 4. Observer notifications
    results.extend(validate_observers(verbose));

    // 5. Engine failure modes
    results.extend(validate_failure_modes(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_level(json: &str) -> Result<(LevelFile, GameEngine), String> {
    let level: LevelFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let engine =
        GameEngine::new(level.rows, level.cols, &level.cells).map_err(|e| e.to_string())?;
    Ok((level, engine))
}

fn run_script(engine: &mut GameEngine, moves: &[Direction]) -> Result<(), String> {
    for &direction in moves {
        engine.apply_input(direction).map_err(|e| e.to_string())?;
    }
    Ok(())
}

// ── 1. Level loading ───────────────────────────────────────────────────

fn validate_level_loading(verbose: bool) -> Vec<TestResult> {
    println!("--- Level Loading ---");
    let mut results = Vec::new();

    for (label, json) in [
        ("tutorial", TUTORIAL_JSON),
        ("push_puzzle", PUSH_PUZZLE_JSON),
        ("hazards", HAZARDS_JSON),
    ] {
        match load_level(json) {
            Ok((level, engine)) => {
                let snap = engine.snapshot();
                let dims_ok = snap.rows == level.rows && snap.cols == level.cols;
                results.push(TestResult {
                    name: format!("load_{}", label),
                    passed: level.name == label && dims_ok,
                    detail: format!(
                        "{}x{} grid, {} starting rule(s)",
                        snap.rows,
                        snap.cols,
                        engine.active_rules().len()
                    ),
                });
                if verbose {
                    println!("  {}: {} real blocks", label, snap.real_block_names().len());
                }
            }
            Err(e) => results.push(TestResult {
                name: format!("load_{}", label),
                passed: false,
                detail: e,
            }),
        }
    }

    results
}

// ── 2. Rule derivation ─────────────────────────────────────────────────

fn validate_rule_derivation(_verbose: bool) -> Vec<TestResult> {
    println!("--- Rule Derivation ---");
    let mut results = Vec::new();

    if let Ok((_, engine)) = load_level(TUTORIAL_JSON) {
        let rules = engine.active_rules();
        results.push(TestResult {
            name: "tutorial_rules".into(),
            passed: rules.len() == 3,
            detail: format!("expected BABA IS YOU / FLAG IS WIN / WALL IS STOP, got {} rule(s)", rules.len()),
        });
        results.push(TestResult {
            name: "tutorial_you_rule".into(),
            passed: rules.contains(&Rule {
                subject: BlockKind::BabaVisual,
                predicate: Predicate::Property(Behavior::Controllable),
            }),
            detail: "BABA IS YOU active".into(),
        });
        results.push(TestResult {
            name: "tutorial_behaviors_assigned".into(),
            passed: engine.positions_with_behavior(Behavior::Controllable).len() == 1
                && engine.positions_with_behavior(Behavior::Winnable).len() == 1
                && engine.positions_with_behavior(Behavior::Stoppable).len() == 1,
            detail: "one controllable, one winnable, one stoppable cell".into(),
        });
    }

    if let Ok((_, engine)) = load_level(HAZARDS_JSON) {
        results.push(TestResult {
            name: "hazards_rules".into(),
            passed: engine.active_rules().len() == 3,
            detail: format!("{} rule(s) derived", engine.active_rules().len()),
        });
    }

    results
}

// ── 3. Scripted playthroughs ───────────────────────────────────────────

fn validate_playthroughs(verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Playthroughs ---");
    let mut results = Vec::new();

    // Tutorial: route around the wall, reach the flag.
    if let Ok((_, mut engine)) = load_level(TUTORIAL_JSON) {
        use Direction::*;
        let script = [Right, Right, Down, Right, Right, Up, Right];
        let run = run_script(&mut engine, &script);
        results.push(TestResult {
            name: "tutorial_win".into(),
            passed: run.is_ok() && engine.is_won() && !engine.is_stuck(),
            detail: format!("won after {} input(s)", script.len()),
        });
        if verbose {
            println!(
                "  tutorial: controllable now at {:?}",
                engine.positions_with_behavior(Behavior::Controllable)
            );
        }
    }

    // Push puzzle: two rocks shunt right until the margin stops the chain.
    if let Ok((_, mut engine)) = load_level(PUSH_PUZZLE_JSON) {
        use Direction::*;
        let run = run_script(&mut engine, &[Right, Right, Right]);
        let baba = engine.positions_with_behavior(Behavior::Controllable);
        results.push(TestResult {
            name: "push_chain_stops_at_margin".into(),
            passed: run.is_ok() && baba == vec![Position::new(3, 2)],
            detail: format!("mover ended at {:?}", baba),
        });

        let rocks: Vec<String> = engine.snapshot().cell(3, 4).iter().map(|v| v.type_name.clone()).collect();
        results.push(TestResult {
            name: "push_chain_far_rock".into(),
            passed: rocks.contains(&"RockVisualBlock".to_string()),
            detail: "far rock reached the margin column".into(),
        });
    }

    // Hazards: walking into hot lava melts the meltable baba.
    if let Ok((_, mut engine)) = load_level(HAZARDS_JSON) {
        use Direction::*;
        let run = run_script(&mut engine, &[Right, Right]);
        results.push(TestResult {
            name: "hazards_melt_loses".into(),
            passed: run.is_ok() && engine.is_stuck() && !engine.is_won(),
            detail: "no controllable block survives the lava".into(),
        });
    }

    results
}

// ── 4. Observers ───────────────────────────────────────────────────────

struct TickCounter {
    ticks: std::rc::Rc<std::cell::RefCell<usize>>,
}

impl GridObserver for TickCounter {
    fn on_tick(&mut self, _snapshot: &GridSnapshot) {
        *self.ticks.borrow_mut() += 1;
    }
}

fn validate_observers(_verbose: bool) -> Vec<TestResult> {
    println!("--- Observers ---");
    let mut results = Vec::new();

    if let Ok((_, mut engine)) = load_level(TUTORIAL_JSON) {
        let ticks = std::rc::Rc::new(std::cell::RefCell::new(0));
        engine.subscribe(Box::new(TickCounter {
            ticks: std::rc::Rc::clone(&ticks),
        }));

        let _ = run_script(&mut engine, &[Direction::Up, Direction::Down, Direction::Up]);
        results.push(TestResult {
            name: "observer_once_per_tick".into(),
            passed: *ticks.borrow() == 3,
            detail: format!("{} notification(s) for 3 inputs", ticks.borrow()),
        });
    }

    results
}

// ── 5. Failure modes ───────────────────────────────────────────────────

fn validate_failure_modes(_verbose: bool) -> Vec<TestResult> {
    println!("--- Failure Modes ---");
    let mut results = Vec::new();

    // Unknown block kind must be rejected at construction.
    let bad_layout: LevelLayout = vec![vec![vec!["GremlinVisualBlock".to_string()]]];
    let err = GameEngine::new(1, 1, &bad_layout);
    results.push(TestResult {
        name: "reject_unknown_kind".into(),
        passed: matches!(&err, Err(EngineError::InvalidBlockKind(_))),
        detail: format!("{:?}", err.err()),
    });

    // Dimension mismatch is a structural fault.
    let short_layout: LevelLayout = vec![vec![vec![]]];
    let err = GameEngine::new(2, 1, &short_layout);
    results.push(TestResult {
        name: "reject_bad_dimensions".into(),
        passed: matches!(&err, Err(EngineError::Fault(_))),
        detail: format!("{:?}", err.err()),
    });

    results
}
