// Scoring invariants, driven through the public simulation API on the host.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use lamo_arcade::feeding::FeedingSim;
use lamo_arcade::jumper::{JumperSim, MAX_TICK_POINTS};

#[test]
fn jumper_displayed_score_is_a_running_max_of_the_watermark() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut sim = JumperSim::new(&mut rng);
    let mut best = 0;
    for step in 0..1000 {
        // Alternate climbing and falling stretches.
        sim.player.vy = if (step / 7) % 2 == 0 { -6.0 } else { 6.0 };
        sim.apply_points(rng.gen_range(0..MAX_TICK_POINTS));
        best = best.max(sim.watermark());
        assert_eq!(i64::from(sim.score), best.max(0));
    }
}

#[test]
fn jumper_score_never_decreases() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut sim = JumperSim::new(&mut rng);
    let mut last = 0;
    for _ in 0..3000 {
        sim.tick(&mut rng);
        assert!(sim.score >= last, "score dipped from {last} to {}", sim.score);
        last = sim.score;
        if sim.phase == lamo_arcade::Phase::GameOver {
            break;
        }
    }
}

#[test]
fn jumper_seeded_ascent_scenario() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut sim = JumperSim::new(&mut rng);
    sim.player.vy = -12.0;
    for points in [5, 10, 15, 5, 5, 10, 15, 20, 5, 10] {
        sim.apply_points(points);
    }
    assert_eq!(sim.watermark(), 100);
    assert_eq!(sim.score, 100);
}

#[test]
fn feeding_score_increments_by_exactly_one_per_baby() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut sim = FeedingSim::new();
    // Run well past several spawn cycles while chasing the fish lanes; the
    // tick return value is the only increment source.
    let mut total = 0;
    for tick in 0..4000_u64 {
        if tick % 120 == 0 {
            // Jump between lanes where fish actually swim.
            let y = 40.0 + (tick % 420) as f64;
            sim.pointer_press(400.0, y.min(460.0));
        }
        let before = sim.score;
        let eaten = sim.tick(&mut rng);
        assert_eq!(sim.score, before + eaten);
        total += eaten;
        if sim.phase == lamo_arcade::Phase::GameOver {
            break;
        }
    }
    assert_eq!(sim.score, total);
}
