// Resizing keeps each simulator's entities: anything still inside the new
// viewport is untouched, only out-of-bounds entities move.

use backdrop_engine::render::headless::RecordingSurface;
use backdrop_engine::sim::{NetworkField, Rng, SquareField, TrailField, WaveField};
use backdrop_engine::{ColorMode, PerformanceTier, Simulator};
use pretty_assertions::assert_eq;

const OLD: (f32, f32) = (1200.0, 900.0);
const NEW: (f32, f32) = (600.0, 450.0);

fn inside(x: f32, y: f32) -> bool {
    (0.0..=NEW.0).contains(&x) && (0.0..=NEW.1).contains(&y)
}

fn run(sim: &mut dyn Simulator, steps: usize) {
    let mut surface = RecordingSurface::new(OLD.0 as u32, OLD.1 as u32);
    for _ in 0..steps {
        sim.step(&mut surface, 16.0);
    }
}

#[test]
fn network_nodes_survive_resize() {
    let budget = PerformanceTier::High.budget();
    let mut field = NetworkField::seeded(&budget, ColorMode::Dark, OLD.0, OLD.1, &mut Rng::new(3));
    run(&mut field, 5);
    let before = field.nodes().to_vec();

    field.resize(NEW.0, NEW.1);

    assert_eq!(field.nodes().len(), before.len());
    let mut kept = 0;
    for (old, new) in before.iter().zip(field.nodes()) {
        if inside(old.pos.x, old.pos.y) {
            assert_eq!(old, new);
            kept += 1;
        } else {
            assert_eq!((old.vx, old.vy, old.radius), (new.vx, new.vy, new.radius));
        }
    }
    assert!(kept > 0);
}

#[test]
fn squares_survive_resize() {
    let budget = PerformanceTier::High.budget();
    let mut field = SquareField::seeded(&budget, ColorMode::Light, OLD.0, OLD.1, &mut Rng::new(9));
    run(&mut field, 5);
    let before = field.squares().to_vec();

    field.resize(NEW.0, NEW.1);

    assert_eq!(field.squares().len(), before.len());
    let mut kept = 0;
    for (old, new) in before.iter().zip(field.squares()) {
        if old.pos.x <= NEW.0 && old.pos.y <= NEW.1 {
            assert_eq!(old, new);
            kept += 1;
        } else {
            assert_eq!((old.size, old.angle, old.spin), (new.size, new.angle, new.spin));
        }
    }
    assert!(kept > 0);
}

#[test]
fn trail_particles_survive_resize() {
    let budget = PerformanceTier::High.budget();
    let mut field = TrailField::seeded(&budget, ColorMode::Dark, OLD.0, OLD.1, &mut Rng::new(5));
    run(&mut field, 8);
    let before = field.particles().to_vec();

    field.resize(NEW.0, NEW.1);

    assert_eq!(field.particles().len(), before.len());
    for (old, new) in before.iter().zip(field.particles()) {
        // Ages, lifetimes and trails are never reset by a resize.
        assert_eq!((old.age, old.max_life, old.trail_length), (new.age, new.max_life, new.trail_length));
        assert_eq!(old.trail, new.trail);
        assert_eq!(old.hue_offset, new.hue_offset);
        if inside(old.pos.x, old.pos.y) {
            assert_eq!(old.pos, new.pos);
        } else {
            assert!(inside(new.pos.x, new.pos.y));
        }
    }
}

#[test]
fn waves_keep_time_across_resize() {
    let budget = PerformanceTier::Low.budget();
    let mut field = WaveField::new(&budget, ColorMode::Dark, OLD.0, OLD.1);
    run(&mut field, 7);
    let time = field.time();
    let before = field.waves().to_vec();

    field.resize(NEW.0, NEW.1);

    assert_eq!(field.time(), time);
    for (old, new) in before.iter().zip(field.waves()) {
        assert_eq!((old.amplitude, old.phase, old.speed), (new.amplitude, new.phase, new.speed));
        assert_eq!(new.wavelength, NEW.0 * new.width_share);
    }
}
