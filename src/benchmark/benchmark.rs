use std::time::Instant;

use crate::simulation::engine::{Engine, Interaction, TreeBounds, UpdateMode};
use crate::simulation::params::Parameters;
use crate::simulation::scenario::{orbital_velocity, Scenario};
use crate::simulation::states::{Body, NVec2, System};

/// Star plus `n` bodies on circular orbits, laid out deterministically
fn ring_system(n: usize, p: &Parameters) -> System {
    let star = Body {
        x: NVec2::zeros(),
        v: NVec2::zeros(),
        m: 1.0e6,
        radius: 1.0,
        trail: Default::default(),
        trail_length: 0,
    };

    let bodies = (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let r = 10.0 + (i_f * 0.37).sin().abs() * 90.0;
            let angle = i_f * 2.399963; // golden angle
            let x = NVec2::new(r * angle.cos(), r * angle.sin());
            Body {
                x,
                v: orbital_velocity(&star, x, p.G, p.scale),
                m: 1.0,
                radius: 0.1,
                trail: Default::default(),
                trail_length: 0,
            }
        })
        .collect();

    System::new(star, bodies)
}

fn time_steps(engine: Engine, p: &Parameters, n: usize, steps: usize) -> f64 {
    let mut scenario = Scenario::new(engine, p.clone(), ring_system(n, p));
    // Warm up
    scenario.tick();

    let t0 = Instant::now();
    scenario.run(steps);
    t0.elapsed().as_secs_f64() / steps as f64
}

/// Time one `advance` per update mode and interaction for growing body counts
pub fn bench_update_modes() {
    let ns = [100, 200, 400, 800, 1600, 3200];
    let steps = 10;

    let parameters = Parameters {
        t_end: 1.0,
        h0: 0.001,
        G: 1.0,
        scale: 1.0,
        eps2: 1e-4,
        trail_length: 0,
    };

    let base = Engine {
        update: UpdateMode::Direct,
        interaction: Interaction::StarOnly,
        capacity: 4,
        theta: 0.7,
        bounds: TreeBounds::Fit,
    };

    for n in ns {
        let direct = time_steps(base.clone(), &parameters, n, steps);
        let tree = time_steps(Engine { update: UpdateMode::Tree, ..base.clone() }, &parameters, n, steps);
        let pairs = time_steps(Engine { interaction: Interaction::Direct, ..base.clone() }, &parameters, n, steps);
        let bh = time_steps(Engine { interaction: Interaction::BarnesHut, ..base.clone() }, &parameters, n, steps);

        println!(
            "N = {n:5}, direct = {:8.6} s, tree = {:8.6} s, pairs = {:8.6} s, BH = {:8.6} s",
            direct, tree, pairs, bh
        );
    }
}
