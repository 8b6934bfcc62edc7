pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, System, NVec2};
pub use simulation::boundary::{Boundary, Quadrant};
pub use simulation::quadtree::{QuadTree, QuadNode, TreePoint};
pub use simulation::forces::{Acceleration, AccelSet, StarGravity, MutualGravity, MutualGravityBarnesHut, gravitational_force};
pub use simulation::integrator::{integrate, step};
pub use simulation::engine::{Engine, Interaction, TreeBounds, UpdateMode};
pub use simulation::params::Parameters;
pub use simulation::scenario::{Scenario, orbital_velocity};

pub use configuration::config::{EngineConfig, ParametersConfig, BodyConfig, ScenarioConfig, UpdateConfig, InteractionConfig};

pub use error::SimError;

pub use benchmark::benchmark::bench_update_modes;
