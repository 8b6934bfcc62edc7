pub mod states;
pub mod params;
pub mod engine;
pub mod boundary;
pub mod quadtree;
pub mod forces;
pub mod integrator;
pub mod scenario;
