// Domain layer: game-state and chat models plus the ports the engine depends on.

pub mod model;
pub mod ports;
