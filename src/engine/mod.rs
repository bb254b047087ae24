// Engine modules: physics and simulation timing

pub mod clock;
pub mod physics;
