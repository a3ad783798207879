//! Random rolls for block and critical checks.
//!
//! Seed it for reproducible runs, or pin every roll to a constant in tests.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone)]
pub enum CombatRng {
    Random(fastrand::Rng),
    /// Every roll returns this value.
    Fixed(f32),
}

impl Default for CombatRng {
    fn default() -> Self {
        CombatRng::Random(fastrand::Rng::new())
    }
}

impl CombatRng {
    pub fn seeded(seed: u64) -> Self {
        CombatRng::Random(fastrand::Rng::with_seed(seed))
    }

    pub fn fixed(value: f32) -> Self {
        CombatRng::Fixed(value.clamp(0.0, 1.0))
    }

    /// Uniform roll in `0..1`.
    pub fn roll(&mut self) -> f32 {
        match self {
            CombatRng::Random(rng) => rng.f32(),
            CombatRng::Fixed(value) => *value,
        }
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.roll() < p
    }
}
