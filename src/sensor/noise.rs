use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Source of standard-normal samples for the generator.
pub trait NoiseSource {
    fn standard_normal(&mut self) -> f64;
}

/// Box-Muller sampler over any uniform RNG.
pub struct BoxMuller<R = StdRng> {
    rng: R,
}

impl BoxMuller<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BoxMuller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    // Uniform in (0, 1): ln(0) is undefined, so zero draws are rejected.
    fn open_unit(&mut self) -> f64 {
        loop {
            let x: f64 = self.rng.gen();
            if x > 0.0 {
                return x;
            }
        }
    }
}

impl<R: Rng> NoiseSource for BoxMuller<R> {
    fn standard_normal(&mut self) -> f64 {
        let u = self.open_unit();
        let v = self.open_unit();
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }
}
