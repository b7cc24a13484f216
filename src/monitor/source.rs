//! Reading sources for the monitoring loop

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::schema::{
    Reading, AIR_TEMPERATURE, PROCESS_TEMPERATURE, ROTATIONAL_SPEED, TOOL_WEAR, TORQUE,
};

/// Zero-argument producer of readings.
pub trait ReadingSource {
    /// Produce the next reading
    fn next_reading(&mut self) -> Result<Reading>;
}

impl<F> ReadingSource for F
where
    F: FnMut() -> Result<Reading>,
{
    fn next_reading(&mut self) -> Result<Reading> {
        self()
    }
}

/// Simulated machine sensor.
///
/// Draws each measurement uniformly from its operating range, rounded to two
/// decimals. With `stress_probability`, torque and tool wear are pushed into
/// their high-stress bands to provoke failures.
#[derive(Debug)]
pub struct SimulatedSensor {
    rng: StdRng,
    stress_probability: f64,
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSensor {
    /// Default stress probability
    pub const DEFAULT_STRESS_PROBABILITY: f64 = 0.5;

    /// Create a sensor seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            stress_probability: Self::DEFAULT_STRESS_PROBABILITY,
        }
    }

    /// Create a reproducible sensor
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            stress_probability: Self::DEFAULT_STRESS_PROBABILITY,
        }
    }

    /// Set the probability of a high-stress reading, clamped to [0, 1].
    ///
    /// NaN falls back to the default.
    pub fn with_stress_probability(mut self, probability: f64) -> Self {
        self.stress_probability = if probability.is_nan() {
            Self::DEFAULT_STRESS_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    fn sample(&mut self, low: f64, high: f64) -> f64 {
        (self.rng.random_range(low..high) * 100.0).round() / 100.0
    }
}

impl ReadingSource for SimulatedSensor {
    fn next_reading(&mut self) -> Result<Reading> {
        let mut reading = Reading::new()
            .with(AIR_TEMPERATURE, self.sample(290.0, 340.0))
            .with(PROCESS_TEMPERATURE, self.sample(290.0, 370.0))
            .with(ROTATIONAL_SPEED, self.sample(500.0, 5000.0))
            .with(TORQUE, self.sample(2.0, 250.0))
            .with(TOOL_WEAR, self.sample(0.0, 600.0));

        if self.rng.random_bool(self.stress_probability) {
            reading.insert(TORQUE, self.sample(200.0, 250.0));
            reading.insert(TOOL_WEAR, self.sample(550.0, 600.0));
        }

        Ok(reading)
    }
}
