use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The stochastic draws the simulation consumes.
pub trait RandomSource {
    /// Gap between one customer's arrival and the next.
    fn inter_arrival_time(&mut self) -> f64;
    /// Uniform trial compared against the greedy probability.
    fn customer_type(&mut self) -> f64;
    fn service_time(&mut self) -> f64;
    /// Uniform trial compared against the resting probability.
    fn rest_trial(&mut self) -> f64;
    fn rest_period(&mut self) -> f64;
}

/// Five independent seeded streams, one per draw.
pub struct SeededRandom {
    arrival: StdRng,
    service: StdRng,
    rest_trial: StdRng,
    rest_period: StdRng,
    customer_type: StdRng,
    arrival_rate: f64,
    service_rate: f64,
    resting_rate: f64,
}

impl SeededRandom {
    pub fn new(seed: u64, arrival_rate: f64, service_rate: f64, resting_rate: f64) -> Self {
        Self {
            arrival: StdRng::seed_from_u64(seed),
            service: StdRng::seed_from_u64(seed.wrapping_add(1)),
            rest_trial: StdRng::seed_from_u64(seed.wrapping_add(2)),
            rest_period: StdRng::seed_from_u64(seed.wrapping_add(3)),
            customer_type: StdRng::seed_from_u64(seed.wrapping_add(4)),
            arrival_rate,
            service_rate,
            resting_rate,
        }
    }
}

impl RandomSource for SeededRandom {
    fn inter_arrival_time(&mut self) -> f64 {
        exponential(&mut self.arrival, self.arrival_rate)
    }

    fn customer_type(&mut self) -> f64 {
        self.customer_type.gen::<f64>()
    }

    fn service_time(&mut self) -> f64 {
        exponential(&mut self.service, self.service_rate)
    }

    fn rest_trial(&mut self) -> f64 {
        self.rest_trial.gen::<f64>()
    }

    fn rest_period(&mut self) -> f64 {
        exponential(&mut self.rest_period, self.resting_rate)
    }
}

fn exponential(rng: &mut StdRng, rate: f64) -> f64 {
    let mut u = rng.gen::<f64>();
    if u <= f64::MIN_POSITIVE {
        u = f64::MIN_POSITIVE;
    }
    -u.ln() / rate
}

/// Returns the same value for every draw of a kind.
#[derive(Clone, Debug)]
pub struct FixedRandom {
    pub inter_arrival_time: f64,
    pub customer_type: f64,
    pub service_time: f64,
    pub rest_trial: f64,
    pub rest_period: f64,
}

impl Default for FixedRandom {
    fn default() -> Self {
        Self {
            inter_arrival_time: 1.0,
            customer_type: 1.0,
            service_time: 1.0,
            rest_trial: 1.0,
            rest_period: 0.0,
        }
    }
}

impl RandomSource for FixedRandom {
    fn inter_arrival_time(&mut self) -> f64 {
        self.inter_arrival_time
    }

    fn customer_type(&mut self) -> f64 {
        self.customer_type
    }

    fn service_time(&mut self) -> f64 {
        self.service_time
    }

    fn rest_trial(&mut self) -> f64 {
        self.rest_trial
    }

    fn rest_period(&mut self) -> f64 {
        self.rest_period
    }
}
