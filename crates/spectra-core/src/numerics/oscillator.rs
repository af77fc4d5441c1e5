use std::f64::consts::TAU;

/// Integration constants of a single-degree-of-freedom oscillator for one
/// natural frequency, damping ratio and time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorConstants {
    pub omega_n: f64,
    pub omega_d: f64,
    pub dt: f64,
    dt2: f64,
    kd: f64,
}

impl OscillatorConstants {
    /// `omega_d` is the direct product `omega_n * xi`, which is what the
    /// average-acceleration recursion below is written against.
    pub fn new(frequency: f64, xi: f64, dt: f64) -> Self {
        let omega_n = TAU * frequency;
        let omega_d = omega_n * xi;
        let dt2 = dt * dt;
        let kd = 1.0 + omega_d * dt + dt2 * omega_n * omega_n / 4.0;
        Self {
            omega_n,
            omega_d,
            dt,
            dt2,
            kd,
        }
    }
}

/// Relative response of the oscillator at the last integrated step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorState {
    pub displacement: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub peak_displacement: f64,
}

impl OscillatorState {
    /// State at rest, with the relative acceleration taken from the equation
    /// of motion under the first base-excitation sample.
    pub fn at_rest(constants: &OscillatorConstants, initial_base_acceleration: f64) -> Self {
        let displacement = 0.0;
        let velocity = 0.0;
        let acceleration = -initial_base_acceleration
            - 2.0 * constants.omega_d * velocity
            - constants.omega_n * constants.omega_n * displacement;
        Self {
            displacement,
            velocity,
            acceleration,
            peak_displacement: 0.0,
        }
    }

    /// Advance one Newmark average-acceleration step under `base_acceleration`.
    #[inline]
    pub fn step(&mut self, constants: &OscillatorConstants, base_acceleration: f64) {
        let OscillatorConstants {
            omega_d, dt, dt2, kd, ..
        } = *constants;

        let displacement = ((1.0 + omega_d * dt) * self.displacement
            + (dt + 0.5 * omega_d * dt2) * self.velocity
            + dt2 / 4.0 * self.acceleration
            - dt2 / 4.0 * base_acceleration)
            / kd;
        let acceleration = 4.0 / dt2 * (displacement - self.displacement)
            - 4.0 / dt * self.velocity
            - self.acceleration;
        let velocity = self.velocity + dt / 2.0 * (self.acceleration + acceleration);

        if displacement.abs() > self.peak_displacement {
            self.peak_displacement = displacement.abs();
        }
        self.displacement = displacement;
        self.velocity = velocity;
        self.acceleration = acceleration;
    }

    /// Integrate a full base-acceleration history starting from rest and
    /// return the final state.
    pub fn integrate(constants: &OscillatorConstants, history: &[f64]) -> Self {
        let initial = history.first().copied().unwrap_or(0.0);
        let mut state = Self::at_rest(constants, initial);
        for &base_acceleration in history {
            state.step(constants, base_acceleration);
        }
        state
    }
}
