//! Plant module - Fixed-step models of the controlled system

// ============================================================================
// PLANT TRAIT - One deterministic state advance per call
// ============================================================================

pub trait Plant {
    type State: Copy + Default;

    /// Advance `state` by one step of length `dt` under input `u`.
    fn step(&self, state: Self::State, u: f64, dt: f64) -> Self::State;

    fn output(&self, state: &Self::State) -> f64;
}

// ============================================================================
// SECOND-ORDER PLANT - x'' = -damping * x' + gain * u
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlantState {
    /// Output (position).
    pub x1: f64,
    /// Output derivative (velocity).
    pub x2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondOrderPlant {
    pub damping: f64,
    pub gain: f64,
}

/// G(s) = 4 / (s^2 + 2s)
pub const FIXED_PLANT: SecondOrderPlant = SecondOrderPlant {
    damping: 2.0,
    gain: 4.0,
};

impl Default for SecondOrderPlant {
    fn default() -> Self {
        FIXED_PLANT
    }
}

impl Plant for SecondOrderPlant {
    type State = PlantState;

    // Explicit Euler: both derivatives are taken from the incoming state.
    fn step(&self, state: PlantState, u: f64, dt: f64) -> PlantState {
        PlantState {
            x1: state.x1 + state.x2 * dt,
            x2: state.x2 + (-self.damping * state.x2 + self.gain * u) * dt,
        }
    }

    fn output(&self, state: &PlantState) -> f64 {
        state.x1
    }
}
