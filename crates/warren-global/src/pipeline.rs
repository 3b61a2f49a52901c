//! The fixed global-step pipeline.

use crate::market::MarketStep;
use crate::power_creep::PowerCreepStep;
use crate::step::GlobalStep;
use crate::transfer::InterRoomTransferStep;

/// Names of the global steps, in execution order.
pub const GLOBAL_STEP_ORDER: &[&str] = &["market", "powerCreep", "interRoomTransfer"];

/// The standard global pipeline, in `GLOBAL_STEP_ORDER` order.
pub fn standard_global_steps() -> Vec<Box<dyn GlobalStep>> {
    vec![
        Box::new(MarketStep),
        Box::new(PowerCreepStep),
        Box::new(InterRoomTransferStep),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_matches_the_order_contract() {
        let names: Vec<&str> = standard_global_steps().iter().map(|s| s.name()).collect();
        assert_eq!(names, GLOBAL_STEP_ORDER);
    }
}
