use super::LatestFrame;
use crate::prelude::*;

/// One integration step per rendered frame
pub fn advance_simulation(
    mut context: ResMut<SimulationContext>,
    mut latest_frame: ResMut<LatestFrame>,
) {
    **latest_frame = Some(context.advance_frame());
}
