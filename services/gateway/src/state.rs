use std::sync::Arc;
use stock_engine::{Simulator, SimulatorConfig};

#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<Simulator>,
}

impl AppState {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            simulator: Arc::new(Simulator::new(config)),
        }
    }
}
