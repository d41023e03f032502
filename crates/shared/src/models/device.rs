use serde::{Deserialize, Serialize};

/// One snapshot of a single accelerator, produced fresh each polling cycle.
/// Memory figures are in GB; utilization is a percentage in 0-100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeviceStats {
    pub utilization: f64,
    pub memory_used: f64,
    pub memory_total: f64,
}

impl DeviceStats {
    pub fn new(utilization: f64, memory_used: f64, memory_total: f64) -> Self {
        Self {
            utilization,
            memory_used,
            memory_total,
        }
    }

    pub fn memory_free(&self) -> f64 {
        self.memory_total - self.memory_used
    }
}
