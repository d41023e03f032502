use lazy_static::lazy_static;
use log::{debug, error};
use nvml_wrapper::Nvml;
use shared::models::device::DeviceStats;
use std::sync::Mutex;

/// Source of per-device utilization and memory occupancy. A `None` from
/// [`collect`](DeviceStatsProvider::collect) means telemetry is unavailable
/// this cycle; the caller must leave existing advertisements alone and let
/// the TTL do its work.
pub trait DeviceStatsProvider: Send + Sync {
    fn collect(&self) -> Option<Vec<DeviceStats>>;
}

// Initialize NVML once and reuse it across cycles
lazy_static! {
    static ref NVML: Mutex<Option<Nvml>> = Mutex::new(None);
}

const BYTES_PER_GB: f64 = 1_073_741_824.0;

#[derive(Debug, Default)]
pub struct NvmlStatsProvider;

impl NvmlStatsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceStatsProvider for NvmlStatsProvider {
    fn collect(&self) -> Option<Vec<DeviceStats>> {
        let mut nvml_guard = NVML.lock().unwrap();

        if nvml_guard.is_none() {
            match Nvml::init() {
                Ok(nvml) => *nvml_guard = Some(nvml),
                Err(e) => {
                    error!("Failed to initialize NVML: {e}");
                    return None;
                }
            }
        }

        let nvml = nvml_guard.as_ref().unwrap();

        let device_count = match nvml.device_count() {
            Ok(count) => count,
            Err(e) => {
                error!("Failed to get device count: {e}");
                return None;
            }
        };

        let mut stats = Vec::with_capacity(device_count as usize);
        for index in 0..device_count {
            let device = match nvml.device_by_index(index) {
                Ok(device) => device,
                Err(e) => {
                    error!("Failed to get device {index}: {e}");
                    return None;
                }
            };

            let utilization = match device.utilization_rates() {
                Ok(rates) => rates.gpu as f64,
                Err(e) => {
                    error!("Failed to read utilization for device {index}: {e}");
                    return None;
                }
            };

            let memory = match device.memory_info() {
                Ok(memory) => memory,
                Err(e) => {
                    error!("Failed to read memory info for device {index}: {e}");
                    return None;
                }
            };

            stats.push(DeviceStats::new(
                utilization,
                memory.used as f64 / BYTES_PER_GB,
                memory.total as f64 / BYTES_PER_GB,
            ));
        }

        debug!("Collected stats for {} device(s)", stats.len());
        Some(stats)
    }
}
