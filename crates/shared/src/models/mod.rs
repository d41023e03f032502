pub mod ask;
pub mod device;
pub mod earnings;

pub use ask::Ask;
pub use device::DeviceStats;
