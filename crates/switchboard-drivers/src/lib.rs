//! Driver implementations and the default registry.

use switchboard_core::DriverRegistry;

pub mod memory;

pub use memory::MemoryDriver;

/// The registry of built-in drivers, keyed by the names device
/// records use.
pub fn registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register("memory", |_device| Ok(Box::new(MemoryDriver::new())));
    registry
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_builtin_drivers() {
        assert_eq!(registry().driver_names(), vec!["memory"]);
    }
}
