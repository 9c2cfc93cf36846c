// src/kernels/mod.rs
//
// Structural kernels shipped with the engine.

mod utility;

pub use utility::*;

use crate::kernel_factory::{KernelRegistry, SimpleKernelFactory};

// ═══════════════════════════════════════════════════════════════════
// Kernel names
// ═══════════════════════════════════════════════════════════════════

pub mod kernel_names {
    pub const CONSTANT: &str = "constant";
    pub const ADD: &str = "add";
    pub const SCALE: &str = "scale";
}

// ═══════════════════════════════════════════════════════════════════
// Parameter IDs (per-kernel)
// ═══════════════════════════════════════════════════════════════════

pub mod params {
    // Constant params
    pub const VALUE: u32 = 0;
}

/// Populate the registry with all standard kernels.
pub fn register_standard_kernels(registry: &mut KernelRegistry) {
    registry.register(
        kernel_names::CONSTANT,
        SimpleKernelFactory::new(|| Box::new(Constant::new(0.0))),
    );
    registry.register(
        kernel_names::ADD,
        SimpleKernelFactory::new(|| Box::new(Add::new())),
    );
    registry.register(
        kernel_names::SCALE,
        SimpleKernelFactory::new(|| Box::new(Scale::new())),
    );
}
