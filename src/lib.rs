// src/lib.rs
//
// Library entry point: gens, kernels and the graph that renders them.

mod connection;
mod environment;
mod error;
mod generator;
mod graph;
mod kernel;
mod kernel_factory;
mod parameter_type;

pub mod kernels;

// Re-export key types for Rust consumers
pub use connection::{Binding, ConnectionKind, GenId, PortRef};
pub use environment::{
    DEFAULT_FRAME_SIZE, DEFAULT_SAMPLING_RATE, Environment, FRAME_SIZE_VAR, SAMPLING_RATE_VAR,
    SharedEnvironment,
};
pub use error::{GenError, GenResult};
pub use generator::{Bindings, Gen};
pub use graph::Graph;
pub use kernel::{Kernel, OutputBuffers, RenderContext, SlotReader};
pub use kernel_factory::{KernelFactory, KernelRegistry, SimpleKernelFactory};
pub use kernels::register_standard_kernels;
pub use parameter_type::ParameterType;
