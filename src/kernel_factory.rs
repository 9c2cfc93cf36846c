// src/kernel_factory.rs

use std::collections::BTreeMap;

use log::debug;

use crate::error::{GenError, GenResult};
use crate::kernel::Kernel;

/// A factory capable of creating fresh kernel instances.
///
/// This is only used during graph construction.
pub trait KernelFactory: Send {
    /// Create one kernel instance
    fn create(&self) -> Box<dyn Kernel>;
}

/// Convenience factory wrapping a closure
pub struct SimpleKernelFactory<F>
where
    F: Fn() -> Box<dyn Kernel> + Send,
{
    create_fn: F,
}

impl<F> SimpleKernelFactory<F>
where
    F: Fn() -> Box<dyn Kernel> + Send,
{
    pub fn new(create_fn: F) -> Self {
        Self { create_fn }
    }
}

impl<F> KernelFactory for SimpleKernelFactory<F>
where
    F: Fn() -> Box<dyn Kernel> + Send,
{
    fn create(&self) -> Box<dyn Kernel> {
        (self.create_fn)()
    }
}

/// Kernel factories keyed by name.
#[derive(Default)]
pub struct KernelRegistry {
    factories: BTreeMap<String, Box<dyn KernelFactory>>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: impl KernelFactory + 'static) {
        let name = name.into();
        debug!("Registered kernel `{name}`");
        self.factories.insert(name, Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> GenResult<Box<dyn Kernel>> {
        self.factories
            .get(name)
            .map(|f| f.create())
            .ok_or_else(|| GenError::UnknownKernel {
                name: name.to_string(),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
