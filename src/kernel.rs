// src/kernel.rs

use std::ops::{Index, IndexMut};

use crate::connection::GenId;
use crate::error::GenResult;
use crate::generator::Gen;

/// Context passed to kernels during rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Samples per frame
    pub frame_size: usize,

    /// Sample rate captured by the gen's `init`
    pub sampling_rate: f64,

    /// Half the sample rate
    pub nyquist: f64,

    /// Frames the gen had rendered before this call
    pub render_count: u64,
}

impl RenderContext {
    pub fn for_gen(node: &Gen) -> Self {
        Self {
            frame_size: node.frame_size(),
            sampling_rate: node.sampling_rate(),
            nyquist: node.nyquist(),
            render_count: node.render_count(),
        }
    }
}

/// Read access to the gens plugged into a gen's slots.
///
/// Which output of a slotted gen is read is up to the kernel.
#[derive(Clone, Copy)]
pub struct SlotReader<'a> {
    gens: &'a [Gen],
    slots: &'a [Option<GenId>],
}

impl<'a> SlotReader<'a> {
    pub fn new(gens: &'a [Gen], slots: &'a [Option<GenId>]) -> Self {
        Self { gens, slots }
    }

    /// A reader with no slots, for kernels rendered outside a graph.
    pub fn empty() -> Self {
        Self {
            gens: Default::default(),
            slots: Default::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn child(&self, slot: usize) -> Option<GenId> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn child_gen(&self, slot: usize) -> Option<&'a Gen> {
        self.child(slot).and_then(|id| self.gens.get(id.index()))
    }

    /// Current buffer of output `output` of the gen in `slot`.
    ///
    /// `None` when the slot is empty or the child has no such output.
    pub fn output(&self, slot: usize, output: usize) -> Option<&'a [f32]> {
        self.child_gen(slot)
            .and_then(|child| child.outputs().get(output))
            .map(Vec::as_slice)
    }
}

/// Writable view of a gen's output buffers.
///
/// Hands out sample slices only, so a buffer can be overwritten but never
/// resized or replaced and always keeps the gen's frame size.
pub struct OutputBuffers<'a> {
    buffers: &'a mut [Vec<f32>],
}

impl<'a> OutputBuffers<'a> {
    pub(crate) fn new(buffers: &'a mut [Vec<f32>]) -> Self {
        Self { buffers }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn get(&self, output: usize) -> Option<&[f32]> {
        self.buffers.get(output).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, output: usize) -> Option<&mut [f32]> {
        self.buffers.get_mut(output).map(Vec::as_mut_slice)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.buffers.iter_mut().map(Vec::as_mut_slice)
    }
}

impl Index<usize> for OutputBuffers<'_> {
    type Output = [f32];

    fn index(&self, output: usize) -> &[f32] {
        &self.buffers[output]
    }
}

impl IndexMut<usize> for OutputBuffers<'_> {
    fn index_mut(&mut self, output: usize) -> &mut [f32] {
        &mut self.buffers[output]
    }
}

/// Signal-generation logic of one gen.
///
/// Kernels:
/// - declare their ports in `configure`
/// - do NOT resolve bindings (the graph sums inputs first)
/// - do NOT allocate in `render`
/// - ONLY write the output buffers they were given
pub trait Kernel: Send {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Register inputs, outputs and slots on a freshly initialised gen.
    fn configure(&mut self, node: &mut Gen) -> GenResult<()>;

    /// Produce one frame.
    ///
    /// The graph guarantees:
    /// - `inputs` holds one summed buffer per registered input
    /// - every slotted gen and input source has already rendered this frame
    /// - `outputs` holds one `frame_size` buffer per registered output
    fn render(
        &mut self,
        ctx: &RenderContext,
        inputs: &[Vec<f32>],
        slots: &SlotReader<'_>,
        outputs: &mut OutputBuffers<'_>,
    );

    /// Return internal state to its initial conditions.
    fn reset(&mut self) {}

    /// Set a parameter value.
    fn set_param(&mut self, _param_id: u32, _value: f32) {}
}
