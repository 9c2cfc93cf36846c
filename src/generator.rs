// src/generator.rs
//
// The generator node: typed port registry plus frame buffers.

use std::fmt;

use smallvec::SmallVec;
use snafu::ensure;

use crate::connection::{Binding, ConnectionKind, GenId};
use crate::environment::SharedEnvironment;
use crate::error::{
    GenError, GenResult, NotInitializedSnafu, RegistrationClosedSnafu, ShapeMismatchSnafu,
    UninitializedRenderSnafu,
};
use crate::kernel::OutputBuffers;
use crate::parameter_type::ParameterType;

/// Sources bound to one input. Most inputs carry one or two.
pub type Bindings = SmallVec<[Binding; 2]>;

/// A generator node.
///
/// A gen owns its output buffers and the summed copy of each input. It
/// refers to other gens only through [`GenId`]s, which are resolved by the
/// [`Graph`](crate::Graph) that owns every gen.
///
/// Lifecycle:
/// - `Gen::new` binds the environment
/// - `init` captures frame size and sampling rate
/// - `register_*` declares ports, each call returning the next index
/// - `reset` zero-fills outputs before the first render
pub struct Gen {
    environment: SharedEnvironment,
    initialized: bool,
    frame_size: usize,
    sampling_rate: f64,
    nyquist: f64,

    outputs: Vec<Vec<f32>>,
    output_types: Vec<ParameterType>,

    inputs: Vec<Bindings>,
    input_types: Vec<ParameterType>,
    summed_inputs: Vec<Vec<f32>>,

    slots: Vec<Option<GenId>>,
    slot_types: Vec<ParameterType>,

    render_count: u64,
}

impl Gen {
    pub fn new(environment: SharedEnvironment) -> Self {
        Self {
            environment,
            initialized: false,
            frame_size: 0,
            sampling_rate: 0.0,
            nyquist: 0.0,
            outputs: Vec::new(),
            output_types: Vec::new(),
            inputs: Vec::new(),
            input_types: Vec::new(),
            summed_inputs: Vec::new(),
            slots: Vec::new(),
            slot_types: Vec::new(),
            render_count: 0,
        }
    }

    /// Capture the environment's frame size and sampling rate.
    ///
    /// Safe to call more than once; the environment is immutable so the
    /// captured values never change.
    pub fn init(&mut self) {
        self.frame_size = self.environment.frame_size();
        self.sampling_rate = self.environment.sampling_rate();
        self.nyquist = self.environment.nyquist();
        self.initialized = true;
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn environment(&self) -> &SharedEnvironment {
        &self.environment
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    #[inline]
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    #[inline]
    pub fn nyquist(&self) -> f64 {
        self.nyquist
    }

    #[inline]
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    // ───────────────────────────────────────────────────────────────
    // Outputs
    // ───────────────────────────────────────────────────────────────

    /// Append an output and return its index.
    ///
    /// Only the new output's buffer is allocated; existing buffers are left
    /// in place. The new buffer's contents are unspecified until `reset`.
    pub fn register_output(&mut self, parameter_type: ParameterType) -> GenResult<usize> {
        self.ensure_layout_open("register_output")?;

        let index = self.output_types.len();
        self.output_types.push(parameter_type);
        self.outputs.push(vec![0.0; self.frame_size]);

        Ok(index)
    }

    /// Drop every output registration and buffer.
    pub fn clear_outputs(&mut self) -> GenResult<()> {
        ensure!(
            self.render_count == 0,
            RegistrationClosedSnafu {
                render_count: self.render_count,
            }
        );

        self.output_types.clear();
        self.outputs.clear();
        Ok(())
    }

    /// Reallocate `output_count` buffers of `frame_size` samples.
    ///
    /// Previous contents are discarded and the new contents are unspecified:
    /// call `reset` before relying on silence.
    pub fn resize_outputs(&mut self) {
        let frame_size = self.frame_size;
        self.outputs = (0..self.output_types.len())
            .map(|_| vec![0.0; frame_size])
            .collect();
    }

    /// Zero every output sample and rewind the render count.
    pub fn reset(&mut self) {
        for buf in &mut self.outputs {
            buf.fill(0.0);
        }
        self.render_count = 0;
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.output_types.len()
    }

    pub fn output_types(&self) -> &[ParameterType] {
        &self.output_types
    }

    pub fn output_type(&self, index: usize) -> GenResult<ParameterType> {
        self.output_types
            .get(index)
            .copied()
            .ok_or_else(|| unregistered(ConnectionKind::Output, index, self.output_count()))
    }

    /// All output buffers, one per registered output.
    pub fn outputs(&self) -> &[Vec<f32>] {
        &self.outputs
    }

    /// Writable view of every output buffer.
    pub fn outputs_mut(&mut self) -> OutputBuffers<'_> {
        OutputBuffers::new(&mut self.outputs)
    }

    pub fn output(&self, index: usize) -> GenResult<&[f32]> {
        let count = self.output_count();
        self.outputs
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| unregistered(ConnectionKind::Output, index, count))
    }

    pub fn output_mut(&mut self, index: usize) -> GenResult<&mut [f32]> {
        let count = self.output_count();
        self.outputs
            .get_mut(index)
            .map(Vec::as_mut_slice)
            .ok_or_else(|| unregistered(ConnectionKind::Output, index, count))
    }

    // ───────────────────────────────────────────────────────────────
    // Inputs
    // ───────────────────────────────────────────────────────────────

    /// Append an input with no sources and return its index.
    ///
    /// An input with no bound sources sums to silence.
    pub fn register_input(&mut self, parameter_type: ParameterType) -> GenResult<usize> {
        self.ensure_layout_open("register_input")?;

        let index = self.input_types.len();
        self.input_types.push(parameter_type);
        self.inputs.push(Bindings::new());
        self.summed_inputs.push(vec![0.0; self.frame_size]);

        Ok(index)
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_types.len()
    }

    pub fn input_types(&self) -> &[ParameterType] {
        &self.input_types
    }

    pub fn input_type(&self, index: usize) -> GenResult<ParameterType> {
        self.input_types
            .get(index)
            .copied()
            .ok_or_else(|| unregistered(ConnectionKind::Input, index, self.input_count()))
    }

    /// Bind another source to an input. Sources on one input are summed.
    pub fn add_input(&mut self, index: usize, binding: Binding) -> GenResult<()> {
        self.bindings_mut(index)?.push(binding);
        Ok(())
    }

    /// Replace every source of an input with a single one.
    pub fn set_input(&mut self, index: usize, binding: Binding) -> GenResult<()> {
        let bindings = self.bindings_mut(index)?;
        bindings.clear();
        bindings.push(binding);
        Ok(())
    }

    pub fn clear_input(&mut self, index: usize) -> GenResult<()> {
        self.bindings_mut(index)?.clear();
        Ok(())
    }

    pub fn input_bindings(&self, index: usize) -> GenResult<&[Binding]> {
        self.inputs
            .get(index)
            .map(|b| b.as_slice())
            .ok_or_else(|| unregistered(ConnectionKind::Input, index, self.input_count()))
    }

    /// Every binding of every input, as `(input index, binding)`.
    pub fn bindings(&self) -> impl Iterator<Item = (usize, Binding)> + '_ {
        self.inputs
            .iter()
            .enumerate()
            .flat_map(|(i, bindings)| bindings.iter().map(move |&b| (i, b)))
    }

    pub fn summed_inputs(&self) -> &[Vec<f32>] {
        &self.summed_inputs
    }

    pub fn summed_input(&self, index: usize) -> GenResult<&[f32]> {
        self.summed_inputs
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| unregistered(ConnectionKind::Input, index, self.input_count()))
    }

    /// Recompute every summed input.
    ///
    /// `lookup` resolves a binding to the source's current output buffer.
    pub fn sum_inputs<'a, F>(&mut self, lookup: F) -> GenResult<()>
    where
        F: FnMut(Binding) -> GenResult<&'a [f32]>,
    {
        let mut summed = std::mem::take(&mut self.summed_inputs);
        let result = self.sum_inputs_into(&mut summed, lookup);
        self.summed_inputs = summed;
        result
    }

    /// Sum into buffers held outside the gen.
    ///
    /// The graph uses this while it holds shared borrows of other gens.
    pub(crate) fn sum_inputs_into<'a, F>(
        &self,
        summed: &mut [Vec<f32>],
        mut lookup: F,
    ) -> GenResult<()>
    where
        F: FnMut(Binding) -> GenResult<&'a [f32]>,
    {
        for (bindings, buf) in self.inputs.iter().zip(summed.iter_mut()) {
            buf.fill(0.0);
            for &binding in bindings {
                let source = lookup(binding)?;
                ensure!(
                    source.len() == self.frame_size,
                    ShapeMismatchSnafu {
                        expected: self.frame_size,
                        found: source.len(),
                    }
                );
                for (acc, s) in buf.iter_mut().zip(source) {
                    *acc += s;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn take_summed_inputs(&mut self) -> Vec<Vec<f32>> {
        std::mem::take(&mut self.summed_inputs)
    }

    pub(crate) fn restore_summed_inputs(&mut self, summed: Vec<Vec<f32>>) {
        self.summed_inputs = summed;
    }

    // ───────────────────────────────────────────────────────────────
    // Slots
    // ───────────────────────────────────────────────────────────────

    /// Append an empty child slot and return its index.
    pub fn register_slot(&mut self, parameter_type: ParameterType) -> GenResult<usize> {
        self.ensure_layout_open("register_slot")?;

        let index = self.slot_types.len();
        self.slot_types.push(parameter_type);
        self.slots.push(None);

        Ok(index)
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_types.len()
    }

    pub fn slot_types(&self) -> &[ParameterType] {
        &self.slot_types
    }

    pub fn slot_type(&self, index: usize) -> GenResult<ParameterType> {
        self.slot_types
            .get(index)
            .copied()
            .ok_or_else(|| unregistered(ConnectionKind::Slot, index, self.slot_count()))
    }

    pub fn set_slot(&mut self, index: usize, child: GenId) -> GenResult<()> {
        *self.slot_mut(index)? = Some(child);
        Ok(())
    }

    pub fn clear_slot(&mut self, index: usize) -> GenResult<()> {
        *self.slot_mut(index)? = None;
        Ok(())
    }

    pub fn slot(&self, index: usize) -> GenResult<Option<GenId>> {
        self.slots
            .get(index)
            .copied()
            .ok_or_else(|| unregistered(ConnectionKind::Slot, index, self.slot_count()))
    }

    pub fn slots(&self) -> &[Option<GenId>] {
        &self.slots
    }

    // ───────────────────────────────────────────────────────────────
    // Introspection and render bookkeeping
    // ───────────────────────────────────────────────────────────────

    /// Parameter type of any port, addressed by its connection kind.
    pub fn parameter_type(&self, kind: ConnectionKind, index: usize) -> GenResult<ParameterType> {
        match kind {
            ConnectionKind::Slot => self.slot_type(index),
            ConnectionKind::Input => self.input_type(index),
            ConnectionKind::Output => self.output_type(index),
        }
    }

    pub fn port_count(&self, kind: ConnectionKind) -> usize {
        match kind {
            ConnectionKind::Slot => self.slot_count(),
            ConnectionKind::Input => self.input_count(),
            ConnectionKind::Output => self.output_count(),
        }
    }

    pub(crate) fn check_renderable(&self) -> GenResult<()> {
        ensure!(
            self.initialized,
            UninitializedRenderSnafu {
                reason: "init() has not been called",
            }
        );
        ensure!(
            !self.output_types.is_empty(),
            UninitializedRenderSnafu {
                reason: "no outputs are registered",
            }
        );
        Ok(())
    }

    pub(crate) fn take_outputs(&mut self) -> Vec<Vec<f32>> {
        std::mem::take(&mut self.outputs)
    }

    pub(crate) fn restore_outputs(&mut self, outputs: Vec<Vec<f32>>) {
        self.outputs = outputs;
    }

    pub(crate) fn advance(&mut self) {
        self.render_count += 1;
    }

    fn ensure_layout_open(&self, operation: &'static str) -> GenResult<()> {
        ensure!(self.initialized, NotInitializedSnafu { operation });
        ensure!(
            self.render_count == 0,
            RegistrationClosedSnafu {
                render_count: self.render_count,
            }
        );
        Ok(())
    }

    fn bindings_mut(&mut self, index: usize) -> GenResult<&mut Bindings> {
        let count = self.input_count();
        self.inputs
            .get_mut(index)
            .ok_or_else(|| unregistered(ConnectionKind::Input, index, count))
    }

    fn slot_mut(&mut self, index: usize) -> GenResult<&mut Option<GenId>> {
        let count = self.slot_count();
        self.slots
            .get_mut(index)
            .ok_or_else(|| unregistered(ConnectionKind::Slot, index, count))
    }
}

fn unregistered(kind: ConnectionKind, index: usize, count: usize) -> GenError {
    GenError::UnregisteredIndex { kind, index, count }
}

impl fmt::Debug for Gen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gen")
            .field("frame_size", &self.frame_size)
            .field("sampling_rate", &self.sampling_rate)
            .field("output_types", &self.output_types)
            .field("input_types", &self.input_types)
            .field("inputs", &self.inputs)
            .field("slot_types", &self.slot_types)
            .field("slots", &self.slots)
            .field("render_count", &self.render_count)
            .finish()
    }
}

impl fmt::Display for Gen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Gen: {} inputs, {} outputs, {} slots @ {}>",
            self.input_count(),
            self.output_count(),
            self.slot_count(),
            self.render_count
        )
    }
}
