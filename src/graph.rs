//! Arena-owned gen graph with dependency-ordered frame rendering.
//!
//! The graph owns every gen and its kernel. Gens refer to one another only
//! through [`GenId`] indices, so any topology can be described without
//! ownership cycles; the render order rejects actual cycles.

use std::collections::VecDeque;
use std::fmt::Write as _;

use log::{debug, trace, warn};

use strum::IntoEnumIterator;

use crate::{
    connection::{Binding, ConnectionKind, GenId, PortRef},
    environment::SharedEnvironment,
    error::{GenError, GenResult},
    generator::Gen,
    kernel::{Kernel, OutputBuffers, RenderContext, SlotReader},
    kernel_factory::KernelRegistry,
    parameter_type::ParameterType,
};

/// The gen graph
pub struct Graph {
    environment: SharedEnvironment,
    gens: Vec<Gen>,
    kernels: Vec<Box<dyn Kernel>>,

    /// Dependency order, recomputed after any topology change
    eval_order: Vec<GenId>,
    order_dirty: bool,
}

impl Graph {
    pub fn new(environment: SharedEnvironment) -> Self {
        Self {
            environment,
            gens: Vec::new(),
            kernels: Vec::new(),
            eval_order: Vec::new(),
            order_dirty: false,
        }
    }

    pub fn environment(&self) -> &SharedEnvironment {
        &self.environment
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.gens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gens.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = GenId> {
        (0..self.gens.len()).map(GenId)
    }

    /// Add a gen built against the graph's environment.
    pub fn add(&mut self, kernel: Box<dyn Kernel>) -> GenResult<GenId> {
        let environment = self.environment.clone();
        self.add_with_environment(environment, kernel)
    }

    /// Add a gen built against another environment.
    ///
    /// Frame sizes are compared when the gen is wired; a mismatch is
    /// reported as [`GenError::ShapeMismatch`].
    pub fn add_with_environment(
        &mut self,
        environment: SharedEnvironment,
        mut kernel: Box<dyn Kernel>,
    ) -> GenResult<GenId> {
        let mut node = Gen::new(environment);
        node.init();
        kernel.configure(&mut node)?;
        node.reset();

        let id = GenId(self.gens.len());
        debug!("Added {} gen {}: {}", kernel.name(), id, node);

        self.gens.push(node);
        self.kernels.push(kernel);
        self.order_dirty = true;

        Ok(id)
    }

    /// Add a gen whose kernel is created by name from a registry.
    pub fn add_named(&mut self, registry: &KernelRegistry, name: &str) -> GenResult<GenId> {
        let kernel = registry.create(name)?;
        self.add(kernel)
    }

    pub fn node(&self, id: GenId) -> GenResult<&Gen> {
        self.gens.get(id.0).ok_or(GenError::UnknownGen { id })
    }

    /// Mutable access to a gen. Counts as a topology change.
    pub fn node_mut(&mut self, id: GenId) -> GenResult<&mut Gen> {
        self.order_dirty = true;
        self.gens.get_mut(id.0).ok_or(GenError::UnknownGen { id })
    }

    pub fn kernel_name(&self, id: GenId) -> GenResult<&'static str> {
        self.kernels
            .get(id.0)
            .map(|k| k.name())
            .ok_or(GenError::UnknownGen { id })
    }

    pub fn output(&self, id: GenId, index: usize) -> GenResult<&[f32]> {
        self.node(id)?.output(index)
    }

    /// Bind `from`'s output to `to`'s input, summing with existing sources.
    pub fn connect(&mut self, from: GenId, output: usize, to: GenId, input: usize) -> GenResult<()> {
        self.check_binding(from, output, to)?;
        self.node_mut(to)?.add_input(input, Binding::new(from, output))?;
        debug!("Connected {from}.Output[{output}] -> {to}.Input[{input}]");
        Ok(())
    }

    /// Bind `from`'s output to `to`'s input, replacing existing sources.
    pub fn set_input(&mut self, from: GenId, output: usize, to: GenId, input: usize) -> GenResult<()> {
        self.check_binding(from, output, to)?;
        self.node_mut(to)?.set_input(input, Binding::new(from, output))?;
        debug!("Set {to}.Input[{input}] <- {from}.Output[{output}]");
        Ok(())
    }

    /// Remove every source from an input.
    pub fn disconnect_input(&mut self, to: GenId, input: usize) -> GenResult<()> {
        self.node_mut(to)?.clear_input(input)?;
        debug!("Cleared {to}.Input[{input}]");
        Ok(())
    }

    /// Plug `child` into a slot of `to`.
    pub fn set_slot(&mut self, to: GenId, slot: usize, child: GenId) -> GenResult<()> {
        let expected = self.node(to)?.frame_size();
        let found = self.node(child)?.frame_size();
        if expected != found {
            warn!("Rejected slot {to}.Slot[{slot}] <- {child}: frame size {found} != {expected}");
            return Err(GenError::ShapeMismatch { expected, found });
        }

        self.node_mut(to)?.set_slot(slot, child)?;
        debug!("Set {to}.Slot[{slot}] -> {child}");
        Ok(())
    }

    pub fn clear_slot(&mut self, to: GenId, slot: usize) -> GenResult<()> {
        self.node_mut(to)?.clear_slot(slot)
    }

    /// Parameter type of the port a reference points at.
    pub fn resolve(&self, port: PortRef) -> GenResult<ParameterType> {
        self.node(port.node)?.parameter_type(port.kind, port.index)
    }

    /// Set a parameter on a gen's kernel.
    pub fn set_param(&mut self, id: GenId, param_id: u32, value: f32) -> GenResult<()> {
        let kernel = self
            .kernels
            .get_mut(id.0)
            .ok_or(GenError::UnknownGen { id })?;
        kernel.set_param(param_id, value);
        Ok(())
    }

    /// Dependency order: every input source and slotted child comes before
    /// the gen that reads it.
    pub fn render_order(&mut self) -> GenResult<&[GenId]> {
        if self.order_dirty {
            self.eval_order = self.topological_sort()?;
            self.order_dirty = false;
        }
        Ok(&self.eval_order)
    }

    /// Gens that must render before `idx`, without duplicates.
    fn dependencies(&self, idx: usize) -> GenResult<Vec<usize>> {
        let node = &self.gens[idx];
        let mut deps: Vec<usize> = node
            .bindings()
            .map(|(_, b)| b.source)
            .chain(node.slots().iter().flatten().copied())
            .map(|id| id.0)
            .collect();
        deps.sort_unstable();
        deps.dedup();

        if let Some(&missing) = deps.iter().find(|&&d| d >= self.gens.len()) {
            return Err(GenError::UnknownGen { id: GenId(missing) });
        }
        Ok(deps)
    }

    /// Compute topological sort of the graph (Kahn's algorithm)
    fn topological_sort(&self) -> GenResult<Vec<GenId>> {
        let n = self.gens.len();

        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for idx in 0..n {
            let deps = self.dependencies(idx)?;
            in_degree[idx] = deps.len();
            for dep in deps {
                dependents[dep].push(idx);
            }
        }

        // Sources first, in insertion order
        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut result = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            result.push(GenId(idx));
            for &dependent in &dependents[idx] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if result.len() < n {
            let stuck = (0..n)
                .find(|&i| in_degree[i] > 0)
                .map(GenId)
                .unwrap_or(GenId(0));
            warn!("Graph contains a cycle through {stuck}");
            return Err(GenError::CycleDetected { id: stuck });
        }

        Ok(result)
    }

    /// Render every gen once, in dependency order.
    ///
    /// The whole frame is validated first; on error no gen has rendered.
    pub fn render_frame(&mut self) -> GenResult<()> {
        self.render_order()?;
        self.check_frame()?;

        // Index iteration avoids cloning eval_order
        for i in 0..self.eval_order.len() {
            let id = self.eval_order[i];
            self.render_gen(id)?;
        }

        trace!("Rendered frame over {} gens", self.eval_order.len());
        Ok(())
    }

    pub fn render_frames(&mut self, frames: usize) -> GenResult<()> {
        for _ in 0..frames {
            self.render_frame()?;
        }
        Ok(())
    }

    /// Every gen in the render order must be renderable and every bound
    /// source must match the frame size of the gen reading it.
    fn check_frame(&self) -> GenResult<()> {
        for &id in &self.eval_order {
            let node = self.node(id)?;
            node.check_renderable()?;

            let expected = node.frame_size();
            for (input, binding) in node.bindings() {
                let found = source_output(&self.gens, binding)?.len();
                if found != expected {
                    warn!(
                        "Rejected frame: {id}.Input[{input}] <- {} has frame size {found} != {expected}",
                        binding.source
                    );
                    return Err(GenError::ShapeMismatch { expected, found });
                }
            }
        }
        Ok(())
    }

    fn render_gen(&mut self, id: GenId) -> GenResult<()> {
        let idx = id.0;

        // Sum bound sources into the gen's input buffers
        let mut summed = self.gens[idx].take_summed_inputs();
        let gens = &self.gens;
        let result = gens[idx].sum_inputs_into(&mut summed, |b| source_output(gens, b));
        self.gens[idx].restore_summed_inputs(summed);
        if let Err(e) = result {
            warn!("Failed to sum inputs of {id}: {e}");
            return Err(e);
        }

        // Hand the output buffers to the kernel while other gens stay readable
        let ctx = RenderContext::for_gen(&self.gens[idx]);
        let mut outputs = self.gens[idx].take_outputs();
        {
            let gens = &self.gens;
            let slots = SlotReader::new(gens, gens[idx].slots());
            let mut buffers = OutputBuffers::new(&mut outputs);
            self.kernels[idx].render(&ctx, gens[idx].summed_inputs(), &slots, &mut buffers);
        }
        self.gens[idx].restore_outputs(outputs);
        self.gens[idx].advance();

        Ok(())
    }

    /// Reset every gen and kernel.
    pub fn reset(&mut self) {
        for node in &mut self.gens {
            node.reset();
        }
        for kernel in &mut self.kernels {
            kernel.reset();
        }
    }

    /// Indented listing of gens, their ports and bindings.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (idx, (node, kernel)) in self.gens.iter().zip(&self.kernels).enumerate() {
            let _ = writeln!(out, "{} {} {}", GenId(idx), kernel.name(), node);

            for kind in ConnectionKind::iter() {
                for i in 0..node.port_count(kind) {
                    let Ok(pt) = node.parameter_type(kind, i) else {
                        continue;
                    };
                    let _ = write!(out, "  {kind}[{i}] {pt}");
                    let _ = match kind {
                        ConnectionKind::Slot => match node.slots()[i] {
                            Some(child) => writeln!(out, " -> {child}"),
                            None => writeln!(out, " -> <empty>"),
                        },
                        ConnectionKind::Input => {
                            let sources: Vec<String> = node
                                .input_bindings(i)
                                .unwrap_or_default()
                                .iter()
                                .map(|b| PortRef::output(b.source, b.output).to_string())
                                .collect();
                            if sources.is_empty() {
                                writeln!(out, " <- <empty>")
                            } else {
                                writeln!(out, " <- {}", sources.join(", "))
                            }
                        }
                        ConnectionKind::Output => writeln!(out),
                    };
                }
            }
        }
        out
    }

    /// Validate a source port and frame-size compatibility before binding.
    fn check_binding(&self, from: GenId, output: usize, to: GenId) -> GenResult<()> {
        let source = self.node(from)?;
        source.output_type(output)?;

        let expected = self.node(to)?.frame_size();
        let found = source.frame_size();
        if expected != found {
            warn!("Rejected binding {from} -> {to}: frame size {found} != {expected}");
            return Err(GenError::ShapeMismatch { expected, found });
        }
        Ok(())
    }
}

fn source_output(gens: &[Gen], binding: Binding) -> GenResult<&[f32]> {
    gens.get(binding.source.0)
        .ok_or(GenError::UnknownGen { id: binding.source })?
        .output(binding.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionKind;
    use crate::environment::Environment;
    use crate::kernels::{Add, Constant, Scale, kernel_names, params, register_standard_kernels};

    fn graph(frame_size: usize) -> Graph {
        Graph::new(Environment::new(44_100.0, frame_size).unwrap().shared())
    }

    #[test]
    fn test_empty_graph_renders() {
        let mut g = graph(8);
        assert!(g.is_empty());
        assert!(g.render_order().unwrap().is_empty());
        assert!(g.render_frame().is_ok());
    }

    #[test]
    fn test_add_initialises_and_resets() {
        let mut g = graph(16);
        let id = g.add(Box::new(Add::new())).unwrap();
        let node = g.node(id).unwrap();

        assert!(node.is_initialized());
        assert_eq!(node.frame_size(), 16);
        assert_eq!(node.input_count(), 1);
        assert_eq!(node.output_count(), 1);
        assert!(node.outputs()[0].iter().all(|&s| s == 0.0));
        assert_eq!(g.kernel_name(id).unwrap(), "Add");
    }

    #[test]
    fn test_two_sources_sum_on_one_input() {
        let mut g = graph(4);
        let a = g.add(Box::new(Constant::new(0.25))).unwrap();
        let b = g.add(Box::new(Constant::new(1.5))).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();

        g.connect(a, 0, sum, 0).unwrap();
        g.connect(b, 0, sum, 0).unwrap();
        g.render_frame().unwrap();

        assert_eq!(g.node(sum).unwrap().summed_input(0).unwrap(), &[1.75_f32; 4]);
        assert_eq!(g.output(sum, 0).unwrap(), &[1.75_f32; 4]);
        assert_eq!(g.node(sum).unwrap().render_count(), 1);
    }

    #[test]
    fn test_set_input_replaces_sources() {
        let mut g = graph(4);
        let a = g.add(Box::new(Constant::new(1.0))).unwrap();
        let b = g.add(Box::new(Constant::new(2.0))).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();

        g.connect(a, 0, sum, 0).unwrap();
        g.set_input(b, 0, sum, 0).unwrap();
        g.render_frame().unwrap();
        assert_eq!(g.output(sum, 0).unwrap(), &[2.0_f32; 4]);

        g.disconnect_input(sum, 0).unwrap();
        g.render_frame().unwrap();
        assert_eq!(g.output(sum, 0).unwrap(), &[0.0_f32; 4]);
    }

    #[test]
    fn test_render_order_follows_dependencies() {
        let mut g = graph(4);
        // Added downstream-first so insertion order is not a valid order
        let scale = g.add(Box::new(Scale::new())).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();
        let a = g.add(Box::new(Constant::new(1.0))).unwrap();
        let factor = g.add(Box::new(Constant::new(3.0))).unwrap();

        g.connect(a, 0, sum, 0).unwrap();
        g.connect(a, 0, sum, 0).unwrap();
        g.connect(sum, 0, scale, 0).unwrap();
        g.set_slot(scale, 0, factor).unwrap();

        let order = g.render_order().unwrap().to_vec();
        let pos = |id: GenId| order.iter().position(|&o| o == id).unwrap();
        assert_eq!(order.len(), 4);
        assert!(pos(a) < pos(sum));
        assert!(pos(sum) < pos(scale));
        assert!(pos(factor) < pos(scale));

        g.render_frame().unwrap();
        assert_eq!(g.output(sum, 0).unwrap(), &[2.0_f32; 4]);
        assert_eq!(g.output(scale, 0).unwrap(), &[6.0_f32; 4]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut g = graph(4);
        let x = g.add(Box::new(Add::new())).unwrap();
        let y = g.add(Box::new(Add::new())).unwrap();
        g.connect(x, 0, y, 0).unwrap();
        g.connect(y, 0, x, 0).unwrap();

        assert!(matches!(
            g.render_order(),
            Err(GenError::CycleDetected { .. })
        ));
        assert!(matches!(
            g.render_frame(),
            Err(GenError::CycleDetected { .. })
        ));

        g.disconnect_input(x, 0).unwrap();
        assert!(g.render_frame().is_ok());
    }

    #[test]
    fn test_connect_validates_ports() {
        let mut g = graph(4);
        let a = g.add(Box::new(Constant::new(1.0))).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();

        assert_eq!(
            g.connect(a, 1, sum, 0),
            Err(GenError::UnregisteredIndex {
                kind: ConnectionKind::Output,
                index: 1,
                count: 1,
            })
        );
        assert_eq!(
            g.connect(a, 0, sum, 2),
            Err(GenError::UnregisteredIndex {
                kind: ConnectionKind::Input,
                index: 2,
                count: 1,
            })
        );
        assert_eq!(
            g.connect(GenId(42), 0, sum, 0),
            Err(GenError::UnknownGen { id: GenId(42) })
        );
    }

    #[test]
    fn test_mismatched_environments() {
        let mut g = graph(4);
        let other = Environment::new(44_100.0, 8).unwrap().shared();
        let wide = g.add_with_environment(other, Box::new(Constant::new(1.0))).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();
        let scale = g.add(Box::new(Scale::new())).unwrap();

        assert_eq!(
            g.connect(wide, 0, sum, 0),
            Err(GenError::ShapeMismatch {
                expected: 4,
                found: 8
            })
        );
        assert_eq!(
            g.set_slot(scale, 0, wide),
            Err(GenError::ShapeMismatch {
                expected: 4,
                found: 8
            })
        );

        // Bypassing the checks still fails at render time
        g.node_mut(sum)
            .unwrap()
            .add_input(0, Binding::new(wide, 0))
            .unwrap();
        assert_eq!(
            g.render_frame(),
            Err(GenError::ShapeMismatch {
                expected: 4,
                found: 8
            })
        );
    }

    #[test]
    fn test_rejected_frame_renders_nothing() {
        let mut g = graph(4);
        let other = Environment::new(44_100.0, 8).unwrap().shared();
        let wide = g.add_with_environment(other, Box::new(Constant::new(1.0))).unwrap();
        let narrow = g.add(Box::new(Constant::new(0.5))).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();

        g.connect(narrow, 0, sum, 0).unwrap();
        g.node_mut(sum)
            .unwrap()
            .add_input(0, Binding::new(wide, 0))
            .unwrap();

        for _ in 0..2 {
            assert_eq!(
                g.render_frame(),
                Err(GenError::ShapeMismatch {
                    expected: 4,
                    found: 8
                })
            );
            for id in [wide, narrow, sum] {
                assert_eq!(g.node(id).unwrap().render_count(), 0);
                assert_eq!(g.output(id, 0).unwrap().iter().sum::<f32>(), 0.0);
            }
        }

        // Layout stays open and the next valid frame renders once everywhere
        g.node_mut(sum)
            .unwrap()
            .register_input(ParameterType::Trigger)
            .unwrap();
        g.set_input(narrow, 0, sum, 0).unwrap();
        g.render_frame().unwrap();
        for id in [wide, narrow, sum] {
            assert_eq!(g.node(id).unwrap().render_count(), 1);
        }
        assert_eq!(g.output(sum, 0).unwrap(), &[0.5_f32; 4]);
    }

    #[test]
    fn test_unrenderable_gen_blocks_whole_frame() {
        let mut g = graph(4);
        let a = g.add(Box::new(Constant::new(1.0))).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();
        g.connect(a, 0, sum, 0).unwrap();
        g.node_mut(sum).unwrap().clear_outputs().unwrap();

        assert!(matches!(
            g.render_frame(),
            Err(GenError::UninitializedRender { .. })
        ));
        assert_eq!(g.node(a).unwrap().render_count(), 0);
    }

    #[test]
    fn test_kernels_cannot_resize_outputs() {
        struct Writer;

        impl Kernel for Writer {
            fn name(&self) -> &'static str {
                "Writer"
            }

            fn configure(&mut self, node: &mut Gen) -> GenResult<()> {
                node.register_output(ParameterType::Value)?;
                node.register_output(ParameterType::Phase)?;
                Ok(())
            }

            fn render(
                &mut self,
                ctx: &RenderContext,
                _inputs: &[Vec<f32>],
                _slots: &SlotReader<'_>,
                outputs: &mut OutputBuffers<'_>,
            ) {
                for (i, buf) in outputs.iter_mut().enumerate() {
                    buf.fill(i as f32 + ctx.render_count as f32);
                }
            }
        }

        let mut g = graph(4);
        let w = g.add(Box::new(Writer)).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();
        g.connect(w, 1, sum, 0).unwrap();

        g.node_mut(sum).unwrap().outputs_mut()[0].fill(9.0);
        g.render_frames(2).unwrap();

        assert_eq!(g.output(w, 0).unwrap(), &[1.0_f32; 4]);
        assert_eq!(g.output(w, 1).unwrap(), &[2.0_f32; 4]);
        assert_eq!(g.output(sum, 0).unwrap(), &[2.0_f32; 4]);
        assert!(g.node(sum).unwrap().outputs().iter().all(|b| b.len() == 4));
    }

    #[test]
    fn test_render_requires_outputs() {
        struct Silent;

        impl Kernel for Silent {
            fn name(&self) -> &'static str {
                "Silent"
            }

            fn configure(&mut self, node: &mut Gen) -> GenResult<()> {
                node.register_input(ParameterType::Trigger)?;
                Ok(())
            }

            fn render(
                &mut self,
                _ctx: &RenderContext,
                _inputs: &[Vec<f32>],
                _slots: &SlotReader<'_>,
                _outputs: &mut OutputBuffers<'_>,
            ) {
            }
        }

        let mut g = graph(4);
        g.add(Box::new(Silent)).unwrap();
        assert!(matches!(
            g.render_frame(),
            Err(GenError::UninitializedRender { .. })
        ));
    }

    #[test]
    fn test_reset_rewinds_every_gen() {
        let mut g = graph(4);
        let a = g.add(Box::new(Constant::new(0.5))).unwrap();
        let sum = g.add(Box::new(Add::new())).unwrap();
        g.connect(a, 0, sum, 0).unwrap();

        g.render_frames(3).unwrap();
        assert_eq!(g.node(a).unwrap().render_count(), 3);
        assert_eq!(g.node(sum).unwrap().render_count(), 3);

        // Port layout is closed while rendering
        assert!(matches!(
            g.node_mut(sum).unwrap().register_input(ParameterType::Phase),
            Err(GenError::RegistrationClosed { render_count: 3 })
        ));

        g.reset();
        assert_eq!(g.node(sum).unwrap().render_count(), 0);
        assert_eq!(g.output(sum, 0).unwrap(), &[0.0_f32; 4]);
    }

    #[test]
    fn test_set_param_reaches_kernel() {
        let mut g = graph(4);
        let a = g.add(Box::new(Constant::new(0.0))).unwrap();
        g.set_param(a, params::VALUE, 0.125).unwrap();
        g.render_frame().unwrap();
        assert_eq!(g.output(a, 0).unwrap(), &[0.125_f32; 4]);

        assert!(g.set_param(GenId(5), params::VALUE, 1.0).is_err());
    }

    #[test]
    fn test_resolve_port_refs() {
        let mut g = graph(4);
        let scale = g.add(Box::new(Scale::new())).unwrap();

        assert_eq!(
            g.resolve(PortRef::input(scale, 0)).unwrap(),
            ParameterType::Value
        );
        assert_eq!(
            g.resolve(PortRef::slot(scale, 0)).unwrap(),
            ParameterType::Value
        );
        assert!(matches!(
            g.resolve(PortRef::output(scale, 3)),
            Err(GenError::UnregisteredIndex {
                kind: ConnectionKind::Output,
                ..
            })
        ));
    }

    #[test]
    fn test_add_named() {
        let mut registry = KernelRegistry::new();
        register_standard_kernels(&mut registry);

        let mut g = graph(4);
        let id = g.add_named(&registry, kernel_names::SCALE).unwrap();
        assert_eq!(g.kernel_name(id).unwrap(), "Scale");
        assert!(matches!(
            g.add_named(&registry, "reverb"),
            Err(GenError::UnknownKernel { .. })
        ));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_describe() {
        let mut g = graph(4);
        let a = g.add(Box::new(Constant::new(1.0))).unwrap();
        let scale = g.add(Box::new(Scale::new())).unwrap();
        g.connect(a, 0, scale, 0).unwrap();

        let text = g.describe();
        assert!(text.contains("#0 Constant <Gen: 0 inputs, 1 outputs, 0 slots @ 0>"));
        assert!(text.contains("  Input[0] Value <- #0.Output[0]"));
        assert!(text.contains("  Slot[0] Value -> <empty>"));
        assert!(text.contains("  Output[0] Value\n"));
        // Ports are listed slots first, then inputs, then outputs
        let slot = text.find("  Slot[0]").unwrap();
        let input = text.find("  Input[0]").unwrap();
        assert!(slot < input);
    }
}
