// Utility kernels (constant, summing, slot-scaled pass)

use crate::error::GenResult;
use crate::generator::Gen;
use crate::kernel::{Kernel, OutputBuffers, RenderContext, SlotReader};
use crate::parameter_type::ParameterType;

use super::params;

// ═══════════════════════════════════════════════════════════════════
// Constant
// ═══════════════════════════════════════════════════════════════════

/// Fills its single output with a fixed value.
pub struct Constant {
    value: f32,
    output: usize,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value, output: 0 }
    }
}

impl Kernel for Constant {
    fn name(&self) -> &'static str {
        "Constant"
    }

    fn configure(&mut self, node: &mut Gen) -> GenResult<()> {
        self.output = node.register_output(ParameterType::Value)?;
        Ok(())
    }

    fn render(
        &mut self,
        _ctx: &RenderContext,
        _inputs: &[Vec<f32>],
        _slots: &SlotReader<'_>,
        outputs: &mut OutputBuffers<'_>,
    ) {
        outputs[self.output].fill(self.value);
    }

    fn set_param(&mut self, param_id: u32, value: f32) {
        if param_id == params::VALUE {
            self.value = value;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Add
// ═══════════════════════════════════════════════════════════════════

/// Outputs the sum of every source bound to its operand input.
pub struct Add {
    operands: usize,
    output: usize,
}

impl Add {
    pub fn new() -> Self {
        Self {
            operands: 0,
            output: 0,
        }
    }
}

impl Default for Add {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for Add {
    fn name(&self) -> &'static str {
        "Add"
    }

    fn configure(&mut self, node: &mut Gen) -> GenResult<()> {
        self.operands = node.register_input(ParameterType::Value)?;
        self.output = node.register_output(ParameterType::Value)?;
        Ok(())
    }

    fn render(
        &mut self,
        _ctx: &RenderContext,
        inputs: &[Vec<f32>],
        _slots: &SlotReader<'_>,
        outputs: &mut OutputBuffers<'_>,
    ) {
        // Summation already happened when the graph filled `inputs`
        outputs[self.output].copy_from_slice(&inputs[self.operands]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Scale
// ═══════════════════════════════════════════════════════════════════

/// Multiplies its input by the first output of the gen in its factor slot.
///
/// With the slot empty the input passes through unchanged.
pub struct Scale {
    input: usize,
    factor: usize,
    output: usize,
}

impl Scale {
    pub fn new() -> Self {
        Self {
            input: 0,
            factor: 0,
            output: 0,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for Scale {
    fn name(&self) -> &'static str {
        "Scale"
    }

    fn configure(&mut self, node: &mut Gen) -> GenResult<()> {
        self.input = node.register_input(ParameterType::Value)?;
        self.factor = node.register_slot(ParameterType::Value)?;
        self.output = node.register_output(ParameterType::Value)?;
        Ok(())
    }

    fn render(
        &mut self,
        _ctx: &RenderContext,
        inputs: &[Vec<f32>],
        slots: &SlotReader<'_>,
        outputs: &mut OutputBuffers<'_>,
    ) {
        let input = &inputs[self.input];
        let out = &mut outputs[self.output];

        match slots.output(self.factor, 0) {
            Some(factor) => {
                for ((o, i), f) in out.iter_mut().zip(input).zip(factor) {
                    *o = i * f;
                }
            }
            None => out.copy_from_slice(input),
        }
    }
}
