// src/parameter_type.rs
//
// Semantic roles of gen ports.

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// Semantic role of an input, output or slot.
///
/// Purely descriptive: it says what a port means (a frequency, a phase, a
/// trigger), not how its samples are stored. Used for validation and
/// introspection, never for computation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount, AsRefStr,
)]
pub enum ParameterType {
    Value,
    Frequency,
    Duration,
    Phase,
    Channels,
    Trigger,
    Cycle,
    LowerBoundary,
    UpperBoundary,
    BreakPoints,
    Buffer,
    Interpolation,
    TimeContext,
    RateContext,
    Modulus,
    Direction,
    BoundaryContext,
}

impl ParameterType {
    /// Context types select how another port is interpreted rather than
    /// carrying a signal themselves.
    pub fn is_context(self) -> bool {
        matches!(
            self,
            ParameterType::TimeContext | ParameterType::RateContext | ParameterType::BoundaryContext
        )
    }

    /// Whether the port describes one edge of a range.
    pub fn is_boundary(self) -> bool {
        matches!(
            self,
            ParameterType::LowerBoundary | ParameterType::UpperBoundary
        )
    }
}
