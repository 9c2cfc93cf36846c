// src/error.rs
//
// Error taxonomy shared by environments, gens and graphs.

use snafu::Snafu;

use crate::connection::{ConnectionKind, GenId};

#[derive(Snafu, Debug, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum GenError {
    #[snafu(display("Invalid configuration: {reason}"))]
    InvalidConfiguration { reason: String },

    #[snafu(display("{kind} index `{index}` was never registered (count is {count})"))]
    UnregisteredIndex {
        kind: ConnectionKind,
        index: usize,
        count: usize,
    },

    #[snafu(display("Frame size mismatch: expected {expected} samples, found {found}"))]
    ShapeMismatch { expected: usize, found: usize },

    #[snafu(display("Cannot render gen: {reason}"))]
    UninitializedRender { reason: &'static str },

    #[snafu(display("`{operation}` called before `init()`"))]
    NotInitialized { operation: &'static str },

    #[snafu(display("Port layout is closed after {render_count} rendered frames; call `reset()` first"))]
    RegistrationClosed { render_count: u64 },

    #[snafu(display("Gen {id} does not exist in graph"))]
    UnknownGen { id: GenId },

    #[snafu(display("No kernel registered under `{name}`"))]
    UnknownKernel { name: String },

    #[snafu(display("Graph contains a cycle through gen {id}"))]
    CycleDetected { id: GenId },
}

pub type GenResult<T> = Result<T, GenError>;
