// src/main.rs

use std::process::ExitCode;

use arachne::{
    Environment, GenResult, Graph, KernelRegistry,
    kernels::{Constant, kernel_names, params},
    register_standard_kernels,
};
use log::{error, info};

/// ===============================
/// Main
/// ===============================

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Sanity test failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> GenResult<()> {
    // --------------------------------
    // Environment
    // --------------------------------

    let environment = Environment::from_env()?;
    info!(
        "Environment: {} Hz, {} samples per frame",
        environment.sampling_rate(),
        environment.frame_size()
    );

    let mut registry = KernelRegistry::new();
    register_standard_kernels(&mut registry);

    // --------------------------------
    // Graph
    // --------------------------------

    let mut graph = Graph::new(environment.shared());

    let low = graph.add(Box::new(Constant::new(0.25)))?;
    let high = graph.add(Box::new(Constant::new(0.5)))?;
    let sum = graph.add_named(&registry, kernel_names::ADD)?;
    let gain = graph.add_named(&registry, kernel_names::CONSTANT)?;
    let scale = graph.add_named(&registry, kernel_names::SCALE)?;

    // Both constants feed the same input and are summed
    graph.connect(low, 0, sum, 0)?;
    graph.connect(high, 0, sum, 0)?;
    graph.connect(sum, 0, scale, 0)?;
    graph.set_slot(scale, 0, gain)?;

    print!("{}", graph.describe());

    // --------------------------------
    // Render a few frames
    // --------------------------------

    println!("Starting graph sanity test...");

    for frame in 0..4u8 {
        graph.set_param(gain, params::VALUE, f32::from(frame + 1))?;
        graph.render_frame()?;

        let out = graph.output(scale, 0)?;
        println!(
            "--- Frame {} --- first sample {} ({} samples)",
            frame,
            out[0],
            out.len()
        );
    }

    info!("Rendered {} frames", graph.node(scale)?.render_count());
    println!("Sanity test completed.");
    Ok(())
}
