use std::thread;

use clap::Parser;
use log::info;

use tdd_rs::node::{Edge, Successors};
use tdd_rs::reference::NodeRef;
use tdd_rs::store::{SharedStore, StoreConfig};
use tdd_rs::types::Order;
use tdd_rs::weight::Complex;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of tensor indices (diagram depth).
    #[arg(value_name = "INT", default_value = "8")]
    depth: u32,

    /// Weight tolerance.
    #[clap(long, value_name = "FLOAT", default_value = "1e-9")]
    epsilon: f64,

    /// Number of worker threads building diagrams concurrently.
    #[clap(long, value_name = "INT", default_value = "4")]
    threads: usize,

    /// Write the surviving diagram in DOT format to this file.
    #[clap(long, value_name = "PATH")]
    dot: Option<std::path::PathBuf>,
}

/// Uniform superposition over `depth` qubits: every slot shares the node below.
fn uniform(store: &SharedStore<Complex>, depth: u32, phase: f64) -> NodeRef {
    let amp = Complex::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
    let last = Complex::new(phase.cos(), phase.sin());
    let mut current = store.get_unique_node(
        Order::new(depth - 1),
        Successors::from_iter([Edge::terminal(amp), Edge::terminal(last)]),
    );
    for order in (0..depth - 1).rev() {
        current = store.get_unique_node(
            Order::new(order),
            Successors::from_iter([Edge::to(amp, current), Edge::to(amp, current)]),
        );
    }
    current
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);
    color_eyre::eyre::ensure!(args.depth > 0, "depth must be positive");

    let mut store = SharedStore::<Complex>::with_config(StoreConfig::new().with_epsilon(args.epsilon))?;
    println!("store = {:?}", store);

    // Every worker builds the shared diagram plus one of its own.
    let roots: Vec<(NodeRef, NodeRef)> = thread::scope(|s| {
        let handles: Vec<_> = (0..args.threads)
            .map(|i| {
                let store = &store;
                s.spawn(move || (uniform(store, args.depth, 0.0), uniform(store, args.depth, 0.1 * (i + 1) as f64)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("worker panicked")).collect()
    });

    let shared = roots[0].0;
    assert!(roots.iter().all(|&(r, _)| r == shared));
    println!("shared root = {}, size = {}", shared, store.size(shared));
    println!("store before reset = {:?}", store);
    print!("{}", store.dump_state());

    let kept = store.reset(&[shared]);
    info!("kept root {} -> {}", shared, kept[0]);
    println!("store after reset = {:?}", store);
    println!("{}", store.debug_string(kept[0]));

    if let Some(path) = &args.dot {
        std::fs::write(path, store.to_dot(&kept)?)?;
        println!("Wrote DOT to {}", path.display());
    }

    Ok(())
}
