use mlp_autoencoder::architecture::build_network;
use mlp_autoencoder::config::{load_config, NetworkConfig};
use mlp_autoencoder::utils::SimpleRng;
use mlp_autoencoder::{Batch, Mode, Network};
use std::process;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Builds the network described by a JSON config and pushes one batch through it.
const DEFAULT_CONFIG: &str = "config/mlp_autoencoder.json";
const DEFAULT_SEED: u64 = 42;
const BATCH_SIZE: usize = 16;

/// Config path from the first command-line argument, or the bundled default.
fn config_path(args: &[String]) -> &str {
    args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG)
}

/// Builds the network and runs a uniform random batch through it in eval mode.
///
/// Returns the output shape.
fn run(config: &NetworkConfig) -> mlp_autoencoder::Result<Vec<usize>> {
    let mut rng = SimpleRng::new(config.seed.unwrap_or(DEFAULT_SEED));
    let mut network = build_network(config, &mut rng)?;
    network.summary();

    network.set_mode(Mode::Eval);
    let input_dim = network.input_dim();
    let input = Batch::from_rows(
        BATCH_SIZE,
        input_dim,
        rng.uniform_vec(BATCH_SIZE * input_dim, 0.0, 1.0),
    )?;

    let start = Instant::now();
    let output = network.forward(&input)?;
    info!(
        elapsed_us = start.elapsed().as_micros() as u64,
        "forward pass over {} samples",
        BATCH_SIZE
    );
    Ok(output.shape().to_vec())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = config_path(&args);

    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load {}: {}", path, e);
            process::exit(1);
        }
    };

    match run(&config) {
        Ok(shape) => println!("Output shape: {:?}", shape),
        Err(e) => {
            error!("forward pass failed: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_default() {
        let args = vec!["network_summary".to_string()];
        assert_eq!(config_path(&args), DEFAULT_CONFIG);
    }

    #[test]
    fn test_config_path_argument() {
        let args = vec!["network_summary".to_string(), "my.json".to_string()];
        assert_eq!(config_path(&args), "my.json");
    }

    #[test]
    fn test_run_autoencoder() {
        let config: NetworkConfig = serde_json::from_str(
            r#"{ "kind": "autoencoder", "x_dim": 12, "h_dims": "8-4", "rep_dim": 2 }"#,
        )
        .unwrap();
        assert_eq!(run(&config).unwrap(), vec![BATCH_SIZE, 12]);
    }
}
