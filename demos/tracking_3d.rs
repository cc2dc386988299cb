//! Track a noisy 3D point moving at constant velocity.
//!
//! Prints raw and filtered positions as CSV on stdout.
//!
//! Run with: cargo run --example tracking_3d -- --steps 50 --noise 0.5

use clap::Parser;
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use kalman_filter_rs::{constant_velocity, FilterConfig, KalmanFilter};

/// Constant-velocity 3D tracking demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of measurements to generate
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Time step between measurements
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Half-width of the uniform measurement noise
    #[arg(long, default_value_t = 0.5, value_parser = parse_noise)]
    noise: f64,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Load the filter from a JSON config instead of the built-in model
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Verbose logging (DEBUG level)
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut kf = match &args.config {
        Some(path) => {
            let config: FilterConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            info!(%path, "Loaded filter config");
            config.build()?
        }
        // 6 states (x, y, z, vx, vy, vz), 3 measurements (x, y, z)
        None => constant_velocity(3, args.dt, 0.1, 1.0)?,
    };

    if kf.dim_z() != 3 {
        return Err(format!("demo needs a 3D measurement model, got dim_z={}", kf.dim_z()).into());
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let velocity = [1.0, 0.5, -0.25];

    println!("step,raw_x,raw_y,raw_z,filtered_x,filtered_y,filtered_z");
    for step in 0..args.steps {
        let t = step as f64 * args.dt;
        let z = DVector::from_fn(3, |i, _| {
            velocity[i] * t + rng.gen_range(-args.noise..=args.noise)
        });

        let filtered = track_point(&mut kf, &z);
        println!(
            "{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            step, z[0], z[1], z[2], filtered[0], filtered[1], filtered[2]
        );
    }

    let p = kf.get_covariance();
    info!(
        var_x = p[(0, 0)],
        var_y = p[(1, 1)],
        var_z = p[(2, 2)],
        "Final position variance"
    );

    Ok(())
}

/// Noise half-width must be finite and non-negative to sample from.
fn parse_noise(s: &str) -> Result<f64, String> {
    let noise: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !noise.is_finite() || noise < 0.0 {
        return Err(format!("noise must be finite and non-negative, got {}", noise));
    }
    Ok(noise)
}

/// Run one predict/update cycle and return the filtered state.
fn track_point(kf: &mut KalmanFilter, z: &DVector<f64>) -> DVector<f64> {
    kf.predict();
    if let Err(e) = kf.update(z) {
        warn!("Measurement skipped: {}", e);
    } else {
        debug!(innovation = ?kf.innovation().as_slice(), "Measurement applied");
    }
    kf.get_state()
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    if verbose {
        subscriber.with_max_level(tracing::Level::DEBUG).init();
        info!("Verbose logging enabled (DEBUG level)");
    } else {
        subscriber.with_max_level(tracing::Level::INFO).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_noise_accepts_finite_non_negative() {
        assert_eq!(parse_noise("0"), Ok(0.0));
        assert_eq!(parse_noise("0.5"), Ok(0.5));
    }

    #[test]
    fn test_parse_noise_rejects_unusable_values() {
        for bad in ["inf", "-inf", "NaN", "-0.1", "abc"] {
            assert!(parse_noise(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_args_reject_infinite_noise() {
        assert!(Args::try_parse_from(["tracking_3d", "--noise", "inf"]).is_err());
        let args = Args::try_parse_from(["tracking_3d", "--noise", "0.25"]).unwrap();
        assert_eq!(args.noise, 0.25);
    }
}
