//! Taxi Fare Regression Example
//!
//! Fits linear regressors predicting FARE from trip distance and duration,
//! prints the fitted equations and a small prediction table.
//!
//! Run with: RUST_LOG=trueno_lab=debug cargo run --example taxi_fare_regression

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;
use trueno_lab::dataset::Dataset;
use trueno_lab::experiment::{ExperimentComparator, ExperimentRunner, ExperimentSettings};
use trueno_lab::model::LinearRegressor;

const ROWS: usize = 5_000;

/// Generate trips with `FARE ≈ 2.25 * miles + 0.12 * minutes + 3.25`.
fn synthetic_trips(seed: u64) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut miles = Vec::with_capacity(ROWS);
    let mut seconds = Vec::with_capacity(ROWS);
    let mut fares = Vec::with_capacity(ROWS);

    for _ in 0..ROWS {
        let distance: f64 = rng.gen_range(0.5..25.0);
        let duration = distance * rng.gen_range(120.0..300.0);
        miles.push(distance);
        seconds.push(duration);
        fares.push(2.25 * distance + 0.12 * duration / 60.0 + 3.25 + rng.gen_range(-1.0..1.0));
    }

    Ok(Dataset::builder()
        .numeric("TRIP_MILES", miles)
        .numeric("TRIP_SECONDS", seconds)
        .numeric("FARE", fares)
        .build()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trueno_lab=info")),
        )
        .init();

    println!("=== Trueno-Lab Taxi Fare Regression ===\n");

    // -------------------------------------------------------------------------
    // 1. Derive TRIP_MINUTES and hold out 20% of the trips
    // -------------------------------------------------------------------------
    let trips = synthetic_trips(11)?;
    let minutes = trips
        .numeric("TRIP_SECONDS")?
        .iter()
        .map(|seconds| seconds / 60.0)
        .collect();
    let trips = trips.with_numeric_column("TRIP_MINUTES", minutes)?;
    let split = trips.split(0.8, 0.0, 42)?;
    let train_fares = split.train.numeric("FARE")?.to_vec();
    let test_fares = split.test.numeric("FARE")?.to_vec();

    // -------------------------------------------------------------------------
    // 2. One feature vs two features
    // -------------------------------------------------------------------------
    let runner = ExperimentRunner::new();
    let one_feature = ExperimentSettings::builder(["TRIP_MILES"])
        .learning_rate(0.001)
        .number_epochs(20)
        .batch_size(50)
        .build()?;
    let two_features = ExperimentSettings::builder(["TRIP_MILES", "TRIP_MINUTES"])
        .learning_rate(0.001)
        .number_epochs(20)
        .batch_size(50)
        .build()?;

    let one_feature =
        runner.run("one_feature", &LinearRegressor, &split.train, &train_fares, one_feature)?;
    let two_features =
        runner.run("two_features", &LinearRegressor, &split.train, &train_fares, two_features)?;

    println!("1. Fitted equations:");
    for experiment in [&one_feature, &two_features] {
        println!("   {:<14} {}", experiment.name(), experiment.model().equation("FARE"));
        println!("   {:<14} {}", "", experiment.to_json()["settings"]);
    }

    // -------------------------------------------------------------------------
    // 3. Compare and predict
    // -------------------------------------------------------------------------
    let report = ExperimentComparator::new().compare(
        [&one_feature, &two_features],
        &["loss", "root_mean_squared_error"],
        &split.test,
        &test_fares,
    )?;
    println!("\n2. Comparison on {} test trips:\n", split.test.num_rows());
    println!("{report}");

    let predictions = two_features.predict(&split.test)?;
    let miles = split.test.numeric("TRIP_MILES")?;
    let trip_minutes = split.test.numeric("TRIP_MINUTES")?;
    println!("3. Predictions ({}):", two_features.name());
    println!("   {:>8} {:>8} {:>10} {:>10} {:>8}", "MILES", "MINUTES", "FARE", "PREDICTED", "L1");
    for row in 0..10.min(predictions.len()) {
        let fare = test_fares.get(row).context("missing test fare")?;
        println!(
            "   {:>8.2} {:>8.1} {:>10.2} {:>10.2} {:>8.2}",
            miles[row],
            trip_minutes[row],
            fare,
            predictions[row],
            (fare - predictions[row]).abs()
        );
    }

    Ok(())
}
