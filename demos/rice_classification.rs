//! Rice Classification Example
//!
//! Trains two binary classifiers on a synthetic Cammeo/Osmancik rice table
//! (one on three features, one on all seven) and compares them on held-out
//! rows.
//!
//! Run with: RUST_LOG=trueno_lab=debug cargo run --example rice_classification

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;
use trueno_lab::dataset::Dataset;
use trueno_lab::experiment::{ExperimentComparator, ExperimentRunner, ExperimentSettings};
use trueno_lab::model::BinaryClassifier;

const ROWS: usize = 3_810;

/// Generate rice grain measurements; Cammeo grains are larger and longer.
fn synthetic_rice(seed: u64) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns: [Vec<f64>; 7] = Default::default();
    let mut class = Vec::with_capacity(ROWS);

    for _ in 0..ROWS {
        let cammeo = rng.gen_bool(0.43);
        let size = f64::from(u8::from(cammeo)) + rng.gen_range(-0.6..0.6);
        let area = 12_600.0 + 2_000.0 * size + rng.gen_range(-400.0..400.0);
        let major = 188.0 + 18.0 * size + rng.gen_range(-6.0..6.0);
        let minor = 86.0 + 2.0 * size + rng.gen_range(-4.0..4.0);
        let values = [
            area,
            454.0 + 35.0 * size + rng.gen_range(-10.0..10.0),
            major,
            minor,
            (1.0 - (minor / major).powi(2)).sqrt(),
            area + rng.gen_range(0.0..300.0),
            0.66 + rng.gen_range(-0.05..0.05),
        ];
        for (column, value) in columns.iter_mut().zip(values) {
            column.push(value);
        }
        class.push(if cammeo { "Cammeo" } else { "Osmancik" });
    }

    let names = [
        "Area",
        "Perimeter",
        "Major_Axis_Length",
        "Minor_Axis_Length",
        "Eccentricity",
        "Convex_Area",
        "Extent",
    ];
    let mut builder = Dataset::builder();
    for (name, values) in names.into_iter().zip(columns) {
        builder = builder.numeric(name, values);
    }
    Ok(builder.categorical("Class", &class).build()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trueno_lab=info")),
        )
        .init();

    println!("=== Trueno-Lab Rice Classification ===\n");

    // -------------------------------------------------------------------------
    // 1. Prepare data: normalize, split 80/10/10, derive labels
    // -------------------------------------------------------------------------
    let rice = synthetic_rice(7)?.normalized()?;
    let split = rice.split(0.8, 0.1, 100)?;
    let train_labels = split.train.binary_labels("Class", "Cammeo")?;
    let test_labels = split.test.binary_labels("Class", "Cammeo")?;
    println!(
        "1. Rows: train={} validation={} test={}",
        split.train.num_rows(),
        split.validation.num_rows(),
        split.test.num_rows()
    );

    // -------------------------------------------------------------------------
    // 2. Train baseline and full-feature classifiers
    // -------------------------------------------------------------------------
    let runner = ExperimentRunner::new();
    let classifier = BinaryClassifier::new();

    let baseline = ExperimentSettings::builder(["Eccentricity", "Major_Axis_Length", "Area"])
        .learning_rate(0.001)
        .number_epochs(60)
        .batch_size(100)
        .classification_threshold(0.35)
        .build()?;
    let all_features = ExperimentSettings::builder([
        "Eccentricity",
        "Major_Axis_Length",
        "Minor_Axis_Length",
        "Area",
        "Convex_Area",
        "Perimeter",
        "Extent",
    ])
    .learning_rate(0.001)
    .number_epochs(60)
    .batch_size(100)
    .classification_threshold(0.5)
    .build()?;

    let baseline = runner.run("baseline", &classifier, &split.train, &train_labels, baseline)?;
    let all_features =
        runner.run("all_features", &classifier, &split.train, &train_labels, all_features)?;

    println!("\n2. Training curves (every 10th epoch):");
    for experiment in [&baseline, &all_features] {
        println!("   {}", experiment.name());
        for record in experiment
            .metric_records()
            .iter()
            .filter(|record| record.epoch() % 10 == 9)
        {
            println!(
                "     epoch {:>2} {:<10} {:.4}",
                record.epoch() + 1,
                record.key(),
                record.value()
            );
        }
    }

    // -------------------------------------------------------------------------
    // 3. Compare on the test split
    // -------------------------------------------------------------------------
    let report = ExperimentComparator::new().compare(
        [&baseline, &all_features],
        &["accuracy", "precision", "recall", "auc"],
        &split.test,
        &test_labels,
    )?;

    println!("\n3. Comparison on {} test rows:\n", split.test.num_rows());
    println!("{report}");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
