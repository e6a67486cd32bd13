//! Linear regressor capability

use super::{DenseModel, Head, ModelCapability};
use crate::experiment::ExperimentSettings;
use crate::metrics::Metric;
use crate::Result;

/// Builds one-unit linear regressors tracking `loss` (mean squared error)
/// and `root_mean_squared_error`.
///
/// A classification threshold in the settings is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearRegressor;

impl ModelCapability for LinearRegressor {
    type Model = DenseModel;

    fn build(&self, settings: &ExperimentSettings, seed: u64) -> Result<DenseModel> {
        DenseModel::new(
            settings.input_features().to_vec(),
            Head::Linear,
            &[Metric::RootMeanSquaredError],
            settings.learning_rate(),
            seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrainedModel;

    #[test]
    fn test_build_tracks_rmse() {
        let settings = ExperimentSettings::builder(["TRIP_MILES", "TRIP_MINUTES"])
            .classification_threshold(0.5)
            .build()
            .unwrap();
        let model = LinearRegressor.build(&settings, 42).unwrap();

        let names: Vec<&str> = model.metrics().iter().map(Metric::name).collect();
        assert_eq!(names, vec!["loss", "root_mean_squared_error"]);
        assert_eq!(model.head(), Head::Linear);
        assert_eq!(model.weights().len(), 2);
    }
}
