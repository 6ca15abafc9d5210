// Wrapper and estimator behaviour through the public API

mod common;

use common::{exact_linear_dataset, fast_settings, in_unit_interval, three_class_dataset};
use ndarray::array;
use teburu::models::{DecisionTree, GradientBoosting, RandomForest};
use teburu::{
    datasets, ClassificationModel, Classifier, ClassifierKind, RegressionModel, Regressor, RegressorKind,
    TeburuError, TreeSettings,
};

#[test]
fn test_every_regressor_scores_non_negative() {
    let dataset = datasets::make_regression(90, 3, 8.0, 21).unwrap();
    for kind in RegressorKind::ALL {
        let mut regressor = Regressor::with_settings(&dataset, kind, &fast_settings()).unwrap();
        let rmse = regressor.score().unwrap();
        assert!(rmse >= 0.0, "{} rmse {rmse}", kind.label());
        assert_eq!(regressor.predict().unwrap().len(), 23);
    }
}

#[test]
fn test_every_classifier_scores_in_bounds() {
    let dataset = datasets::make_classification(120, 4, 21).unwrap();
    for kind in ClassifierKind::ALL {
        let mut classifier = Classifier::with_settings(&dataset, kind, &fast_settings()).unwrap();
        let (accuracy, auc) = classifier.score().unwrap();
        assert!(in_unit_interval(accuracy), "{} accuracy {accuracy}", kind.label());
        assert!(in_unit_interval(auc), "{} auc {auc}", kind.label());

        let proba = classifier.predict_proba().unwrap();
        assert!(proba.iter().copied().all(in_unit_interval));
    }
}

#[test]
fn test_linear_regression_is_exact_on_linear_data() {
    let dataset = exact_linear_dataset(60);
    let mut regressor = Regressor::new(&dataset, RegressorKind::LinearRegression);
    assert!(regressor.score().unwrap() < 1e-6);
}

#[test]
fn test_train_is_not_idempotent() {
    let dataset = exact_linear_dataset(60);
    let mut regressor = Regressor::new(&dataset, RegressorKind::DecisionTree);

    regressor.train().unwrap();
    let first = regressor.test_split().unwrap().x_test.clone();
    regressor.train().unwrap();
    let second = regressor.test_split().unwrap().x_test.clone();

    assert_eq!(first.dim(), second.dim());
    assert_ne!(first, second);
}

#[test]
fn test_wrappers_with_same_seed_share_a_split() {
    let dataset = exact_linear_dataset(60);
    let mut linear = Regressor::new(&dataset, RegressorKind::LinearRegression);
    let mut boosted = Regressor::new(&dataset, RegressorKind::GradientBoosting);
    linear.train().unwrap();
    boosted.train().unwrap();

    assert_eq!(linear.test_split().unwrap().y_test, boosted.test_split().unwrap().y_test);
}

#[test]
fn test_predict_before_train_is_an_error() {
    let dataset = exact_linear_dataset(20);
    for kind in RegressorKind::ALL {
        let regressor = Regressor::new(&dataset, kind);
        assert!(matches!(regressor.predict(), Err(TeburuError::NotFitted { .. })));
        assert!(matches!(regressor.rmse(), Err(TeburuError::NotFitted { .. })));
    }
}

#[test]
fn test_multiclass_auc_is_rejected() {
    let dataset = three_class_dataset(45);
    for kind in [ClassifierKind::DecisionTree, ClassifierKind::RandomForest] {
        let mut classifier = Classifier::with_settings(&dataset, kind, &fast_settings()).unwrap();
        assert!(matches!(classifier.score(), Err(TeburuError::UndefinedMetric { .. })));
    }

    let mut boosted = Classifier::new(&dataset, ClassifierKind::GradientBoosting);
    assert!(matches!(boosted.train(), Err(TeburuError::Fit { .. })));
}

#[test]
fn test_estimators_directly() {
    let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0]];
    let y = array![0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0];
    let classes = [0, 0, 0, 0, 1, 1, 1, 1];

    let mut tree = DecisionTree::new(&TreeSettings::default());
    RegressionModel::fit(&mut tree, x.view(), y.view()).unwrap();
    assert_eq!(RegressionModel::predict(&tree, array![[1.5], [6.5]].view()).unwrap(), array![0.0, 10.0]);

    let mut forest = RandomForest::new_classifier(&fast_settings());
    ClassificationModel::fit(&mut forest, x.view(), &classes, 2).unwrap();
    assert_eq!(ClassificationModel::predict(&forest, array![[0.0], [7.0]].view()).unwrap(), vec![0, 1]);

    let mut boosted = GradientBoosting::new(&fast_settings().boosting);
    RegressionModel::fit(&mut boosted, x.view(), y.view()).unwrap();
    let predicted = RegressionModel::predict(&boosted, array![[0.0], [7.0]].view()).unwrap();
    assert!(predicted[0] < 2.0 && predicted[1] > 8.0, "{predicted}");
}
