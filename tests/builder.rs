use std::{env, fs, process};

use scratchnet::{
    MlErr,
    specs::{DatasetSpec, TrainerSpec},
    training::TrainerBuilder,
};

const SPEC: &str = r#"{
    "model": {"sequential": {"layers": [
        {"dense": {"units": 3, "input": 2}},
        {"activation": {"act_fn": "relu"}},
        {"dense": {"units": 1}},
        {"activation": {"act_fn": {"sigmoid": {"amp": 1.0}}}}
    ]}},
    "initializer": {"uniform": {"low": -0.5, "high": 0.5}},
    "optimizer": {"adam": {"learning_rate": 0.01, "beta1": 0.9, "beta2": 0.999, "epsilon": 1e-8}},
    "loss": "binary_cross_entropy",
    "metrics": ["accuracy", "mae"],
    "dataset": {"inline": {
        "data": [0, 0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1],
        "x_size": 2,
        "y_size": 1
    }},
    "epochs": 4,
    "trainer": {"batch_size": 2, "verbose": false, "seed": 11}
}"#;

#[test]
fn builds_and_trains_from_json() {
    let spec: TrainerSpec = serde_json::from_str(SPEC).unwrap();
    let (mut trainer, dataset) = TrainerBuilder::new().build(&spec).unwrap();

    assert_eq!(dataset.len(), 6);
    assert_eq!(trainer.model().len(), 4);
    assert_eq!(trainer.metrics().len(), 2);

    trainer
        .train(dataset.x(), dataset.y(), spec.epochs.get())
        .unwrap();
    // floor((6 - 1) / 2) batches per epoch
    assert_eq!(trainer.train_step(), 4 * 2);

    let (loss, metrics) = trainer.eval(dataset.x(), dataset.y(), None).unwrap();
    assert!(loss.is_finite());
    assert_eq!(metrics.len(), 2);
    assert!((0. ..=1.).contains(&metrics[0]));

    let history = trainer.history();
    assert!(history.title().starts_with("Train Loss: "));
    assert!(history.title().contains("| Test Loss: "));

    let json = history.to_json().unwrap();
    assert!(json.contains("\"eval_steps\""));
}

#[test]
fn dataset_from_a_local_file() {
    let path = env::temp_dir().join(format!("scratchnet-{}.csv", process::id()));
    fs::write(&path, "0.0, 1.0, 1.0\n1.0, 0.0, 1.0\n0.0, 0.0, 0.0\n").unwrap();

    let mut spec: TrainerSpec = serde_json::from_str(SPEC).unwrap();
    spec.dataset = DatasetSpec::Local {
        path: path.clone(),
        x_size: 2,
        y_size: 1,
    };

    let (trainer, dataset) = TrainerBuilder::new().build(&spec).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.y().iter().copied().collect::<Vec<_>>(), [1., 1., 0.]);
    assert!(trainer.model().is_initialized());
}

#[test]
fn missing_dataset_file_is_an_io_error() {
    let mut spec: TrainerSpec = serde_json::from_str(SPEC).unwrap();
    spec.dataset = DatasetSpec::Local {
        path: "/nonexistent/scratchnet/data.csv".into(),
        x_size: 2,
        y_size: 1,
    };

    assert!(matches!(TrainerBuilder::new().build(&spec), Err(MlErr::Io(_))));
}

#[test]
fn model_without_input_shape_fails_to_build() {
    let json = SPEC.replace(r#"{"dense": {"units": 3, "input": 2}}"#, r#"{"dense": {"units": 3}}"#);
    let spec: TrainerSpec = serde_json::from_str(&json).unwrap();

    let err = TrainerBuilder::new().build(&spec).err().unwrap();
    assert!(matches!(err, MlErr::MissingInputShape { layer: 0 }));
}
