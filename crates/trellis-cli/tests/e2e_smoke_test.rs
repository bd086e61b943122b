use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use trellis::{TrellisError, model::DiagramModel};
use trellis_cli::{Args, run};

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        relayout: false,
        model_output: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_json_files(demos_dir());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy();
        for relayout in [false, true] {
            let output_path = temp_dir.path().join(format!("{stem}-{relayout}.svg"));
            let args = Args {
                relayout,
                ..args_for(demo_path, &output_path)
            };

            match run(&args) {
                Ok(()) => {
                    let svg = fs::read_to_string(&output_path).unwrap();
                    assert!(svg.contains("<svg"), "{} is not SVG", output_path.display());
                }
                Err(e) => failed.push((demo_path.clone(), relayout, e)),
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, relayout, err) in &failed {
            eprintln!("  - {} (relayout: {relayout}): {err}", path.display());
        }
        panic!("{} valid demo run(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_json_files(demos_dir().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(demo_path, &output_path)) {
            Ok(()) => unexpectedly_succeeded.push(demo_path.clone()),
            Err(err) => assert!(
                matches!(err, TrellisError::Json(_) | TrellisError::Model(_)),
                "{}: unexpected error {err}",
                demo_path.display()
            ),
        }
        assert!(!output_path.exists());
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_model_output_round_trips() {
    let temp_dir = tempdir().unwrap();
    let input = demos_dir().join("communication_diagram.json");
    let model_path = temp_dir.path().join("model.json");
    let args = Args {
        model_output: Some(model_path.to_string_lossy().to_string()),
        ..args_for(&input, &temp_dir.path().join("out.svg"))
    };

    run(&args).unwrap();

    let original = DiagramModel::from_json(&fs::read_to_string(&input).unwrap()).unwrap();
    let written = DiagramModel::from_json(&fs::read_to_string(&model_path).unwrap()).unwrap();
    assert_eq!(written, original);
}

#[test]
fn e2e_explicit_config_is_applied() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[style]\nbackground_color = \"#fafafa\"\n").unwrap();
    let output_path = temp_dir.path().join("out.svg");
    let args = Args {
        config: Some(config_path.to_string_lossy().to_string()),
        ..args_for(&demos_dir().join("class_diagram.json"), &output_path)
    };

    run(&args).unwrap();

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains("Customer"));
    assert!(svg.contains("<rect"));
}

#[test]
fn e2e_missing_config_fails() {
    let temp_dir = tempdir().unwrap();
    let args = Args {
        config: Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string()),
        ..args_for(
            &demos_dir().join("class_diagram.json"),
            &temp_dir.path().join("out.svg"),
        )
    };

    assert!(matches!(run(&args), Err(TrellisError::Config(_))));
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().unwrap();
    let args = args_for(
        &temp_dir.path().join("absent.json"),
        &temp_dir.path().join("out.svg"),
    );

    assert!(matches!(run(&args), Err(TrellisError::Io(_))));
}
