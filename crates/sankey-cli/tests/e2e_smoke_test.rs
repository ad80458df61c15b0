use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use sankey_cli::{Args, run};

/// Collects all .sankey files from a directory
fn collect_chart_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("sankey")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Charts live at the workspace root, not in the crate
fn charts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("charts")
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        width: None,
        height: None,
        font_size: None,
        color_scheme: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_charts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_charts = collect_chart_files(charts_dir());
    assert!(!valid_charts.is_empty(), "No charts found in charts/");

    let mut failed_charts = Vec::new();

    for chart_path in &valid_charts {
        let output_path = temp_dir.path().join(format!(
            "{}.svg",
            chart_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(chart_path, &output_path)) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("Output should exist");
                assert!(svg.contains("</svg>"), "{} is incomplete", output_path.display());
            }
            Err(e) => failed_charts.push((chart_path.clone(), e)),
        }
    }

    if !failed_charts.is_empty() {
        eprintln!("\nValid charts that failed:");
        for (path, err) in &failed_charts {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid chart(s) failed unexpectedly", failed_charts.len());
    }
}

#[test]
fn e2e_smoke_test_error_charts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_charts = collect_chart_files(charts_dir().join("errors"));
    assert!(
        !error_charts.is_empty(),
        "No error charts found in charts/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for chart_path in &error_charts {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            chart_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(chart_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(chart_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError charts that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error chart(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_overrides_and_config_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let input = temp_dir.path().join("small.sankey");
    fs::write(&input, "Salary [2500] Income\n").unwrap();

    let config = temp_dir.path().join("config.toml");
    fs::write(
        &config,
        "[chart]\nheight = 300\n\n[currency]\nsymbol = \"£\"\ndecimals = 0\n",
    )
    .unwrap();

    let output = temp_dir.path().join("small.svg");
    let mut args = args_for(&input, &output);
    args.config = Some(config.to_string_lossy().to_string());
    args.width = Some(500);

    run(&args).expect("Chart should render");

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains(r#"viewBox="0 0 500 300""#));
    assert!(svg.contains("£2,500"));
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("missing.sankey");
    let output = temp_dir.path().join("missing.svg");

    let result = run(&args_for(&input, &output));
    assert!(matches!(result, Err(sankey::SankeyError::Io(_))));
}
