use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs `icon-render` with no arguments inside a directory that contains `icons/`
/// and checks the three PNG files and the console output.
#[test]
fn test_default_run_writes_three_icons() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let work_dir = temp_dir.path();
    std::fs::create_dir(work_dir.join("icons")).expect("Failed to create icons directory");

    let output = run_icon_render(work_dir, &[]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4, "Expected four lines of output, got: {:?}", lines);
    assert_eq!(lines[3], "All icons generated successfully!");

    for (line, size) in lines.iter().zip([16u32, 48, 128]) {
        assert!(
            line.contains(&format!("icon{size}.png ({size}x{size})")),
            "Unexpected confirmation line: {}",
            line
        );

        let icon_path = work_dir.join("icons").join(format!("icon{size}.png"));
        assert!(icon_path.exists(), "Icon should exist at: {}", icon_path.display());

        let icon = image::open(&icon_path).expect("Generated icon should be a valid PNG");
        assert_eq!(icon.width(), size, "Generated icon width should be {}", size);
        assert_eq!(icon.height(), size, "Generated icon height should be {}", size);
    }

    let mut entries: Vec<String> = std::fs::read_dir(work_dir.join("icons"))
        .expect("Failed to list icons directory")
        .map(|e| e.expect("Bad directory entry").file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, ["icon128.png", "icon16.png", "icon48.png"]);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let first = temp_dir.path().join("first");
    let second = temp_dir.path().join("second");
    std::fs::create_dir(&first).expect("Failed to create output directory");
    std::fs::create_dir(&second).expect("Failed to create output directory");

    for dir in [&first, &second] {
        let output = run_icon_render(temp_dir.path(), &["-o", path_str(dir)]);
        assert_success(&output);
    }

    for size in [16, 48, 128] {
        let name = format!("icon{size}.png");
        let a = std::fs::read(first.join(&name)).expect("Failed to read first icon");
        let b = std::fs::read(second.join(&name)).expect("Failed to read second icon");
        assert_eq!(a, b, "{} should be identical across runs", name);
    }
}

#[test]
fn test_missing_output_directory_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_icon_render(temp_dir.path(), &[]);

    assert!(!output.status.success(), "Run without icons/ should fail");
    assert!(
        !temp_dir.path().join("icons").exists(),
        "Output directory must not be created"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("icon16.png"), "Error should name the file: {}", stderr);
}

#[test]
fn test_custom_sizes() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).expect("Failed to create output directory");

    let output = run_icon_render(
        temp_dir.path(),
        &["--png", "32,64", "-o", path_str(&out_dir)],
    );
    assert_success(&output);

    for size in [32, 64] {
        let icon = image::open(out_dir.join(format!("icon{size}.png")))
            .expect("Generated icon should be a valid PNG");
        assert_eq!(icon.width(), size);
        assert_eq!(icon.height(), size);
    }
    assert!(!out_dir.join("icon16.png").exists());
}

#[test]
fn test_invalid_arguments_are_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    std::fs::create_dir(temp_dir.path().join("icons")).expect("Failed to create icons directory");

    let zero_size = run_icon_render(temp_dir.path(), &["--png", "0"]);
    assert!(!zero_size.status.success(), "Size 0 should be rejected");

    let bad_color = run_icon_render(
        temp_dir.path(),
        &["--badge-color", "not-a-color"],
    );
    assert!(!bad_color.status.success(), "Invalid color should be rejected");
}

fn run_icon_render(work_dir: &Path, args: &[&str]) -> Output {
    Command::new(icon_render_binary())
        .args(args)
        .current_dir(work_dir)
        .output()
        .expect("Failed to run icon-render command")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("icon-render command failed");
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp path should be valid UTF-8")
}

fn icon_render_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_icon-render"))
}
