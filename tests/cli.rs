use assert_cmd::Command;

mod common;

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.arg("-V");
    cmd.assert()
        .success()
        .stdout(format!("yoloprep {}\n", env!("CARGO_PKG_VERSION")));
}

// hbb2json subcommand tests

#[test]
fn hbb2json_writes_documents_and_summary() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels) = common::dataset_dirs(temp.path());
    common::write_bmp(&images.join("cat.bmp"), 100, 200);
    common::write_text(&labels.join("cat.txt"), "0 0.5 0.5 0.4 0.4\n");
    common::write_text(&labels.join("classes.txt"), "cat\n");

    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.arg("hbb2json")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("label files processed: 1"))
        .stdout(predicates::str::contains("total shapes: 1"));

    let doc = common::read_json(&labels.join("cat.json"));
    assert_eq!(doc["shapes"][0]["label"], "cat");
}

#[test]
fn hbb2json_json_report() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels) = common::dataset_dirs(temp.path());
    common::write_text(&labels.join("orphan.txt"), "0 0.5 0.5 0.4 0.4\n");

    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.arg("hbb2json")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .args(["--report", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"label_files\": 1"))
        .stdout(predicates::str::contains("\"missing_image\""));
}

#[test]
fn hbb2json_missing_images_dir_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let labels = temp.path().join("labels");
    std::fs::create_dir_all(&labels).expect("create labels");

    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.arg("hbb2json")
        .arg("--images")
        .arg(temp.path().join("nope"))
        .arg("--labels")
        .arg(&labels);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("images directory does not exist"));
}

// dataset-yaml subcommand tests

#[test]
fn dataset_yaml_writes_descriptor() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels) = common::dataset_dirs(temp.path());
    let classes = temp.path().join("classes.txt");
    common::write_text(&classes, "cat\ndog\n");
    let output = temp.path().join("dataset.yaml");

    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.arg("dataset-yaml")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--classes")
        .arg(&classes)
        .arg("--output")
        .arg(&output);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("train: images"))
        .stdout(predicates::str::contains("classes: 2"));

    let yaml = std::fs::read_to_string(&output).expect("read yaml");
    assert!(yaml.contains("names:\n  0: cat\n  1: dog\n"));
}

#[test]
fn dataset_yaml_defaults_output_to_current_dir() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels) = common::dataset_dirs(temp.path());
    let classes = temp.path().join("classes.yml");
    common::write_text(&classes, "names: [cat]\n");

    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.current_dir(temp.path())
        .arg("dataset-yaml")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--classes")
        .arg(&classes);
    cmd.assert().success();

    assert!(temp.path().join("dataset.yaml").is_file());
}

#[test]
fn dataset_yaml_unsupported_classes_format_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels) = common::dataset_dirs(temp.path());
    let classes = temp.path().join("classes.json");
    common::write_text(&classes, "[\"cat\"]");

    let mut cmd = Command::cargo_bin("yoloprep").unwrap();
    cmd.arg("dataset-yaml")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--classes")
        .arg(&classes)
        .arg("--output")
        .arg(temp.path().join("dataset.yaml"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported format"));

    assert!(!temp.path().join("dataset.yaml").exists());
}
