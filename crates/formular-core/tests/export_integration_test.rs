//! Integration tests for the complete export pipeline
//!
//! Tests use temporary directories with real file fixtures to verify:
//! - Locating the newest document and GDT file
//! - Encoding fallback when decoding GDT files
//! - Filename synthesis with prefix, postfix and transformations
//! - Best-effort cleanup of source files
//! - Fail-fast behaviour on incomplete metadata and broken rules

use std::path::Path;
use std::time::Duration;

use formular_core::config::ExportConfig;
use formular_core::transforms::TransformationRule;
use formular_core::{Config, Error, ExportOptions, Exporter};
use tempfile::TempDir;

const GDT: &str = "01380006301\r\n\
                   0193101Mustermann\r\n\
                   0103102Max\r\n\
                   017310328081980\r\n";

/// Helper to create a temporary exporter layout: `in/`, `gdt/` and a config
/// pointing at `out/`.
fn setup(kennungen: &[&str]) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("in")).unwrap();
    std::fs::create_dir_all(dir.path().join("gdt")).unwrap();

    let export = ExportConfig {
        input_path: "in".to_string(),
        input_file: "*.pdf".to_string(),
        gdt_path: "gdt".to_string(),
        gdt_file: "*.gdt".to_string(),
        export_path: "out".to_string(),
        kennungen: kennungen.iter().map(|k| k.to_string()).collect(),
        trennzeichen: "_".to_string(),
        prefix: None,
        postfix: None,
        transformations: Vec::new(),
        delete_gdt: false,
        delete_input: false,
        encodings: vec!["utf-8".to_string(), "iso-8859-1".to_string()],
    };
    let config = Config::new(export, dir.path());
    (dir, config)
}

fn write(path: &Path, contents: impl AsRef<[u8]>) {
    std::fs::write(path, contents).unwrap();
}

// =============================================================================
// Complete Pipeline Tests
// =============================================================================

#[test]
fn test_export_copies_newest_document() {
    let (dir, config) = setup(&["3101", "3102"]);
    write(&dir.path().join("in/old.pdf"), "old");
    write(&dir.path().join("gdt/old.gdt"), "0153101Nobody\r\n0123102No\r\n");
    std::thread::sleep(Duration::from_millis(50));
    write(&dir.path().join("in/new.pdf"), "new");
    write(&dir.path().join("gdt/new.gdt"), GDT);

    let report = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap();

    assert_eq!(report.stem, "Mustermann_Max");
    assert_eq!(report.values, vec!["Mustermann", "Max"]);
    assert_eq!(report.encoding, "UTF-8");
    assert_eq!(
        report.destination,
        dir.path().join("out/Mustermann_Max.pdf")
    );
    assert_eq!(std::fs::read_to_string(&report.destination).unwrap(), "new");

    // Sources are kept unless cleanup is configured
    assert!(dir.path().join("in/new.pdf").exists());
    assert!(dir.path().join("gdt/new.gdt").exists());
}

#[test]
fn test_export_with_prefix_postfix_and_transformations() {
    let (dir, mut config) = setup(&["3101", "3102", "3103"]);
    config.export.trennzeichen = " - ".to_string();
    config.export.prefix = Some("Arztbrief".to_string());
    config.export.postfix = Some("signiert".to_string());
    config.export.transformations = vec![
        TransformationRule::new(r"^(\d{2})(\d{2})(\d{4})$", "$3-$2-$1"),
        TransformationRule::new("(?i)arzt", "Doc"),
    ];
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), GDT);

    let report = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap();

    assert_eq!(
        report.stem,
        "Docbrief - Mustermann - Max - 1980-08-28 - signiert"
    );
    assert!(report.destination.exists());
}

#[test]
fn test_latin1_metadata_falls_back() {
    let (dir, config) = setup(&["3101", "3102"]);
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    // "Müller" / "Jürgen" encoded as ISO-8859-1
    write(
        &dir.path().join("gdt/patient.gdt"),
        b"0153101M\xfcller\r\n0153102J\xfcrgen\r\n",
    );

    let report = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap();

    assert_eq!(report.encoding, "windows-1252");
    assert_eq!(report.stem, "Müller_Jürgen");
    assert!(dir.path().join("out/Müller_Jürgen.pdf").exists());
}

#[test]
fn test_dry_run_has_no_side_effects() {
    let (dir, mut config) = setup(&["3101"]);
    config.export.delete_gdt = true;
    config.export.delete_input = true;
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), GDT);

    let report = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions { dry_run: true })
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.stem, "Mustermann");
    assert!(!dir.path().join("out").exists());
    assert!(dir.path().join("in/formular.pdf").exists());
    assert!(dir.path().join("gdt/patient.gdt").exists());
}

// =============================================================================
// Cleanup Tests
// =============================================================================

#[test]
fn test_cleanup_deletes_sources() {
    let (dir, mut config) = setup(&["3101"]);
    config.export.delete_gdt = true;
    config.export.delete_input = true;
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), GDT);

    let report = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap();

    assert!(report.deleted_gdt);
    assert!(report.deleted_input);
    assert!(!dir.path().join("in/formular.pdf").exists());
    assert!(!dir.path().join("gdt/patient.gdt").exists());
    assert!(dir.path().join("out/Mustermann.pdf").exists());
}

#[test]
fn test_cleanup_of_vanished_file_is_not_fatal() {
    // Documents and GDT files share one directory and both globs pick the same
    // file, so the second delete finds it already gone.
    let (dir, mut config) = setup(&["3101"]);
    config.export.input_path = "gdt".to_string();
    config.export.input_file = "*.gdt".to_string();
    config.export.delete_gdt = true;
    config.export.delete_input = true;
    let gdt = dir.path().join("gdt/patient.gdt");
    write(&gdt, GDT);

    let report = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap();

    assert_eq!(report.input_file, report.gdt_file);
    assert!(report.deleted_gdt);
    assert!(!report.deleted_input);
    assert!(!gdt.exists());
    assert!(dir.path().join("out/Mustermann.gdt").exists());
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_incomplete_metadata_aborts_before_copy() {
    let (dir, config) = setup(&["3101", "8316"]);
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), GDT);

    let err = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap_err();

    match err {
        Error::IncompleteExtraction { missing } => assert_eq!(missing, vec!["8316"]),
        other => panic!("Expected IncompleteExtraction, got {other:?}"),
    }
    let exported = std::fs::read_dir(dir.path().join("out")).unwrap().count();
    assert_eq!(exported, 0);
}

#[test]
fn test_invalid_rule_rejected_before_export() {
    let (dir, mut config) = setup(&["3101"]);
    config.export.transformations = vec![
        TransformationRule::new("M", "m"),
        TransformationRule::new(r"(\d)", "$1$2$3"),
    ];
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), GDT);

    let err = Exporter::new(&config).unwrap_err();
    match err {
        Error::InvalidBackreference {
            index, references, ..
        } => {
            assert_eq!(index, 2);
            assert_eq!(references, vec![2, 3]);
        }
        other => panic!("Expected InvalidBackreference, got {other:?}"),
    }
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_path_traversal_in_metadata_rejected() {
    let (dir, config) = setup(&["3101"]);
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), "0223101../../escaped\r\n");

    let err = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::UnsafeFilename { ref stem, .. } if stem == "../../escaped"));
    assert!(!dir.path().join("escaped.pdf").exists());
    assert!(!dir.path().parent().unwrap().join("escaped.pdf").exists());
    assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
}

#[test]
fn test_empty_value_stem_rejected() {
    let (dir, config) = setup(&["3101"]);
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), "0103101\r\n");

    let err = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnsafeFilename { .. }));
}

#[test]
fn test_missing_gdt_directory() {
    let (dir, config) = setup(&["3101"]);
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    std::fs::remove_dir(dir.path().join("gdt")).unwrap();

    let err = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::DirectoryNotFound { .. }));
}

#[test]
fn test_no_document_found() {
    let (dir, config) = setup(&["3101"]);
    write(&dir.path().join("in/notes.txt"), "not a pdf");
    write(&dir.path().join("gdt/patient.gdt"), GDT);

    let err = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::NoMatchingFile { ref pattern, .. } if pattern == "*.pdf"));
}

#[test]
fn test_load_config_file_and_export() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("in")).unwrap();
    std::fs::create_dir_all(dir.path().join("gdt")).unwrap();
    write(&dir.path().join("in/formular.pdf"), "%PDF");
    write(&dir.path().join("gdt/patient.gdt"), GDT);
    write(
        &dir.path().join("config.json"),
        r#"{
            "input_path": "in",
            "input_file": "formular.pdf",
            "gdt_path": "gdt",
            "export_path": "out",
            "kennungen": ["3102", "3101"],
            "trennzeichen": ".",
            "transformations": [{ "pattern": "a", "replacement": "4" }]
        }"#,
    );

    let config = Config::load(dir.path().join("config.json")).unwrap();
    let report = Exporter::new(&config)
        .unwrap()
        .run(ExportOptions::default())
        .unwrap();
    assert_eq!(report.stem, "M4x.Musterm4nn");
    assert!(dir.path().join("out/M4x.Musterm4nn.pdf").exists());
}
