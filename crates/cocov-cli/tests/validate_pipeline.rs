//! End-to-end tests: dataset files on disk through the full pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use cocov_cli::validate::{run_validate, ValidateArgs};
use cocov_cli::{FailureKind, Outcome, RecordingReporter, Validator};
use serde_json::{json, Value};
use tempfile::TempDir;

fn sample() -> Value {
    json!({
        "info": {
            "description": "COCO 2017 Dataset",
            "url": "http://cocodataset.org",
            "version": "1.0",
            "year": "2017",
            "contributor": "COCO Consortium",
            "date_created": "2017/09/01"
        },
        "licenses": [
            { "url": "http://creativecommons.org/licenses/by-nc-sa/2.0/", "id": 1, "name": "Attribution-NonCommercial-ShareAlike License" }
        ],
        "images": [{
            "license": 1,
            "file_name": "000000397133.jpg",
            "coco_url": "http://images.cocodataset.org/val2017/000000397133.jpg",
            "height": 427,
            "width": 640,
            "date_captured": "2013-11-14 17:02:52",
            "flickr_url": "http://farm7.staticflickr.com/6116/6255196340_da26cf2c9e_z.jpg",
            "id": 397133
        }],
        "annotations": [{
            "segmentation": [[224.24, 297.18, 228.29, 297.18, 234.91, 298.29]],
            "area": 702.1057499999998,
            "iscrowd": 0,
            "image_id": 397133,
            "bbox": [217.62, 240.54, 38.99, 57.75],
            "category_id": 44,
            "id": 82445
        }],
        "categories": [
            { "supercategory": "kitchen", "id": 44, "name": "bottle" }
        ]
    })
}

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    write(dir, name, serde_json::to_string_pretty(value).unwrap().as_bytes())
}

fn validator() -> Validator<RecordingReporter> {
    Validator::with_reporter(RecordingReporter::new()).unwrap()
}

fn failure_kind(v: &Validator<RecordingReporter>, path: &Path) -> FailureKind {
    let err = v.try_validate(path).unwrap_err();
    err.kind()
}

#[test]
fn sample_dataset_validates() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "sample.json", &sample());
    let v = validator();

    let dataset = v.validate(&path).unwrap();
    assert_eq!(dataset.images.len(), 1);
    assert_eq!(dataset.categories.len(), 1);
    assert_eq!(dataset.annotations[0].category_id, 44);

    let reports = v.reporter().reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].path, path);
    match &reports[0].outcome {
        Outcome::Validated(summary) => {
            assert_eq!(summary.images, 1);
            assert_eq!(summary.annotations, 1);
            assert_eq!(summary.categories, 1);
            assert_eq!(summary.licenses, 1);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let v = validator();
    let path = dir.path().join("absent.json");
    assert!(v.validate(&path).is_none());
    assert_eq!(failure_kind(&v, &path), FailureKind::NotFound);
}

#[test]
fn directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let v = validator();
    assert_eq!(failure_kind(&v, dir.path()), FailureKind::NotFound);
}

#[test]
fn missing_images_is_a_structure_error() {
    let dir = TempDir::new().unwrap();
    let mut doc = sample();
    doc.as_object_mut().unwrap().remove("images");
    let path = write_json(&dir, "no-images.json", &doc);
    assert_eq!(failure_kind(&validator(), &path), FailureKind::Structure);
}

#[test]
fn image_without_width_is_a_structure_error() {
    let dir = TempDir::new().unwrap();
    let mut doc = sample();
    doc["images"][0].as_object_mut().unwrap().remove("width");
    let path = write_json(&dir, "no-width.json", &doc);
    assert_eq!(failure_kind(&validator(), &path), FailureKind::Structure);
}

#[test]
fn single_annotation_object_is_a_structure_error() {
    let dir = TempDir::new().unwrap();
    let mut doc = sample();
    let single = doc["annotations"][0].clone();
    doc["annotations"] = single;
    let path = write_json(&dir, "single.json", &doc);
    assert_eq!(failure_kind(&validator(), &path), FailureKind::Structure);
}

#[test]
fn flat_segmentation_is_a_binding_error() {
    let dir = TempDir::new().unwrap();
    let mut doc = sample();
    doc["annotations"][0]["segmentation"] = json!([1.0, 2.0, 3.0]);
    let path = write_json(&dir, "flat.json", &doc);
    let v = validator();
    let err = v.try_validate(&path).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Binding);
    assert!(err.to_string().contains("/annotations/0/segmentation/0"));
}

#[test]
fn unparseable_capture_time_is_a_binding_error() {
    let dir = TempDir::new().unwrap();
    let mut doc = sample();
    doc["images"][0]["date_captured"] = json!("yesterday");
    let path = write_json(&dir, "date.json", &doc);
    assert_eq!(failure_kind(&validator(), &path), FailureKind::Binding);
}

#[test]
fn malformed_json_is_internal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", b"{\"info\": {");
    assert_eq!(failure_kind(&validator(), &path), FailureKind::Internal);
}

#[test]
fn invalid_utf8_is_internal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "latin1.json", b"{\"info\": {\"a\": \"\xff\"}}");
    assert_eq!(failure_kind(&validator(), &path), FailureKind::Internal);
}

#[test]
fn validation_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "sample.json", &sample());
    let v = validator();
    let first = v.validate(&path).unwrap();
    let second = v.validate(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_call_reports_exactly_once() {
    let dir = TempDir::new().unwrap();
    let good = write_json(&dir, "good.json", &sample());
    let bad = write(&dir, "bad.json", b"[");
    let absent = dir.path().join("absent.json");
    let v = validator();

    v.validate(&good);
    v.validate(&bad);
    v.validate(&absent);

    let reports = v.reporter().reports();
    let paths: Vec<&Path> = reports.iter().map(|r| r.path.as_path()).collect();
    assert_eq!(paths, vec![good.as_path(), bad.as_path(), absent.as_path()]);
    assert!(matches!(reports[0].outcome, Outcome::Validated(_)));
    assert!(matches!(
        reports[1].outcome,
        Outcome::Failed {
            kind: FailureKind::Internal,
            ..
        }
    ));
    assert!(matches!(
        reports[2].outcome,
        Outcome::Failed {
            kind: FailureKind::NotFound,
            ..
        }
    ));
}

#[test]
fn run_validate_exit_codes() {
    let dir = TempDir::new().unwrap();
    let good = write_json(&dir, "good.json", &sample());
    let mut doc = sample();
    doc.as_object_mut().unwrap().remove("categories");
    let rejected = write_json(&dir, "rejected.json", &doc);
    let broken = write(&dir, "broken.json", b"not json");

    let run = |paths: Vec<PathBuf>| {
        run_validate(&ValidateArgs {
            paths,
            schema: None,
        })
        .unwrap()
    };

    assert_eq!(run(vec![good.clone()]), 0);
    assert_eq!(run(vec![good.clone(), rejected.clone()]), 1);
    assert_eq!(run(vec![rejected, broken, good]), 2);
}

#[test]
fn run_validate_with_schema_override() {
    let dir = TempDir::new().unwrap();
    let strict = json!({
        "type": "object",
        "required": ["info", "images", "annotations", "categories", "licenses"]
    });
    let schema = write_json(&dir, "strict.schema.json", &strict);
    let mut doc = sample();
    doc.as_object_mut().unwrap().remove("licenses");
    let path = write_json(&dir, "no-licenses.json", &doc);

    let code = run_validate(&ValidateArgs {
        paths: vec![path.clone()],
        schema: Some(schema),
    })
    .unwrap();
    assert_eq!(code, 1);

    let code = run_validate(&ValidateArgs {
        paths: vec![path],
        schema: None,
    })
    .unwrap();
    assert_eq!(code, 0);
}

#[test]
fn run_validate_fails_on_unreadable_schema() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "sample.json", &sample());
    let result = run_validate(&ValidateArgs {
        paths: vec![path],
        schema: Some(dir.path().join("missing.schema.json")),
    });
    assert!(result.is_err());
}
