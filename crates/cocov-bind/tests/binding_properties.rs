//! Property tests: binding preserves record counts and is deterministic.

use cocov_bind::ModelBinder;
use proptest::prelude::*;
use serde_json::{json, Value};

fn image(id: i64, captured_secs: i64) -> Value {
    json!({
        "id": id,
        "file_name": format!("{id:012}.jpg"),
        "coco_url": format!("http://images.example/{id}.jpg"),
        "height": 480,
        "width": 640,
        "date_captured": captured_secs,
    })
}

fn annotation(id: i64, polygon: &[f64], run_length: bool) -> Value {
    let segmentation = if run_length {
        json!({ "counts": polygon, "size": [480, 640] })
    } else {
        json!([polygon])
    };
    json!({
        "id": id,
        "image_id": 1,
        "category_id": 1,
        "iscrowd": i64::from(run_length),
        "segmentation": segmentation,
        "bbox": [0.0, 0.0, 10.0, 10.0],
    })
}

prop_compose! {
    fn document()(
        captured in prop::collection::vec(0i64..2_000_000_000, 0..6),
        polygons in prop::collection::vec(
            (prop::collection::vec(-1e4f64..1e4, 0..12), any::<bool>()),
            0..6,
        ),
        categories in prop::collection::vec("[a-z]{1,10}", 0..5),
    ) -> (Value, usize, usize, usize) {
        let images: Vec<Value> = captured
            .iter()
            .enumerate()
            .map(|(i, secs)| image(i as i64 + 1, *secs))
            .collect();
        let annotations: Vec<Value> = polygons
            .iter()
            .enumerate()
            .map(|(i, (poly, rle))| annotation(i as i64 + 1, poly, *rle))
            .collect();
        let category_values: Vec<Value> = categories
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "id": i + 1, "name": name }))
            .collect();
        let doc = json!({
            "info": { "description": "generated" },
            "images": images,
            "annotations": annotations,
            "categories": category_values,
        });
        (doc, captured.len(), polygons.len(), categories.len())
    }
}

proptest! {
    #[test]
    fn binding_preserves_record_counts((doc, images, annotations, categories) in document()) {
        let dataset = ModelBinder::new().bind(&doc).unwrap();
        prop_assert_eq!(dataset.images.len(), images);
        prop_assert_eq!(dataset.annotations.len(), annotations);
        prop_assert_eq!(dataset.categories.len(), categories);
    }

    #[test]
    fn binding_twice_gives_equal_datasets((doc, _, _, _) in document()) {
        let binder = ModelBinder::new();
        let first = binder.bind(&doc).unwrap();
        let second = binder.bind(&doc).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn a_broken_capture_time_rejects_the_whole_dataset(
        (mut doc, images, _, _) in document(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(images > 0);
        let i = pick.index(images);
        doc["images"][i]["date_captured"] = json!("not a time");
        let err = ModelBinder::new().bind(&doc).unwrap_err();
        let expected_path = format!("/images/{i}/date_captured");
        prop_assert_eq!(err.paths(), vec![expected_path.as_str()]);
    }
}
