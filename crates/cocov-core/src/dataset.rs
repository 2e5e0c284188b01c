//! # Dataset Model
//!
//! Strongly-typed records for a COCO dataset description. Values of these
//! types are only ever produced by binding a document that already passed
//! both validation layers; they are never mutated afterwards.
//!
//! Key spellings follow the COCO reference files. Two historical variants
//! are accepted on input as aliases: `licences` for `licenses` and
//! `idcrowd` for `iscrowd`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::SegmentationError;
use crate::fields::pointer_push;
use crate::temporal::CaptureTime;

/// Root of a validated dataset description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub info: BTreeMap<String, String>,
    #[serde(default, alias = "licences", skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<License>>,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

impl Dataset {
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            images: self.images.len(),
            annotations: self.annotations.len(),
            categories: self.categories.len(),
            licenses: self.licenses.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Record counts of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub images: usize,
    pub annotations: usize,
    pub categories: usize,
    pub licenses: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images, {} annotations, {} categories, {} licenses",
            self.images, self.annotations, self.categories, self.licenses
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Keys beyond the known ones, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    #[serde(default)]
    pub license: Option<i64>,
    pub file_name: String,
    pub coco_url: String,
    pub height: i64,
    pub width: i64,
    pub date_captured: CaptureTime,
    #[serde(default)]
    pub flickr_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i64,
    /// Logical reference to [`Image::id`]; not resolved.
    pub image_id: i64,
    /// Logical reference to [`Category::id`]; not resolved.
    pub category_id: i64,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default, alias = "idcrowd")]
    pub iscrowd: Option<i64>,
    pub segmentation: Segmentation,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `[x, y, width, height]` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox(pub [f64; 4]);

/// Which union case a segmentation value has, judged from its JSON shape alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationShape {
    Polygons,
    RunLength,
}

/// Per-annotation shape data.
///
/// The case is decided by the parsed value: an array is a polygon list, an
/// object is a run-length encoding. Compressed RLE, whose `counts` is a
/// string, is not accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Segmentation {
    /// One or more polygons, each a flat `[x1, y1, x2, y2, ...]` list.
    Polygons(Vec<Vec<f64>>),
    /// Uncompressed RLE, typically `{"counts": [...], "size": [h, w]}`.
    RunLength(BTreeMap<String, Vec<f64>>),
}

impl Segmentation {
    pub fn shape_of(value: &Value) -> Option<SegmentationShape> {
        match value {
            Value::Array(_) => Some(SegmentationShape::Polygons),
            Value::Object(_) => Some(SegmentationShape::RunLength),
            _ => None,
        }
    }

    /// Bind a parsed value, reporting the first element that breaks the shape.
    pub fn from_value(value: &Value) -> Result<Self, SegmentationError> {
        match (Self::shape_of(value), value) {
            (Some(SegmentationShape::Polygons), Value::Array(polygons)) => polygons
                .iter()
                .enumerate()
                .map(|(i, polygon)| numbers(polygon, &pointer_push("", &i.to_string())))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Polygons),
            (Some(SegmentationShape::RunLength), Value::Object(map)) => map
                .iter()
                .map(|(key, counts)| {
                    let counts = numbers(counts, &pointer_push("", key))?;
                    Ok::<_, SegmentationError>((key.clone(), counts))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self::RunLength),
            _ => Err(SegmentationError::new(
                "",
                "polygon list or run-length mapping",
                value,
            )),
        }
    }

    pub fn shape(&self) -> SegmentationShape {
        match self {
            Self::Polygons(_) => SegmentationShape::Polygons,
            Self::RunLength(_) => SegmentationShape::RunLength,
        }
    }
}

fn numbers(value: &Value, pointer: &str) -> Result<Vec<f64>, SegmentationError> {
    let Value::Array(items) = value else {
        return Err(SegmentationError::new(pointer, "array of numbers", value));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64().ok_or_else(|| {
                SegmentationError::new(pointer_push(pointer, &i.to_string()), "number", item)
            })
        })
        .collect()
}

impl Serialize for Segmentation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Polygons(polygons) => polygons.serialize(serializer),
            Self::RunLength(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Segmentation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_shape_binds_as_polygons() {
        let seg = Segmentation::from_value(&json!([[1, 2, 3, 4], [5.5, 6.5]])).unwrap();
        assert_eq!(
            seg,
            Segmentation::Polygons(vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.5, 6.5]])
        );
        assert_eq!(seg.shape(), SegmentationShape::Polygons);
    }

    #[test]
    fn object_shape_binds_as_run_length() {
        let seg = Segmentation::from_value(&json!({"counts": [0, 3, 2], "size": [4, 4]})).unwrap();
        match seg {
            Segmentation::RunLength(map) => {
                assert_eq!(map["counts"], vec![0.0, 3.0, 2.0]);
                assert_eq!(map["size"], vec![4.0, 4.0]);
            }
            other => panic!("expected run-length, got {other:?}"),
        }
    }

    #[test]
    fn empty_polygon_list_is_accepted() {
        assert_eq!(
            Segmentation::from_value(&json!([])).unwrap(),
            Segmentation::Polygons(vec![])
        );
    }

    #[test]
    fn flat_coordinate_list_is_rejected_at_first_element() {
        let err = Segmentation::from_value(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.pointer, "/0");
        assert_eq!(err.expected, "array of numbers");
        assert_eq!(err.received, json!(1));
    }

    #[test]
    fn compressed_rle_counts_are_rejected() {
        let err = Segmentation::from_value(&json!({"counts": "abc", "size": [4, 4]})).unwrap_err();
        assert_eq!(err.pointer, "/counts");
    }

    #[test]
    fn non_numeric_coordinate_is_located() {
        let err = Segmentation::from_value(&json!([[1, 2], [3, "x"]])).unwrap_err();
        assert_eq!(err.pointer, "/1/1");
        assert_eq!(err.expected, "number");
    }

    #[test]
    fn scalar_is_neither_shape() {
        assert_eq!(Segmentation::shape_of(&json!(7)), None);
        let err = Segmentation::from_value(&json!("polygon")).unwrap_err();
        assert_eq!(err.pointer, "");
    }

    #[test]
    fn segmentation_serializes_in_its_input_shape() {
        let input = json!({"counts": [1.0, 2.0], "size": [2.0, 1.0]});
        let seg = Segmentation::from_value(&input).unwrap();
        assert_eq!(serde_json::to_value(&seg).unwrap(), input);
    }

    #[test]
    fn summary_counts_records() {
        let dataset = Dataset {
            info: BTreeMap::new(),
            licenses: None,
            images: vec![],
            annotations: vec![],
            categories: vec![Category {
                id: 1,
                name: "cat".into(),
                supercategory: None,
                extra: BTreeMap::new(),
            }],
        };
        let summary = dataset.summary();
        assert_eq!(summary.categories, 1);
        assert_eq!(summary.licenses, 0);
        assert_eq!(
            summary.to_string(),
            "0 images, 0 annotations, 1 categories, 0 licenses"
        );
    }
}
