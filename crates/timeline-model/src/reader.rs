//! Reader for the `otio_json` interchange encoding.
//!
//! Every object in a document carries `"OTIO_SCHEMA": "<Name>.<version>"`.
//! The reader dispatches on the name and ignores fields it has no use for.
//! Objects with an unknown schema are returned as
//! [`Composable::Unsupported`] rather than rejected.

use serde_json::{Map, Value};

use crate::schema::{
    Clip, Composable, Gap, MediaReference, Metadata, Stack, Timeline, Track, TrackKind,
    UnsupportedObject,
};
use crate::time::{RationalTime, TimeRange};

/// Errors raised while reading a timeline document.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected an object for {context}")]
    NotAnObject { context: String },

    #[error("Object in {context} has no OTIO_SCHEMA")]
    MissingSchema { context: String },

    #[error("Malformed OTIO_SCHEMA {schema:?}")]
    InvalidSchema { schema: String },

    #[error("Invalid field {field}: {message}")]
    InvalidField { field: String, message: String },
}

/// A parsed `OTIO_SCHEMA` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaId {
    pub name: String,
    pub version: u32,
}

impl SchemaId {
    pub fn parse(tag: &str) -> Result<Self, TimelineError> {
        let invalid = || TimelineError::InvalidSchema {
            schema: tag.to_string(),
        };
        let (name, version) = tag.rsplit_once('.').ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }
        let version = version.parse().map_err(|_| invalid())?;
        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

/// Read a whole document from a string.
pub fn read_from_string(text: &str) -> Result<Composable, TimelineError> {
    let value: Value = serde_json::from_str(text)?;
    read_from_value(&value)
}

/// Read a document that has already been parsed into JSON.
pub fn read_from_value(value: &Value) -> Result<Composable, TimelineError> {
    read_composable(value, "document")
}

fn read_composable(value: &Value, context: &str) -> Result<Composable, TimelineError> {
    let obj = as_object(value, context)?;
    let schema = schema_of(obj, context)?;

    let node = match schema.name.as_str() {
        "Timeline" => Composable::Timeline(read_timeline(obj)?),
        "Stack" => Composable::Stack(read_stack(obj)?),
        "Track" | "Sequence" => Composable::Track(read_track(obj)?),
        "Clip" => Composable::Clip(read_clip(obj, &schema)?),
        "Gap" | "Filler" => Composable::Gap(read_gap(obj)?),
        _ => {
            tracing::debug!(schema = %schema.name, "no model for schema, keeping as unsupported");
            Composable::Unsupported(UnsupportedObject {
                schema: schema.name,
                name: read_name(obj)?,
            })
        }
    };
    Ok(node)
}

fn read_timeline(obj: &Map<String, Value>) -> Result<Timeline, TimelineError> {
    let tracks = match obj.get("tracks") {
        None | Some(Value::Null) => Stack::default(),
        Some(value) => {
            let tracks_obj = as_object(value, "tracks")?;
            let schema = schema_of(tracks_obj, "tracks")?;
            if schema.name != "Stack" {
                return Err(TimelineError::InvalidField {
                    field: "tracks".to_string(),
                    message: format!("expected a Stack, found {}", schema.name),
                });
            }
            read_stack(tracks_obj)?
        }
    };

    Ok(Timeline {
        name: read_name(obj)?,
        metadata: read_metadata(obj)?,
        global_start_time: read_optional_time(obj, "global_start_time")?,
        tracks,
    })
}

fn read_stack(obj: &Map<String, Value>) -> Result<Stack, TimelineError> {
    Ok(Stack {
        name: read_name(obj)?,
        metadata: read_metadata(obj)?,
        source_range: read_optional_range(obj, "source_range")?,
        children: read_children(obj)?,
    })
}

fn read_track(obj: &Map<String, Value>) -> Result<Track, TimelineError> {
    let kind = match obj.get("kind") {
        Some(Value::String(kind)) => TrackKind::parse(kind),
        None | Some(Value::Null) => TrackKind::default(),
        Some(_) => return Err(invalid_field("kind", "expected a string")),
    };

    Ok(Track {
        name: read_name(obj)?,
        kind,
        metadata: read_metadata(obj)?,
        source_range: read_optional_range(obj, "source_range")?,
        children: read_children(obj)?,
    })
}

fn read_clip(obj: &Map<String, Value>, schema: &SchemaId) -> Result<Clip, TimelineError> {
    // Clip.2 keeps several references keyed by name, with one active.
    let reference = if schema.version >= 2 && obj.contains_key("media_references") {
        let references = as_object(&obj["media_references"], "media_references")?;
        let key = match obj.get("active_media_reference_key") {
            Some(Value::String(key)) => key.as_str(),
            None | Some(Value::Null) => "DEFAULT_MEDIA",
            Some(_) => {
                return Err(invalid_field(
                    "active_media_reference_key",
                    "expected a string",
                ))
            }
        };
        references.get(key)
    } else {
        obj.get("media_reference")
    };

    let media_reference = match reference {
        None | Some(Value::Null) => None,
        Some(value) => Some(read_media_reference(value)?),
    };

    Ok(Clip {
        name: read_name(obj)?,
        metadata: read_metadata(obj)?,
        source_range: read_optional_range(obj, "source_range")?,
        media_reference,
    })
}

fn read_gap(obj: &Map<String, Value>) -> Result<Gap, TimelineError> {
    Ok(Gap {
        name: read_name(obj)?,
        metadata: read_metadata(obj)?,
        source_range: read_optional_range(obj, "source_range")?,
        available_range: read_optional_range(obj, "available_range")?,
    })
}

fn read_media_reference(value: &Value) -> Result<MediaReference, TimelineError> {
    let obj = as_object(value, "media_reference")?;
    let schema = schema_of(obj, "media_reference")?;
    let available_range = read_optional_range(obj, "available_range")?;

    let reference = match schema.name.as_str() {
        "ExternalReference" => {
            let target_url = match obj.get("target_url") {
                Some(Value::String(url)) => url.clone(),
                None | Some(Value::Null) => String::new(),
                Some(_) => return Err(invalid_field("target_url", "expected a string")),
            };
            MediaReference::External {
                target_url,
                available_range,
            }
        }
        "GeneratorReference" => {
            let generator_kind = match obj.get("generator_kind") {
                Some(Value::String(kind)) => kind.clone(),
                None | Some(Value::Null) => String::new(),
                Some(_) => return Err(invalid_field("generator_kind", "expected a string")),
            };
            let parameters = match obj.get("parameters") {
                Some(Value::Object(params)) => params.clone(),
                None | Some(Value::Null) => Metadata::new(),
                Some(_) => return Err(invalid_field("parameters", "expected an object")),
            };
            MediaReference::Generator {
                generator_kind,
                parameters,
                available_range,
            }
        }
        "MissingReference" => MediaReference::Missing { available_range },
        _ => MediaReference::Other {
            schema: schema.name,
            available_range,
        },
    };
    Ok(reference)
}

fn read_children(obj: &Map<String, Value>) -> Result<Vec<Composable>, TimelineError> {
    match obj.get("children") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(children)) => children
            .iter()
            .enumerate()
            .map(|(i, child)| read_composable(child, &format!("children[{i}]")))
            .collect(),
        Some(_) => Err(invalid_field("children", "expected an array")),
    }
}

fn read_name(obj: &Map<String, Value>) -> Result<String, TimelineError> {
    match obj.get("name") {
        Some(Value::String(name)) => Ok(name.clone()),
        None | Some(Value::Null) => Ok(String::new()),
        Some(_) => Err(invalid_field("name", "expected a string")),
    }
}

fn read_metadata(obj: &Map<String, Value>) -> Result<Metadata, TimelineError> {
    match obj.get("metadata") {
        Some(Value::Object(metadata)) => Ok(metadata.clone()),
        None | Some(Value::Null) => Ok(Metadata::new()),
        Some(_) => Err(invalid_field("metadata", "expected an object")),
    }
}

fn read_optional_time(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<RationalTime>, TimelineError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => read_time(value, field).map(Some),
    }
}

fn read_optional_range(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<TimeRange>, TimelineError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let range_obj = as_object(value, field)?;
            let start_time = range_obj
                .get("start_time")
                .ok_or_else(|| invalid_field(field, "missing start_time"))?;
            let duration = range_obj
                .get("duration")
                .ok_or_else(|| invalid_field(field, "missing duration"))?;
            Ok(Some(TimeRange::new(
                read_time(start_time, &format!("{field}.start_time"))?,
                read_time(duration, &format!("{field}.duration"))?,
            )))
        }
    }
}

fn read_time(value: &Value, field: &str) -> Result<RationalTime, TimelineError> {
    let time: RationalTime = serde_json::from_value(value.clone())
        .map_err(|e| invalid_field(field, &e.to_string()))?;
    if !time.value.is_finite() || !time.rate.is_finite() {
        return Err(invalid_field(field, "time values must be finite"));
    }
    if time.rate <= 0.0 {
        return Err(invalid_field(field, "rate must be positive"));
    }
    Ok(time)
}

fn schema_of(obj: &Map<String, Value>, context: &str) -> Result<SchemaId, TimelineError> {
    match obj.get("OTIO_SCHEMA") {
        Some(Value::String(tag)) => SchemaId::parse(tag),
        _ => Err(TimelineError::MissingSchema {
            context: context.to_string(),
        }),
    }
}

fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>, TimelineError> {
    value.as_object().ok_or_else(|| TimelineError::NotAnObject {
        context: context.to_string(),
    })
}

fn invalid_field(field: &str, message: &str) -> TimelineError {
    TimelineError::InvalidField {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Item;

    fn rt(value: f64, rate: f64) -> Value {
        serde_json::json!({"OTIO_SCHEMA": "RationalTime.1", "value": value, "rate": rate})
    }

    fn range(start: f64, duration: f64, rate: f64) -> Value {
        serde_json::json!({
            "OTIO_SCHEMA": "TimeRange.1",
            "start_time": rt(start, rate),
            "duration": rt(duration, rate),
        })
    }

    #[test]
    fn test_schema_id_parse() {
        let id = SchemaId::parse("Clip.2").unwrap();
        assert_eq!(id.name, "Clip");
        assert_eq!(id.version, 2);

        assert!(SchemaId::parse("Clip").is_err());
        assert!(SchemaId::parse(".1").is_err());
        assert!(SchemaId::parse("Clip.x").is_err());
    }

    #[test]
    fn test_read_timeline_structure() {
        let doc = serde_json::json!({
            "OTIO_SCHEMA": "Timeline.1",
            "name": "cut",
            "global_start_time": rt(86400.0, 24.0),
            "tracks": {
                "OTIO_SCHEMA": "Stack.1",
                "name": "tracks",
                "children": [
                    {
                        "OTIO_SCHEMA": "Track.1",
                        "name": "V1",
                        "kind": "Video",
                        "children": [
                            {
                                "OTIO_SCHEMA": "Clip.1",
                                "name": "A",
                                "metadata": {"shot": "010"},
                                "source_range": range(0.0, 24.0, 24.0),
                                "media_reference": {
                                    "OTIO_SCHEMA": "ExternalReference.1",
                                    "target_url": "file:///a.mov",
                                    "available_range": range(0.0, 48.0, 24.0),
                                },
                            },
                            {
                                "OTIO_SCHEMA": "Gap.1",
                                "source_range": range(0.0, 12.0, 24.0),
                            },
                        ],
                    },
                    {"OTIO_SCHEMA": "Track.1", "name": "A1", "kind": "Audio", "children": []},
                ],
            },
        });

        let Composable::Timeline(timeline) = read_from_value(&doc).unwrap() else {
            panic!("expected a timeline");
        };
        assert_eq!(timeline.name, "cut");
        assert_eq!(
            timeline.global_start_time,
            Some(RationalTime::new(86400.0, 24.0))
        );
        assert_eq!(timeline.tracks.children.len(), 2);

        let Composable::Track(video) = &timeline.tracks.children[0] else {
            panic!("expected a track");
        };
        assert_eq!(video.kind, TrackKind::Video);
        assert_eq!(video.children.len(), 2);

        let Composable::Clip(clip) = &video.children[0] else {
            panic!("expected a clip");
        };
        assert_eq!(clip.metadata["shot"], "010");
        assert_eq!(
            clip.source_range(),
            Some(TimeRange::from_frames(0.0, 24.0, 24.0))
        );
        assert_eq!(
            clip.available_range(),
            Some(TimeRange::from_frames(0.0, 48.0, 24.0))
        );
        assert!(matches!(video.children[1], Composable::Gap(_)));
    }

    #[test]
    fn test_legacy_sequence_and_filler_names() {
        let doc = serde_json::json!({
            "OTIO_SCHEMA": "Sequence.1",
            "children": [
                {"OTIO_SCHEMA": "Filler.1", "available_range": range(10.0, 5.0, 25.0)},
            ],
        });
        let Composable::Track(track) = read_from_value(&doc).unwrap() else {
            panic!("expected a track");
        };
        let Composable::Gap(gap) = &track.children[0] else {
            panic!("expected a gap");
        };
        assert_eq!(gap.source_range, None);
        assert_eq!(
            gap.available_range,
            Some(TimeRange::from_frames(10.0, 5.0, 25.0))
        );
    }

    #[test]
    fn test_clip_v2_active_reference() {
        let doc = serde_json::json!({
            "OTIO_SCHEMA": "Clip.2",
            "name": "B",
            "active_media_reference_key": "proxy",
            "media_references": {
                "DEFAULT_MEDIA": {
                    "OTIO_SCHEMA": "ExternalReference.1",
                    "target_url": "file:///full.mov",
                },
                "proxy": {
                    "OTIO_SCHEMA": "ExternalReference.1",
                    "target_url": "file:///proxy.mov",
                },
            },
        });
        let Composable::Clip(clip) = read_from_value(&doc).unwrap() else {
            panic!("expected a clip");
        };
        assert_eq!(
            clip.media_reference.as_ref().and_then(|r| r.target_url()),
            Some("file:///proxy.mov")
        );
    }

    #[test]
    fn test_other_reference_kinds() {
        let doc = serde_json::json!({
            "OTIO_SCHEMA": "Track.1",
            "children": [
                {
                    "OTIO_SCHEMA": "Clip.1",
                    "media_reference": {
                        "OTIO_SCHEMA": "GeneratorReference.1",
                        "generator_kind": "SMPTEBars",
                        "parameters": {},
                        "available_range": range(0.0, 10.0, 30.0),
                    },
                },
                {
                    "OTIO_SCHEMA": "Clip.1",
                    "media_reference": {"OTIO_SCHEMA": "MissingReference.1"},
                },
                {
                    "OTIO_SCHEMA": "Clip.1",
                    "media_reference": {"OTIO_SCHEMA": "ImageSequenceReference.1"},
                },
            ],
        });
        let Composable::Track(track) = read_from_value(&doc).unwrap() else {
            panic!("expected a track");
        };
        let refs: Vec<_> = track
            .children
            .iter()
            .map(|child| match child {
                Composable::Clip(clip) => clip.media_reference.clone(),
                _ => None,
            })
            .collect();

        assert!(matches!(
            &refs[0],
            Some(MediaReference::Generator { generator_kind, .. }) if generator_kind == "SMPTEBars"
        ));
        assert!(matches!(refs[1], Some(MediaReference::Missing { .. })));
        assert!(matches!(
            &refs[2],
            Some(MediaReference::Other { schema, .. }) if schema == "ImageSequenceReference"
        ));
    }

    #[test]
    fn test_unknown_schema_is_kept() {
        let doc = serde_json::json!({
            "OTIO_SCHEMA": "Track.1",
            "children": [
                {"OTIO_SCHEMA": "Transition.1", "name": "dissolve"},
            ],
        });
        let Composable::Track(track) = read_from_value(&doc).unwrap() else {
            panic!("expected a track");
        };
        assert_eq!(track.children[0].schema_name(), "Transition");
        assert_eq!(track.children[0].name(), "dissolve");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            read_from_string("{not json"),
            Err(TimelineError::Json(_))
        ));
        assert!(matches!(
            read_from_string("[1, 2]"),
            Err(TimelineError::NotAnObject { .. })
        ));
        assert!(matches!(
            read_from_string(r#"{"name": "x"}"#),
            Err(TimelineError::MissingSchema { .. })
        ));

        let bad_range = serde_json::json!({
            "OTIO_SCHEMA": "Clip.1",
            "source_range": {"start_time": rt(0.0, 24.0)},
        });
        let err = read_from_value(&bad_range).unwrap_err();
        assert!(err.to_string().contains("missing duration"));
    }

    #[test]
    fn test_non_positive_rate_is_rejected() {
        for rate in [0.0, -24.0] {
            let gap = serde_json::json!({
                "OTIO_SCHEMA": "Gap.1",
                "source_range": {
                    "OTIO_SCHEMA": "TimeRange.1",
                    "start_time": rt(10.0, rate),
                    "duration": rt(5.0, 24.0),
                },
            });
            let err = read_from_value(&gap).unwrap_err();
            assert!(matches!(
                &err,
                TimelineError::InvalidField { field, .. } if field == "source_range.start_time"
            ));
            assert!(err.to_string().contains("rate must be positive"));
        }
    }
}
