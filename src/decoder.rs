use serde_json::{Map, Value};

use crate::catalog::TypeCatalog;
use crate::condition::ViewCondition;
use crate::error::{DecodeError, DecodeResult};
use crate::views::*;

const DEFAULT_MAX_DEPTH: usize = 32;
const MAX_DEPTH_ENV: &str = "VISIT_REVIEW_MAX_DEPTH";

/// Decoder settings, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Deepest nesting of views a template may use
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    /// Read `VISIT_REVIEW_MAX_DEPTH`, falling back to the default when unset or invalid
    pub fn from_env() -> Self {
        match std::env::var(MAX_DEPTH_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(max_depth) if max_depth > 0 => Self { max_depth },
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid {}", MAX_DEPTH_ENV);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// Turns raw template documents into typed view trees using a [`TypeCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'c> {
    catalog: &'c TypeCatalog,
    config: DecoderConfig,
}

impl<'c> Decoder<'c> {
    pub fn new(catalog: &'c TypeCatalog) -> Self {
        Self::with_config(catalog, DecoderConfig::default())
    }

    pub fn with_config(catalog: &'c TypeCatalog, config: DecoderConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Decode a document whose root carries its own `"type"`.
    pub fn decode(&self, raw: &Value) -> DecodeResult<View> {
        self.log_outcome(self.decode_node(raw, None, 0, "$"))
    }

    /// Decode a document as `root_type`.
    ///
    /// The root may omit `"type"`; if present it must match `root_type`.
    pub fn decode_as(&self, raw: &Value, root_type: &str) -> DecodeResult<View> {
        if let Some(found) = raw.get("type").and_then(Value::as_str) {
            if found != root_type {
                return self.log_outcome(Err(DecodeError::RootTypeMismatch {
                    expected: root_type.to_string(),
                    found: found.to_string(),
                }));
            }
        }
        self.log_outcome(self.decode_node(raw, Some(root_type), 0, "$"))
    }

    /// Decode a visit review layout rooted at a section list
    pub fn decode_section_list(&self, raw: &Value) -> DecodeResult<View> {
        self.decode_as(raw, SECTIONS_LIST)
    }

    /// Parse JSON text and decode it as a section list
    pub fn decode_json(&self, text: &str) -> DecodeResult<View> {
        let raw: Value = serde_json::from_str(text)?;
        self.decode_section_list(&raw)
    }

    /// Parse YAML text and decode it as a section list
    pub fn decode_yaml(&self, text: &str) -> DecodeResult<View> {
        let raw: Value = serde_yaml::from_str(text)?;
        self.decode_section_list(&raw)
    }

    fn log_outcome(&self, result: DecodeResult<View>) -> DecodeResult<View> {
        match &result {
            Ok(view) => tracing::debug!(root = view.type_name(), "decoded view template"),
            Err(e) => tracing::error!(error = %e, "failed to decode view template"),
        }
        result
    }

    fn decode_node(
        &self,
        raw: &Value,
        fallback_type: Option<&str>,
        depth: usize,
        path: &str,
    ) -> DecodeResult<View> {
        if depth > self.config.max_depth {
            return Err(DecodeError::MaxNestingDepthExceeded {
                max_depth: self.config.max_depth,
            });
        }

        let object = raw.as_object().ok_or_else(|| DecodeError::WrongShape {
            view_type: fallback_type.unwrap_or("unknown").to_string(),
            field: path.to_string(),
            expected: "a view object".to_string(),
        })?;

        let view_type = match object.get("type") {
            Some(Value::String(view_type)) => view_type.as_str(),
            Some(_) => {
                return Err(DecodeError::WrongShape {
                    view_type: fallback_type.unwrap_or("unknown").to_string(),
                    field: format!("{}.type", path),
                    expected: "a string".to_string(),
                })
            }
            None => fallback_type.ok_or_else(|| DecodeError::MissingDiscriminant {
                path: path.to_string(),
            })?,
        };

        let constructor =
            self.catalog
                .lookup(view_type)
                .ok_or_else(|| DecodeError::UnknownViewType {
                    view_type: view_type.to_string(),
                })?;

        let fields = NodeFields {
            view_type,
            object,
            decoder: self,
            depth,
            path: path.to_string(),
        };
        constructor(&fields)
    }
}

/// Encode a view tree back into its raw template form
pub fn encode(view: &View) -> DecodeResult<Value> {
    serde_json::to_value(view).map_err(|e| DecodeError::Encoding(e.to_string()))
}

// ─── Node field access ───────────────────────────────────────────────────────

/// The fields of one raw template node, handed to a [`crate::catalog::ViewConstructor`].
pub struct NodeFields<'a> {
    view_type: &'a str,
    object: &'a Map<String, Value>,
    decoder: &'a Decoder<'a>,
    depth: usize,
    path: String,
}

impl<'a> NodeFields<'a> {
    pub fn view_type(&self) -> &str {
        self.view_type
    }

    pub fn required_str(&self, field: &str) -> DecodeResult<String> {
        match self.object.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.wrong_shape(field, "a string")),
            None => Err(self.missing(field)),
        }
    }

    /// A string field defaulting to `""` when absent or null
    pub fn optional_str(&self, field: &str) -> DecodeResult<String> {
        match self.object.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Ok(String::new()),
            Some(_) => Err(self.wrong_shape(field, "a string")),
        }
    }

    pub fn required_views(&self, field: &str) -> DecodeResult<Vec<View>> {
        let items = match self.object.get(field) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(self.wrong_shape(field, "a list of views")),
            None => return Err(self.missing(field)),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.child(item, &format!("{}.{}[{}]", self.path, field, i)))
            .collect()
    }

    /// A single view slot that may be absent or null
    pub fn optional_view(&self, field: &str) -> DecodeResult<Option<Box<View>>> {
        match self.object.get(field) {
            Some(Value::Null) | None => Ok(None),
            Some(item) => self
                .child(item, &format!("{}.{}", self.path, field))
                .map(|view| Some(Box::new(view))),
        }
    }

    /// A string inside `content_config`, defaulting to `""`
    pub fn config_str(&self, field: &str) -> DecodeResult<String> {
        let config = match self.content_config()? {
            Some(config) => config,
            None => return Ok(String::new()),
        };
        match config.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Ok(String::new()),
            Some(_) => Err(DecodeError::InvalidContentConfig {
                view_type: self.view_type.to_string(),
                reason: format!("'{}' must be a string", field),
            }),
        }
    }

    /// The optional `content_config.condition`
    pub fn config_condition(&self) -> DecodeResult<Option<ViewCondition>> {
        match self.content_config()? {
            Some(config) => match config.get("condition") {
                Some(raw) => ViewCondition::from_raw(self.view_type, raw),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    fn content_config(&self) -> DecodeResult<Option<&'a Map<String, Value>>> {
        match self.object.get("content_config") {
            Some(Value::Object(config)) => Ok(Some(config)),
            Some(Value::Null) | None => Ok(None),
            Some(_) => Err(DecodeError::InvalidContentConfig {
                view_type: self.view_type.to_string(),
                reason: "content_config must be an object".to_string(),
            }),
        }
    }

    fn child(&self, raw: &Value, path: &str) -> DecodeResult<View> {
        if !raw.is_object() {
            return Err(DecodeError::WrongShape {
                view_type: self.view_type.to_string(),
                field: path.to_string(),
                expected: "a view object".to_string(),
            });
        }
        self.decoder.decode_node(raw, None, self.depth + 1, path)
    }

    fn missing(&self, field: &str) -> DecodeError {
        DecodeError::MissingField {
            view_type: self.view_type.to_string(),
            field: field.to_string(),
        }
    }

    fn wrong_shape(&self, field: &str, expected: &str) -> DecodeError {
        DecodeError::WrongShape {
            view_type: self.view_type.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }
}

// ─── Built-in constructors ───────────────────────────────────────────────────

pub fn decode_section_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::SectionList(SectionList {
        sections: fields.required_views("sections")?,
    }))
}

pub fn decode_standard_section_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::StandardSection(StandardSection {
        title: fields.required_str("title")?,
        subsections: fields.required_views("subsections")?,
    }))
}

pub fn decode_standard_subsection_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::StandardSubsection(StandardSubsection {
        title: fields.optional_str("title")?,
        rows: fields.required_views("rows")?,
        content_config: ConditionConfig {
            condition: fields.config_condition()?,
        },
    }))
}

pub fn decode_photo_section_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::PhotoSection(PhotoSection {
        title: fields.required_str("title")?,
        subsections: fields.required_views("subsections")?,
    }))
}

pub fn decode_photo_subsection_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::PhotoSubsection(PhotoSubsection {
        view: fields.optional_view("view")?,
    }))
}

pub fn decode_one_column_row_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::OneColumnRow(OneColumnRow {
        view: fields.optional_view("view")?,
    }))
}

pub fn decode_two_column_row_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::TwoColumnRow(TwoColumnRow {
        left_view: fields.optional_view("left_view")?,
        right_view: fields.optional_view("right_view")?,
        content_config: ConditionConfig {
            condition: fields.config_condition()?,
        },
    }))
}

pub fn decode_divided_views_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::DividedViewsList(DividedViewsList {
        views: fields.required_views("views")?,
    }))
}

fn content_config(fields: &NodeFields<'_>) -> DecodeResult<ContentConfig> {
    Ok(ContentConfig {
        key: fields.config_str("key")?,
    })
}

pub fn decode_alert_labels_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::AlertLabelsList(AlertLabelsList {
        content_config: content_config(fields)?,
    }))
}

pub fn decode_title_labels_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::TitleLabelsList(TitleLabelsList {
        content_config: content_config(fields)?,
    }))
}

pub fn decode_content_labels_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::ContentLabelsList(ContentLabelsList {
        content_config: content_config(fields)?,
    }))
}

pub fn decode_check_x_items_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::CheckXItemsList(CheckXItemsList {
        content_config: content_config(fields)?,
    }))
}

pub fn decode_title_subtitle_subitems_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::TitleSubtitleSubItemsList(TitleSubtitleSubItemsList {
        content_config: content_config(fields)?,
    }))
}

pub fn decode_title_subtitle_labels_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::TitleSubtitleLabels(TitleSubtitleLabels {
        content_config: TitleSubtitleContentConfig {
            title_key: fields.config_str("title_key")?,
            subtitle_key: fields.config_str("subtitle_key")?,
            condition: fields.config_condition()?,
        },
    }))
}

pub fn decode_photos_list_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::PhotosList(PhotosList {
        content_config: content_config(fields)?,
    }))
}

pub fn decode_empty_label_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::EmptyLabel(EmptyLabel {
        content_config: content_config(fields)?,
    }))
}

pub fn decode_empty_title_subtitle_labels_node(fields: &NodeFields<'_>) -> DecodeResult<View> {
    Ok(View::EmptyTitleSubtitleLabels(EmptyTitleSubtitleLabels {
        content_config: EmptyTitleSubtitleContentConfig {
            title_key: fields.config_str("title_key")?,
            empty_state_text_key: fields.config_str("empty_state_text_key")?,
            condition: fields.config_condition()?,
        },
    }))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decoder(catalog: &TypeCatalog) -> Decoder<'_> {
        Decoder::new(catalog)
    }

    #[test]
    fn test_decode_root_without_type() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({
            "sections": [{
                "type": "d_visit_review:standard_section",
                "title": "Alerts",
                "subsections": []
            }]
        });
        let view = decoder(&catalog).decode_section_list(&raw).unwrap();
        assert_eq!(view.type_name(), SECTIONS_LIST);
        assert_eq!(view.children().len(), 1);
    }

    #[test]
    fn test_root_type_mismatch() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({"type": "d_visit_review:standard_section", "title": "x", "subsections": []});
        let result = decoder(&catalog).decode_section_list(&raw);
        assert!(matches!(result, Err(DecodeError::RootTypeMismatch { .. })));
    }

    #[test]
    fn test_unknown_view_type() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({"sections": [{"type": "d_visit_review:mystery_box"}]});
        let result = decoder(&catalog).decode_section_list(&raw);
        assert_eq!(
            result,
            Err(DecodeError::UnknownViewType {
                view_type: "d_visit_review:mystery_box".to_string()
            })
        );
    }

    #[test]
    fn test_nested_view_without_type() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({"sections": [{"title": "Alerts", "subsections": []}]});
        let result = decoder(&catalog).decode_section_list(&raw);
        assert_eq!(
            result,
            Err(DecodeError::MissingDiscriminant {
                path: "$.sections[0]".to_string()
            })
        );
    }

    #[test]
    fn test_missing_required_field() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({"sections": [{"type": "d_visit_review:standard_section", "subsections": []}]});
        let result = decoder(&catalog).decode_section_list(&raw);
        assert!(matches!(
            result,
            Err(DecodeError::MissingField { ref field, .. }) if field == "title"
        ));
    }

    #[test]
    fn test_wrong_shape() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({"sections": {"type": "d_visit_review:standard_section"}});
        let result = decoder(&catalog).decode_section_list(&raw);
        assert!(matches!(result, Err(DecodeError::WrongShape { .. })));

        let raw = json!({"sections": ["not a view"]});
        let result = decoder(&catalog).decode_section_list(&raw);
        assert!(matches!(result, Err(DecodeError::WrongShape { .. })));
    }

    #[test]
    fn test_content_config_defaults_to_empty_key() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({"type": "d_visit_review:alert_labels_list"});
        let view = decoder(&catalog).decode(&raw).unwrap();
        assert_eq!(
            view,
            View::AlertLabelsList(AlertLabelsList {
                content_config: ContentConfig::new("")
            })
        );
    }

    #[test]
    fn test_invalid_content_config() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({"type": "d_visit_review:alert_labels_list", "content_config": {"key": 7}});
        let result = decoder(&catalog).decode(&raw);
        assert!(matches!(result, Err(DecodeError::InvalidContentConfig { .. })));
    }

    #[test]
    fn test_condition_decoded() {
        let catalog = TypeCatalog::with_visit_review_views();
        let raw = json!({
            "type": "d_visit_review:standard_two_column_row",
            "content_config": {"condition": {"op": "key_exists", "key": "patient_visit_alerts"}}
        });
        let view = decoder(&catalog).decode(&raw).unwrap();
        match view {
            View::TwoColumnRow(row) => assert_eq!(
                row.content_config.condition,
                Some(ViewCondition::KeyExists {
                    key: "patient_visit_alerts".to_string()
                })
            ),
            other => panic!("Expected two column row, got {:?}", other),
        }
    }

    #[test]
    fn test_max_depth() {
        let catalog = TypeCatalog::with_visit_review_views();
        let config = DecoderConfig { max_depth: 2 };
        let raw = json!({
            "type": "d_visit_review:standard_one_column_row",
            "view": {
                "type": "d_visit_review:standard_one_column_row",
                "view": {
                    "type": "d_visit_review:standard_one_column_row",
                    "view": {"type": "d_visit_review:standard_one_column_row"}
                }
            }
        });
        let decoder = Decoder::with_config(&catalog, config);
        assert_eq!(decoder.config().max_depth, 2);
        let result = decoder.decode(&raw);
        assert_eq!(
            result,
            Err(DecodeError::MaxNestingDepthExceeded { max_depth: 2 })
        );
    }

    #[test]
    fn test_decode_only_knows_registered_types() {
        let mut catalog = TypeCatalog::new();
        catalog
            .register(SECTIONS_LIST, decode_section_list_node)
            .unwrap();
        let raw = json!({"sections": [{"type": "d_visit_review:standard_section", "title": "x", "subsections": []}]});
        let result = Decoder::new(&catalog).decode_section_list(&raw);
        assert!(matches!(result, Err(DecodeError::UnknownViewType { .. })));
    }

    #[test]
    fn test_decode_yaml() {
        let catalog = TypeCatalog::with_visit_review_views();
        let yaml = r#"
sections:
  - type: "d_visit_review:standard_section"
    title: "Alerts"
    subsections:
      - type: "d_visit_review:standard_subsection"
        rows:
          - type: "d_visit_review:standard_one_column_row"
            view:
              type: "d_visit_review:alert_labels_list"
              content_config:
                key: "patient_visit_alerts"
"#;
        let view = decoder(&catalog).decode_yaml(yaml).unwrap();
        assert_eq!(view.type_name(), SECTIONS_LIST);
    }

    #[test]
    fn test_invalid_json_text() {
        let catalog = TypeCatalog::with_visit_review_views();
        let result = decoder(&catalog).decode_json("{not json");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }
}
