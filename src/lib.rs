//! # Visit Review Layout Engine
//!
//! Renders the doctor-facing visit review from a declarative template.
//!
//! ## Features
//! - Type-safe decoding of heterogeneous view trees through a [`TypeCatalog`]
//! - Content binding by key from a per-request [`ViewContext`]
//! - Conditional views gated by a [`ViewCondition`]
//! - Projections of answer lists (checked values, titles) into labels
//! - Templates authored as JSON or YAML, encodable back to their raw form
//!
//! ## Example
//! ```ignore
//! use visit_review::{default_catalog, render_tree, Decoder, ViewContext};
//!
//! let template = r#"{
//!   "sections": [{
//!     "type": "d_visit_review:standard_section",
//!     "title": "Alerts",
//!     "subsections": [{
//!       "type": "d_visit_review:standard_subsection",
//!       "rows": [{
//!         "type": "d_visit_review:standard_one_column_row",
//!         "view": {
//!           "type": "d_visit_review:alert_labels_list",
//!           "content_config": {"key": "patient_visit_alerts"}
//!         }
//!       }]
//!     }]
//!   }]
//! }"#;
//!
//! let root = Decoder::new(default_catalog()).decode_json(template)?;
//!
//! let mut ctx = ViewContext::new();
//! ctx.set("patient_visit_alerts", vec!["Allergic to penicillin"]);
//! let rendered = render_tree(&root, &ctx)?;
//! ```

pub mod catalog;
pub mod condition;
pub mod context;
pub mod decoder;
pub mod error;
pub mod render;
pub mod views;

// --- Core types ---
pub use catalog::{default_catalog, TypeCatalog, ViewConstructor};
pub use condition::ViewCondition;
pub use context::{CheckedItem, ContentValue, Photo, TitleSubtitleSubItems, ViewContext};
pub use decoder::{encode, Decoder, DecoderConfig, NodeFields};
pub use error::{DecodeError, DecodeResult, RenderError, RenderResult};
pub use render::{render_tree, Render, RenderedView};
pub use views::View;

/// Decode a JSON visit review template with the default catalog
pub fn decode_template(json: &str) -> DecodeResult<View> {
    Decoder::new(default_catalog()).decode_json(json)
}

/// Decode a YAML visit review template with the default catalog
pub fn decode_template_yaml(yaml: &str) -> DecodeResult<View> {
    Decoder::new(default_catalog()).decode_yaml(yaml)
}
