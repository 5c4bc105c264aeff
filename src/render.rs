use serde_json::{json, Map, Value};

use crate::condition::{evaluate_optional, ViewCondition};
use crate::context::{ContentValue, ViewContext};
use crate::error::{RenderError, RenderResult};
use crate::views::*;

/// One rendered node of the output document
pub type RenderedView = Map<String, Value>;

/// Turns a template node plus the render context into an output fragment.
///
/// `Ok(None)` means the node is intentionally absent (e.g. its condition is false)
/// and is dropped by its parent.
pub trait Render {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>>;
}

/// Render a whole template. The first error encountered, depth-first, aborts the pass.
pub fn render_tree(root: &View, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
    let span = tracing::debug_span!("render_tree", root = root.type_name());
    let _guard = span.enter();

    match root.render(ctx) {
        Ok(rendered) => {
            tracing::debug!(context_keys = ctx.len(), "rendered view tree");
            Ok(rendered)
        }
        Err(e) => {
            tracing::error!(view_type = e.view_type(), error = %e, "failed to render view tree");
            Err(e)
        }
    }
}

impl Render for View {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        match self {
            View::SectionList(v) => v.render(ctx),
            View::StandardSection(v) => v.render(ctx),
            View::StandardSubsection(v) => v.render(ctx),
            View::PhotoSection(v) => v.render(ctx),
            View::PhotoSubsection(v) => v.render(ctx),
            View::OneColumnRow(v) => v.render(ctx),
            View::TwoColumnRow(v) => v.render(ctx),
            View::DividedViewsList(v) => v.render(ctx),
            View::AlertLabelsList(v) => v.render(ctx),
            View::TitleLabelsList(v) => v.render(ctx),
            View::ContentLabelsList(v) => v.render(ctx),
            View::CheckXItemsList(v) => v.render(ctx),
            View::TitleSubtitleSubItemsList(v) => v.render(ctx),
            View::TitleSubtitleLabels(v) => v.render(ctx),
            View::PhotosList(v) => v.render(ctx),
            View::EmptyLabel(v) => v.render(ctx),
            View::EmptyTitleSubtitleLabels(v) => v.render(ctx),
        }
    }
}

// ─── Containers ──────────────────────────────────────────────────────────────

impl Render for SectionList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let mut rendered = typed(SECTIONS_LIST);
        rendered.insert("sections".into(), render_children(&self.sections, ctx)?);
        Ok(Some(rendered))
    }
}

impl Render for StandardSection {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let mut rendered = typed(STANDARD_SECTION);
        rendered.insert("title".into(), Value::String(self.title.clone()));
        rendered.insert("subsections".into(), render_children(&self.subsections, ctx)?);
        Ok(Some(rendered))
    }
}

impl Render for StandardSubsection {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        if !condition_met(self.content_config.condition.as_ref(), STANDARD_SUBSECTION, ctx)? {
            return Ok(None);
        }
        let mut rendered = typed(STANDARD_SUBSECTION);
        rendered.insert("title".into(), Value::String(self.title.clone()));
        rendered.insert("rows".into(), render_children(&self.rows, ctx)?);
        Ok(Some(rendered))
    }
}

impl Render for PhotoSection {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let mut rendered = typed(STANDARD_PHOTO_SECTION);
        rendered.insert("title".into(), Value::String(self.title.clone()));
        rendered.insert("subsections".into(), render_children(&self.subsections, ctx)?);
        Ok(Some(rendered))
    }
}

impl Render for PhotoSubsection {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let mut rendered = typed(STANDARD_PHOTO_SUBSECTION);
        insert_slot(&mut rendered, "view", self.view.as_deref(), ctx)?;
        Ok(Some(rendered))
    }
}

impl Render for OneColumnRow {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let mut rendered = typed(STANDARD_ONE_COLUMN_ROW);
        insert_slot(&mut rendered, "view", self.view.as_deref(), ctx)?;
        Ok(Some(rendered))
    }
}

impl Render for TwoColumnRow {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        if !condition_met(self.content_config.condition.as_ref(), STANDARD_TWO_COLUMN_ROW, ctx)? {
            return Ok(None);
        }
        let mut rendered = typed(STANDARD_TWO_COLUMN_ROW);
        insert_slot(&mut rendered, "left_view", self.left_view.as_deref(), ctx)?;
        insert_slot(&mut rendered, "right_view", self.right_view.as_deref(), ctx)?;
        Ok(Some(rendered))
    }
}

impl Render for DividedViewsList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let mut rendered = typed(DIVIDED_VIEWS_LIST);
        rendered.insert("views".into(), render_children(&self.views, ctx)?);
        Ok(Some(rendered))
    }
}

// ─── Leaves ──────────────────────────────────────────────────────────────────

impl Render for AlertLabelsList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let key = &self.content_config.key;
        let values = match content(ALERT_LABELS_LIST, key, ctx)? {
            ContentValue::StringList(values) => values.clone(),
            other => return Err(mismatch(ALERT_LABELS_LIST, key, "list of strings", other)),
        };
        Ok(Some(labels(ALERT_LABELS_LIST, values)))
    }
}

impl Render for TitleLabelsList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let key = &self.content_config.key;
        let values = match content(TITLE_LABELS_LIST, key, ctx)? {
            ContentValue::String(value) => vec![value.clone()],
            ContentValue::StringList(values) => values.clone(),
            other => {
                return Err(mismatch(
                    TITLE_LABELS_LIST,
                    key,
                    "string or list of strings",
                    other,
                ))
            }
        };
        Ok(Some(labels(TITLE_LABELS_LIST, values)))
    }
}

impl Render for ContentLabelsList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let key = &self.content_config.key;
        let values = match content(CONTENT_LABELS_LIST, key, ctx)? {
            ContentValue::String(value) => vec![value.clone()],
            ContentValue::StringList(values) => values.clone(),
            ContentValue::CheckedItems(items) => items
                .iter()
                .filter(|item| item.is_checked)
                .map(|item| item.value.clone())
                .collect(),
            ContentValue::TitleSubtitleSubItems(items) => {
                items.iter().map(|item| item.title.clone()).collect()
            }
            other => {
                return Err(mismatch(
                    CONTENT_LABELS_LIST,
                    key,
                    "string, list of strings, list of checked items or list of title/subtitle/subitems",
                    other,
                ))
            }
        };
        Ok(Some(labels(CONTENT_LABELS_LIST, values)))
    }
}

impl Render for CheckXItemsList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let key = &self.content_config.key;
        let items = match content(CHECK_X_ITEMS_LIST, key, ctx)? {
            ContentValue::CheckedItems(items) => items,
            other => return Err(mismatch(CHECK_X_ITEMS_LIST, key, "list of checked items", other)),
        };

        let mut rendered = typed(CHECK_X_ITEMS_LIST);
        rendered.insert(
            "items".into(),
            items
                .iter()
                .map(|item| json!({"value": item.value, "is_checked": item.is_checked}))
                .collect(),
        );
        Ok(Some(rendered))
    }
}

impl Render for TitleSubtitleSubItemsList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let view_type = TITLE_SUBTITLE_SUBITEMS_DIVIDED_ITEMS_LIST;
        let key = &self.content_config.key;
        let items = match content(view_type, key, ctx)? {
            ContentValue::TitleSubtitleSubItems(items) => items,
            other => {
                return Err(mismatch(view_type, key, "list of title/subtitle/subitems", other))
            }
        };

        let mut rendered = typed(view_type);
        rendered.insert(
            "items".into(),
            items
                .iter()
                .map(|item| {
                    json!({
                        "title": item.title,
                        "subtitle": item.subtitle,
                        "subitems": item.subitems,
                    })
                })
                .collect(),
        );
        Ok(Some(rendered))
    }
}

impl Render for TitleSubtitleLabels {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let config = &self.content_config;
        if !condition_met(config.condition.as_ref(), TITLE_SUBTITLE_LABELS, ctx)? {
            return Ok(None);
        }

        let mut rendered = typed(TITLE_SUBTITLE_LABELS);
        rendered.insert(
            "title".into(),
            Value::String(string_content(TITLE_SUBTITLE_LABELS, &config.title_key, ctx)?),
        );
        rendered.insert(
            "subtitle".into(),
            Value::String(string_content(TITLE_SUBTITLE_LABELS, &config.subtitle_key, ctx)?),
        );
        Ok(Some(rendered))
    }
}

impl Render for PhotosList {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let key = &self.content_config.key;
        let photos = match content(STANDARD_PHOTOS_LIST, key, ctx)? {
            ContentValue::Photos(photos) => photos,
            other => return Err(mismatch(STANDARD_PHOTOS_LIST, key, "list of photos", other)),
        };

        let mut rendered = typed(STANDARD_PHOTOS_LIST);
        rendered.insert(
            "photos".into(),
            photos
                .iter()
                .map(|photo| {
                    json!({
                        "title": photo.title,
                        "photo_url": photo.photo_url,
                        "placeholder_url": photo.placeholder_url,
                    })
                })
                .collect(),
        );
        Ok(Some(rendered))
    }
}

impl Render for EmptyLabel {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let text = string_content(EMPTY_LABEL, &self.content_config.key, ctx)?;
        let mut rendered = typed(EMPTY_LABEL);
        rendered.insert("text".into(), Value::String(text));
        Ok(Some(rendered))
    }
}

impl Render for EmptyTitleSubtitleLabels {
    fn render(&self, ctx: &ViewContext) -> RenderResult<Option<RenderedView>> {
        let config = &self.content_config;
        if !condition_met(config.condition.as_ref(), EMPTY_TITLE_SUBTITLE_LABELS, ctx)? {
            return Ok(None);
        }

        let mut rendered = typed(EMPTY_TITLE_SUBTITLE_LABELS);
        rendered.insert(
            "title".into(),
            Value::String(string_content(EMPTY_TITLE_SUBTITLE_LABELS, &config.title_key, ctx)?),
        );
        rendered.insert(
            "text".into(),
            Value::String(string_content(
                EMPTY_TITLE_SUBTITLE_LABELS,
                &config.empty_state_text_key,
                ctx,
            )?),
        );
        Ok(Some(rendered))
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn typed(view_type: &str) -> RenderedView {
    let mut rendered = Map::new();
    rendered.insert("type".into(), Value::String(view_type.to_string()));
    rendered
}

fn labels(view_type: &str, values: Vec<String>) -> RenderedView {
    let mut rendered = typed(view_type);
    rendered.insert(
        "values".into(),
        Value::Array(values.into_iter().map(Value::String).collect()),
    );
    rendered
}

/// Render children in order, dropping the ones that render to nothing
fn render_children(children: &[View], ctx: &ViewContext) -> RenderResult<Value> {
    let mut rendered = Vec::with_capacity(children.len());
    for child in children {
        if let Some(child) = child.render(ctx)? {
            rendered.push(Value::Object(child));
        }
    }
    Ok(Value::Array(rendered))
}

fn insert_slot(
    rendered: &mut RenderedView,
    field: &str,
    view: Option<&View>,
    ctx: &ViewContext,
) -> RenderResult<()> {
    if let Some(view) = view {
        if let Some(child) = view.render(ctx)? {
            rendered.insert(field.to_string(), Value::Object(child));
        }
    }
    Ok(())
}

fn condition_met(
    condition: Option<&ViewCondition>,
    view_type: &str,
    ctx: &ViewContext,
) -> RenderResult<bool> {
    let met = evaluate_optional(condition, view_type, ctx)?;
    if !met {
        tracing::debug!(view_type, "condition not met, skipping view");
    }
    Ok(met)
}

fn content<'c>(view_type: &str, key: &str, ctx: &'c ViewContext) -> RenderResult<&'c ContentValue> {
    if key.is_empty() {
        return Err(RenderError::ContentKeyNotSpecified {
            view_type: view_type.to_string(),
        });
    }
    ctx.get(key).ok_or_else(|| RenderError::ContentNotFound {
        view_type: view_type.to_string(),
        key: key.to_string(),
    })
}

fn string_content(view_type: &str, key: &str, ctx: &ViewContext) -> RenderResult<String> {
    match content(view_type, key, ctx)? {
        ContentValue::String(value) => Ok(value.clone()),
        other => Err(mismatch(view_type, key, "string", other)),
    }
}

fn mismatch(view_type: &str, key: &str, expected: &str, found: &ContentValue) -> RenderError {
    RenderError::TypeMismatch {
        view_type: view_type.to_string(),
        key: key.to_string(),
        expected: expected.to_string(),
        found: found.shape_name().to_string(),
    }
}
