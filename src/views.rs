use serde::Serialize;

use crate::condition::ViewCondition;

/// Namespace prefixed to every visit review discriminant
pub const NAMESPACE: &str = "d_visit_review";

pub const SECTIONS_LIST: &str = "d_visit_review:sections_list";
pub const STANDARD_SECTION: &str = "d_visit_review:standard_section";
pub const STANDARD_SUBSECTION: &str = "d_visit_review:standard_subsection";
pub const STANDARD_PHOTO_SECTION: &str = "d_visit_review:standard_photo_section";
pub const STANDARD_PHOTO_SUBSECTION: &str = "d_visit_review:standard_photo_subsection";
pub const STANDARD_ONE_COLUMN_ROW: &str = "d_visit_review:standard_one_column_row";
pub const STANDARD_TWO_COLUMN_ROW: &str = "d_visit_review:standard_two_column_row";
pub const DIVIDED_VIEWS_LIST: &str = "d_visit_review:divided_views_list";
pub const ALERT_LABELS_LIST: &str = "d_visit_review:alert_labels_list";
pub const TITLE_LABELS_LIST: &str = "d_visit_review:title_labels_list";
pub const CONTENT_LABELS_LIST: &str = "d_visit_review:content_labels_list";
pub const CHECK_X_ITEMS_LIST: &str = "d_visit_review:check_x_items_list";
pub const TITLE_SUBTITLE_SUBITEMS_DIVIDED_ITEMS_LIST: &str =
    "d_visit_review:title_subtitle_subitems_divided_items_list";
pub const TITLE_SUBTITLE_LABELS: &str = "d_visit_review:title_subtitle_labels";
pub const STANDARD_PHOTOS_LIST: &str = "d_visit_review:standard_photos_list";
pub const EMPTY_LABEL: &str = "d_visit_review:empty_label";
pub const EMPTY_TITLE_SUBTITLE_LABELS: &str = "d_visit_review:empty_title_subtitle_labels";

/// Every discriminant the visit review layout understands
pub const VISIT_REVIEW_VIEW_TYPES: &[&str] = &[
    SECTIONS_LIST,
    STANDARD_SECTION,
    STANDARD_SUBSECTION,
    STANDARD_PHOTO_SECTION,
    STANDARD_PHOTO_SUBSECTION,
    STANDARD_ONE_COLUMN_ROW,
    STANDARD_TWO_COLUMN_ROW,
    DIVIDED_VIEWS_LIST,
    ALERT_LABELS_LIST,
    TITLE_LABELS_LIST,
    CONTENT_LABELS_LIST,
    CHECK_X_ITEMS_LIST,
    TITLE_SUBTITLE_SUBITEMS_DIVIDED_ITEMS_LIST,
    TITLE_SUBTITLE_LABELS,
    STANDARD_PHOTOS_LIST,
    EMPTY_LABEL,
    EMPTY_TITLE_SUBTITLE_LABELS,
];

/// A node of a decoded visit review template.
///
/// Serializes back to the raw template form, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum View {
    #[serde(rename = "d_visit_review:sections_list")]
    SectionList(SectionList),
    #[serde(rename = "d_visit_review:standard_section")]
    StandardSection(StandardSection),
    #[serde(rename = "d_visit_review:standard_subsection")]
    StandardSubsection(StandardSubsection),
    #[serde(rename = "d_visit_review:standard_photo_section")]
    PhotoSection(PhotoSection),
    #[serde(rename = "d_visit_review:standard_photo_subsection")]
    PhotoSubsection(PhotoSubsection),
    #[serde(rename = "d_visit_review:standard_one_column_row")]
    OneColumnRow(OneColumnRow),
    #[serde(rename = "d_visit_review:standard_two_column_row")]
    TwoColumnRow(TwoColumnRow),
    #[serde(rename = "d_visit_review:divided_views_list")]
    DividedViewsList(DividedViewsList),
    #[serde(rename = "d_visit_review:alert_labels_list")]
    AlertLabelsList(AlertLabelsList),
    #[serde(rename = "d_visit_review:title_labels_list")]
    TitleLabelsList(TitleLabelsList),
    #[serde(rename = "d_visit_review:content_labels_list")]
    ContentLabelsList(ContentLabelsList),
    #[serde(rename = "d_visit_review:check_x_items_list")]
    CheckXItemsList(CheckXItemsList),
    #[serde(rename = "d_visit_review:title_subtitle_subitems_divided_items_list")]
    TitleSubtitleSubItemsList(TitleSubtitleSubItemsList),
    #[serde(rename = "d_visit_review:title_subtitle_labels")]
    TitleSubtitleLabels(TitleSubtitleLabels),
    #[serde(rename = "d_visit_review:standard_photos_list")]
    PhotosList(PhotosList),
    #[serde(rename = "d_visit_review:empty_label")]
    EmptyLabel(EmptyLabel),
    #[serde(rename = "d_visit_review:empty_title_subtitle_labels")]
    EmptyTitleSubtitleLabels(EmptyTitleSubtitleLabels),
}

impl View {
    /// The namespaced discriminant of this node
    pub fn type_name(&self) -> &'static str {
        match self {
            View::SectionList(_) => SECTIONS_LIST,
            View::StandardSection(_) => STANDARD_SECTION,
            View::StandardSubsection(_) => STANDARD_SUBSECTION,
            View::PhotoSection(_) => STANDARD_PHOTO_SECTION,
            View::PhotoSubsection(_) => STANDARD_PHOTO_SUBSECTION,
            View::OneColumnRow(_) => STANDARD_ONE_COLUMN_ROW,
            View::TwoColumnRow(_) => STANDARD_TWO_COLUMN_ROW,
            View::DividedViewsList(_) => DIVIDED_VIEWS_LIST,
            View::AlertLabelsList(_) => ALERT_LABELS_LIST,
            View::TitleLabelsList(_) => TITLE_LABELS_LIST,
            View::ContentLabelsList(_) => CONTENT_LABELS_LIST,
            View::CheckXItemsList(_) => CHECK_X_ITEMS_LIST,
            View::TitleSubtitleSubItemsList(_) => TITLE_SUBTITLE_SUBITEMS_DIVIDED_ITEMS_LIST,
            View::TitleSubtitleLabels(_) => TITLE_SUBTITLE_LABELS,
            View::PhotosList(_) => STANDARD_PHOTOS_LIST,
            View::EmptyLabel(_) => EMPTY_LABEL,
            View::EmptyTitleSubtitleLabels(_) => EMPTY_TITLE_SUBTITLE_LABELS,
        }
    }

    /// Direct children in declaration order
    pub fn children(&self) -> Vec<&View> {
        match self {
            View::SectionList(v) => v.sections.iter().collect(),
            View::StandardSection(v) => v.subsections.iter().collect(),
            View::StandardSubsection(v) => v.rows.iter().collect(),
            View::PhotoSection(v) => v.subsections.iter().collect(),
            View::PhotoSubsection(v) => v.view.iter().map(|b| b.as_ref()).collect(),
            View::OneColumnRow(v) => v.view.iter().map(|b| b.as_ref()).collect(),
            View::TwoColumnRow(v) => v
                .left_view
                .iter()
                .chain(v.right_view.iter())
                .map(|b| b.as_ref())
                .collect(),
            View::DividedViewsList(v) => v.views.iter().collect(),
            View::AlertLabelsList(_)
            | View::TitleLabelsList(_)
            | View::ContentLabelsList(_)
            | View::CheckXItemsList(_)
            | View::TitleSubtitleSubItemsList(_)
            | View::TitleSubtitleLabels(_)
            | View::PhotosList(_)
            | View::EmptyLabel(_)
            | View::EmptyTitleSubtitleLabels(_) => Vec::new(),
        }
    }
}

// ─── Content configuration ───────────────────────────────────────────────────

/// Binds a leaf view to one context key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentConfig {
    pub key: String,
}

impl ContentConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Optional gate for a container node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConditionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ViewCondition>,
}

impl ConditionConfig {
    pub fn is_empty(&self) -> bool {
        self.condition.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TitleSubtitleContentConfig {
    pub title_key: String,
    pub subtitle_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ViewCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmptyTitleSubtitleContentConfig {
    pub title_key: String,
    pub empty_state_text_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ViewCondition>,
}

// ─── Containers ──────────────────────────────────────────────────────────────

/// Root of every visit review layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionList {
    pub sections: Vec<View>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandardSection {
    pub title: String,
    pub subsections: Vec<View>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandardSubsection {
    pub title: String,
    pub rows: Vec<View>,
    #[serde(skip_serializing_if = "ConditionConfig::is_empty")]
    pub content_config: ConditionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoSection {
    pub title: String,
    pub subsections: Vec<View>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoSubsection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<Box<View>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OneColumnRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<Box<View>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TwoColumnRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_view: Option<Box<View>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_view: Option<Box<View>>,
    #[serde(skip_serializing_if = "ConditionConfig::is_empty")]
    pub content_config: ConditionConfig,
}

/// Children rendered with a divider between them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DividedViewsList {
    pub views: Vec<View>,
}

// ─── Leaves ──────────────────────────────────────────────────────────────────

/// Accepts only a list of strings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertLabelsList {
    pub content_config: ContentConfig,
}

/// Accepts a string or a list of strings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TitleLabelsList {
    pub content_config: ContentConfig,
}

/// Accepts a string, a list of strings, checked items (checked values only) or
/// title/subtitle/subitems (titles only)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentLabelsList {
    pub content_config: ContentConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckXItemsList {
    pub content_config: ContentConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TitleSubtitleSubItemsList {
    pub content_config: ContentConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TitleSubtitleLabels {
    pub content_config: TitleSubtitleContentConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotosList {
    pub content_config: ContentConfig,
}

/// Placeholder text shown when a section has nothing to display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmptyLabel {
    pub content_config: ContentConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmptyTitleSubtitleLabels {
    pub content_config: EmptyTitleSubtitleContentConfig,
}
