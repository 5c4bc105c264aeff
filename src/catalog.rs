use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::decoder::{self, NodeFields};
use crate::error::{DecodeError, DecodeResult};
use crate::views::{self, View};

/// Builds a typed view from the fields of one raw template node
pub type ViewConstructor = fn(&NodeFields<'_>) -> DecodeResult<View>;

/// Built-in constructors, one per visit review discriminant
const VISIT_REVIEW_CONSTRUCTORS: &[(&str, ViewConstructor)] = &[
    (views::SECTIONS_LIST, decoder::decode_section_list_node),
    (views::STANDARD_SECTION, decoder::decode_standard_section_node),
    (views::STANDARD_SUBSECTION, decoder::decode_standard_subsection_node),
    (views::STANDARD_PHOTO_SECTION, decoder::decode_photo_section_node),
    (views::STANDARD_PHOTO_SUBSECTION, decoder::decode_photo_subsection_node),
    (views::STANDARD_ONE_COLUMN_ROW, decoder::decode_one_column_row_node),
    (views::STANDARD_TWO_COLUMN_ROW, decoder::decode_two_column_row_node),
    (views::DIVIDED_VIEWS_LIST, decoder::decode_divided_views_list_node),
    (views::ALERT_LABELS_LIST, decoder::decode_alert_labels_list_node),
    (views::TITLE_LABELS_LIST, decoder::decode_title_labels_list_node),
    (views::CONTENT_LABELS_LIST, decoder::decode_content_labels_list_node),
    (views::CHECK_X_ITEMS_LIST, decoder::decode_check_x_items_list_node),
    (
        views::TITLE_SUBTITLE_SUBITEMS_DIVIDED_ITEMS_LIST,
        decoder::decode_title_subtitle_subitems_list_node,
    ),
    (views::TITLE_SUBTITLE_LABELS, decoder::decode_title_subtitle_labels_node),
    (views::STANDARD_PHOTOS_LIST, decoder::decode_photos_list_node),
    (views::EMPTY_LABEL, decoder::decode_empty_label_node),
    (
        views::EMPTY_TITLE_SUBTITLE_LABELS,
        decoder::decode_empty_title_subtitle_labels_node,
    ),
];

/// Registry mapping a discriminant to the constructor of its view.
///
/// Built once at startup and then only read. Decoders borrow it, so it can be
/// shared freely across threads after construction.
#[derive(Clone, Default)]
pub struct TypeCatalog {
    constructors: HashMap<String, ViewConstructor>,
}

impl fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("view_types", &self.discriminants())
            .finish()
    }
}

impl TypeCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding every visit review view
    pub fn with_visit_review_views() -> Self {
        let constructors = VISIT_REVIEW_CONSTRUCTORS
            .iter()
            .map(|(view_type, constructor)| (view_type.to_string(), *constructor))
            .collect();
        Self { constructors }
    }

    /// Register a new discriminant. Fails if it is malformed or already registered.
    pub fn register(
        &mut self,
        view_type: &str,
        constructor: ViewConstructor,
    ) -> DecodeResult<&mut Self> {
        validate_discriminant(view_type)?;
        if self.constructors.contains_key(view_type) {
            return Err(DecodeError::DuplicateViewType {
                view_type: view_type.to_string(),
            });
        }
        tracing::debug!(view_type, "registered view type");
        self.constructors.insert(view_type.to_string(), constructor);
        Ok(self)
    }

    /// Register a discriminant, replacing any existing constructor.
    ///
    /// Returns the constructor that was replaced, if any.
    pub fn register_override(
        &mut self,
        view_type: &str,
        constructor: ViewConstructor,
    ) -> DecodeResult<Option<ViewConstructor>> {
        validate_discriminant(view_type)?;
        let previous = self.constructors.insert(view_type.to_string(), constructor);
        if previous.is_some() {
            tracing::warn!(view_type, "overrode registered view type");
        } else {
            tracing::debug!(view_type, "registered view type");
        }
        Ok(previous)
    }

    pub fn lookup(&self, view_type: &str) -> Option<ViewConstructor> {
        self.constructors.get(view_type).copied()
    }

    pub fn contains(&self, view_type: &str) -> bool {
        self.constructors.contains_key(view_type)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Registered discriminants, sorted
    pub fn discriminants(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Process-wide visit review catalog, built on first use
pub fn default_catalog() -> &'static TypeCatalog {
    static CATALOG: OnceLock<TypeCatalog> = OnceLock::new();
    CATALOG.get_or_init(TypeCatalog::with_visit_review_views)
}

/// Discriminants look like `namespace:name`, lowercase snake case on both sides
pub fn validate_discriminant(view_type: &str) -> DecodeResult<()> {
    static DISCRIMINANT_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = DISCRIMINANT_REGEX
        .get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*:[a-z][a-z0-9_]*$").unwrap());

    if !re.is_match(view_type) {
        return Err(DecodeError::InvalidDiscriminant {
            view_type: view_type.to_string(),
        });
    }
    Ok(())
}
