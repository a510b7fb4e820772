use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::row::{CellValue, Row};

pub type CellFormatter = Arc<dyn Fn(&CellValue) -> String + Send + Sync>;
pub type RowPredicate = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeStyle {
    pub class: String,
    pub label: Option<String>,
}

impl BadgeStyle {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            label: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Rendering kind of a column. Badge keys are stored lower-cased.
#[derive(Clone, Default)]
pub enum ColumnKind {
    #[default]
    Text,
    Date,
    Currency,
    Badge(BTreeMap<String, BadgeStyle>),
    Custom(Option<CellFormatter>),
}

impl ColumnKind {
    pub fn custom(formatter: impl Fn(&CellValue) -> String + Send + Sync + 'static) -> Self {
        ColumnKind::Custom(Some(Arc::new(formatter)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Date => "date",
            ColumnKind::Currency => "currency",
            ColumnKind::Badge(_) => "badge",
            ColumnKind::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Debug for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Badge(styles) => f.debug_tuple("Badge").field(styles).finish(),
            ColumnKind::Custom(formatter) => f
                .debug_tuple("Custom")
                .field(&formatter.as_ref().map(|_| "<formatter>"))
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl PartialEq for ColumnKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ColumnKind::Text, ColumnKind::Text)
            | (ColumnKind::Date, ColumnKind::Date)
            | (ColumnKind::Currency, ColumnKind::Currency) => true,
            (ColumnKind::Badge(left), ColumnKind::Badge(right)) => left == right,
            (ColumnKind::Custom(left), ColumnKind::Custom(right)) => match (left, right) {
                (Some(left), Some(right)) => Arc::ptr_eq(left, right),
                (None, None) => true,
                _ => false,
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
    pub width: Option<String>,
    pub min_width: Option<String>,
    pub sortable: bool,
    pub searchable: bool,
    pub sticky: bool,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnKind::Text,
            width: None,
            min_width: None,
            sortable: false,
            searchable: true,
            sticky: false,
        }
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn date(self) -> Self {
        self.kind(ColumnKind::Date)
    }

    pub fn currency(self) -> Self {
        self.kind(ColumnKind::Currency)
    }

    /// Adds one badge mapping, switching the column to the badge kind if needed.
    pub fn badge(mut self, value: &str, style: BadgeStyle) -> Self {
        let mut styles = match std::mem::take(&mut self.kind) {
            ColumnKind::Badge(styles) => styles,
            _ => BTreeMap::new(),
        };
        styles.insert(value.to_lowercase(), style);
        self.kind = ColumnKind::Badge(styles);
        self
    }

    pub fn format_with(
        self,
        formatter: impl Fn(&CellValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.kind(ColumnKind::custom(formatter))
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn min_width(mut self, min_width: impl Into<String>) -> Self {
        self.min_width = Some(min_width.into());
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

#[derive(Clone)]
pub struct RowAction {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub color: Option<String>,
    pub visible: Option<RowPredicate>,
}

impl RowAction {
    pub fn new(key: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            icon: icon.into(),
            color: None,
            visible: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn(&Row) -> bool + Send + Sync + 'static) -> Self {
        self.visible = Some(Arc::new(predicate));
        self
    }

    pub fn is_visible(&self, row: &Row) -> bool {
        self.visible.as_ref().map_or(true, |predicate| predicate(row))
    }
}

impl std::fmt::Debug for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowAction")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("color", &self.color)
            .field("visible", &self.visible.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

impl PartialEq for RowAction {
    fn eq(&self, other: &Self) -> bool {
        let same_predicate = match (&self.visible, &other.visible) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        };
        self.key == other.key
            && self.label == other.label
            && self.icon == other.icon
            && self.color == other.color
            && same_predicate
    }
}
