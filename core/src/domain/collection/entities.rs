use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A collection declared against the store. The slug doubles as the table
/// name; localized field values live in a sibling `{slug}_locales` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionSchema {
    pub slug: String,
    /// When true the table carries `created_at`/`updated_at` columns.
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,
    pub fields: Vec<FlatField>,
}

fn default_timestamps() -> bool {
    true
}

/// A field flattened out of any presentational grouping. Groups remain
/// nested; their subfields map to prefixed columns (`group_subfield`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FlatField {
    pub name: String,
    #[serde(default)]
    pub localized: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Checkbox,
    Date,
    Json,
    Group { fields: Vec<FlatField> },
    Relationship { collection: String },
}

impl CollectionSchema {
    pub fn table_name(&self) -> &str {
        &self.slug
    }

    pub fn locales_table_name(&self) -> String {
        format!("{}_locales", self.slug)
    }

    pub fn has_created_at(&self) -> bool {
        self.timestamps
    }

    pub fn field(&self, name: &str) -> Option<&FlatField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_localized_fields(&self) -> bool {
        fn any_localized(fields: &[FlatField], parent_localized: bool) -> bool {
            fields.iter().any(|f| {
                let localized = parent_localized || f.localized;
                match &f.kind {
                    FieldKind::Group { fields } => any_localized(fields, localized),
                    _ => localized,
                }
            })
        }
        any_localized(&self.fields, false)
    }
}

impl FieldKind {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, FieldKind::Group { .. })
    }
}
