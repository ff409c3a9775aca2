use crate::config::{POSTMETA_TABLE, POSTS_TABLE};
use crate::error::DumpError;

pub const POST_COLUMNS: &[&str] = &[
    "ID",
    "post_author",
    "post_date",
    "post_date_gmt",
    "post_content",
    "post_title",
    "post_excerpt",
    "post_status",
    "comment_status",
    "ping_status",
    "post_password",
    "post_name",
    "to_ping",
    "pinged",
    "post_modified",
    "post_modified_gmt",
    "post_content_filtered",
    "post_parent",
    "guid",
    "menu_order",
    "post_type",
    "post_mime_type",
    "comment_count",
];

pub const POSTMETA_COLUMNS: &[&str] = &["meta_id", "post_id", "meta_key", "meta_value"];

/// A record kind with a fixed, ordered column schema.
///
/// Fields are raw dump text. Implementors only ever hold exactly
/// `COLUMNS.len()` fields; [`Table::assemble`] is the checked way in.
pub trait Table: Sized {
    const NAME: &'static str;
    const COLUMNS: &'static [&'static str];

    fn from_fields_unchecked(fields: Vec<String>) -> Self;

    fn fields(&self) -> &[String];

    /// Zips scanned fields with the schema, rejecting any arity mismatch.
    fn assemble(fields: Vec<String>) -> Result<Self, DumpError> {
        if fields.len() != Self::COLUMNS.len() {
            return Err(DumpError::SchemaMismatch {
                expected: Self::COLUMNS.len(),
                actual: fields.len(),
            });
        }
        Ok(Self::from_fields_unchecked(fields))
    }

    /// True for `NAME` itself and for the same table under another prefix,
    /// e.g. `blog_postmeta` or `my-site_postmeta` for `wp_postmeta`.
    fn accepts_table(table: &str) -> bool {
        if table.eq_ignore_ascii_case(Self::NAME) {
            return true;
        }
        let base = Self::NAME.split_once('_').map_or(Self::NAME, |(_, b)| b);
        let table = table.to_ascii_lowercase();
        table
            .strip_suffix(base)
            .is_some_and(|prefix| prefix.ends_with('_'))
    }

    fn get(&self, column: &str) -> Option<&str> {
        Self::COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.fields()[i].as_str())
    }
}

/// One `wp_posts` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    fields: Vec<String>,
}

impl PostRecord {
    const ID: usize = 0;
    const AUTHOR: usize = 1;

    pub fn id(&self) -> &str {
        &self.fields[Self::ID]
    }

    pub fn post_author(&self) -> &str {
        &self.fields[Self::AUTHOR]
    }
}

impl Table for PostRecord {
    const NAME: &'static str = POSTS_TABLE;
    const COLUMNS: &'static [&'static str] = POST_COLUMNS;

    fn from_fields_unchecked(fields: Vec<String>) -> Self {
        Self { fields }
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// One `wp_postmeta` row. `post_id` may dangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetaRecord {
    fields: Vec<String>,
}

impl PostMetaRecord {
    const POST_ID: usize = 1;

    pub fn post_id(&self) -> &str {
        &self.fields[Self::POST_ID]
    }
}

impl Table for PostMetaRecord {
    const NAME: &'static str = POSTMETA_TABLE;
    const COLUMNS: &'static [&'static str] = POSTMETA_COLUMNS;

    fn from_fields_unchecked(fields: Vec<String>) -> Self {
        Self { fields }
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }
}
