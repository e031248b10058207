use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Snapshot of the author taken when the blog is created. Renaming the user later
/// does not touch existing blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub author: Author,
    pub created_at: String,
    pub updated_at: String,
}

impl Blog {
    #[must_use]
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author.id == user_id
    }
}

/// Fields of a blog about to be inserted. `slug` is already derived from `title`.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub author: Author,
}

/// Partial update. `None` leaves the stored field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl BlogChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.cover_image_url.is_none()
            && self.tags.is_none()
    }
}

/// Tags as clients send them: either a JSON array or a single comma-delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Delimited(String),
}

impl TagsInput {
    #[must_use]
    pub fn into_tags(self) -> Vec<String> {
        match self {
            Self::List(tags) => normalize_tags(tags),
            Self::Delimited(raw) => normalize_tags(raw.split(',').map(str::to_string)),
        }
    }
}

/// Trims each tag, drops empty ones and removes duplicates, keeping first-seen order.
pub fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Derives the URL slug for a title: non-ASCII letters are transliterated, then every
/// run of characters other than lowercase ASCII letters and digits collapses to a
/// single `-`. Apostrophes are dropped so "Don't Panic" becomes `dont-panic`. May
/// return an empty string.
#[must_use]
pub fn slugify(title: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));

    let without_apostrophes: String = title
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect();

    let lowered: String = deunicode::deunicode(&without_apostrophes)
        .chars()
        .filter(|c| *c != '\'')
        .flat_map(char::to_lowercase)
        .collect();

    re.replace_all(&lowered, "-").trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("Rust 2024: What's New?"), "rust-2024-whats-new");
        assert_eq!(slugify("Don’t Panic"), "dont-panic");
        assert_eq!(slugify("--already-slugged--"), "already-slugged");
    }

    #[test]
    fn test_slugify_is_url_safe() {
        for title in ["Tabs\tand\nnewlines", "Ünïcödé Tïtle", "a/b?c=d&e#f", "C++ & Rust"] {
            let slug = slugify(title);
            assert!(!slug.chars().any(char::is_whitespace), "{slug}");
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "{slug}"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug}");
        }
    }

    #[test]
    fn test_slugify_transliterates_accents() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("Über Rust"), "uber-rust");
        assert_eq!(slugify("Ünïcödé Tïtle"), "unicode-title");
        assert_ne!(slugify("Café"), slugify("Caf"));
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Same Title"), slugify("Same Title"));
        assert_eq!(slugify("Same Title"), slugify("same title"));
    }

    #[test]
    fn test_slugify_without_alphanumerics_is_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(" - / - "), "");
    }

    #[test]
    fn test_tags_from_delimited_string() {
        let tags = TagsInput::Delimited(" rust, web ,,axum, rust ".to_string()).into_tags();
        assert_eq!(tags, vec!["rust", "web", "axum"]);
    }

    #[test]
    fn test_tags_from_list() {
        let tags = TagsInput::List(vec!["a".into(), " b ".into(), String::new()]).into_tags();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_tags_input_deserializes_both_shapes() {
        let list: TagsInput = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert_eq!(list, TagsInput::List(vec!["x".into(), "y".into()]));

        let csv: TagsInput = serde_json::from_str(r#""x, y""#).unwrap();
        assert_eq!(csv.into_tags(), vec!["x", "y"]);
    }

    #[test]
    fn test_blog_changes_is_empty() {
        assert!(BlogChanges::default().is_empty());
        let changes = BlogChanges {
            tags: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
