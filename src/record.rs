//! The article record written to the workbook
//!
//! A `Record` is only ever built whole: every field is present, with the
//! sentinel defaults below standing in for optional page sections.

/// Column headers, in the order cells are written
pub const COLUMN_HEADERS: [&str; 9] = [
    "Title",
    "Category",
    "Date",
    "Content",
    "Link",
    "Image",
    "Tags",
    "Number of Comments",
    "Comments",
];

/// Written when a post has no tags section or the section lists no tags
pub const NO_TAGS: &str = "No Tags";

/// Written when a post has no comment list or the list holds no comments
pub const NO_COMMENTS: &str = "No Comments";

/// Written when a post has no comment counter
pub const DEFAULT_COMMENT_COUNT: &str = "0";

/// Author name used when a comment carries no author marker
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// One scraped article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub category: String,
    /// Publication date exactly as displayed by the site
    pub date: String,
    /// Article paragraphs joined by newlines; empty when the page has no body
    pub content: String,
    pub link: String,
    pub image: String,
    /// Comma-joined tags or [`NO_TAGS`]
    pub tags: String,
    /// Comment counter text as displayed (no numeric parsing)
    pub comment_count: String,
    /// Newline-joined `name: text` pairs or [`NO_COMMENTS`]
    pub comments: String,
}

impl Record {
    /// Returns the record's cells in [`COLUMN_HEADERS`] order
    pub fn to_row(&self) -> [&str; 9] {
        [
            &self.title,
            &self.category,
            &self.date,
            &self.content,
            &self.link,
            &self.image,
            &self.tags,
            &self.comment_count,
            &self.comments,
        ]
    }

    /// Rebuilds a record from a stored row
    ///
    /// Missing trailing cells are read as empty strings.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        Self {
            title: cell(0),
            category: cell(1),
            date: cell(2),
            content: cell(3),
            link: cell(4),
            image: cell(5),
            tags: cell(6),
            comment_count: cell(7),
            comments: cell(8),
        }
    }
}
