//! Field extraction for listing fragments and post documents
//!
//! Extraction happens in two steps:
//! - `PostSummary::from_fragment` reads the required fields of a listing card
//!   (title, category, image, link, date). Any missing element fails the post.
//! - `PostSummary::into_record` adds the optional post-document fields
//!   (content, tags, comment count, comments), falling back to the sentinel
//!   defaults in [`crate::record`].
//!
//! `PostDocument` accessors return `None` when a section is structurally
//! absent; the defaults are applied in `into_record` only.

use crate::record::{Record, ANONYMOUS_AUTHOR, DEFAULT_COMMENT_COUNT, NO_COMMENTS, NO_TAGS};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Selector for one post summary card on a listing page
///
/// Matches the exact class attribute, so cards with extra or reordered
/// classes are not post summaries.
pub const POST_SUMMARY_SELECTOR: &str = r#"div[class="overlay card"]"#;

/// Errors raised when an expected element is missing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Required fields of a listing card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub title: String,
    pub category: String,
    pub image: String,
    /// Post href as published; resolved against the base URL when fetched
    pub link: String,
    pub date: String,
}

impl PostSummary {
    /// Reads the required fields from a listing card
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::MissingField` naming the first field whose
    /// element (or attribute) is absent.
    pub fn from_fragment(fragment: ElementRef<'_>) -> Result<Self, ExtractionError> {
        let title =
            text_of(fragment, "h3.card-title").ok_or(ExtractionError::MissingField("title"))?;
        let category =
            text_of(fragment, "span.cat").ok_or(ExtractionError::MissingField("category"))?;
        let image = attr_of(fragment, "img.wp-post-image", "src")
            .ok_or(ExtractionError::MissingField("image"))?;
        let link = attr_of(fragment, "a.stretched-link", "href")
            .ok_or(ExtractionError::MissingField("link"))?;
        let date = text_of(fragment, r#"small[class="text-muted time"]"#)
            .ok_or(ExtractionError::MissingField("date"))?;

        Ok(Self {
            title,
            category,
            image,
            link,
            date,
        })
    }

    /// Completes the record with the post document's fields
    pub fn into_record(self, document: &PostDocument) -> Record {
        let content = document
            .content_paragraphs()
            .map(|paragraphs| paragraphs.join("\n"))
            .unwrap_or_default();

        let tags = document
            .tags()
            .filter(|tags| !tags.is_empty())
            .map(|tags| tags.join(", "))
            .unwrap_or_else(|| NO_TAGS.to_string());

        let comment_count = document
            .comment_count()
            .unwrap_or_else(|| DEFAULT_COMMENT_COUNT.to_string());

        let comments = document
            .comments()
            .filter(|comments| !comments.is_empty())
            .map(|comments| {
                comments
                    .iter()
                    .map(Comment::render)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_else(|| NO_COMMENTS.to_string());

        Record {
            title: self.title,
            category: self.category,
            date: self.date,
            content,
            link: self.link,
            image: self.image,
            tags,
            comment_count,
            comments,
        }
    }
}

/// One reader comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Author marker text, if the comment has one
    pub author: Option<String>,

    /// Comment body text with the author name removed
    pub text: String,
}

impl Comment {
    /// Reads a comment from its `div.comment-body` element
    ///
    /// The site repeats the author's name inside the body, so the first
    /// occurrence of the name is cut from the text. Only that one occurrence
    /// is removed, even if the name appears again later.
    fn from_body(body: ElementRef<'_>) -> Self {
        let author = text_of(body, "span.comment-author")
            .or_else(|| text_of(body, "div.comment-author"));

        let full_text = collect_text(body);
        let text = match &author {
            Some(name) => full_text.replacen(name.as_str(), "", 1).trim().to_string(),
            None => full_text,
        };

        Self { author, text }
    }

    /// Formats the comment as `name: text`
    pub fn render(&self) -> String {
        format!(
            "{}: {}",
            self.author.as_deref().unwrap_or(ANONYMOUS_AUTHOR),
            self.text
        )
    }
}

/// A parsed post page
#[derive(Debug)]
pub struct PostDocument {
    html: Html,
}

impl PostDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Trimmed texts of every paragraph in the article body
    ///
    /// `None` when the page has no `div.article-content`.
    pub fn content_paragraphs(&self) -> Option<Vec<String>> {
        let container = select_first(self.root(), "div.article-content")?;
        Some(
            select_all(container, "p")
                .into_iter()
                .map(collect_text)
                .collect(),
        )
    }

    /// Trimmed tag labels
    ///
    /// `None` when the page has no `section.box-tags`; may be empty when the
    /// section lists no tags.
    pub fn tags(&self) -> Option<Vec<String>> {
        let section = select_first(self.root(), "section.box-tags")?;
        Some(
            select_all(section, "a.tag_post_tag")
                .into_iter()
                .map(collect_text)
                .collect(),
        )
    }

    /// Comment counter text as displayed
    pub fn comment_count(&self) -> Option<String> {
        text_of(self.root(), "span.comments-count-number")
    }

    /// Comments in page order
    ///
    /// `None` when the page has no `div.comments` or it holds no
    /// `ul.comment-list`. Comment items without a `div.comment-body` are
    /// skipped.
    pub fn comments(&self) -> Option<Vec<Comment>> {
        let section = select_first(self.root(), "div.comments")?;
        let list = select_first(section, "ul.comment-list")?;
        Some(
            select_all(list, "li.comment")
                .into_iter()
                .filter_map(|item| select_first(item, "div.comment-body"))
                .map(Comment::from_body)
                .collect(),
        )
    }
}

/// Extracts one record from a listing card and its post document
///
/// Pure: the same inputs always produce the same record.
pub fn extract(
    fragment: ElementRef<'_>,
    document: &PostDocument,
) -> Result<Record, ExtractionError> {
    Ok(PostSummary::from_fragment(fragment)?.into_record(document))
}

/// Parses a listing page into one summary result per card, in page order
///
/// An empty vector means the page held no cards.
pub fn parse_listing(html: &str) -> Vec<Result<PostSummary, ExtractionError>> {
    let document = Html::parse_document(html);
    select_all(document.root_element(), POST_SUMMARY_SELECTOR)
        .into_iter()
        .map(PostSummary::from_fragment)
        .collect()
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Trimmed text of the first element matching `css`
fn text_of(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(scope, css).map(collect_text)
}

/// Value of `attr` on the first element matching `css`
fn attr_of(scope: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    select_first(scope, css)?
        .value()
        .attr(attr)
        .map(|value| value.to_string())
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
