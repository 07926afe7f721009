//! Story document assembly.
//!
//! One document per event story: a pandoc title block followed by one
//! heading and rendered fragment per chapter.

use crate::escape::push_escaped;
use crate::render::DIVIDER;

/// A markdown document being assembled for one story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDocument {
    markdown: String,
    chapters: usize,
}

impl StoryDocument {
    /// Starts a document whose pandoc title is `title`.
    #[must_use]
    pub fn new(title: &str) -> Self {
        let mut markdown = String::from("% ");
        push_escaped(&mut markdown, title);
        markdown.push_str("\n\n");
        Self {
            markdown,
            chapters: 0,
        }
    }

    /// Appends a chapter: a `# {caption} - {title}` heading, a divider, and
    /// the chapter's rendered fragment.
    ///
    /// The caption is inserted verbatim; only the title is escaped.
    pub fn push_chapter(&mut self, caption: &str, title: &str, fragment: &str) {
        self.markdown.push_str("# ");
        self.markdown.push_str(caption);
        self.markdown.push_str(" - ");
        push_escaped(&mut self.markdown, title);
        self.markdown.push_str("\n\n");
        self.markdown.push_str(DIVIDER);
        self.markdown.push_str(fragment);
        self.chapters += 1;
    }

    /// Number of chapters pushed so far.
    #[must_use]
    pub const fn chapter_count(&self) -> usize {
        self.chapters
    }

    /// The document so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.markdown
    }

    /// Consumes the document, returning its markdown.
    #[must_use]
    pub fn into_markdown(self) -> String {
        self.markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_block_escaped() {
        let doc = StoryDocument::new("Sakura*Blooming Party!");
        assert_eq!(doc.as_str(), "% Sakura\\*Blooming Party!\n\n");
        assert_eq!(doc.chapter_count(), 0);
    }

    #[test]
    fn test_chapters_appended_in_order() {
        let mut doc = StoryDocument::new("Event");
        doc.push_chapter("Opening", "Spring (again)", "**Kasumi:** Hi\n\n");
        doc.push_chapter("Chapter 1", "Go", "");
        assert_eq!(doc.chapter_count(), 2);
        assert_eq!(
            doc.into_markdown(),
            "% Event\n\n\
             # Opening - Spring \\(again\\)\n\n---\n\n**Kasumi:** Hi\n\n\
             # Chapter 1 - Go\n\n---\n\n"
        );
    }

    #[test]
    fn test_caption_is_verbatim() {
        let mut doc = StoryDocument::new("E");
        doc.push_chapter("*Ending*", "t", "");
        assert!(doc.as_str().contains("# *Ending* - t"));
    }
}
