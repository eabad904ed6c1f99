//! README parsing and structural metrics.
//!
//! The README is parsed with `pulldown-cmark` (GitHub-flavored extensions enabled)
//! and folded into a small [`MarkdownNode`] tree. The tree is then walked once to
//! produce [`ReadmeMetrics`]: which essential sections have a heading, and how many
//! code blocks and links the document carries.

use pulldown_cmark::{Event, Options, Parser, Tag};
use std::collections::BTreeMap;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Node types the metrics care about. Everything else is [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Heading,
    Code,
    Link,
    Text,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownNode {
    pub kind: NodeKind,
    pub value: Option<String>,
    pub children: Vec<Self>,
}

impl MarkdownNode {
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            value: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(kind: NodeKind, children: Vec<Self>) -> Self {
        Self {
            kind,
            value: None,
            children,
        }
    }

    /// Concatenated text of this node and all its descendants.
    #[must_use]
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = &self.value {
            out.push_str(value);
        }

        for child in &self.children {
            child.collect_text(out);
        }
    }
}

/// Parse Markdown text into a tree rooted at a [`NodeKind::Root`] node.
#[must_use]
pub fn parse_markdown(text: &str) -> MarkdownNode {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;

    let mut stack = vec![MarkdownNode::new(NodeKind::Root)];

    for event in Parser::new_ext(text, options) {
        match event {
            Event::Start(tag) => stack.push(MarkdownNode::new(kind_of(&tag))),
            Event::End(_) => {
                // the root is never closed by an End event
                if stack.len() > 1
                    && let Some(node) = stack.pop()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(node);
                }
            }
            Event::Text(value) | Event::Code(value) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(MarkdownNode::text(value.into_string()));
                }
            }
            _ => {}
        }
    }

    // fold any unterminated nodes back into the root
    while stack.len() > 1
        && let Some(node) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.children.push(node);
    }

    stack.pop().unwrap_or_else(|| MarkdownNode::new(NodeKind::Root))
}

const fn kind_of(tag: &Tag<'_>) -> NodeKind {
    match tag {
        Tag::Heading { .. } => NodeKind::Heading,
        Tag::CodeBlock(_) => NodeKind::Code,
        Tag::Link { .. } => NodeKind::Link,
        _ => NodeKind::Other,
    }
}

/// Sections a newcomer-friendly README is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum SectionName {
    Introduction,
    GettingStarted,
    Installation,
    Usage,
    Contributing,
    License,
    Deployment,
    Versioning,
}

impl SectionName {
    /// Lower-case phrase looked for in heading text.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::GettingStarted => "getting started",
            Self::Installation => "installation",
            Self::Usage => "usage",
            Self::Contributing => "contributing",
            Self::License => "license",
            Self::Deployment => "deployment",
            Self::Versioning => "versioning",
        }
    }

    #[must_use]
    pub fn count() -> usize {
        Self::iter().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeMetrics {
    pub essential_sections: BTreeMap<SectionName, bool>,
    pub code_block_count: u64,
    pub link_count: u64,
}

impl Default for ReadmeMetrics {
    fn default() -> Self {
        Self {
            essential_sections: SectionName::iter().map(|s| (s, false)).collect(),
            code_block_count: 0,
            link_count: 0,
        }
    }
}

impl ReadmeMetrics {
    /// Walk a parsed README and collect its metrics.
    #[must_use]
    pub fn from_tree(root: &MarkdownNode) -> Self {
        let mut metrics = Self::default();
        metrics.visit(root);
        metrics
    }

    /// Parse README text and collect its metrics.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_tree(&parse_markdown(text))
    }

    #[must_use]
    pub fn sections_present(&self) -> usize {
        self.essential_sections.values().filter(|present| **present).count()
    }

    fn visit(&mut self, node: &MarkdownNode) {
        match node.kind {
            NodeKind::Heading => {
                let title = node.flatten_text().to_lowercase();
                for (section, present) in &mut self.essential_sections {
                    if title.contains(section.keyword()) {
                        *present = true;
                    }
                }
            }
            NodeKind::Code => self.code_block_count += 1,
            NodeKind::Link => self.link_count += 1,
            NodeKind::Root | NodeKind::Text | NodeKind::Other => {}
        }

        for child in &node.children {
            self.visit(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(title: &str) -> MarkdownNode {
        MarkdownNode::with_children(NodeKind::Heading, vec![MarkdownNode::text(title)])
    }

    #[test]
    fn test_all_sections_detected_from_tree() {
        let root = MarkdownNode::with_children(
            NodeKind::Root,
            vec![
                heading("Introduction"),
                heading("Getting Started"),
                heading("Installation"),
                heading("Usage"),
                heading("Contributing"),
                heading("License"),
                heading("Deployment"),
                heading("Versioning"),
            ],
        );

        let metrics = ReadmeMetrics::from_tree(&root);
        assert_eq!(metrics.sections_present(), 8);
        assert!(metrics.essential_sections.values().all(|present| *present));
    }

    #[test]
    fn test_counts_code_blocks_and_links() {
        let root = MarkdownNode::with_children(
            NodeKind::Root,
            vec![
                MarkdownNode::with_children(NodeKind::Code, vec![MarkdownNode::text("console.log(1);")]),
                MarkdownNode::with_children(NodeKind::Link, vec![MarkdownNode::text("Example")]),
                MarkdownNode::with_children(
                    NodeKind::Other,
                    vec![MarkdownNode::with_children(NodeKind::Link, vec![MarkdownNode::text("Nested")])],
                ),
            ],
        );

        let metrics = ReadmeMetrics::from_tree(&root);
        assert_eq!(metrics.code_block_count, 1);
        assert_eq!(metrics.link_count, 2);
        assert_eq!(metrics.sections_present(), 0);
    }

    #[test]
    fn test_empty_readme() {
        let metrics = ReadmeMetrics::from_text("");
        assert_eq!(metrics, ReadmeMetrics::default());
        assert_eq!(metrics.essential_sections.len(), SectionName::count());
    }

    #[test]
    fn test_parse_real_markdown() {
        let text = "\
# My Project

Some intro with a [link](https://example.com) and `inline code`.

## Installation & Usage

```sh
npm install my-project
```

    indented code

## Contributing

See <https://example.com/contributing>.

### License

MIT
";

        let metrics = ReadmeMetrics::from_text(text);
        assert_eq!(metrics.code_block_count, 2);
        assert_eq!(metrics.link_count, 2);
        assert!(metrics.essential_sections[&SectionName::Installation]);
        assert!(metrics.essential_sections[&SectionName::Usage]);
        assert!(metrics.essential_sections[&SectionName::Contributing]);
        assert!(metrics.essential_sections[&SectionName::License]);
        assert!(!metrics.essential_sections[&SectionName::Introduction]);
        assert_eq!(metrics.sections_present(), 4);
    }

    #[test]
    fn test_heading_text_spans_inline_markup() {
        let root = parse_markdown("## Getting *Started*\n");
        let heading = &root.children[0];

        assert_eq!(heading.kind, NodeKind::Heading);
        assert_eq!(heading.flatten_text(), "Getting Started");
    }

    #[test]
    fn test_links_inside_headings_are_counted() {
        let metrics = ReadmeMetrics::from_text("# [Usage](docs/usage.md)\n");
        assert_eq!(metrics.link_count, 1);
        assert!(metrics.essential_sections[&SectionName::Usage]);
    }

    #[test]
    fn test_section_names() {
        let name: &'static str = SectionName::GettingStarted.into();
        assert_eq!(name, "gettingStarted");
        assert_eq!(SectionName::GettingStarted.keyword(), "getting started");
    }
}
