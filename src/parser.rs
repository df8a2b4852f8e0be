use crate::error::{Error, Result};
use crate::ir::OutlineNode;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Id of the synthetic node every outline hangs off.
pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEvent {
    pub level: usize,
    pub text: String,
}

/// Builds the outline tree for `text`, rooted at a synthetic node labelled
/// `root_label`.
///
/// Headings attach to the nearest preceding heading of a shallower level, so
/// skipped levels (`#` followed by `###`) never produce placeholder nodes and
/// a document opening with `##` simply hangs that heading off the root.
/// Node ids are `node-1`, `node-2`, ... in document order, which makes
/// duplicate headings distinct and repeated parses identical.
pub fn build_outline(text: &str, root_label: &str) -> Result<OutlineNode> {
    let headings = extract_headings(text);
    log::debug!("outline: {} heading(s) found", headings.len());
    if headings.is_empty() {
        return Err(Error::EmptyOutline);
    }

    // Each stack entry is a path of child indices from the root; the arena
    // form keeps the borrow checker out of the stack walk.
    let mut root = OutlineNode::new(ROOT_ID, root_label);
    let mut stack: Vec<Vec<usize>> = vec![Vec::new()];
    for (idx, heading) in headings.into_iter().enumerate() {
        // The root never leaves the stack.
        while stack.len() > heading.level.max(1) {
            stack.pop();
        }
        let parent_path = stack.last().cloned().unwrap_or_default();
        let parent = node_at_mut(&mut root, &parent_path);
        parent
            .children
            .push(OutlineNode::new(format!("node-{}", idx + 1), heading.text));
        let mut path = parent_path;
        path.push(parent.children.len() - 1);
        stack.push(path);
    }
    Ok(root)
}

/// Byte-level entry point for callers that read documents from disk or the
/// network without knowing the encoding.
pub fn build_outline_bytes(bytes: &[u8], root_label: &str) -> Result<OutlineNode> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| Error::MalformedDocument(format!("input is not valid UTF-8: {err}")))?;
    build_outline(text, root_label)
}

pub fn extract_headings(text: &str) -> Vec<HeadingEvent> {
    let parser = Parser::new_ext(
        text,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
    );
    let mut headings = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_level(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    headings.push(HeadingEvent {
                        level,
                        text: text.trim().to_string(),
                    });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}

fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn node_at_mut<'a>(root: &'a mut OutlineNode, path: &[usize]) -> &'a mut OutlineNode {
    let mut node = root;
    for &idx in path {
        node = &mut node.children[idx];
    }
    node
}
