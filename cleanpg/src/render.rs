//! Whitelist renderer for the arena DOM.
//!
//! Walks a [`Document`] depth-first in source order and writes a reduced HTML
//! subset:
//!
//! - Elements missing from the policy table lose their tags but not their
//!   children
//! - Only whitelisted attributes survive, and policy styles are injected
//! - Text is escaped; whitespace-only text is dropped
//! - Text directly inside a non-renderable element (`<script>`, `<style>`,
//!   content canonical mode suppresses) is skipped; a link hidden by
//!   `render_links` keeps its text
//! - Comments vanish and every doctype becomes `<!DOCTYPE html>`
//! - Void elements are written as `<tag/>` and must be childless

use indextree::NodeId;

use crate::arena_dom::{Document, ElementData, NodeKind};
use crate::decide::{TraversalState, is_attribute_renderable, is_element_renderable};
use crate::escape::escape_into;
use crate::policy::{inline_style, is_void, lookup_policy, normalize_tag};
use crate::tracing_macros::{debug, trace};

/// Options for rendering. Set once, read-only during a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Suppress body content until the first `<h1>` (default: false)
    pub canonical_mode: bool,
    /// Inject the policy's inline style into each element (default: true)
    pub inject_style: bool,
    /// Render `<a>` elements (default: true). Link text is kept either way.
    pub render_links: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canonical_mode: false,
            inject_style: true,
            render_links: true,
        }
    }
}

impl RenderOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only render body content from the first `<h1>` on.
    pub fn canonical_mode(mut self, enabled: bool) -> Self {
        self.canonical_mode = enabled;
        self
    }

    /// Toggle injection of tag-level inline styles.
    pub fn inject_style(mut self, enabled: bool) -> Self {
        self.inject_style = enabled;
        self
    }

    /// Toggle rendering of `<a href>` links.
    pub fn render_links(mut self, enabled: bool) -> Self {
        self.render_links = enabled;
        self
    }
}

/// Errors that abort a render. No partial output is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The tree holds an error marker left by the parser.
    #[error("error node in document: {message}")]
    ParseErrorNode { message: String },

    /// The tree holds a node kind the renderer has no rule for.
    #[error("unknown node type: {kind}")]
    UnknownNodeVariant { kind: &'static str },

    /// A void element (`<br>`, `<col>`, ...) has child nodes.
    #[error("void element <{tag}> has child nodes")]
    VoidElementHasChildren { tag: String },
}

/// Render a whole document with fresh traversal state.
pub fn render_document(doc: &Document, options: &RenderOptions) -> Result<String, RenderError> {
    render_node(doc, doc.root, options)
}

/// Render the subtree rooted at `node` with fresh traversal state.
pub fn render_node(
    doc: &Document,
    node: NodeId,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    debug!(?options, "rendering");
    let mut out = String::new();
    let mut renderer = Renderer::new(&mut out, doc, options);
    renderer.write_node(node)?;
    debug!(bytes = out.len(), "rendered");
    Ok(out)
}

struct Renderer<'a> {
    out: &'a mut String,
    doc: &'a Document,
    options: &'a RenderOptions,
    /// `options` with links on; decides whether an element's text is kept,
    /// so a suppressed `<a>` loses its tag but not its text. The original
    /// `cleanpg` tool drops that text too; keeping it is deliberate.
    text_options: RenderOptions,
    state: TraversalState,
}

impl<'a> Renderer<'a> {
    fn new(out: &'a mut String, doc: &'a Document, options: &'a RenderOptions) -> Self {
        Self {
            out,
            doc,
            options,
            text_options: options.clone().render_links(true),
            state: TraversalState::new(),
        }
    }

    fn write_node(&mut self, id: NodeId) -> Result<(), RenderError> {
        let doc = self.doc;
        match &doc.get(id).kind {
            NodeKind::Error(message) => Err(RenderError::ParseErrorNode {
                message: message.to_string(),
            }),
            NodeKind::Text(text) => {
                if !text.chars().all(char::is_whitespace) {
                    escape_into(self.out, text);
                }
                Ok(())
            }
            NodeKind::Document => {
                for child in doc.children(id) {
                    self.write_node(child)?;
                }
                Ok(())
            }
            NodeKind::Element(elem) => self.write_element(id, elem),
            NodeKind::Comment(_) => Ok(()),
            NodeKind::Doctype(_) => {
                // Ours, not the source's
                self.out.push_str("<!DOCTYPE html>");
                Ok(())
            }
            NodeKind::Raw(html) => {
                self.out.push_str(html);
                Ok(())
            }
            NodeKind::ProcessingInstruction { .. } => Err(RenderError::UnknownNodeVariant {
                kind: doc.get(id).kind.describe(),
            }),
        }
    }

    fn write_element(&mut self, id: NodeId, elem: &ElementData) -> Result<(), RenderError> {
        let doc = self.doc;
        let renderable = self.is_renderable(elem);
        trace!(tag = elem.tag(), renderable, "element");

        if renderable {
            self.write_start_tag(id, elem)?;
        }

        for child in doc.children(id) {
            // Text inside an element we dropped (script, style, ...) is dropped too.
            // Re-checked per child: an <h1> earlier in this element may have
            // ended canonical suppression.
            if matches!(doc.get(child).kind, NodeKind::Text(_)) && !self.keeps_text(elem) {
                continue;
            }
            self.write_node(child)?;
        }

        if renderable && !is_void(&normalize_tag(elem.tag())) {
            self.out.push_str("</");
            self.out.push_str(elem.tag());
            self.out.push('>');
        }

        Ok(())
    }

    fn is_renderable(&mut self, elem: &ElementData) -> bool {
        is_element_renderable(elem.tag(), &mut self.state, self.options)
    }

    fn keeps_text(&mut self, elem: &ElementData) -> bool {
        is_element_renderable(elem.tag(), &mut self.state, &self.text_options)
    }

    /// Writes "\n<tag style=... attr=...>" (or "/>" for void elements).
    fn write_start_tag(&mut self, id: NodeId, elem: &ElementData) -> Result<(), RenderError> {
        let tag = elem.tag();
        let normalized = normalize_tag(tag);

        // Leading newline keeps the output readable
        self.out.push('\n');
        self.out.push('<');
        self.out.push_str(tag);

        if self.options.inject_style
            && let Some(policy) = lookup_policy(&normalized)
            && !policy.style.is_empty()
        {
            self.out.push_str(" style=\"");
            self.out.push_str(&inline_style(policy.style));
            self.out.push('"');
        }

        for attr in &elem.attrs {
            if !is_attribute_renderable(tag, &attr.name) {
                continue;
            }
            self.out.push(' ');
            if let Some(ns) = &attr.namespace {
                self.out.push_str(ns);
                self.out.push(':');
            }
            self.out.push_str(&attr.name);
            self.out.push_str("=\"");
            escape_into(self.out, &attr.value);
            self.out.push('"');
        }

        if is_void(&normalized) {
            if self.doc.has_children(id) {
                return Err(RenderError::VoidElementHasChildren {
                    tag: tag.to_string(),
                });
            }
            self.out.push_str("/>");
            return Ok(());
        }

        self.out.push('>');
        Ok(())
    }
}
