//! Arena-based DOM that the renderer walks.
//!
//! - **indextree Arena**: every node lives in one contiguous arena and links to
//!   its parent and siblings by `NodeId`, so the renderer can walk the tree
//!   without owning it.
//! - **Tendrils**: text and attribute values are refcounted `StrTendril`s handed
//!   over by html5ever, so building the tree copies almost nothing.
//!
//! [`parse`] and [`parse_bytes`] build a [`Document`] with html5ever's tree
//! builder. The `append_*` methods build one by hand, which also allows shapes
//! the parser never emits (raw nodes, error nodes, void elements with children).

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{LocalName, Namespace, QualName, parse_document};
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;
use std::io;

use crate::tracing_macros::{debug, trace};

/// A parsed (or hand-built) document.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes of the tree.
    pub arena: Arena<NodeData>,

    /// The invisible document node every other top-level node hangs off.
    pub root: NodeId,

    /// Recoverable errors html5ever reported while building the tree.
    pub parse_errors: Vec<Cow<'static, str>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only its root node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::new(NodeKind::Document));
        Self {
            arena,
            root,
            parse_errors: Vec::new(),
        }
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Iterate children of a node in source order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Parent of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Whether the node has at least one child.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.arena[id].first_child().is_some()
    }

    /// Find the first element with the given (lowercase) tag, depth-first.
    #[cfg(test)]
    pub(crate) fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.root.descendants(&self.arena).find(|&id| {
            matches!(&self.get(id).kind, NodeKind::Element(elem) if elem.tag() == tag)
        })
    }

    /// The `<body>` element, if any.
    #[cfg(test)]
    pub(crate) fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }

    /// Append a new node of `kind` under `parent` and return its id.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.arena.new_node(NodeData::new(kind));
        parent.append(id, &mut self.arena);
        id
    }

    /// Append an HTML element with `(name, value)` attributes.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute::new(*name, *value))
            .collect();
        self.append(parent, NodeKind::Element(ElementData::html(tag, attrs)))
    }

    /// Append a text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Text(StrTendril::from(text)))
    }

    /// Append a comment node.
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Comment(StrTendril::from(text)))
    }

    /// Append a doctype node.
    pub fn append_doctype(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.append(parent, NodeKind::Doctype(StrTendril::from(name)))
    }

    /// Append a raw node; its text is emitted verbatim when rendered.
    pub fn append_raw(&mut self, parent: NodeId, html: &str) -> NodeId {
        self.append(parent, NodeKind::Raw(StrTendril::from(html)))
    }

    /// Append an error marker carrying a parser message.
    pub fn append_error(&mut self, parent: NodeId, message: &str) -> NodeId {
        self.append(parent, NodeKind::Error(StrTendril::from(message)))
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self { kind }
    }
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of the doctype and `<html>`)
    Document,
    /// Element with name and attributes
    Element(ElementData),
    /// Text content
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
    /// `<!DOCTYPE name>`
    Doctype(StrTendril),
    /// Pre-serialized markup, emitted without escaping
    Raw(StrTendril),
    /// Marker for a position the parser could not make sense of
    Error(StrTendril),
    /// `<?target data?>`; only XML-ish sinks ever create these
    ProcessingInstruction {
        target: StrTendril,
        data: StrTendril,
    },
}

impl NodeKind {
    /// Short human-readable name of the variant.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Element(_) => "element",
            NodeKind::Text(_) => "text",
            NodeKind::Comment(_) => "comment",
            NodeKind::Doctype(_) => "doctype",
            NodeKind::Raw(_) => "raw",
            NodeKind::Error(_) => "error",
            NodeKind::ProcessingInstruction { .. } => "processing instruction",
        }
    }
}

/// Element data (qualified name + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Qualified name as produced by the tree builder. The local part is
    /// lowercase for HTML elements; foreign (SVG/MathML) names keep their case.
    pub name: QualName,

    /// Attributes in source order, first occurrence wins.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// An element in the HTML namespace.
    pub fn html(tag: &str, attrs: Vec<Attribute>) -> Self {
        Self {
            name: QualName::new(
                None,
                Namespace::from("http://www.w3.org/1999/xhtml"),
                LocalName::from(tag),
            ),
            attrs,
        }
    }

    /// Tag name as it appears in the source.
    pub fn tag(&self) -> &str {
        &self.name.local
    }

    /// Value of the first attribute called `name` (ignoring prefixes).
    #[cfg(test)]
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_ref())
    }
}

/// A single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace prefix for foreign attributes (`xlink`, `xml`, `xmlns`).
    pub namespace: Option<String>,
    /// Local attribute name.
    pub name: String,
    pub value: StrTendril,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: &str) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            value: StrTendril::from(value),
        }
    }
}

impl From<html5ever::Attribute> for Attribute {
    fn from(attr: html5ever::Attribute) -> Self {
        Self {
            namespace: attr.name.prefix.map(|p| p.to_string()),
            name: attr.name.local.to_string(),
            value: attr.value,
        }
    }
}

/// Parse an HTML string into a [`Document`].
pub fn parse(html: &str) -> Document {
    let sink = ArenaSink::new();
    parse_document(sink, Default::default()).one(StrTendril::from(html))
}

/// Parse raw bytes into a [`Document`], decoding them as UTF-8 with lossy
/// replacement of invalid sequences.
pub fn parse_bytes(mut bytes: &[u8]) -> io::Result<Document> {
    let sink = ArenaSink::new();
    let doc = parse_document(sink, Default::default())
        .from_utf8()
        .read_from(&mut bytes)?;
    debug!(
        nodes = doc.arena.count(),
        parse_errors = doc.parse_errors.len(),
        "parsed document"
    );
    Ok(doc)
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
pub struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation for building the arena DOM
struct ArenaSink {
    /// Document under construction - RefCell because TreeSink takes `&self`
    doc: RefCell<Document>,
}

impl ArenaSink {
    fn new() -> Self {
        ArenaSink {
            doc: RefCell::new(Document::new()),
        }
    }

    fn new_node(&self, kind: NodeKind) -> NodeId {
        self.doc.borrow_mut().arena.new_node(NodeData::new(kind))
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.doc.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        // html5ever recovers on its own; keep the message for the caller
        trace!("parse error: {}", msg);
        self.doc.borrow_mut().parse_errors.push(msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.doc.borrow().root
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let doc = self.doc.borrow();
        match &doc.get(*target).kind {
            NodeKind::Element(elem) => OwnedElemName(elem.name.clone()),
            // Only ever asked about elements
            _ => OwnedElemName(QualName::new(None, Namespace::from(""), LocalName::from(""))),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs.into_iter().map(Attribute::from).collect();
        self.new_node(NodeKind::Element(ElementData { name, attrs }))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.new_node(NodeKind::Comment(text))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        self.new_node(NodeKind::ProcessingInstruction { target, data })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        let arena = &mut doc.arena;
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, arena);
            }
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text node, like a browser DOM would
                if let Some(last_child) = arena[*parent].last_child()
                    && let NodeKind::Text(existing) = &mut arena[last_child].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = arena.new_node(NodeData::new(NodeKind::Text(text)));
                parent.append(text_node, arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        let arena = &mut doc.arena;
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, arena);
            }
            NodeOrText::AppendText(text) => {
                if let Some(prev) = arena[*sibling].previous_sibling()
                    && let NodeKind::Text(existing) = &mut arena[prev].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = arena.new_node(NodeData::new(NodeKind::Text(text)));
                sibling.insert_before(text_node, arena);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.doc.borrow().parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root;
        doc.append(root, NodeKind::Doctype(name));
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents live directly under the <template> element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        let mut doc = self.doc.borrow_mut();
        if let NodeKind::Element(elem) = &mut doc.arena[*target].get_mut().kind {
            for attr in attrs {
                let attr = Attribute::from(attr);
                if !elem.attrs.iter().any(|a| a.name == attr.name) {
                    elem.attrs.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.doc.borrow_mut().arena);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut doc = self.doc.borrow_mut();
        let arena = &mut doc.arena;
        let children: Vec<NodeId> = node.children(arena).collect();
        for child in children {
            child.detach(arena);
            new_parent.append(child, arena);
        }
    }
}
