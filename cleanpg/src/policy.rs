//! Element whitelist: which tags survive, which of their attributes are kept,
//! and what inline style gets injected into them.
//!
//! Tag list follows <https://developer.mozilla.org/en-US/docs/Web/HTML/Element>.
//! Lookups expect a lowercase tag name; use [`normalize_tag`] first.

use std::borrow::Cow;

/// Whitelist entry for a single tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Lowercase tag name this entry applies to.
    pub tag: &'static str,
    /// Attribute names copied through to the output (exact-case match).
    pub attributes: &'static [&'static str],
    /// Raw CSS injected as a `style` attribute. May contain newlines and tabs,
    /// which are stripped at render time.
    pub style: &'static str,
}

impl Policy {
    const fn bare(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: &[],
            style: "",
        }
    }

    const fn styled(tag: &'static str, style: &'static str) -> Self {
        Self {
            tag,
            attributes: &[],
            style,
        }
    }

    /// Whether `name` is in this tag's allowed attribute list.
    pub fn allows_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name)
    }
}

// Main root
const HTML: Policy = Policy::styled(
    "html",
    "\n\t\tmargin: auto;\n\t\theight: 100%;\n\t\tdisplay: table;\n\t\tbackground: #d6dede;\n\t\t",
);

// Document metadata
const HEAD: Policy = Policy::bare("head");
const TITLE: Policy = Policy::bare("title");

// Sectioning root
const BODY: Policy = Policy::styled(
    "body",
    "\n\t\tmargin: 0 auto;\
     \n\t\tpadding-left: 20px;\
     \n\t\tpadding-right: 20px;\
     \n\t\theight: 100%;\
     \n\t\tfont: 115% 'PT Sans', 'Helvetica', sans-serif;\
     \n\t\tmax-width: 800px;\
     \n\t\tcolor: #555753; \
     \n\t\tbackground: #fff; \
     \n\t\tdisplay: table-cell;\
     \n\t\tvertical-align: middle;\
     \n\t\t",
);
const DIV: Policy = Policy::bare("div");
const SPAN: Policy = Policy::bare("span");

// Content sectioning
const H1: Policy = Policy::styled("h1", "\n\t\tfont-size: 175%;\n\t\tmargin-top: 40px;\n\t\t");
const H2: Policy = Policy::styled("h2", "\n\t\tfont-size: 145%;\n\t\tmargin-top: 30px;\n\t\t");
const H3: Policy = Policy::styled("h3", "\n\t\tfont-size: 130%;\n\t\tmargin-top: 20px;\n\t\t");
const H4: Policy = Policy::bare("h4");
const H5: Policy = Policy::bare("h5");
const H6: Policy = Policy::bare("h6");

// Text content
const P: Policy = Policy::bare("p");
const BLOCKQUOTE: Policy = Policy::bare("blockquote");
const PRE: Policy = Policy::styled(
    "pre",
    "font-family: Menlo, monospace;\n\t\tfont-size: 0.875rem;",
);
const CODE: Policy = Policy::styled(
    "code",
    "font-family: Menlo, monospace;\n\t\tword-spacing: -0.3em;\n\t\tfont-size: 0.875rem;",
);

// Inline text semantics
const A: Policy = Policy {
    tag: "a",
    attributes: &["href"],
    style: "",
};
const B: Policy = Policy::bare("b");
const EM: Policy = Policy::bare("em");
const I: Policy = Policy::bare("i");
const BR: Policy = Policy::bare("br");

// Table content
const CAPTION: Policy = Policy::bare("caption");
const COL: Policy = Policy::bare("col");
const COLGROUP: Policy = Policy::bare("colgroup");
const TABLE: Policy = Policy::bare("table");
const TBODY: Policy = Policy::bare("tbody");
const TD: Policy = Policy::bare("td");
const TFOOT: Policy = Policy::bare("tfoot");
const TH: Policy = Policy::bare("th");
const THEAD: Policy = Policy::bare("thead");
const TR: Policy = Policy::bare("tr");

/// Every whitelisted tag, in table order.
pub const POLICIES: &[Policy] = &[
    HTML, HEAD, TITLE, BODY, DIV, SPAN, H1, H2, H3, H4, H5, H6, P, BLOCKQUOTE, PRE, CODE, A, B,
    EM, I, BR, CAPTION, COL, COLGROUP, TABLE, TBODY, TD, TFOOT, TH, THEAD, TR,
];

/// Look up the whitelist entry for a lowercase tag name.
pub fn lookup_policy(tag: &str) -> Option<&'static Policy> {
    let policy = match tag {
        "html" => &HTML,
        "head" => &HEAD,
        "title" => &TITLE,
        "body" => &BODY,
        "div" => &DIV,
        "span" => &SPAN,
        "h1" => &H1,
        "h2" => &H2,
        "h3" => &H3,
        "h4" => &H4,
        "h5" => &H5,
        "h6" => &H6,
        "p" => &P,
        "blockquote" => &BLOCKQUOTE,
        "pre" => &PRE,
        "code" => &CODE,
        "a" => &A,
        "b" => &B,
        "em" => &EM,
        "i" => &I,
        "br" => &BR,
        "caption" => &CAPTION,
        "col" => &COL,
        "colgroup" => &COLGROUP,
        "table" => &TABLE,
        "tbody" => &TBODY,
        "td" => &TD,
        "tfoot" => &TFOOT,
        "th" => &TH,
        "thead" => &THEAD,
        "tr" => &TR,
        _ => return None,
    };
    Some(policy)
}

/// Void elements can't have any contents (HTML Living Standard, 13.1.2).
pub fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Lowercase a tag name, borrowing when it is already lowercase.
pub fn normalize_tag(tag: &str) -> Cow<'_, str> {
    if tag.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(tag.to_ascii_lowercase())
    } else {
        Cow::Borrowed(tag)
    }
}

/// Strip carriage returns, newlines and tabs so the style fits on one line.
pub fn inline_style(style: &str) -> String {
    style
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect()
}
