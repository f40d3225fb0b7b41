//! Re-render HTML documents into a reduced, human-readable subset.
//!
//! cleanpg parses a document with html5ever into an arena DOM, then walks it
//! with a fixed whitelist:
//! - **Policy table**: which tags survive, which attributes they keep, and what
//!   inline style they get
//! - **Canonical mode**: optionally drop everything between `<body>` and the
//!   first `<h1>` (navigation, ads, boilerplate)
//! - **Escaping**: text and attribute values are entity-escaped
//!
//! # Example
//!
//! ```rust
//! use cleanpg::{RenderOptions, clean_html};
//!
//! let page = b"<html><body><nav>Menu</nav><h1>Title</h1><p>Body text</p></body></html>";
//! let options = RenderOptions::new().canonical_mode(true).inject_style(false);
//! let html = clean_html(page, &options).unwrap();
//! assert_eq!(
//!     html,
//!     "\n<html>\n<head></head>\n<body>\n<h1>Title</h1>\n<p>Body text</p></body></html>"
//! );
//! ```

mod tracing_macros;

pub mod arena_dom;
pub mod decide;
pub mod escape;
pub mod policy;
pub mod render;

pub use arena_dom::{Document, NodeKind, parse, parse_bytes};
pub use decide::TraversalState;
pub use escape::escape;
pub use render::{RenderError, RenderOptions, render_document};

// Re-exports for callers building or walking documents by hand
pub use html5ever::tendril::StrTendril;
pub use indextree::NodeId;

use tracing_macros::debug;

/// Errors from [`clean_html`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be decoded.
    #[error("could not parse HTML: {0}")]
    Parse(#[from] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Parse raw HTML bytes and render them with `options`.
pub fn clean_html(data: &[u8], options: &RenderOptions) -> Result<String, Error> {
    let doc = parse_bytes(data)?;
    if !doc.parse_errors.is_empty() {
        debug!(count = doc.parse_errors.len(), "parser recovered from errors");
    }
    Ok(render_document(&doc, options)?)
}
