//! End-to-end tests: raw bytes in, cleaned HTML out.

use cleanpg::render::render_node;
use cleanpg::{Document, RenderError, RenderOptions, clean_html, parse, render_document};

const ARTICLE: &str = include_str!("fixtures/article.html");

fn clean(html: &str, options: &RenderOptions) -> String {
    clean_html(html.as_bytes(), options).expect("render should succeed")
}

#[test]
fn article_keeps_content_and_drops_clutter() {
    let out = clean(ARTICLE, &RenderOptions::new());

    assert!(out.starts_with("<!DOCTYPE html>\n<html style="), "{out}");
    assert!(out.contains("<title>Understanding Tree Walkers — Example Blog</title>"));
    assert!(out.contains(
        "\n<h1 style=\"font-size: 175%;margin-top: 40px;\">Understanding Tree Walkers</h1>"
    ));
    assert!(out.contains(
        "<code style=\"font-family: Menlo, monospace;word-spacing: -0.3em;font-size: 0.875rem;\">a &lt; b &amp;&amp; c &gt; d</code>"
    ));
    assert!(out.contains("<a href=\"https://example.org/spec?x=1&amp;y=2\">the spec</a>"));
    assert!(out.contains("Whitespace-only text nodes\n<br/>are dropped."));
    assert!(out.contains("\n<col/>\n<col/>"));

    for gone in [
        "dataLayer",
        ".sidebar",
        "<script",
        "<style",
        "<img",
        "<!--",
        "onclick",
        "class=",
        "lang=",
        "xlink",
        "Subscribe",
        "©",
    ] {
        assert!(!out.contains(gone), "{gone:?} leaked into output:\n{out}");
    }
}

#[test]
fn article_in_canonical_mode_starts_at_first_heading() {
    let out = clean(ARTICLE, &RenderOptions::new().canonical_mode(true));

    assert!(out.contains("<title>"), "head content is before <body>");
    assert!(!out.contains("Archive"));
    assert!(out.contains("Understanding Tree Walkers</h1>"));
    assert!(out.contains("Related"));
    assert!(out.contains(">Privacy</a>"));
}

#[test]
fn article_without_links_keeps_link_text() {
    let out = clean(ARTICLE, &RenderOptions::new().render_links(false));
    assert!(!out.contains("<a"));
    assert!(!out.contains("href"));
    assert!(out.contains("See the spec."));
    assert!(out.contains("Privacy"));
}

#[test]
fn article_without_style_has_no_style_attributes() {
    let out = clean(ARTICLE, &RenderOptions::new().inject_style(false));
    assert!(!out.contains("style="));
    assert!(out.contains("\n<html>\n<head>"));
}

#[test]
fn rendering_is_repeatable() {
    let doc = parse(ARTICLE);
    let canonical = RenderOptions::new().canonical_mode(true);

    let first = render_document(&doc, &canonical).unwrap();
    let second = render_document(&doc, &canonical).unwrap();
    assert_eq!(first, second);

    // A canonical render must not leak its state into the next render
    let plain = render_document(&doc, &RenderOptions::new()).unwrap();
    assert!(plain.contains("Archive"));
}

#[test]
fn attribute_filtering_ignores_configuration() {
    let html = r#"<a href="x" onclick="y">go</a>"#;
    for options in [
        RenderOptions::new(),
        RenderOptions::new().inject_style(false),
    ] {
        let out = clean(html, &options);
        assert!(out.contains("<a href=\"x\">go</a>"), "{out}");
        assert!(!out.contains("onclick"));
    }
}

#[test]
fn whitespace_only_text_produces_nothing() {
    let mut doc = Document::new();
    let root = doc.root;
    let p = doc.append_element(root, "p", &[]);
    for text in [" ", "\t", "\n", "\r", " \r\n\t ", ""] {
        doc.append_text(p, text);
    }
    let options = RenderOptions::new();
    assert_eq!(render_node(&doc, p, &options).unwrap(), "\n<p></p>");
}

#[test]
fn script_text_never_leaks() {
    let out = clean(
        "<body><script>alert('x')</script><p>ok</p></body>",
        &RenderOptions::new().inject_style(false),
    );
    assert!(!out.contains("alert"));
    assert!(out.contains("\n<p>ok</p>"));
}

#[test]
fn invalid_utf8_is_replaced() {
    let out = clean_html(b"<p>caf\xe9</p>", &RenderOptions::new().inject_style(false)).unwrap();
    assert!(out.contains("<p>caf\u{FFFD}</p>"));
}

#[test]
fn void_element_with_children_is_an_error() {
    let mut doc = Document::new();
    let root = doc.root;
    let col = doc.append_element(root, "col", &[]);
    doc.append_element(col, "span", &[]);

    let err = render_document(&doc, &RenderOptions::new()).unwrap_err();
    assert_eq!(
        err,
        RenderError::VoidElementHasChildren {
            tag: "col".to_string()
        }
    );
    assert_eq!(err.to_string(), "void element <col> has child nodes");
}

#[test]
fn render_error_converts_into_crate_error() {
    let err: cleanpg::Error = RenderError::UnknownNodeVariant { kind: "x" }.into();
    assert!(matches!(err, cleanpg::Error::Render(_)));
    assert_eq!(err.to_string(), "unknown node type: x");
}
