//! Per-element and per-attribute render decisions.
//!
//! Element decisions depend on the [`RenderOptions`] and, in canonical mode, on
//! what the walk has already seen. That history lives in a [`TraversalState`]
//! owned by a single render call, so independent renders never share it.

use crate::policy::{lookup_policy, normalize_tag};
use crate::render::RenderOptions;
use crate::tracing_macros::trace;

/// Canonical-mode progress through one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalState {
    /// A `<body>` element has been evaluated.
    pub seen_body: bool,
    /// The first `<h1>` has been evaluated.
    pub seen_first_heading: bool,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decide whether the element `tag` produces tags in the output.
///
/// Unknown tags are never renderable and leave `state` untouched, as do
/// anchors when links are off. In canonical mode everything between the body
/// start and the first `h1` is suppressed; the `h1` itself always renders.
pub fn is_element_renderable(tag: &str, state: &mut TraversalState, options: &RenderOptions) -> bool {
    let tag = normalize_tag(tag);
    if lookup_policy(&tag).is_none() {
        return false;
    }

    if tag == "a" && !options.render_links {
        return false;
    }

    if !options.canonical_mode {
        return true;
    }

    let mut renderable = true;

    if tag == "body" {
        state.seen_body = true;
    }

    if state.seen_body && !state.seen_first_heading && tag != "body" {
        renderable = false;
    }

    // Checked last so the heading that ends suppression is itself rendered
    if tag == "h1" {
        state.seen_first_heading = true;
        renderable = true;
    }

    trace!(tag = %tag, renderable, ?state, "canonical decision");
    renderable
}

/// Decide whether attribute `name` (exact case) is kept on element `tag`.
pub fn is_attribute_renderable(tag: &str, name: &str) -> bool {
    lookup_policy(&normalize_tag(tag)).is_some_and(|policy| policy.allows_attribute(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> RenderOptions {
        RenderOptions::new().canonical_mode(true)
    }

    #[test]
    fn unknown_tags_are_not_renderable_and_keep_state() {
        for options in [RenderOptions::new(), canonical()] {
            let mut state = TraversalState {
                seen_body: true,
                seen_first_heading: false,
            };
            let before = state;
            for tag in ["script", "style", "img", "nav", "custom-element", ""] {
                assert!(!is_element_renderable(tag, &mut state, &options), "{tag}");
            }
            assert_eq!(state, before);
        }
    }

    #[test]
    fn known_tags_render_case_insensitively() {
        let mut state = TraversalState::new();
        let options = RenderOptions::new();
        assert!(is_element_renderable("p", &mut state, &options));
        assert!(is_element_renderable("TABLE", &mut state, &options));
        assert!(is_element_renderable("Br", &mut state, &options));
    }

    #[test]
    fn links_can_be_suppressed() {
        let mut state = TraversalState::new();
        assert!(is_element_renderable("a", &mut state, &RenderOptions::new()));
        assert!(!is_element_renderable(
            "a",
            &mut state,
            &RenderOptions::new().render_links(false)
        ));
    }

    #[test]
    fn suppressed_link_does_not_touch_canonical_state() {
        let mut state = TraversalState {
            seen_body: true,
            seen_first_heading: false,
        };
        let before = state;
        let options = canonical().render_links(false);
        assert!(!is_element_renderable("a", &mut state, &options));
        assert_eq!(state, before);
    }

    #[test]
    fn non_canonical_mode_ignores_state() {
        let mut state = TraversalState::new();
        let options = RenderOptions::new();
        for tag in ["body", "div", "h1", "p"] {
            assert!(is_element_renderable(tag, &mut state, &options));
        }
        assert_eq!(state, TraversalState::new());
    }

    #[test]
    fn canonical_sequence_body_div_h1_p() {
        let mut state = TraversalState::new();
        let options = canonical();

        assert!(is_element_renderable("body", &mut state, &options));
        assert!(state.seen_body);

        assert!(!is_element_renderable("div", &mut state, &options));
        assert!(!state.seen_first_heading);

        assert!(is_element_renderable("h1", &mut state, &options));
        assert!(state.seen_first_heading);

        assert!(is_element_renderable("p", &mut state, &options));
    }

    #[test]
    fn canonical_mode_renders_head_content_before_body() {
        let mut state = TraversalState::new();
        let options = canonical();
        assert!(is_element_renderable("html", &mut state, &options));
        assert!(is_element_renderable("head", &mut state, &options));
        assert!(is_element_renderable("title", &mut state, &options));
        assert_eq!(state, TraversalState::new());
    }

    #[test]
    fn canonical_second_body_stays_renderable() {
        let mut state = TraversalState::new();
        let options = canonical();
        assert!(is_element_renderable("body", &mut state, &options));
        assert!(is_element_renderable("BODY", &mut state, &options));
    }

    #[test]
    fn attribute_whitelist() {
        assert!(is_attribute_renderable("a", "href"));
        assert!(is_attribute_renderable("A", "href"));
        assert!(!is_attribute_renderable("a", "HREF"));
        assert!(!is_attribute_renderable("a", "onclick"));
        assert!(!is_attribute_renderable("div", "class"));
        assert!(!is_attribute_renderable("img", "src"));
    }
}
