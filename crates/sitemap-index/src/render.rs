//! Sitemap document rendering.
//!
//! Rendering is a pure function of the ordered entry nodes and the
//! [`RenderOptions`]. Output is compact (no indentation) and byte-identical for
//! identical input.

use quick_xml::escape::{escape, partial_escape};

use crate::node::Node;

/// Sitemap protocol namespace.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
/// Image sitemap extension namespace.
pub const IMAGE_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-image/1.1";
/// News sitemap extension namespace.
pub const NEWS_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// Namespace declarations on the `urlset` root.
const URLSET_NAMESPACES: &[(&str, &str)] = &[
    ("xmlns", SITEMAP_NAMESPACE),
    ("xmlns:image", IMAGE_NAMESPACE),
    ("xmlns:news", NEWS_NAMESPACE),
];

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Options controlling the document preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit the `<?xml ...?>` declaration.
    pub xml_declaration: bool,
    /// XSL stylesheet href for an `xml-stylesheet` processing instruction.
    pub stylesheet: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            stylesheet: None,
        }
    }
}

/// Preamble prepended to every serialized document.
#[must_use]
pub fn preamble(options: &RenderOptions) -> String {
    let mut out = String::new();
    if options.xml_declaration {
        out.push_str(XML_DECLARATION);
    }
    if let Some(href) = &options.stylesheet {
        out.push_str(r#"<?xml-stylesheet type="text/xsl" href=""#);
        out.push_str(&escape(href.as_str()));
        out.push_str(r#""?>"#);
    }
    out
}

/// Render entry nodes into a `urlset` document.
///
/// Nodes are emitted in the given order.
pub fn render<'a, I>(entries: I, options: &RenderOptions) -> String
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut out = preamble(options);
    write_open(&mut out, "urlset", URLSET_NAMESPACES.iter().copied());
    out.push('>');
    for entry in entries {
        write_node(&mut out, entry);
    }
    write_close(&mut out, "urlset");
    out
}

/// Serialize a node tree without preamble.
#[must_use]
pub fn serialize(node: &Node) -> String {
    let mut out = String::with_capacity(256);
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    write_open(
        out,
        &node.tag,
        node.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    );

    if node.children.is_empty() && node.text.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    out.push_str(&partial_escape(node.text.as_str()));
    for child in &node.children {
        write_node(out, child);
    }
    write_close(out, &node.tag);
}

fn write_open<'a>(out: &mut String, tag: &str, attrs: impl Iterator<Item = (&'a str, &'a str)>) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
}

fn write_close(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
