use quick_xml::escape::{escape, partial_escape};
use treedoc_model::{Node, TreeDocument};

/// Renders a document as pretty-printed XML. / 將文件輸出為縮排後的 XML 字串。
///
/// `encoding_name` goes into the XML declaration; every line ends with a
/// newline. A node holding both element children and text serializes its
/// children only — stray text fragments never survive a round-trip, so
/// re-serializing parsed output is byte-stable.
pub fn serialize_document(
    document: &TreeDocument,
    encoding_name: &str,
    indent_width: usize,
) -> String {
    let mut buf = String::new();
    buf.push_str(&format!(
        "<?xml version=\"1.0\" encoding=\"{encoding_name}\"?>\n"
    ));
    write_node(document.root(), indent_width, 0, &mut buf);
    buf
}

fn write_node(node: &Node, indent: usize, level: usize, buf: &mut String) {
    let pad = " ".repeat(indent * level);
    buf.push_str(&pad);
    buf.push('<');
    buf.push_str(node.tag());
    for (name, value) in node.attributes() {
        buf.push(' ');
        buf.push_str(name);
        buf.push_str("=\"");
        buf.push_str(&escape(value));
        buf.push('"');
    }

    if !node.children().is_empty() {
        buf.push_str(">\n");
        for child in node.children() {
            write_node(child, indent, level + 1, buf);
        }
        buf.push_str(&pad);
        buf.push_str("</");
        buf.push_str(node.tag());
        buf.push_str(">\n");
    } else if let Some(text) = node.text() {
        buf.push('>');
        buf.push_str(&partial_escape(text));
        buf.push_str("</");
        buf.push_str(node.tag());
        buf.push_str(">\n");
    } else {
        buf.push_str("/>\n");
    }
}
