use crate::node::Node;

/// Typed, total-function access to node text and attributes.
///
/// Implemented for `Node` and for `Option<&Node>`, so the result of a failed
/// lookup flows straight into a coercion with a caller-supplied default:
///
/// ```
/// use treedoc_model::{Node, NodeQuery};
///
/// let mut root = Node::new("config");
/// root.append_child("retries").set_text(7);
///
/// assert_eq!(root.child("retries").int_or(3), 7);
/// assert_eq!(root.child("timeout").int_or(30), 30);
/// ```
pub trait NodeQuery {
    fn text_value(&self) -> Option<&str>;

    fn attribute_value(&self, name: &str) -> Option<&str>;

    fn text_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.text_value().unwrap_or(default)
    }

    fn int_value(&self) -> Option<i32> {
        self.text_value().and_then(|text| text.trim().parse().ok())
    }

    fn int_or(&self, default: i32) -> i32 {
        self.int_value().unwrap_or(default)
    }

    fn long_value(&self) -> Option<i64> {
        self.text_value().and_then(|text| text.trim().parse().ok())
    }

    fn long_or(&self, default: i64) -> i64 {
        self.long_value().unwrap_or(default)
    }

    fn double_value(&self) -> Option<f64> {
        self.text_value().and_then(|text| text.trim().parse().ok())
    }

    fn double_or(&self, default: f64) -> f64 {
        self.double_value().unwrap_or(default)
    }

    fn bool_value(&self) -> Option<bool> {
        self.text_value().and_then(parse_bool)
    }

    fn bool_or(&self, default: bool) -> bool {
        self.bool_value().unwrap_or(default)
    }

    fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute_value(name).unwrap_or(default)
    }

    fn attribute_int(&self, name: &str) -> Option<i32> {
        self.attribute_value(name)
            .and_then(|value| value.trim().parse().ok())
    }

    fn attribute_int_or(&self, name: &str, default: i32) -> i32 {
        self.attribute_int(name).unwrap_or(default)
    }

    fn attribute_long(&self, name: &str) -> Option<i64> {
        self.attribute_value(name)
            .and_then(|value| value.trim().parse().ok())
    }

    fn attribute_long_or(&self, name: &str, default: i64) -> i64 {
        self.attribute_long(name).unwrap_or(default)
    }

    fn attribute_double(&self, name: &str) -> Option<f64> {
        self.attribute_value(name)
            .and_then(|value| value.trim().parse().ok())
    }

    fn attribute_double_or(&self, name: &str, default: f64) -> f64 {
        self.attribute_double(name).unwrap_or(default)
    }

    fn attribute_bool(&self, name: &str) -> Option<bool> {
        self.attribute_value(name).and_then(parse_bool)
    }

    fn attribute_bool_or(&self, name: &str, default: bool) -> bool {
        self.attribute_bool(name).unwrap_or(default)
    }
}

impl NodeQuery for Node {
    fn text_value(&self) -> Option<&str> {
        self.text()
    }

    fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name)
    }
}

impl NodeQuery for Option<&Node> {
    fn text_value(&self) -> Option<&str> {
        self.and_then(Node::text)
    }

    fn attribute_value(&self, name: &str) -> Option<&str> {
        self.and_then(|node| node.attribute(name))
    }
}

/// Recognizes the literal truth sets before giving up; anything outside both
/// sets is treated as unparseable rather than false.
fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    for literal in ["true", "yes", "1"] {
        if text.eq_ignore_ascii_case(literal) {
            return Some(true);
        }
    }
    for literal in ["false", "no", "0"] {
        if text.eq_ignore_ascii_case(literal) {
            return Some(false);
        }
    }
    None
}
