use std::collections::BTreeMap;

/// A tagged tree element with string attributes, optional text content and
/// ordered element children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Iterates attributes in name order. The order carries no meaning in the
    /// model; it only keeps serialization deterministic.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl ToString) {
        self.attributes.insert(name.into(), value.to_string());
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl ToString) {
        self.text = Some(text.to_string());
    }

    pub fn clear_text(&mut self) {
        self.text = None;
    }

    /// Element children in append order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Appends a fresh child element and returns it for further population.
    pub fn append_child(&mut self, tag: impl Into<String>) -> &mut Node {
        self.children.push(Node::new(tag));
        self.children.last_mut().unwrap()
    }

    pub(crate) fn adopt(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Positional lookup over element children.
    pub fn nth_child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// Counts elements with the given tag across the whole subtree, not just
    /// direct children. This matches the tag-indexed lookup of the original
    /// DOM-backed store, where callers rely on descendants being counted.
    pub fn child_count(&self, tag: &str) -> usize {
        let mut matches = Vec::new();
        self.collect_tagged(tag, &mut matches);
        matches.len()
    }

    /// First element with the given tag in subtree document order.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.child_at(tag, 0)
    }

    /// The `index`-th element with the given tag, counted over the whole
    /// subtree in document order.
    pub fn child_at(&self, tag: &str, index: usize) -> Option<&Node> {
        let mut matches = Vec::new();
        self.collect_tagged(tag, &mut matches);
        matches.get(index).copied()
    }

    /// Mutable counterpart of [`Node::child`], same subtree scope.
    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Node> {
        for child in &mut self.children {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.child_mut(tag) {
                return Some(found);
            }
        }
        None
    }

    /// First element with the given tag whose attribute `name` equals
    /// `value`; linear scan over the subtree, first match wins.
    pub fn child_with_attribute(&self, tag: &str, name: &str, value: &str) -> Option<&Node> {
        let mut matches = Vec::new();
        self.collect_tagged(tag, &mut matches);
        matches
            .into_iter()
            .find(|node| node.attribute(name) == Some(value))
    }

    fn collect_tagged<'a>(&'a self, tag: &str, out: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_tagged(tag, out);
        }
    }
}
