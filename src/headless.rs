//! In-memory [`Document`] and [`Window`].
//!
//! A small element tree with attributes, simple selector matching and a
//! listener registry. Events are not dispatched automatically: call
//! [`HeadlessDocument::dispatch`] to collect the [`WidgetEvent`]s an element
//! would produce and feed them to the controller.

use rustc_hash::FxHashMap;

use crate::dom::{Document, Listener, WidgetEvent, Window};
use crate::error::WidgetError;

/// Handle to a node in a [`HeadlessDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }
}

/// A compound selector: `tag`, `#id`, `.class` parts, no combinators.
#[derive(Debug, Default, PartialEq, Eq)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    fn parse(input: &str) -> Result<Self, WidgetError> {
        let input = input.trim();
        let unsupported = || {
            WidgetError::Dom(format!("unsupported selector '{input}'"))
        };
        let combinator =
            |c: char| c.is_whitespace() || "[]>+~:,*".contains(c);
        if input.is_empty() || input.contains(combinator) {
            return Err(unsupported());
        }
        let mut selector = Self::default();
        let mut rest = input;
        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        if tag_end > 0 {
            selector.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return Err(unsupported());
            }
            if marker == '#' {
                selector.id = Some(name.to_owned());
            } else {
                selector.classes.push(name.to_owned());
            }
            rest = &body[end..];
        }
        Ok(selector)
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.as_ref().map_or(true, |t| *t == node.tag)
            && self
                .id
                .as_ref()
                .map_or(true, |id| node.attribute("id") == Some(id.as_str()))
            && self.classes.iter().all(|c| node.has_class(c))
    }
}

/// In-memory document with `<head>` and `<body>`.
#[derive(Debug)]
pub struct HeadlessDocument {
    nodes: FxHashMap<NodeId, Node>,
    next_id: usize,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    listeners: Vec<(NodeId, Listener)>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// An empty `<html><head></head><body></body></html>`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: FxHashMap::default(),
            next_id: 0,
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            listeners: Vec::new(),
        };
        doc.root = doc.alloc("html");
        doc.head = doc.alloc("head");
        doc.body = doc.alloc("body");
        doc.attach(doc.root, doc.head);
        doc.attach(doc.root, doc.body);
        doc
    }

    /// `<head>`.
    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// `<body>`.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create an element with attributes and append it to `parent`.
    pub fn append(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let id = self.alloc(tag);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes = attributes
                .iter()
                .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
                .collect();
        }
        self.attach(parent, id);
        id
    }

    /// Read an attribute.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(&id)?.attribute(name)
    }

    /// Tag name (lowercase).
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.tag.as_str())
    }

    /// Text content set on the node itself.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.text.as_str())
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Number of nodes the document still holds, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the node is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == self.root {
                return true;
            }
            cur = self.nodes.get(&n).and_then(|node| node.parent);
        }
        false
    }

    /// Whether the node was hidden with `display: none`.
    #[must_use]
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.attr(id, "style")
            .is_some_and(|s| s.replace(' ', "").contains("display:none"))
    }

    /// Whether the node's class list contains `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.has_class(class))
    }

    /// Attached nodes matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Dom`] for selectors with combinators or
    /// attribute parts.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, WidgetError> {
        let selector = Selector::parse(selector)?;
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if selector.matches(node) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev());
        }
        Ok(out)
    }

    /// Listeners currently attached to `id`.
    #[must_use]
    pub fn listeners_on(&self, id: NodeId) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|(n, _)| *n == id)
            .map(|(_, l)| *l)
            .collect()
    }

    /// Events that firing `event_type` on `id` would deliver, in
    /// registration order.
    #[must_use]
    pub fn dispatch(&self, id: NodeId, event_type: &str) -> Vec<WidgetEvent> {
        self.listeners
            .iter()
            .filter(|(n, l)| *n == id && l.event_type() == event_type)
            .map(|(_, l)| l.event())
            .collect()
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let _ = self.nodes.insert(
            id,
            Node {
                tag: tag.to_ascii_lowercase(),
                ..Node::default()
            },
        );
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) =
            self.nodes.get_mut(&child).and_then(|n| n.parent.take())
        else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|c| *c != child);
        }
    }

    /// Forget `id` and its descendants, along with their listeners.
    fn drop_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(n) = pending.pop() {
            if let Some(node) = self.nodes.remove(&n) {
                pending.extend(node.children);
            }
            self.listeners.retain(|(target, _)| *target != n);
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, WidgetError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| WidgetError::Dom(format!("no node {id:?}")))
    }
}

impl Document for HeadlessDocument {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.select(&format!("#{id}")).ok()?.into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, WidgetError> {
        self.select(selector)
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        self.attr(*el, name).map(str::to_owned)
    }

    fn set_attribute(
        &mut self,
        el: &NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), WidgetError> {
        let node = self.node_mut(*el)?;
        match node.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => value.clone_into(v),
            None => node.attributes.push((name.to_owned(), value.to_owned())),
        }
        Ok(())
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, WidgetError> {
        Ok(self.alloc(tag))
    }

    fn append_to_body(&mut self, child: &NodeId) -> Result<(), WidgetError> {
        self.attach(self.body, *child);
        Ok(())
    }

    fn append_to_head(&mut self, child: &NodeId) -> Result<(), WidgetError> {
        self.attach(self.head, *child);
        Ok(())
    }

    fn append_child(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
    ) -> Result<(), WidgetError> {
        let _ = self.node_mut(*parent)?;
        self.attach(*parent, *child);
        Ok(())
    }

    fn remove(&mut self, el: &NodeId) {
        self.detach(*el);
        self.drop_subtree(*el);
    }

    fn set_text(&mut self, el: &NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(el) {
            text.clone_into(&mut node.text);
        }
    }

    fn hide(&mut self, el: &NodeId) -> Result<(), WidgetError> {
        self.set_attribute(el, "style", "display: none")
    }

    fn listen(
        &mut self,
        el: &NodeId,
        listener: Listener,
    ) -> Result<(), WidgetError> {
        self.listeners.push((*el, listener));
        Ok(())
    }

    fn unlisten_all(&mut self) {
        self.listeners.clear();
    }
}

/// In-memory window that records alerts and navigations.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWindow {
    /// Value returned by `location_href`.
    pub href: String,
    /// Alert messages shown, oldest first.
    pub alerts: Vec<String>,
    /// URLs opened in the top window, oldest first.
    pub navigations: Vec<String>,
    /// How many times a message listener was registered.
    pub message_listeners: usize,
}

impl HeadlessWindow {
    /// A window showing `href`.
    #[must_use]
    pub fn new(href: &str) -> Self {
        Self {
            href: href.to_owned(),
            ..Self::default()
        }
    }
}

impl Window for HeadlessWindow {
    fn location_href(&self) -> String {
        self.href.clone()
    }

    fn open_top(&mut self, url: &str) -> Result<(), WidgetError> {
        self.navigations.push(url.to_owned());
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_owned());
    }

    fn listen_messages(&mut self) -> Result<(), WidgetError> {
        self.message_listeners += 1;
        Ok(())
    }
}
