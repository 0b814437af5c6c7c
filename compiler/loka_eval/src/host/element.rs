//! In-process element tree standing in for the host document.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use indexmap::IndexMap;
use loka_ir::Node;
use rustc_hash::FxHashMap;

use crate::Value;

/// A handle to an element node. Cloning the handle aliases the same node.
#[derive(Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

struct ElementData {
    tag: String,
    classes: Vec<String>,
    /// Every attribute except `class`, which lives in `classes`.
    attributes: IndexMap<String, String>,
    properties: FxHashMap<String, Value>,
    children: Vec<Element>,
    parent: Weak<RefCell<ElementData>>,
    handlers: Vec<(String, Arc<Node>)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element(Rc::new(RefCell::new(ElementData {
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: IndexMap::new(),
            properties: FxHashMap::default(),
            children: Vec::new(),
            parent: Weak::new(),
            handlers: Vec::new(),
        })))
    }

    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.set_attribute("id", id);
        self
    }

    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Whether both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag_name(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.0.borrow().attributes.get("id").cloned()
    }

    // Tree structure

    /// Append `child`, detaching it from any previous parent.
    pub fn append_child(&self, child: &Element) {
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Remove this element from its parent, if it has one.
    pub fn detach(&self) {
        let parent = self.0.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent.borrow_mut().children.retain(|c| !c.ptr_eq(self));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    pub fn parent(&self) -> Option<Element> {
        self.0.borrow().parent.upgrade().map(Element)
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    /// All descendants in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Vec<Element> {
        let mut out = Vec::new();
        let mut stack: Vec<Element> = self.children().into_iter().rev().collect();
        while let Some(el) = stack.pop() {
            stack.extend(el.children().into_iter().rev());
            out.push(el);
        }
        out
    }

    /// Whether `self` is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &Element) -> bool {
        let mut current = self.parent();
        while let Some(el) = current {
            if el.ptr_eq(ancestor) {
                return true;
            }
            current = el.parent();
        }
        false
    }

    // Classes

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    /// Toggle `class`; returns whether it is now present.
    pub fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    // Attributes

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let data = self.0.borrow();
        if name == "class" {
            return (!data.classes.is_empty()).then(|| data.classes.join(" "));
        }
        data.attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    pub fn remove_attribute(&self, name: &str) {
        let mut data = self.0.borrow_mut();
        if name == "class" {
            data.classes.clear();
        } else {
            data.attributes.shift_remove(name);
        }
    }

    // Properties

    pub fn property(&self, name: &str) -> Option<Value> {
        self.0.borrow().properties.get(name).cloned()
    }

    pub fn set_property(&self, name: &str, value: Value) {
        self.0.borrow_mut().properties.insert(name.to_string(), value);
    }

    // Event handlers

    pub fn add_handler(&self, event: &str, body: Arc<Node>) {
        self.0.borrow_mut().handlers.push((event.to_string(), body));
    }

    /// Handler bodies registered for `event`, in registration order.
    pub fn handlers(&self, event: &str) -> Vec<Arc<Node>> {
        self.0
            .borrow()
            .handlers
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, body)| Arc::clone(body))
            .collect()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        write!(f, "<{}", data.tag)?;
        if let Some(id) = data.attributes.get("id") {
            write!(f, " id=\"{id}\"")?;
        }
        if !data.classes.is_empty() {
            write!(f, " class=\"{}\"", data.classes.join(" "))?;
        }
        f.write_str(">")
    }
}
