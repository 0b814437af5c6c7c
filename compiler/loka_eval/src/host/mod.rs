//! The host document model: elements, selectors and the query primitive.

mod element;
mod selector;

pub use element::Element;
pub use selector::{Selector, SelectorError};

/// The host's element-query primitive.
///
/// Returns the descendants of `scope` matching `selector`, in document order.
pub trait HostQuery: Send + Sync {
    fn query_all(&self, selector: &str, scope: &Element) -> Result<Vec<Element>, SelectorError>;
}

/// Default query primitive backed by the built-in selector engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomQuery;

impl HostQuery for DomQuery {
    fn query_all(&self, selector: &str, scope: &Element) -> Result<Vec<Element>, SelectorError> {
        Ok(Selector::parse(selector)?.query_all(scope))
    }
}
