use roxmltree::{Document, Node};
use tracing::warn;

use crate::models::order::OrderItem;

const DEFAULT_ITEM_QUANTITY: i64 = 1;
const DEFAULT_ITEM_PRICE: f64 = 0.0;

/// An operation an endpoint recognizes by element local name.
pub trait Operation: Copy + Sized {
    fn from_local_name(name: &str) -> Option<Self>;
    fn name(self) -> &'static str;
}

/// Element tag without namespace prefix or URI.
pub fn local_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && local_name(*node) == name
}

/// First element, depth-first in document order, naming an operation of `O`.
pub fn find_operation<'a, 'input, O: Operation>(
    doc: &'a Document<'input>,
) -> Option<(O, Node<'a, 'input>)> {
    doc.descendants()
        .filter(Node::is_element)
        .find_map(|node| O::from_local_name(local_name(node)).map(|op| (op, node)))
}

/// Text of the first element under `scope` (inclusive) whose local name is
/// `name`. Only the first such element is consulted, even when it is empty.
pub fn extract_field(scope: Node<'_, '_>, name: &str) -> Option<String> {
    scope
        .descendants()
        .find(|node| is_named(node, name))
        .and_then(|node| node.text())
        .map(str::to_string)
}

/// Like [`extract_field`] but limited to the direct children of `parent`.
pub fn extract_child_field(parent: Node<'_, '_>, name: &str) -> Option<String> {
    parent
        .children()
        .find(|node| is_named(node, name))
        .and_then(|node| node.text())
        .map(str::to_string)
}

/// Every `item` element in the document, read from its direct children.
pub fn extract_items(doc: &Document<'_>) -> Vec<OrderItem> {
    doc.descendants()
        .filter(|node| is_named(node, "item"))
        .filter_map(|item| {
            let product_id = non_blank(extract_child_field(item, "product_id"));
            let name = non_blank(extract_child_field(item, "name"));

            if product_id.is_none() && name.is_none() {
                return None;
            }

            let quantity = parse_or(
                extract_child_field(item, "quantity"),
                "quantity",
                DEFAULT_ITEM_QUANTITY,
            );
            let price = parse_price(extract_child_field(item, "price"));

            Some(OrderItem {
                product_id,
                name,
                quantity,
                price,
            })
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(raw: Option<String>, field: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match non_blank(raw) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(field, value = %raw, "unparseable item value; using default");
            default
        }),
        None => default,
    }
}

// NaN and infinities parse as f64 but cannot be stored as JSON numbers.
fn parse_price(raw: Option<String>) -> f64 {
    let price = parse_or(raw, "price", DEFAULT_ITEM_PRICE);
    if price.is_finite() {
        price
    } else {
        warn!(field = "price", value = %price, "unparseable item value; using default");
        DEFAULT_ITEM_PRICE
    }
}
