//! One page of a list endpoint, normalized from the shapes the API returns.

use serde_json::{Map, Value};

/// Server-reported pagination metadata. Every field is optional; a field is
/// only kept when the server sent a non-negative integer for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationMeta {
    pub total_items: Option<u64>,
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub page_size: Option<u32>,
}

impl PaginationMeta {
    /// Read metadata from a `pagination` object. Anything that is not an
    /// object yields empty metadata.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(obj) = value.and_then(Value::as_object) else {
            return Self::default();
        };

        Self {
            total_items: obj.get("total_items").and_then(Value::as_u64),
            current_page: read_u32(obj, "current_page"),
            total_pages: read_u32(obj, "total_pages"),
            page_size: read_u32(obj, "page_size"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn read_u32(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

/// Which envelope the items were found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `[ ... ]`
    BareArray,
    /// `{ "data": [ ... ], "pagination": { ... } }`
    Data,
    /// `{ "results": [ ... ] }`
    Results,
    /// Nothing recognizable; items degrade to empty.
    Unrecognized,
}

/// One server response to a paged query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub items: Vec<Value>,
    pub meta: PaginationMeta,
    pub shape: ResponseShape,
    pub requested_page: u32,
    pub requested_page_size: u32,
}

impl ListPage {
    /// Decode a response body. Tries a bare array, then `data`, then
    /// `results`; never fails. Pagination metadata is only read from objects.
    pub fn decode(body: Value, requested_page: u32, requested_page_size: u32) -> Self {
        let (items, meta, shape) = match body {
            Value::Array(items) => (items, PaginationMeta::default(), ResponseShape::BareArray),
            Value::Object(mut obj) => {
                let meta = PaginationMeta::from_value(obj.get("pagination"));
                match (obj.remove("data"), obj.remove("results")) {
                    (Some(Value::Array(items)), _) => (items, meta, ResponseShape::Data),
                    (_, Some(Value::Array(items))) => (items, meta, ResponseShape::Results),
                    _ => (Vec::new(), meta, ResponseShape::Unrecognized),
                }
            }
            _ => (
                Vec::new(),
                PaginationMeta::default(),
                ResponseShape::Unrecognized,
            ),
        };

        if shape == ResponseShape::Unrecognized {
            tracing::warn!(
                page = requested_page,
                "List response has no item array, treating as empty"
            );
        }

        Self {
            items,
            meta,
            shape,
            requested_page,
            requested_page_size,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the page holds fewer items than were asked for.
    pub fn is_short(&self) -> bool {
        self.items.len() < self.requested_page_size as usize
    }
}

/// Unwrap a `{ "data": ... }` envelope around a single record. `null` (empty
/// or non-JSON body) becomes `None`.
pub fn unwrap_data(body: Value) -> Option<Value> {
    match body {
        Value::Null => None,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(data) if !data.is_null() => Some(data),
            Some(_) => Some(Value::Object(obj)),
            None => Some(Value::Object(obj)),
        },
        other => Some(other),
    }
}
