//! Resolve-or-default access into untyped JSON.
//!
//! Upstream timeline payloads have no stable schema, so nothing in this
//! crate indexes a [`Value`] directly. Every read goes through a [`Path`]
//! resolved here: a missing key, an out-of-range index, or an intermediate
//! of the wrong type ends the walk with `None`, never a panic.

use serde_json::Value;

/// One step of an access expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Object member lookup.
    Key(&'static str),
    /// Array element lookup.
    Index(usize),
}

/// A chain of steps, usually declared as a constant with [`json_path!`].
pub type Path = &'static [Step];

/// Build a [`Path`] from string keys and `[index]` steps:
/// `json_path!("legacy", "entities", "media", [0], "type")`.
macro_rules! json_path {
    (@step [$idx:expr]) => {
        $crate::accessor::Step::Index($idx)
    };
    (@step $key:literal) => {
        $crate::accessor::Step::Key($key)
    };
    ($($seg:tt),* $(,)?) => {
        &[$($crate::accessor::json_path!(@step $seg)),*]
    };
}
pub(crate) use json_path;

/// Walk `path` from `value`. JSON `null` at the end counts as absent.
pub fn get<'a>(value: &'a Value, path: &[Step]) -> Option<&'a Value> {
    let mut current = value;
    for step in path {
        current = match *step {
            Step::Key(key) => current.as_object()?.get(key)?,
            Step::Index(idx) => current.as_array()?.get(idx)?,
        };
    }
    (!current.is_null()).then_some(current)
}

/// Walk `path` and fall back to `default` if it does not resolve.
pub fn get_or<'a>(value: &'a Value, path: &[Step], default: &'a Value) -> &'a Value {
    get(value, path).unwrap_or(default)
}

pub fn str_at<'a>(value: &'a Value, path: &[Step]) -> Option<&'a str> {
    get(value, path)?.as_str()
}

pub fn array_at<'a>(value: &'a Value, path: &[Step]) -> Option<&'a [Value]> {
    get(value, path)?.as_array().map(Vec::as_slice)
}

/// Like [`array_at`] but yields an empty slice when absent.
pub fn array_or_empty<'a>(value: &'a Value, path: &[Step]) -> &'a [Value] {
    array_at(value, path).unwrap_or(&[])
}
