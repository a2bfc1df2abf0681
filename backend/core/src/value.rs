//! Dynamic argument values carried by audit events.
//!
//! Event payloads are open-ended and defined by call sites, so arguments are
//! a sum type rather than a static schema. Payloads are reference-counted:
//! cloning a value or an argument list never deep-copies caller data.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::hook::AuditHook;

/// A single loosely-typed audit argument.
#[derive(Clone, Default)]
pub enum AuditValue {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    Tuple(Arc<[AuditValue]>),
    Map(Arc<BTreeMap<String, AuditValue>>),
    Json(Arc<serde_json::Value>),
    /// A callable hook. Only values of this variant can be dispatched to.
    Hook(Arc<dyn AuditHook>),
    /// Any other host object, recoverable through [`Opaque::downcast_ref`].
    Opaque(Opaque),
}

impl AuditValue {
    /// Wrap an arbitrary host object.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Opaque::new(value))
    }

    pub fn hook(hook: Arc<dyn AuditHook>) -> Self {
        Self::Hook(hook)
    }

    /// Name of the value's type, as used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Json(_) => "json",
            Self::Hook(_) => "hook",
            Self::Opaque(o) => o.type_name(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[AuditValue]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hook(&self) -> Option<&Arc<dyn AuditHook>> {
        match self {
            Self::Hook(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Self::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// Shortcut for `as_opaque()` followed by a downcast.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_opaque().and_then(Opaque::downcast_ref)
    }
}

// ---------------------------------------------------------------------------
// Opaque host objects
// ---------------------------------------------------------------------------

/// Shared handle to a host object the auditing layer knows nothing about.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Identity comparison: two handles are equal only if they share the object.
    pub fn same_object(&self, other: &Opaque) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name)
    }
}

// ---------------------------------------------------------------------------
// Equality, Debug, Serialize
// ---------------------------------------------------------------------------

impl PartialEq for AuditValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Hook(a), Self::Hook(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Self::Opaque(a), Self::Opaque(b)) => a.same_object(b),
            _ => false,
        }
    }
}

impl fmt::Debug for AuditValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Self::Tuple(items) => {
                let mut t = f.debug_tuple("");
                for item in items.iter() {
                    t.field(item);
                }
                t.finish()
            }
            Self::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Self::Json(v) => write!(f, "{v}"),
            Self::Hook(h) => write!(f, "<hook {}>", h.name()),
            Self::Opaque(o) => o.fmt(f),
        }
    }
}

impl Serialize for AuditValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_bytes(b),
            Self::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::Json(v) => v.serialize(serializer),
            Self::Hook(h) => serializer.collect_str(&format_args!("<hook {}>", h.name())),
            Self::Opaque(o) => serializer.collect_str(&format_args!("<{}>", o.type_name())),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<()> for AuditValue {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<bool> for AuditValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for AuditValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for AuditValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for AuditValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for AuditValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for AuditValue {
    fn from(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl From<String> for AuditValue {
    fn from(s: String) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl From<&[u8]> for AuditValue {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(Arc::from(b))
    }
}

impl From<Vec<AuditValue>> for AuditValue {
    fn from(items: Vec<AuditValue>) -> Self {
        Self::Tuple(Arc::from(items))
    }
}

impl From<BTreeMap<String, AuditValue>> for AuditValue {
    fn from(map: BTreeMap<String, AuditValue>) -> Self {
        Self::Map(Arc::new(map))
    }
}

impl From<serde_json::Value> for AuditValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(Arc::new(v))
    }
}

impl From<Arc<dyn AuditHook>> for AuditValue {
    fn from(h: Arc<dyn AuditHook>) -> Self {
        Self::Hook(h)
    }
}

impl<T: Into<AuditValue>> From<Option<T>> for AuditValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}
