//! Named, described properties that a debug panel can bind to.
//!
//! A component that wants live-tweakable values holds a [`TweakRegistrar`]:
//! it declares each property once with [`TweakRegistrar::setup_prop`], a panel
//! reads [`TweakRegistrar::descriptors`] to build its controls and writes back
//! through [`TweakRegistrar::set`], and every [`ChangeObserver`] hears about
//! values that actually changed. Nested values use dotted names such as
//! `position.x`.
use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};

/// Control type a panel should offer for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Number,
    Bool,
    /// A color string such as `#ff0000`.
    Color,
    Text,
}

impl PropertyKind {
    fn name(self) -> &'static str {
        match self {
            PropertyKind::Number => "number",
            PropertyKind::Bool => "boolean",
            PropertyKind::Color => "color",
            PropertyKind::Text => "text",
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (PropertyKind::Number, PropertyValue::Number(_))
                | (PropertyKind::Bool, PropertyValue::Bool(_))
                | (PropertyKind::Color | PropertyKind::Text, PropertyValue::Text(_))
        )
    }
}

/// Current value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(v) => Some(v),
            _ => None,
        }
    }

    fn inferred_kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Number(_) => PropertyKind::Number,
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Text(_) => PropertyKind::Text,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Text(v) => f.write_str(v),
        }
    }
}

/// Descriptor metadata: `{ kind, min, max, label, format }`.
#[derive(Clone, Default)]
pub struct PropertyMeta {
    /// Control type; inferred from the initial value when `None`.
    pub kind: Option<PropertyKind>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub label: Option<String>,
    /// Formatter used by [`TweakRegistrar::display`] for numeric values.
    pub format: Option<fn(f64) -> String>,
}

impl PropertyMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number() -> Self {
        Self::new().with_kind(PropertyKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new().with_kind(PropertyKind::Bool)
    }

    pub fn color() -> Self {
        Self::new().with_kind(PropertyKind::Color)
    }

    pub fn with_kind(mut self, kind: PropertyKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the inclusive numeric range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_format(mut self, format: fn(f64) -> String) -> Self {
        self.format = Some(format);
        self
    }
}

impl fmt::Debug for PropertyMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMeta")
            .field("kind", &self.kind)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("label", &self.label)
            .field("format", &self.format.is_some())
            .finish()
    }
}

/// A registered property as seen by a panel.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    pub meta: PropertyMeta,
    pub value: PropertyValue,
}

impl PropertyDescriptor {
    /// The label if one was given, otherwise the property name.
    pub fn label(&self) -> &str {
        self.meta.label.as_deref().unwrap_or(&self.name)
    }
}

/// Receives a notification after a property value changed.
pub trait ChangeObserver {
    fn on_change(&self, name: &str, value: &PropertyValue);
}

/// Function-based observer for simple cases.
pub struct FnObserver<F: Fn(&str, &PropertyValue)>(pub F);

impl<F: Fn(&str, &PropertyValue)> ChangeObserver for FnObserver<F> {
    fn on_change(&self, name: &str, value: &PropertyValue) {
        (self.0)(name, value);
    }
}

/// Property table with change notification.
#[derive(Default)]
pub struct TweakRegistrar {
    props: Vec<PropertyDescriptor>,
    observers: Vec<Box<dyn ChangeObserver>>,
}

impl TweakRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property. Names must be unique and the initial value must fit the kind.
    pub fn setup_prop(
        &mut self,
        name: &str,
        initial: impl Into<PropertyValue>,
        meta: PropertyMeta,
    ) -> Result<()> {
        if self.find(name).is_some() {
            return Err(Error::DuplicateProperty { name: name.into() });
        }
        let initial = initial.into();
        let kind = meta.kind.unwrap_or_else(|| initial.inferred_kind());
        if !kind.accepts(&initial) {
            return Err(Error::PropertyType {
                name: name.into(),
                expected: kind.name(),
            });
        }
        if let (Some(min), Some(max)) = (meta.min, meta.max) {
            if min > max {
                return Err(Error::InvalidConfig(format!(
                    "property '{name}' has min {min} above max {max}"
                )));
            }
        }
        let value = clamp_to_meta(initial, &meta);
        self.props.push(PropertyDescriptor {
            name: name.into(),
            kind,
            meta,
            value,
        });
        Ok(())
    }

    /// Write a value. Numbers are clamped into the declared range.
    ///
    /// Returns `Ok(true)` and notifies observers when the stored value changed.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<bool> {
        let value = self.resolve(name, value)?;
        let Some(idx) = self.find(name) else {
            return Err(Error::UnknownProperty { name: name.into() });
        };
        let prop = &mut self.props[idx];
        if prop.value == value {
            return Ok(false);
        }
        prop.value = value;
        trace!("Property '{}' changed to {}.", name, prop.value);

        let value = &self.props[idx].value;
        for observer in &self.observers {
            observer.on_change(name, value);
        }
        Ok(true)
    }

    /// The value `set` would store for `name`, without storing it.
    pub fn resolve(&self, name: &str, value: impl Into<PropertyValue>) -> Result<PropertyValue> {
        let Some(idx) = self.find(name) else {
            return Err(Error::UnknownProperty { name: name.into() });
        };
        let prop = &self.props[idx];
        let value = value.into();
        if !prop.kind.accepts(&value) {
            return Err(Error::PropertyType {
                name: name.into(),
                expected: prop.kind.name(),
            });
        }
        Ok(clamp_to_meta(value, &prop.meta))
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.find(name).map(|idx| &self.props[idx].value)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(PropertyValue::as_number)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_bool)
    }

    /// Panel text for a property, using its `format` for numbers.
    pub fn display(&self, name: &str) -> Option<String> {
        let prop = &self.props[self.find(name)?];
        match (&prop.value, prop.meta.format) {
            (PropertyValue::Number(v), Some(format)) => Some(format(*v)),
            (value, _) => Some(value.to_string()),
        }
    }

    /// Registered properties in declaration order.
    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.props
    }

    pub fn observe(&mut self, observer: impl ChangeObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.props.iter().position(|p| p.name == name)
    }
}

impl fmt::Debug for TweakRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweakRegistrar")
            .field("props", &self.props)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn clamp_to_meta(value: PropertyValue, meta: &PropertyMeta) -> PropertyValue {
    match value {
        PropertyValue::Number(mut v) => {
            if let Some(min) = meta.min {
                v = v.max(min);
            }
            if let Some(max) = meta.max {
                v = v.min(max);
            }
            PropertyValue::Number(v)
        }
        other => other,
    }
}
