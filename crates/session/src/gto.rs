//! GTO property values and the ASCII (`GTOa`) text writer.
//!
//! A GTO file is a flat list of objects. Each object has a protocol and
//! holds named components, and each component holds typed properties:
//!
//! ```text
//! GTOa (4)
//!
//! sourceGroup000000_source : RVFileSource (1)
//! {
//!     cut
//!     {
//!         int in = 0
//!         int out = 24
//!     }
//! }
//! ```

use std::fmt::Write as _;

/// GTO ASCII format version written in the header.
pub const GTO_ASCII_VERSION: u32 = 4;

const INDENT: &str = "    ";

/// Element type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtoType {
    Int,
    Float,
    String,
}

impl GtoType {
    pub fn keyword(self) -> &'static str {
        match self {
            GtoType::Int => "int",
            GtoType::Float => "float",
            GtoType::String => "string",
        }
    }
}

/// A typed property value. Every GTO property is an array; a single
/// element is written in scalar form.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
}

impl PropertyValue {
    pub fn int(value: i64) -> Self {
        Self::Int(vec![value])
    }

    pub fn float(value: f64) -> Self {
        Self::Float(vec![value])
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(vec![value.into()])
    }

    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::String(values.into_iter().map(Into::into).collect())
    }

    pub fn gto_type(&self) -> GtoType {
        match self {
            PropertyValue::Int(_) => GtoType::Int,
            PropertyValue::Float(_) => GtoType::Float,
            PropertyValue::String(_) => GtoType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PropertyValue::Int(v) => v.len(),
            PropertyValue::Float(v) => v.len(),
            PropertyValue::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn elements(&self) -> Vec<String> {
        match self {
            PropertyValue::Int(v) => v.iter().map(i64::to_string).collect(),
            PropertyValue::Float(v) => v.iter().map(|f| format!("{f:?}")).collect(),
            PropertyValue::String(v) => v.iter().map(|s| quote(s)).collect(),
        }
    }
}

/// Quote a string for GTO ASCII output.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// One component of an object: a name and its properties in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    pub name: String,
    pub properties: Vec<(String, PropertyValue)>,
}

/// A GTO object ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct GtoObject {
    pub name: String,
    pub protocol: String,
    pub protocol_version: u32,
    pub components: Vec<Component>,
}

impl GtoObject {
    pub fn new(name: impl Into<String>, protocol: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            protocol: protocol.into(),
            protocol_version: version,
            components: Vec::new(),
        }
    }

    /// Add a property, merging into an existing component of the same
    /// name. Setting a property twice replaces the earlier value.
    pub fn set(&mut self, component: &str, name: &str, value: PropertyValue) {
        let index = match self.components.iter().position(|c| c.name == component) {
            Some(index) => index,
            None => {
                self.components.push(Component {
                    name: component.to_string(),
                    properties: Vec::new(),
                });
                self.components.len() - 1
            }
        };

        let properties = &mut self.components[index].properties;
        match properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => properties.push((name.to_string(), value)),
        }
    }

    /// Look up a property value.
    pub fn get(&self, component: &str, name: &str) -> Option<&PropertyValue> {
        self.components
            .iter()
            .find(|c| c.name == component)?
            .properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Render a list of objects as a complete GTO ASCII document.
pub fn write_ascii(objects: &[GtoObject]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "GTOa ({GTO_ASCII_VERSION})");

    for object in objects {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} : {} ({})",
            object.name, object.protocol, object.protocol_version
        );
        out.push_str("{\n");
        for component in &object.components {
            let _ = writeln!(out, "{INDENT}{}", component.name);
            let _ = writeln!(out, "{INDENT}{{");
            for (name, value) in &component.properties {
                let _ = writeln!(
                    out,
                    "{INDENT}{INDENT}{} {} = {}",
                    value.gto_type().keyword(),
                    name,
                    format_value(value)
                );
            }
            let _ = writeln!(out, "{INDENT}}}");
        }
        out.push_str("}\n");
    }
    out
}

fn format_value(value: &PropertyValue) -> String {
    let elements = value.elements();
    if elements.len() == 1 {
        elements.into_iter().next().unwrap_or_default()
    } else if elements.is_empty() {
        "[ ]".to_string()
    } else {
        format!("[ {} ]", elements.join(" "))
    }
}
