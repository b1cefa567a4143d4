//! Session nodes: stacks, sequences, and sources.

use std::fmt;

use crate::gto::PropertyValue;
use crate::SessionError;

/// Handle to a node owned by a [`crate::Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kinds of node the adapter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Inputs composited on top of each other.
    Stack,
    /// Inputs played back to back.
    Sequence,
    /// A single piece of media.
    Source,
}

impl NodeKind {
    /// Prefix of the group object name, e.g. `sourceGroup`.
    pub fn group_prefix(self) -> &'static str {
        match self {
            NodeKind::Stack => "stackGroup",
            NodeKind::Sequence => "sequenceGroup",
            NodeKind::Source => "sourceGroup",
        }
    }

    pub fn group_protocol(self) -> &'static str {
        match self {
            NodeKind::Stack => "RVStackGroup",
            NodeKind::Sequence => "RVSequenceGroup",
            NodeKind::Source => "RVSourceGroup",
        }
    }

    /// Name of the main member node inside the group.
    pub fn member(self) -> &'static str {
        match self {
            NodeKind::Stack => "stack",
            NodeKind::Sequence => "sequence",
            NodeKind::Source => "source",
        }
    }

    pub fn member_protocol(self) -> &'static str {
        match self {
            NodeKind::Stack => "RVStack",
            NodeKind::Sequence => "RVSequence",
            NodeKind::Source => "RVFileSource",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Stack => "Stack",
            NodeKind::Sequence => "Sequence",
            NodeKind::Source => "Source",
        };
        f.write_str(name)
    }
}

/// A custom property attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Member node inside the group (`None` targets the group itself).
    pub member: Option<String>,
    pub component: String,
    pub name: String,
    pub value: PropertyValue,
}

/// Playback settings carried by a source node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceSettings {
    /// First frame played.
    pub cut_in: Option<i64>,
    /// Frame playback stops at.
    pub cut_out: Option<i64>,
    pub fps: Option<f64>,
    /// Movie paths or procedural locators.
    pub media: Vec<String>,
}

/// One node in the session graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    name: String,
    inputs: Vec<NodeId>,
    properties: Vec<Property>,
    source: Option<SourceSettings>,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, name: String) -> Self {
        let source = (kind == NodeKind::Source).then(SourceSettings::default);
        Self {
            id,
            kind,
            name,
            inputs: Vec::new(),
            properties: Vec::new(),
            source,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input nodes in the order they were added.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Find a custom property by address.
    pub fn property(
        &self,
        member: Option<&str>,
        component: &str,
        name: &str,
    ) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| {
                p.member.as_deref() == member && p.component == component && p.name == name
            })
            .map(|p| &p.value)
    }

    /// Playback settings; `None` unless this is a source node.
    pub fn source(&self) -> Option<&SourceSettings> {
        self.source.as_ref()
    }

    pub(crate) fn push_input(&mut self, input: NodeId) {
        self.inputs.push(input);
    }

    /// Attach a custom property. `member` must be `None` or this node's
    /// member name (e.g. `"source"` on a source node).
    pub fn set_property(
        &mut self,
        member: Option<&str>,
        component: &str,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), SessionError> {
        if let Some(member) = member {
            if member != self.kind.member() {
                return Err(SessionError::UnknownMember {
                    node: self.id,
                    member: member.to_string(),
                });
            }
        }

        let property = Property {
            member: member.map(str::to_string),
            component: component.to_string(),
            name: name.to_string(),
            value,
        };
        match self.properties.iter_mut().find(|p| {
            p.member == property.member && p.component == property.component && p.name == property.name
        }) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        Ok(())
    }

    fn source_mut(&mut self) -> Result<&mut SourceSettings, SessionError> {
        let (id, kind) = (self.id, self.kind);
        self.source
            .as_mut()
            .ok_or(SessionError::NotASource { node: id, kind })
    }

    pub fn set_cut_in(&mut self, frame: i64) -> Result<(), SessionError> {
        self.source_mut()?.cut_in = Some(frame);
        Ok(())
    }

    pub fn set_cut_out(&mut self, frame: i64) -> Result<(), SessionError> {
        self.source_mut()?.cut_out = Some(frame);
        Ok(())
    }

    pub fn set_fps(&mut self, fps: f64) -> Result<(), SessionError> {
        self.source_mut()?.fps = Some(fps);
        Ok(())
    }

    pub fn set_media(&mut self, media: Vec<String>) -> Result<(), SessionError> {
        self.source_mut()?.media = media;
        Ok(())
    }
}
