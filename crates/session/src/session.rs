//! The session: node factory, graph, and file writer.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::gto::{write_ascii, GtoObject, PropertyValue};
use crate::node::{Node, NodeId, NodeKind};
use crate::SessionError;

/// Protocol version of the `RVSession` object.
const SESSION_PROTOCOL_VERSION: u32 = 4;

/// An RV session under construction.
///
/// Nodes are owned by the session and addressed by [`NodeId`]. They keep
/// their creation order, which is also the order they are written in.
#[derive(Debug, Clone, Default)]
pub struct Session {
    nodes: Vec<Node>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and return its handle.
    pub fn new_node(&mut self, kind: NodeKind, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, kind, name.into()));
        id
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, SessionError> {
        self.nodes.get(id.0).ok_or(SessionError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SessionError> {
        self.nodes.get_mut(id.0).ok_or(SessionError::UnknownNode(id))
    }

    /// Append `input` to the inputs of `parent`.
    pub fn add_input(&mut self, parent: NodeId, input: NodeId) -> Result<(), SessionError> {
        self.node(input)?;
        if parent == input {
            return Err(SessionError::SelfInput(parent));
        }
        self.node_mut(parent)?.push_input(input);
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes that are not an input of any other node, in creation order.
    pub fn roots(&self) -> Vec<NodeId> {
        let consumed: HashSet<NodeId> = self
            .nodes
            .iter()
            .flat_map(|n| n.inputs().iter().copied())
            .collect();
        self.nodes
            .iter()
            .map(Node::id)
            .filter(|id| !consumed.contains(id))
            .collect()
    }

    /// Group object name of every node, indexed by node position.
    /// Each kind is numbered separately: `sourceGroup000000`,
    /// `sourceGroup000001`, `sequenceGroup000000`, ...
    pub fn group_names(&self) -> Vec<String> {
        let mut counters = [0usize; 3];
        self.nodes
            .iter()
            .map(|node| {
                let slot = match node.kind() {
                    NodeKind::Stack => 0,
                    NodeKind::Sequence => 1,
                    NodeKind::Source => 2,
                };
                let name = format!("{}{:06}", node.kind().group_prefix(), counters[slot]);
                counters[slot] += 1;
                name
            })
            .collect()
    }

    /// Lay the session out as GTO objects.
    pub fn to_gto_objects(&self) -> Vec<GtoObject> {
        let groups = self.group_names();
        let roots = self.roots();
        let mut objects = Vec::with_capacity(self.nodes.len() * 2 + 2);

        let mut rv = GtoObject::new("rv", "RVSession", SESSION_PROTOCOL_VERSION);
        if let Some(view) = roots.first() {
            rv.set(
                "session",
                "viewNode",
                PropertyValue::string(&groups[view.0]),
            );
        }
        objects.push(rv);

        for (node, group) in self.nodes.iter().zip(&groups) {
            let kind = node.kind();

            let mut group_obj = GtoObject::new(group, kind.group_protocol(), 1);
            group_obj.set("ui", "name", PropertyValue::string(node.name()));

            let member_name = format!("{group}_{}", kind.member());
            let mut member_obj = GtoObject::new(&member_name, kind.member_protocol(), 1);

            if let Some(source) = node.source() {
                member_obj.set(
                    "media",
                    "movie",
                    PropertyValue::strings(source.media.iter().cloned()),
                );
                if let Some(fps) = source.fps {
                    member_obj.set("group", "fps", PropertyValue::float(fps));
                }
                if let Some(cut_in) = source.cut_in {
                    member_obj.set("cut", "in", PropertyValue::int(cut_in));
                }
                if let Some(cut_out) = source.cut_out {
                    member_obj.set("cut", "out", PropertyValue::int(cut_out));
                }
            }

            for property in node.properties() {
                let target = match property.member {
                    Some(_) => &mut member_obj,
                    None => &mut group_obj,
                };
                target.set(&property.component, &property.name, property.value.clone());
            }

            objects.push(group_obj);
            objects.push(member_obj);
        }

        // Edges run from input to consumer, grouped by consumer in creation order.
        let mut lhs = Vec::new();
        let mut rhs = Vec::new();
        for (node, group) in self.nodes.iter().zip(&groups) {
            for input in node.inputs() {
                lhs.push(groups[input.0].clone());
                rhs.push(group.clone());
            }
        }
        let mut connections = GtoObject::new("connections", "connection", 2);
        connections.set("evaluation", "lhs", PropertyValue::String(lhs));
        connections.set("evaluation", "rhs", PropertyValue::String(rhs));
        connections.set(
            "top",
            "nodes",
            PropertyValue::String(roots.iter().map(|r| groups[r.0].clone()).collect()),
        );
        objects.push(connections);

        objects
    }

    /// Render the session as GTO ASCII text.
    pub fn to_gto_string(&self) -> String {
        write_ascii(&self.to_gto_objects())
    }

    /// Write the session to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.to_gto_string().as_bytes())?;
        writer.flush()
    }

    /// Write the session file to `path`, replacing any existing file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        File::create(path)
            .and_then(|file| self.write_to(BufWriter::new(file)))
            .map_err(|e| SessionError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        tracing::debug!(path = %path.display(), nodes = self.nodes.len(), "session written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> (Session, NodeId, NodeId, NodeId) {
        let mut session = Session::new();
        let stack = session.new_node(NodeKind::Stack, "tracks");
        let seq = session.new_node(NodeKind::Sequence, "V1");
        let src = session.new_node(NodeKind::Source, "A");
        {
            let node = session.node_mut(src).unwrap();
            node.set_cut_in(0).unwrap();
            node.set_cut_out(24).unwrap();
            node.set_fps(24.0).unwrap();
            node.set_media(vec!["file:///a.mov".to_string()]).unwrap();
            node.set_property(
                Some("source"),
                "attributes",
                "otio_metadata",
                PropertyValue::string("{}"),
            )
            .unwrap();
        }
        session.add_input(seq, src).unwrap();
        session.add_input(stack, seq).unwrap();
        (session, stack, seq, src)
    }

    #[test]
    fn test_node_ids_follow_creation_order() {
        let (session, stack, seq, src) = sample_session();
        assert_eq!(session.len(), 3);
        assert_eq!(stack.index(), 0);
        assert_eq!(seq.index(), 1);
        assert_eq!(src.index(), 2);
        assert_eq!(session.node(seq).unwrap().inputs(), &[src]);
    }

    #[test]
    fn test_roots_exclude_inputs() {
        let (session, stack, _, _) = sample_session();
        assert_eq!(session.roots(), vec![stack]);
    }

    #[test]
    fn test_add_input_validation() {
        let mut session = Session::new();
        let a = session.new_node(NodeKind::Sequence, "a");
        assert!(matches!(
            session.add_input(a, a),
            Err(SessionError::SelfInput(_))
        ));
        assert!(matches!(
            session.add_input(a, NodeId(7)),
            Err(SessionError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_group_names_count_per_kind() {
        let mut session = Session::new();
        session.new_node(NodeKind::Source, "a");
        session.new_node(NodeKind::Sequence, "s");
        session.new_node(NodeKind::Source, "b");
        assert_eq!(
            session.group_names(),
            vec!["sourceGroup000000", "sequenceGroup000000", "sourceGroup000001"]
        );
    }

    #[test]
    fn test_gto_layout() {
        let (session, _, _, _) = sample_session();
        let objects = session.to_gto_objects();

        let names: Vec<&str> = objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "rv",
                "stackGroup000000",
                "stackGroup000000_stack",
                "sequenceGroup000000",
                "sequenceGroup000000_sequence",
                "sourceGroup000000",
                "sourceGroup000000_source",
                "connections",
            ]
        );

        assert_eq!(
            objects[0].get("session", "viewNode"),
            Some(&PropertyValue::string("stackGroup000000"))
        );

        let source = &objects[6];
        assert_eq!(source.protocol, "RVFileSource");
        assert_eq!(source.get("cut", "in"), Some(&PropertyValue::int(0)));
        assert_eq!(source.get("cut", "out"), Some(&PropertyValue::int(24)));
        assert_eq!(source.get("group", "fps"), Some(&PropertyValue::float(24.0)));
        assert_eq!(
            source.get("media", "movie"),
            Some(&PropertyValue::string("file:///a.mov"))
        );
        assert_eq!(
            source.get("attributes", "otio_metadata"),
            Some(&PropertyValue::string("{}"))
        );

        let connections = &objects[7];
        assert_eq!(
            connections.get("evaluation", "lhs"),
            Some(&PropertyValue::strings([
                "sequenceGroup000000",
                "sourceGroup000000"
            ]))
        );
        assert_eq!(
            connections.get("evaluation", "rhs"),
            Some(&PropertyValue::strings([
                "stackGroup000000",
                "sequenceGroup000000"
            ]))
        );
        assert_eq!(
            connections.get("top", "nodes"),
            Some(&PropertyValue::strings(["stackGroup000000"]))
        );
    }

    #[test]
    fn test_empty_session_has_no_view_node() {
        let session = Session::new();
        let text = session.to_gto_string();
        assert!(text.starts_with("GTOa (4)\n"));
        assert!(!text.contains("viewNode"));
        assert!(text.contains("connections : connection (2)"));
    }

    #[test]
    fn test_write_to_file() {
        let (session, _, _, _) = sample_session();
        let path = std::env::temp_dir().join("otio_rv_session_write_test.rv");
        let _ = std::fs::remove_file(&path);

        session.write(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, session.to_gto_string());
        assert!(text.contains("string movie = \"file:///a.mov\""));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_to_buffer_matches_string() {
        let (session, _, _, _) = sample_session();
        let mut buffer = Vec::new();
        session.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), session.to_gto_string());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let (session, _, _, _) = sample_session();
        let path = std::env::temp_dir()
            .join("otio_rv_no_such_dir")
            .join("out.rv");
        let err = session.write(&path).unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
    }
}
