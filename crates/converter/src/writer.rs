//! Timeline to session tree writer.
//!
//! Walks a timeline depth first and creates one session node per
//! container or item, attaching children in document order.

use otio_rv_session::{NodeId, NodeKind, PropertyValue, Session};
use otio_rv_timeline_model::{
    Clip, Composable, Gap, Item, MediaReference, Stack, TimeRange, Timeline, Track,
};

use crate::locator::{media_locator, Placeholder};
use crate::ConvertError;

/// Name used for a stack without one.
pub const DEFAULT_STACK_NAME: &str = "tracks";
/// Name used for a track without one.
pub const DEFAULT_SEQUENCE_NAME: &str = "sequence";
/// Name used for a clip or gap without one.
pub const DEFAULT_SOURCE_NAME: &str = "clip";

/// Where item metadata is stored on a source node.
pub const METADATA_MEMBER: &str = "source";
pub const METADATA_COMPONENT: &str = "attributes";
pub const METADATA_PROPERTY: &str = "otio_metadata";

/// Convert `node` into session nodes and return the node it maps to.
///
/// A timeline maps to the node of its top-level stack; it has no node of
/// its own.
pub fn write_otio(node: &Composable, session: &mut Session) -> Result<NodeId, ConvertError> {
    match node {
        Composable::Timeline(timeline) => write_timeline(timeline, session),
        Composable::Stack(stack) => write_stack(stack, session),
        Composable::Track(track) => write_sequence(track, session),
        Composable::Clip(clip) => write_clip(clip, session),
        Composable::Gap(gap) => write_gap(gap, session),
        Composable::Unsupported(other) => Err(ConvertError::NoMappingForType {
            schema: other.schema.clone(),
        }),
    }
}

fn write_timeline(timeline: &Timeline, session: &mut Session) -> Result<NodeId, ConvertError> {
    write_stack(&timeline.tracks, session)
}

fn write_stack(stack: &Stack, session: &mut Session) -> Result<NodeId, ConvertError> {
    let id = session.new_node(NodeKind::Stack, name_or(&stack.name, DEFAULT_STACK_NAME));
    tracing::debug!(node = %id, name = %stack.name, children = stack.children.len(), "stack");
    write_inputs(id, &stack.children, session)?;
    Ok(id)
}

fn write_sequence(track: &Track, session: &mut Session) -> Result<NodeId, ConvertError> {
    let id = session.new_node(
        NodeKind::Sequence,
        name_or(&track.name, DEFAULT_SEQUENCE_NAME),
    );
    tracing::debug!(node = %id, name = %track.name, children = track.children.len(), "sequence");
    write_inputs(id, &track.children, session)?;
    Ok(id)
}

fn write_inputs(
    parent: NodeId,
    children: &[Composable],
    session: &mut Session,
) -> Result<(), ConvertError> {
    for child in children {
        let input = write_otio(child, session)?;
        session.add_input(parent, input)?;
    }
    Ok(())
}

fn write_clip(clip: &Clip, session: &mut Session) -> Result<NodeId, ConvertError> {
    write_item(
        clip,
        clip.media_reference.as_ref(),
        Placeholder::SmpteBars,
        session,
    )
}

fn write_gap(gap: &Gap, session: &mut Session) -> Result<NodeId, ConvertError> {
    write_item(gap, None, Placeholder::Blank, session)
}

fn write_item<I: Item>(
    item: &I,
    reference: Option<&MediaReference>,
    placeholder: Placeholder,
    session: &mut Session,
) -> Result<NodeId, ConvertError> {
    let range = range_to_read(item)?;
    let metadata = serde_json::to_string(item.metadata())?;
    let cut_in = range.start_time.value_rescaled_to(range.duration.rate);
    let cut_out = range
        .end_time_exclusive()
        .value_rescaled_to(range.duration.rate);
    let locator = media_locator(reference, placeholder, &range);

    let id = session.new_node(NodeKind::Source, name_or(item.name(), DEFAULT_SOURCE_NAME));
    let node = session.node_mut(id)?;
    node.set_property(
        Some(METADATA_MEMBER),
        METADATA_COMPONENT,
        METADATA_PROPERTY,
        PropertyValue::string(metadata),
    )?;
    node.set_cut_in(to_frame(cut_in))?;
    node.set_cut_out(to_frame(cut_out))?;
    node.set_fps(range.duration.rate)?;
    node.set_media(vec![locator])?;

    tracing::debug!(
        node = %id,
        name = %item.name(),
        cut_in,
        cut_out,
        fps = range.duration.rate,
        "source"
    );
    Ok(id)
}

/// The range of media an item cuts in: its source range, or failing that
/// everything that is available.
pub fn range_to_read<I: Item + ?Sized>(item: &I) -> Result<TimeRange, ConvertError> {
    item.source_range()
        .or_else(|| item.available_range())
        .ok_or_else(|| ConvertError::NoValidRange {
            item: item.name().to_string(),
        })
}

fn name_or<'a>(name: &'a str, default: &'a str) -> &'a str {
    if name.is_empty() {
        default
    } else {
        name
    }
}

fn to_frame(value: f64) -> i64 {
    value.round() as i64
}
