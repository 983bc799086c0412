//! Marker reports.
//!
//! Renders the markers of a cast as a numbered Markdown list of seek
//! hyperlinks, suitable for pasting next to an embedded player.

use std::fmt::Write;

use crate::cast::Event;

/// One hyperlink per marker event, in stream order.
#[must_use]
pub fn marker_links(events: &[Event], data_video_id: Option<&str>) -> Vec<String> {
    let data_video_attr = data_video_id
        .map(|id| format!(" data-video=\"{id}\""))
        .unwrap_or_default();

    events
        .iter()
        .filter_map(|event| match event {
            Event::Marker { time, label } => Some(format!(
                "<a{data_video_attr} data-seek-to=\"{time}\" href=\"javascript:;\">{label}</a>"
            )),
            _ => None,
        })
        .collect()
}

/// The marker links as a numbered Markdown list.
#[must_use]
pub fn marker_md_list(events: &[Event], data_video_id: Option<&str>) -> String {
    let mut out = String::new();
    for (ix, link) in marker_links(events, data_video_id).iter().enumerate() {
        // String formatting cannot fail.
        let _ = writeln!(out, "{}. {link}", ix + 1);
    }
    out
}
