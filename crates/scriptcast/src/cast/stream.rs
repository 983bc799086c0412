//! The cast aggregate and chronological event insertion.

use super::event::Event;
use super::header::Header;
use crate::error::ContractError;

/// A recorded terminal session: header plus time-ordered event stream.
///
/// Value-like: transformations consume the cast and return a new one, so a
/// given snapshot has a single linear owner within one call chain. Events
/// are kept in non-decreasing time order whenever the aggregate is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiCast {
    /// The cast header.
    pub header: Header,
    /// Events in non-decreasing time order.
    pub events: Vec<Event>,
}

impl AsciiCast {
    /// Create an empty cast with the given header.
    #[must_use]
    pub const fn new(header: Header) -> Self {
        Self {
            header,
            events: Vec::new(),
        }
    }

    /// Create a cast from a header and an event stream.
    #[must_use]
    pub const fn with_events(header: Header, events: Vec<Event>) -> Self {
        Self { header, events }
    }

    /// Total duration, taken from the last event.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.events.last().map_or(0.0, Event::time)
    }

    /// Merge a sorted batch of events into the stream.
    ///
    /// A stable two-pointer merge: at each existing event, incoming events
    /// with a strictly smaller time are drained first, so an incoming event
    /// whose time equals an existing event's lands immediately after it.
    ///
    /// The incoming batch must already be non-decreasing in time; an
    /// unsorted batch fails with [`ContractError::UnsortedInput`] before
    /// any merging happens.
    pub fn insert_events(self, incoming: Vec<Event>) -> Result<Self, ContractError> {
        if incoming.is_empty() {
            return Ok(self);
        }
        if incoming.windows(2).any(|pair| pair[0].time() > pair[1].time()) {
            return Err(ContractError::UnsortedInput);
        }
        if self.events.is_empty() {
            return Ok(Self {
                header: self.header,
                events: incoming,
            });
        }

        let mut merged = Vec::with_capacity(self.events.len() + incoming.len());
        let mut pending = incoming.into_iter().peekable();
        for current in self.events {
            while let Some(event) = pending.next_if(|e| e.time() < current.time()) {
                merged.push(event);
            }
            merged.push(current);
        }
        merged.extend(pending);

        Ok(Self {
            header: self.header,
            events: merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(events: Vec<Event>) -> AsciiCast {
        AsciiCast::with_events(Header::new(80, 24), events)
    }

    #[test]
    fn merge_interleaves_with_tie_break() {
        let existing = cast(vec![Event::output(1.0, "x")]);
        let incoming = vec![
            Event::marker(0.5, "pre"),
            Event::marker(1.0, "tie"),
            Event::marker(1.5, "post"),
        ];

        let merged = existing.insert_events(incoming).unwrap();
        assert_eq!(
            merged.events,
            vec![
                Event::marker(0.5, "pre"),
                Event::output(1.0, "x"),
                Event::marker(1.0, "tie"),
                Event::marker(1.5, "post"),
            ]
        );
    }

    #[test]
    fn merge_empty_incoming_is_identity() {
        let existing = cast(vec![Event::output(0.0, "a"), Event::output(1.0, "b")]);
        let before = existing.clone();
        assert_eq!(existing.insert_events(Vec::new()).unwrap(), before);
    }

    #[test]
    fn merge_into_empty_returns_incoming() {
        let incoming = vec![Event::marker(0.1, "a"), Event::marker(0.2, "b")];
        let merged = cast(Vec::new()).insert_events(incoming.clone()).unwrap();
        assert_eq!(merged.events, incoming);
    }

    #[test]
    fn merge_unsorted_incoming_is_rejected() {
        let existing = cast(vec![Event::output(0.0, "a")]);
        let incoming = vec![Event::marker(2.0, "late"), Event::marker(1.0, "early")];
        let err = existing.insert_events(incoming).unwrap_err();
        assert_eq!(err, ContractError::UnsortedInput);
    }

    #[test]
    fn merge_unsorted_into_empty_is_still_rejected() {
        let incoming = vec![Event::marker(2.0, "late"), Event::marker(1.0, "early")];
        let err = cast(Vec::new()).insert_events(incoming).unwrap_err();
        assert_eq!(err, ContractError::UnsortedInput);
    }

    #[test]
    fn merge_appends_trailing_incoming() {
        let existing = cast(vec![Event::output(0.0, "a")]);
        let incoming = vec![Event::marker(5.0, "m1"), Event::marker(6.0, "m2")];
        let merged = existing.insert_events(incoming).unwrap();
        assert_eq!(merged.events.len(), 3);
        assert!(merged.events[2].is_marker_labeled("m2"));
    }

    #[test]
    fn duration_is_last_event_time() {
        assert_eq!(cast(Vec::new()).duration(), 0.0);
        assert_eq!(
            cast(vec![Event::output(0.0, "a"), Event::marker(3.5, "m")]).duration(),
            3.5
        );
    }

    mod merge_properties {
        use proptest::prelude::*;

        use super::*;

        fn sorted_times(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
            proptest::collection::vec(0.0f64..100.0, 0..max_len).prop_map(|mut times| {
                times.sort_by(f64::total_cmp);
                times
            })
        }

        proptest! {
            #[test]
            fn merged_output_is_sorted_and_complete(
                existing_times in sorted_times(16),
                incoming_times in sorted_times(16),
            ) {
                let existing: Vec<Event> = existing_times
                    .iter()
                    .map(|&t| Event::output(t, "e"))
                    .collect();
                let incoming: Vec<Event> = incoming_times
                    .iter()
                    .map(|&t| Event::marker(t, "i"))
                    .collect();

                let merged = cast(existing.clone())
                    .insert_events(incoming.clone())
                    .unwrap();

                prop_assert_eq!(merged.events.len(), existing.len() + incoming.len());
                prop_assert!(merged
                    .events
                    .windows(2)
                    .all(|pair| pair[0].time() <= pair[1].time()));

                // A valid stable interleaving: each input sequence appears
                // as a subsequence, in order.
                let existing_out: Vec<&Event> = merged
                    .events
                    .iter()
                    .filter(|e| matches!(e, Event::Output { .. }))
                    .collect();
                let incoming_out: Vec<&Event> = merged
                    .events
                    .iter()
                    .filter(|e| matches!(e, Event::Marker { .. }))
                    .collect();
                prop_assert_eq!(existing_out.len(), existing.len());
                prop_assert_eq!(incoming_out.len(), incoming.len());
                for (got, expected) in existing_out.iter().zip(&existing) {
                    prop_assert_eq!(*got, expected);
                }
                for (got, expected) in incoming_out.iter().zip(&incoming) {
                    prop_assert_eq!(*got, expected);
                }
            }

            #[test]
            fn equal_times_keep_existing_first(time in 0.0f64..100.0) {
                let merged = cast(vec![Event::output(time, "e")])
                    .insert_events(vec![Event::marker(time, "i")])
                    .unwrap();
                prop_assert_eq!(
                    &merged.events,
                    &vec![Event::output(time, "e"), Event::marker(time, "i")]
                );
            }
        }
    }
}
