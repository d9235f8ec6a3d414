//! The opinion-detection state machine.
//!
//! The machine consumes labeled objects in reading order and emits
//! redaction instructions and opinion spans. Transitions are pure: each
//! step maps `(state, object, trackers)` to `(state, trackers, events)`,
//! so the table below is testable row by row.
//!
//! | State           | Label      | Effect                                         | Next            |
//! |-----------------|------------|------------------------------------------------|-----------------|
//! | WaitCaption     | caption    | remember start                                 | Tracking        |
//! | Tracking        | line       | emit instruction start->line                   | LockedUntilKey  |
//! | Tracking        | headmatter | remember first candidate end                   | Tracking        |
//! | Tracking        | Key        | emit span; emit instruction start->candidate   | WaitCaption     |
//! | LockedUntilKey  | Key        | emit span                                      | WaitCaption     |
//!
//! Everything else is ignored in place. Labels outside the four driving
//! classes never reach the machine.

use crate::model::{LayoutObject, RedactionInstruction, SpanReason};

/// Where the machine is in its caption -> end-marker search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlannerState {
    /// Looking for a caption to open an opinion
    #[default]
    WaitCaption,
    /// Caption seen; looking for the body-redaction end and the Key
    Tracking,
    /// Body redaction emitted; only a Key can close the opinion
    LockedUntilKey,
}

/// Objects the machine is holding between transitions.
///
/// `candidate_end` deliberately survives the `LockedUntilKey -> WaitCaption`
/// path: only the `Tracking` + `Key` row clears every tracker. This
/// mirrors long-standing planner behavior and is recorded as an open
/// question in DESIGN.md.
#[derive(Debug, Clone, Default)]
pub struct SpanTrackers {
    /// Start object for the pending redaction instruction
    pub active_start: Option<LayoutObject>,
    /// First headmatter seen while tracking; fallback instruction end
    pub candidate_end: Option<LayoutObject>,
    /// Caption that opened the pending opinion
    pub start_caption: Option<LayoutObject>,
}

/// Something the machine decided during one transition.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEvent {
    /// A body-text span to erase
    Instruction(RedactionInstruction),
    /// An opinion's extent
    Span {
        /// Opening caption
        start: LayoutObject,
        /// Closing Key
        end: LayoutObject,
        /// Close reason
        reason: SpanReason,
    },
}

/// Advance the machine by one object.
///
/// Events are only emitted with both endpoints present; a transition that
/// would pair a missing endpoint emits nothing and moves on.
pub fn transition(
    state: PlannerState,
    obj: &LayoutObject,
    mut trackers: SpanTrackers,
) -> (PlannerState, SpanTrackers, Vec<PlanEvent>) {
    use crate::model::Label::{Caption, Headmatter, Key, Line};

    let mut events = Vec::new();

    let next = match state {
        PlannerState::LockedUntilKey => {
            if obj.label == Key {
                emit_span(&mut events, trackers.start_caption.take(), obj);
                PlannerState::WaitCaption
            } else {
                PlannerState::LockedUntilKey
            }
        }

        PlannerState::WaitCaption => {
            if obj.label == Caption {
                trackers.active_start = Some(obj.clone());
                trackers.start_caption = Some(obj.clone());
                PlannerState::Tracking
            } else {
                PlannerState::WaitCaption
            }
        }

        PlannerState::Tracking => match obj.label {
            Line => {
                emit_instruction(&mut events, trackers.active_start.clone(), obj);
                PlannerState::LockedUntilKey
            }
            Headmatter => {
                if trackers.candidate_end.is_none() {
                    trackers.candidate_end = Some(obj.clone());
                }
                PlannerState::Tracking
            }
            Key => {
                emit_span(&mut events, trackers.start_caption.take(), obj);
                if let Some(end) = trackers.candidate_end.take() {
                    if let Some(start) = trackers.active_start.take() {
                        events.push(PlanEvent::Instruction(RedactionInstruction {
                            start,
                            end,
                        }));
                    }
                }
                trackers = SpanTrackers::default();
                PlannerState::WaitCaption
            }
            // A second caption does not restart the opinion.
            _ => PlannerState::Tracking,
        },
    };

    (next, trackers, events)
}

fn emit_span(events: &mut Vec<PlanEvent>, start: Option<LayoutObject>, end: &LayoutObject) {
    if let Some(start) = start {
        events.push(PlanEvent::Span {
            start,
            end: end.clone(),
            reason: SpanReason::CaptionToKey,
        });
    }
}

fn emit_instruction(
    events: &mut Vec<PlanEvent>,
    start: Option<LayoutObject>,
    end: &LayoutObject,
) {
    if let Some(start) = start {
        events.push(PlanEvent::Instruction(RedactionInstruction {
            start,
            end: end.clone(),
        }));
    }
}
