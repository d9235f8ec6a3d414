//! The opinion planner: ordering, header/footer collection, state
//! machine driving and case naming.

use std::collections::HashMap;

use log::{debug, info};

use super::filter::filter_overlapping;
use super::state::{transition, PlanEvent, PlannerState, SpanTrackers};
use crate::model::{Label, LayoutObject, OpinionSpan, RedactionPlan};
use crate::options::RedactionOptions;

/// Plans redactions and opinion spans from a document's detections.
///
/// The opinion counter keeps running across calls, so one planner
/// numbers opinions consecutively through a whole batch of documents.
#[derive(Debug)]
pub struct OpinionPlanner {
    options: RedactionOptions,
    opinion_idx: u32,
}

impl OpinionPlanner {
    /// Create a planner.
    pub fn new(options: RedactionOptions) -> Self {
        Self {
            options,
            opinion_idx: 0,
        }
    }

    /// Number of opinions recorded so far across all planned documents.
    pub fn opinions_planned(&self) -> u32 {
        self.opinion_idx
    }

    /// Plan one document's redactions.
    ///
    /// `first_page` is the printed page number of the document's first
    /// page; it offsets the assigned case names. Empty input yields an
    /// empty plan.
    pub fn plan(&mut self, objects: &[LayoutObject], first_page: usize) -> RedactionPlan {
        let mut objects = filter_overlapping(objects, self.options.overlap_threshold);

        // Reading order: page, then left column before right, then top
        // to bottom.
        objects.sort_by(|a, b| {
            a.page_index
                .cmp(&b.page_index)
                .then(a.col.sort_rank().cmp(&b.col.sort_rank()))
                .then(a.top().total_cmp(&b.top()))
        });

        let mut plan = RedactionPlan::default();
        collect_page_limits(&objects, &mut plan.page_headers, &mut plan.page_footers);

        let mut state = PlannerState::WaitCaption;
        let mut trackers = SpanTrackers::default();

        for obj in &objects {
            if !obj.label.drives_planner() {
                continue;
            }

            let (next, kept, events) = transition(state, obj, trackers);
            state = next;
            trackers = kept;

            for event in events {
                match event {
                    PlanEvent::Instruction(instr) => plan.instructions.push(instr),
                    PlanEvent::Span { start, end, reason } => {
                        self.opinion_idx += 1;
                        debug!(
                            "opinion {:03}: pages {}-{} ({})",
                            self.opinion_idx,
                            start.page_index + 1,
                            end.page_index + 1,
                            reason
                        );
                        plan.spans.push(OpinionSpan {
                            n: self.opinion_idx,
                            start,
                            end,
                            reason,
                            case_name: None,
                        });
                    }
                }
            }
        }

        assign_case_names(&mut plan.spans, first_page);

        info!(
            "planned {} redactions, {} opinions",
            plan.instructions.len(),
            plan.spans.len()
        );
        plan
    }
}

/// Record per-page header bottoms and topmost footnote edges. The last
/// header on a page wins; footnotes keep the minimum top edge.
fn collect_page_limits(
    objects: &[LayoutObject],
    headers: &mut HashMap<usize, f32>,
    footers: &mut HashMap<usize, f32>,
) {
    for obj in objects {
        match obj.label {
            Label::Header => {
                headers.insert(obj.page_index, obj.bottom());
            }
            Label::Footnotes => {
                let entry = footers.entry(obj.page_index).or_insert(f32::INFINITY);
                *entry = entry.min(obj.top());
            }
            _ => {}
        }
    }
}

/// Sort spans into reading order and assign `{first_page:04}-{counter:02}`
/// names, with the counter restarting per distinct first page.
fn assign_case_names(spans: &mut [OpinionSpan], page_start: usize) {
    if spans.is_empty() {
        return;
    }

    spans.sort_by(|a, b| {
        a.start
            .page_index
            .cmp(&b.start.page_index)
            .then(a.start.col.sort_rank().cmp(&b.start.col.sort_rank()))
            .then(a.start.top().total_cmp(&b.start.top()))
    });

    let mut page_counter: HashMap<usize, u32> = HashMap::new();
    for span in spans.iter_mut() {
        let first_page = span.start.page_index + page_start;
        let counter = page_counter.entry(first_page).or_insert(0);
        *counter += 1;
        span.case_name = Some(format!("{first_page:04}-{counter:02}"));
    }
}
