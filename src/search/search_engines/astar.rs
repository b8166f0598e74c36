//! Eager A* search.

use crate::search::heuristics::{is_dead_end, Heuristic};
use crate::search::search_engines::search_engine::distant_deadline;
use crate::search::search_engines::{EventHandler, SearchResult, SearchStatistics};
use crate::search::successor_generators::SuccessorGenerator;
use crate::search::{apply, literals_hold, Action, OpenList, Plan, Problem, State};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

struct Frame {
    state: Option<State>,
    predecessor_action: Option<Action>,
    predecessor_index: i32,
    depth: i32,
    g_value: f64,
    h_value: f64,
    closed: bool,
}

pub struct EagerAStarSearch<'a> {
    problem: Rc<Problem>,
    successor_generator: &'a dyn SuccessorGenerator,
    heuristic: Box<dyn Heuristic + 'a>,
    statistics: SearchStatistics,
    handlers: Vec<EventHandler<'a>>,
    abort_flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl std::fmt::Debug for EagerAStarSearch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EagerAStarSearch")
            .field("problem", &self.problem.name)
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}

impl<'a> EagerAStarSearch<'a> {
    pub fn new(
        problem: Rc<Problem>,
        successor_generator: &'a dyn SuccessorGenerator,
        heuristic: Box<dyn Heuristic + 'a>,
    ) -> Self {
        Self {
            problem,
            successor_generator,
            heuristic,
            statistics: SearchStatistics::new(),
            handlers: Vec::new(),
            abort_flag: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    pub fn register_handler(&mut self, handler: EventHandler<'a>) {
        self.handlers.push(handler);
    }

    /// Bounds the search by wall-clock time. The successor generator polls
    /// the deadline from within and expiry surfaces as
    /// [`SearchResult::Aborted`].
    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort_flag)
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    fn notify_handlers(handlers: &mut [EventHandler<'a>], statistics: &SearchStatistics) {
        for handler in handlers {
            handler(statistics);
        }
    }

    pub fn plan(&mut self) -> SearchResult {
        self.statistics.reset();
        let deadline = self.deadline.unwrap_or_else(distant_deadline);
        let mut last_f_value = f64::NEG_INFINITY;

        // Index 0 is a reserved dummy so that the state-index map's default
        // value of 0 means "unseen".
        let mut state_indices: HashMap<State, i32> = HashMap::new();
        let mut frames: Vec<Frame> = vec![Frame {
            state: None,
            predecessor_action: None,
            predecessor_index: -1,
            depth: 0,
            g_value: 0.0,
            h_value: 0.0,
            closed: true,
        }];
        let mut open_list = OpenList::new();

        let initial_state = State::initial(&self.problem);
        let initial_h_value = self.heuristic.evaluate(&initial_state);
        self.statistics.evaluated += 1;

        let initial_index = frames.len() as i32;
        state_indices.insert(initial_state.clone(), initial_index);
        frames.push(Frame {
            state: Some(initial_state),
            predecessor_action: None,
            predecessor_index: -1,
            depth: 0,
            g_value: 0.0,
            h_value: initial_h_value,
            closed: false,
        });
        open_list.insert(initial_index, 0.0);

        while let Some(index) = open_list.pop() {
            if frames[index as usize].closed {
                // A stale entry; a cheaper path to this state was expanded
                // already.
                continue;
            }
            frames[index as usize].closed = true;

            let (depth, g_value, h_value, state) = {
                let frame = &frames[index as usize];
                (
                    frame.depth,
                    frame.g_value,
                    frame.h_value,
                    frame.state.clone().expect("only the dummy frame has no state"),
                )
            };
            let f_value = g_value + h_value;

            self.statistics.max_depth = self.statistics.max_depth.max(depth);
            self.statistics.max_g_value = self.statistics.max_g_value.max(g_value);
            self.statistics.max_f_value = self.statistics.max_f_value.max(f_value);

            if last_f_value < f_value {
                last_f_value = f_value;
                Self::notify_handlers(&mut self.handlers, &self.statistics);
            }

            if self.abort_flag.load(Ordering::Relaxed) {
                return SearchResult::Aborted;
            }

            if literals_hold(&self.problem.goal, &state) {
                return SearchResult::Solved(extract_plan(&frames, index));
            }

            self.statistics.expanded += 1;

            let mut applicable_actions = Vec::new();
            if !self.successor_generator.get_applicable_actions_until(
                deadline,
                &state,
                &mut applicable_actions,
            ) {
                // Deadline expiry inside the generator; the partial action
                // list is discarded and the statistics stand as collected.
                return SearchResult::Aborted;
            }

            for action in applicable_actions {
                let successor_state = apply(&action, &state);
                let successor_g_value = g_value + action.cost;

                let successor_index = state_indices.entry(successor_state.clone()).or_insert(0);
                if *successor_index == 0 {
                    // Unseen; 0 is reserved by the dummy frame.
                    *successor_index = frames.len() as i32;
                    let successor_index = *successor_index;

                    let successor_h_value = self.heuristic.evaluate(&successor_state);
                    let successor_dead_end = is_dead_end(successor_h_value);
                    self.statistics.evaluated += 1;

                    frames.push(Frame {
                        state: Some(successor_state),
                        predecessor_action: Some(action.clone()),
                        predecessor_index: index,
                        depth: depth + 1,
                        g_value: successor_g_value,
                        h_value: successor_h_value,
                        // Dead ends are born closed and never enter the open
                        // list.
                        closed: successor_dead_end,
                    });

                    if !successor_dead_end {
                        open_list.insert(successor_index, successor_g_value + successor_h_value);
                        self.statistics.generated += 1;
                    }
                } else {
                    let successor_index = *successor_index;
                    let successor_frame = &mut frames[successor_index as usize];

                    if !successor_frame.closed && successor_g_value < successor_frame.g_value {
                        // A cheaper path; the stale open-list entry is
                        // filtered by the closed flag when popped.
                        successor_frame.predecessor_action = Some(action.clone());
                        successor_frame.predecessor_index = index;
                        successor_frame.depth = depth + 1;
                        successor_frame.g_value = successor_g_value;

                        if !is_dead_end(successor_frame.h_value) {
                            let successor_f_value = successor_g_value + successor_frame.h_value;
                            open_list.insert(successor_index, successor_f_value);
                            self.statistics.generated += 1;
                        }
                    }
                }
            }
        }

        SearchResult::Unsolvable
    }
}

fn extract_plan(frames: &[Frame], goal_index: i32) -> Plan {
    let mut actions = Vec::new();
    let mut index = goal_index;
    while let Some(action) = &frames[index as usize].predecessor_action {
        actions.push(Rc::clone(action));
        index = frames[index as usize].predecessor_index;
    }
    actions.reverse();
    Plan::new(actions)
}
