//! Breadth-first search.

use crate::search::search_engines::search_engine::distant_deadline;
use crate::search::search_engines::{EventHandler, SearchResult, SearchStatistics};
use crate::search::successor_generators::SuccessorGenerator;
use crate::search::{apply, literals_hold, Action, Plan, Problem, State};
use std::collections::{HashMap, VecDeque};
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
}

pub struct BreadthFirstSearch<'a> {
    problem: Rc<Problem>,
    successor_generator: &'a dyn SuccessorGenerator,
    statistics: SearchStatistics,
    handlers: Vec<EventHandler<'a>>,
    abort_flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl std::fmt::Debug for BreadthFirstSearch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadthFirstSearch")
            .field("problem", &self.problem.name)
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}

impl<'a> BreadthFirstSearch<'a> {
    pub fn new(problem: Rc<Problem>, successor_generator: &'a dyn SuccessorGenerator) -> Self {
        Self {
            problem,
            successor_generator,
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

    /// A clone of this flag aborts the search from outside; the loop checks
    /// it between expansions.
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
        let mut last_depth = -1;

        // Index 0 is a reserved dummy so that the state-index map's default
        // value of 0 means "unseen".
        let mut state_indices: HashMap<State, i32> = HashMap::new();
        let mut frames: Vec<Frame> = vec![Frame {
            state: None,
            predecessor_action: None,
            predecessor_index: -1,
            depth: 0,
            g_value: 0.0,
        }];
        let mut open_list: VecDeque<i32> = VecDeque::new();

        let initial_state = State::initial(&self.problem);
        let initial_index = frames.len() as i32;
        state_indices.insert(initial_state.clone(), initial_index);
        frames.push(Frame {
            state: Some(initial_state),
            predecessor_action: None,
            predecessor_index: -1,
            depth: 0,
            g_value: 0.0,
        });
        open_list.push_back(initial_index);

        while let Some(index) = open_list.pop_front() {
            let (depth, g_value) = {
                let frame = &frames[index as usize];
                (frame.depth, frame.g_value)
            };

            self.statistics.max_depth = self.statistics.max_depth.max(depth);
            self.statistics.max_g_value = self.statistics.max_g_value.max(g_value);

            if last_depth < depth {
                last_depth = depth;
                Self::notify_handlers(&mut self.handlers, &self.statistics);
            }

            if self.abort_flag.load(Ordering::Relaxed) {
                return SearchResult::Aborted;
            }

            let state = frames[index as usize]
                .state
                .clone()
                .expect("only the dummy frame has no state");

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

                // A zero here means the state is unseen; 0 is the dummy.
                let successor_index = state_indices.entry(successor_state.clone()).or_insert(0);
                if *successor_index == 0 {
                    self.statistics.generated += 1;
                    *successor_index = frames.len() as i32;
                    frames.push(Frame {
                        state: Some(successor_state),
                        predecessor_action: Some(action.clone()),
                        predecessor_index: index,
                        depth: depth + 1,
                        g_value: g_value + action.cost,
                    });
                    open_list.push_back((frames.len() - 1) as i32);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::successor_generators::SuccessorGeneratorName;
    use crate::search::translate::translate;
    use crate::search::{is_applicable, StateSpace};
    use crate::test_utils::*;
    use std::cell::RefCell;

    fn run_bfs(
        domain_text: &str,
        problem_text: &str,
    ) -> (Rc<Problem>, SearchResult, Vec<i32>) {
        let problem = translate(domain_text, problem_text).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let mut search = BreadthFirstSearch::new(Rc::clone(&problem), &generator);

        let expanded_by_depth = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&expanded_by_depth);
        search.register_handler(Box::new(move |statistics| {
            recorded.borrow_mut().push(statistics.expanded);
        }));

        let result = search.plan();
        let expanded = expanded_by_depth.borrow().clone();
        (problem, result, expanded)
    }

    fn assert_plan_is_valid(problem: &Rc<Problem>, plan: &Plan) {
        let mut state = State::initial(problem);
        for action in plan {
            assert!(is_applicable(action, &state), "inapplicable step {action}");
            state = apply(action, &state);
        }
        assert!(literals_hold(&problem.goal, &state), "goal does not hold");
    }

    #[test]
    fn blocks_expansion_profile() {
        let (problem, result, expanded_by_depth) =
            run_bfs(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT);

        assert_eq!(expanded_by_depth, vec![0, 1, 5, 17, 41, 77, 101]);
        match result {
            SearchResult::Solved(plan) => {
                assert_eq!(plan.len(), 6);
                assert_plan_is_valid(&problem, &plan);
            }
            other => panic!("expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn gripper_expansion_profile() {
        let (problem, result, expanded_by_depth) =
            run_bfs(GRIPPER_DOMAIN_TEXT, GRIPPER_PROBLEM_TEXT);

        assert_eq!(
            expanded_by_depth,
            vec![0, 1, 10, 30, 46, 74, 104, 134, 182, 218, 234, 246]
        );
        match result {
            SearchResult::Solved(plan) => {
                assert_eq!(plan.len(), 11);
                assert_plan_is_valid(&problem, &plan);
            }
            other => panic!("expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn spanner_expansion_profile() {
        let (problem, result, expanded_by_depth) =
            run_bfs(SPANNER_DOMAIN_TEXT, SPANNER_PROBLEM_TEXT);

        assert_eq!(expanded_by_depth, vec![0, 1, 2, 3, 4, 6, 7]);
        match result {
            SearchResult::Solved(plan) => {
                assert_eq!(plan.len(), 6);
                assert_plan_is_valid(&problem, &plan);
            }
            other => panic!("expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn bfs_with_the_lifted_generator_agrees() {
        let problem = translate(SPANNER_DOMAIN_TEXT, SPANNER_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Lifted.create(Rc::clone(&problem));
        let mut search = BreadthFirstSearch::new(Rc::clone(&problem), &generator);

        match search.plan() {
            SearchResult::Solved(plan) => assert_eq!(plan.len(), 6),
            other => panic!("expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn plan_length_matches_the_state_space_distance() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let space = StateSpace::new(Rc::clone(&problem), &generator, usize::MAX).unwrap();

        let mut search = BreadthFirstSearch::new(Rc::clone(&problem), &generator);
        match search.plan() {
            SearchResult::Solved(plan) => {
                let optimum = space.get_distance_to_goal_state(space.get_initial_state());
                assert_eq!(plan.len() as i32, optimum);
            }
            other => panic!("expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn aborting_from_a_handler() {
        let problem = translate(GRIPPER_DOMAIN_TEXT, GRIPPER_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let mut search = BreadthFirstSearch::new(Rc::clone(&problem), &generator);

        let abort_flag = search.abort_flag();
        search.register_handler(Box::new(move |statistics| {
            if statistics.max_depth >= 3 {
                abort_flag.store(true, Ordering::SeqCst);
            }
        }));

        assert!(matches!(search.plan(), SearchResult::Aborted));
    }

    #[test]
    fn an_expired_deadline_aborts_the_search() {
        let problem = translate(GRIPPER_DOMAIN_TEXT, GRIPPER_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Lifted.create(Rc::clone(&problem));
        let mut search = BreadthFirstSearch::new(Rc::clone(&problem), &generator);

        search.set_deadline(Instant::now() - std::time::Duration::from_millis(1));
        assert!(matches!(search.plan(), SearchResult::Aborted));
    }

    #[test]
    fn a_generous_deadline_does_not_get_in_the_way() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Lifted.create(Rc::clone(&problem));
        let mut search = BreadthFirstSearch::new(Rc::clone(&problem), &generator);

        search.set_deadline(Instant::now() + std::time::Duration::from_secs(60));
        match search.plan() {
            SearchResult::Solved(plan) => assert_eq!(plan.len(), 6),
            other => panic!("expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn unsolvable_when_the_goal_is_unreachable() {
        let domain = r#"
            (define (domain stuck)
              (:predicates (here) (there))
              (:action go :parameters () :precondition (there) :effect (here)))"#;
        let problem = r#"
            (define (problem stuck-1) (:domain stuck)
              (:init (here)) (:goal (there)))"#;
        let problem = translate(domain, problem).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let mut search = BreadthFirstSearch::new(problem, &generator);

        assert!(matches!(search.plan(), SearchResult::Unsolvable));
    }
}
