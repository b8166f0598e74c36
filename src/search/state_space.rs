use crate::search::successor_generators::SuccessorGenerator;
use crate::search::{apply, literals_hold, Problem, State, Transition};
use rand::Rng;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tracing::info;

const UNREACHABLE: i32 = i32::MAX;

/// The complete forward closure of a problem under a successor generator:
/// indexed states, transitions in both directions, goal and dead-end sets and
/// shortest-path distances.
#[derive(Debug)]
pub struct StateSpace {
    problem: Rc<Problem>,
    states: Vec<State>,
    state_indices: HashMap<State, usize>,
    forward_transitions: Vec<Vec<Transition>>,
    backward_transitions: Vec<Vec<Transition>>,
    distance_from_initial: Vec<i32>,
    /// `-1` marks a dead end.
    distance_to_goal: Vec<i32>,
    goal_indices: Vec<usize>,
    dead_end_indices: Vec<usize>,
    /// Index buckets by distance to the goal, for uniform sampling.
    states_by_distance: Vec<Vec<usize>>,
    /// All-pairs unit-cost distances, computed on first use.
    all_pairs: RefCell<Option<Vec<Vec<i32>>>>,
}

impl StateSpace {
    /// Expands the reachable state space breadth-first. Returns `None` when
    /// `max_states` is hit before the closure is complete.
    pub fn new(
        problem: Rc<Problem>,
        successor_generator: &dyn SuccessorGenerator,
        max_states: usize,
    ) -> Option<Self> {
        assert!(
            Rc::ptr_eq(&problem, successor_generator.problem()),
            "the successor generator is not for the given problem"
        );

        let mut states = Vec::new();
        let mut state_indices: HashMap<State, usize> = HashMap::new();
        let mut forward_transitions: Vec<Vec<Transition>> = Vec::new();
        let mut backward_transitions: Vec<Vec<Transition>> = Vec::new();
        let mut distance_from_initial = Vec::new();

        let mut queue = VecDeque::new();

        let initial_state = State::initial(&problem);
        states.push(initial_state.clone());
        state_indices.insert(initial_state, 0);
        forward_transitions.push(Vec::new());
        backward_transitions.push(Vec::new());
        distance_from_initial.push(0);
        queue.push_back(0_usize);

        while !queue.is_empty() {
            if states.len() >= max_states {
                break;
            }
            let state_index = queue.pop_front().unwrap();

            let state = states[state_index].clone();
            let depth = distance_from_initial[state_index];

            for action in successor_generator.get_applicable_actions(&state) {
                let successor_state = apply(&action, &state);
                let successor_index = match state_indices.get(&successor_state) {
                    Some(&existing) => existing,
                    None => {
                        let new_index = states.len();
                        states.push(successor_state.clone());
                        state_indices.insert(successor_state.clone(), new_index);
                        forward_transitions.push(Vec::new());
                        backward_transitions.push(Vec::new());
                        distance_from_initial.push(depth + 1);
                        queue.push_back(new_index);
                        new_index
                    }
                };

                let transition = Transition::new(state.clone(), action, successor_state);
                forward_transitions[state_index].push(transition.clone());
                backward_transitions[successor_index].push(transition);
            }
        }

        if !queue.is_empty() {
            // The bound cut the closure short; a partial space is useless.
            return None;
        }

        let goal_indices: Vec<usize> = states
            .iter()
            .enumerate()
            .filter(|(_, state)| literals_hold(&problem.goal, state))
            .map(|(index, _)| index)
            .collect();

        // Distances to the nearest goal state by a backward multi-source
        // BFS; unreached states are dead ends.
        let mut distance_to_goal = vec![-1_i32; states.len()];
        let mut backward_queue = VecDeque::new();
        for &goal_index in &goal_indices {
            distance_to_goal[goal_index] = 0;
            backward_queue.push_back(goal_index);
        }
        while let Some(state_index) = backward_queue.pop_front() {
            let next_distance = distance_to_goal[state_index] + 1;
            for transition in &backward_transitions[state_index] {
                let predecessor_index = state_indices[&transition.source];
                if distance_to_goal[predecessor_index] < 0 {
                    distance_to_goal[predecessor_index] = next_distance;
                    backward_queue.push_back(predecessor_index);
                }
            }
        }

        let dead_end_indices: Vec<usize> = distance_to_goal
            .iter()
            .enumerate()
            .filter(|(_, &distance)| distance < 0)
            .map(|(index, _)| index)
            .collect();

        let longest = distance_to_goal.iter().copied().max().unwrap_or(0).max(0);
        let mut states_by_distance = vec![Vec::new(); longest as usize + 1];
        for (index, &distance) in distance_to_goal.iter().enumerate() {
            if distance >= 0 {
                states_by_distance[distance as usize].push(index);
            }
        }

        info!(
            states = states.len(),
            goal_states = goal_indices.len(),
            dead_ends = dead_end_indices.len(),
            "expanded the complete state space"
        );

        Some(Self {
            problem,
            states,
            state_indices,
            forward_transitions,
            backward_transitions,
            distance_from_initial,
            distance_to_goal,
            goal_indices,
            dead_end_indices,
            states_by_distance,
            all_pairs: RefCell::new(None),
        })
    }

    pub fn problem(&self) -> &Rc<Problem> {
        &self.problem
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.forward_transitions
            .iter()
            .map(|transitions| transitions.len())
            .sum()
    }

    pub fn num_goal_states(&self) -> usize {
        self.goal_indices.len()
    }

    pub fn num_dead_end_states(&self) -> usize {
        self.dead_end_indices.len()
    }

    pub fn get_states(&self) -> &[State] {
        &self.states
    }

    pub fn get_initial_state(&self) -> &State {
        &self.states[0]
    }

    pub fn get_goal_states(&self) -> Vec<&State> {
        self.goal_indices
            .iter()
            .map(|&index| &self.states[index])
            .collect()
    }

    /// The dense index of `state`; panics for states outside the space.
    pub fn get_state_index(&self, state: &State) -> usize {
        *self
            .state_indices
            .get(state)
            .expect("state is not part of this state space")
    }

    pub fn get_forward_transitions(&self, state: &State) -> &[Transition] {
        &self.forward_transitions[self.get_state_index(state)]
    }

    pub fn get_backward_transitions(&self, state: &State) -> &[Transition] {
        &self.backward_transitions[self.get_state_index(state)]
    }

    pub fn is_goal_state(&self, state: &State) -> bool {
        self.distance_to_goal[self.get_state_index(state)] == 0
    }

    pub fn is_dead_end_state(&self, state: &State) -> bool {
        self.distance_to_goal[self.get_state_index(state)] < 0
    }

    pub fn get_distance_to_goal_state(&self, state: &State) -> i32 {
        self.distance_to_goal[self.get_state_index(state)]
    }

    pub fn get_distance_from_initial_state(&self, state: &State) -> i32 {
        self.distance_from_initial[self.get_state_index(state)]
    }

    pub fn get_longest_distance_to_goal_state(&self) -> i32 {
        self.distance_to_goal.iter().copied().max().unwrap_or(0).max(0)
    }

    /// Unit-cost distance between two states of the space, or [`i32::MAX`]
    /// when unreachable. The underlying all-pairs matrix is computed once on
    /// first call, by Floyd–Warshall.
    pub fn get_distance_between_states(&self, from_state: &State, to_state: &State) -> i32 {
        let mut cache = self.all_pairs.borrow_mut();
        let matrix = cache.get_or_insert_with(|| self.compute_all_pairs());
        matrix[self.get_state_index(from_state)][self.get_state_index(to_state)]
    }

    fn compute_all_pairs(&self) -> Vec<Vec<i32>> {
        let size = self.states.len();
        let mut distances = vec![vec![UNREACHABLE; size]; size];

        for (index, row) in distances.iter_mut().enumerate() {
            row[index] = 0;
        }
        for transitions in &self.forward_transitions {
            for transition in transitions {
                let source = self.get_state_index(&transition.source);
                let target = self.get_state_index(&transition.target);
                distances[source][target] = 1;
            }
        }

        for k in 0..size {
            for i in 0..size {
                let ik = distances[i][k];
                if ik == UNREACHABLE {
                    continue;
                }
                for j in 0..size {
                    let kj = distances[k][j];
                    if kj != UNREACHABLE && ik + kj < distances[i][j] {
                        distances[i][j] = ik + kj;
                    }
                }
            }
        }

        distances
    }

    pub fn sample_state(&self) -> &State {
        let index = rand::rng().random_range(0..self.states.len());
        &self.states[index]
    }

    /// Uniformly samples a state at exactly `distance` from the goal; panics
    /// when no state has that distance.
    pub fn sample_state_with_distance_to_goal(&self, distance: i32) -> &State {
        let bucket = self
            .states_by_distance
            .get(distance as usize)
            .filter(|bucket| !bucket.is_empty())
            .unwrap_or_else(|| panic!("no state with distance {distance} to sample"));
        let index = bucket[rand::rng().random_range(0..bucket.len())];
        &self.states[index]
    }

    pub fn sample_dead_end_state(&self) -> &State {
        assert!(
            !self.dead_end_indices.is_empty(),
            "no dead end states to sample"
        );
        let index =
            self.dead_end_indices[rand::rng().random_range(0..self.dead_end_indices.len())];
        &self.states[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::successor_generators::SuccessorGeneratorName;
    use crate::search::translate::translate;
    use crate::search::is_applicable;
    use crate::test_utils::*;

    #[test]
    fn blocks_state_space_is_complete() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let space = StateSpace::new(Rc::clone(&problem), &generator, usize::MAX).unwrap();

        // 73 placements of four blocks plus 52 configurations with a block
        // in hand.
        assert_eq!(space.num_states(), 125);
        assert!(space.num_goal_states() >= 1);
        assert_eq!(space.num_dead_end_states(), 0);
    }

    #[test]
    fn transitions_are_closed_under_apply() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let space = StateSpace::new(Rc::clone(&problem), &generator, usize::MAX).unwrap();

        for state in space.get_states() {
            for transition in space.get_forward_transitions(state) {
                assert!(is_applicable(&transition.action, &transition.source));
                assert_eq!(apply(&transition.action, &transition.source), transition.target);
            }
        }
    }

    #[test]
    fn goal_distances_and_buckets() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let space = StateSpace::new(Rc::clone(&problem), &generator, usize::MAX).unwrap();

        let initial = space.get_initial_state();
        assert_eq!(space.get_distance_from_initial_state(initial), 0);
        // The 6-step plan is optimal.
        assert_eq!(space.get_distance_to_goal_state(initial), 6);

        for goal_state in space.get_goal_states() {
            assert!(space.is_goal_state(goal_state));
            assert_eq!(space.get_distance_to_goal_state(goal_state), 0);
        }

        let sampled = space.sample_state_with_distance_to_goal(6);
        assert_eq!(space.get_distance_to_goal_state(sampled), 6);
    }

    #[test]
    fn pairwise_distances_match_the_initial_distances() {
        let problem = translate(SPANNER_DOMAIN_TEXT, SPANNER_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let space = StateSpace::new(Rc::clone(&problem), &generator, usize::MAX).unwrap();

        let initial = space.get_initial_state().clone();
        for state in space.get_states() {
            let direct = space.get_distance_from_initial_state(state);
            assert_eq!(space.get_distance_between_states(&initial, state), direct);
        }
    }

    #[test]
    fn spanner_has_dead_ends() {
        // Walking past the spanner makes the nut impossible to tighten.
        let problem = translate(SPANNER_DOMAIN_TEXT, SPANNER_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        let space = StateSpace::new(Rc::clone(&problem), &generator, usize::MAX).unwrap();

        assert!(space.num_dead_end_states() > 0);
        let dead_end = space.sample_dead_end_state();
        assert!(space.is_dead_end_state(dead_end));
    }

    #[test]
    fn max_states_bound_returns_none() {
        let problem = translate(GRIPPER_DOMAIN_TEXT, GRIPPER_PROBLEM_TEXT).unwrap();
        let generator = SuccessorGeneratorName::Grounded.create(Rc::clone(&problem));
        assert!(StateSpace::new(Rc::clone(&problem), &generator, 10).is_none());
    }
}
