//! Automaton graph model
//!
//! A [`Graph`] is an immutable value: ordered states and transitions plus the
//! `isDfa` flag. The only way to change one is to take a [`GraphDraft`] with
//! [`Graph::clone_graph`], mutate the draft, and [`GraphDraft::commit`] it into
//! a new graph. The original stays untouched, so anything holding it for
//! comparison (dirty checks, the gallery) keeps seeing the old value.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Database, DiagramError, StateId, Token, TransitionId};

/// A state of the automaton
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: StateId,
    pub name: String,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub is_final: bool,
}

impl State {
    pub fn new(id: StateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_start: false,
            is_final: false,
        }
    }

    pub fn start(mut self) -> Self {
        self.is_start = true;
        self
    }

    pub fn accepting(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// A labeled, directed transition
///
/// Endpoints serialize as `start`/`end`; `from`/`to` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub id: TransitionId,
    #[serde(rename = "start", alias = "from")]
    pub from: StateId,
    #[serde(rename = "end", alias = "to")]
    pub to: StateId,
    pub token: Token,
}

impl Transition {
    pub fn new(id: TransitionId, from: StateId, to: StateId, token: impl Into<Token>) -> Self {
        Self {
            id,
            from,
            to,
            token: token.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphRecord {
    #[serde(default)]
    is_dfa: bool,
    #[serde(default)]
    states: Vec<State>,
    #[serde(default)]
    transitions: Vec<Transition>,
}

impl TryFrom<GraphRecord> for Graph {
    type Error = DiagramError;

    fn try_from(record: GraphRecord) -> Result<Self, Self::Error> {
        let graph = Graph {
            is_dfa: record.is_dfa,
            states: record.states,
            transitions: record.transitions,
        };
        graph.check()?;
        Ok(graph)
    }
}

/// An automaton: ordered states, ordered transitions, and the DFA flag.
///
/// State order is significant for layout only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GraphRecord")]
pub struct Graph {
    is_dfa: bool,
    states: Vec<State>,
    transitions: Vec<Transition>,
}

impl Graph {
    /// Build a graph, rejecting duplicate ids and transitions whose endpoints
    /// are not states of the graph.
    pub fn new(
        is_dfa: bool,
        states: Vec<State>,
        transitions: Vec<Transition>,
    ) -> Result<Self, DiagramError> {
        let graph = Self {
            is_dfa,
            states,
            transitions,
        };
        graph.check()?;
        Ok(graph)
    }

    fn check(&self) -> Result<(), DiagramError> {
        let mut state_ids = HashSet::new();
        for state in &self.states {
            if !state_ids.insert(state.id) {
                return Err(DiagramError::DuplicateId {
                    kind: "state",
                    id: state.id,
                });
            }
        }
        let mut transition_ids = HashSet::new();
        for t in &self.transitions {
            if !transition_ids.insert(t.id) {
                return Err(DiagramError::DuplicateId {
                    kind: "transition",
                    id: t.id,
                });
            }
            for endpoint in [t.from, t.to] {
                if !state_ids.contains(&endpoint) {
                    return Err(DiagramError::DanglingTransition {
                        id: endpoint,
                        transition: t.id,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_dfa(&self) -> bool {
        self.is_dfa
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Position of a state in the ordered state list
    pub fn state_index(&self, id: StateId) -> Option<usize> {
        self.states.iter().position(|s| s.id == id)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// Any transition going `from` → `to`
    pub fn has_transition(&self, from: StateId, to: StateId) -> bool {
        self.transitions.iter().any(|t| t.from == from && t.to == to)
    }

    /// The transition `from` → `to` labeled `token`, if any
    pub fn find_transition(&self, from: StateId, to: StateId, token: Token) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.to == to && t.token == token)
    }

    pub fn start_states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.is_start)
    }

    /// The same graph with a different DFA flag
    pub fn with_is_dfa(mut self, is_dfa: bool) -> Self {
        self.is_dfa = is_dfa;
        self
    }

    /// Deep copy into a mutable draft
    pub fn clone_graph(&self) -> GraphDraft {
        GraphDraft::new(self.clone())
    }
}

impl Database for Graph {
    type Id = StateId;
    type Node = State;
    type Edge = Transition;

    fn get_node(&self, id: StateId) -> Option<&State> {
        self.state(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    fn node_count(&self) -> usize {
        self.states.len()
    }

    fn edge_count(&self) -> usize {
        self.transitions.len()
    }
}

/// Hands out the smallest id not currently in use.
///
/// Tracks the ids below a high-water mark that are free, so allocation and
/// release never rescan the owning collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: u32,
    free: BTreeSet<u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator with every id in `used` already taken
    pub fn from_ids(used: impl IntoIterator<Item = u32>) -> Self {
        let mut allocator = Self::new();
        for id in used {
            allocator.reserve(id);
        }
        allocator
    }

    /// Take the smallest unused id
    pub fn allocate(&mut self) -> u32 {
        match self.free.pop_first() {
            Some(id) => id,
            None => {
                self.next += 1;
                self.next - 1
            }
        }
    }

    /// Mark `id` as used
    pub fn reserve(&mut self, id: u32) {
        if id >= self.next {
            self.free.extend(self.next..id);
            self.next = id + 1;
        } else {
            self.free.remove(&id);
        }
    }

    /// Return `id` to the pool
    pub fn release(&mut self, id: u32) {
        if id >= self.next {
            return;
        }
        if id + 1 == self.next {
            self.next -= 1;
            while self.next > 0 && self.free.remove(&(self.next - 1)) {
                self.next -= 1;
            }
        } else {
            self.free.insert(id);
        }
    }

    pub fn is_used(&self, id: u32) -> bool {
        id < self.next && !self.free.contains(&id)
    }
}

/// The mutable handle to a graph
///
/// Owns a deep copy; nothing reaches the source graph until the caller
/// swaps in the result of [`GraphDraft::commit`].
#[derive(Debug, Clone)]
pub struct GraphDraft {
    graph: Graph,
    state_ids: IdAllocator,
    transition_ids: IdAllocator,
}

impl GraphDraft {
    fn new(graph: Graph) -> Self {
        let state_ids = IdAllocator::from_ids(graph.states.iter().map(|s| s.id));
        let transition_ids = IdAllocator::from_ids(graph.transitions.iter().map(|t| t.id));
        Self {
            graph,
            state_ids,
            transition_ids,
        }
    }

    /// Current contents of the draft
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Finish editing and produce the new graph
    pub fn commit(self) -> Graph {
        trace!(
            states = self.graph.states.len(),
            transitions = self.graph.transitions.len(),
            "Committed graph draft"
        );
        self.graph
    }

    pub fn set_dfa(&mut self, is_dfa: bool) {
        self.graph.is_dfa = is_dfa;
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State, DiagramError> {
        self.graph
            .states
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DiagramError::UnknownState { id })
    }

    fn transition_mut(&mut self, id: TransitionId) -> Result<&mut Transition, DiagramError> {
        self.graph
            .transitions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DiagramError::UnknownTransition { id })
    }

    fn require_state(&self, id: StateId) -> Result<(), DiagramError> {
        match self.graph.state(id) {
            Some(_) => Ok(()),
            None => Err(DiagramError::UnknownState { id }),
        }
    }

    /// Append a state with the smallest unused id
    pub fn add_state(&mut self, name: impl Into<String>, is_start: bool, is_final: bool) -> StateId {
        let name = name.into();
        self.add_state_with(is_start, is_final, |_| name)
    }

    /// Append a state with the smallest unused id, naming it from that id
    pub fn add_state_with(
        &mut self,
        is_start: bool,
        is_final: bool,
        name: impl FnOnce(StateId) -> String,
    ) -> StateId {
        let id = self.state_ids.allocate();
        self.graph.states.push(State {
            id,
            name: name(id),
            is_start,
            is_final,
        });
        id
    }

    pub fn rename_state(&mut self, id: StateId, name: impl Into<String>) -> Result<(), DiagramError> {
        self.state_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_start(&mut self, id: StateId, is_start: bool) -> Result<(), DiagramError> {
        self.state_mut(id)?.is_start = is_start;
        Ok(())
    }

    pub fn set_final(&mut self, id: StateId, is_final: bool) -> Result<(), DiagramError> {
        self.state_mut(id)?.is_final = is_final;
        Ok(())
    }

    /// Remove a state and every transition touching it
    pub fn remove_state(&mut self, id: StateId) -> Result<State, DiagramError> {
        let index = self
            .graph
            .state_index(id)
            .ok_or(DiagramError::UnknownState { id })?;
        let removed = self.graph.states.remove(index);
        self.state_ids.release(id);

        let transition_ids = &mut self.transition_ids;
        self.graph.transitions.retain(|t| {
            let touches = t.from == id || t.to == id;
            if touches {
                transition_ids.release(t.id);
            }
            !touches
        });
        Ok(removed)
    }

    /// Reserve the smallest unused transition id without adding a transition
    pub fn allocate_transition_id(&mut self) -> TransitionId {
        self.transition_ids.allocate()
    }

    /// Append a transition with the smallest unused id
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        token: Token,
    ) -> Result<TransitionId, DiagramError> {
        self.require_state(from)?;
        self.require_state(to)?;
        let id = self.transition_ids.allocate();
        self.graph.transitions.push(Transition::new(id, from, to, token));
        Ok(id)
    }

    /// Append a transition that already carries its id
    pub fn insert_transition(&mut self, transition: Transition) -> Result<(), DiagramError> {
        self.require_state(transition.from)?;
        self.require_state(transition.to)?;
        if self.graph.transition(transition.id).is_some() {
            return Err(DiagramError::DuplicateId {
                kind: "transition",
                id: transition.id,
            });
        }
        self.transition_ids.reserve(transition.id);
        self.graph.transitions.push(transition);
        Ok(())
    }

    /// Remove the given transitions. Fails without touching the draft if any
    /// id is unknown.
    pub fn remove_transitions(
        &mut self,
        ids: &BTreeSet<TransitionId>,
    ) -> Result<Vec<Transition>, DiagramError> {
        if let Some(&id) = ids.iter().find(|&&id| self.graph.transition(id).is_none()) {
            return Err(DiagramError::UnknownTransition { id });
        }
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .graph
            .transitions
            .drain(..)
            .partition(|t| ids.contains(&t.id));
        self.graph.transitions = kept;
        for t in &removed {
            self.transition_ids.release(t.id);
        }
        Ok(removed)
    }

    pub fn set_transition_from(&mut self, id: TransitionId, from: StateId) -> Result<(), DiagramError> {
        self.require_state(from)?;
        self.transition_mut(id)?.from = from;
        Ok(())
    }

    pub fn set_transition_to(&mut self, id: TransitionId, to: StateId) -> Result<(), DiagramError> {
        self.require_state(to)?;
        self.transition_mut(id)?.to = to;
        Ok(())
    }
}
