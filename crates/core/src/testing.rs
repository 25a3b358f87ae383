//! Deterministic stub host shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::effect::{Effect, EffectKind};
use crate::error::DispatchError;
use crate::host::{CharacterOracle, CharacterState, Clock, EffectOracle, Env, Evaluator,
    TargetOracle};
use crate::types::{Millis, SpawnId};

/// Scripted host: manual clock, echoing evaluator, recording cast primitive.
///
/// The evaluator echoes any expression it has no scripted reply for, so
/// numeric literals ("180", "1") evaluate to themselves just like the real
/// calculator would.
pub struct StubHost {
    pub now: Cell<u64>,
    values: RefCell<HashMap<String, String>>,
    not_ready: RefCell<HashSet<String>>,
    fail_dispatch: RefCell<HashSet<String>>,
    pub dispatched: RefCell<Vec<String>>,
    pub stops: Cell<usize>,
    pub stands: Cell<usize>,
    target: Cell<Option<SpawnId>>,
    spawns: RefCell<HashSet<SpawnId>>,
    pub state: Cell<Option<CharacterState>>,
    pub casting_window: Cell<bool>,
}

impl StubHost {
    pub fn new() -> Self {
        Self {
            now: Cell::new(1000),
            values: RefCell::new(HashMap::new()),
            not_ready: RefCell::new(HashSet::new()),
            fail_dispatch: RefCell::new(HashSet::new()),
            dispatched: RefCell::new(Vec::new()),
            stops: Cell::new(0),
            stands: Cell::new(0),
            target: Cell::new(None),
            spawns: RefCell::new(HashSet::new()),
            state: Cell::new(Some(CharacterState::empty())),
            casting_window: Cell::new(false),
        }
    }

    pub fn env(&self) -> Env<'_> {
        Env::new(self, self, self, self, self)
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set_value(&self, expr: &str, reply: &str) {
        self.values
            .borrow_mut()
            .insert(expr.to_owned(), reply.to_owned());
    }

    pub fn set_ready(&self, name: &str, ready: bool) {
        if ready {
            self.not_ready.borrow_mut().remove(name);
        } else {
            self.not_ready.borrow_mut().insert(name.to_owned());
        }
    }

    pub fn fail_dispatch_of(&self, name: &str) {
        self.fail_dispatch.borrow_mut().insert(name.to_owned());
    }

    pub fn clear_dispatch_failures(&self) {
        self.fail_dispatch.borrow_mut().clear();
    }

    pub fn target_now(&self) -> Option<SpawnId> {
        self.target.get()
    }

    pub fn add_spawn(&self, id: SpawnId) {
        self.spawns.borrow_mut().insert(id);
    }

    pub fn remove_spawn(&self, id: SpawnId) {
        self.spawns.borrow_mut().remove(&id);
        if self.target.get() == Some(id) {
            self.target.set(None);
        }
    }

    pub fn target_directly(&self, id: SpawnId) {
        self.add_spawn(id);
        self.target.set(Some(id));
    }

    pub fn dispatch_log(&self) -> Vec<String> {
        self.dispatched.borrow().clone()
    }
}

impl Clock for StubHost {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}

impl Evaluator for StubHost {
    fn evaluate(&self, expr: &str) -> String {
        self.values
            .borrow()
            .get(expr)
            .cloned()
            .unwrap_or_else(|| expr.to_owned())
    }
}

impl EffectOracle for StubHost {
    fn resolve(&self, name: &str) -> Option<(EffectKind, Millis)> {
        // Unit tests build descriptors by hand; resolution is exercised in
        // the profile crate with its own stub.
        let _ = name;
        None
    }

    fn is_ready(&self, effect: &Effect) -> bool {
        !self.not_ready.borrow().contains(&effect.name)
    }

    fn dispatch(&self, effect: &Effect) -> Result<Millis, DispatchError> {
        if self.fail_dispatch.borrow().contains(&effect.name) {
            return Err(DispatchError::NotFound {
                name: effect.name.clone(),
            });
        }
        self.dispatched.borrow_mut().push(effect.name.clone());
        Ok(effect.cast_time)
    }

    fn stop_casting(&self) {
        self.stops.set(self.stops.get() + 1);
    }
}

impl TargetOracle for StubHost {
    fn current_target(&self) -> Option<SpawnId> {
        self.target.get()
    }

    fn set_target(&self, id: SpawnId) -> bool {
        if self.spawns.borrow().contains(&id) {
            self.target.set(Some(id));
            true
        } else {
            false
        }
    }
}

impl CharacterOracle for StubHost {
    fn state(&self) -> Option<CharacterState> {
        self.state.get()
    }

    fn stand(&self) {
        self.stands.set(self.stands.get() + 1);
        if let Some(state) = self.state.get() {
            self.state.set(Some(state.difference(CharacterState::FEIGNED)));
        }
    }

    fn casting_window_open(&self) -> bool {
        self.casting_window.get()
    }
}
