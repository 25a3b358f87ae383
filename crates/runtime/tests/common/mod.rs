//! Deterministic scripted host shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::sync::Once;

use encore_core::{
    CharacterOracle, CharacterState, Clock, DispatchError, Effect, EffectKind, EffectOracle, Env,
    Evaluator, Millis, SpawnId, TargetOracle,
};

/// Fake host with a fixed effect catalog, a manually advanced clock, and a
/// log of every dispatch with its timestamp.
pub struct ScriptedHost {
    pub now: Cell<u64>,
    catalog: Vec<(&'static str, EffectKind, u64)>,
    values: RefCell<HashMap<String, String>>,
    not_ready: RefCell<HashSet<String>>,
    dispatched: RefCell<Vec<(String, u64)>>,
    pub stops: Cell<usize>,
    target: Cell<Option<SpawnId>>,
    spawns: RefCell<HashSet<SpawnId>>,
    pub state: Cell<Option<CharacterState>>,
    pub casting_window: Cell<bool>,
}

static TRACING: Once = Once::new();

/// `RUST_LOG`-controlled log capture for test runs.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl ScriptedHost {
    pub fn new() -> Self {
        init_tracing();
        Self {
            now: Cell::new(1000),
            catalog: vec![
                ("War March", EffectKind::Spell, 3000),
                ("Aria", EffectKind::Spell, 1000),
                ("Slumber of Silisia", EffectKind::Spell, 2000),
                ("Blade of Vesagran", EffectKind::Item, 0),
            ],
            values: RefCell::new(HashMap::new()),
            not_ready: RefCell::new(HashSet::new()),
            dispatched: RefCell::new(Vec::new()),
            stops: Cell::new(0),
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

    pub fn set_value(&self, expr: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(expr.to_owned(), value.to_owned());
    }

    pub fn set_ready(&self, name: &str, ready: bool) {
        if ready {
            self.not_ready.borrow_mut().remove(name);
        } else {
            self.not_ready.borrow_mut().insert(name.to_owned());
        }
    }

    pub fn add_spawn(&self, id: SpawnId) {
        self.spawns.borrow_mut().insert(id);
    }

    pub fn target_now(&self) -> Option<SpawnId> {
        self.target.get()
    }

    /// Name and timestamp of every dispatch so far.
    pub fn dispatches(&self) -> Vec<(String, u64)> {
        self.dispatched.borrow().clone()
    }

    pub fn dispatch_names(&self) -> Vec<String> {
        self.dispatched
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Clock for ScriptedHost {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}

impl Evaluator for ScriptedHost {
    /// Unscripted expressions echo back, so numeric literals evaluate to
    /// themselves.
    fn evaluate(&self, expr: &str) -> String {
        self.values
            .borrow()
            .get(expr)
            .cloned()
            .unwrap_or_else(|| expr.to_owned())
    }
}

impl EffectOracle for ScriptedHost {
    fn resolve(&self, name: &str) -> Option<(EffectKind, Millis)> {
        self.catalog
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|&(_, kind, ms)| (kind, Millis(ms)))
    }

    fn is_ready(&self, effect: &Effect) -> bool {
        !self.not_ready.borrow().contains(&effect.name)
    }

    fn dispatch(&self, effect: &Effect) -> Result<Millis, DispatchError> {
        let Some((_, cast_time)) = self.resolve(&effect.name) else {
            return Err(DispatchError::NotFound {
                name: effect.name.clone(),
            });
        };
        self.dispatched
            .borrow_mut()
            .push((effect.name.clone(), self.now.get()));
        Ok(cast_time)
    }

    fn stop_casting(&self) {
        self.stops.set(self.stops.get() + 1);
    }
}

impl TargetOracle for ScriptedHost {
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

impl CharacterOracle for ScriptedHost {
    fn state(&self) -> Option<CharacterState> {
        self.state.get()
    }

    fn stand(&self) {
        if let Some(state) = self.state.get() {
            self.state.set(Some(state - CharacterState::FEIGNED));
        }
    }

    fn casting_window_open(&self) -> bool {
        self.casting_window.get()
    }
}
