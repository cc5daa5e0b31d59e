//! Stable-key registry of readable/writable game state.
//!
//! Persistence lives outside the engine, but it needs to read and write game
//! values by name. [`AttributeRegistry`] binds a stable key such as
//! `"player.hp"` to a getter/setter pair over a shared object once, at
//! registration time. Values cross the boundary as [`serde_json::Value`], so
//! any serde type works.
//!
//! Bindings hold a [`Weak`] reference: the registry never keeps an object
//! alive, and reading or writing a key whose object is gone is an error.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::EngineError;

type Getter = Box<dyn Fn() -> Result<Value, String>>;
type Setter = Box<dyn Fn(Value) -> Result<(), String>>;

struct Binding {
    get: Getter,
    set: Setter,
}

/// Outcome of [`AttributeRegistry::apply`].
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: usize,
    pub errors: Vec<EngineError>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Default)]
pub struct AttributeRegistry {
    bindings: FxHashMap<String, Binding>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to a field of `target` through `get`/`set`.
    ///
    /// ```ignore
    /// registry.bind("player.hp", &player, |p: &Player| p.hp, |p, hp| p.hp = hp)?;
    /// ```
    pub fn bind<T, V, G, S>(&mut self, key: &str, target: &Rc<RefCell<T>>, get: G, set: S) -> Result<(), EngineError>
    where
        T: 'static,
        V: Serialize + DeserializeOwned + 'static,
        G: Fn(&T) -> V + 'static,
        S: Fn(&mut T, V) + 'static,
    {
        if self.bindings.contains_key(key) {
            return Err(EngineError::attribute(key, "already bound"));
        }

        let weak: Weak<RefCell<T>> = Rc::downgrade(target);
        let get = move || -> Result<Value, String> {
            let target = weak.upgrade().ok_or("target dropped")?;
            let target = target.try_borrow().map_err(|_| "target is mutably borrowed")?;
            serde_json::to_value(get(&target)).map_err(|e| e.to_string())
        };

        let weak: Weak<RefCell<T>> = Rc::downgrade(target);
        let set = move |value: Value| -> Result<(), String> {
            let value: V = serde_json::from_value(value).map_err(|e| e.to_string())?;
            let target = weak.upgrade().ok_or("target dropped")?;
            let mut target = target.try_borrow_mut().map_err(|_| "target is borrowed")?;
            set(&mut target, value);
            Ok(())
        };

        self.bindings.insert(
            key.to_owned(),
            Binding {
                get: Box::new(get),
                set: Box::new(set),
            },
        );
        Ok(())
    }

    pub fn unbind(&mut self, key: &str) -> bool {
        self.bindings.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// Bound keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, key: &str) -> Result<Value, EngineError> {
        let binding = self
            .bindings
            .get(key)
            .ok_or_else(|| EngineError::attribute(key, "not bound"))?;
        (binding.get)().map_err(|reason| EngineError::attribute(key, reason))
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), EngineError> {
        let binding = self
            .bindings
            .get(key)
            .ok_or_else(|| EngineError::attribute(key, "not bound"))?;
        (binding.set)(value).map_err(|reason| EngineError::attribute(key, reason))
    }

    /// Current value of every readable key. Unreadable keys are logged and
    /// left out.
    pub fn snapshot(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for key in self.keys() {
            match self.get(key) {
                Ok(value) => {
                    out.insert(key.to_owned(), value);
                }
                Err(err) => log::warn!(target: "novaengine::attributes", "{err}"),
            }
        }
        out
    }

    /// Write every entry of `values` back through its setter.
    pub fn apply(&self, values: &Map<String, Value>) -> ApplyReport {
        let mut report = ApplyReport::default();
        for (key, value) in values {
            match self.set(key, value.clone()) {
                Ok(()) => report.applied += 1,
                Err(err) => report.errors.push(err),
            }
        }
        report
    }
}

impl std::fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Player {
        hp: i32,
        name: String,
    }

    fn player() -> Rc<RefCell<Player>> {
        Rc::new(RefCell::new(Player {
            hp: 10,
            name: "ada".into(),
        }))
    }

    fn registry(player: &Rc<RefCell<Player>>) -> AttributeRegistry {
        let mut reg = AttributeRegistry::new();
        reg.bind("player.hp", player, |p: &Player| p.hp, |p, hp| p.hp = hp).unwrap();
        reg.bind("player.name", player, |p: &Player| p.name.clone(), |p, n| p.name = n)
            .unwrap();
        reg
    }

    #[test]
    fn snapshot_reads_bound_values() {
        let p = player();
        let reg = registry(&p);
        let snap = reg.snapshot();
        assert_eq!(snap.get("player.hp"), Some(&json!(10)));
        assert_eq!(snap.get("player.name"), Some(&json!("ada")));
    }

    #[test]
    fn apply_writes_back_and_reports_problems() {
        let p = player();
        let reg = registry(&p);
        let mut values = Map::new();
        values.insert("player.hp".into(), json!(3));
        values.insert("player.name".into(), json!(42));
        values.insert("enemy.hp".into(), json!(1));

        let report = reg.apply(&values);
        assert_eq!(report.applied, 1);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(p.borrow().hp, 3);
        assert_eq!(p.borrow().name, "ada");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let p = player();
        let mut reg = registry(&p);
        let err = reg.bind("player.hp", &p, |p: &Player| p.hp, |p, hp| p.hp = hp);
        assert!(matches!(err, Err(EngineError::Attribute { .. })));
    }

    #[test]
    fn dropped_target_is_reported() {
        let p = player();
        let reg = registry(&p);
        drop(p);
        assert!(reg.get("player.hp").is_err());
        assert!(reg.snapshot().is_empty());
    }
}
