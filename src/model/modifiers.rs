//! Request/response modifier chain for a backend.
//!
//! # States
//! - Empty: no modifier registered, nothing is emitted
//! - Single: exactly one `add` so far, emitted flat as `{name: payload}`
//! - Enveloped: two or more `add` calls, emitted as a `fifo.Group` holding
//!   every registered modifier
//!
//! # State Transitions
//! ```text
//! Empty → Single: first add
//! Single → Enveloped: any further add, even under the same name
//! Enveloped → Enveloped: add upserts by name, insertion order is kept
//! ```
//!
//! The flat-then-enveloped shape is what existing gateway configurations
//! expect. `ModifierLayout::AlwaysEnvelope` emits the envelope from the first
//! modifier on.

use serde_json::{json, Map, Value};

use crate::model::vocabulary::Scope;

/// Modifier name that wraps several modifiers into one chain.
pub const FIFO_GROUP: &str = "fifo.Group";

/// How the chain is rendered into the extension map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModifierLayout {
    /// Flat for the first modifier, enveloped afterwards.
    #[default]
    Compatible,
    /// Always wrap in a `fifo.Group`.
    AlwaysEnvelope,
}

/// One named transformation directive.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierEntry {
    pub name: String,
    pub scope: Vec<Scope>,
    /// Directive settings besides `scope`.
    pub params: Map<String, Value>,
}

impl ModifierEntry {
    pub fn new(name: impl Into<String>, scope: Vec<Scope>, params: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            scope,
            params,
        }
    }

    /// Payload as the modifier plugin reads it: `scope` followed by the params.
    pub fn payload(&self) -> Value {
        let mut out = Map::new();
        out.insert("scope".to_string(), json!(self.scope));
        for (key, value) in &self.params {
            out.insert(key.clone(), value.clone());
        }
        Value::Object(out)
    }
}

/// Accumulated modifiers of one backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModifierChain {
    #[default]
    Empty,
    Single(ModifierEntry),
    Enveloped(Vec<ModifierEntry>),
}

impl ModifierChain {
    /// Register `entry`, replacing an existing entry of the same name in place.
    pub fn add(&mut self, entry: ModifierEntry) {
        *self = match std::mem::take(self) {
            ModifierChain::Empty => ModifierChain::Single(entry),
            ModifierChain::Single(first) => {
                let mut entries = vec![first];
                upsert(&mut entries, entry);
                ModifierChain::Enveloped(entries)
            }
            ModifierChain::Enveloped(mut entries) => {
                upsert(&mut entries, entry);
                ModifierChain::Enveloped(entries)
            }
        };
        tracing::debug!(modifiers = self.len(), "Modifier registered");
    }

    /// Number of distinct modifier names registered.
    pub fn len(&self) -> usize {
        match self {
            ModifierChain::Empty => 0,
            ModifierChain::Single(_) => 1,
            ModifierChain::Enveloped(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ModifierChain::Empty)
    }

    /// Registered entries in insertion order.
    pub fn entries(&self) -> &[ModifierEntry] {
        match self {
            ModifierChain::Empty => &[],
            ModifierChain::Single(entry) => std::slice::from_ref(entry),
            ModifierChain::Enveloped(entries) => entries,
        }
    }

    /// Extension payload for the current state, `None` when empty.
    pub fn render(&self, layout: ModifierLayout) -> Option<Value> {
        match (self, layout) {
            (ModifierChain::Empty, _) => None,
            (ModifierChain::Single(entry), ModifierLayout::Compatible) => {
                let mut out = Map::new();
                out.insert(entry.name.clone(), entry.payload());
                Some(Value::Object(out))
            }
            _ => Some(envelope(self.entries())),
        }
    }
}

fn upsert(entries: &mut Vec<ModifierEntry>, entry: ModifierEntry) {
    match entries.iter_mut().find(|e| e.name == entry.name) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

fn envelope(entries: &[ModifierEntry]) -> Value {
    let mut modifiers = Map::new();
    for entry in entries {
        modifiers.insert(entry.name.clone(), entry.payload());
    }
    let mut out = Map::new();
    out.insert(
        FIFO_GROUP.to_string(),
        json!({
            "scope": [Scope::Request, Scope::Response],
            "aggregateErrors": true,
            "modifiers": modifiers,
        }),
    );
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blacklist(names: &[&str]) -> ModifierEntry {
        let mut params = Map::new();
        params.insert("names".into(), json!(names));
        ModifierEntry::new("header.Blacklist", vec![Scope::Response], params)
    }

    fn header(name: &str, value: &str) -> ModifierEntry {
        let mut params = Map::new();
        params.insert("name".into(), json!(name));
        params.insert("value".into(), json!(value));
        ModifierEntry::new("header.Modifier", vec![Scope::Request], params)
    }

    #[test]
    fn test_empty_renders_nothing() {
        let chain = ModifierChain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.render(ModifierLayout::Compatible), None);
    }

    #[test]
    fn test_first_modifier_is_flat() {
        let mut chain = ModifierChain::default();
        chain.add(blacklist(&["X-Foo"]));

        assert_eq!(
            chain.render(ModifierLayout::Compatible).unwrap(),
            json!({"header.Blacklist": {"scope": ["response"], "names": ["X-Foo"]}})
        );
    }

    #[test]
    fn test_second_modifier_envelopes_all() {
        let mut chain = ModifierChain::default();
        chain.add(blacklist(&["X-Foo"]));
        chain.add(header("X-Bar", "1"));

        assert_eq!(
            chain.render(ModifierLayout::Compatible).unwrap(),
            json!({
                "fifo.Group": {
                    "scope": ["request", "response"],
                    "aggregateErrors": true,
                    "modifiers": {
                        "header.Blacklist": {"scope": ["response"], "names": ["X-Foo"]},
                        "header.Modifier": {"scope": ["request"], "name": "X-Bar", "value": "1"},
                    }
                }
            })
        );
    }

    #[test]
    fn test_readding_same_name_still_envelopes() {
        let mut chain = ModifierChain::default();
        chain.add(header("A", "1"));
        chain.add(header("A", "2"));

        assert_eq!(chain.len(), 1);
        let rendered = chain.render(ModifierLayout::Compatible).unwrap();
        assert_eq!(
            rendered["fifo.Group"]["modifiers"]["header.Modifier"]["value"],
            json!("2")
        );
    }

    #[test]
    fn test_upsert_keeps_insertion_order() {
        let mut chain = ModifierChain::default();
        chain.add(header("A", "1"));
        chain.add(blacklist(&["X"]));
        chain.add(header("B", "2"));

        let names: Vec<_> = chain.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["header.Modifier", "header.Blacklist"]);
        assert_eq!(chain.entries()[0].params["value"], json!("2"));

        let rendered = chain.render(ModifierLayout::Compatible).unwrap();
        let keys: Vec<_> = rendered["fifo.Group"]["modifiers"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["header.Modifier", "header.Blacklist"]);
    }

    #[test]
    fn test_always_envelope_layout() {
        let mut chain = ModifierChain::default();
        chain.add(blacklist(&["X-Foo"]));

        let rendered = chain.render(ModifierLayout::AlwaysEnvelope).unwrap();
        assert_eq!(rendered["fifo.Group"]["aggregateErrors"], json!(true));
        assert_eq!(
            rendered["fifo.Group"]["modifiers"]["header.Blacklist"]["names"],
            json!(["X-Foo"])
        );
    }
}
