/// Platform-agnostic keyboard handling
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    FocusLost,
    VisibilityChanged { visible: bool },
}

/// Canonical form of a key identifier: lower-cased, with "space" spelled as the literal " "
pub fn normalize_key(key: &str) -> String {
    let lower = key.to_lowercase();
    if lower == "space" {
        " ".to_string()
    } else {
        lower
    }
}

/// Held-key map, written by key events and sampled once per frame
#[derive(Debug, Default)]
pub struct InputState {
    keys: HashMap<String, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.set_key(key, true),
            InputEvent::KeyUp(key) => self.set_key(key, false),
            InputEvent::FocusLost | InputEvent::VisibilityChanged { .. } => self.clear_keys(),
        }
    }

    pub fn set_key(&mut self, key: &str, held: bool) {
        self.keys.insert(normalize_key(key), held);
    }

    /// Mark a key as released without a key-up event (used to consume a jump)
    pub fn release(&mut self, key: &str) {
        self.set_key(key, false);
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.keys.get(&normalize_key(key)).copied().unwrap_or(false)
    }

    pub fn clear_keys(&mut self) {
        self.keys.values_mut().for_each(|held| *held = false);
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            held: self
                .keys
                .iter()
                .filter(|(_, held)| **held)
                .map(|(key, _)| key.clone())
                .collect(),
        }
    }
}

/// Keys held at the top of a frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: HashSet<String>,
}

impl InputSnapshot {
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            held: keys.into_iter().map(|k| normalize_key(k.as_ref())).collect(),
        }
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&normalize_key(key))
    }

    pub fn any_held(&self, keys: &[String]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }
}

/// Key mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub orbit_left: Vec<String>,
    pub orbit_right: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|k| normalize_key(k)).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: keys(&["w", "ArrowUp"]),
            backward: keys(&["s", "ArrowDown"]),
            left: keys(&["a", "ArrowLeft"]),
            right: keys(&["d", "ArrowRight"]),
            jump: keys(&[" ", "Spacebar"]),
            orbit_left: keys(&["q"]),
            orbit_right: keys(&["e"]),
        }
    }
}

impl KeyBindings {
    /// Arrow keys turn the camera instead of moving the actor
    pub fn arrows_orbit() -> Self {
        Self {
            forward: keys(&["w", "ArrowUp"]),
            backward: keys(&["s", "ArrowDown"]),
            left: keys(&["a"]),
            right: keys(&["d"]),
            jump: keys(&[" ", "Spacebar"]),
            orbit_left: keys(&["ArrowLeft", "q"]),
            orbit_right: keys(&["ArrowRight", "e"]),
        }
    }
}

/// Movement request for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// High-level input processor
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn intent(&self, input: &InputSnapshot) -> MoveIntent {
        MoveIntent {
            forward: input.any_held(&self.bindings.forward),
            backward: input.any_held(&self.bindings.backward),
            left: input.any_held(&self.bindings.left),
            right: input.any_held(&self.bindings.right),
            jump: input.any_held(&self.bindings.jump),
        }
    }

    /// -1 (orbit left), 0, or 1 (orbit right)
    pub fn orbit_axis(&self, input: &InputSnapshot) -> f32 {
        let mut axis = 0.0;
        if input.any_held(&self.bindings.orbit_left) {
            axis -= 1.0;
        }
        if input.any_held(&self.bindings.orbit_right) {
            axis += 1.0;
        }
        axis
    }

    pub fn jump_keys(&self) -> &[String] {
        &self.bindings.jump
    }

    /// Keys whose browser default (scrolling) should be suppressed
    pub fn is_game_key(&self, key: &str) -> bool {
        let key = normalize_key(key);
        let b = &self.bindings;
        [&b.forward, &b.backward, &b.left, &b.right, &b.jump, &b.orbit_left, &b.orbit_right]
            .iter()
            .any(|list| list.iter().any(|k| normalize_key(k) == key))
    }
}

/// A key event scheduled for a given frame, written `frame:key+` (press) or `frame:key-` (release)
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedKey {
    pub frame: u64,
    pub event: InputEvent,
}

/// Errors from parsing a key script
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum KeyScriptError {
    #[error("entry {0:?} is not of the form frame:key+ or frame:key-")]
    Malformed(String),
    #[error("entry {0:?} has a bad frame number")]
    BadFrame(String),
}

/// Parse a comma-separated key script, e.g. `0:d+,30:d-,45:space+`, sorted by frame
pub fn parse_key_script(script: &str) -> Result<Vec<ScriptedKey>, KeyScriptError> {
    let mut entries = Vec::new();
    for raw in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (frame, rest) = raw
            .split_once(':')
            .ok_or_else(|| KeyScriptError::Malformed(raw.to_string()))?;
        let frame: u64 = frame
            .trim()
            .parse()
            .map_err(|_| KeyScriptError::BadFrame(raw.to_string()))?;
        let event = if let Some(key) = rest.strip_suffix('+') {
            InputEvent::KeyDown(key.to_string())
        } else if let Some(key) = rest.strip_suffix('-') {
            InputEvent::KeyUp(key.to_string())
        } else {
            return Err(KeyScriptError::Malformed(raw.to_string()));
        };
        if matches!(&event, InputEvent::KeyDown(k) | InputEvent::KeyUp(k) if k.is_empty()) {
            return Err(KeyScriptError::Malformed(raw.to_string()));
        }
        entries.push(ScriptedKey { frame, event });
    }
    entries.sort_by_key(|e| e.frame);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_script() {
        let script = parse_key_script("30:d-, 0:d+,45:space+").unwrap();
        assert_eq!(
            script,
            vec![
                ScriptedKey { frame: 0, event: InputEvent::KeyDown("d".to_string()) },
                ScriptedKey { frame: 30, event: InputEvent::KeyUp("d".to_string()) },
                ScriptedKey { frame: 45, event: InputEvent::KeyDown("space".to_string()) },
            ]
        );
        assert!(parse_key_script("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_key_script_errors() {
        assert!(matches!(parse_key_script("d+"), Err(KeyScriptError::Malformed(_))));
        assert!(matches!(parse_key_script("x:d+"), Err(KeyScriptError::BadFrame(_))));
        assert!(matches!(parse_key_script("3:d"), Err(KeyScriptError::Malformed(_))));
        assert!(matches!(parse_key_script("3:+"), Err(KeyScriptError::Malformed(_))));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown("W".to_string()));
        assert!(input.is_key_pressed("w"));
        input.process_event(&InputEvent::KeyUp("w".to_string()));
        assert!(!input.is_key_pressed("W"));
    }

    #[test]
    fn test_focus_loss_releases_everything() {
        let mut input = InputState::new();
        input.set_key("a", true);
        input.set_key(" ", true);
        input.process_event(&InputEvent::FocusLost);
        let snap = input.snapshot();
        assert!(!snap.is_held("a") && !snap.is_held(" "));
    }

    #[test]
    fn test_snapshot_is_detached_from_later_events() {
        let mut input = InputState::new();
        input.set_key("d", true);
        let snap = input.snapshot();
        input.set_key("d", false);
        assert!(snap.is_held("D"));
        assert!(!input.snapshot().is_held("d"));
    }

    #[test]
    fn test_unknown_keys_are_ignored_by_intent() {
        let processor = InputProcessor::default();
        let intent = processor.intent(&InputSnapshot::from_keys(["F13", "Tab"]));
        assert_eq!(intent, MoveIntent::default());
    }

    #[test]
    fn test_intent_from_default_bindings() {
        let processor = InputProcessor::default();
        let intent = processor.intent(&InputSnapshot::from_keys(["ArrowUp", "Space", "d"]));
        assert!(intent.forward && intent.jump && intent.right);
        assert!(!intent.left && !intent.backward);
    }

    #[test]
    fn test_game_keys_from_json_bindings() {
        let bindings: KeyBindings =
            serde_json::from_str(r#"{ "forward": ["ArrowUp"], "jump": ["Space"], "left": ["A"] }"#).unwrap();
        let processor = InputProcessor::new(bindings);
        assert!(processor.is_game_key("ArrowUp"));
        assert!(processor.is_game_key("arrowup"));
        assert!(processor.is_game_key(" "));
        assert!(processor.is_game_key("a"));
        assert!(!processor.is_game_key("ArrowDown"));

        let intent = processor.intent(&InputSnapshot::from_keys(["arrowup", " "]));
        assert!(intent.forward && intent.jump);
    }

    #[test]
    fn test_orbit_bindings_take_arrows() {
        let processor = InputProcessor::new(KeyBindings::arrows_orbit());
        let snap = InputSnapshot::from_keys(["ArrowLeft"]);
        assert_eq!(processor.orbit_axis(&snap), -1.0);
        assert!(!processor.intent(&snap).left);
        assert!(processor.is_game_key("ARROWRIGHT"));
        assert!(!processor.is_game_key("x"));
    }
}
