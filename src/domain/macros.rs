//! Macro buttons attached to a token.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::overrides::apply_overrides;
use crate::error::TokenError;

/// A macro button: the script plus how it is shown in the token's panel.
///
/// Every documented field is always present. Keys beyond the documented set
/// are kept in `extra` and exposed to the content template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macro {
    /// Script text run when the button is pressed (not validated)
    pub command: String,
    pub label: String,
    pub group: String,
    pub sortby: String,
    /// Button color key
    pub color: String,
    pub font_color: String,
    pub font_size: String,
    pub tooltip: String,
    pub hotkey: String,

    /// Caller-supplied keys outside the documented set
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Macro {
    fn default() -> Self {
        Self {
            command: String::new(),
            label: String::new(),
            group: String::new(),
            sortby: String::new(),
            color: "default".to_string(),
            font_color: "black".to_string(),
            font_size: "1.00em".to_string(),
            tooltip: String::new(),
            hotkey: "None".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl Macro {
    /// Create a macro from the defaults with `overrides` applied on top
    pub fn from_overrides(overrides: Map<String, Value>) -> Result<Self, TokenError> {
        apply_overrides(&Self::default(), overrides)
    }

    /// Shorthand for the common label/group/command triple
    pub fn new(
        label: impl Into<String>,
        group: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            group: group.into(),
            command: command.into(),
            ..Self::default()
        }
    }

    fn sorted(mut self, sortby: &str) -> Self {
        self.sortby = sortby.to_string();
        self
    }
}

const MOD_HP_COMMAND: &str = r#"[h: input(
"mode|Damage,Heal,Temp HP,Nonlethal|Choose|RADIO|ORIENT=H",
"Amt|0|Amount|TEXT"
)]
[h, switch(mode),code:
case 0: {
  [HP = HP - Amt + min(TempHP, Amt)]
  [TempHP = max(0, TempHP - Amt)]
};
case 1: { [HP = min(HP + Amt, MaxHP)] };
case 2: { [TempHP = TempHP + Amt] };
case 3: { [Nonlethal = Nonlethal + Amt] }]
[s:CurrentHitPoints]"#;

/// Saves, ability checks, skills and the HP adjustment dialog, in panel order
pub fn baseline_macros() -> Vec<Macro> {
    vec![
        Macro::new("fort", "saves", "Fort: [d20+Fortitude]"),
        Macro::new("ref", "saves", "Reflex: [d20+Reflex]"),
        Macro::new("will", "saves", "Will: [d20+Will]"),
        Macro::new("str", "skills", "Str: [d20+StrMod] (ACP: [ACP])").sorted("_1"),
        Macro::new("dex", "skills", "Dex: [d20+DexMod] (ACP: [ACP])").sorted("_2"),
        Macro::new("con", "skills", "Con: [d20+ConMod]").sorted("_3"),
        Macro::new("int", "skills", "Int: [d20+IntMod]").sorted("_4"),
        Macro::new("wis", "skills", "Wis: [d20+WisMod]").sorted("_5"),
        Macro::new("cha", "skills", "Cha: [d20+ChaMod]").sorted("_6"),
        Macro::new("perception", "skills", "Perception: [d20+Perception]"),
        Macro::new("sense motive", "skills", "Sense Motive: [d20+SenseMotive]"),
        Macro {
            label: "mod HP".to_string(),
            color: "pink".to_string(),
            sortby: "0".to_string(),
            command: MOD_HP_COMMAND.to_string(),
            ..Macro::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_defaults() {
        let m = Macro::default();
        assert_eq!(m.command, "");
        assert_eq!(m.label, "");
        assert_eq!(m.group, "");
        assert_eq!(m.sortby, "");
        assert_eq!(m.color, "default");
        assert_eq!(m.font_color, "black");
        assert_eq!(m.font_size, "1.00em");
        assert_eq!(m.tooltip, "");
        assert_eq!(m.hotkey, "None");
        assert!(m.extra.is_empty());
    }

    #[test]
    fn test_overrides_keep_other_defaults() {
        let m = Macro::from_overrides(overrides(json!({
            "label": "bite",
            "color": "red",
        })))
        .unwrap();

        assert_eq!(m.label, "bite");
        assert_eq!(m.color, "red");
        assert_eq!(m.font_color, "black");
        assert_eq!(m.hotkey, "None");
    }

    #[test]
    fn test_unknown_keys_go_to_extra() {
        let m = Macro::from_overrides(overrides(json!({
            "label": "bite",
            "min_width": "80",
            "auto_execute": false,
        })))
        .unwrap();

        assert_eq!(m.extra.get("min_width"), Some(&json!("80")));
        assert_eq!(m.extra.get("auto_execute"), Some(&json!(false)));
    }

    #[test]
    fn test_wrong_type_for_documented_field() {
        let err = Macro::from_overrides(overrides(json!({ "label": 3 }))).unwrap_err();
        assert!(matches!(err, TokenError::Attribute { ref key, .. } if key == "label"));
    }

    #[test]
    fn test_baseline_order() {
        let labels: Vec<String> = baseline_macros().into_iter().map(|m| m.label).collect();
        assert_eq!(
            labels,
            vec![
                "fort", "ref", "will", "str", "dex", "con", "int", "wis", "cha",
                "perception", "sense motive", "mod HP"
            ]
        );
    }

    #[test]
    fn test_mod_hp_macro() {
        let mod_hp = baseline_macros().pop().unwrap();
        assert_eq!(mod_hp.color, "pink");
        assert_eq!(mod_hp.sortby, "0");
        assert!(mod_hp.command.starts_with("[h: input("));
        assert!(mod_hp.command.ends_with("[s:CurrentHitPoints]"));
    }
}
