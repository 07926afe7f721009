//! Scenario asset types.
//!
//! A scenario is the script of one story chapter as served by the
//! Bestdori asset mirror. Only the fields needed to render prose are
//! modelled; everything else in the asset is ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

// ============================================================================
// Asset wrapper
// ============================================================================

/// A scenario asset file as served by the mirror.
///
/// The playable script lives under the top-level `Base` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioAsset {
    /// The scenario script.
    #[serde(rename = "Base")]
    pub base: Scenario,
}

impl ScenarioAsset {
    /// Parses a scenario asset from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MalformedScenario`] if the text is not valid
    /// JSON or a required field is missing.
    pub fn from_json(text: &str) -> Result<Self, RenderError> {
        serde_json::from_str(text).map_err(|e| RenderError::MalformedScenario {
            snippet: None,
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// Scenario
// ============================================================================

/// The script of one chapter.
///
/// `snippets` is in playback order; each snippet refers into one of the
/// data arrays by position. An absent array deserializes as empty, so any
/// reference into it is out of range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Script actions in playback order.
    #[serde(default)]
    pub snippets: Vec<Snippet>,

    /// Dialogue lines, referenced by [`ActionType::Talk`] snippets.
    #[serde(default)]
    pub talk_data: Vec<DialogueLine>,

    /// Special effects, referenced by [`ActionType::SpecialEffect`] snippets.
    #[serde(default)]
    pub special_effect_data: Vec<EffectRecord>,
}

/// A single script action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// What kind of action this is.
    pub action_type: ActionType,

    /// Zero-based index into `talk_data` or `special_effect_data`,
    /// depending on `action_type`.
    pub reference_index: usize,
}

impl Snippet {
    /// Creates a snippet.
    #[must_use]
    pub const fn new(action_type: ActionType, reference_index: usize) -> Self {
        Self {
            action_type,
            reference_index,
        }
    }
}

/// Script action kind.
///
/// The mirror encodes these as integers. Only dialogue and special effects
/// produce prose; every other code is carried as [`ActionType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ActionType {
    /// A character speaks a line (code 1).
    Talk,
    /// A screen effect such as a title card (code 6).
    SpecialEffect,
    /// Any other action (motions, sounds, layout changes, ...).
    Other(u32),
}

impl ActionType {
    /// Wire code for dialogue actions.
    pub const TALK: u32 = 1;
    /// Wire code for special-effect actions.
    pub const SPECIAL_EFFECT: u32 = 6;
}

impl From<u32> for ActionType {
    fn from(code: u32) -> Self {
        match code {
            Self::TALK => Self::Talk,
            Self::SPECIAL_EFFECT => Self::SpecialEffect,
            other => Self::Other(other),
        }
    }
}

impl From<ActionType> for u32 {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Talk => ActionType::TALK,
            ActionType::SpecialEffect => ActionType::SPECIAL_EFFECT,
            ActionType::Other(code) => code,
        }
    }
}

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Name shown in the dialogue window.
    #[serde(rename = "windowDisplayName")]
    pub speaker_name: String,

    /// Spoken text; may contain line breaks.
    pub body: String,
}

impl DialogueLine {
    /// Creates a dialogue line.
    #[must_use]
    pub fn new(speaker_name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            speaker_name: speaker_name.into(),
            body: body.into(),
        }
    }
}

/// A special effect record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectRecord {
    /// Effect kind.
    pub effect_type: EffectType,

    /// Text payload; the title text for title cards.
    #[serde(default)]
    pub string_val: String,
}

impl EffectRecord {
    /// Creates an effect record.
    #[must_use]
    pub fn new(effect_type: EffectType, string_val: impl Into<String>) -> Self {
        Self {
            effect_type,
            string_val: string_val.into(),
        }
    }
}

/// Special effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum EffectType {
    /// A title card shown between scenes (code 8).
    Title,
    /// Fades, flashes, shakes and the rest.
    Other(u32),
}

impl EffectType {
    /// Wire code for title cards.
    pub const TITLE: u32 = 8;
}

impl From<u32> for EffectType {
    fn from(code: u32) -> Self {
        if code == Self::TITLE {
            Self::Title
        } else {
            Self::Other(code)
        }
    }
}

impl From<EffectType> for u32 {
    fn from(effect: EffectType) -> Self {
        match effect {
            EffectType::Title => EffectType::TITLE,
            EffectType::Other(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET: &str = r#"{
        "Base": {
            "scenarioSceneId": "event1-01",
            "snippets": [
                {"actionType": 6, "progressType": 1, "referenceIndex": 0, "delay": 0.0},
                {"actionType": 1, "progressType": 1, "referenceIndex": 0, "delay": 0.0},
                {"actionType": 2, "progressType": 1, "referenceIndex": 0, "delay": 0.0}
            ],
            "talkData": [
                {"talkCharacters": [{"characterId": 1}], "windowDisplayName": "Kasumi", "body": "Hi!", "voices": []}
            ],
            "specialEffectData": [
                {"effectType": 8, "stringVal": "Day One", "stringValSub": "", "duration": 1.5}
            ]
        }
    }"#;

    #[test]
    fn parses_asset_and_ignores_unknown_fields() {
        let asset = ScenarioAsset::from_json(ASSET).unwrap();
        let scenario = asset.base;

        assert_eq!(scenario.snippets.len(), 3);
        assert_eq!(scenario.snippets[0].action_type, ActionType::SpecialEffect);
        assert_eq!(scenario.snippets[1].action_type, ActionType::Talk);
        assert_eq!(scenario.snippets[2].action_type, ActionType::Other(2));
        assert_eq!(scenario.talk_data[0], DialogueLine::new("Kasumi", "Hi!"));
        assert_eq!(scenario.special_effect_data[0].effect_type, EffectType::Title);
        assert_eq!(scenario.special_effect_data[0].string_val, "Day One");
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let asset = ScenarioAsset::from_json(r#"{"Base": {"snippets": []}}"#).unwrap();
        assert!(asset.base.talk_data.is_empty());
        assert!(asset.base.special_effect_data.is_empty());
    }

    #[test]
    fn missing_base_is_malformed() {
        let err = ScenarioAsset::from_json(r#"{"snippets": []}"#).unwrap_err();
        assert!(matches!(err, RenderError::MalformedScenario { .. }));
    }

    #[test]
    fn missing_dialogue_body_is_malformed() {
        let text = r#"{"Base": {"talkData": [{"windowDisplayName": "Arisa"}]}}"#;
        let err = ScenarioAsset::from_json(text).unwrap_err();
        assert!(err.to_string().contains("body"), "{err}");
    }

    #[test]
    fn action_codes_survive_serialization() {
        for code in [0_u32, 1, 2, 6, 8, 99] {
            let action = ActionType::from(code);
            assert_eq!(u32::from(action), code);
            let effect = EffectType::from(code);
            assert_eq!(u32::from(effect), code);
        }
    }
}
