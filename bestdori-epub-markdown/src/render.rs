//! Scenario-to-markdown rendering.
//!
//! A scenario is rendered in a single pass over its snippets. The only
//! state carried between snippets is the output built so far, whose tail
//! decides whether a title card needs a divider in front of it.
//!
//! Output shape per snippet:
//!
//! | Snippet | Output |
//! |---------|--------|
//! | dialogue | `**{speaker}:** {body}` + blank line |
//! | title card | optional `---` + blank line, then `**-- {title} --**` + blank line |
//! | anything else | nothing |

use bestdori_epub_core::{ActionType, EffectType, RenderError, Scenario};

use crate::escape::push_escaped;

/// Horizontal rule placed between scenes.
pub const DIVIDER: &str = "---\n\n";

/// Tail left behind by a rendered title card.
pub const TITLE_CLOSE: &str = "--**\n\n";

// ============================================================================
// Separator policy
// ============================================================================

/// Decides when a title card gets a divider in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorPolicy {
    /// Insert a divider unless the output is empty, already ends in a
    /// divider, or already ends in a title card.
    #[default]
    Deduplicate,

    /// Reproduce older output byte for byte: the suffix checks are joined
    /// with OR, so a divider goes in front of every title card except the
    /// very first thing rendered.
    Legacy,
}

impl SeparatorPolicy {
    /// Whether a divider goes before a title card appended to `rendered`.
    #[must_use]
    pub fn wants_divider(self, rendered: &str) -> bool {
        let ends_in_divider = rendered.ends_with(DIVIDER);
        let ends_in_title = rendered.ends_with(TITLE_CLOSE);
        match self {
            Self::Deduplicate => !rendered.is_empty() && !ends_in_divider && !ends_in_title,
            Self::Legacy => (!ends_in_divider || !ends_in_title) && !rendered.is_empty(),
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders scenarios to markdown fragments.
///
/// Holds configuration only; each call owns its own output buffer, so a
/// single renderer can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    separators: SeparatorPolicy,
}

impl Renderer {
    /// Creates a renderer with the default separator policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            separators: SeparatorPolicy::Deduplicate,
        }
    }

    /// Sets the separator policy.
    #[must_use]
    pub const fn with_separator_policy(mut self, policy: SeparatorPolicy) -> Self {
        self.separators = policy;
        self
    }

    /// The active separator policy.
    #[must_use]
    pub const fn separator_policy(&self) -> SeparatorPolicy {
        self.separators
    }

    /// Renders `scenario` to a markdown fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MalformedScenario`] if a snippet refers past
    /// the end of `talk_data` or `special_effect_data`. Nothing rendered
    /// before the bad snippet is returned.
    pub fn render(&self, scenario: &Scenario) -> Result<String, RenderError> {
        let mut out = String::new();

        for (position, snippet) in scenario.snippets.iter().enumerate() {
            let index = snippet.reference_index;
            match snippet.action_type {
                ActionType::Talk => {
                    let line = scenario.talk_data.get(index).ok_or_else(|| {
                        out_of_range(position, "talkData", index, scenario.talk_data.len())
                    })?;

                    out.push_str("**");
                    push_escaped(&mut out, &line.speaker_name);
                    out.push_str(":** ");
                    push_escaped(&mut out, &single_line(&line.body));
                    out.push_str("\n\n");
                }
                ActionType::SpecialEffect => {
                    let effect = scenario.special_effect_data.get(index).ok_or_else(|| {
                        out_of_range(
                            position,
                            "specialEffectData",
                            index,
                            scenario.special_effect_data.len(),
                        )
                    })?;

                    match effect.effect_type {
                        EffectType::Title => {
                            if self.separators.wants_divider(&out) {
                                out.push_str(DIVIDER);
                            }
                            out.push_str("**-- ");
                            push_escaped(&mut out, &effect.string_val);
                            out.push_str(" --**\n\n");
                        }
                        // Fades, shakes and the like have no prose form.
                        EffectType::Other(_) => {}
                    }
                }
                // Motions, sounds, backgrounds: nothing to read.
                ActionType::Other(_) => {}
            }
        }

        Ok(out)
    }
}

/// Renders `scenario` with the default separator policy.
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render(scenario: &Scenario) -> Result<String, RenderError> {
    Renderer::new().render(scenario)
}

/// Collapse a dialogue body onto one line; each `\n` or `\r` becomes a space.
fn single_line(body: &str) -> String {
    body.replace(['\n', '\r'], " ")
}

fn out_of_range(position: usize, array: &str, index: usize, len: usize) -> RenderError {
    RenderError::MalformedScenario {
        snippet: Some(position),
        reason: format!("{array} index {index} out of range (len {len})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestdori_epub_core::{DialogueLine, EffectRecord, Snippet};
    use proptest::prelude::*;

    fn talk(index: usize) -> Snippet {
        Snippet::new(ActionType::Talk, index)
    }

    fn effect(index: usize) -> Snippet {
        Snippet::new(ActionType::SpecialEffect, index)
    }

    fn title(text: &str) -> EffectRecord {
        EffectRecord::new(EffectType::Title, text)
    }

    fn scenario(
        snippets: Vec<Snippet>,
        talk_data: Vec<DialogueLine>,
        special_effect_data: Vec<EffectRecord>,
    ) -> Scenario {
        Scenario {
            snippets,
            talk_data,
            special_effect_data,
        }
    }

    #[test]
    fn test_empty_scenario() {
        assert_eq!(render(&Scenario::default()).unwrap(), "");
    }

    #[test]
    fn test_dialogue_joins_lines() {
        let s = scenario(
            vec![talk(0)],
            vec![DialogueLine::new("Kasumi", "Let's go!\nTogether!")],
            vec![],
        );
        assert_eq!(render(&s).unwrap(), "**Kasumi:** Let's go! Together!\n\n");
    }

    #[test]
    fn test_carriage_returns_become_spaces() {
        let s = scenario(
            vec![talk(0)],
            vec![DialogueLine::new("Arisa", "Wait\r\nwhat")],
            vec![],
        );
        assert_eq!(render(&s).unwrap(), "**Arisa:** Wait  what\n\n");
    }

    #[test]
    fn test_speaker_and_body_escaped() {
        let s = scenario(
            vec![talk(0)],
            vec![DialogueLine::new("Tae_(?)", "*strums* #1 <3")],
            vec![],
        );
        assert_eq!(
            render(&s).unwrap(),
            "**Tae\\_\\(?\\):** \\*strums\\* \\#1 \\<3\n\n"
        );
    }

    #[test]
    fn test_title_first_has_no_divider() {
        let s = scenario(vec![effect(0)], vec![], vec![title("Chapter *One*")]);
        assert_eq!(render(&s).unwrap(), "**-- Chapter \\*One\\* --**\n\n");
    }

    #[test]
    fn test_title_after_dialogue_gets_divider() {
        let s = scenario(
            vec![talk(0), effect(0)],
            vec![DialogueLine::new("Rimi", "Um...")],
            vec![title("Later")],
        );
        assert_eq!(
            render(&s).unwrap(),
            "**Rimi:** Um...\n\n---\n\n**-- Later --**\n\n"
        );
    }

    #[test]
    fn test_consecutive_titles_share_no_divider() {
        let s = scenario(
            vec![effect(0), effect(1)],
            vec![],
            vec![title("Morning"), title("School")],
        );
        assert_eq!(
            render(&s).unwrap(),
            "**-- Morning --**\n\n**-- School --**\n\n"
        );
    }

    #[test]
    fn test_legacy_policy_divides_consecutive_titles() {
        let s = scenario(
            vec![effect(0), effect(1)],
            vec![],
            vec![title("Morning"), title("School")],
        );
        let out = Renderer::new()
            .with_separator_policy(SeparatorPolicy::Legacy)
            .render(&s)
            .unwrap();
        assert_eq!(out, "**-- Morning --**\n\n---\n\n**-- School --**\n\n");
    }

    #[test]
    fn test_policy_after_existing_divider() {
        assert!(!SeparatorPolicy::Deduplicate.wants_divider("# Ch 1\n\n---\n\n"));
        assert!(SeparatorPolicy::Legacy.wants_divider("# Ch 1\n\n---\n\n"));
        assert!(!SeparatorPolicy::Legacy.wants_divider(""));
    }

    #[test]
    fn test_ignored_kinds_render_nothing() {
        let s = scenario(
            vec![
                Snippet::new(ActionType::Other(2), 0),
                Snippet::new(ActionType::Other(0), 99),
                effect(0),
            ],
            vec![],
            vec![EffectRecord::new(EffectType::Other(4), "fade")],
        );
        assert_eq!(render(&s).unwrap(), "");
    }

    #[test]
    fn test_ignored_kinds_do_not_reset_divider_state() {
        let s = scenario(
            vec![effect(0), effect(1), effect(2)],
            vec![],
            vec![title("A"), EffectRecord::new(EffectType::Other(3), ""), title("B")],
        );
        assert_eq!(render(&s).unwrap(), "**-- A --**\n\n**-- B --**\n\n");
    }

    #[test]
    fn test_talk_index_out_of_range() {
        let s = scenario(
            vec![talk(0), talk(3)],
            vec![DialogueLine::new("Saaya", "Hi")],
            vec![],
        );
        let err = render(&s).unwrap_err();
        match err {
            RenderError::MalformedScenario { snippet, reason } => {
                assert_eq!(snippet, Some(1));
                assert_eq!(reason, "talkData index 3 out of range (len 1)");
            }
        }
    }

    #[test]
    fn test_effect_index_out_of_range() {
        let s = scenario(vec![effect(0)], vec![], vec![]);
        let err = render(&s).unwrap_err();
        assert!(err.to_string().contains("specialEffectData index 0"));
    }

    #[test]
    fn test_renderer_reports_policy() {
        let r = Renderer::new().with_separator_policy(SeparatorPolicy::Legacy);
        assert_eq!(r.separator_policy(), SeparatorPolicy::Legacy);
        assert_eq!(Renderer::default().separator_policy(), SeparatorPolicy::Deduplicate);
    }

    fn arb_snippet() -> impl Strategy<Value = Snippet> {
        (prop_oneof![Just(1_u32), Just(6), 0_u32..12], 0_usize..4)
            .prop_map(|(code, index)| Snippet::new(ActionType::from(code), index))
    }

    fn arb_scenario() -> impl Strategy<Value = Scenario> {
        (
            prop::collection::vec(arb_snippet(), 0..24),
            prop::collection::vec(
                ("[A-Za-z_*]{0,12}", "[a-z\\n\\r*#]{0,24}")
                    .prop_map(|(name, body)| DialogueLine::new(name, body)),
                4,
            ),
            prop::collection::vec(
                (prop_oneof![Just(8_u32), 0_u32..10], "[A-Za-z *]{0,12}")
                    .prop_map(|(code, text)| EffectRecord::new(EffectType::from(code), text)),
                4,
            ),
        )
            .prop_map(|(snippets, talk_data, special_effect_data)| Scenario {
                snippets,
                talk_data,
                special_effect_data,
            })
    }

    proptest! {
        #[test]
        fn never_two_adjacent_dividers(s in arb_scenario()) {
            let out = render(&s).unwrap();
            prop_assert!(!out.contains("---\n\n---\n\n"));
            prop_assert!(!out.starts_with(DIVIDER));
        }

        #[test]
        fn one_paragraph_per_dialogue(s in arb_scenario()) {
            let out = render(&s).unwrap();
            let talks = s.snippets.iter().filter(|sn| sn.action_type == ActionType::Talk).count();
            let lines = out.split("\n\n").filter(|l| l.starts_with("**") && !l.starts_with("**-- ")).count();
            prop_assert_eq!(talks, lines);
            for paragraph in out.split("\n\n") {
                prop_assert!(!paragraph.contains('\n') && !paragraph.contains('\r'));
            }
        }

        #[test]
        fn output_is_deterministic(s in arb_scenario()) {
            prop_assert_eq!(render(&s).unwrap(), render(&s).unwrap());
        }
    }
}
