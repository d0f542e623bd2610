use std::collections::HashSet;

/// Gate guarding the `form_start` event.
pub const FORM_START_GATE: &str = "form_start";
/// Gate guarding the post-save external survey prompt.
pub const SURVEY_PROMPT_GATE: &str = "survey_prompt";

/// One-shot triggers scoped to a session. Each name fires at most once until
/// [`PromptGate::reset`] ends the session.
#[derive(Debug, Clone, Default)]
pub struct PromptGate {
    fired: HashSet<String>,
}

impl PromptGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` only on the first call for `name` in this session.
    pub fn trigger(&mut self, name: &str) -> bool {
        if self.fired.contains(name) {
            return false;
        }
        self.fired.insert(name.to_string())
    }

    pub fn has_fired(&self, name: &str) -> bool {
        self.fired.contains(name)
    }

    pub fn reset(&mut self) {
        self.fired.clear();
    }
}
