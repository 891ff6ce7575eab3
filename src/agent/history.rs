//! Record of a single agent run.

/// Everything an agent did for one task, plus its final result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentHistory {
    task: String,
    steps: Vec<String>,
    final_result: Option<String>,
}

impl AgentHistory {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }

    /// Build a finished history directly, e.g. from a recorded run.
    pub fn finished(task: impl Into<String>, result: impl Into<String>) -> Self {
        let mut history = Self::new(task);
        history.finish(result);
        history
    }

    pub(crate) fn push_step(&mut self, response: impl Into<String>) {
        self.steps.push(response.into());
    }

    pub(crate) fn finish(&mut self, result: impl Into<String>) {
        self.final_result = Some(result.into());
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    /// Model responses, one per step.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Whether the agent reached a final result.
    pub fn is_done(&self) -> bool {
        self.final_result().is_some()
    }

    /// The agent's final result. An empty result counts as none.
    pub fn final_result(&self) -> Option<&str> {
        self.final_result.as_deref().filter(|r| !r.is_empty())
    }

    /// Take the final result out of the history.
    pub fn into_final_result(self) -> Option<String> {
        self.final_result.filter(|r| !r.is_empty())
    }
}
