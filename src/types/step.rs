use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub label: String,
    pub done: bool,
    pub active: bool,
}

impl Step {
    pub fn pending(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            done: false,
            active: false,
        }
    }
}

/// Ordered steps of a single agent.
///
/// The two queries [`StepList::find_active_index`] and
/// [`StepList::find_first_pending_index`] are the only way the engine locates
/// where an agent currently is. Both tolerate a list with no active step and a
/// fully completed list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    /// Every step pending, nothing active.
    pub fn pending<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: labels.into_iter().map(Step::pending).collect(),
        }
    }

    /// Every step done except the last one, which is active.
    pub fn in_progress<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::pending(labels);
        list.reset_to_last();
        list
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.steps
    }

    pub fn find_active_index(&self) -> Option<usize> {
        self.steps.iter().position(|s| s.active)
    }

    pub fn find_first_pending_index(&self) -> Option<usize> {
        self.steps.iter().position(|s| !s.done)
    }

    /// Active step, else first pending step, else the first step.
    pub fn resume_index(&self) -> usize {
        self.find_active_index()
            .or_else(|| self.find_first_pending_index())
            .unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.done)
    }

    pub fn done_count(&self) -> usize {
        self.steps.iter().filter(|s| s.done).count()
    }

    pub fn active_count(&self) -> usize {
        self.steps.iter().filter(|s| s.active).count()
    }

    /// Done steps as a whole percentage, rounded to nearest. Empty lists are 0%.
    pub fn percent_complete(&self) -> u8 {
        if self.steps.is_empty() {
            return 0;
        }
        let ratio = self.done_count() as f64 / self.steps.len() as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn current_label(&self) -> Option<&str> {
        self.steps
            .get(self.resume_index())
            .map(|s| s.label.as_str())
    }

    /// Marks every step but the last done and makes the last one active.
    pub fn reset_to_last(&mut self) {
        let last = self.steps.len().saturating_sub(1);
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.done = i < last;
            step.active = i == last;
        }
    }
}
