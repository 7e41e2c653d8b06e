use crate::action::Action;

/// A choice shown under a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    #[must_use]
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Transport-agnostic response payload handed to the messaging gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub text: String,
    /// Rows of buttons, top to bottom.
    pub keyboard: Vec<Vec<Button>>,
}

impl Reply {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: Vec<Button>) -> Self {
        self.keyboard.push(row);
        self
    }

    #[must_use]
    pub fn with_button(self, button: Button) -> Self {
        self.with_row(vec![button])
    }

    /// Iterate all buttons in display order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.keyboard.iter().flatten()
    }

    #[must_use]
    pub fn has_buttons(&self) -> bool {
        self.keyboard.iter().any(|row| !row.is_empty())
    }
}
