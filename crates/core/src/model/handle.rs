use std::fmt;

/// Locator of a single lesson: tier position plus index inside that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LessonHandle {
    tier: usize,
    index: usize,
}

impl LessonHandle {
    #[must_use]
    pub fn new(tier: usize, index: usize) -> Self {
        Self { tier, index }
    }

    #[must_use]
    pub fn tier(&self) -> usize {
        self.tier
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for LessonHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tier, self.index)
    }
}

/// Flow a quiz question was presented in.
///
/// `Lesson` and `Test` answers move the curriculum forward; `Drill` answers never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizMode {
    Lesson,
    Test,
    Drill,
}

impl QuizMode {
    /// True when a correct answer in this mode may advance the cursor.
    #[must_use]
    pub fn advances_progress(self) -> bool {
        !matches!(self, QuizMode::Drill)
    }

    pub(crate) fn code(self) -> &'static str {
        match self {
            QuizMode::Lesson => "l",
            QuizMode::Test => "t",
            QuizMode::Drill => "d",
        }
    }

    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            "l" => Some(QuizMode::Lesson),
            "t" => Some(QuizMode::Test),
            "d" => Some(QuizMode::Drill),
            _ => None,
        }
    }
}
