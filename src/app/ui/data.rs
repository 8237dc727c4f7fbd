use crate::{app::views::Route, terminal::UiEvent};

/// What the mock UI has been asked to do.
#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub route: Route,
    pub events: Vec<UiEvent>,
}

/// Focus on the Name & Price step of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderField {
    #[default]
    Name,
    Price,
    Toasted,
}

impl BuilderField {
    /// The field focused after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Price,
            Self::Price => Self::Toasted,
            Self::Toasted => Self::Name,
        }
    }
}
