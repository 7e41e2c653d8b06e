use thiserror::Error;

use crate::action::ParseActionError;
use crate::catalog::CatalogLoadError;
use crate::model::LessonError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    CatalogLoad(#[from] CatalogLoadError),
    #[error(transparent)]
    ParseAction(#[from] ParseActionError),
}
