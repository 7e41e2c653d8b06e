#![forbid(unsafe_code)]

pub mod action;
pub mod catalog;
pub mod error;
pub mod model;
pub mod reply;
pub mod resolver;

pub use action::{Action, Command, ParseActionError};
pub use catalog::{Catalog, CatalogLoadError, Tier, TierSource};
pub use error::Error;
pub use reply::{Button, Reply};
pub use resolver::{Position, Resolution};
