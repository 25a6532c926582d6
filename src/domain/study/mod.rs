pub mod assemble;
pub mod model;
pub mod normalize;
pub mod repair;
pub mod salvage;
pub mod service;

pub use model::{Flashcard, StudyMaterial};
pub use service::{StudyService, StudyServiceApi};
