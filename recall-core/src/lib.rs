pub mod advisor;
pub mod clock;
pub mod cloze;
pub mod errors;
pub mod filters;
pub mod grading;
pub mod models;
pub mod scheduler;
pub mod selector;
pub mod similarity;
pub mod source;
pub mod stats;

pub use advisor::*;
pub use clock::*;
pub use cloze::*;
pub use errors::*;
pub use filters::*;
pub use grading::*;
pub use models::*;
pub use scheduler::*;
pub use selector::*;
pub use similarity::*;
pub use source::memory::MemoryStats;
pub use source::*;
pub use stats::*;
