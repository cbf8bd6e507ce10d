pub mod classifier;
pub mod summarizer;

pub use classifier::{Classification, Classifier};
pub use summarizer::Summarizer;
