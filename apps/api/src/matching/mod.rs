// Responsibility-to-profile matching engine.
// Implements: JD splitting, normalization, similarity scoring, compatibility matrix,
// content selection and coverage reporting. Pure and synchronous; handlers own the async edge.

pub mod content_selector;
pub mod coverage;
pub mod handlers;
pub mod jd_parser;
pub mod matrix;
pub mod normalizer;
pub mod pipeline;
pub mod similarity;
