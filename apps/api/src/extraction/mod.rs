// Resume text → structured skills, projects, experience, education, certifications.
// Keyword-table driven; no network or storage access.

pub mod extractor;
pub mod handlers;
pub mod keywords;
