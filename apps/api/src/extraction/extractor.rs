//! Keyword extractor: turns raw resume text into an immutable `ExtractedData` record.
//!
//! Pure and deterministic: identical text and keyword tables always yield identical output.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::extraction::keywords::{
    category_for, CERTIFICATION_KEYWORDS, EDUCATION_KEYWORDS, EXPERIENCE_KEYWORDS,
    PROJECT_KEYWORDS, SKILL_CATEGORIES,
};

const MAX_PROJECTS: usize = 10;
const MAX_EXPERIENCE: usize = 5;
const MAX_EDUCATION: usize = 3;
const MAX_CERTIFICATIONS: usize = 5;

const MIN_PROJECT_CHARS: usize = 20;
const MIN_EXPERIENCE_CHARS: usize = 15;
const MIN_EDUCATION_CHARS: usize = 10;
const MIN_CERTIFICATION_CHARS: usize = 10;

const PRELIMINARY_SCORE_CAP: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
}

/// Runs the full extraction over raw (un-normalized) resume text.
pub fn extract_resume(raw_text: &str) -> ExtractedData {
    let text = preprocess_text(raw_text);
    ExtractedData {
        skills: extract_skills(&text),
        projects: extract_projects(&text),
        experience: extract_sentences(
            &text,
            EXPERIENCE_KEYWORDS,
            MIN_EXPERIENCE_CHARS,
            MAX_EXPERIENCE,
        ),
        education: extract_sentences(&text, EDUCATION_KEYWORDS, MIN_EDUCATION_CHARS, MAX_EDUCATION),
        certifications: extract_sentences(
            &text,
            CERTIFICATION_KEYWORDS,
            MIN_CERTIFICATION_CHARS,
            MAX_CERTIFICATIONS,
        ),
    }
}

/// Lower-cases and collapses every whitespace run (newlines, tabs, repeated spaces) to one space.
pub fn preprocess_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Presence-only skill matching. Output is sorted and duplicate-free.
pub fn extract_skills(text: &str) -> Vec<String> {
    let found: BTreeSet<String> = SKILL_CATEGORIES
        .iter()
        .flat_map(|c| c.keywords.iter())
        .filter(|kw| text.contains(*kw))
        .map(|kw| title_case(kw))
        .collect();
    found.into_iter().collect()
}

/// Emits a window of two words before to five words after the first word holding a
/// project keyword, for each sentence long enough to describe a project.
pub fn extract_projects(text: &str) -> Vec<String> {
    let mut projects = Vec::new();

    for sentence in sentences(text) {
        if sentence.chars().count() <= MIN_PROJECT_CHARS {
            continue;
        }
        let Some(keyword) = PROJECT_KEYWORDS.iter().find(|kw| sentence.contains(*kw)) else {
            continue;
        };
        let words: Vec<&str> = sentence.split(' ').collect();
        if let Some(idx) = words.iter().position(|w| w.contains(keyword)) {
            let start = idx.saturating_sub(2);
            let end = (idx + 5).min(words.len() - 1);
            projects.push(title_case(&words[start..=end].join(" ")));
        }
    }

    dedup_truncate(projects, MAX_PROJECTS)
}

fn extract_sentences(text: &str, keywords: &[&str], min_chars: usize, max: usize) -> Vec<String> {
    let hits = sentences(text)
        .filter(|s| s.chars().count() > min_chars)
        .filter(|s| keywords.iter().any(|kw| s.contains(kw)))
        .map(title_case)
        .collect();
    dedup_truncate(hits, max)
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?']).map(str::trim)
}

fn dedup_truncate(items: Vec<String>, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(max)
        .collect()
}

/// Upper-cases the first character of every space-delimited word and lower-cases the rest.
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rough pre-verification score: category weight per skill plus flat per-entry points.
pub fn preliminary_score(data: &ExtractedData) -> u32 {
    let skill_points: u32 = data
        .skills
        .iter()
        .filter_map(|s| category_for(&s.to_lowercase()))
        .map(|c| c.weight)
        .sum();

    let entry_points = data.projects.len() * 25
        + data.experience.len() * 15
        + data.education.len() * 20
        + data.certifications.len() * 30;

    (skill_points as usize + entry_points).min(PRELIMINARY_SCORE_CAP as usize) as u32
}

/// Groups extracted skills under every category listing them. Empty categories are omitted.
pub fn skills_by_category(skills: &[String]) -> BTreeMap<&'static str, Vec<String>> {
    let mut grouped = BTreeMap::new();
    for category in SKILL_CATEGORIES {
        let hits: Vec<String> = skills
            .iter()
            .filter(|s| category.contains(&s.to_lowercase()))
            .cloned()
            .collect();
        if !hits.is_empty() {
            grouped.insert(category.name, hits);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Senior iOS developer with 5 years of experience.\n\
        Built a DeFi dashboard using Solidity and React.\n\
        Bachelor of Computer Science, Stanford University.\n\
        AWS Certified Solutions Architect!";

    #[test]
    fn test_preprocess_collapses_whitespace() {
        assert_eq!(preprocess_text("Hello\n\tWORLD   again"), "hello world again");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("smart contracts"), "Smart Contracts");
        assert_eq!(title_case("c++"), "C++");
        assert_eq!(title_case("node.js"), "Node.js");
    }

    #[test]
    fn test_skills_sorted_and_unique() {
        let skills = extract_skills(&preprocess_text(RESUME));
        let mut sorted = skills.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(skills, sorted);
        assert!(skills.contains(&"Solidity".to_string()));
        assert!(skills.contains(&"React".to_string()));
        assert!(skills.contains(&"Defi".to_string()));
        assert!(skills.contains(&"Ios".to_string()));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        assert_eq!(extract_resume(RESUME), extract_resume(RESUME));
    }

    #[test]
    fn test_project_window_around_keyword() {
        let projects = extract_projects(&preprocess_text(RESUME));
        assert_eq!(
            projects,
            vec!["Built A Defi Dashboard Using Solidity".to_string()]
        );
    }

    #[test]
    fn test_project_window_clamps_at_sentence_start() {
        let projects =
            extract_projects("we deployed the new payments platform to production last year");
        assert_eq!(
            projects,
            vec!["We Deployed The New Payments Platform To".to_string()]
        );
    }

    #[test]
    fn test_short_sentences_are_ignored() {
        let data = extract_resume("Built app. Senior dev.");
        assert!(data.projects.is_empty());
        assert!(data.experience.is_empty());
    }

    #[test]
    fn test_sentence_categories() {
        let data = extract_resume(RESUME);
        assert_eq!(
            data.experience[0],
            "Senior Ios Developer With 5 Years Of Experience"
        );
        assert_eq!(
            data.education,
            vec!["Bachelor Of Computer Science, Stanford University".to_string()]
        );
        assert_eq!(
            data.certifications,
            vec!["Aws Certified Solutions Architect".to_string()]
        );
    }

    #[test]
    fn test_categories_truncate_and_dedup() {
        let text = (0..10)
            .map(|i| format!("worked as engineer number {i} at acme"))
            .chain(std::iter::repeat("worked as engineer number 0 at acme".to_string()).take(3))
            .collect::<Vec<_>>()
            .join(". ");
        let data = extract_resume(&text);
        assert_eq!(data.experience.len(), 5);
        let unique: HashSet<_> = data.experience.iter().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(data.experience[0], "Worked As Engineer Number 0 At Acme");
    }

    #[test]
    fn test_empty_text_yields_empty_record() {
        let data = extract_resume("");
        assert_eq!(data, ExtractedData::default());
        assert_eq!(preliminary_score(&data), 0);
    }

    #[test]
    fn test_preliminary_score_weights() {
        let data = ExtractedData {
            skills: vec!["Solidity".to_string(), "Figma".to_string()],
            projects: vec!["p".to_string()],
            experience: vec!["e".to_string()],
            education: vec![],
            certifications: vec!["c".to_string()],
        };
        // 15 + 10 + 25 + 15 + 30
        assert_eq!(preliminary_score(&data), 95);
    }

    #[test]
    fn test_preliminary_score_capped() {
        let data = ExtractedData {
            certifications: vec!["c".to_string(); 40],
            ..Default::default()
        };
        assert_eq!(preliminary_score(&data), 1000);
    }

    #[test]
    fn test_skills_by_category_omits_empty() {
        let grouped = skills_by_category(&["Docker".to_string(), "Swift".to_string()]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["Cloud & DevOps"], vec!["Docker".to_string()]);
        assert_eq!(grouped["Programming Languages"], vec!["Swift".to_string()]);
    }
}
