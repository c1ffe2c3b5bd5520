//! Static keyword tables driving resume extraction.
//!
//! The tables are process-wide constants. Any change to their contents must bump
//! `KEYWORD_TABLE_VERSION` so persisted extractions can be traced to the table
//! that produced them.

use serde::Serialize;

pub const KEYWORD_TABLE_VERSION: u32 = 1;

/// A named group of skill keywords with the weight used by the preliminary score.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SkillCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub weight: u32,
}

impl SkillCategory {
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| *k == keyword)
    }
}

pub const SKILL_CATEGORIES: &[SkillCategory] = &[
    SkillCategory {
        name: "Programming Languages",
        keywords: &[
            "swift", "python", "javascript", "typescript", "java", "kotlin", "c++", "c#", "go",
            "rust", "ruby", "php", "dart", "scala", "r", "matlab", "sql", "html", "css",
            "solidity",
        ],
        weight: 15,
    },
    SkillCategory {
        name: "Frameworks & Libraries",
        keywords: &[
            "swiftui", "uikit", "react", "react native", "flutter", "vue", "angular", "node.js",
            "express", "django", "flask", "spring", "laravel", "rails", "pytorch", "tensorflow",
            "opencv",
        ],
        weight: 12,
    },
    SkillCategory {
        name: "Blockchain & Web3",
        keywords: &[
            "blockchain", "web3", "ethereum", "bitcoin", "smart contracts", "defi", "nft", "dao",
            "metamask", "hardhat", "truffle", "polygon", "chainlink", "ipfs", "walletconnect",
            "thirdweb", "alchemy",
        ],
        weight: 20,
    },
    SkillCategory {
        name: "Cloud & DevOps",
        keywords: &[
            "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "terraform", "ansible",
            "ci/cd", "github actions", "gitlab ci", "nginx", "apache", "redis", "mongodb",
            "postgresql",
        ],
        weight: 12,
    },
    SkillCategory {
        name: "Data Science & AI/ML",
        keywords: &[
            "machine learning", "deep learning", "neural networks", "nlp", "computer vision",
            "data science", "pandas", "numpy", "scikit-learn", "jupyter", "tableau", "power bi",
            "elasticsearch",
        ],
        weight: 18,
    },
    SkillCategory {
        name: "Mobile Development",
        keywords: &[
            "ios", "android", "mobile development", "app store", "play store", "core data",
            "realm", "firebase", "push notifications", "in-app purchase",
        ],
        weight: 15,
    },
    SkillCategory {
        name: "Design & UI/UX",
        keywords: &[
            "figma", "sketch", "adobe xd", "photoshop", "illustrator", "ui/ux", "user interface",
            "user experience", "prototyping", "wireframing", "design systems",
        ],
        weight: 10,
    },
];

pub const PROJECT_KEYWORDS: &[&str] = &[
    "project", "built", "developed", "created", "designed", "implemented", "launched",
    "deployed", "app", "application", "system", "platform", "website", "portal", "dashboard",
    "api", "service", "tool",
];

pub const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience", "worked", "employed", "internship", "freelance", "consultant", "developer",
    "engineer", "analyst", "manager", "lead", "senior", "junior", "years", "months",
];

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "university", "college", "degree", "bachelor", "master", "phd", "computer science",
    "engineering", "mathematics", "physics", "graduated", "gpa", "coursework",
];

pub const CERTIFICATION_KEYWORDS: &[&str] = &[
    "certified", "certification", "certificate", "aws certified", "microsoft certified",
    "google certified", "oracle certified", "cisco", "comptia", "pmp", "scrum master", "agile",
];

/// Returns the first category whose table lists `keyword` (already lower-cased).
pub fn category_for(keyword: &str) -> Option<&'static SkillCategory> {
    SKILL_CATEGORIES.iter().find(|c| c.contains(keyword))
}
