//! Resume Scorer — deterministic, regex-based multi-factor scoring of resume text.
//!
//! Five fixed-weight components, summed and capped at 100:
//!
//! | component    | rule                                         | max |
//! |--------------|----------------------------------------------|-----|
//! | structure    | 4 per detected section                       | 20  |
//! | skills       | 5 per detected skill                         | 30  |
//! | impact       | 10 if ≥3 action verbs, +10 if metrics found  | 20  |
//! | keywords     | 2 per detected action verb                   | 15  |
//! | completeness | 15 if no section missing, else 3 per present | 15  |
//!
//! No LLM call, no I/O. Identical input always yields an identical analysis.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const SKILLS: [&str; 20] = [
    "JavaScript",
    "React",
    "Node.js",
    "Python",
    "Java",
    "SQL",
    "MongoDB",
    "AWS",
    "Docker",
    "TypeScript",
    "Express",
    "Next.js",
    "PostgreSQL",
    "C++",
    "Ruby",
    "HTML",
    "CSS",
    "Tailwind",
    "Redux",
    "Git",
];

pub const SECTIONS: [&str; 5] = ["Summary", "Experience", "Education", "Skills", "Projects"];

pub const ACTION_VERBS: [&str; 8] = [
    "Developed",
    "Built",
    "Led",
    "Designed",
    "Managed",
    "Implemented",
    "Created",
    "Optimized",
];

const STRENGTH_SKILLS: &str = "Strong technical skill set detected.";
const STRENGTH_METRICS: &str = "Good use of measurable impact and metrics.";
const STRENGTH_VERBS: &str = "Strong use of action-oriented language.";
const STRENGTH_STRUCTURE: &str = "Excellent resume structure and completeness.";

const WEAKNESS_METRICS: &str = "Lacks quantifiable metrics and measurable impact.";
const WEAKNESS_SKILLS: &str = "Technical skill section could be more robust.";
const WEAKNESS_VERBS: &str =
    "Consider using more strong action verbs (e.g., Developed, Optimized).";

static SKILL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| compile_terms(&SKILLS));
static SECTION_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| compile_terms(&SECTIONS));
static VERB_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| compile_terms(&ACTION_VERBS));

/// "40%", "10+", "500 users", "2 million" ...
static RE_METRICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+%|[0-9]+\+|[0-9]+ (users|clients|projects|million|billion))").unwrap()
});

/// Result of scoring one resume. Built fresh per call and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub score: u32, // 0 – 100
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_sections: Vec<String>,
    pub detected_skills: Vec<String>,
}

/// Per-component points before the final cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub structure: u32,
    pub skills: u32,
    pub impact: u32,
    pub keywords: u32,
    pub completeness: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        (self.structure + self.skills + self.impact + self.keywords + self.completeness).min(100)
    }
}

/// Raw detection results the score and messages are derived from.
#[derive(Debug, Clone)]
struct Signals {
    detected_skills: Vec<&'static str>,
    detected_sections: usize,
    missing_sections: Vec<&'static str>,
    verb_count: usize,
    has_metrics: bool,
}

/// Scores resume text. The caller is responsible for rejecting empty or
/// too-short input; every string gets a result here.
pub fn analyze(text: &str) -> ResumeAnalysis {
    let signals = detect(text);
    let breakdown = compute_breakdown(&signals);

    ResumeAnalysis {
        score: breakdown.total(),
        strengths: collect_strengths(&signals),
        weaknesses: collect_weaknesses(&signals),
        missing_sections: signals
            .missing_sections
            .iter()
            .map(|s| s.to_string())
            .collect(),
        detected_skills: signals
            .detected_skills
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

fn detect(text: &str) -> Signals {
    let detected_skills = matching_terms(&SKILL_PATTERNS, text);
    let detected_sections = matching_terms(&SECTION_PATTERNS, text);
    let missing_sections = SECTIONS
        .iter()
        .copied()
        .filter(|s| !detected_sections.contains(s))
        .collect();

    Signals {
        detected_skills,
        detected_sections: detected_sections.len(),
        missing_sections,
        verb_count: matching_terms(&VERB_PATTERNS, text).len(),
        has_metrics: RE_METRICS.is_match(text),
    }
}

fn compute_breakdown(signals: &Signals) -> ScoreBreakdown {
    let missing = signals.missing_sections.len() as u32;
    let verbs = signals.verb_count as u32;

    ScoreBreakdown {
        structure: (signals.detected_sections as u32 * 4).min(20),
        skills: (signals.detected_skills.len() as u32 * 5).min(30),
        impact: (if verbs >= 3 { 10 } else { 0 }) + (if signals.has_metrics { 10 } else { 0 }),
        keywords: (verbs * 2).min(15),
        completeness: if missing == 0 {
            15
        } else {
            (SECTIONS.len() as u32 - missing) * 3
        },
    }
}

fn collect_strengths(signals: &Signals) -> Vec<String> {
    let mut strengths = Vec::new();
    if signals.detected_skills.len() > 5 {
        strengths.push(STRENGTH_SKILLS.to_string());
    }
    if signals.has_metrics {
        strengths.push(STRENGTH_METRICS.to_string());
    }
    if signals.verb_count > 4 {
        strengths.push(STRENGTH_VERBS.to_string());
    }
    if signals.missing_sections.is_empty() {
        strengths.push(STRENGTH_STRUCTURE.to_string());
    }
    strengths
}

fn collect_weaknesses(signals: &Signals) -> Vec<String> {
    let mut weaknesses = Vec::new();
    if !signals.missing_sections.is_empty() {
        weaknesses.push(format!(
            "Missing key sections: {}.",
            signals.missing_sections.join(", ")
        ));
    }
    if !signals.has_metrics {
        weaknesses.push(WEAKNESS_METRICS.to_string());
    }
    if signals.detected_skills.len() < 3 {
        weaknesses.push(WEAKNESS_SKILLS.to_string());
    }
    if signals.verb_count < 3 {
        weaknesses.push(WEAKNESS_VERBS.to_string());
    }
    weaknesses
}

fn matching_terms(patterns: &[(&'static str, Regex)], text: &str) -> Vec<&'static str> {
    patterns
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(term, _)| *term)
        .collect()
}

fn compile_terms(terms: &[&'static str]) -> Vec<(&'static str, Regex)> {
    terms
        .iter()
        .map(|term| (*term, Regex::new(&whole_term_pattern(term)).unwrap()))
        .collect()
}

/// Case-insensitive whole-term pattern. A `\b` is only placed on an edge whose
/// character is a word character, otherwise "C++" could never match.
fn whole_term_pattern(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if term.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let tail = if term.chars().last().is_some_and(is_word) { r"\b" } else { "" };
    format!("(?i){lead}{}{tail}", regex::escape(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_RESUME: &str = r#"
        Jane Doe
        Summary: Full-stack engineer with 8 years of experience.
        Experience
          - Developed a React and TypeScript dashboard used by 5000 users.
          - Built Node.js services on AWS with Docker, cutting latency by 50%.
          - Led a team of 6 engineers and Designed the PostgreSQL schema.
          - Optimized SQL queries and Implemented CI with Git.
          - Managed releases and Created onboarding docs.
        Education: B.Sc. Computer Science
        Skills: JavaScript, Python, Redux, Tailwind
        Projects: open-source contributions
    "#;

    const EMPTY_VOCAB: &str =
        "I enjoy hiking on weekends and cooking pasta for my friends and family members.";

    #[test]
    fn test_strong_resume_hits_every_cap() {
        let analysis = analyze(STRONG_RESUME);
        assert_eq!(analysis.score, 100);
        assert!(analysis.missing_sections.is_empty());
        assert!(analysis.weaknesses.is_empty(), "{:?}", analysis.weaknesses);
        assert_eq!(
            analysis.strengths,
            vec![
                STRENGTH_SKILLS,
                STRENGTH_METRICS,
                STRENGTH_VERBS,
                STRENGTH_STRUCTURE
            ]
        );
    }

    #[test]
    fn test_no_vocabulary_scores_zero() {
        let analysis = analyze(EMPTY_VOCAB);
        assert_eq!(analysis.score, 0);
        assert!(analysis.strengths.is_empty());
        assert!(analysis.detected_skills.is_empty());
        assert_eq!(analysis.missing_sections, SECTIONS.to_vec());
        assert_eq!(analysis.weaknesses.len(), 4);
        assert_eq!(
            analysis.weaknesses[0],
            "Missing key sections: Summary, Experience, Education, Skills, Projects."
        );
        assert_eq!(analysis.weaknesses[1], WEAKNESS_METRICS);
        assert_eq!(analysis.weaknesses[2], WEAKNESS_SKILLS);
        assert_eq!(analysis.weaknesses[3], WEAKNESS_VERBS);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let first = serde_json::to_string(&analyze(STRONG_RESUME)).unwrap();
        let second = serde_json::to_string(&analyze(STRONG_RESUME)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let analysis = analyze("Experienced with JavaScript and PostgreSQL only.");
        assert_eq!(analysis.detected_skills, vec!["JavaScript", "PostgreSQL"]);
    }

    #[test]
    fn test_matching_is_case_insensitive_and_keeps_vocabulary_order() {
        let analysis = analyze("git, docker, PYTHON and react");
        assert_eq!(analysis.detected_skills, vec!["React", "Python", "Docker", "Git"]);
    }

    #[test]
    fn test_symbol_terms_match_as_whole_terms() {
        let analysis = analyze("Wrote C++ engines and Node.js tooling");
        assert_eq!(analysis.detected_skills, vec!["Node.js", "C++"]);
    }

    #[test]
    fn test_metric_patterns() {
        for text in ["grew revenue 40%", "10+ services", "served 300 clients", "3 Million rows"] {
            assert!(detect(text).has_metrics, "expected metrics in {text:?}");
        }
        assert!(!detect("worked on many things for years").has_metrics);
        assert!(!detect("about 300users").has_metrics);
    }

    #[test]
    fn test_partial_resume_breakdown() {
        // 2 sections, 2 skills, 3 verbs, no metrics
        let signals = detect("Experience and Education. Developed, Built and Led things in Python and SQL.");
        let breakdown = compute_breakdown(&signals);
        assert_eq!(
            breakdown,
            ScoreBreakdown {
                structure: 8,
                skills: 10,
                impact: 10,
                keywords: 6,
                completeness: 6,
            }
        );
        assert_eq!(breakdown.total(), 40);
    }

    #[test]
    fn test_score_capped_at_100() {
        let breakdown = ScoreBreakdown {
            structure: 20,
            skills: 30,
            impact: 20,
            keywords: 15,
            completeness: 15,
        };
        assert_eq!(breakdown.total(), 100);
    }

    #[test]
    fn test_keywords_cap_at_15() {
        let text = ACTION_VERBS.join(" ");
        let breakdown = compute_breakdown(&detect(&text));
        assert_eq!(breakdown.keywords, 15);
    }

    #[test]
    fn test_whole_term_pattern_edges() {
        assert_eq!(whole_term_pattern("Git"), r"(?i)\bGit\b");
        assert_eq!(whole_term_pattern("C++"), r"(?i)\bC\+\+");
    }

    #[test]
    fn test_score_bounded_and_stable_across_inputs() {
        let every_term = [SKILLS.join(" "), SECTIONS.join(" "), ACTION_VERBS.join(" ")].join("\n");
        let inputs = [
            String::new(),
            " \n\t ".to_string(),
            every_term.repeat(50),
            format!("{} grew revenue 40% for 10+ clients", "word ".repeat(20_000)),
            "Résumé: Développé des services Python, 500 users, Erfahrung, 経験 Docker".to_string(),
            "C++ C++ Node.js Next.js 100% 2 million 3 billion".to_string(),
        ];
        for input in &inputs {
            let first = analyze(input);
            assert!(first.score <= 100, "score {} for {:.40?}", first.score, input);
            assert_eq!(analyze(input), first);
        }
    }
}
