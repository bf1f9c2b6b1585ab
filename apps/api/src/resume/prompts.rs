// Resume review prompt. Placeholders in `{braces}` are substituted before sending.

pub const RESUME_REVIEW_PERSONA: &str = "You are a professional resume reviewer.";

/// Only this many characters of resume text are sent to the model.
pub const MAX_RESUME_PROMPT_CHARS: usize = 4000;

pub const RESUME_REVIEW_PROMPT: &str = r#"You are an expert HR Manager and Career Coach. Analyze this resume text and provide professional feedback.

EXTRACTED RESUME TEXT:
"{resume_text}"

ALGORITHMIC ANALYSIS:
Score: {score}/100
Identified Weaknesses: {weaknesses}
Missing Sections: {missing_sections}

Return a JSON object with exactly this shape:
{
  "summaryFeedback": "A concise 2-3 sentence overview of the resume quality.",
  "detailedSuggestions": ["At least 3 specific, actionable improvement tips based on the text."],
  "rewrittenExamples": ["2-3 'Before' and 'After' examples of bullet points found in the resume, rewritten for higher impact."]
}"#;
