// Mock-interview LLM prompt templates.
// Placeholders in `{braces}` are substituted with `str::replace` before sending.

pub const QUESTION_GEN_PERSONA: &str = "You are a professional hiring manager.";

pub const QUESTION_GEN_PROMPT: &str = r#"You are an expert technical interviewer. Generate 5 highly relevant interview questions for a {role} position.
Difficulty Level: {difficulty}
Interview Type: {interview_type}

The questions should:
1. Be realistic and commonly asked in top-tier tech companies.
2. Increase slightly in difficulty.
3. For Technical: focus on core concepts, problem-solving, and architecture.
4. For Behavioral: focus on the STAR method, leadership, and conflict resolution.
5. For Mixed: alternate between the two.

Return a JSON object with exactly this shape:
{"questions": ["question1", "question2", "question3", "question4", "question5"]}"#;

pub const EVALUATION_PERSONA: &str = "You are an expert interviewer evaluation engine.";

pub const EVALUATION_PROMPT: &str = r#"Evaluate the following interview answer for a {role} role.

Question: "{question}"
Candidate Answer: "{answer}"

Score the answer on these metrics, each an integer from 0 to 10:
1. technicalScore: accuracy and depth of knowledge.
2. structureScore: clarity and logical flow.
3. depthScore: how well the candidate explained "why" or gave examples.
4. confidenceScore: professionalism and tone.

Also provide:
- strengths: what the candidate did well.
- weaknesses: what was missing or incorrect.
- improvedAnswer: a high-quality version of how they should have answered.

Return a JSON object with exactly this shape:
{
  "technicalScore": 8,
  "structureScore": 7,
  "depthScore": 6,
  "confidenceScore": 8,
  "strengths": ["..."],
  "weaknesses": ["..."],
  "improvedAnswer": "..."
}"#;

pub const SUMMARY_PERSONA: &str = "You are a career coach.";

pub const SUMMARY_PROMPT: &str = r#"Based on these 5 interview responses for a {role} role, provide a final performance summary.
Data: {performance}

Return a JSON object with:
1. feedback: overall summary of performance.
2. readinessLevel: one of ["Beginner", "Intermediate", "Interview Ready"].
3. nextSteps: 3 specific areas to study.
4. recommendedCourses: 2 general course topics (e.g. ["Advanced React", "System Design"])."#;
