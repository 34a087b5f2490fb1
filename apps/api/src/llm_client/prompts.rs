// Prompt constants and builders for the explanation and recommendation calls.

/// System prompt for per-resume match explanations.
pub const EXPLANATION_SYSTEM: &str = "You are an experienced technical recruiter. \
    Base every statement strictly on the resume excerpts provided. \
    Do NOT invent qualifications, employers, dates or skills.";

/// System prompt for the single recruiter recommendation over a ranked list.
pub const RECOMMENDATION_SYSTEM: &str = "You are an experienced HR recruiter. \
    Answer strictly from the retrieved resumes below. \
    Do not hallucinate candidates or qualifications. \
    If none of the resumes fit, say so.";

/// Reply used when a ranking produced nothing to recommend.
pub const NO_RESULTS_MESSAGE: &str = "No relevant resumes found.";

const EXPLANATION_TEMPLATE: &str = "\
Based on the following job description and resume content, provide a brief \
analysis of why this candidate is a good match.

Job Description:
{job_description}

Resume Content:
{resume_content}

Provide a concise 10-15 sentence explanation of the match.";

const RECOMMENDATION_TEMPLATE: &str = "\
Job Description:
{job_description}

Retrieved resumes, best match first:
{ranking}

Recommend the most suitable candidates for this role and explain why.";

pub fn build_explanation_prompt(job_description: &str, resume_content: &str) -> String {
    EXPLANATION_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_content}", resume_content)
}

pub fn build_recommendation_prompt(job_description: &str, ranking: &str) -> String {
    RECOMMENDATION_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{ranking}", ranking)
}
