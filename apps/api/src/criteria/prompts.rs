// Criteria extraction prompt templates.

pub const CRITERIA_EXTRACTION_SYSTEM: &str = r#"You are an HR expert that extracts key ranking criteria from job descriptions.
Extract the key requirements from the job description and structure them into a JSON object with exactly three keys: "MustHave", "GoodToHave" and "NiceToHave".
Each key maps to a nested JSON object whose keys are the criteria (for example years of experience, certifications, skills, qualifications) and whose values are booleans, strings or numbers describing the expected level.
Example output:
{
  "MustHave": {
    "experience in python in years": "2",
    "experience in machine learning in years": "1",
    "postgraduate degree": true,
    "Cloud skills": "AWS, Azure with projects done in such fields",
    "Gen AI related project experience": "Candidate should have worked on at least 2 projects using RAG and GPT models"
  },
  "GoodToHave": {
    ...
  },
  "NiceToHave": {
    ...
  }
}
Use an empty object for a tier the job description says nothing about."#;

pub const CRITERIA_EXTRACTION_PROMPT: &str = "Job Description:\n{job_text}";

pub const CRITERIA_TEMPERATURE: f32 = 0.2;
pub const CRITERIA_MAX_TOKENS: u32 = 1024;
