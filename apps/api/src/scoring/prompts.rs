// Resume scoring prompt templates.

pub const SCORING_SYSTEM: &str = "\
You are an expert resume evaluator. \
Score candidates against the provided criteria using continuous scoring ranges. \
Judge only from evidence in the resume text; a criterion with no evidence scores 0.";

pub const SCORING_PROMPT_TEMPLATE: &str = r#"Candidate Name: {candidate_name}

Resume Text:
{resume_text}

Criteria (nested JSON):
{criteria_json}

Instructions:
For each criterion in the nested groups, evaluate the candidate's resume and assign scores as follows:

1. **MustHave**: Assign a score between 0 and {must_max}. Use 0 if the criterion is not met at all, {must_max} if fully met, and any intermediate value (e.g. 7) if the evidence is partial.

2. **GoodToHave**: Assign a score between 0 and {good_max}, where 0 means not met and {good_max} means strongly met. Intermediate values are allowed.

3. **NiceToHave**: Assign a score between 0 and {nice_max}, where 0 means not met and {nice_max} means strongly met. Intermediate values are allowed.

After evaluating all criteria, compute the total score as the sum of all individual scores.
Use the group keys and criterion names exactly as given. Scores must be JSON numbers.
Return a JSON object in exactly this format:

{
  "candidate_name": "Candidate Name",
  "scores": {
    "MustHave": {
      "criterion 1": score,
      "criterion 2": score
    },
    "GoodToHave": { ... },
    "NiceToHave": { ... }
  },
  "total_score": total_score
}"#;

pub const SCORING_TEMPERATURE: f32 = 0.0;
