//! Structured tool calls.
//!
//! The service returns judgments as function-call arguments with strict JSON
//! schemas. Anything that does not fit the schema is a hard error for the turn.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{DialogueError, DialogueResult};

/// Name of the tool that scores a CEO answer.
pub const EVALUATION_TOOL: &str = "generate_evaluation_score";
/// Name of the tool that invents the company at game start.
pub const COMPANY_TOOL: &str = "generate_company_report";

/// The judgment of one CEO answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Market reaction in [-1, 1]; negative for dismissive or evasive answers.
    pub score: f64,
    /// Whether the reporter is done with this exchange.
    pub end_of_conversation: bool,
}

impl Evaluation {
    /// An evaluation with the score clamped to [-1, 1].
    pub fn new(score: f64, end_of_conversation: bool) -> Self {
        Self {
            score: score.clamp(-1.0, 1.0),
            end_of_conversation,
        }
    }
}

/// The fictional company the CEO is defending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Company name.
    pub company_name: String,
    /// One-line background.
    pub company_background: String,
    /// The CEO's name.
    pub ceo_name: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            company_name: "MyPhone".to_string(),
            company_background: "MyPhone is a company that makes phones".to_string(),
            ceo_name: "Mr. Ballmer".to_string(),
        }
    }
}

/// Function definition for [`EVALUATION_TOOL`].
pub fn evaluation_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": EVALUATION_TOOL,
            "description": "Generate an evaluation score between -1 and 1 for the CEO's response.",
            "strict": true,
            "parameters": {
                "type": "object",
                "required": ["score", "end_of_conversation"],
                "properties": {
                    "score": {
                        "type": "number",
                        "description": "A score from -1.0 to 1.0. Use positive (>= 0) if the response is at least somewhat coherent, respectful, or funny. Use negative (< 0) only if the CEO is dismissive, disrespectful, or clearly not answering the question."
                    },
                    "end_of_conversation": {
                        "type": "boolean",
                        "description": "Whether to end the conversation after this turn. End if the user is dismissive, after 3 attempts without a direct answer, or if the conversation is over."
                    }
                },
                "additionalProperties": false
            }
        }
    })
}

/// Function definition for [`COMPANY_TOOL`].
pub fn company_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": COMPANY_TOOL,
            "description": "Generates the company name, background, and CEO name.",
            "strict": true,
            "parameters": {
                "type": "object",
                "required": ["company_name", "company_background", "ceo_name"],
                "properties": {
                    "company_name": {
                        "type": "string",
                        "description": "A funny but plausible name for the company."
                    },
                    "company_background": {
                        "type": "string",
                        "description": "A short comedic explanation of what the company does (< 40 words)."
                    },
                    "ceo_name": {
                        "type": "string",
                        "description": "Name of the CEO (can be humorous)."
                    }
                },
                "additionalProperties": false
            }
        }
    })
}

/// Parse the arguments of an evaluation call.
///
/// Scores outside [-1, 1] are clamped; non-numeric or missing fields fail.
pub fn parse_evaluation(arguments: &str) -> DialogueResult<Evaluation> {
    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Args {
        score: f64,
        end_of_conversation: bool,
    }

    let args: Args = serde_json::from_str(arguments).map_err(|e| {
        DialogueError::MalformedResponse(format!("bad {EVALUATION_TOOL} arguments: {e}"))
    })?;
    Ok(Evaluation::new(args.score, args.end_of_conversation))
}

/// Parse the arguments of a company call. Blank fields fail.
pub fn parse_company(arguments: &str) -> DialogueResult<CompanyProfile> {
    let profile: CompanyProfile = serde_json::from_str(arguments).map_err(|e| {
        DialogueError::MalformedResponse(format!("bad {COMPANY_TOOL} arguments: {e}"))
    })?;
    let blank = [
        ("company_name", &profile.company_name),
        ("company_background", &profile.company_background),
        ("ceo_name", &profile.ceo_name),
    ]
    .into_iter()
    .find(|(_, v)| v.trim().is_empty());
    if let Some((field, _)) = blank {
        return Err(DialogueError::MalformedResponse(format!(
            "{COMPANY_TOOL} returned an empty {field}"
        )));
    }
    Ok(profile)
}
