//! LLM-backed quiz generation. The provider is opaque behind
//! [`QuizGenerator`]; the bundled implementation talks to Groq's
//! OpenAI-compatible chat completions endpoint and forces a single
//! `generate_quiz` tool call whose arguments are the structured quiz.

use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionNamedToolChoice, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolChoiceOption,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionName, FunctionObject,
};
use async_openai::Client;
use async_trait::async_trait;
use color_eyre::eyre::{eyre, OptionExt};
use color_eyre::Result;
use serde_json::json;

use crate::models::{ExercisePayload, GeneratedQuiz};
use crate::names::{MAX_QUESTION_OPTIONS, MIN_QUESTION_OPTIONS};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const FUNCTION_NAME: &str = "generate_quiz";

#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Produce a structured quiz for the given parameters. The returned
    /// object is not bounds-checked here; the quiz store validates the
    /// correct answer indices before persisting.
    async fn generate(&self, params: &ExercisePayload) -> Result<GeneratedQuiz>;
}

pub struct GroqGenerator {
    api_key: String,
    model: String,
    api_base: String,
}

impl GroqGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            api_base: GROQ_API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl QuizGenerator for GroqGenerator {
    async fn generate(&self, params: &ExercisePayload) -> Result<GeneratedQuiz> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt(params))
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt(params))
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.5)
            .tools(vec![ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: FUNCTION_NAME.to_string(),
                    description: Some(
                        "Return the generated quiz as structured questions.".to_string(),
                    ),
                    parameters: Some(quiz_schema()),
                    strict: None,
                },
            }])
            .tool_choice(ChatCompletionToolChoiceOption::Named(
                ChatCompletionNamedToolChoice {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionName {
                        name: FUNCTION_NAME.to_string(),
                    },
                },
            ))
            .build()?;

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let config = OpenAIConfig::new()
            .with_api_base(&self.api_base)
            .with_api_key(&self.api_key);

        let client = Client::with_config(config).with_http_client(http_client);

        tracing::debug!(model = %self.model, "sending quiz generation request");
        let completion = client.chat().create(request).await.map_err(|e| {
            tracing::warn!("quiz generation call failed: {e}");
            eyre!("quiz generation call failed: {e}")
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_eyre("generation provider returned no choices")?;

        let tool_call = choice
            .message
            .tool_calls
            .and_then(|calls| calls.into_iter().next())
            .ok_or_eyre("generation provider returned no tool call")?;

        if tool_call.function.name != FUNCTION_NAME {
            return Err(eyre!(
                "generation provider called the wrong function: {}",
                tool_call.function.name
            ));
        }

        let quiz: GeneratedQuiz =
            serde_json::from_str(&tool_call.function.arguments).map_err(|e| {
                tracing::warn!(
                    arguments = %tool_call.function.arguments,
                    "failed to parse generated quiz: {e}"
                );
                eyre!("failed to parse generated quiz: {e}")
            })?;

        Ok(quiz)
    }
}

/// Fixed instruction encoding question count, difficulty, and the
/// explanation toggle as hard constraints.
fn system_prompt(params: &ExercisePayload) -> String {
    let explanation_rule = if params.toggles.explanation {
        "You MUST provide a brief explanation for each answer."
    } else {
        "You MUST NOT provide an explanation."
    };

    format!(
        "You are an expert quiz generator, specialized in English language learning \
         (like TOEFL or general grammar).\n\
         Generate a quiz based *exactly* on the user's specifications.\n\
         You MUST strictly follow the requested JSON schema output format.\n\
         The user wants exactly {} questions.\n\
         The difficulty level must be {}.\n\
         {}",
        params.number,
        params.difficulty.as_str(),
        explanation_rule
    )
}

fn user_prompt(params: &ExercisePayload) -> String {
    let skills = if params.skills.is_empty() {
        "General English".to_string()
    } else {
        params.skills.join(", ")
    };
    let additional = if params.additional.is_empty() {
        "None"
    } else {
        &params.additional
    };

    format!(
        "Please generate the quiz now with these parameters:\n\
         - Skills to Focus On: {}\n\
         - Specific Interests: {}\n\
         - Difficulty: {}\n\
         - Number of Questions: {}\n\
         - Additional Instructions: {}",
        skills,
        params.interests,
        params.difficulty.as_str(),
        params.number,
        additional
    )
}

/// Target output schema: questions with 4-10 options, a 0-based correct
/// answer index, and an optional explanation.
fn quiz_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "questionText": {
                            "type": "string",
                            "description": "The main text of the question."
                        },
                        "options": {
                            "type": "array",
                            "items": { "type": "string" },
                            "minItems": MIN_QUESTION_OPTIONS,
                            "maxItems": MAX_QUESTION_OPTIONS,
                            "description": "An array of 4 to 10 possible answers."
                        },
                        "correctAnswerIndex": {
                            "type": "integer",
                            "minimum": 0,
                            "maximum": MAX_QUESTION_OPTIONS - 1,
                            "description": "The 0-based index of the correct answer in the options array."
                        },
                        "explanation": {
                            "type": "string",
                            "description": "A brief explanation for why the answer is correct."
                        }
                    },
                    "required": ["questionText", "options", "correctAnswerIndex"]
                }
            }
        },
        "required": ["questions"]
    })
}
