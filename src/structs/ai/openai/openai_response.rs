use serde::Deserialize;
use crate::structs::ai::openai::openai_message::OpenAIMessage;

#[derive(Deserialize, Debug)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
}
