pub mod anthropic_message;
pub mod anthropic_message_request;
pub mod anthropic_response;
