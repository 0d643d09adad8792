pub mod api_server;
pub mod handlers;
pub mod multipart_form;
