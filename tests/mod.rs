mod common;

mod change_analyzer_tests;
mod decompilation_tests;
mod workspace_tests;
