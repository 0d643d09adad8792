pub mod decompile_script;
