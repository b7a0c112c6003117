//! CLI domain: parse, route, output, and presentation only.
//! No manifest logic here; the single route table dispatches to the manifest services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_build_summary, format_manifest_json, format_manifest_text, format_verification_json,
    format_verification_text,
};
pub use route::RunContext;
