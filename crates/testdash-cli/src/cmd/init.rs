use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use testdash_core::project::{scaffold, ScaffoldOptions};

pub fn run(root: &Path, force: bool, no_git: bool, json: bool) -> anyhow::Result<()> {
    let options = ScaffoldOptions {
        force,
        gitignore: !no_git,
    };
    let report = scaffold(root, options).context("failed to scaffold project")?;
    if json {
        return print_json(&report);
    }

    for item in &report.created {
        println!("created  {item}");
    }
    for item in &report.updated {
        println!("updated  {item}");
    }
    for item in &report.skipped {
        println!("exists   {item}");
    }
    Ok(())
}
