use crate::output::print_json;
use std::path::Path;
use testdash_core::project::ProjectStatus;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let status = ProjectStatus::detect(root);
    if json {
        return print_json(&status);
    }

    let mark = |present: bool| if present { "present" } else { "missing" };
    println!("CLAUDE.md:     {}", mark(status.has_claude_md));
    println!("claude_tasks/: {}", mark(status.has_claude_tasks));
    println!(
        "initialized:   {}",
        if status.initialized { "yes" } else { "no" }
    );
    Ok(())
}
