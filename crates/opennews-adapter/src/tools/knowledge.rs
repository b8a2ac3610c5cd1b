/*
[INPUT]:  Bundled knowledge directory
[OUTPUT]: Static resource text, verbatim
[POS]:    Tool layer - knowledge resources
[UPDATE]: When adding bundled resources
*/

use std::path::Path;

use crate::tools::ToolContext;

/// Read one bundled knowledge file; a fixed message when absent
pub fn read_knowledge(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name))
        .unwrap_or_else(|_| format!("Knowledge file '{name}' not found."))
}

/// Usage guide resource: tool workflows and search strategies
pub fn knowledge_guide(ctx: &ToolContext) -> String {
    read_knowledge(&ctx.knowledge_dir, "guide.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_fixed_message() {
        let dir = std::env::temp_dir().join("opennews-knowledge-missing");
        assert_eq!(
            read_knowledge(&dir, "guide.md"),
            "Knowledge file 'guide.md' not found."
        );
    }

    #[test]
    fn test_existing_file_returned_verbatim() {
        let dir = std::env::temp_dir().join(format!("opennews-knowledge-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(dir.join("guide.md"), "# Guide\nbody\n").expect("write");

        assert_eq!(read_knowledge(&dir, "guide.md"), "# Guide\nbody\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
