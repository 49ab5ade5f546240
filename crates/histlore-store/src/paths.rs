use std::path::PathBuf;

/// All well-known paths under a histlore workspace root.
#[derive(Debug, Clone)]
pub struct HistlorePaths {
    pub root: PathBuf,
    /// Imported raw history lines, one file per import run.
    pub raw_dir: PathBuf,
    pub data_dir: PathBuf,
    /// Timestamped copies of every aggregated snapshot.
    pub snapshots_dir: PathBuf,
    pub prompts_dir: PathBuf,
    /// Generated cheatsheet entries, one JSON file per command.
    pub entries_dir: PathBuf,
    pub output_dir: PathBuf,
    pub prompts_web_dir: PathBuf,
    pub patterns_json: PathBuf,
    pub state_json: PathBuf,
    pub config_json: PathBuf,
    pub regen_plan_json: PathBuf,
    pub report_txt: PathBuf,
    pub lock_file: PathBuf,
}

impl HistlorePaths {
    /// Derive all paths from a workspace root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join("data");
        let output_dir = root.join("output");
        Self {
            raw_dir: root.join("raw"),
            snapshots_dir: root.join("snapshots"),
            prompts_dir: root.join("prompts"),
            entries_dir: root.join("cheatsheets").join("entries"),
            prompts_web_dir: output_dir.join("prompts_web"),
            patterns_json: root.join("patterns.json"),
            state_json: root.join("state.json"),
            config_json: root.join("config.json"),
            regen_plan_json: data_dir.join("regen_plan.json"),
            report_txt: output_dir.join("report.txt"),
            lock_file: root.join("LOCK"),
            data_dir,
            output_dir,
            root,
        }
    }

    /// Create all required directories. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        for dir in [
            &self.raw_dir,
            &self.data_dir,
            &self.snapshots_dir,
            &self.prompts_dir,
            &self.entries_dir,
            &self.output_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Path of the generated entry for one command.
    pub fn entry_path(&self, command: &str) -> PathBuf {
        self.entries_dir
            .join(format!("{}.json", safe_file_name(command)))
    }
}

/// Map a command name to a name safe for per-command artifact files.
/// Separators and other hostile characters become `_`; the result is capped
/// at 80 characters and never empty.
pub fn safe_file_name(name: &str) -> String {
    if name.trim().is_empty() {
        return "command".to_string();
    }
    let mut out: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if out.len() > 80 {
        out.truncate(out.char_indices().nth(80).map_or(out.len(), |(i, _)| i));
    }
    let trimmed = out.trim();
    if trimmed.is_empty() {
        "command".to_string()
    } else {
        trimmed.to_string()
    }
}
