/// Knobs shared by the library and the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Precede every command's block with a `// <command>` line.
    pub annotate: bool,
    /// Finish the bootstrap with `call <entry>.init 0`.
    pub call_entry: bool,
    /// Unit translated first, right after the bootstrap.
    pub entry_unit: String,
}

pub const DEFAULT_ENTRY_UNIT: &str = "Sys";

impl Default for Options {
    fn default() -> Self {
        Options {
            annotate: false,
            call_entry: false,
            entry_unit: DEFAULT_ENTRY_UNIT.to_string(),
        }
    }
}

impl Options {
    /// Function the bootstrap calls when `call_entry` is set.
    pub fn entry_function(&self) -> String {
        format!("{}.init", self.entry_unit)
    }
}
