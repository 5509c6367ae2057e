use crate::areas::session::Session;

/// Separator between the entry listing and the hash listing
const SEPARATOR_WIDTH: usize = 40;

impl Session {
    pub fn dump(&self) -> anyhow::Result<()> {
        self.with_index(|index| {
            let entries = index.entries()?;
            let mut writer = self.writer();

            for entry in entries {
                writeln!(writer, "{entry:?}")?;
            }
            writeln!(writer, "{}", "=".repeat(SEPARATOR_WIDTH))?;
            // A second traversal, served from the decoded entries
            for entry in index.iter()? {
                writeln!(writer, "{}", entry.sha1)?;
            }

            Ok(())
        })
    }
}
