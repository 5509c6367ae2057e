use crate::areas::session::Session;

impl Session {
    pub fn show_header(&self) -> anyhow::Result<()> {
        self.with_index(|index| {
            let header = index.header();
            let mut writer = self.writer();

            writeln!(writer, "signature {}", header.signature_lossy())?;
            writeln!(writer, "version {}", header.version)?;
            writeln!(writer, "entries {}", header.entry_count)?;

            Ok(())
        })
    }
}
