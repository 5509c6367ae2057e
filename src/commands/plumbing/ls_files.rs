use crate::areas::session::Session;
use crate::artifacts::index::index_entry::IndexEntry;
use std::io::Write;

const MTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which columns `ls-files` prints in front of each path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    #[default]
    Names,
    /// `<mode> <sha1> <stage>\t<path>`, as `git ls-files --stage`
    Stage,
    /// `<mode> <sha1> <size> <mtime>\t<path>`
    Long,
}

impl Session {
    pub fn ls_files(&self, format: ListFormat, debug: bool) -> anyhow::Result<()> {
        self.with_index(|index| {
            let mut writer = self.writer();

            for entry in index.iter()? {
                match format {
                    ListFormat::Names => writeln!(writer, "{}", entry.path_lossy())?,
                    ListFormat::Stage => writeln!(
                        writer,
                        "{} {} {}\t{}",
                        entry.mode(),
                        entry.sha1,
                        entry.stage(),
                        entry.path_lossy()
                    )?,
                    ListFormat::Long => {
                        let mtime = entry
                            .mtime()
                            .map(|mtime| mtime.format(MTIME_FORMAT).to_string())
                            .unwrap_or_else(|| String::from("-"));
                        writeln!(
                            writer,
                            "{} {} {:>8} {}\t{}",
                            entry.mode(),
                            entry.sha1,
                            entry.metadata.file_size,
                            mtime,
                            entry.path_lossy()
                        )?
                    }
                }

                if debug {
                    write_stat(&mut *writer, entry)?;
                }
            }

            Ok(())
        })
    }
}

// Same layout as `git ls-files --debug`
fn write_stat(writer: &mut impl Write, entry: &IndexEntry) -> std::io::Result<()> {
    let stat = &entry.metadata;

    writeln!(writer, "  ctime: {}:{}", stat.ctime_seconds, stat.ctime_nanoseconds)?;
    writeln!(writer, "  mtime: {}:{}", stat.mtime_seconds, stat.mtime_nanoseconds)?;
    writeln!(writer, "  dev: {}\tino: {}", stat.dev, stat.ino)?;
    writeln!(writer, "  uid: {}\tgid: {}", stat.uid, stat.gid)?;
    writeln!(writer, "  size: {}\tflags: {:x}", stat.file_size, stat.flags)
}
