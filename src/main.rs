use anyhow::Result;
use clap::{Parser, Subcommand};
use dirc::areas::index::DecodeOptions;
use dirc::areas::session::Session;
use dirc::commands::plumbing::ls_files::ListFormat;

#[derive(Parser)]
#[command(
    name = "dirc",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A git index file decoder",
    long_about = "This is a small reader for git's index file (.git/index), written in Rust. \
    It decodes the version 2 header and entry list without needing git itself.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Reject entries whose alignment padding is missing or not all null bytes"
    )]
    strict_padding: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "dump",
        about = "Print every entry of an index file",
        long_about = "This command prints every decoded entry, a separator line, \
        and then the SHA-1 of each entry in hexadecimal."
    )]
    Dump {
        #[arg(index = 1, help = "The path to the index file")]
        index: String,
    },
    #[command(
        name = "header",
        about = "Print the header of an index file",
        long_about = "This command prints the signature, version and entry count of an index file."
    )]
    Header {
        #[arg(index = 1, help = "The path to the index file")]
        index: String,
    },
    #[command(
        name = "ls-files",
        about = "List the paths staged in an index file",
        long_about = "This command lists the staged paths in index order. \
        It can also show the mode, object name and stage of each entry."
    )]
    LsFiles {
        #[arg(index = 1, help = "The path to the index file")]
        index: String,
        #[arg(short, long, help = "Show mode, object name and stage number")]
        stage: bool,
        #[arg(
            short,
            long,
            conflicts_with = "stage",
            help = "Show mode, object name, size and modification time"
        )]
        long: bool,
        #[arg(long, help = "Show the stat data of each entry")]
        debug: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = DecodeOptions::new(cli.strict_padding);

    match &cli.command {
        Commands::Dump { index } => {
            let session = Session::new(index, Box::new(std::io::stdout()), options);

            session.dump()?
        }
        Commands::Header { index } => {
            let session = Session::new(index, Box::new(std::io::stdout()), options);

            session.show_header()?
        }
        Commands::LsFiles {
            index,
            stage,
            long,
            debug,
        } => {
            let session = Session::new(index, Box::new(std::io::stdout()), options);
            let format = match (*stage, *long) {
                (true, _) => ListFormat::Stage,
                (_, true) => ListFormat::Long,
                _ => ListFormat::Names,
            };

            session.ls_files(format, *debug)?
        }
    }

    Ok(())
}
