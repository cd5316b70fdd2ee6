mod commands;
mod error;

use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(
        name = "compress",
        visible_alias = "c",
        about = "Compress one file into a self-contained archive"
    )]
    Compress {
        #[structopt(parse(from_os_str), help = "File to compress")]
        input: PathBuf,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Archive path [default: <input>.lzma]"
        )]
        output: Option<PathBuf>,
    },

    #[structopt(
        name = "decompress",
        visible_alias = "d",
        about = "Restore the file stored in a single-file archive"
    )]
    Decompress {
        #[structopt(parse(from_os_str), help = "Path to the single-file archive")]
        input: PathBuf,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Output file [default: original name, next to the archive]"
        )]
        output: Option<PathBuf>,
    },

    #[structopt(
        name = "create",
        visible_alias = "a",
        about = "Create a multi-file archive and its index"
    )]
    Create {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,

        #[structopt(name = "files", parse(from_os_str), help = "Files to add, in order")]
        files: Vec<PathBuf>,
    },

    #[structopt(
        name = "list",
        visible_alias = "l",
        about = "List files of a multi-file archive"
    )]
    List {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,
    },

    #[structopt(
        name = "extract",
        visible_alias = "x",
        about = "Extract all files of a multi-file archive"
    )]
    Extract {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Output directory [default: current directory]"
        )]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lzpack",
    about = "Create, list and extract LZMA archives.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands]
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);

    let result = match opts.cmd {
        Commands::Compress { input, output } => commands::compress(input, output),
        Commands::Decompress { input, output } => commands::decompress(input, output),
        Commands::Create { path, files } => commands::create(path, files, opts.verbose),
        Commands::List { path } => commands::list(path),
        Commands::Extract { path, output } => commands::extract(path, output, opts.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);

        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }

        eprintln!("{}", e.hint());
        std::process::exit(e.exit_code());
    }
}
