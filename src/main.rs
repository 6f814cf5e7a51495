use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pagepool::{BufferPool, PAGE_SIZE, PageStore};

#[derive(Parser)]
#[command(name = "pagepool", about = "Inspect and edit a paged heap file")]
struct Cli {
    /// Path to the backing heap file
    file: PathBuf,

    /// Maximum number of pages held in memory
    #[arg(long, default_value_t = 64)]
    max_pages: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the page count and file length
    Stat,
    /// Allocate zero-filled pages at the end of the file
    Alloc {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Read a big-endian u32 from a page
    ReadInt { page: usize, offset: usize },
    /// Write a big-endian u32 into a page and flush it
    WriteInt {
        page: usize,
        offset: usize,
        value: u32,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.max_pages == 0 {
        return Err("--max-pages must be at least 1".into());
    }

    let store = PageStore::open(&cli.file)?;
    let mut pool = BufferPool::new(store, cli.max_pages);

    match cli.command {
        Command::Stat => {
            let pages = pool.store().page_count()?;
            println!(
                "{}: {} pages ({} bytes)",
                cli.file.display(),
                pages,
                pages * PAGE_SIZE
            );
        }
        Command::Alloc { count } => {
            for _ in 0..count {
                println!("{}", pool.allocate_new_page()?);
            }
        }
        Command::ReadInt { page, offset } => {
            println!("{}", pool.get_page(page)?.read_int(offset)?);
        }
        Command::WriteInt {
            page,
            offset,
            value,
        } => {
            pool.get_page_mut(page)?.write_int(offset, value)?;
            pool.flush_all()?;
        }
    }

    Ok(())
}
