//! brodl CLI
//!
//! Downloads Broforce workshop maps and keeps the local collection organized.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use brodl_core::util::format_bytes;
use brodl_lib::{
    run, Config, HttpFetcher, PipelineEvent, RunOptions, RunOutcome, RunSummary,
};

#[derive(Parser)]
#[command(name = "brodl")]
#[command(about = "Download and organize Broforce workshop maps", long_about = None)]
struct Cli {
    /// Directory the maps are downloaded into
    #[arg(short, long, default_value = "maps")]
    root: PathBuf,

    /// Settings file (created with defaults if missing)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Start downloading without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.quiet {
        print_banner("SETTINGS");
    }

    let config = match Config::load_or_init(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            eprintln!("Please correct {} and try again.", cli.config.display());
            std::process::exit(1);
        }
    };

    if !cli.quiet {
        print_settings(&config);
    }

    if !cli.yes && !confirm_start() {
        return;
    }

    let fetcher = match HttpFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            std::process::exit(1);
        }
    };

    let options = RunOptions {
        root: cli.root,
        polite_pause: true,
    };

    // Spinner drives all in-flight progress; finished lines go through
    // pb.println so they don't fight with the ticker.
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );

    let quiet = cli.quiet;
    let on_event = |event: PipelineEvent| match event {
        PipelineEvent::ScanPage { current, total } => {
            pb.set_message(format!("Scanning listing pages [{current}/{total}]"));
            pb.tick();
        }
        PipelineEvent::Discovered { count } => {
            if !quiet {
                pb.println(format!(
                    "  {} {} new map(s) to download",
                    "Found".if_supports_color(Stdout, |t| t.bold()),
                    count.if_supports_color(Stdout, |t| t.cyan()),
                ));
            }
        }
        PipelineEvent::Downloading {
            index,
            total,
            title,
        } => {
            pb.set_message(format!("[{index}/{total}] Downloading {title}"));
            pb.tick();
        }
        PipelineEvent::Downloaded { title, bytes } => {
            if !quiet {
                pb.println(format!(
                    "  {} {} {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    title,
                    format!("({})", format_bytes(bytes)).if_supports_color(Stdout, |t| t.dimmed()),
                ));
            }
        }
        PipelineEvent::DownloadFailed { title, reason } => {
            pb.println(format!(
                "  {} {title}: {reason}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            ));
        }
        PipelineEvent::Organizing => {
            pb.set_message("Organizing files into star buckets");
            pb.tick();
        }
        PipelineEvent::Deduplicating => {
            pb.set_message("Scanning for duplicate maps");
            pb.tick();
        }
    };

    match run(&fetcher, &config, &options, on_event) {
        Ok(RunOutcome::NoNewMaps) => {
            pb.finish_and_clear();
            print_banner("NO NEW MAPS");
            println!("There are no new maps to download.");
            println!(
                "Adjust the settings in {} to widen the scan.",
                cli.config.display()
            );
        }
        Ok(RunOutcome::Completed(summary)) => {
            pb.finish_and_clear();
            print_banner("DOWNLOAD COMPLETE");
            print_summary(&summary);
        }
        Err(e) => {
            pb.finish_and_clear();
            eprintln!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            std::process::exit(1);
        }
    }
}

fn print_banner(title: &str) {
    println!();
    println!(
        "{}",
        format!("************      {title}      ************")
            .if_supports_color(Stdout, |t| t.bold()),
    );
    println!();
}

fn print_settings(config: &Config) {
    let gameplay: Vec<&str> = config.gameplay_types.iter().map(|g| g.tag()).collect();
    let difficulty: Vec<&str> = config.difficulty_levels.iter().map(|d| d.tag()).collect();

    println!(
        "{} {}",
        "Number of Pages:".if_supports_color(Stdout, |t| t.cyan()),
        config.page_count,
    );
    println!(
        "{} {}",
        "Maps Per Page:".if_supports_color(Stdout, |t| t.cyan()),
        config.maps_per_page,
    );
    println!(
        "{} {}",
        "Time Period:".if_supports_color(Stdout, |t| t.cyan()),
        config.time_period.label(),
    );
    println!(
        "{} {}",
        "Gameplay Type(s):".if_supports_color(Stdout, |t| t.cyan()),
        gameplay.join(", "),
    );
    println!(
        "{} {}",
        "Difficulty Level(s):".if_supports_color(Stdout, |t| t.cyan()),
        difficulty.join(", "),
    );
}

/// Returns false when the user backs out.
fn confirm_start() -> bool {
    print!("\nPress ENTER to start downloading the maps (q + ENTER to exit): ");
    std::io::stdout().flush().unwrap();

    let mut input = String::new();
    std::io::stdin().read_line(&mut input).unwrap();
    !input.trim().eq_ignore_ascii_case("q")
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} map(s) were successfully downloaded.",
        summary
            .downloaded
            .if_supports_color(Stdout, |t| t.green()),
    );
    if summary.failed > 0 {
        println!(
            "{} map(s) failed and were skipped.",
            summary.failed.if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    let organized = summary.organized;
    if organized.total() > 0 {
        println!(
            "Sorted {} file(s): {} five-star, {} four-star, {} lower-rated, {} non-map.",
            organized.total(),
            organized.five_star,
            organized.four_star,
            organized.three_or_less,
            organized.non_map,
        );
    }

    let dedup = summary.dedup;
    if dedup.groups > 0 {
        println!(
            "Quarantined {} duplicate(s) across {} group(s), reclaiming {}.",
            dedup.quarantined,
            dedup.groups,
            format_bytes(dedup.quarantined_bytes),
        );
        println!("See duplicates/@duplicates.txt for the full report.");
    }
}
