use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use linkweave::handlers::{handle_crawl, init_tracing};
use linkweave_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    init_tracing(chosen_command.get_count("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => run_crawl(primary_command, quiet).await,
        None => {
            println!("Run `linkweave crawl --help` to get started.");
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn run_crawl(args: &ArgMatches, quiet: bool) {
    if let Err(e) = handle_crawl(args, quiet).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
