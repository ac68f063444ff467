use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkweave")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkweave")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress and per-link output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" ... "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl outward from a seed link up to a maximum depth and map how the \
                pages link to each other.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The seed link (prompted for when omitted)")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum graph depth, 0-20 (prompted for when omitted)"),
                )
                .arg(
                    arg!(--"seed" <SEED>)
                        .required(false)
                        .help("Seed the random link budget so a crawl can be repeated")
                        .value_parser(clap::value_parser!(u64))
                        .conflicts_with("link-budget"),
                )
                .arg(
                    arg!(--"link-budget" <BUDGET>)
                        .required(false)
                        .help("Use a fixed per-page link budget instead of a random one in [0, 10)")
                        .value_parser(clap::value_parser!(f64))
                        .conflicts_with("seed"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"skip-failed")
                        .required(false)
                        .help("Skip pages that fail to load instead of aborting the crawl")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the graph to a file (format from --format or the extension)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Graph format: text, json, dot, svg (svg needs graphviz)")
                        .value_parser(["text", "json", "dot", "svg"]),
                ),
        )
}
