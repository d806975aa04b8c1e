use anyhow::{Context, anyhow};
use biblatex::{Bibliography, Entry};
use bibkit::{
    comparator::{ComparatorStack, FieldComparator},
    link,
};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::info;

use crate::cli::{Cli, Command};

mod cli;
mod logging;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init_logging(args.verbose)?;
    let color = std::env::var_os("NO_COLOR").is_none();

    match args.command {
        Command::Sort {
            from,
            fields,
            reverse,
            keys,
            json,
        } => {
            let input = from
                .read_to_string()
                .with_context(|| format!("failed to read {from}"))?;
            let bib = Bibliography::parse(&input)
                .map_err(|e| anyhow!("failed to parse BibLaTeX from {from}: {e}"))?;
            let entries: Vec<Entry> = bib.iter().cloned().collect();

            let stack = ComparatorStack::new(
                fields
                    .iter()
                    .map(|field| FieldComparator::with_order(field.as_str(), reverse))
                    .collect(),
            );
            let sorted = stack
                .sort(entries)
                .with_context(|| format!("failed to sort {from} by {}", fields.join(", ")))?;
            info!(entries = sorted.len(), "sorted {from}");

            if json {
                let keys: Vec<&str> = sorted.iter().map(|e| e.key.as_str()).collect();
                println!("{}", serde_json::to_string(&keys)?);
            } else if keys {
                for entry in &sorted {
                    println!("{}", entry.key);
                }
            } else {
                for entry in &sorted {
                    println!("{}", entry.to_biblatex_string());
                }
            }
            summary(color, "sorted", sorted.len(), None);
        }
        Command::Clean { urls } => {
            let changed = print_each(&urls, link::clean_search_redirect);
            summary(color, "unwrapped", changed, Some(urls.len() - changed));
        }
        Command::Sanitize { links } => {
            let changed = print_each(&links, link::sanitize);
            summary(color, "rewritten", changed, Some(links.len() - changed));
        }
    }
    Ok(())
}

/// Print `f` of every input on its own line; return how many came out different.
fn print_each(inputs: &[String], f: fn(&str) -> String) -> usize {
    inputs
        .iter()
        .filter(|input| {
            let output = f(input);
            println!("{output}");
            output != **input
        })
        .count()
}

fn summary(color: bool, verb: &str, done: usize, kept: Option<usize>) {
    let done = format!("✓ {done}");
    let kept = kept.map(|k| format!("= {k}"));
    match (color, kept) {
        (true, Some(kept)) => eprintln!("{} {verb}  {}", done.green(), kept.dimmed()),
        (false, Some(kept)) => eprintln!("{done} {verb}  {kept}"),
        (true, None) => eprintln!("{} {verb}", done.green()),
        (false, None) => eprintln!("{done} {verb}"),
    }
}
