use clap::Args;
use serde::Serialize;

use crate::catalog::corpus::Corpus;
use crate::catalog::store::BookRoute;
use crate::cli::OutputFormat;
use crate::core::types::{CanonicalKey, DatasetId};

#[derive(Args)]
pub struct ResolveArgs {
    /// Dataset id (bible, bibel, latin)
    #[arg(required = true)]
    pub dataset: DatasetId,

    /// Book as it would appear in a URL, e.g. "1-mo" or "Johannes"
    #[arg(required = true)]
    pub book: String,
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    dataset: DatasetId,
    segment: &'a str,
    route: &'a BookRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical_key: Option<CanonicalKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    osis_code: Option<&'a str>,
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if the dataset or the canonical registry cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ResolveArgs,
    format: OutputFormat,
    corpus: &Corpus,
    verbose: bool,
) -> anyhow::Result<()> {
    let route = corpus.route_book(args.dataset, &args.book)?;
    let registry = corpus.registry()?;

    let slug = match &route {
        BookRoute::Canonical(slug) | BookRoute::Redirect(slug) => Some(slug.as_str()),
        BookRoute::NotFound => None,
    };
    let output = ResolveOutput {
        dataset: args.dataset,
        segment: &args.book,
        route: &route,
        canonical_key: slug.map(|s| corpus.canonical_key_for(args.dataset, s)),
        osis_code: slug.and_then(|s| registry.osis_code_for(args.dataset, s)),
    };

    match format {
        OutputFormat::Text => print_text(&output, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Tsv => {
            println!("dataset\tsegment\tstatus\tslug\tcanonical_key\tosis_code");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                output.dataset,
                output.segment,
                status(output.route),
                slug.unwrap_or(""),
                output.canonical_key.as_ref().map_or("", CanonicalKey::as_str),
                output.osis_code.unwrap_or("")
            );
        }
    }

    if matches!(route, BookRoute::NotFound) {
        anyhow::bail!("{} has no book '{}'", args.dataset, args.book);
    }
    Ok(())
}

fn status(route: &BookRoute) -> &'static str {
    match route {
        BookRoute::Canonical(_) => "canonical",
        BookRoute::Redirect(_) => "redirect",
        BookRoute::NotFound => "not_found",
    }
}

fn print_text(output: &ResolveOutput<'_>, verbose: bool) {
    match output.route {
        BookRoute::Canonical(slug) => println!("{slug}"),
        BookRoute::Redirect(slug) => println!("{slug} (redirect from '{}')", output.segment),
        BookRoute::NotFound => println!("not found"),
    }
    if verbose {
        if let Some(key) = &output.canonical_key {
            println!("canonical key: {key}");
        }
        if let Some(code) = output.osis_code {
            println!("OSIS code: {code}");
        }
    }
}
