use std::path::{Path, PathBuf};

use clap::Args;

use crate::catalog::corpus::Corpus;
use crate::cli::OutputFormat;
use crate::core::types::DatasetId;
use crate::matching::engine::{
    LinkedText, MatcherConfig, ReferenceMatcher, DEFAULT_LINK_CLASS, DEFAULT_MAX_BOOK_WORDS,
    MAX_BOOK_WORDS,
};
use crate::utils::validation::validate_link_text;

#[derive(Args)]
pub struct LinkArgs {
    /// Input file (HTML or plain text)
    /// Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Dataset whose abbreviations are tried first
    #[arg(short, long, default_value = "bible")]
    pub dataset: DatasetId,

    /// Maximum number of words in a book name
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_BOOK_WORDS,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
            .range(1..=MAX_BOOK_WORDS as u64)
    )]
    pub max_book_words: usize,

    /// Class attribute of generated links
    #[arg(long, default_value = DEFAULT_LINK_CLASS)]
    pub link_class: String,
}

/// Execute link subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or the dataset cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: LinkArgs,
    format: OutputFormat,
    corpus: &Corpus,
    verbose: bool,
) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    validate_link_text(&text)?;

    let config = MatcherConfig {
        max_book_words: args.max_book_words,
        link_class: args.link_class.clone(),
    };
    let matcher = ReferenceMatcher::new(corpus, config);
    let linked = matcher.link_references(&text, args.dataset)?;

    if verbose {
        eprintln!(
            "Linked {} citation(s) using {} abbreviations (book names up to {} words)",
            linked.matches.len(),
            args.dataset,
            matcher.config().max_book_words
        );
    }

    match format {
        OutputFormat::Text => print!("{}", linked.html),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&linked)?),
        OutputFormat::Tsv => print_tsv(&linked),
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    use std::io::{self, Read};

    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn print_tsv(linked: &LinkedText) {
    println!("start\tend\tbook_text\tshort_name\tdataset\tchapter\tverse_from\tverse_to\tpath");
    for m in &linked.matches {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            m.span.start,
            m.span.end,
            m.book_text,
            m.resolved_short_name,
            m.effective_dataset,
            m.chapter,
            m.verse_from,
            m.verse_to,
            m.path
        );
    }
}
