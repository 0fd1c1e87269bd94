use clap::Args;

use crate::catalog::corpus::Corpus;
use crate::cli::OutputFormat;
use crate::core::path::PassagePath;
use crate::core::types::DatasetId;
use crate::interlinear::{Composer, ComposerConfig, Interlinear, Target};
use crate::parsing::content::VerseFragment;
use crate::utils::quotes::QuoteNormalizer;

#[derive(Args)]
pub struct ComposeArgs {
    /// Passage path, e.g. "bible-bibel/john/3:16-18"
    #[arg(required = true)]
    pub path: String,

    /// Run verse text through the quotation mark normalizer
    #[arg(long)]
    pub quote: bool,
}

/// Execute compose subcommand
///
/// # Errors
///
/// Returns an error if the path is invalid or the primary dataset lacks the book.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ComposeArgs,
    format: OutputFormat,
    corpus: &Corpus,
    verbose: bool,
) -> anyhow::Result<()> {
    let path = PassagePath::parse(&args.path)?;
    let composer = Composer::new(corpus, ComposerConfig::default());
    let composite = composer.compose_path(&path)?;

    if verbose {
        eprintln!(
            "Composed {} verse(s) from {} of {} dataset(s)",
            composite.verses.len(),
            composite.columns.len(),
            path.datasets.len()
        );
    }

    match format {
        OutputFormat::Text => print_text(&composite, args.quote),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&composite)?),
        OutputFormat::Tsv => print_tsv(&composite, args.quote),
    }

    Ok(())
}

fn verse_text(dataset: DatasetId, fragment: &VerseFragment, quote: bool) -> String {
    let text = fragment.plain_text();
    if quote {
        QuoteNormalizer::new(dataset.quote_style()).normalize(&text)
    } else {
        text
    }
}

fn is_highlighted(target: &Target, verse: u32) -> bool {
    match target {
        Target::Highlight { from, to, .. } => (*from..=*to).contains(&verse),
        Target::ChapterScroll { .. } => false,
    }
}

fn print_text(composite: &Interlinear, quote: bool) {
    let columns: Vec<String> = composite
        .columns
        .iter()
        .map(|c| format!("{} [{}]", c.display_name, c.dataset))
        .collect();
    println!("{} {}: {}", composite.book, composite.chapter, columns.join(" | "));
    if let Some(heading) = &composite.heading {
        println!("{heading}");
    }
    for notice in &composite.notices {
        println!("Note: {notice}");
    }
    println!();

    for verse in &composite.verses {
        let marker = if is_highlighted(&composite.target, verse.number) {
            '>'
        } else {
            ' '
        };
        for (idx, cell) in verse.cells.iter().enumerate() {
            let number = if idx == 0 {
                verse.number.to_string()
            } else {
                String::new()
            };
            let text = cell
                .fragment
                .as_ref()
                .map_or_else(|| "-".to_string(), |f| verse_text(cell.dataset, f, quote));
            println!("{marker}{number:>4}  {:<6} {text}", cell.dataset.as_str());
        }
    }
}

fn print_tsv(composite: &Interlinear, quote: bool) {
    println!("verse\tdataset\thighlight\ttext");
    for verse in &composite.verses {
        for cell in &verse.cells {
            let text = cell
                .fragment
                .as_ref()
                .map(|f| verse_text(cell.dataset, f, quote))
                .unwrap_or_default();
            println!(
                "{}\t{}\t{}\t{}",
                verse.number,
                cell.dataset,
                is_highlighted(&composite.target, verse.number),
                text
            );
        }
    }
}
