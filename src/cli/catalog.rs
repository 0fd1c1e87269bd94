use clap::Args;

use crate::catalog::corpus::Corpus;
use crate::cli::OutputFormat;
use crate::core::types::DatasetId;

#[derive(Args)]
pub struct CatalogArgs {
    /// Dataset id (bible, bibel, latin)
    #[arg(required = true)]
    pub dataset: DatasetId,
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: CatalogArgs,
    format: OutputFormat,
    corpus: &Corpus,
    verbose: bool,
) -> anyhow::Result<()> {
    let dataset = corpus.dataset(args.dataset)?;

    match format {
        OutputFormat::Text => {
            println!(
                "{} ({}), {} books",
                dataset.id.info().display_name,
                dataset.locale(),
                dataset.len()
            );
            println!();
            println!("{:>5}  {:<24} {:<24} Name", "Order", "Slug", "Short name");
            println!("{}", "-".repeat(80));
            for book in dataset.books() {
                println!(
                    "{:>5}  {:<24} {:<24} {}",
                    book.order,
                    book.slug(),
                    book.short_name,
                    book.label()
                );
                if verbose {
                    println!("{:>5}  content: {}", "", book.content_locator);
                }
            }
            if verbose {
                println!();
                println!("{} name variants", dataset.abbreviations().len());
            }
        }
        OutputFormat::Json => {
            let books: Vec<serde_json::Value> = dataset
                .books()
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "order": b.order,
                        "slug": b.slug(),
                        "short_name": b.short_name,
                        "display_name": b.display_name,
                        "content_locator": b.content_locator,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "dataset": dataset.id,
                "locale": dataset.locale(),
                "books": books,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("order\tslug\tshort_name\tdisplay_name\tcontent_locator");
            for b in dataset.books() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    b.order,
                    b.slug(),
                    b.short_name,
                    b.display_name.as_deref().unwrap_or(""),
                    b.content_locator
                );
            }
        }
    }

    Ok(())
}
