//! Command-line interface for interlinear.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **link**: Turn scripture citations in a text into links
//! - **compose**: Print one chapter side by side across datasets
//! - **resolve**: Canonicalize a book name for a dataset
//! - **catalog**: List a dataset's books
//! - **serve**: Start the JSON web API
//!
//! ## Usage
//!
//! ```text
//! # Link citations in an HTML fragment
//! interlinear --corpus ./corpus link notes.html --dataset bible
//!
//! # Pipe text in
//! echo "See Joh 3:16" | interlinear link - --dataset bibel
//!
//! # English and German side by side, verses 16-18 highlighted
//! interlinear compose bible-bibel/john/3:16-18
//!
//! # JSON output for scripting
//! interlinear --format json compose bible-bibel-latin/john/3
//!
//! # Start the API server
//! interlinear serve --port 8080 --open
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod compose;
pub mod link;
pub mod resolve;

#[derive(Parser)]
#[command(name = "interlinear")]
#[command(version)]
#[command(about = "Resolve scripture citations and compose interlinear passages")]
#[command(
    long_about = "interlinear links free-form scripture citations to passages and renders \
        chapters verse by verse across several independently segmented editions.\n\n\
        The corpus directory holds canonical.json, osis.json and one directory per dataset \
        with books.tsv, abbreviations.tsv and the XHTML content files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Corpus directory
    #[arg(long, global = true, env = "INTERLINEAR_CORPUS", default_value = "corpus")]
    pub corpus: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link scripture citations in a text
    Link(link::LinkArgs),

    /// Compose a chapter across datasets
    Compose(compose::ComposeArgs),

    /// Canonicalize a book name
    Resolve(resolve::ResolveArgs),

    /// List the books of a dataset
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
