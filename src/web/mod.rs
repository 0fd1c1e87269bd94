//! JSON web API over the corpus.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! interlinear --corpus ./corpus serve
//!
//! # Custom port and auto-open browser
//! interlinear serve --port 3000 --open
//!
//! # Bind to all interfaces
//! interlinear serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /api/datasets` - Datasets with their books in canonical order
//! - `GET /api/passage/{datasets}/{book}/{locant}` - Interlinear composite; a
//!   non-canonical book segment answers with a permanent redirect
//! - `POST /api/link` - `{"dataset": "...", "text": "..."}` to linked HTML and matches
//! - `GET /api/resolve/{dataset}/{book}` - Canonicalize a book segment

pub mod server;
