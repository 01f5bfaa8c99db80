/*!
# Sheetclean

A browser-based spreadsheet cleaning utility, built in Rust.

## Overview

The user uploads a spreadsheet (CSV or Excel), the tool enriches it with two
derived columns — a zeroed `QUERY` marker and a sequential `Row Number`
index — previews the result as a table, and serves the cleaned data back as
a CSV download under a user-chosen filename.

## Architecture

A single linear pipeline behind a small axum web server:

- **Decoder** - turns an uploaded file's bytes plus its declared name into an
  in-memory table (CSV via the `csv` crate, Excel via `calamine`)
- **Transformer** - the pure two-column enrichment
- **Session Store** - holds the most recently cleaned table so the download
  handler never re-parses
- **Web layer** - one page, one upload endpoint, one download endpoint

Uploads arrive as base64 data URLs; any decode or parse failure collapses
into a single generic error message, with the cause logged server-side.

## Modules

- **table**: the table data structure and CSV serialization
- **loader**: data-URL decoding and CSV/Excel parsing
- **transform**: the `QUERY` / `Row Number` enrichment
- **store**: per-session holder of the cleaned table
- **app**: routing and request handlers

## REST API Endpoints

- `GET /` - the single-page UI
- `POST /api/upload` - decode, clean, store, and preview an uploaded file
- `GET /api/download?filename=<stem>` - the stored table as `<stem>.csv`
*/

pub mod app;
pub mod loader;
pub mod store;
pub mod table;
pub mod transform;

/// Re-export the core types to make the pipeline easier to use
pub use store::SessionStore;
pub use table::{Table, Value};
