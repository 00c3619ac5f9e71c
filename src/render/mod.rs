//! Output rendering for documents.
//!
//! The dump format prints every paragraph that still has text after
//! trimming, followed by one blank line:
//!
//! ```no_run
//! use docdump::{parse_file, render};
//!
//! let doc = parse_file("document.docx")?;
//! let text = render::to_text(&doc);
//!
//! let stdout = std::io::stdout();
//! let blocks = render::write_text(&doc, &mut stdout.lock())?;
//! # Ok::<(), docdump::Error>(())
//! ```

mod text;

pub use text::{non_blank_paragraphs, to_text, write_text};
