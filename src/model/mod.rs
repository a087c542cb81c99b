//! Document model types.
//!
//! This module defines the intermediate representation that sits between the
//! package reader/writer and the editing engine. The detector, distributor
//! and mutator only ever see these types, so they can be exercised with
//! hand-built documents and no package at all.

mod document;
mod paragraph;

pub use document::{Block, Document, OpaqueBlock};
pub use paragraph::{Alignment, NumberingRef, Paragraph, ParagraphFormat, TextRun, TextStyle};
