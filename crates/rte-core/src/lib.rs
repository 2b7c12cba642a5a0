//! Document model and editing engine behind the rich-text editor.
//!
//! The webview page owns live editing; this crate owns everything the host
//! needs to reason about content: the node tree, editing operations with
//! undo history, and conversions to and from HTML, Markdown and Quill Delta.

pub mod comments;
pub mod delta;
pub mod doc;
pub mod editor;
pub mod history;
pub mod html;
pub mod image;
pub mod markdown;
pub mod ops;
pub mod selection;

pub use doc::{Doc, InlineSpan, InlineStyle, McqBlock, McqOption, Node, Table, TableCell};
pub use editor::EditorCore;
pub use history::History;
pub use html::{from_html, to_html};
pub use image::{ImageAlign, ImageAttrs, ImageLimits, ImagePatch};
pub use markdown::to_markdown;
