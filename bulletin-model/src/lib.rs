//! Domain records for the Bulletin CMS.
//!
//! Each record mirrors the backend's JSON shape (camelCase keys) and
//! implements [`Entity`](bulletin_types::Entity) so the collection core
//! can manage it. Write payloads (`*Draft`, `*Patch`) are separate types:
//! the backend assigns ids, slugs, and timestamps, so they never appear in
//! anything a client sends.

mod article;
mod category;
mod media;

pub use article::{Article, ArticleDraft, ArticlePatch, ArticleStatus};
pub use category::{Category, CategoryDraft, CategoryPatch};
pub use media::MediaFile;
