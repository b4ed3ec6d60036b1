//! Builtin text transforms available by name in every registry.

use super::{AssetTransform, TransformFactory, utf8};
use crate::bundler::error::Result;
use bytes::Bytes;
use futures_lite::future::Boxed;
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, LazyLock},
};

/// Removes `/* ... */` block comments.
pub const STRIP_COMMENTS: &str = "strip-comments";

/// Collapses every run of whitespace into a single space.
pub const COLLAPSE_WHITESPACE: &str = "collapse-whitespace";

/// Trims leading and trailing whitespace.
pub const TRIM: &str = "trim";

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)/\*.*?\*/").unwrap_or_else(|e| unreachable!("invalid builtin regex: {e}"))
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap_or_else(|e| unreachable!("invalid builtin regex: {e}"))
});

#[derive(Debug, Clone, Copy)]
enum Builtin {
    StripComments,
    CollapseWhitespace,
    Trim,
}

impl Builtin {
    fn rewrite(self, text: &str) -> String {
        match self {
            Builtin::StripComments => BLOCK_COMMENT.replace_all(text, "").into_owned(),
            Builtin::CollapseWhitespace => WHITESPACE_RUN.replace_all(text, " ").into_owned(),
            Builtin::Trim => text.trim().to_string(),
        }
    }
}

struct BuiltinFactory(Builtin);

impl TransformFactory for BuiltinFactory {
    fn create(&self, file: &Path) -> Box<dyn AssetTransform> {
        Box::new(BuiltinStage {
            builtin: self.0,
            file: file.to_path_buf(),
        })
    }
}

struct BuiltinStage {
    builtin: Builtin,
    file: PathBuf,
}

impl AssetTransform for BuiltinStage {
    fn apply(self: Box<Self>, input: Bytes) -> Boxed<Result<Bytes>> {
        let result =
            utf8(&self.file, &input).map(|text| Bytes::from(self.builtin.rewrite(&text)));
        Box::pin(futures_lite::future::ready(result))
    }
}

/// All builtins with their registry names.
pub(super) fn builtins() -> Vec<(&'static str, Arc<dyn TransformFactory>)> {
    [
        (STRIP_COMMENTS, Builtin::StripComments),
        (COLLAPSE_WHITESPACE, Builtin::CollapseWhitespace),
        (TRIM, Builtin::Trim),
    ]
    .into_iter()
    .map(|(name, builtin)| {
        let factory: Arc<dyn TransformFactory> = Arc::new(BuiltinFactory(builtin));
        (name, factory)
    })
    .collect()
}
