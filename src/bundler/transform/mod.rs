//! Content transforms applied to asset files.
//!
//! A package declares an ordered list of [`TransformSpec`]s. Each spec is
//! resolved once per package into a [`TransformFactory`]; the factory is then
//! invoked once per matched file to produce a fresh [`AssetTransform`], since
//! transforms may keep per-file state.

mod builtin;
mod command;
mod registry;
mod resolver;

pub use builtin::{COLLAPSE_WHITESPACE, STRIP_COMMENTS, TRIM};
pub use command::CommandTransform;
pub use registry::TransformRegistry;
pub use resolver::{DEFAULT_DEPENDENCY_DIR, ResolutionStrategy, StrategyMiss, TransformResolver};

use crate::bundler::error::{Error, Result};
use bytes::Bytes;
use futures_lite::future::Boxed;
use serde::{Deserialize, Deserializer};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

/// One transform stage for one asset file.
pub trait AssetTransform: Send {
    /// Consumes the stage and rewrites the file's full content.
    fn apply(self: Box<Self>, input: Bytes) -> Boxed<Result<Bytes>>;
}

/// Produces a fresh [`AssetTransform`] for each asset file.
pub trait TransformFactory: Send + Sync {
    /// Creates the stage that will process `file`.
    fn create(&self, file: &Path) -> Box<dyn AssetTransform>;
}

/// A transform reference as declared by a package.
#[derive(Clone)]
pub enum TransformSpec {
    /// A factory supplied directly; used without resolution.
    Inline(Arc<dyn TransformFactory>),
    /// A registered name, executable name, or path to resolve.
    Named(String),
}

impl TransformSpec {
    /// Creates a named spec.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Name used in logs and error messages.
    pub fn name(&self) -> String {
        match self {
            Self::Inline(_) => "<inline>".to_string(),
            Self::Named(name) => name.clone(),
        }
    }
}

impl fmt::Debug for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(<factory>)"),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl<'de> Deserialize<'de> for TransformSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Named)
    }
}

impl From<&str> for TransformSpec {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

/// Builds an inline transform from a content-rewriting closure.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use kodegen_bundler_assets::bundler::transform_fn;
///
/// let wrap = transform_fn(|css: Bytes| {
///     Ok(Bytes::from(format!("/*{}*/", String::from_utf8_lossy(&css))))
/// });
/// ```
pub fn transform_fn<F>(f: F) -> TransformSpec
where
    F: Fn(Bytes) -> anyhow::Result<Bytes> + Send + Sync + 'static,
{
    TransformSpec::Inline(Arc::new(FnFactory { f: Arc::new(f) }))
}

type RewriteFn = dyn Fn(Bytes) -> anyhow::Result<Bytes> + Send + Sync;

struct FnFactory {
    f: Arc<RewriteFn>,
}

impl TransformFactory for FnFactory {
    fn create(&self, file: &Path) -> Box<dyn AssetTransform> {
        Box::new(FnStage {
            f: Arc::clone(&self.f),
            file: file.to_path_buf(),
        })
    }
}

struct FnStage {
    f: Arc<RewriteFn>,
    file: PathBuf,
}

impl AssetTransform for FnStage {
    fn apply(self: Box<Self>, input: Bytes) -> Boxed<Result<Bytes>> {
        let result = (self.f)(input).map_err(|e| Error::AssetTransform {
            path: self.file.clone(),
            reason: format!("{e:#}"),
        });
        Box::pin(futures_lite::future::ready(result))
    }
}

/// A package's resolved transform chain.
#[derive(Clone, Default)]
pub struct TransformChain {
    factories: Vec<Arc<dyn TransformFactory>>,
}

impl TransformChain {
    /// Creates a chain applying `factories` in order.
    pub fn new(factories: Vec<Arc<dyn TransformFactory>>) -> Self {
        Self { factories }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the chain passes content through unchanged.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Runs `content` of `file` through every stage in declared order.
    ///
    /// Each stage is created fresh for this file and sees the complete output
    /// of the previous one.
    pub async fn apply(&self, file: &Path, content: Bytes) -> Result<Bytes> {
        let stages: Vec<_> = self
            .factories
            .iter()
            .map(|factory| factory.create(file))
            .collect();

        let mut content = content;
        for stage in stages {
            content = stage.apply(content).await?;
        }
        Ok(content)
    }
}

impl fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformChain")
            .field("stages", &self.factories.len())
            .finish()
    }
}

/// Decodes asset content as UTF-8 for text transforms.
pub(crate) fn utf8(file: &Path, content: &Bytes) -> Result<String> {
    String::from_utf8(content.to_vec()).map_err(|e| Error::AssetTransform {
        path: file.to_path_buf(),
        reason: format!("asset is not valid UTF-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chain_of(specs: Vec<TransformSpec>) -> TransformChain {
        TransformChain::new(
            specs
                .into_iter()
                .map(|spec| match spec {
                    TransformSpec::Inline(factory) => factory,
                    TransformSpec::Named(name) => panic!("unexpected named spec {name}"),
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn stages_apply_in_declared_order() {
        let t1 = transform_fn(|b: Bytes| Ok(Bytes::from(format!("1({})", String::from_utf8_lossy(&b)))));
        let t2 = transform_fn(|b: Bytes| Ok(Bytes::from(format!("2({})", String::from_utf8_lossy(&b)))));

        let out = chain_of(vec![t1, t2])
            .apply(Path::new("a.css"), Bytes::from_static(b"c"))
            .await
            .unwrap();
        assert_eq!(out, Bytes::from_static(b"2(1(c))"));
    }

    #[tokio::test]
    async fn empty_chain_is_identity() {
        let out = TransformChain::default()
            .apply(Path::new("a.css"), Bytes::from_static(b"body{}"))
            .await
            .unwrap();
        assert_eq!(out, Bytes::from_static(b"body{}"));
    }

    #[tokio::test]
    async fn closure_errors_name_the_file() {
        let failing = transform_fn(|_| Err(anyhow::anyhow!("bad input")));
        let err = chain_of(vec![failing])
            .apply(Path::new("/p/a.css"), Bytes::new())
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::AssetTransform { ref path, ref reason } if path == Path::new("/p/a.css") && reason == "bad input")
        );
    }

    struct Counting(Arc<AtomicUsize>);

    impl TransformFactory for Counting {
        fn create(&self, file: &Path) -> Box<dyn AssetTransform> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Box::new(FnStage {
                f: Arc::new(|b: Bytes| -> anyhow::Result<Bytes> { Ok(b) }),
                file: file.to_path_buf(),
            })
        }
    }

    #[tokio::test]
    async fn factory_invoked_once_per_file() {
        let created = Arc::new(AtomicUsize::new(0));
        let chain = TransformChain::new(vec![Arc::new(Counting(created.clone()))]);

        chain.apply(Path::new("a.css"), Bytes::new()).await.unwrap();
        chain.apply(Path::new("b.css"), Bytes::new()).await.unwrap();
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }
}
