use std::future::Future;

use async_trait::async_trait;

use super::option::AutocompleteOption;

/// The asynchronous lookup an [`Autocomplete`](super::Autocomplete) is
/// built over. Failures are allowed; the controller swallows them.
#[async_trait]
pub trait OptionSource<T>: Send + Sync {
    async fn fetch_options(&self, query: &str) -> anyhow::Result<Vec<AutocompleteOption<T>>>;
}

/// Adapts an async closure into an [`OptionSource`].
pub struct FnSource<F>(F);

pub fn source_fn<F>(f: F) -> FnSource<F> {
    FnSource(f)
}

#[async_trait]
impl<T, F, Fut> OptionSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<AutocompleteOption<T>>>> + Send + 'static,
{
    async fn fetch_options(&self, query: &str) -> anyhow::Result<Vec<AutocompleteOption<T>>> {
        (self.0)(query.to_string()).await
    }
}
