use futures::future::BoxFuture;

use crate::types::ChatRequest;
use crate::Result;

/// Anything that can turn a [`ChatRequest`] into completion text.
///
/// Object-safe so the server can hold an `Arc<dyn ChatModel>` built once at
/// startup and share it across requests.
pub trait ChatModel: Send + Sync {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<String>>;
}

impl<M: ChatModel + ?Sized> ChatModel for std::sync::Arc<M> {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<String>> {
        (**self).complete(request)
    }
}
