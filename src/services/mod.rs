pub mod seed;
pub mod solution_stacks;

use std::future::Future;

use crate::error::AppError;

/// Handles one query type. Route handlers build the query and call the
/// matching handler directly.
pub trait QueryHandler<Q> {
    type Output;

    fn handle(&self, query: Q) -> impl Future<Output = Result<Self::Output, AppError>> + Send;
}
