use std::future::Future;

use crate::error::QueryError;
use crate::page::{PageRequest, PageResponse};

use super::ResourceKind;

/// One resource collection that can be listed page by page.
pub trait PageSource {
    type Item;

    fn list_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<PageResponse<Self::Item>, QueryError>> + Send;
}

/// Single-object lookups in one namespace.
pub trait ObjectSource {
    type Object;

    fn kind(&self) -> ResourceKind;

    fn namespace(&self) -> &str;

    fn get_object(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Self::Object, QueryError>> + Send;
}
