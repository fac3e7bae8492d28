use std::future::Future;
use std::pin::pin;

use futures::{stream, Stream, TryStreamExt};
use tracing::debug;

use crate::context::WorkContext;
use crate::error::QueryError;
use crate::page::{PageRequest, PageResponse};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub pages: usize,
    pub items: usize,
}

type WalkState<L> = (Option<PageRequest>, L);

async fn fetch_next<T, L, Fut>(
    ctx: &WorkContext,
    (request, mut list): WalkState<L>,
) -> Result<Option<(PageResponse<T>, WalkState<L>)>, QueryError>
where
    L: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<PageResponse<T>, QueryError>>,
{
    let Some(request) = request else {
        return Ok(None);
    };
    // checked before `list` is called, not only inside `run`, so a cancelled
    // walk never issues another request
    ctx.ensure_active()?;
    let page = ctx.run(list(request.clone())).await?;
    let next = request.next_page(&page);
    Ok(Some((page, (next, list))))
}

/// Walks a paginated collection, yielding one page per list call.
///
/// The walk starts from `first` and follows continuation tokens until the
/// server returns an empty one. The first error ends the stream.
pub fn pages<'a, T, L, Fut>(
    ctx: &'a WorkContext,
    first: PageRequest,
    list: L,
) -> impl Stream<Item = Result<PageResponse<T>, QueryError>> + 'a
where
    T: 'a,
    L: FnMut(PageRequest) -> Fut + 'a,
    Fut: Future<Output = Result<PageResponse<T>, QueryError>> + 'a,
{
    stream::try_unfold((Some(first), list), move |state| fetch_next(ctx, state))
}

/// Drives [`pages`] to completion, handing every page to `on_page` together
/// with its zero-based index.
pub async fn paginate<'a, T, E, L, Fut, P>(
    ctx: &'a WorkContext,
    first: PageRequest,
    list: L,
    mut on_page: P,
) -> Result<PageSummary, E>
where
    T: 'a,
    L: FnMut(PageRequest) -> Fut + 'a,
    Fut: Future<Output = Result<PageResponse<T>, QueryError>> + 'a,
    P: FnMut(usize, PageResponse<T>) -> Result<(), E>,
    E: From<QueryError>,
{
    let mut walk = pin!(pages(ctx, first, list));
    let mut summary = PageSummary::default();

    while let Some(page) = walk.try_next().await? {
        debug!(
            page = summary.pages,
            items_this_page = page.items.len(),
            remaining = ?page.remaining_item_count,
            "Fetched page"
        );
        summary.items += page.items.len();
        on_page(summary.pages, page)?;
        summary.pages += 1;
    }

    debug!(pages = summary.pages, total_items = summary.items, "Pagination complete");
    Ok(summary)
}

/// Collects every item of the walk. Nothing is returned if any page fails.
pub async fn list_all<'a, T, L, Fut>(
    ctx: &'a WorkContext,
    first: PageRequest,
    list: L,
) -> Result<Vec<T>, QueryError>
where
    T: 'a,
    L: FnMut(PageRequest) -> Fut + 'a,
    Fut: Future<Output = Result<PageResponse<T>, QueryError>> + 'a,
{
    let mut items = Vec::new();
    paginate(ctx, first, list, |_, page| {
        items.extend(page.items);
        Ok::<(), QueryError>(())
    })
    .await?;
    Ok(items)
}
