/// Lazy offset-paginated fetching.
use std::collections::VecDeque;
use std::future::Future;

use futures::stream::{self, Stream};

/// Number of records requested per page unless overridden.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Adapts an offset-paginated fetch function into a flat stream of records.
///
/// `fetch(max_items, skip_count)` is invoked lazily as the stream is polled;
/// a short or empty page ends the stream. A failed fetch yields its error
/// once and the stream terminates. Calling `stream` again with the same
/// fetch function restarts from the first page.
pub fn stream<T, E, F, Fut>(fetch: F, page_size: usize) -> impl Stream<Item = Result<T, E>>
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    struct State<T, F> {
        fetch: F,
        skip: usize,
        buffer: VecDeque<T>,
        exhausted: bool,
    }

    let state = State {
        fetch,
        skip: 0,
        buffer: VecDeque::new(),
        exhausted: false,
    };

    stream::try_unfold(state, move |mut state| async move {
        loop {
            if let Some(item) = state.buffer.pop_front() {
                return Ok(Some((item, state)));
            }
            if state.exhausted {
                return Ok(None);
            }
            let page = (state.fetch)(page_size, state.skip).await?;
            state.skip += page.len();
            if page.len() < page_size {
                state.exhausted = true;
            }
            state.buffer = page.into();
        }
    })
}
