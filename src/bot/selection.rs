//! Pagination and multi-select arithmetic over candidate lists.
//!
//! Everything here is pure; callers persist the returned values.

use crate::radarr::Movie;
use crate::utils::title_sort_key;

/// Number of pages for `len` items, never less than one.
///
/// # Examples
///
/// ```
/// use radarr_bot::bot::selection::page_count;
/// assert_eq!(page_count(30, 10), 3);
/// assert_eq!(page_count(31, 10), 4);
/// assert_eq!(page_count(0, 10), 1);
/// ```
#[must_use]
pub fn page_count(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Brings `page` back into `0..page_count`.
#[must_use]
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.min(page_count(len, page_size) - 1)
}

/// Items shown on `page`. Does not clamp: an out-of-range page is empty.
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Membership by library id.
#[must_use]
pub fn is_selected(selected: &[Movie], library_id: Option<i64>) -> bool {
    library_id.is_some_and(|id| selected.iter().any(|m| m.library_id() == Some(id)))
}

/// Returns `selected` with `movie` removed if present, appended otherwise.
///
/// Order of the remaining entries is preserved. Movies without a library id
/// cannot be selected and leave the selection unchanged.
#[must_use]
pub fn toggle_selection(selected: &[Movie], movie: &Movie) -> Vec<Movie> {
    let Some(id) = movie.library_id() else {
        return selected.to_vec();
    };
    if is_selected(selected, Some(id)) {
        selected
            .iter()
            .filter(|m| m.library_id() != Some(id))
            .cloned()
            .collect()
    } else {
        let mut next = selected.to_vec();
        next.push(movie.clone());
        next
    }
}

/// Stable sort by title, ignoring case and a leading article.
pub fn sort_by_title(movies: &mut [Movie]) {
    movies.sort_by_cached_key(|m| title_sort_key(&m.title));
}
