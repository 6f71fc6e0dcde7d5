use super::{navigate, Step};
use crate::bot::callback::CallbackAction;
use crate::bot::selection::toggle_selection;
use crate::bot::state::{catalog_index, DeleteSession, DeleteView, MessageAnchor, Session};
use crate::bot::views::delete::{
    confirmation_screen, deleted_screen, selection_screen, NOT_IN_LIBRARY,
};
use crate::bot::views::{COMMANDS_CLEARED, NO_SEARCH_RESULTS, TOO_MANY_RESULTS};
use crate::config::SEARCH_RESULT_LIMIT;
use crate::radarr::{LibraryBackend, Movie};
use tracing::{debug, info};

/// Starts `/delete`, optionally narrowed by `query`.
///
/// The whole library is fetched either way so row clicks can be resolved
/// without asking Radarr again.
pub async fn start(
    anchor: MessageAnchor,
    query: &str,
    backend: &dyn LibraryBackend,
    page_size: usize,
) -> Step {
    let library = match backend.list_all().await {
        Ok(movies) => movies,
        Err(e) => return Step::abort(&e),
    };

    let query = query.trim();
    if query.is_empty() {
        let index = catalog_index(&library);
        return list(DeleteSession::new(anchor, library, index), page_size);
    }

    let results = match backend.lookup(query.to_string()).await {
        Ok(results) => results,
        Err(e) => return Step::abort(&e),
    };
    if results.is_empty() {
        return Step::finish_with(NO_SEARCH_RESULTS);
    }
    if results.len() > SEARCH_RESULT_LIMIT {
        return Step::finish_with(TOO_MANY_RESULTS);
    }

    let in_library: Vec<Movie> = results
        .into_iter()
        .filter(|m| m.library_id().is_some())
        .collect();
    debug!(
        chat_id = anchor.chat_id,
        matches = in_library.len(),
        "Delete search resolved"
    );

    let index = catalog_index(library.iter().chain(in_library.iter()));
    match in_library.len() {
        0 => Step::finish_with(NOT_IN_LIBRARY),
        1 => {
            let mut session = DeleteSession::new(anchor, library, index);
            session.selected = in_library;
            confirm(session, page_size)
        }
        _ => list(DeleteSession::new(anchor, in_library, index), page_size),
    }
}

/// Applies one button click to a `/delete` session.
pub async fn on_callback(
    mut session: DeleteSession,
    action: CallbackAction,
    backend: &dyn LibraryBackend,
    page_size: usize,
) -> Step {
    if let Some(page) = navigate(&action, session.page, session.candidates.len(), page_size) {
        session.page = page;
        return list(session, page_size);
    }

    match action {
        CallbackAction::PageIndicator => Step::ignore(),
        CallbackAction::Select(catalog_id) => {
            let Some(movie) = session.catalog_index.get(&catalog_id).cloned() else {
                return Step::reset();
            };
            session.selected = toggle_selection(&session.selected, &movie);
            list(session, page_size)
        }
        CallbackAction::Submit => confirm(session, page_size),
        CallbackAction::Back => list(session, page_size),
        CallbackAction::Cancel => Step::finish_with(COMMANDS_CLEARED),
        CallbackAction::Confirm => execute(session, backend, page_size).await,
        _ => Step::reset(),
    }
}

fn list(mut session: DeleteSession, page_size: usize) -> Step {
    session.view = DeleteView::List;
    session.clamp(page_size);
    let screen = selection_screen(&session, page_size);
    Step::render(Session::Delete(session), screen)
}

/// An empty selection falls back to the list; the Submit button is hidden
/// in that case but a stale keyboard can still send it.
fn confirm(mut session: DeleteSession, page_size: usize) -> Step {
    if session.selected.is_empty() {
        return list(session, page_size);
    }
    session.view = DeleteView::Confirm;
    let screen = confirmation_screen(&session.selected);
    Step::render(Session::Delete(session), screen)
}

/// Deletion only runs from the confirmation view; a Confirm from any other
/// view re-renders the list without touching the library.
async fn execute(session: DeleteSession, backend: &dyn LibraryBackend, page_size: usize) -> Step {
    if session.view != DeleteView::Confirm || session.selected.is_empty() {
        return list(session, page_size);
    }
    let ids: Vec<i64> = session
        .selected
        .iter()
        .filter_map(Movie::library_id)
        .collect();

    match backend.bulk_delete(ids, true).await {
        Ok(()) => {
            info!(
                chat_id = session.anchor.chat_id,
                count = session.selected.len(),
                "Deleted movies"
            );
            Step::finish(deleted_screen(&session.selected))
        }
        Err(e) => Step::failed(&e),
    }
}
