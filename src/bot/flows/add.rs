use super::{navigate, Step};
use crate::bot::callback::CallbackAction;
use crate::bot::state::{AddSession, AddStage, MessageAnchor, Session};
use crate::bot::views::add::{
    added_screen, final_screen, movie_screen, profile_screen, results_screen, root_folder_screen,
    MISSING_QUERY, NO_PROFILES, NO_ROOT_FOLDERS,
};
use crate::bot::views::{Screen, COMMANDS_CLEARED, NO_SEARCH_RESULTS, TOO_MANY_RESULTS};
use crate::config::SEARCH_RESULT_LIMIT;
use crate::radarr::{AddMovie, LibraryBackend};
use tracing::info;

/// Starts `/add` with a catalog search for `query`.
pub async fn start(
    anchor: MessageAnchor,
    query: &str,
    backend: &dyn LibraryBackend,
    page_size: usize,
) -> Step {
    let query = query.trim();
    if query.is_empty() {
        return Step::finish_with(MISSING_QUERY);
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

    let mut session = AddSession::new(anchor, results);
    if session.candidates.len() == 1 {
        session.movie = session.candidates.first().cloned();
        session.stage = AddStage::ConfirmMovie;
    }
    render(session, page_size)
}

/// Applies one button click to an `/add` session.
pub async fn on_callback(
    mut session: AddSession,
    action: CallbackAction,
    backend: &dyn LibraryBackend,
    page_size: usize,
) -> Step {
    match (session.stage, action) {
        (_, CallbackAction::Cancel) => Step::finish_with(COMMANDS_CLEARED),
        (_, CallbackAction::Back) => {
            session.stage = previous_stage(&session);
            if session.stage == AddStage::List {
                session.movie = None;
            }
            render(session, page_size)
        }
        (AddStage::List, CallbackAction::PageIndicator) => Step::ignore(),
        (AddStage::List, CallbackAction::Select(catalog_id)) => {
            let Some(movie) = session.catalog_index.get(&catalog_id).cloned() else {
                return Step::reset();
            };
            session.movie = Some(movie);
            session.stage = AddStage::ConfirmMovie;
            render(session, page_size)
        }
        (AddStage::List, action) => {
            match navigate(&action, session.page, session.candidates.len(), page_size) {
                Some(page) => {
                    session.page = page;
                    render(session, page_size)
                }
                None => Step::reset(),
            }
        }
        (AddStage::ConfirmMovie, CallbackAction::Submit) => {
            if session.movie.as_ref().and_then(|m| m.library_id()).is_some() {
                return Step::reset();
            }
            load_profiles(session, backend, page_size).await
        }
        (AddStage::Profile, CallbackAction::Profile(id)) => {
            let Some(profile) = session.profiles.iter().find(|p| p.id == id).cloned() else {
                return Step::reset();
            };
            session.profile = Some(profile);
            load_root_folders(session, backend, page_size).await
        }
        (AddStage::RootFolder, CallbackAction::RootFolder(id)) => {
            let Some(folder) = session.root_folders.iter().find(|f| f.id == id).cloned() else {
                return Step::reset();
            };
            session.root_folder = Some(folder);
            session.stage = AddStage::Final;
            render(session, page_size)
        }
        (AddStage::Final, CallbackAction::Confirm) => execute(session, backend, false).await,
        (AddStage::Final, CallbackAction::ConfirmAndSearch) => {
            execute(session, backend, true).await
        }
        _ => Step::reset(),
    }
}

/// Stage the Back button leads to. Stages that were skipped because they
/// offered a single choice are skipped again.
fn previous_stage(session: &AddSession) -> AddStage {
    let profile_shown = session.profiles.len() > 1;
    let folder_shown = session.root_folders.len() > 1;
    match session.stage {
        AddStage::List | AddStage::ConfirmMovie => AddStage::List,
        AddStage::Profile => AddStage::ConfirmMovie,
        AddStage::RootFolder if profile_shown => AddStage::Profile,
        AddStage::RootFolder => AddStage::ConfirmMovie,
        AddStage::Final if folder_shown => AddStage::RootFolder,
        AddStage::Final if profile_shown => AddStage::Profile,
        AddStage::Final => AddStage::ConfirmMovie,
    }
}

/// Screen for the session's current stage, `None` if a choice it needs is
/// missing.
fn screen_for(session: &AddSession, page_size: usize) -> Option<Screen> {
    let movie = session.movie.as_ref();
    match session.stage {
        AddStage::List => Some(results_screen(session, page_size)),
        AddStage::ConfirmMovie => movie.map(movie_screen),
        AddStage::Profile => movie.map(|m| profile_screen(m, &session.profiles)),
        AddStage::RootFolder => movie.map(|m| root_folder_screen(m, &session.root_folders)),
        AddStage::Final => Some(final_screen(
            movie?,
            session.profile.as_ref()?,
            session.root_folder.as_ref()?,
        )),
    }
}

fn render(session: AddSession, page_size: usize) -> Step {
    match screen_for(&session, page_size) {
        Some(screen) => Step::render(Session::Add(session), screen),
        None => Step::reset(),
    }
}

async fn load_profiles(
    mut session: AddSession,
    backend: &dyn LibraryBackend,
    page_size: usize,
) -> Step {
    let profiles = match backend.quality_profiles().await {
        Ok(profiles) => profiles,
        Err(e) => return Step::failed(&e),
    };
    if profiles.is_empty() {
        return Step::finish_with(NO_PROFILES);
    }

    session.profile = if profiles.len() == 1 {
        profiles.first().cloned()
    } else {
        None
    };
    session.profiles = profiles;
    if session.profile.is_some() {
        return load_root_folders(session, backend, page_size).await;
    }
    session.stage = AddStage::Profile;
    render(session, page_size)
}

async fn load_root_folders(
    mut session: AddSession,
    backend: &dyn LibraryBackend,
    page_size: usize,
) -> Step {
    let folders = match backend.root_folders().await {
        Ok(folders) => folders,
        Err(e) => return Step::failed(&e),
    };
    if folders.is_empty() {
        return Step::finish_with(NO_ROOT_FOLDERS);
    }

    session.root_folder = if folders.len() == 1 {
        folders.first().cloned()
    } else {
        None
    };
    session.root_folders = folders;
    session.stage = if session.root_folder.is_some() {
        AddStage::Final
    } else {
        AddStage::RootFolder
    };
    render(session, page_size)
}

async fn execute(session: AddSession, backend: &dyn LibraryBackend, search: bool) -> Step {
    let (Some(movie), Some(profile), Some(folder)) =
        (session.movie, session.profile, session.root_folder)
    else {
        return Step::reset();
    };

    let request = AddMovie {
        movie: movie.clone(),
        quality_profile_id: profile.id,
        root_folder_path: folder.path,
        search,
    };
    match backend.add_movie(request).await {
        Ok(added) => {
            info!(
                chat_id = session.anchor.chat_id,
                tmdb_id = added.tmdb_id,
                search,
                "Added movie"
            );
            Step::finish(added_screen(&movie, search))
        }
        Err(e) => Step::failed(&e),
    }
}
