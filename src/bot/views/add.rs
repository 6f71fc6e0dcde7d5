use super::{back_row, button, cancel_row, movie_line, pagination_row, Screen};
use crate::bot::callback::{ActiveCommand, CallbackAction};
use crate::bot::selection::{page_count, page_slice};
use crate::bot::state::AddSession;
use crate::radarr::{Movie, QualityProfile, RootFolder};
use crate::utils::escape_html;

const COMMAND: ActiveCommand = ActiveCommand::Add;

/// Placeholder sent while Radarr is searched
pub const PLEASE_WAIT: &str = "Searching movies... please wait";
/// `/add` without a title
pub const MISSING_QUERY: &str = "Please provide a search query, e.g. /add The Matrix";
/// Radarr has no quality profile configured
pub const NO_PROFILES: &str = "No quality profile(s) found on your Radarr server.";
/// Radarr has no root folder configured
pub const NO_ROOT_FOLDERS: &str = "No root folder(s) found on your Radarr server.";

/// Button label for a search result
fn result_label(movie: &Movie) -> String {
    if movie.year > 0 {
        format!("{} ({})", movie.title, movie.year)
    } else {
        movie.title.clone()
    }
}

/// Paginated list of search results, one pick ends the list.
#[must_use]
pub fn results_screen(session: &AddSession, page_size: usize) -> Screen {
    let len = session.candidates.len();
    let mut rows: Vec<_> = page_slice(&session.candidates, session.page, page_size)
        .iter()
        .map(|movie| {
            vec![button(
                result_label(movie),
                COMMAND,
                CallbackAction::Select(movie.catalog_key()),
            )]
        })
        .collect();
    if let Some(row) = pagination_row(COMMAND, session.page, len, page_size) {
        rows.push(row);
    }
    rows.push(cancel_row(COMMAND));

    let text = escape_html(&format!(
        "Select the movie you want to add - page {}/{}",
        session.page + 1,
        page_count(len, page_size)
    ));
    Screen::with_keyboard(text, rows)
}

/// Details of the picked movie; no add button if it is already imported.
#[must_use]
pub fn movie_screen(movie: &Movie) -> Screen {
    let (question, mut rows) = if movie.library_id().is_some() {
        ("This movie is already in your library:", Vec::new())
    } else {
        (
            "Is this the correct movie?",
            vec![vec![button(
                "Yes, add this movie",
                COMMAND,
                CallbackAction::Submit,
            )]],
        )
    };
    rows.push(cancel_row(COMMAND));
    rows.push(back_row(COMMAND));

    let mut screen = Screen::with_keyboard(format!("{question}\n\n{}", movie_line(movie)), rows);
    screen.link_preview = true;
    screen
}

/// One button per quality profile.
#[must_use]
pub fn profile_screen(movie: &Movie, profiles: &[QualityProfile]) -> Screen {
    let mut rows: Vec<_> = profiles
        .iter()
        .map(|p| {
            vec![button(
                p.name.clone(),
                COMMAND,
                CallbackAction::Profile(p.id),
            )]
        })
        .collect();
    rows.push(cancel_row(COMMAND));
    rows.push(back_row(COMMAND));

    let text = format!(
        "Select a quality profile for {}",
        escape_html(&movie.title)
    );
    Screen::with_keyboard(text, rows)
}

/// One button per root folder.
#[must_use]
pub fn root_folder_screen(movie: &Movie, folders: &[RootFolder]) -> Screen {
    let mut rows: Vec<_> = folders
        .iter()
        .map(|f| {
            vec![button(
                f.path.clone(),
                COMMAND,
                CallbackAction::RootFolder(f.id),
            )]
        })
        .collect();
    rows.push(cancel_row(COMMAND));
    rows.push(back_row(COMMAND));

    let text = format!("Select a root folder for {}", escape_html(&movie.title));
    Screen::with_keyboard(text, rows)
}

/// Summary of every choice with the two ways to add.
#[must_use]
pub fn final_screen(movie: &Movie, profile: &QualityProfile, folder: &RootFolder) -> Screen {
    let text = format!(
        "Add the following movie?\n\n{}\nQuality profile: <b>{}</b>\nRoot folder: <code>{}</code>",
        movie_line(movie),
        escape_html(&profile.name),
        escape_html(&folder.path)
    );
    let rows = vec![
        vec![button(
            "Add movie and start search",
            COMMAND,
            CallbackAction::ConfirmAndSearch,
        )],
        vec![button("Add movie", COMMAND, CallbackAction::Confirm)],
        cancel_row(COMMAND),
        back_row(COMMAND),
    ];
    Screen::with_keyboard(text, rows)
}

/// Report after a successful add.
#[must_use]
pub fn added_screen(movie: &Movie, searching: bool) -> Screen {
    let suffix = if searching { " Searching for it now." } else { "" };
    Screen::notice(&format!(
        "Movie '{}' added to your library.{suffix}",
        movie.title
    ))
}
