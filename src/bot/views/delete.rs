use super::{
    back_row, bounded_lines, button, cancel_row, movie_line, pagination_row, Screen,
    LIST_TEXT_BUDGET,
};
use crate::bot::callback::{ActiveCommand, CallbackAction};
use crate::bot::selection::{is_selected, page_count, page_slice, sort_by_title};
use crate::bot::state::DeleteSession;
use crate::radarr::Movie;
use crate::utils::escape_html;

const COMMAND: ActiveCommand = ActiveCommand::Delete;

/// Placeholder sent while the library is fetched
pub const PLEASE_WAIT: &str = "Handling delete command... please wait";
/// Search hits exist, none of them is in the library
pub const NOT_IN_LIBRARY: &str = "No movies found in your library";

const SUBMIT_LABEL: &str = "Submit - Confirm Movies";
const CONFIRM_CANCEL_LABEL: &str = "Cancel, clear command";
const SELECTED_MARK: &str = " \u{2705}";

/// Paginated, multi-select list of the session's candidates.
#[must_use]
pub fn selection_screen(session: &DeleteSession, page_size: usize) -> Screen {
    let len = session.candidates.len();
    let total = page_count(len, page_size);

    let mut rows: Vec<_> = page_slice(&session.candidates, session.page, page_size)
        .iter()
        .map(|movie| {
            let mut label = movie.title.clone();
            if is_selected(&session.selected, movie.library_id()) {
                label.push_str(SELECTED_MARK);
            }
            vec![button(
                label,
                COMMAND,
                CallbackAction::Select(movie.catalog_key()),
            )]
        })
        .collect();

    if let Some(row) = pagination_row(COMMAND, session.page, len, page_size) {
        rows.push(row);
    }

    if !session.selected.is_empty() {
        rows.push(vec![button(SUBMIT_LABEL, COMMAND, CallbackAction::Submit)]);
    }
    rows.push(cancel_row(COMMAND));

    let text = escape_html(&format!(
        "Select the movie(s) you want to delete - page {}/{}",
        session.page + 1,
        total
    ));
    Screen::with_keyboard(text, rows)
}

/// Review of the selection, title-sorted regardless of click order.
#[must_use]
pub fn confirmation_screen(selected: &[Movie]) -> Screen {
    let mut movies = selected.to_vec();
    sort_by_title(&mut movies);

    let (question, yes_label) = if movies.len() == 1 {
        (
            "Do you want to delete the following movie including all files?",
            "Yes, delete this movie",
        )
    } else {
        (
            "Do you want to delete the following movies including all files?",
            "Yes, delete these movies",
        )
    };

    let lines: Vec<String> = movies.iter().map(movie_line).collect();
    let text = format!("{question}\n\n{}", bounded_lines(&lines, LIST_TEXT_BUDGET));

    let rows = vec![
        vec![button(yes_label, COMMAND, CallbackAction::Confirm)],
        vec![button(CONFIRM_CANCEL_LABEL, COMMAND, CallbackAction::Cancel)],
        back_row(COMMAND),
    ];
    let mut screen = Screen::with_keyboard(text, rows);
    screen.link_preview = movies.len() == 1;
    screen
}

/// Final report after a successful delete, in the confirmation's order.
#[must_use]
pub fn deleted_screen(deleted: &[Movie]) -> Screen {
    let mut movies = deleted.to_vec();
    sort_by_title(&mut movies);

    let lines: Vec<String> = movies
        .iter()
        .map(|m| format!("- {}", escape_html(&m.title)))
        .collect();
    let text = format!("Deleted movies:\n{}", bounded_lines(&lines, LIST_TEXT_BUDGET));
    Screen {
        text: text.trim_end().to_string(),
        keyboard: None,
        link_preview: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::state::{CatalogIndex, MessageAnchor};
    use insta::assert_snapshot;

    fn movie(id: i64, title: &str, year: i32) -> Movie {
        Movie {
            id: Some(id),
            tmdb_id: id + 100,
            title: title.to_string(),
            year,
            imdb_id: Some(format!("tt{id:07}")),
            ..Movie::default()
        }
    }

    fn session(count: i64) -> DeleteSession {
        let movies: Vec<_> = (1..=count)
            .map(|i| movie(i, &format!("Movie {i:02}"), 2000))
            .collect();
        DeleteSession::new(
            MessageAnchor {
                chat_id: 1,
                message_id: 1,
            },
            movies,
            CatalogIndex::new(),
        )
    }

    fn labels(screen: &Screen) -> Vec<String> {
        screen.buttons().iter().map(|b| b.text.clone()).collect()
    }

    #[test]
    fn test_footer_without_selection_is_cancel_only() {
        let screen = selection_screen(&session(3), 10);
        assert_eq!(
            labels(&screen),
            vec!["Movie 01", "Movie 02", "Movie 03", "Cancel - clear command"]
        );
    }

    #[test]
    fn test_footer_with_selection_offers_submit() {
        let mut session = session(3);
        session.selected = vec![session.candidates[1].clone()];
        let screen = selection_screen(&session, 10);
        assert_eq!(
            labels(&screen),
            vec![
                "Movie 01",
                "Movie 02 \u{2705}",
                "Movie 03",
                "Submit - Confirm Movies",
                "Cancel - clear command"
            ]
        );
    }

    #[test]
    fn test_title_shows_page_and_total() {
        let mut session = session(30);
        session.page = 2;
        let screen = selection_screen(&session, 10);
        assert_eq!(
            screen.text,
            "Select the movie(s) you want to delete - page 3/3"
        );
    }

    #[test]
    fn test_empty_library_renders_single_page() {
        let screen = selection_screen(&session(0), 10);
        assert!(screen.text.ends_with("page 1/1"));
        assert_eq!(labels(&screen), vec!["Cancel - clear command"]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut session = session(25);
        session.page = 1;
        session.selected = vec![session.candidates[12].clone()];
        assert_eq!(
            selection_screen(&session, 10),
            selection_screen(&session, 10)
        );
        assert_eq!(
            confirmation_screen(&session.selected),
            confirmation_screen(&session.selected)
        );
    }

    #[test]
    fn test_confirmation_sorts_and_escapes() {
        let selected = vec![
            movie(2, "Zodiac", 2007),
            movie(1, "The <Fast> & Furious", 2001),
        ];
        let screen = confirmation_screen(&selected);
        assert!(!screen.link_preview);
        assert_snapshot!(screen.text.trim_end(), @r#"
        Do you want to delete the following movies including all files?

        <a href="https://www.imdb.com/title/tt0000001">The &lt;Fast&gt; &amp; Furious</a> - <i>2001</i>
        <a href="https://www.imdb.com/title/tt0000002">Zodiac</a> - <i>2007</i>
        "#);
    }

    #[test]
    fn test_single_confirmation_keyboard() {
        let screen = confirmation_screen(&[movie(1, "Heat", 1995)]);
        assert!(screen.link_preview);
        assert_eq!(
            labels(&screen),
            vec!["Yes, delete this movie", "Cancel, clear command", "\u{1F519}"]
        );
    }

    #[test]
    fn test_deleted_report() {
        let screen = deleted_screen(&[movie(1, "Heat", 1995), movie(2, "Alien", 1979)]);
        assert_eq!(screen.text, "Deleted movies:\n- Alien\n- Heat");
    }

    #[test]
    fn test_large_confirmation_stays_under_message_limit() {
        let session = session(60);
        let screen = confirmation_screen(&session.candidates);

        assert!(screen.text.chars().count() < 4000);
        let shown = screen.text.matches("<a ").count();
        assert_eq!(shown, screen.text.matches("</a>").count());
        assert!(shown > 0 && shown < 60);
        assert!(screen
            .text
            .trim_end()
            .ends_with(&format!("...and {} more", 60 - shown)));
        assert_eq!(labels(&screen)[0], "Yes, delete these movies");
    }

    #[test]
    fn test_large_deleted_report_is_bounded() {
        let movies: Vec<_> = (1..=300)
            .map(|i| movie(i, &format!("A & Rather Long Title {i:03}"), 2000))
            .collect();
        let screen = deleted_screen(&movies);

        assert!(screen.text.chars().count() < 4000);
        assert!(screen.text.starts_with("Deleted movies:\n- A &amp; Rather Long Title 001"));
        assert!(screen.text.ends_with(" more"));
    }
}
