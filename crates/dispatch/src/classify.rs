//! Event classification and command parsing.

use crate::event::MentionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Top-level mention; may carry a game request.
    NewGame,
    /// Reply to one of the bot's own messages; may carry a move.
    Move,
    Ignored,
}

/// Sorts `event` by its reply fields alone.
pub fn classify(event: &MentionEvent, bot_user_id: &str) -> EventKind {
    match (&event.in_reply_to_status_id, &event.in_reply_to_user_id) {
        (None, _) => EventKind::NewGame,
        (Some(_), Some(user)) if user == bot_user_id => EventKind::Move,
        _ => EventKind::Ignored,
    }
}

/// Finds a game keyword followed by an opponent mention.
///
/// Words are whitespace separated. The first registered keyword selects
/// the game; among the `@handles` after it the last one is the opponent.
/// Returns the keyword and the handle without its `@`.
pub fn parse_new_game<'t>(
    text: &'t str,
    keywords: &[&'static str],
) -> Option<(&'static str, &'t str)> {
    let mut game = None;
    let mut opponent = None;

    for word in text.split_whitespace() {
        if game.is_some() {
            if let Some(handle) = word.strip_prefix('@').filter(|h| !h.is_empty()) {
                opponent = Some(handle);
            }
        } else {
            game = keywords.iter().copied().find(|k| *k == word);
        }
    }

    Some((game?, opponent?))
}

/// The first word that is not an `@mention`.
pub fn extract_command(text: &str) -> Option<&str> {
    text.split_whitespace().find(|w| !w.starts_with('@'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "1082387659220271104";

    fn event(reply_to_status: Option<&str>, reply_to_user: Option<&str>) -> MentionEvent {
        MentionEvent {
            id: "9".into(),
            author_id: "7".into(),
            author_handle: "alice".into(),
            text: "@bot hi".into(),
            in_reply_to_status_id: reply_to_status.map(Into::into),
            in_reply_to_user_id: reply_to_user.map(Into::into),
        }
    }

    #[test]
    fn top_level_mention_is_new_game() {
        assert_eq!(classify(&event(None, None), BOT), EventKind::NewGame);
    }

    #[test]
    fn reply_to_bot_is_move() {
        assert_eq!(classify(&event(Some("5"), Some(BOT)), BOT), EventKind::Move);
    }

    #[test]
    fn reply_to_someone_else_is_ignored() {
        assert_eq!(
            classify(&event(Some("5"), Some("42")), BOT),
            EventKind::Ignored
        );
        assert_eq!(classify(&event(Some("5"), None), BOT), EventKind::Ignored);
    }

    #[test]
    fn parses_keyword_and_opponent() {
        assert_eq!(
            parse_new_game("@bot tictactoe @bob", &["tictactoe"]),
            Some(("tictactoe", "bob"))
        );
    }

    #[test]
    fn last_handle_after_keyword_wins() {
        assert_eq!(
            parse_new_game("@bot  tictactoe @bob please @carol", &["tictactoe"]),
            Some(("tictactoe", "carol"))
        );
    }

    #[test]
    fn handles_before_keyword_do_not_count() {
        assert_eq!(parse_new_game("@bob tictactoe", &["tictactoe"]), None);
        assert_eq!(parse_new_game("@bot @bob let's play", &["tictactoe"]), None);
        assert_eq!(parse_new_game("@bot tictactoe @", &["tictactoe"]), None);
    }

    #[test]
    fn keyword_must_match_exactly() {
        assert_eq!(parse_new_game("@bot TicTacToe @bob", &["tictactoe"]), None);
        assert_eq!(parse_new_game("@bot tictactoe! @bob", &["tictactoe"]), None);
    }

    #[test]
    fn command_skips_mentions() {
        assert_eq!(extract_command("@bot @bob 5 please"), Some("5"));
        assert_eq!(extract_command("  @bot\n7"), Some("7"));
        assert_eq!(extract_command("@bot @bob"), None);
        assert_eq!(extract_command(""), None);
    }
}
