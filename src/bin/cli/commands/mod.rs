pub mod bookmarks;
pub mod haptics;
pub mod master;
pub mod more;
pub mod shuffle;
pub mod star;
pub mod stats;
pub mod words;

use lexis::words::WordView;

/// One word per line: id, flag markers, then the entry itself.
pub(crate) fn word_line(view: &WordView) -> String {
    let mastered = if view.mastered { "M" } else { "." };
    let important = if view.important { "*" } else { "." };
    format!(
        "{:>5}  {}{}  {:<18} {}",
        view.id.as_str(),
        mastered,
        important,
        view.word,
        view.meaning
    )
}
