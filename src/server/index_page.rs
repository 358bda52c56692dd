//! HTML rendering for the index page.

use crate::songlist::{IndexSongs, Song};
use std::fmt::Write;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn push_song_list(html: &mut String, id: &str, title: &str, songs: &[Song]) {
    let _ = writeln!(html, "<section id=\"{}\">", id);
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(title));
    if songs.is_empty() {
        html.push_str("<p class=\"empty\">No songs yet.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for song in songs {
            let _ = writeln!(
                html,
                "<li data-song-id=\"{}\">{} - {}</li>",
                song.id,
                escape_html(&song.artist_name),
                escape_html(&song.name)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");
}

fn page(title: &str, body: &str, footer: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         </head>\n<body>\n{}<footer>{}</footer>\n</body>\n</html>\n",
        escape_html(title),
        body,
        escape_html(footer)
    )
}

fn display_name(index: &IndexSongs) -> String {
    let parts: Vec<&str> = [&index.user.first_name, &index.user.last_name]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        index
            .user
            .email
            .clone()
            .unwrap_or_else(|| format!("User {}", index.user.id))
    } else {
        parts.join(" ")
    }
}

pub fn render_index(index: &IndexSongs, footer: &str) -> String {
    let name = display_name(index);
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Songlister</h1>");
    push_song_list(
        &mut body,
        "user-songs",
        &format!("{}'s songs", name),
        &index.user_songs,
    );
    push_song_list(&mut body, "all-songs", "All songs", &index.all_songs);
    page("Songlister", &body, footer)
}

pub fn render_error(title: &str, message: &str, footer: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n",
        escape_html(title),
        escape_html(message)
    );
    page(title, &body, footer)
}
