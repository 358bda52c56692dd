//! Helpers to inspect the rendered index page.

/// Song ids listed in the `<section id="...">` block, in page order.
pub fn section_song_ids(html: &str, section_id: &str) -> Vec<i64> {
    let open = format!("<section id=\"{}\">", section_id);
    let Some(start) = html.find(&open) else {
        panic!("Section {} not found in page", section_id);
    };
    let section = &html[start..];
    let section = &section[..section.find("</section>").unwrap_or(section.len())];

    section
        .split("data-song-id=\"")
        .skip(1)
        .map(|rest| {
            let end = rest.find('"').expect("Unterminated data-song-id");
            rest[..end].parse().expect("Non numeric song id")
        })
        .collect()
}
