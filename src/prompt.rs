use std::fmt::Write;

use crate::data_models::{ComicPayload, SearchSnippet};

pub const DESCRIPTION_CHAR_LIMIT: usize = 1000;

pub fn build_prompt(payload: &ComicPayload, snippets: &[SearchSnippet]) -> String {
    let mut prompt = format!(
        "Generate a brief, engaging description (under {DESCRIPTION_CHAR_LIMIT} characters) for a comic book.\n"
    );

    if !snippets.is_empty() {
        prompt.push_str("Use the following real information found on the web about this comic:\n");
        for s in snippets {
            // writing into a String cannot fail
            let _ = write!(prompt, "- {}: {}", s.title, s.snippet);
            if let Some(link) = &s.link {
                let _ = write!(prompt, " ({link})");
            }
            prompt.push('\n');
        }
    }

    let _ = writeln!(prompt, "Title: {}", payload.title);
    let _ = writeln!(prompt, "Status: {}", payload.status);
    if let Some(rating) = payload.rating.filter(|r| *r > 0.0) {
        let _ = writeln!(prompt, "Rating: {rating}");
    }
    prompt.push_str("Focus on being interesting and inviting.");
    prompt
}

#[test]
fn test_build_prompt_without_context() {
    let payload = ComicPayload {
        title: "Watchmen".into(),
        status: "completed".into(),
        rating: Some(5.0),
    };
    let prompt = build_prompt(&payload, &[]);
    assert_eq!(
        prompt,
        "Generate a brief, engaging description (under 1000 characters) for a comic book.\n\
         Title: Watchmen\n\
         Status: completed\n\
         Rating: 5\n\
         Focus on being interesting and inviting."
    );
}

#[test]
fn test_build_prompt_omits_rating() {
    let mut payload = ComicPayload {
        title: "Saga".into(),
        status: "ongoing".into(),
        rating: None,
    };
    assert!(!build_prompt(&payload, &[]).contains("Rating"));

    payload.rating = Some(0.0);
    assert!(!build_prompt(&payload, &[]).contains("Rating"));

    payload.rating = Some(4.5);
    assert!(build_prompt(&payload, &[]).contains("Rating: 4.5\n"));
}

#[test]
fn test_build_prompt_with_snippets() {
    let payload = ComicPayload {
        title: "Saga".into(),
        status: "ongoing".into(),
        rating: None,
    };
    let snippets = vec![
        SearchSnippet {
            title: "Saga (comics)".into(),
            snippet: "Space opera by Brian K. Vaughan.".into(),
            link: Some("https://example.com/saga".into()),
        },
        SearchSnippet {
            title: "Saga review".into(),
            snippet: "A modern classic.".into(),
            link: None,
        },
    ];
    let prompt = build_prompt(&payload, &snippets);
    assert!(prompt.contains("real information"));
    assert!(prompt.contains(
        "- Saga (comics): Space opera by Brian K. Vaughan. (https://example.com/saga)\n"
    ));
    assert!(prompt.contains("- Saga review: A modern classic.\n"));
    // context comes before the comic's own fields
    assert!(prompt.find("real information").unwrap() < prompt.find("Title: Saga").unwrap());
}
