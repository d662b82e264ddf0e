use rs_htmltotext::parse;

#[test]
fn title_is_captured_and_removed_from_body_text() {
    let doc = parse("<head><title>My Page</title></head><body>content</body>");
    assert_eq!(doc.title, "My Page");
    assert_eq!(doc.body_text, "content");
    assert!(!doc.body_text.contains("My Page"));
}

#[test]
fn title_text_is_whitespace_normalized() {
    let doc = parse("<title>  spread \t out  </title>");
    assert_eq!(doc.title, "spread out");
}

#[test]
fn first_non_empty_title_wins() {
    let doc = parse("<title>First</title><title>Second</title><body>b</body>");
    assert_eq!(doc.title, "First");
}

#[test]
fn empty_first_title_lets_a_later_one_through() {
    let doc = parse("<title></title><title>Real</title><body>b</body>");
    assert_eq!(doc.title, "Real");
}

#[test]
fn title_never_appears_in_any_paragraph_text() {
    let doc = parse(concat!(
        "<title>Secret Title</title>",
        r#"<body><p>para with <a href="x">link</a></p></body>"#,
    ));
    assert_eq!(doc.links[0].paragraph_text, "para with link");
    for link in &doc.links {
        assert!(!link.paragraph_text.contains("Secret"));
    }
}

#[test]
fn markup_inside_title_does_not_break_capture() {
    // An unclosed inline element inside the title is truncated away when
    // the title closes.
    let doc = parse("<title>Here it <p/>is</title><body>b</body>");
    assert_eq!(doc.title, "Here it is");
    assert_eq!(doc.body_text, "b");
}

#[test]
fn missing_title_stays_empty() {
    let doc = parse("<body>no title here</body>");
    assert_eq!(doc.title, "");
}
