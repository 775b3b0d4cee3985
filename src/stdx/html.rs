use scraper::ElementRef;

/// Returns the text of `element` and all its descendants, with every run of
/// whitespace collapsed into a single space and the ends trimmed.
pub(crate) fn text(element: ElementRef<'_>) -> String {
    // Text nodes are joined first; an inline tag can split a single word.
    let raw = element.text().collect::<String>();
    let mut text = String::with_capacity(raw.len());

    for word in raw.split_whitespace() {
        text.push_str(word);
        text.push(' ');
    }

    // Removes the extra space added at the end in the prior loop
    text.pop();

    text
}
