//! Layering rules in `static/site.css` that keep the background visible.

const CSS: &str = include_str!("../static/site.css");

/// `(selectors, declarations)` for every top-level rule, comments removed.
fn rules() -> Vec<(Vec<String>, String)> {
    let mut text = String::new();
    let mut rest = CSS;
    while let Some(start) = rest.find("/*") {
        text.push_str(&rest[..start]);
        let tail: &'static str = rest;
        rest = match tail[start..].find("*/") {
            Some(end) => &tail[start + end + 2..],
            None => "",
        };
    }
    text.push_str(rest);

    text.split('}')
        .filter_map(|chunk| {
            let (head, body) = chunk.split_once('{')?;
            let selectors = head.split(',').map(|s| s.trim().to_string()).collect();
            Some((selectors, body.trim().to_string()))
        })
        .collect()
}

fn declarations(selector: &str) -> Vec<String> {
    rules()
        .into_iter()
        .filter(|(selectors, _)| selectors.iter().any(|s| s == selector))
        .map(|(_, body)| body)
        .collect()
}

#[test]
fn html_has_no_background_of_its_own() {
    for body in declarations("html") {
        assert!(!body.contains("background"), "html rule sets a background: {body}");
    }
}

#[test]
fn body_colour_sits_under_the_fixed_layer() {
    assert!(declarations("body").iter().any(|b| b.contains("background")));
    let layer = declarations(".bg-layer").join(";");
    assert!(layer.contains("position: fixed"), "{layer}");
    assert!(layer.contains("z-index: -"), "{layer}");
}
