use crate::http::ContentType;

const EXTENSIONS: &[(&str, ContentType)] = &[
    ("html", ContentType::TextHtml),
    ("htm", ContentType::TextHtml),
    ("css", ContentType::TextCss),
    ("js", ContentType::Javascript),
    ("json", ContentType::Json),
    ("png", ContentType::Png),
    ("jpg", ContentType::Jpeg),
    ("jpeg", ContentType::Jpeg),
    ("ico", ContentType::Icon),
    ("svg", ContentType::Svg),
    ("pdf", ContentType::Pdf),
];

/// Content type for a file name, `text/plain` when unknown.
pub fn content_type_for(path: &str) -> ContentType {
    let name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = name.rsplit_once('.') else {
        return ContentType::TextPlain;
    };
    EXTENSIONS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(ContentType::TextPlain, |(_, content_type)| *content_type)
}
