use axum::response::Html;

/// GET /: home page.
pub async fn home() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// GET /upload: upload form.
pub async fn upload_form() -> Html<&'static str> {
    Html(include_str!("../../static/upload.html"))
}

/// GET /query: query form.
pub async fn query_form() -> Html<&'static str> {
    Html(include_str!("../../static/query.html"))
}

pub(crate) fn upload_complete() -> Html<&'static str> {
    Html(include_str!("../../static/doupload.html"))
}
