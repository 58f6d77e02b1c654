//! The index page. It hosts the admin frontend and hands it the
//! anti-forgery token through a `csrf-token` meta tag.

use actix_web::{get, http::header::ContentType, HttpResponse};

use crate::state::ApplicationState;


fn escape_html_attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

pub fn render_index_page(anti_forgery_token: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
        <html>\n\
        <head>\n\
        <meta charset=\"utf-8\">\n\
        <title>Shoppu</title>\n\
        <meta name=\"csrf-param\" content=\"authenticity_token\">\n\
        <meta name=\"csrf-token\" content=\"{}\">\n\
        </head>\n\
        <body>\n\
        <div id=\"root\"></div>\n\
        </body>\n\
        </html>\n",
        escape_html_attribute_value(anti_forgery_token)
    )
}


#[get("/")]
pub async fn index_page(state: ApplicationState) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_index_page(&state.anti_forgery_token))
}
