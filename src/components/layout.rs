//! Base page layout shared by every page.

use leptos::prelude::*;

/// Base document with a jumbotron `header` above the page body
#[component]
pub fn Layout(header: &'static str, children: Children) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>"To-Do lists"</title>
                <link href="/static/base.css" rel="stylesheet"/>
            </head>
            <body>
                <div class="container">
                    <div class="row">
                        <div class="col-md-6 col-md-offset-3 jumbotron">
                            <div class="text-center">
                                <h1>{header}</h1>
                                {children()}
                            </div>
                        </div>
                    </div>
                </div>
            </body>
        </html>
    }
}
