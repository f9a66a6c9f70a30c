use maud::DOCTYPE;
use maud::Markup;
use maud::html;

pub fn theme_with_head(title: Option<&str>, extra_head: Markup, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="stylesheet" href="/styles.css";
                @if let Some(title) = title {
                    title { (title) " - Tasks" }
                } @else {
                    title { "Tasks" }
                }
                (extra_head)
            }
            body {
                (content)
            }
        }
    }
}

/// A standalone HTML card with a link back to the login page. Used for the
/// error responses, which are fragments rather than full pages.
pub fn notice(heading: &str, message: &str) -> Markup {
    html! {
        div style="font-family: 'Roboto', sans-serif; background-color: #f4f4f4; padding: 20px; border-radius: 5px; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1); text-align: center;" {
            h2 style="color: #f44336;" { (heading) }
            p style="color: #666;" { (message) }
            a href="/login" style="display: inline-block; margin-top: 15px; padding: 10px 20px; border-radius: 5px; background-color: #3498db; color: white; text-decoration: none; transition: background-color 0.3s ease;" {
                "Back to Login"
            }
        }
    }
}
