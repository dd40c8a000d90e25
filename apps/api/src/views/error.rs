use dioxus::prelude::*;
use uuid::Uuid;

/// Static error panel. Never shows diagnostic detail.
#[component]
pub fn ErrorPanel(session_id: Uuid) -> Element {
    rsx! {
        section { class: "error-panel",
            h3 { "Something went wrong." }
            p { "The AI service might be busy or unavailable." }
            form { method: "post", action: "/sessions/{session_id}/retry",
                button { r#type: "submit", "Try Again" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_panel_offers_retry_only() {
        let id = Uuid::new_v4();
        let html = dioxus_ssr::render_element(rsx! { ErrorPanel { session_id: id } });
        assert!(html.contains("The AI service might be busy or unavailable."));
        assert!(html.contains(&format!("/sessions/{id}/retry")));
        assert_eq!(html.matches("<button").count(), 1);
    }
}
