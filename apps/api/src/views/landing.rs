use dioxus::prelude::*;
use uuid::Uuid;

#[component]
pub fn Landing(session_id: Uuid) -> Element {
    rsx! {
        section { class: "card", style: "text-align:center",
            h1 { "Is your resume ready for the job market?" }
            p {
                "Get instant AI feedback on ATS friendliness, missing keywords and the mistakes \
                 fresh graduates in Bangladesh make most often."
            }
            form { method: "post", action: "/sessions/{session_id}/start",
                button { r#type: "submit", "Check My Resume" }
            }
        }
    }
}
