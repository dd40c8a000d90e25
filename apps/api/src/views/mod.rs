//! Server-rendered HTML for each session phase. Components are pure functions
//! of their props; `render_session_page` builds a throwaway `VirtualDom` per
//! request and serializes it with dioxus-ssr.

pub mod error;
pub mod input;
pub mod landing;
pub mod results;

use dioxus::prelude::*;
use uuid::Uuid;

use crate::session::{Phase, SessionSnapshot};

pub use input::InputDraft;

use error::ErrorPanel;
use input::InputPanel;
use landing::Landing;
use results::ResultsDashboard;

#[derive(Props, Clone, PartialEq)]
struct SessionPageProps {
    session_id: Uuid,
    snapshot: SessionSnapshot,
    draft: InputDraft,
    demo_mode: bool,
}

/// Renders the full page for the session's current phase. `draft` fills the
/// input form when the phase shows it.
pub fn render_session_page(
    session_id: Uuid,
    snapshot: &SessionSnapshot,
    draft: &InputDraft,
    demo_mode: bool,
) -> String {
    let mut dom = VirtualDom::new_with_props(
        SessionPage,
        SessionPageProps {
            session_id,
            snapshot: snapshot.clone(),
            draft: draft.clone(),
            demo_mode,
        },
    );
    dom.rebuild_in_place();
    format!("<!DOCTYPE html>{}", dioxus_ssr::render(&dom))
}

#[allow(non_snake_case)]
fn SessionPage(props: SessionPageProps) -> Element {
    let SessionPageProps {
        session_id,
        snapshot,
        draft,
        demo_mode,
    } = props;
    let polling = snapshot.phase == Phase::Analyzing;

    rsx! {
        html { lang: "en",
            head {
                meta { charset: "utf-8" }
                meta { name: "viewport", content: "width=device-width, initial-scale=1" }
                if polling {
                    meta { "http-equiv": "refresh", content: "1" }
                }
                title { "Resume Checker" }
                style { dangerous_inner_html: STYLE }
            }
            body {
                nav { class: "navbar", a { href: "/", "Resume Checker" } }
                if demo_mode {
                    div { class: "demo-banner",
                        "⚠️ "
                        strong { "Demo Mode:" }
                        " API_KEY is missing. Using mock data for demonstration."
                    }
                }
                main {
                    PhaseBody { session_id, snapshot, draft }
                }
                footer { class: "footer", "Built for Bangladeshi students and freshers." }
            }
        }
    }
}

#[component]
fn PhaseBody(session_id: Uuid, snapshot: SessionSnapshot, draft: InputDraft) -> Element {
    match snapshot.phase {
        Phase::Idle => rsx! { Landing { session_id } },
        Phase::Input => rsx! { InputPanel { session_id, draft, busy: false } },
        Phase::Analyzing => {
            // The form stays up while analyzing, showing what was submitted
            let draft = InputDraft {
                text: snapshot.resume_text.clone().unwrap_or_default(),
                target_role: snapshot.target_role.clone().unwrap_or_default(),
                ..draft
            };
            rsx! { InputPanel { session_id, draft, busy: true } }
        }
        Phase::Results => match snapshot.result {
            Some(result) => rsx! {
                ResultsDashboard {
                    session_id,
                    result,
                    target_role: snapshot.target_role.unwrap_or_default(),
                }
            },
            None => rsx! { ErrorPanel { session_id } },
        },
        Phase::Error => rsx! { ErrorPanel { session_id } },
    }
}

const STYLE: &str = "\
body{margin:0;font-family:sans-serif;background:#f9fafb;color:#1f2937}\
.navbar{padding:1rem 2rem;background:#fff;border-bottom:1px solid #e5e7eb}\
.navbar a{color:#006a4e;font-weight:bold;text-decoration:none}\
.demo-banner{background:#fefce8;color:#854d0e;padding:.5rem;text-align:center;font-size:.75rem}\
main{max-width:72rem;margin:0 auto;padding:2rem 1rem}\
.card{background:#fff;border-radius:.5rem;box-shadow:0 1px 3px #0002;padding:1.5rem;margin-bottom:1.5rem}\
.columns{display:grid;grid-template-columns:1fr 1fr;gap:2rem}\
.preview{font-family:serif;background:#fff;padding:2rem;min-height:20rem}\
.preview h4{text-transform:uppercase;border-bottom:1px solid #e5e7eb}\
.spacer{height:1rem}\
.hint{color:#9ca3af;font-style:italic;text-align:center}\
.score-green{color:#16a34a}.score-yellow{color:#ca8a04}.score-red{color:#dc2626}\
.bar{background:#e5e7eb;border-radius:9999px;height:.6rem}\
.bar>div{background:#006a4e;border-radius:9999px;height:.6rem}\
.badge{border-radius:9999px;padding:.1rem .6rem;font-size:.75rem}\
.impact-high{background:#fee2e2;color:#991b1b}\
.impact-medium{background:#fef9c3;color:#854d0e}\
.impact-low{background:#dbeafe;color:#1e40af}\
.keyword{display:inline-block;background:#fee2e2;color:#991b1b;border-radius:.25rem;padding:.1rem .5rem;margin:.15rem}\
.optimized{color:#16a34a}.needs-action{color:#ca8a04}\
.error-panel{text-align:center;padding:3rem 1rem}\
.error-panel h3{color:#dc2626}\
button{background:#006a4e;color:#fff;border:0;border-radius:.375rem;padding:.6rem 1rem;cursor:pointer}\
button[disabled]{opacity:.7;cursor:not-allowed}\
textarea,input[type=text]{width:100%;box-sizing:border-box;padding:.6rem;border:1px solid #d1d5db;border-radius:.375rem}";
