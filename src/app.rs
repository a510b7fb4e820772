use dioxus::prelude::*;

use crate::defaults::default_db_path;
use crate::ui::pages::{DirectoryPage, EmployeesPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Employees,
    Directory,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Employees, Page::Directory];

    pub fn label(self) -> &'static str {
        match self {
            Page::Employees => "Employees (server)",
            Page::Directory => "Directory (client)",
        }
    }
}

#[component]
pub fn App() -> Element {
    let db_path = match default_db_path() {
        Ok(path) => path,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to resolve the database path: {err}" }
                }
            };
        }
    };

    let mut current = use_signal(|| Page::Employees);

    rsx! {
        div {
            style: "display: flex; min-height: 100vh; font-family: sans-serif;",
            nav {
                style: "display: flex; flex-direction: column; gap: 4px; width: 200px; padding: 16px 8px; background: #1f2937;",
                {Page::ALL.iter().map(|page| {
                    let page = *page;
                    let background = if current() == page { "#374151" } else { "transparent" };
                    rsx!(
                        button {
                            key: "{page.label()}",
                            style: "text-align: left; border: none; color: #f9fafb; background: {background}; padding: 8px 12px; border-radius: 6px; cursor: pointer;",
                            onclick: move |_| current.set(page),
                            "{page.label()}"
                        }
                    )
                })}
            }
            main {
                style: "flex: 1; overflow: auto;",
                match current() {
                    Page::Employees => rsx! { EmployeesPage { db_path: db_path.clone() } },
                    Page::Directory => rsx! { DirectoryPage {} },
                }
            }
        }
    }
}
