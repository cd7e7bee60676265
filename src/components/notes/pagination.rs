use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use icons::{ChevronLeft, ChevronRight};
use leptos::prelude::*;

const MAX_PAGE_BUTTONS: u32 = 5;

/// Up to `max_buttons` consecutive page numbers centred on `current`.
pub(crate) fn page_window(current: u32, total: u32, max_buttons: u32) -> Vec<u32> {
    if total == 0 || max_buttons == 0 {
        return vec![];
    }

    let current = current.clamp(1, total);
    let span = max_buttons.min(total);
    let start = current
        .saturating_sub(span / 2)
        .max(1)
        .min(total - span + 1);
    (start..start + span).collect()
}

#[component]
pub fn Pagination(
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] current_page: Signal<u32>,
    #[prop(into)] on_page_change: Callback<u32>,
) -> impl IntoView {
    let pages = move || page_window(current_page.get(), total_pages.get(), MAX_PAGE_BUTTONS);

    view! {
        <nav data-name="Pagination" aria-label="Pagination" class="flex items-center gap-1">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Previous page"
                attr:disabled=move || current_page.get() <= 1
                on:click=move |_| on_page_change.run(current_page.get_untracked().saturating_sub(1))
            >
                <ChevronLeft />
            </Button>

            {move || {
                pages()
                    .into_iter()
                    .map(|p| {
                        let is_current = move || current_page.get() == p;
                        view! {
                            <Button
                                variant=if is_current() { ButtonVariant::Default } else { ButtonVariant::Ghost }
                                size=ButtonSize::Sm
                                attr:aria-current=move || if is_current() { "page" } else { "false" }
                                on:click=move |_| on_page_change.run(p)
                            >
                                {p.to_string()}
                            </Button>
                        }
                    })
                    .collect_view()
            }}

            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Next page"
                attr:disabled=move || current_page.get() >= total_pages.get()
                on:click=move |_| on_page_change.run(current_page.get_untracked() + 1)
            >
                <ChevronRight />
            </Button>
        </nav>
    }
}
