use leptos::prelude::*;

#[component]
pub fn Modal(#[prop(into)] on_close: Callback<()>, children: Children) -> impl IntoView {
    view! {
        <div
            data-name="ModalBackdrop"
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4"
            on:click=move |_| on_close.run(())
        >
            <div
                data-name="ModalContent"
                role="dialog"
                aria-modal="true"
                class="w-full max-w-lg rounded-2xl border bg-background p-6 shadow-lg"
                on:click=|ev| ev.stop_propagation()
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if ev.key() == "Escape" {
                        on_close.run(());
                    }
                }
            >
                {children()}
            </div>
        </div>
    }
}
