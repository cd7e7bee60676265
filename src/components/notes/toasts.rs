use crate::components::ui::{Alert, AlertDescription, Button, ButtonSize, ButtonVariant};
use crate::state::AppContext;
use icons::X;
use leptos::prelude::*;

#[component]
pub fn ToastStack() -> impl IntoView {
    let toaster = expect_context::<AppContext>().0.toaster;

    view! {
        <div
            data-name="ToastStack"
            aria-live="polite"
            class="fixed right-4 bottom-4 z-[60] flex w-80 flex-col gap-2"
        >
            <For each=move || toaster.get().visible() key=|t| t.id let:toast>
                <Alert attr:role="status" class="flex items-center justify-between gap-2">
                    <AlertDescription>{toast.notice.message()}</AlertDescription>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:title="Dismiss"
                        on:click=move |_| toaster.update(|t| t.dismiss(toast.id))
                    >
                        <X />
                    </Button>
                </Alert>
            </For>
        </div>
    }
}
