use std::time::Duration;

use dioxus::prelude::*;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Handle to the toast stack owned by the route layout.
#[derive(Clone, Copy)]
pub struct Toaster {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl Toaster {
    /// Must be called inside a component; the stack lives as long as it does.
    #[must_use]
    pub fn new() -> Self {
        Self {
            toasts: Signal::new(Vec::new()),
            next_id: Signal::new(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.read().clone()
    }

    fn push(&self, kind: ToastKind, message: String) {
        let mut toasts = self.toasts;
        let mut next_id = self.next_id;
        let id = *next_id.peek();
        next_id.set(id + 1);
        toasts.write().push(Toast { id, kind, message });

        // Dismissal outlives the component that raised the toast.
        spawn_forever(async move {
            tokio::time::sleep(TOAST_TTL).await;
            toasts.write().retain(|toast| toast.id != id);
        });
    }
}

#[component]
pub fn ToastHost() -> Element {
    let toaster = use_context::<Toaster>();
    let toasts = toaster.toasts();

    rsx! {
        div { class: "toasts",
            for toast in toasts {
                div { key: "{toast.id}", class: toast.kind.class(), role: "status",
                    "{toast.message}"
                }
            }
        }
    }
}
