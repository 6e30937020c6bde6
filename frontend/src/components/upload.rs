use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::api;
use crate::auth::AuthContext;
use crate::components::banner::{Banner, Notice};
use crate::components::icons::{icon_file, icon_upload, icon_x};
use crate::models::OcrReading;

pub const ACCEPTED_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];
pub const INVALID_FILE_MESSAGE: &str = "Invalid file type. Please upload JPEG, PNG, or PDF files.";

pub fn is_accepted(mime: &str) -> bool {
    ACCEPTED_TYPES.contains(&mime.trim().to_ascii_lowercase().as_str())
}

fn size_label(bytes: f64) -> String {
    if bytes >= 1024.0 * 1024.0 {
        format!("{:.1} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.0} KB", (bytes / 1024.0).ceil())
    }
}

#[derive(Properties, PartialEq)]
pub struct BillUploadProps {
    pub disabled: bool,
    /// Utility type the bill is read for. Switching it drops the chosen file.
    #[prop_or_default]
    pub expense_type_id: Option<String>,
    pub on_reading: Callback<OcrReading>,
    /// Bumped by the parent to clear the selection after a save.
    #[prop_or_default]
    pub reset: u32,
}

/// Everything a chosen bill belongs to. A change in any field clears it.
#[derive(Clone, Debug, PartialEq)]
struct Selection {
    expense_type_id: Option<String>,
    disabled: bool,
    reset: u32,
}

impl Selection {
    fn of(props: &BillUploadProps) -> Self {
        Self {
            expense_type_id: props.expense_type_id.clone(),
            disabled: props.disabled,
            reset: props.reset,
        }
    }
}

#[function_component(BillUpload)]
pub fn bill_upload(props: &BillUploadProps) -> Html {
    let auth = use_context::<AuthContext>();
    let file = use_state(|| None::<File>);
    let dragging = use_state(|| false);
    let extracting = use_state(|| false);
    let notice = use_state(|| None::<Notice>);
    let input_ref = use_node_ref();

    {
        let file = file.clone();
        let notice = notice.clone();
        let input_ref = input_ref.clone();
        use_effect_with_deps(
            move |_: &Selection| {
                file.set(None);
                notice.set(None);
                if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                    input.set_value("");
                }
                || ()
            },
            Selection::of(props),
        );
    }

    let select = {
        let file = file.clone();
        let notice = notice.clone();
        Callback::from(move |candidate: Option<File>| {
            let Some(candidate) = candidate else {
                return;
            };
            if is_accepted(&candidate.type_()) {
                log::debug!("selected bill {}", candidate.name());
                notice.set(None);
                file.set(Some(candidate));
            } else {
                log::warn!("rejected bill with type {:?}", candidate.type_());
                notice.set(Some(Notice::error(INVALID_FILE_MESSAGE)));
            }
        })
    };

    let on_change = {
        let select = select.clone();
        let disabled = props.disabled;
        Callback::from(move |e: Event| {
            if disabled {
                return;
            }
            let input: HtmlInputElement = e.target_unchecked_into();
            select.emit(input.files().and_then(|files| files.get(0)));
        })
    };

    let on_drag_over = {
        let dragging = dragging.clone();
        let disabled = props.disabled;
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            if !disabled {
                dragging.set(true);
            }
        })
    };

    let on_drag_leave = {
        let dragging = dragging.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(false);
        })
    };

    let on_drop = {
        let dragging = dragging.clone();
        let select = select.clone();
        let disabled = props.disabled;
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(false);
            if disabled {
                return;
            }
            let dropped = e
                .data_transfer()
                .and_then(|transfer| transfer.files())
                .and_then(|files| files.get(0));
            select.emit(dropped);
        })
    };

    let on_remove = {
        let file = file.clone();
        let notice = notice.clone();
        let input_ref = input_ref.clone();
        let disabled = props.disabled;
        Callback::from(move |_| {
            if disabled {
                return;
            }
            file.set(None);
            notice.set(None);
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                input.set_value("");
            }
        })
    };

    let on_extract = {
        let file = file.clone();
        let extracting = extracting.clone();
        let notice = notice.clone();
        let on_reading = props.on_reading.clone();
        Callback::from(move |_| {
            let Some(selected) = (*file).clone() else {
                return;
            };
            let Some(session) = auth.as_ref().and_then(|auth| (**auth).clone()) else {
                notice.set(Some(Notice::error("Please sign in again.")));
                return;
            };
            let extracting = extracting.clone();
            let notice = notice.clone();
            let on_reading = on_reading.clone();
            extracting.set(true);
            spawn_local(async move {
                match api::analyze_bill(&session, &selected).await {
                    Ok(response) => {
                        let today = chrono::Local::now().date_naive();
                        on_reading.emit(OcrReading::from_response(response, today));
                        notice.set(Some(Notice::success("OCR completed successfully")));
                    }
                    Err(err) => {
                        log::error!("bill OCR failed: {}", err);
                        notice.set(Some(Notice::error(
                            err.user_message("Failed to process OCR"),
                        )));
                    }
                }
                extracting.set(false);
            });
        })
    };

    let zone_class = if props.disabled {
        "border-2 border-dashed border-border rounded-[10px] p-8 text-center opacity-50 cursor-not-allowed"
    } else if *dragging {
        "border-2 border-dashed border-[#173E63] bg-[#eef4f9] rounded-[10px] p-8 text-center"
    } else {
        "border-2 border-dashed border-border rounded-[10px] p-8 text-center hover:border-[#173E63]"
    };

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border space-y-4">
            <h3 class="font-bold text-foreground text-lg">{"Upload Bill"}</h3>
            <div class={zone_class} ondragover={on_drag_over} ondragleave={on_drag_leave} ondrop={on_drop}>
                <div class="flex flex-col items-center gap-2 text-muted-foreground">
                    { icon_upload() }
                    <p class="text-sm">
                        { if props.disabled { "Select a utility type first" } else { "Drag and drop your bill here, or" } }
                    </p>
                    <label class="text-sm font-semibold text-[#173E63] cursor-pointer">
                        {"browse files"}
                        <input
                            ref={input_ref}
                            type="file"
                            class="hidden"
                            accept={ACCEPTED_TYPES.join(",")}
                            disabled={props.disabled}
                            onchange={on_change}
                        />
                    </label>
                    <p class="text-xs">{"JPEG, PNG or PDF"}</p>
                </div>
            </div>

            if let Some(selected) = &*file {
                <div class="flex items-center justify-between bg-[#f1f4f9] rounded-[10px] px-4 py-3">
                    <div class="flex items-center gap-3">
                        { icon_file() }
                        <div>
                            <p class="text-sm font-semibold text-foreground">{ selected.name() }</p>
                            <p class="text-xs text-muted-foreground">{ size_label(selected.size()) }</p>
                        </div>
                    </div>
                    <div class="flex items-center gap-2">
                        <button
                            type="button"
                            class="bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-xs font-bold"
                            disabled={*extracting || props.disabled}
                            onclick={on_extract}
                        >
                            { if *extracting { "Extracting..." } else { "Extract Data" } }
                        </button>
                        <button type="button" class="p-2 rounded-full hover:bg-white" aria-label="Remove file" onclick={on_remove}>
                            { icon_x() }
                        </button>
                    </div>
                </div>
            }

            <Banner notice={(*notice).clone()} />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bill_formats_only() {
        assert!(is_accepted("image/jpeg"));
        assert!(is_accepted("image/png"));
        assert!(is_accepted("application/pdf"));
        assert!(is_accepted("IMAGE/PNG"));
        assert!(!is_accepted("image/gif"));
        assert!(!is_accepted("text/plain"));
        assert!(!is_accepted(""));
    }

    #[test]
    fn sizes_read_in_kb_or_mb() {
        assert_eq!(size_label(2048.0), "2 KB");
        assert_eq!(size_label(1500.0), "2 KB");
        assert_eq!(size_label(3.5 * 1024.0 * 1024.0), "3.5 MB");
    }

    fn props(expense_type_id: Option<&str>, disabled: bool, reset: u32) -> BillUploadProps {
        BillUploadProps {
            disabled,
            expense_type_id: expense_type_id.map(str::to_string),
            on_reading: Callback::from(|_: OcrReading| ()),
            reset,
        }
    }

    #[test]
    fn switching_utility_type_clears_the_bill() {
        let electricity = Selection::of(&props(Some("electricity"), false, 0));
        let gas = Selection::of(&props(Some("gas"), false, 0));
        assert_ne!(electricity, gas);
        assert_eq!(electricity, Selection::of(&props(Some("electricity"), false, 0)));
    }

    #[test]
    fn save_and_disable_clear_the_bill() {
        let base = Selection::of(&props(Some("gas"), false, 0));
        assert_ne!(base, Selection::of(&props(Some("gas"), false, 1)));
        assert_ne!(base, Selection::of(&props(Some("gas"), true, 0)));
        assert_ne!(base, Selection::of(&props(None, false, 0)));
    }
}
